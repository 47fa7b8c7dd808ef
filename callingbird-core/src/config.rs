use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;

/// Application configuration gathered from the environment at startup.
///
/// Critical values (database URL, master encryption key, provider API keys,
/// JWT secrets) are required: the server fails fast at boot instead of
/// failing on first use.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL connection string
    pub database_url: String,

    /// Secret for tenant-scoped JWT bearer tokens
    pub jwt_secret: String,

    /// Separate secret for admin JWT bearer tokens
    pub admin_jwt_secret: String,

    /// Master key for AES-256-GCM token encryption, 32 bytes hex-encoded
    pub master_key_hex: String,

    /// Mollie API key
    pub mollie_api_key: String,

    /// Vapi (assistant configuration provider) API key
    pub vapi_api_key: String,

    /// Google OAuth client credentials
    pub google_client_id: String,
    pub google_client_secret: String,

    /// Microsoft OAuth client credentials
    pub outlook_client_id: String,
    pub outlook_client_secret: String,

    /// Fallback price per minute when a tenant has no override
    pub default_price_per_minute: Decimal,
}

impl AppConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing or malformed variable.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let default_price =
            env::var("DEFAULT_PRICE_PER_MINUTE").unwrap_or_else(|_| "0.15".to_string());
        let default_price_per_minute = Decimal::from_str(&default_price)
            .map_err(|_| anyhow::anyhow!("Invalid DEFAULT_PRICE_PER_MINUTE: {}", default_price))?;

        Ok(Self {
            database_url: require("DATABASE_URL")?,
            jwt_secret: require("JWT_SECRET")?,
            admin_jwt_secret: require("ADMIN_JWT_SECRET")?,
            master_key_hex: require("TOKEN_MASTER_KEY")?,
            mollie_api_key: require("MOLLIE_API_KEY")?,
            vapi_api_key: require("VAPI_API_KEY")?,
            google_client_id: require("GOOGLE_CLIENT_ID")?,
            google_client_secret: require("GOOGLE_CLIENT_SECRET")?,
            outlook_client_id: require("OUTLOOK_CLIENT_ID")?,
            outlook_client_secret: require("OUTLOOK_CLIENT_SECRET")?,
            default_price_per_minute,
        })
    }
}

fn require(name: &str) -> Result<String, anyhow::Error> {
    env::var(name).map_err(|_| anyhow::anyhow!("Missing required environment variable: {}", name))
}
