use crate::calendar::OAuthClient;
use crate::config::AppConfig;

pub const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Google OAuth client settings from the application config.
pub fn oauth_client(config: &AppConfig) -> OAuthClient {
    OAuthClient {
        client_id: config.google_client_id.clone(),
        client_secret: config.google_client_secret.clone(),
        token_url: TOKEN_URL.to_string(),
    }
}
