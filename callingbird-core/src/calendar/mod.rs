pub mod google;
pub mod outlook;

use chrono::{Duration, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;

use crate::config::AppConfig;
use crate::crypto::{CryptoError, TokenCipher};
use crate::models::assistant::CalendarProvider;
use crate::models::integration::CalendarConnection;
use crate::store;

/// Refresh slightly before the recorded expiry to absorb clock skew.
const EXPIRY_SKEW_SECONDS: i64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("Token endpoint returned {status}: {message}")]
    TokenEndpoint { status: u16, message: String },

    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// OAuth client settings for one provider's token endpoint.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// The single active calendar provider for a set of connections. Google
/// takes priority over Outlook when both are connected.
pub fn active_provider(connections: &[CalendarConnection]) -> Option<CalendarProvider> {
    if connections.iter().any(|c| c.provider == "google") {
        return Some(CalendarProvider::Google);
    }
    if connections.iter().any(|c| c.provider == "outlook") {
        return Some(CalendarProvider::Outlook);
    }
    None
}

/// OAuth client settings for the given provider's token endpoint.
pub fn oauth_client_for(provider: CalendarProvider, config: &AppConfig) -> OAuthClient {
    match provider {
        CalendarProvider::Google => google::oauth_client(config),
        CalendarProvider::Outlook => outlook::oauth_client(config),
    }
}

/// Returns a currently valid access token for the connection, refreshing
/// (and re-encrypting) it when the stored one is expired or about to expire.
pub async fn ensure_fresh_access_token(
    pool: &PgPool,
    cipher: &TokenCipher,
    http: &reqwest::Client,
    oauth: &OAuthClient,
    connection: &CalendarConnection,
) -> Result<String, CalendarError> {
    let still_valid =
        connection.expires_at > Utc::now() + Duration::seconds(EXPIRY_SKEW_SECONDS);
    if still_valid {
        return Ok(connection.decrypt_access_token(cipher)?);
    }

    let refresh_token = connection.decrypt_refresh_token(cipher)?;

    let response = http
        .post(&oauth.token_url)
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.as_str()),
            ("client_id", oauth.client_id.as_str()),
            ("client_secret", oauth.client_secret.as_str()),
        ])
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        return Err(CalendarError::TokenEndpoint { status, message });
    }

    let token: TokenResponse = response.json().await?;
    let sealed = cipher.encrypt(&token.access_token)?;
    let expires_at = Utc::now() + Duration::seconds(token.expires_in);

    store::integrations::update_access_token(
        pool,
        connection.company_id,
        &connection.provider,
        &sealed,
        expires_at,
    )
    .await?;

    info!(
        "Refreshed {} access token for company {}",
        connection.provider, connection.company_id
    );

    Ok(token.access_token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn connection(provider: &str) -> CalendarConnection {
        CalendarConnection {
            company_id: 1,
            provider: provider.to_string(),
            access_token_iv: String::new(),
            access_token_ciphertext: String::new(),
            access_token_tag: String::new(),
            refresh_token_iv: String::new(),
            refresh_token_ciphertext: String::new(),
            refresh_token_tag: String::new(),
            expires_at: Utc::now(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_google_takes_priority_over_outlook() {
        let both = vec![connection("outlook"), connection("google")];
        assert_eq!(active_provider(&both), Some(CalendarProvider::Google));
    }

    #[test]
    fn test_outlook_alone_is_active() {
        let outlook = vec![connection("outlook")];
        assert_eq!(active_provider(&outlook), Some(CalendarProvider::Outlook));
    }

    #[test]
    fn test_no_connection_means_no_provider() {
        assert_eq!(active_provider(&[]), None);
    }

    #[tokio::test]
    async fn test_valid_token_is_decrypted_without_refresh() {
        let cipher = TokenCipher::from_hex_key(
            "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f",
        )
        .expect("valid key");
        let sealed = cipher.encrypt("ya29.current").expect("encrypt");

        let mut conn = connection("google");
        conn.access_token_iv = sealed.iv;
        conn.access_token_ciphertext = sealed.ciphertext;
        conn.access_token_tag = sealed.tag;
        conn.expires_at = Utc::now() + Duration::hours(1);

        // Never touched on the still-valid path.
        let pool = sqlx::PgPool::connect_lazy("postgres://localhost/unused").expect("lazy pool");
        let oauth = OAuthClient {
            client_id: String::new(),
            client_secret: String::new(),
            token_url: "http://localhost/never-called".to_string(),
        };

        let token =
            ensure_fresh_access_token(&pool, &cipher, &reqwest::Client::new(), &oauth, &conn)
                .await
                .expect("fresh token");
        assert_eq!(token, "ya29.current");
    }

    #[test]
    fn test_oauth_client_uses_provider_credentials() {
        let config = AppConfig {
            database_url: String::new(),
            jwt_secret: String::new(),
            admin_jwt_secret: String::new(),
            master_key_hex: String::new(),
            mollie_api_key: String::new(),
            vapi_api_key: String::new(),
            google_client_id: "g-id".to_string(),
            google_client_secret: "g-secret".to_string(),
            outlook_client_id: "o-id".to_string(),
            outlook_client_secret: "o-secret".to_string(),
            default_price_per_minute: rust_decimal::Decimal::ZERO,
        };

        let g = oauth_client_for(CalendarProvider::Google, &config);
        assert_eq!(g.client_id, "g-id");
        assert_eq!(g.token_url, google::TOKEN_URL);

        let o = oauth_client_for(CalendarProvider::Outlook, &config);
        assert_eq!(o.client_secret, "o-secret");
        assert_eq!(o.token_url, outlook::TOKEN_URL);
    }
}
