use crate::calendar::OAuthClient;
use crate::config::AppConfig;

pub const TOKEN_URL: &str = "https://login.microsoftonline.com/common/oauth2/v2.0/token";

/// Microsoft OAuth client settings from the application config.
pub fn oauth_client(config: &AppConfig) -> OAuthClient {
    OAuthClient {
        client_id: config.outlook_client_id.clone(),
        client_secret: config.outlook_client_secret.clone(),
        token_url: TOKEN_URL.to_string(),
    }
}
