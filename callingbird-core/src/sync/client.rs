use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::assistant::AssistantConfig;

const VAPI_BASE_URL: &str = "https://api.vapi.ai";

/// Error from the assistant configuration provider.
#[derive(Debug, thiserror::Error)]
pub enum AssistantApiError {
    #[error("Assistant API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl AssistantApiError {
    /// HTTP-equivalent status code, 500 when unavailable.
    pub fn status(&self) -> u16 {
        match self {
            AssistantApiError::Api { status, .. } => *status,
            AssistantApiError::Http(e) => e.status().map(|s| s.as_u16()).unwrap_or(500),
        }
    }

    /// True when the provider reports the assistant id as unknown, which
    /// means the locally stored id is stale.
    pub fn is_not_found(&self) -> bool {
        self.status() == 404
    }
}

/// Assistant configuration provider: accepts a full configuration snapshot
/// and returns an opaque assistant id. Updating an unknown id yields a
/// 404-equivalent error.
#[async_trait]
pub trait AssistantApi: Send + Sync {
    async fn create_assistant(&self, config: &AssistantConfig)
        -> Result<String, AssistantApiError>;

    async fn update_assistant(
        &self,
        assistant_id: &str,
        config: &AssistantConfig,
    ) -> Result<(), AssistantApiError>;
}

#[derive(Debug, Deserialize)]
struct VapiAssistant {
    id: String,
}

/// Vapi REST client.
pub struct VapiClient {
    http: reqwest::Client,
    api_key: String,
}

impl VapiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, AssistantApiError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        Err(AssistantApiError::Api { status, message })
    }
}

/// Maps the configuration snapshot to the provider's assistant payload.
fn assistant_payload(config: &AssistantConfig) -> Value {
    json!({
        "name": config.company.name,
        "firstMessage": config.voice.greeting,
        "voice": {
            "voiceId": config.voice.voice_id,
            "language": config.voice.language,
        },
        "replyStyle": {
            "tone": config.reply_style.tone,
            "formality": config.reply_style.formality,
        },
        "customInstructions": config.custom_instructions,
        "company": {
            "details": config.details,
            "hours": config.hours,
            "callers": config.callers,
        },
        "scheduling": config.scheduling,
        "calendarProvider": config.calendar_provider,
        "stores": config.stores,
        "catalog": config.catalog,
    })
}

#[async_trait]
impl AssistantApi for VapiClient {
    async fn create_assistant(
        &self,
        config: &AssistantConfig,
    ) -> Result<String, AssistantApiError> {
        let response = self
            .http
            .post(format!("{VAPI_BASE_URL}/assistant"))
            .bearer_auth(&self.api_key)
            .json(&assistant_payload(config))
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json::<VapiAssistant>().await?.id)
    }

    async fn update_assistant(
        &self,
        assistant_id: &str,
        config: &AssistantConfig,
    ) -> Result<(), AssistantApiError> {
        let response = self
            .http
            .patch(format!("{VAPI_BASE_URL}/assistant/{assistant_id}"))
            .bearer_auth(&self.api_key)
            .json(&assistant_payload(config))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
