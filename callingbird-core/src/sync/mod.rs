pub mod client;
pub mod coalescer;
pub mod handlers;
pub mod service;

#[cfg(test)]
mod tests;

pub use client::{AssistantApi, AssistantApiError, VapiClient};
pub use coalescer::{SyncCoalescer, SyncExecutor, SyncOutcome, SyncResult, QUIESCENCE_WINDOW};
pub use service::AssistantSyncService;

/// Typed error for a failed assistant sync.
///
/// Carries one or more human-readable messages and an HTTP-equivalent status
/// code extracted from the downstream response (500 when unavailable). The
/// same error instance is delivered to every caller awaiting the coalesced
/// sync, so it is cheap to clone.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Assistant sync failed: {}", messages.join("; "))]
pub struct SyncError {
    messages: Vec<String>,
    status_code: u16,
}

impl SyncError {
    pub fn new(messages: Vec<String>, status_code: u16) -> Self {
        Self {
            messages,
            status_code,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(vec![message.into()], 500)
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }
}

impl From<sqlx::Error> for SyncError {
    fn from(e: sqlx::Error) -> Self {
        SyncError::internal(e.to_string())
    }
}

impl From<AssistantApiError> for SyncError {
    fn from(e: AssistantApiError) -> Self {
        SyncError::new(vec![e.to_string()], e.status())
    }
}
