use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tracing::debug;

use crate::sync::SyncError;

/// Fixed quiescence window: how long the first request in a burst waits for
/// the burst to settle before the sync fires. Later requests within the
/// window do not reset the timer.
pub const QUIESCENCE_WINDOW: Duration = Duration::from_millis(800);

/// Outcome of a completed sync cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The configuration was pushed to the assistant provider.
    Synced { assistant_id: String },

    /// The tenant's configuration is not ready yet (missing voice settings
    /// or reply style); the sync was skipped, not failed.
    Skipped,
}

pub type SyncResult = Result<SyncOutcome, SyncError>;

/// The work performed when a coalesced sync fires.
#[async_trait]
pub trait SyncExecutor: Send + Sync + 'static {
    async fn execute(&self, company_id: i64) -> SyncResult;
}

struct Inner {
    executor: Arc<dyn SyncExecutor>,
    window: Duration,

    // At most one entry per company at any instant: present while a cycle is
    // scheduled or in flight, removed at settle before the result is
    // broadcast. Mutated only at request/settle boundaries.
    pending: Mutex<HashMap<i64, watch::Receiver<Option<SyncResult>>>>,
}

/// Coalesces bursts of "company configuration changed" notifications into a
/// single downstream configuration push per tenant.
///
/// Per-tenant cycle: `idle -> scheduled -> in_flight -> idle`. The first
/// request schedules the timer; requests while scheduled or in flight attach
/// to the same shared result; requests after settle start a fresh cycle.
#[derive(Clone)]
pub struct SyncCoalescer {
    inner: Arc<Inner>,
}

impl SyncCoalescer {
    pub fn new(executor: Arc<dyn SyncExecutor>) -> Self {
        Self::with_window(executor, QUIESCENCE_WINDOW)
    }

    /// Constructor with an explicit quiescence window, used by tests.
    pub fn with_window(executor: Arc<dyn SyncExecutor>, window: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                executor,
                window,
                pending: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Requests a configuration sync for the company.
    ///
    /// Callable concurrently from any code path that mutates tenant
    /// configuration. Resolves once the coalesced sync for this tenant
    /// completes, with the shared outcome or the shared error.
    pub async fn request_sync(&self, company_id: i64) -> SyncResult {
        let mut rx = {
            let mut pending = self.inner.pending.lock().await;
            match pending.get(&company_id) {
                Some(rx) => {
                    debug!("Attaching to pending sync for company {}", company_id);
                    rx.clone()
                }
                None => {
                    let (tx, rx) = watch::channel(None);
                    pending.insert(company_id, rx.clone());

                    let inner = Arc::clone(&self.inner);
                    tokio::spawn(async move {
                        tokio::time::sleep(inner.window).await;
                        let result = inner.executor.execute(company_id).await;
                        // Remove before broadcasting so a request arriving
                        // after settle starts a fresh cycle.
                        inner.pending.lock().await.remove(&company_id);
                        let _ = tx.send(Some(result));
                    });

                    rx
                }
            }
        };

        loop {
            {
                let value = rx.borrow_and_update();
                if let Some(result) = value.as_ref() {
                    return result.clone();
                }
            }
            if rx.changed().await.is_err() {
                return Err(SyncError::internal("sync task ended without a result"));
            }
        }
    }
}
