use sqlx::PgPool;
use std::sync::Arc;

use crate::billing::run::BillingRunner;
use crate::config::AppConfig;
use crate::crypto::TokenCipher;
use crate::email::Mailer;
use crate::payments::PaymentProvider;
use crate::sync::SyncCoalescer;

/// Application state containing shared resources.
///
/// Holds the database connection pool, the per-tenant sync coalescer and the
/// third-party clients that handlers need.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub db: PgPool,

    /// Startup configuration
    pub config: AppConfig,

    /// Assistant sync coalescer (long-lived, owns the pending-sync registry)
    pub coalescer: SyncCoalescer,

    /// Monthly billing runner
    pub runner: Arc<BillingRunner>,

    /// Payment provider client
    pub payments: Arc<dyn PaymentProvider>,

    /// Transactional email sender
    pub mailer: Arc<dyn Mailer>,

    /// Master cipher for OAuth tokens at rest
    pub cipher: TokenCipher,
}
