use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};

use crate::calendar;
use crate::models::assistant::{AssistantConfig, SchedulingContext};
use crate::models::company::Company;
use crate::store;
use crate::sync::client::AssistantApi;
use crate::sync::coalescer::{SyncExecutor, SyncOutcome, SyncResult};
use crate::sync::SyncError;

/// Builds the configuration snapshot for a tenant and pushes it to the
/// assistant provider. This is the work that runs when a coalesced sync
/// fires.
pub struct AssistantSyncService {
    pool: PgPool,
    client: Arc<dyn AssistantApi>,
}

impl AssistantSyncService {
    pub fn new(pool: PgPool, client: Arc<dyn AssistantApi>) -> Self {
        Self { pool, client }
    }

    /// Materializes the tenant's current configuration.
    ///
    /// Returns `Ok(None)` when the tenant is not ready to sync (no voice
    /// settings or no reply style yet) - that is a skip, not an error. A
    /// product catalog failure degrades to an empty catalog.
    async fn build_config(&self, company_id: i64) -> Result<Option<AssistantConfig>, SyncError> {
        let (company, voice, reply_style, details, hours, callers, appointment_types, staff) =
            tokio::try_join!(
                store::companies::get_company(&self.pool, company_id),
                store::settings::voice_settings(&self.pool, company_id),
                store::settings::reply_style(&self.pool, company_id),
                store::companies::get_details(&self.pool, company_id),
                store::companies::get_opening_hours(&self.pool, company_id),
                store::companies::get_callers(&self.pool, company_id),
                store::scheduling::appointment_types(&self.pool, company_id),
                store::scheduling::staff(&self.pool, company_id),
            )?;

        let (calendar_connections, stores, custom_instructions) = tokio::try_join!(
            store::integrations::calendar_connections(&self.pool, company_id),
            store::integrations::connected_stores(&self.pool, company_id),
            store::settings::custom_instructions(&self.pool, company_id),
        )?;

        let company = company
            .ok_or_else(|| SyncError::internal(format!("company {company_id} not found")))?;

        let (voice, reply_style) = match (voice, reply_style) {
            (Some(v), Some(r)) => (v, r),
            _ => {
                warn!(
                    "Company {} has no voice settings or reply style yet, skipping sync",
                    company_id
                );
                return Ok(None);
            }
        };

        // Catalog failures are non-fatal: the assistant just answers without
        // product knowledge until the next sync.
        let catalog = match store::products::published_products(&self.pool, company_id).await {
            Ok(products) => products,
            Err(e) => {
                warn!(
                    "Failed to load product catalog for company {}: {}",
                    company_id, e
                );
                Vec::new()
            }
        };

        Ok(Some(AssistantConfig {
            company,
            details,
            hours,
            callers,
            voice,
            reply_style,
            custom_instructions,
            scheduling: SchedulingContext {
                appointment_types,
                staff,
            },
            calendar_provider: calendar::active_provider(&calendar_connections),
            stores,
            catalog,
        }))
    }

    async fn create_and_store(
        &self,
        company_id: i64,
        config: &AssistantConfig,
    ) -> Result<String, SyncError> {
        let assistant_id = self.client.create_assistant(config).await?;
        store::companies::set_assistant_id(&self.pool, company_id, &assistant_id).await?;
        Ok(assistant_id)
    }

    /// Pushes the snapshot downstream: create when no assistant exists yet,
    /// update otherwise, and recreate when the stored id turns out stale.
    async fn push(&self, company: &Company, config: &AssistantConfig) -> Result<String, SyncError> {
        match &company.assistant_id {
            None => self.create_and_store(company.id, config).await,
            Some(assistant_id) => {
                match self.client.update_assistant(assistant_id, config).await {
                    Ok(()) => Ok(assistant_id.clone()),
                    Err(e) if e.is_not_found() => {
                        warn!(
                            "Assistant {} for company {} no longer exists upstream, recreating",
                            assistant_id, company.id
                        );
                        self.create_and_store(company.id, config).await
                    }
                    Err(e) => Err(e.into()),
                }
            }
        }
    }
}

#[async_trait]
impl SyncExecutor for AssistantSyncService {
    async fn execute(&self, company_id: i64) -> SyncResult {
        let config = match self.build_config(company_id).await? {
            Some(config) => config,
            None => return Ok(SyncOutcome::Skipped),
        };

        info!(
            "Syncing assistant for company {} (connected stores: {:?})",
            company_id,
            config.stores.names()
        );

        let assistant_id = self.push(&config.company, &config).await?;
        Ok(SyncOutcome::Synced { assistant_id })
    }
}
