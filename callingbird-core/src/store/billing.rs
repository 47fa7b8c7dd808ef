use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::billing::{BillingProfile, BillingStatus};

const PROFILE_COLUMNS: &str = r#"
    company_id, price_per_minute, status, trial_ends_at,
    mollie_customer_id, mollie_mandate_id, last_billed_month,
    billing_email, created_at, updated_at
"#;

/// Fetches every profile with an active billing relationship
/// (status trial, active or past_due).
pub async fn billable_profiles(pool: &PgPool) -> Result<Vec<BillingProfile>, sqlx::Error> {
    sqlx::query_as::<_, BillingProfile>(&format!(
        r#"
        SELECT {PROFILE_COLUMNS}
        FROM billing_profiles
        WHERE status IN ('trial', 'active', 'past_due')
        ORDER BY company_id ASC
        "#
    ))
    .fetch_all(pool)
    .await
}

pub async fn get_profile(
    pool: &PgPool,
    company_id: i64,
) -> Result<Option<BillingProfile>, sqlx::Error> {
    sqlx::query_as::<_, BillingProfile>(&format!(
        r#"
        SELECT {PROFILE_COLUMNS}
        FROM billing_profiles
        WHERE company_id = $1
        "#
    ))
    .bind(company_id)
    .fetch_optional(pool)
    .await
}

pub async fn set_status(
    pool: &PgPool,
    company_id: i64,
    status: BillingStatus,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE billing_profiles
        SET status = $2, updated_at = NOW()
        WHERE company_id = $1
        "#,
    )
    .bind(company_id)
    .bind(status)
    .execute(pool)
    .await?;
    Ok(())
}

/// Advances the last-billed-month marker to the given period start.
pub async fn set_last_billed_month(
    pool: &PgPool,
    company_id: i64,
    period_start: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE billing_profiles
        SET last_billed_month = $2, updated_at = NOW()
        WHERE company_id = $1
        "#,
    )
    .bind(company_id)
    .bind(period_start)
    .execute(pool)
    .await?;
    Ok(())
}
