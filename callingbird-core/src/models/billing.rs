use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Billing lifecycle status for a tenant.
///
/// Transitions are monotonic trial -> active in the billing flow; `past_due`
/// is set by payment reconciliation, and anything else is an admin override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar")]
pub enum BillingStatus {
    #[sqlx(rename = "trial")]
    Trial,

    #[sqlx(rename = "active")]
    Active,

    #[sqlx(rename = "past_due")]
    PastDue,
}

impl fmt::Display for BillingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillingStatus::Trial => write!(f, "trial"),
            BillingStatus::Active => write!(f, "active"),
            BillingStatus::PastDue => write!(f, "past_due"),
        }
    }
}

/// Billing profile model - exactly one per company.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BillingProfile {
    /// Owning company id (also the primary key)
    pub company_id: i64,

    /// Per-minute price override; falls back to the global default when unset
    pub price_per_minute: Option<Decimal>,

    /// Lifecycle status
    pub status: BillingStatus,

    /// End of the free trial, if one was granted
    pub trial_ends_at: Option<DateTime<Utc>>,

    /// Customer id at the payment provider
    pub mollie_customer_id: Option<String>,

    /// Recurring-payment mandate id at the payment provider
    pub mollie_mandate_id: Option<String>,

    /// Start of the most recently billed period
    pub last_billed_month: Option<DateTime<Utc>>,

    /// Address invoices are mailed to; falls back to the company email
    pub billing_email: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
