use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Invoice status enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar")]
pub enum InvoiceStatus {
    #[sqlx(rename = "paid")]
    Paid,

    #[sqlx(rename = "pending")]
    Pending,

    #[sqlx(rename = "open")]
    Open,

    #[sqlx(rename = "processing")]
    Processing,

    #[sqlx(rename = "failed")]
    Failed,
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvoiceStatus::Paid => write!(f, "paid"),
            InvoiceStatus::Pending => write!(f, "pending"),
            InvoiceStatus::Open => write!(f, "open"),
            InvoiceStatus::Processing => write!(f, "processing"),
            InvoiceStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Invoice model representing one billed usage period for a tenant.
///
/// The amount is computed once at creation (`ceil(usage_seconds/60) *
/// price_per_minute`, rounded to 2 decimals) and never recomputed; only the
/// status changes afterwards, via payment webhooks.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    /// Unique row identifier
    pub id: Uuid,

    /// Owning company id
    pub company_id: i64,

    /// Human-readable unique invoice number
    /// (`CB-{companyId}-{startYYYYMMDD}-{endYYYYMMDD}-{6-digit-suffix}`)
    pub number: String,

    /// Invoice amount, 2 decimal places
    pub amount: Decimal,

    /// Currency code (ISO 4217)
    pub currency: String,

    /// Invoice status
    pub status: InvoiceStatus,

    /// Date when the invoice was issued
    pub issued_at: DateTime<Utc>,

    /// Payment due date
    pub due_at: Option<DateTime<Utc>>,

    /// Recorded call seconds in the billing period
    pub usage_seconds: i64,

    /// Price-per-minute snapshot at creation time
    pub price_per_minute: Decimal,

    /// Payment id assigned by the payment provider
    pub payment_id: Option<String>,

    /// Hosted checkout link for the payment
    pub payment_link: Option<String>,

    /// Arbitrary metadata blob (billing email, company name, period bounds)
    pub metadata: Option<Value>,

    /// Billing period start (inclusive)
    pub period_start: DateTime<Utc>,

    /// Billing period end (exclusive)
    pub period_end: DateTime<Utc>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to persist a new invoice.
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub company_id: i64,
    pub number: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: InvoiceStatus,
    pub issued_at: DateTime<Utc>,
    pub due_at: Option<DateTime<Utc>>,
    pub usage_seconds: i64,
    pub price_per_minute: Decimal,
    pub payment_id: Option<String>,
    pub payment_link: Option<String>,
    pub metadata: Option<Value>,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
}
