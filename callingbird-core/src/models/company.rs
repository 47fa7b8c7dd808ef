use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Company (tenant) model.
///
/// The company is the unit of data isolation: every other entity hangs off
/// a company id. Companies are created at registration and never hard-deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    /// Unique identifier for the company
    pub id: i64,

    /// Display name of the company
    pub name: String,

    /// Primary contact email address
    pub email: String,

    /// Primary phone number
    pub phone: Option<String>,

    /// External assistant id at the configuration provider, once created
    pub assistant_id: Option<String>,

    /// Timestamp when the company was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the company was last updated
    pub updated_at: DateTime<Utc>,
}

/// Free-form company presentation details shown to callers.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompanyDetails {
    pub company_id: i64,
    pub description: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub extra_info: Option<String>,
}

/// A single weekday's opening hours. `weekday` follows chrono's numbering
/// (Monday = 0).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OpeningHours {
    pub company_id: i64,
    pub weekday: i16,
    pub opens: Option<String>,
    pub closes: Option<String>,
    pub closed: bool,
}

/// A known caller for the company (regulars the assistant can greet by name).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Caller {
    pub id: i64,
    pub company_id: i64,
    pub name: String,
    pub phone: String,
}
