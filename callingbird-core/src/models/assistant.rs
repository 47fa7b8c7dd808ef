use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::company::{Caller, Company, CompanyDetails, OpeningHours};

/// Voice configuration for a tenant's assistant.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VoiceSettings {
    pub company_id: i64,
    pub voice_id: String,
    pub language: String,
    pub greeting: Option<String>,
}

/// How the assistant should phrase its replies.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReplyStyle {
    pub company_id: i64,
    pub tone: String,
    pub formality: String,
}

/// A bookable appointment type.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AppointmentType {
    pub id: i64,
    pub company_id: i64,
    pub name: String,
    pub duration_minutes: i32,
}

/// A staff member appointments can be booked with.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StaffMember {
    pub id: i64,
    pub company_id: i64,
    pub name: String,
    pub role: Option<String>,
}

/// A published catalog product the assistant can answer questions about.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub company_id: i64,
    pub name: String,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub published: bool,
}

/// The single active calendar provider for a tenant. When both Google and
/// Outlook are connected, Google takes priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarProvider {
    Google,
    Outlook,
}

/// Which commerce stores are connected for a tenant.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ConnectedStores {
    pub shopify: bool,
    pub woocommerce: bool,
}

impl ConnectedStores {
    /// Names of the connected stores, for per-sync observability logging.
    pub fn names(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.shopify {
            out.push("shopify");
        }
        if self.woocommerce {
            out.push("woocommerce");
        }
        out
    }
}

/// Scheduling context pushed to the assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingContext {
    pub appointment_types: Vec<AppointmentType>,
    pub staff: Vec<StaffMember>,
}

/// Ephemeral, materialized view of a tenant's assistant configuration.
///
/// Built on demand immediately before a sync call and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    pub company: Company,
    pub details: Option<CompanyDetails>,
    pub hours: Vec<OpeningHours>,
    pub callers: Vec<Caller>,
    pub voice: VoiceSettings,
    pub reply_style: ReplyStyle,
    pub custom_instructions: Option<String>,
    pub scheduling: SchedulingContext,
    pub calendar_provider: Option<CalendarProvider>,
    pub stores: ConnectedStores,
    pub catalog: Vec<Product>,
}
