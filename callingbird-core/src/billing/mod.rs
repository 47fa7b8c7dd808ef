pub mod handlers;
pub mod period;
pub mod run;
pub mod webhook;

pub use period::{BillingPeriod, PeriodDecision, SkipReason};
pub use run::{BillingRunSummary, BillingRunner, MonthYear};
pub use webhook::{handle_mollie_webhook, map_provider_status};
