pub mod assistant;
pub mod billing;
pub mod company;
pub mod integration;
pub mod invoice;

pub use assistant::{AssistantConfig, CalendarProvider, ConnectedStores};
pub use billing::{BillingProfile, BillingStatus};
pub use company::Company;
pub use invoice::{Invoice, InvoiceStatus, NewInvoice};
