//! CallingBird core: multi-tenant voice-assistant backend.
//!
//! Companies configure voice assistants, scheduling, product knowledge and
//! billing; the backend coalesces configuration changes into assistant
//! syncs and runs usage-based monthly billing.

pub mod auth;
pub mod billing;
pub mod calendar;
pub mod commerce;
pub mod config;
pub mod crypto;
pub mod db;
pub mod email;
pub mod error;
pub mod models;
pub mod payments;
pub mod state;
pub mod store;
pub mod sync;
