pub mod handlers;
pub mod matcher;
pub mod shopify;
pub mod woocommerce;

pub use matcher::{dice_coefficient, find_best_match, MatchError};

/// Error from a commerce store lookup.
#[derive(Debug, thiserror::Error)]
pub enum CommerceError {
    #[error("Store returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error("Store credentials are malformed")]
    BadCredentials,
}

/// A store product, provider-agnostic.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StoreProduct {
    pub id: String,
    pub name: String,
}
