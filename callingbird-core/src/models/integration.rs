use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::crypto::{CryptoError, EncryptedSecret, TokenCipher};

/// An OAuth calendar connection (Google or Outlook) with tokens encrypted
/// at rest. IV, ciphertext and auth tag are stored as separate columns.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CalendarConnection {
    pub company_id: i64,

    /// `google` or `outlook`
    pub provider: String,

    pub access_token_iv: String,
    pub access_token_ciphertext: String,
    pub access_token_tag: String,

    pub refresh_token_iv: String,
    pub refresh_token_ciphertext: String,
    pub refresh_token_tag: String,

    /// Access token expiry
    pub expires_at: DateTime<Utc>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CalendarConnection {
    /// Decrypts the stored access token. Explicit and fallible.
    pub fn decrypt_access_token(&self, cipher: &TokenCipher) -> Result<String, CryptoError> {
        cipher.decrypt(&EncryptedSecret {
            iv: self.access_token_iv.clone(),
            ciphertext: self.access_token_ciphertext.clone(),
            tag: self.access_token_tag.clone(),
        })
    }

    /// Decrypts the stored refresh token. Explicit and fallible.
    pub fn decrypt_refresh_token(&self, cipher: &TokenCipher) -> Result<String, CryptoError> {
        cipher.decrypt(&EncryptedSecret {
            iv: self.refresh_token_iv.clone(),
            ciphertext: self.refresh_token_ciphertext.clone(),
            tag: self.refresh_token_tag.clone(),
        })
    }
}

/// A connected commerce store (Shopify or WooCommerce).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CommerceConnection {
    pub company_id: i64,

    /// `shopify` or `woocommerce`
    pub provider: String,

    /// Base URL of the store
    pub shop_url: String,

    /// API credential for the store
    pub api_key: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
