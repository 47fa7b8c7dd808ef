use serde::Deserialize;

use crate::commerce::{find_best_match, CommerceError, StoreProduct};

#[derive(Debug, Deserialize)]
struct WooProduct {
    id: i64,
    name: String,
}

/// WooCommerce REST client for product lookups. Credentials are the
/// consumer key and secret, stored as `key:secret`.
pub struct WooCommerceClient {
    http: reqwest::Client,
    shop_url: String,
    consumer_key: String,
    consumer_secret: String,
}

impl WooCommerceClient {
    pub fn new(shop_url: String, api_key: &str) -> Result<Self, CommerceError> {
        let (consumer_key, consumer_secret) = api_key
            .split_once(':')
            .ok_or(CommerceError::BadCredentials)?;
        Ok(Self {
            http: reqwest::Client::new(),
            shop_url,
            consumer_key: consumer_key.to_string(),
            consumer_secret: consumer_secret.to_string(),
        })
    }

    pub async fn list_products(&self) -> Result<Vec<StoreProduct>, CommerceError> {
        let response = self
            .http
            .get(format!(
                "{}/wp-json/wc/v3/products",
                self.shop_url.trim_end_matches('/')
            ))
            .basic_auth(&self.consumer_key, Some(&self.consumer_secret))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(CommerceError::Api { status, message });
        }

        let body: Vec<WooProduct> = response.json().await?;
        Ok(body
            .into_iter()
            .map(|p| StoreProduct {
                id: p.id.to_string(),
                name: p.name,
            })
            .collect())
    }

    /// Looks up a product by fuzzy name match.
    pub async fn find_product(&self, name: &str) -> Result<StoreProduct, CommerceError> {
        let products = self.list_products().await?;
        let winner = find_best_match(name, &products, |p| p.name.as_str())?;
        Ok(winner.clone())
    }
}
