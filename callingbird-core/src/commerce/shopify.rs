use serde::Deserialize;

use crate::commerce::{find_best_match, CommerceError, StoreProduct};

#[derive(Debug, Deserialize)]
struct ShopifyProduct {
    id: i64,
    title: String,
}

#[derive(Debug, Deserialize)]
struct ProductsResponse {
    products: Vec<ShopifyProduct>,
}

/// Shopify Admin REST client for product lookups.
pub struct ShopifyClient {
    http: reqwest::Client,
    shop_url: String,
    access_token: String,
}

impl ShopifyClient {
    pub fn new(shop_url: String, access_token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            shop_url,
            access_token,
        }
    }

    pub async fn list_products(&self) -> Result<Vec<StoreProduct>, CommerceError> {
        let response = self
            .http
            .get(format!(
                "{}/admin/api/2024-01/products.json",
                self.shop_url.trim_end_matches('/')
            ))
            .header("X-Shopify-Access-Token", &self.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(CommerceError::Api { status, message });
        }

        let body: ProductsResponse = response.json().await?;
        Ok(body
            .products
            .into_iter()
            .map(|p| StoreProduct {
                id: p.id.to_string(),
                name: p.title,
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
