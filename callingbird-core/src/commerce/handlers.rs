use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;

use crate::auth::CurrentCompany;
use crate::commerce::shopify::ShopifyClient;
use crate::commerce::woocommerce::WooCommerceClient;
use crate::commerce::{CommerceError, MatchError, StoreProduct};
use crate::error::AppError;
use crate::state::AppState;
use crate::store;

#[derive(Debug, Deserialize)]
pub struct MatchQuery {
    pub name: String,
}

/// `GET /commerce/:provider/products/match?name=...` - fuzzy product lookup
/// in the tenant's connected store.
pub async fn match_product(
    State(state): State<AppState>,
    Extension(CurrentCompany(company_id)): Extension<CurrentCompany>,
    Path(provider): Path<String>,
    Query(query): Query<MatchQuery>,
) -> Result<Json<StoreProduct>, AppError> {
    if query.name.trim().is_empty() {
        return Err(AppError::validation("name is required"));
    }
    if provider != "shopify" && provider != "woocommerce" {
        return Err(AppError::validation("provider must be shopify or woocommerce"));
    }

    let connection = store::integrations::commerce_connection(&state.db, company_id, &provider)
        .await?
        .ok_or_else(|| AppError::not_found("store connection"))?;

    let result = match provider.as_str() {
        "shopify" => {
            ShopifyClient::new(connection.shop_url, connection.api_key)
                .find_product(&query.name)
                .await
        }
        _ => {
            WooCommerceClient::new(connection.shop_url, &connection.api_key)?
                .find_product(&query.name)
                .await
        }
    };

    match result {
        Ok(product) => Ok(Json(product)),
        Err(e) => Err(e.into()),
    }
}

impl From<CommerceError> for AppError {
    fn from(e: CommerceError) -> Self {
        match e {
            CommerceError::Match(MatchError::NoMatch(_)) => AppError::not_found("matching product"),
            CommerceError::Match(err @ MatchError::MultipleMatches(_)) => {
                AppError::Validation(err.to_string())
            }
            CommerceError::BadCredentials => {
                AppError::Validation("store credentials are malformed".to_string())
            }
            CommerceError::Api { status, message } => AppError::Upstream { status, message },
            CommerceError::Http(err) => AppError::Upstream {
                status: err.status().map(|s| s.as_u16()).unwrap_or(500),
                message: err.to_string(),
            },
        }
    }
}
