use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::crypto::EncryptedSecret;
use crate::models::assistant::ConnectedStores;
use crate::models::integration::{CalendarConnection, CommerceConnection};

const CALENDAR_COLUMNS: &str = r#"
    company_id, provider,
    access_token_iv, access_token_ciphertext, access_token_tag,
    refresh_token_iv, refresh_token_ciphertext, refresh_token_tag,
    expires_at, created_at, updated_at
"#;

pub async fn calendar_connections(
    pool: &PgPool,
    company_id: i64,
) -> Result<Vec<CalendarConnection>, sqlx::Error> {
    sqlx::query_as::<_, CalendarConnection>(&format!(
        r#"
        SELECT {CALENDAR_COLUMNS}
        FROM calendar_connections
        WHERE company_id = $1
        "#
    ))
    .bind(company_id)
    .fetch_all(pool)
    .await
}

pub async fn calendar_connection(
    pool: &PgPool,
    company_id: i64,
    provider: &str,
) -> Result<Option<CalendarConnection>, sqlx::Error> {
    sqlx::query_as::<_, CalendarConnection>(&format!(
        r#"
        SELECT {CALENDAR_COLUMNS}
        FROM calendar_connections
        WHERE company_id = $1 AND provider = $2
        "#
    ))
    .bind(company_id)
    .bind(provider)
    .fetch_optional(pool)
    .await
}

/// Replaces the stored access token after a refresh.
pub async fn update_access_token(
    pool: &PgPool,
    company_id: i64,
    provider: &str,
    token: &EncryptedSecret,
    expires_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE calendar_connections
        SET access_token_iv = $3,
            access_token_ciphertext = $4,
            access_token_tag = $5,
            expires_at = $6,
            updated_at = NOW()
        WHERE company_id = $1 AND provider = $2
        "#,
    )
    .bind(company_id)
    .bind(provider)
    .bind(&token.iv)
    .bind(&token.ciphertext)
    .bind(&token.tag)
    .bind(expires_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn commerce_connection(
    pool: &PgPool,
    company_id: i64,
    provider: &str,
) -> Result<Option<CommerceConnection>, sqlx::Error> {
    sqlx::query_as::<_, CommerceConnection>(
        r#"
        SELECT company_id, provider, shop_url, api_key, created_at, updated_at
        FROM commerce_connections
        WHERE company_id = $1 AND provider = $2
        "#,
    )
    .bind(company_id)
    .bind(provider)
    .fetch_optional(pool)
    .await
}

/// Shopify/WooCommerce connection booleans for the sync snapshot.
pub async fn connected_stores(
    pool: &PgPool,
    company_id: i64,
) -> Result<ConnectedStores, sqlx::Error> {
    let providers = sqlx::query_scalar::<_, String>(
        r#"
        SELECT provider
        FROM commerce_connections
        WHERE company_id = $1
        "#,
    )
    .bind(company_id)
    .fetch_all(pool)
    .await?;

    let mut stores = ConnectedStores::default();
    for provider in providers {
        match provider.as_str() {
            "shopify" => stores.shopify = true,
            "woocommerce" => stores.woocommerce = true,
            _ => {}
        }
    }
    Ok(stores)
}
