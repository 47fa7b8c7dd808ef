use sqlx::PgPool;

use crate::models::assistant::Product;

/// All published catalog products for a company.
pub async fn published_products(
    pool: &PgPool,
    company_id: i64,
) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        r#"
        SELECT id, company_id, name, price, description, published
        FROM products
        WHERE company_id = $1 AND published = true
        ORDER BY name ASC
        "#,
    )
    .bind(company_id)
    .fetch_all(pool)
    .await
}

pub async fn set_published(
    pool: &PgPool,
    company_id: i64,
    product_id: i64,
    published: bool,
) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        r#"
        UPDATE products
        SET published = $3
        WHERE id = $1 AND company_id = $2
        RETURNING id, company_id, name, price, description, published
        "#,
    )
    .bind(product_id)
    .bind(company_id)
    .bind(published)
    .fetch_optional(pool)
    .await
}
