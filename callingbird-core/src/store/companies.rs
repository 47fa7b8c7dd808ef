use sqlx::PgPool;

use crate::models::company::{Caller, Company, CompanyDetails, OpeningHours};

/// Fetches a company by id.
pub async fn get_company(pool: &PgPool, company_id: i64) -> Result<Option<Company>, sqlx::Error> {
    sqlx::query_as::<_, Company>(
        r#"
        SELECT id, name, email, phone, assistant_id, created_at, updated_at
        FROM companies
        WHERE id = $1
        "#,
    )
    .bind(company_id)
    .fetch_optional(pool)
    .await
}

pub async fn get_details(
    pool: &PgPool,
    company_id: i64,
) -> Result<Option<CompanyDetails>, sqlx::Error> {
    sqlx::query_as::<_, CompanyDetails>(
        r#"
        SELECT company_id, description, address, website, extra_info
        FROM company_details
        WHERE company_id = $1
        "#,
    )
    .bind(company_id)
    .fetch_optional(pool)
    .await
}

pub async fn get_opening_hours(
    pool: &PgPool,
    company_id: i64,
) -> Result<Vec<OpeningHours>, sqlx::Error> {
    sqlx::query_as::<_, OpeningHours>(
        r#"
        SELECT company_id, weekday, opens, closes, closed
        FROM opening_hours
        WHERE company_id = $1
        ORDER BY weekday ASC
        "#,
    )
    .bind(company_id)
    .fetch_all(pool)
    .await
}

pub async fn get_callers(pool: &PgPool, company_id: i64) -> Result<Vec<Caller>, sqlx::Error> {
    sqlx::query_as::<_, Caller>(
        r#"
        SELECT id, company_id, name, phone
        FROM callers
        WHERE company_id = $1
        ORDER BY name ASC
        "#,
    )
    .bind(company_id)
    .fetch_all(pool)
    .await
}

/// Persists the external assistant id returned by the configuration provider.
pub async fn set_assistant_id(
    pool: &PgPool,
    company_id: i64,
    assistant_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE companies
        SET assistant_id = $2, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(company_id)
    .bind(assistant_id)
    .execute(pool)
    .await?;
    Ok(())
}
