use sqlx::PgPool;
use uuid::Uuid;

use crate::models::invoice::{Invoice, InvoiceStatus, NewInvoice};

const INVOICE_COLUMNS: &str = r#"
    id, company_id, number, amount, currency, status,
    issued_at, due_at, usage_seconds, price_per_minute,
    payment_id, payment_link, metadata, period_start, period_end,
    created_at, updated_at
"#;

/// Persists a new invoice and returns the stored row.
pub async fn insert_invoice(pool: &PgPool, new: NewInvoice) -> Result<Invoice, sqlx::Error> {
    sqlx::query_as::<_, Invoice>(&format!(
        r#"
        INSERT INTO invoices (
            id, company_id, number, amount, currency, status,
            issued_at, due_at, usage_seconds, price_per_minute,
            payment_id, payment_link, metadata, period_start, period_end
        ) VALUES (
            $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15
        )
        RETURNING {INVOICE_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(new.company_id)
    .bind(&new.number)
    .bind(new.amount)
    .bind(&new.currency)
    .bind(new.status)
    .bind(new.issued_at)
    .bind(new.due_at)
    .bind(new.usage_seconds)
    .bind(new.price_per_minute)
    .bind(&new.payment_id)
    .bind(&new.payment_link)
    .bind(&new.metadata)
    .bind(new.period_start)
    .bind(new.period_end)
    .fetch_one(pool)
    .await
}

/// The most recent invoice for a company, by billing period end.
pub async fn latest_invoice(
    pool: &PgPool,
    company_id: i64,
) -> Result<Option<Invoice>, sqlx::Error> {
    sqlx::query_as::<_, Invoice>(&format!(
        r#"
        SELECT {INVOICE_COLUMNS}
        FROM invoices
        WHERE company_id = $1
        ORDER BY period_end DESC
        LIMIT 1
        "#
    ))
    .bind(company_id)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_payment_id(
    pool: &PgPool,
    payment_id: &str,
) -> Result<Option<Invoice>, sqlx::Error> {
    sqlx::query_as::<_, Invoice>(&format!(
        r#"
        SELECT {INVOICE_COLUMNS}
        FROM invoices
        WHERE payment_id = $1
        "#
    ))
    .bind(payment_id)
    .fetch_optional(pool)
    .await
}

pub async fn update_status(
    pool: &PgPool,
    invoice_id: Uuid,
    status: InvoiceStatus,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE invoices
        SET status = $2, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(invoice_id)
    .bind(status)
    .execute(pool)
    .await?;
    Ok(())
}
