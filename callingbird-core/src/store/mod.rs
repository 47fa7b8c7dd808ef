//! Repository layer: thin parameterized SQL wrappers over the relational
//! schema. Database errors are surfaced unmodified; services decide what to
//! degrade and what to propagate.

pub mod billing;
pub mod companies;
pub mod integrations;
pub mod invoices;
pub mod products;
pub mod scheduling;
pub mod settings;
pub mod usage;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::{InvoiceStatus, NewInvoice};
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;
    use sqlx::PgPool;
    use std::str::FromStr;

    async fn create_test_pool() -> Result<PgPool, sqlx::Error> {
        let url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/callingbird_test".to_string());
        let pool = PgPool::connect(&url).await?;
        sqlx::migrate!("./migrations").run(&pool).await.expect("migrations");
        Ok(pool)
    }

    async fn create_test_company(pool: &PgPool) -> i64 {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO companies (name, email, phone)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind("Acme Test")
        .bind("owner@acme.test")
        .bind("+31600000000")
        .fetch_one(pool)
        .await
        .expect("insert company")
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_invoice_roundtrip_and_latest_by_period() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        let company_id = create_test_company(&pool).await;

        let issued_at = Utc::now();
        let mut new = NewInvoice {
            company_id,
            number: format!("CB-{}-20240101-20240201-000001", company_id),
            amount: Decimal::from_str("15.00").unwrap(),
            currency: "EUR".to_string(),
            status: InvoiceStatus::Open,
            issued_at,
            due_at: Some(issued_at + Duration::days(14)),
            usage_seconds: 5990,
            price_per_minute: Decimal::from_str("0.15").unwrap(),
            payment_id: Some(format!("tr_test_{company_id}")),
            payment_link: None,
            metadata: Some(serde_json::json!({ "billing_email": "owner@acme.test" })),
            period_start: issued_at - Duration::days(31),
            period_end: issued_at - Duration::days(1),
        };
        let first = invoices::insert_invoice(&pool, new.clone()).await.expect("insert");
        assert_eq!(first.company_id, company_id);
        assert_eq!(first.status, InvoiceStatus::Open);

        // A later period becomes the latest invoice.
        new.number = format!("CB-{}-20240201-20240301-000002", company_id);
        new.payment_id = None;
        new.period_start = issued_at - Duration::days(1) + Duration::seconds(1);
        new.period_end = issued_at;
        let second = invoices::insert_invoice(&pool, new).await.expect("insert");

        let latest = invoices::latest_invoice(&pool, company_id)
            .await
            .expect("query")
            .expect("invoice exists");
        assert_eq!(latest.id, second.id);

        let by_payment = invoices::find_by_payment_id(&pool, &format!("tr_test_{company_id}"))
            .await
            .expect("query")
            .expect("found");
        assert_eq!(by_payment.id, first.id);

        invoices::update_status(&pool, first.id, InvoiceStatus::Paid)
            .await
            .expect("update");
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_usage_sums_only_inside_period() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        let company_id = create_test_company(&pool).await;

        let start = Utc::now() - Duration::days(30);
        let end = Utc::now();
        for (offset_days, seconds) in [(5_i64, 120_i32), (10, 45), (40, 600)] {
            sqlx::query(
                r#"
                INSERT INTO call_records (company_id, started_at, duration_seconds)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(company_id)
            .bind(end - Duration::days(offset_days))
            .bind(seconds)
            .execute(&pool)
            .await
            .expect("insert call record");
        }

        // The 40-day-old record falls outside [start, end).
        let total = usage::usage_seconds(&pool, company_id, start, end)
            .await
            .expect("sum");
        assert_eq!(total, 165);
    }
}
