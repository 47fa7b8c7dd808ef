use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// Total recorded call seconds for a company over `[start, end)`.
pub async fn usage_seconds(
    pool: &PgPool,
    company_id: i64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COALESCE(SUM(duration_seconds), 0)
        FROM call_records
        WHERE company_id = $1
            AND started_at >= $2
            AND started_at < $3
        "#,
    )
    .bind(company_id)
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await
}
