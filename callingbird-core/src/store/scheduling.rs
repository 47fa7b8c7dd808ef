use sqlx::PgPool;

use crate::models::assistant::{AppointmentType, StaffMember};

pub async fn appointment_types(
    pool: &PgPool,
    company_id: i64,
) -> Result<Vec<AppointmentType>, sqlx::Error> {
    sqlx::query_as::<_, AppointmentType>(
        r#"
        SELECT id, company_id, name, duration_minutes
        FROM appointment_types
        WHERE company_id = $1
        ORDER BY name ASC
        "#,
    )
    .bind(company_id)
    .fetch_all(pool)
    .await
}

pub async fn staff(pool: &PgPool, company_id: i64) -> Result<Vec<StaffMember>, sqlx::Error> {
    sqlx::query_as::<_, StaffMember>(
        r#"
        SELECT id, company_id, name, role
        FROM staff_members
        WHERE company_id = $1
        ORDER BY name ASC
        "#,
    )
    .bind(company_id)
    .fetch_all(pool)
    .await
}

pub async fn insert_appointment_type(
    pool: &PgPool,
    company_id: i64,
    name: &str,
    duration_minutes: i32,
) -> Result<AppointmentType, sqlx::Error> {
    sqlx::query_as::<_, AppointmentType>(
        r#"
        INSERT INTO appointment_types (company_id, name, duration_minutes)
        VALUES ($1, $2, $3)
        RETURNING id, company_id, name, duration_minutes
        "#,
    )
    .bind(company_id)
    .bind(name)
    .bind(duration_minutes)
    .fetch_one(pool)
    .await
}

/// Updates an appointment type; `None` when it does not exist for the company.
pub async fn update_appointment_type(
    pool: &PgPool,
    company_id: i64,
    id: i64,
    name: &str,
    duration_minutes: i32,
) -> Result<Option<AppointmentType>, sqlx::Error> {
    sqlx::query_as::<_, AppointmentType>(
        r#"
        UPDATE appointment_types
        SET name = $3, duration_minutes = $4
        WHERE id = $1 AND company_id = $2
        RETURNING id, company_id, name, duration_minutes
        "#,
    )
    .bind(id)
    .bind(company_id)
    .bind(name)
    .bind(duration_minutes)
    .fetch_optional(pool)
    .await
}
