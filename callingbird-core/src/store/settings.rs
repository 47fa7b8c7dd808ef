use sqlx::PgPool;

use crate::models::assistant::{ReplyStyle, VoiceSettings};

pub async fn voice_settings(
    pool: &PgPool,
    company_id: i64,
) -> Result<Option<VoiceSettings>, sqlx::Error> {
    sqlx::query_as::<_, VoiceSettings>(
        r#"
        SELECT company_id, voice_id, language, greeting
        FROM voice_settings
        WHERE company_id = $1
        "#,
    )
    .bind(company_id)
    .fetch_optional(pool)
    .await
}

pub async fn reply_style(
    pool: &PgPool,
    company_id: i64,
) -> Result<Option<ReplyStyle>, sqlx::Error> {
    sqlx::query_as::<_, ReplyStyle>(
        r#"
        SELECT company_id, tone, formality
        FROM reply_styles
        WHERE company_id = $1
        "#,
    )
    .bind(company_id)
    .fetch_optional(pool)
    .await
}

pub async fn custom_instructions(
    pool: &PgPool,
    company_id: i64,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT instructions
        FROM custom_instructions
        WHERE company_id = $1
        "#,
    )
    .bind(company_id)
    .fetch_optional(pool)
    .await
}

pub async fn upsert_voice_settings(
    pool: &PgPool,
    company_id: i64,
    voice_id: &str,
    language: &str,
    greeting: Option<&str>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO voice_settings (company_id, voice_id, language, greeting)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (company_id) DO UPDATE
        SET voice_id = $2, language = $3, greeting = $4
        "#,
    )
    .bind(company_id)
    .bind(voice_id)
    .bind(language)
    .bind(greeting)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn upsert_custom_instructions(
    pool: &PgPool,
    company_id: i64,
    instructions: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO custom_instructions (company_id, instructions)
        VALUES ($1, $2)
        ON CONFLICT (company_id) DO UPDATE
        SET instructions = $2
        "#,
    )
    .bind(company_id)
    .bind(instructions)
    .execute(pool)
    .await?;
    Ok(())
}
