use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::CurrentCompany;
use crate::error::AppError;
use crate::state::AppState;
use crate::store;
use crate::sync::SyncOutcome;

/// Response for configuration mutations: the write result plus what the
/// coalesced sync did.
#[derive(Debug, Serialize)]
pub struct MutationResponse<T: Serialize> {
    pub data: T,
    pub sync: SyncStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Synced,
    Skipped,
}

impl From<SyncOutcome> for SyncStatus {
    fn from(outcome: SyncOutcome) -> Self {
        match outcome {
            SyncOutcome::Synced { .. } => SyncStatus::Synced,
            SyncOutcome::Skipped => SyncStatus::Skipped,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateVoiceSettings {
    pub voice_id: String,
    pub language: String,
    pub greeting: Option<String>,
}

/// `PUT /settings/voice` - update voice settings and push the new
/// configuration to the assistant.
pub async fn update_voice_settings(
    State(state): State<AppState>,
    Extension(CurrentCompany(company_id)): Extension<CurrentCompany>,
    Json(body): Json<UpdateVoiceSettings>,
) -> Result<Json<MutationResponse<()>>, AppError> {
    if body.voice_id.trim().is_empty() {
        return Err(AppError::validation("voice_id is required"));
    }
    if body.language.trim().is_empty() {
        return Err(AppError::validation("language is required"));
    }

    store::settings::upsert_voice_settings(
        &state.db,
        company_id,
        &body.voice_id,
        &body.language,
        body.greeting.as_deref(),
    )
    .await?;

    info!("Voice settings updated for company {}", company_id);

    let outcome = state.coalescer.request_sync(company_id).await?;
    Ok(Json(MutationResponse {
        data: (),
        sync: outcome.into(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateInstructions {
    pub instructions: String,
}

/// `PUT /settings/instructions` - update custom instructions.
pub async fn update_instructions(
    State(state): State<AppState>,
    Extension(CurrentCompany(company_id)): Extension<CurrentCompany>,
    Json(body): Json<UpdateInstructions>,
) -> Result<Json<MutationResponse<()>>, AppError> {
    if body.instructions.trim().is_empty() {
        return Err(AppError::validation("instructions are required"));
    }

    store::settings::upsert_custom_instructions(&state.db, company_id, &body.instructions).await?;

    let outcome = state.coalescer.request_sync(company_id).await?;
    Ok(Json(MutationResponse {
        data: (),
        sync: outcome.into(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct AppointmentTypeBody {
    pub name: String,
    pub duration_minutes: i32,
}

/// `POST /scheduling/appointment-types`
pub async fn create_appointment_type(
    State(state): State<AppState>,
    Extension(CurrentCompany(company_id)): Extension<CurrentCompany>,
    Json(body): Json<AppointmentTypeBody>,
) -> Result<Json<MutationResponse<crate::models::assistant::AppointmentType>>, AppError> {
    if body.name.trim().is_empty() {
        return Err(AppError::validation("name is required"));
    }
    if body.duration_minutes <= 0 {
        return Err(AppError::validation("duration_minutes must be positive"));
    }

    let created = store::scheduling::insert_appointment_type(
        &state.db,
        company_id,
        &body.name,
        body.duration_minutes,
    )
    .await?;

    let outcome = state.coalescer.request_sync(company_id).await?;
    Ok(Json(MutationResponse {
        data: created,
        sync: outcome.into(),
    }))
}

/// `PUT /scheduling/appointment-types/:id`
pub async fn update_appointment_type(
    State(state): State<AppState>,
    Extension(CurrentCompany(company_id)): Extension<CurrentCompany>,
    Path(id): Path<i64>,
    Json(body): Json<AppointmentTypeBody>,
) -> Result<Json<MutationResponse<crate::models::assistant::AppointmentType>>, AppError> {
    if body.name.trim().is_empty() {
        return Err(AppError::validation("name is required"));
    }
    if body.duration_minutes <= 0 {
        return Err(AppError::validation("duration_minutes must be positive"));
    }

    let updated = store::scheduling::update_appointment_type(
        &state.db,
        company_id,
        id,
        &body.name,
        body.duration_minutes,
    )
    .await?
    .ok_or_else(|| AppError::not_found("appointment type"))?;

    let outcome = state.coalescer.request_sync(company_id).await?;
    Ok(Json(MutationResponse {
        data: updated,
        sync: outcome.into(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct PublishBody {
    pub published: bool,
}

/// `PUT /products/:id/publish` - (un)publish a catalog product.
pub async fn set_product_published(
    State(state): State<AppState>,
    Extension(CurrentCompany(company_id)): Extension<CurrentCompany>,
    Path(id): Path<i64>,
    Json(body): Json<PublishBody>,
) -> Result<Json<MutationResponse<crate::models::assistant::Product>>, AppError> {
    let updated = store::products::set_published(&state.db, company_id, id, body.published)
        .await?
        .ok_or_else(|| AppError::not_found("product"))?;

    let outcome = state.coalescer.request_sync(company_id).await?;
    Ok(Json(MutationResponse {
        data: updated,
        sync: outcome.into(),
    }))
}
