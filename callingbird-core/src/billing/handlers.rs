use axum::extract::State;
use axum::{Form, Json};
use serde::Deserialize;
use tracing::info;

use crate::billing::period::valid_month;
use crate::billing::run::{BillingRunSummary, MonthYear};
use crate::billing::webhook::handle_mollie_webhook;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RunRequest {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

/// `POST /admin/billing/run` - run monthly billing for all billable
/// tenants, optionally as of an explicit month.
pub async fn run_billing(
    State(state): State<AppState>,
    body: Option<Json<RunRequest>>,
) -> Result<Json<BillingRunSummary>, AppError> {
    let request = body.map(|Json(b)| b).unwrap_or_default();

    let as_of = match (request.month, request.year) {
        (None, None) => None,
        (Some(month), Some(year)) => {
            if !valid_month(month) {
                return Err(AppError::validation("month must be between 1 and 12"));
            }
            Some(MonthYear { month, year })
        }
        _ => {
            return Err(AppError::validation(
                "month and year must be provided together",
            ));
        }
    };

    info!("Admin billing run requested (as_of: {:?})", as_of);
    let summary = state.runner.run(as_of).await?;
    Ok(Json(summary))
}

/// Mollie webhook body: form-encoded, a single payment id.
#[derive(Debug, Deserialize)]
pub struct WebhookBody {
    pub id: String,
}

/// `POST /billing/webhook` - payment status reconciliation callback.
pub async fn mollie_webhook(
    State(state): State<AppState>,
    Form(body): Form<WebhookBody>,
) -> Result<&'static str, AppError> {
    if body.id.trim().is_empty() {
        return Err(AppError::validation("id is required"));
    }

    handle_mollie_webhook(
        &state.db,
        state.payments.as_ref(),
        state.mailer.as_ref(),
        &body.id,
    )
    .await?;

    Ok("ok")
}
