use crate::config::security_config::Claims;
use crate::error::ApiError;
use crate::models::dtos::{BankDetailsRequest, BankDetailsResponse};
use crate::models::AppState;
use crate::services::recipient_service::RecipientService;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;
use validator::Validate;

#[utoipa::path(
    put,
    path = "/api/bank_details",
    request_body = BankDetailsRequest,
    responses(
        (status = 200, description = "Payout destination updated", body = BankDetailsResponse),
        (status = 400, description = "Invalid account details"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Processor rejected the recipient; nothing changed")
    ),
    security(("bearerAuth" = [])),
    tag = "Wallet"
)]
pub async fn update_bank_details(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<BankDetailsRequest>,
) -> Result<Json<BankDetailsResponse>, (StatusCode, String)> {
    req.validate().map_err(|e| ApiError::Validation(e.to_string()))?;
    let user_id = claims.user_id()?;
    let response = RecipientService::rotate(state, user_id, req).await?;
    Ok(Json(response))
}
