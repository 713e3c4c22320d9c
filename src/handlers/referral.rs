use crate::config::security_config::Claims;
use crate::error::ApiError;
use crate::models::dtos::{ClaimReferralRequest, EarningsResponse, ReferralCodeResponse};
use crate::models::AppState;
use crate::services::referral_service::ReferralService;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use std::sync::Arc;
use validator::Validate;

#[utoipa::path(
    get,
    path = "/api/referrals/code",
    responses(
        (status = 200, description = "The caller's referral code, generated on first use", body = ReferralCodeResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearerAuth" = [])),
    tag = "Referrals"
)]
pub async fn get_referral_code(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ReferralCodeResponse>, (StatusCode, String)> {
    let user_id = claims.user_id()?;
    let mut conn = state.db.get().map_err(ApiError::from)?;
    let code = ReferralService::ensure_referral_code(&mut conn, user_id)?;
    Ok(Json(ReferralCodeResponse { code }))
}

#[utoipa::path(
    post,
    path = "/api/referrals/claim",
    request_body = ClaimReferralRequest,
    responses(
        (status = 200, description = "Upline snapshot recorded"),
        (status = 400, description = "Invalid code or referral already claimed"),
        (status = 404, description = "Referral code not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearerAuth" = [])),
    tag = "Referrals"
)]
pub async fn claim_referral(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<ClaimReferralRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    req.validate().map_err(|e| ApiError::Validation(e.to_string()))?;
    let user_id = claims.user_id()?;
    let mut conn = state.db.get().map_err(ApiError::from)?;
    ReferralService::link_referral(&mut conn, user_id, req.code.trim())?;
    Ok(StatusCode::OK)
}

#[utoipa::path(
    get,
    path = "/api/referrals/earnings",
    responses(
        (status = 200, description = "Commissions earned by the caller", body = EarningsResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearerAuth" = [])),
    tag = "Referrals"
)]
pub async fn get_referral_earnings(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<EarningsResponse>, (StatusCode, String)> {
    let user_id = claims.user_id()?;
    let mut conn = state.db.get().map_err(ApiError::from)?;
    let earnings = ReferralService::earnings_for_user(&mut conn, user_id)?;
    let total = earnings.iter().map(|e| e.amount).sum::<Decimal>();
    Ok(Json(EarningsResponse { earnings, total }))
}
