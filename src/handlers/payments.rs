use crate::config::security_config::Claims;
use crate::error::ApiError;
use crate::models::dtos::{
    InitializePaymentResponse, InitializePromisePaymentRequest, InitializeSubscriptionRequest,
    VerifyPaymentResponse,
};
use crate::models::AppState;
use crate::services::payment_service::PaymentService;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;
use tracing::error;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/payments/promise",
    request_body = InitializePromisePaymentRequest,
    responses(
        (status = 200, description = "Charge initialized", body = InitializePaymentResponse),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Promise not found"),
        (status = 502, description = "Payment processor error")
    ),
    tag = "Payments"
)]
pub async fn initialize_promise_payment(
    State(state): State<Arc<AppState>>,
    Json(req): Json<InitializePromisePaymentRequest>,
) -> Result<Json<InitializePaymentResponse>, (StatusCode, String)> {
    req.validate().map_err(|e| {
        error!("payments.promise: validation failed: {}", e);
        ApiError::Validation(e.to_string())
    })?;

    let response = PaymentService::initialize_promise_payment(state, req).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/payments/subscription",
    request_body = InitializeSubscriptionRequest,
    responses(
        (status = 200, description = "Charge initialized", body = InitializePaymentResponse),
        (status = 400, description = "Invalid plan"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Payment processor error")
    ),
    security(("bearerAuth" = [])),
    tag = "Payments"
)]
pub async fn initialize_subscription_payment(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<InitializeSubscriptionRequest>,
) -> Result<Json<InitializePaymentResponse>, (StatusCode, String)> {
    let user_id = claims.user_id()?;
    let response = PaymentService::initialize_subscription_payment(state, user_id, req.plan).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/payments/verify/{reference}",
    params(("reference" = String, Path, description = "Charge reference")),
    responses(
        (status = 200, description = "Verification result", body = VerifyPaymentResponse),
        (status = 404, description = "Unknown payment reference"),
        (status = 502, description = "Payment processor error")
    ),
    tag = "Payments"
)]
pub async fn verify_payment(
    State(state): State<Arc<AppState>>,
    Path(reference): Path<String>,
) -> Result<Json<VerifyPaymentResponse>, (StatusCode, String)> {
    let response = PaymentService::verify_payment(state, &reference).await?;
    Ok(Json(response))
}
