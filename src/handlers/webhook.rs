use crate::clients::paystack::PaystackClient;
use crate::error::ApiError;
use crate::models::dtos::PaystackEvent;
use crate::models::AppState;
use crate::services::payment_service::PaymentService;
use crate::services::withdrawal_service::{TransferOutcome, WithdrawalService};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use std::sync::Arc;
use tracing::{debug, error, info};

#[utoipa::path(
    post,
    path = "/webhooks/paystack",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Event processed or ignored"),
        (status = 401, description = "Missing or invalid signature"),
        (status = 400, description = "Malformed payload"),
        (status = 500, description = "Processing failed, processor should retry")
    ),
    tag = "Webhooks"
)]
pub async fn paystack_webhook(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
    body: Bytes,
) -> Result<StatusCode, (StatusCode, String)> {
    // Authenticate the raw body before touching its contents.
    let signature = headers
        .get("x-paystack-signature")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            error!("webhook: missing Paystack signature header");
            ApiError::SignatureMismatch
        })?;

    PaystackClient::verify_signature(&state.paystack_webhook_secret, &body, signature)?;

    let payload: PaystackEvent = serde_json::from_slice(&body).map_err(|e| {
        error!("webhook: malformed payload: {}", e);
        ApiError::Validation("Malformed webhook payload".to_string())
    })?;

    debug!("webhook: received event {}", payload.event);

    match payload.event.as_str() {
        "charge.success" => {
            let reference = payload.data.reference.as_deref().ok_or_else(|| {
                ApiError::Validation("Charge event without reference".to_string())
            })?;
            PaymentService::settle_charge(&state, reference).await?;
            info!("webhook: charge {} processed", reference);
        }
        "transfer.success" | "transfer.failed" | "transfer.reversed" => {
            let outcome = match payload.event.as_str() {
                "transfer.success" => TransferOutcome::Success,
                "transfer.failed" => TransferOutcome::Failed,
                _ => TransferOutcome::Reversed,
            };
            let failure_reason = payload
                .data
                .reason
                .clone()
                .or_else(|| payload.data.message.clone());
            WithdrawalService::handle_transfer_outcome(
                &state,
                outcome,
                payload.data.transfer_code.as_deref(),
                payload.data.reference.as_deref(),
                failure_reason,
            )
            .await?;
        }
        other => {
            debug!("webhook: ignoring event {}", other);
        }
    }

    Ok(StatusCode::OK)
}
