use axum::{middleware, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::security_config::{admin_middleware, auth_middleware};
use crate::config::swagger_config::ApiDoc;
use crate::handlers::{
    admin_withdrawals::{
        approve_withdrawal, approve_withdrawal_batch, list_pending_withdrawals,
        reject_withdrawal,
    },
    bank_details::update_bank_details,
    health::health_check,
    payments::{initialize_promise_payment, initialize_subscription_payment, verify_payment},
    referral::{claim_referral, get_referral_code, get_referral_earnings},
    wallet::{get_transactions, get_wallet},
    webhook::paystack_webhook,
    withdraw::{list_withdrawals, request_withdrawal},
};
use crate::models::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Public routes (no authentication)
    let public_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", axum::routing::get(health_check))
        .route("/webhooks/paystack", axum::routing::post(paystack_webhook))
        .route(
            "/api/payments/promise",
            axum::routing::post(initialize_promise_payment),
        )
        .route(
            "/api/payments/verify/{reference}",
            axum::routing::get(verify_payment),
        );

    // Protected routes (require JWT authentication)
    let protected_router = Router::new()
        .route("/api/wallet", axum::routing::get(get_wallet))
        .route(
            "/api/wallet/transactions",
            axum::routing::get(get_transactions),
        )
        .route("/api/bank_details", axum::routing::put(update_bank_details))
        .route(
            "/api/payments/subscription",
            axum::routing::post(initialize_subscription_payment),
        )
        .route(
            "/api/withdrawals",
            axum::routing::post(request_withdrawal).get(list_withdrawals),
        )
        .route("/api/referrals/code", axum::routing::get(get_referral_code))
        .route("/api/referrals/claim", axum::routing::post(claim_referral))
        .route(
            "/api/referrals/earnings",
            axum::routing::get(get_referral_earnings),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Admin routes check the stored admin flag on top of authentication
    let admin_router = Router::new()
        .route(
            "/api/admin/withdrawals",
            axum::routing::get(list_pending_withdrawals),
        )
        .route(
            "/api/admin/withdrawals/approve_batch",
            axum::routing::post(approve_withdrawal_batch),
        )
        .route(
            "/api/admin/withdrawals/{id}/approve",
            axum::routing::post(approve_withdrawal),
        )
        .route(
            "/api/admin/withdrawals/{id}/reject",
            axum::routing::post(reject_withdrawal),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public_router)
        .merge(protected_router)
        .merge(admin_router)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
