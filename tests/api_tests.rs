use axum::body::Body;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::PgConnection;
use hmac::{Hmac, Mac};
use http::{Request, StatusCode};
use sha2::Sha512;
use std::sync::Arc;
use tower::ServiceExt;
use wishwell::app::create_router;
use wishwell::clients::email::EmailClient;
use wishwell::clients::paystack::PaystackClient;
use wishwell::models::AppState;

const WEBHOOK_SECRET: &str = "whsec_test";

// No live database: routes that reach for a connection fail at .get(), but
// routing, auth rejection and webhook signature checks run before that.
fn test_state() -> Arc<AppState> {
    let manager = ConnectionManager::<PgConnection>::new("postgres://invalid");
    let pool = Pool::builder().build_unchecked(manager);
    Arc::new(AppState {
        db: pool,
        jwt_secret: "test_secret_key_minimum_32_characters_long".to_string(),
        paystack: PaystackClient::new("http://localhost:0".to_string(), "sk_test".to_string()),
        paystack_webhook_secret: WEBHOOK_SECRET.to_string(),
        email: EmailClient::new(),
        app_url: "http://localhost:8080".to_string(),
    })
}

fn sign(payload: &[u8]) -> String {
    let mut mac = Hmac::<Sha512>::new_from_slice(WEBHOOK_SECRET.as_bytes()).unwrap();
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

#[tokio::test]
async fn health_is_public() {
    let app = create_router(test_state());
    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn wallet_requires_a_bearer_token() {
    let app = create_router(test_state());
    let response = app
        .oneshot(Request::builder().uri("/api/wallet").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_require_a_bearer_token() {
    let app = create_router(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/admin/withdrawals")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_tokens_are_rejected() {
    let app = create_router(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/wallet")
                .header("Authorization", "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn webhook_without_signature_is_unauthorized() {
    let app = create_router(test_state());
    let body = r#"{"event":"charge.success","data":{"reference":"pay-abc"}}"#;
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhooks/paystack")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn webhook_with_a_forged_signature_is_unauthorized() {
    let app = create_router(test_state());
    let body = r#"{"event":"charge.success","data":{"reference":"pay-abc"}}"#;
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhooks/paystack")
                .header("content-type", "application/json")
                .header("x-paystack-signature", "deadbeef")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn webhook_acknowledges_unhandled_events() {
    let app = create_router(test_state());
    let body = r#"{"event":"customeridentification.success","data":{}}"#;
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhooks/paystack")
                .header("content-type", "application/json")
                .header("x-paystack-signature", sign(body.as_bytes()))
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn approval_notification_is_fire_and_forget() {
    // Both the single and the batch approval paths send this after the
    // pending → processing flip; it must never surface an error into them.
    let email = EmailClient::new();
    assert!(email
        .withdrawal_approved("user@example.com", rust_decimal_macros::dec!(5000))
        .await
        .is_ok());
}
