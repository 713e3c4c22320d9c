use utoipa::OpenApi;
use wishwell::config::swagger_config::ApiDoc;

#[test]
fn every_referenced_schema_is_registered() {
    let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
    let schemas = doc["components"]["schemas"]
        .as_object()
        .expect("components.schemas present");

    for name in [
        "FeeClass",
        "EntryType",
        "SubscriptionPlan",
        "WithdrawalStatus",
        "WalletTransaction",
        "ReferralEarning",
        "InitializePromisePaymentRequest",
        "WithdrawRequest",
        "BatchApproveResponse",
    ] {
        assert!(schemas.contains_key(name), "missing schema {}", name);
    }
}

#[test]
fn core_routes_are_documented() {
    let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
    let paths = doc["paths"].as_object().expect("paths present");

    for path in [
        "/api/health",
        "/webhooks/paystack",
        "/api/payments/promise",
        "/api/payments/verify/{reference}",
        "/api/wallet",
        "/api/withdrawals",
        "/api/admin/withdrawals/{id}/approve",
        "/api/referrals/claim",
    ] {
        assert!(paths.contains_key(path), "missing path {}", path);
    }
}
