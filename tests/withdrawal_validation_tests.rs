use rust_decimal_macros::dec;
use wishwell::error::ApiError;
use wishwell::models::enums::SubscriptionPlan;
use wishwell::services::withdrawal_service::{required_balance, validate_request};

#[test]
fn amount_within_limits_and_balance_passes() {
    assert!(validate_request(SubscriptionPlan::Free, dec!(5000), dec!(10000)).is_ok());
    assert!(validate_request(SubscriptionPlan::Premium, dec!(100), dec!(200.50)).is_ok());
}

#[test]
fn below_plan_minimum_is_rejected() {
    let err = validate_request(SubscriptionPlan::Free, dec!(500), dec!(10000)).unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    // The same amount is fine on a plan with a lower floor.
    assert!(validate_request(SubscriptionPlan::Basic, dec!(500), dec!(10000)).is_ok());
}

#[test]
fn above_plan_maximum_is_rejected() {
    let err =
        validate_request(SubscriptionPlan::Free, dec!(60000), dec!(100000)).unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    assert!(validate_request(SubscriptionPlan::Basic, dec!(60000), dec!(100000)).is_ok());
}

#[test]
fn balance_must_cover_principal_plus_fee() {
    // ₦5,000 needs ₦5,100 in the wallet.
    assert_eq!(required_balance(dec!(5000)), dec!(5100));

    let err = validate_request(SubscriptionPlan::Free, dec!(5000), dec!(5000)).unwrap_err();
    assert!(matches!(err, ApiError::InsufficientBalance));

    assert!(validate_request(SubscriptionPlan::Free, dec!(5000), dec!(5100)).is_ok());
}

#[test]
fn sub_kobo_precision_is_rejected() {
    let err =
        validate_request(SubscriptionPlan::Free, dec!(5000.005), dec!(10000)).unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}
