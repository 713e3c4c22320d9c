use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use wishwell::models::enums::SubscriptionPlan;
use wishwell::services::referral_service::{
    commission_amount, commission_rate, MAX_REFERRAL_LEVELS,
};

#[test]
fn rates_follow_the_thirty_twenty_five_split() {
    assert_eq!(commission_rate(1), dec!(30));
    assert_eq!(commission_rate(2), dec!(20));
    assert_eq!(commission_rate(3), dec!(5));
}

#[test]
fn levels_beyond_the_third_earn_nothing() {
    assert_eq!(MAX_REFERRAL_LEVELS, 3);
    assert_eq!(commission_rate(4), Decimal::ZERO);
    assert_eq!(commission_rate(0), Decimal::ZERO);
    assert_eq!(commission_rate(-1), Decimal::ZERO);
}

#[test]
fn premium_plan_commissions() {
    assert_eq!(commission_amount(SubscriptionPlan::Premium, 1), dec!(2250));
    assert_eq!(commission_amount(SubscriptionPlan::Premium, 2), dec!(1500));
    assert_eq!(commission_amount(SubscriptionPlan::Premium, 3), dec!(375));
}

#[test]
fn basic_plan_commissions() {
    assert_eq!(commission_amount(SubscriptionPlan::Basic, 1), dec!(750));
    assert_eq!(commission_amount(SubscriptionPlan::Basic, 2), dec!(500));
    assert_eq!(commission_amount(SubscriptionPlan::Basic, 3), dec!(125));
}

#[test]
fn free_plan_never_pays_commissions() {
    for level in 1..=MAX_REFERRAL_LEVELS {
        assert_eq!(commission_amount(SubscriptionPlan::Free, level), Decimal::ZERO);
    }
}

#[test]
fn total_payout_never_exceeds_the_plan_price() {
    for plan in [SubscriptionPlan::Basic, SubscriptionPlan::Premium] {
        let total: Decimal = (1..=MAX_REFERRAL_LEVELS)
            .map(|level| commission_amount(plan, level))
            .sum();
        assert!(total < plan.price(), "{:?} pays out {} of {}", plan, total, plan.price());
    }
}
