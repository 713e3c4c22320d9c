use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use wishwell::services::fee_service::{
    calculate_charge, from_kobo, platform_service_charge, to_kobo, withdrawal_fee, FeeClass,
};
use wishwell::services::withdrawal_service::required_balance;

#[test]
fn local_charge_grosses_up_below_the_cap() {
    let breakdown = calculate_charge(dec!(10000), FeeClass::Local).unwrap();

    assert_eq!(breakdown.charge_amount, dec!(10253.81));
    assert_eq!(breakdown.fees_passed, dec!(253.81));
    assert_eq!(breakdown.net_amount, dec!(10000.00));
    assert!(!breakdown.capped);
}

#[test]
fn local_charge_hits_the_cap_for_large_amounts() {
    let breakdown = calculate_charge(dec!(200000), FeeClass::Local).unwrap();

    assert_eq!(breakdown.charge_amount, dec!(202000));
    assert_eq!(breakdown.fees_passed, dec!(2000));
    assert_eq!(breakdown.net_amount, dec!(200000));
    assert!(breakdown.capped);
}

#[test]
fn capped_charge_nets_exactly_the_desired_amount() {
    // 1.5% of 130,000 plus the flat fee is over the ₦2,000 cap.
    let breakdown = calculate_charge(dec!(130000), FeeClass::Local).unwrap();

    assert!(breakdown.capped);
    assert_eq!(breakdown.charge_amount, dec!(132000));
    assert_eq!(breakdown.net_amount, dec!(130000));
}

#[test]
fn cap_boundary_uses_the_applicable_fee() {
    // 0.015 * 126,666 + 100 = 1,999.99 stays under the cap.
    let under = calculate_charge(dec!(126666), FeeClass::Local).unwrap();
    assert!(!under.capped);

    // One kobo more tips the applicable fee over ₦2,000.
    let over = calculate_charge(dec!(126666.67), FeeClass::Local).unwrap();
    assert!(over.capped);
    assert_eq!(over.charge_amount, dec!(128666.67));
}

#[test]
fn international_charge_grosses_up_uncapped() {
    let breakdown = calculate_charge(dec!(10000), FeeClass::International).unwrap();

    assert_eq!(breakdown.charge_amount, dec!(10509.89));
    assert_eq!(breakdown.fees_passed, dec!(509.89));
    assert_eq!(breakdown.net_amount, dec!(10000.00));
    assert!(!breakdown.capped);
}

#[test]
fn gross_up_inverts_the_fee_to_the_kobo() {
    let one_kobo = dec!(0.01);
    for desired in [
        dec!(50),
        dec!(123.45),
        dec!(999.99),
        dec!(5000),
        dec!(42750.50),
        dec!(100000),
    ] {
        for class in [FeeClass::Local, FeeClass::International] {
            let breakdown = calculate_charge(desired, class).unwrap();
            let drift = (breakdown.net_amount - desired).abs();
            assert!(
                drift <= one_kobo,
                "net {} drifted {} from desired {} ({:?})",
                breakdown.net_amount,
                drift,
                desired,
                class
            );
            assert_eq!(
                breakdown.charge_amount,
                breakdown.net_amount + breakdown.fees_passed
            );
        }
    }
}

#[test]
fn non_positive_amounts_are_rejected() {
    assert!(calculate_charge(Decimal::ZERO, FeeClass::Local).is_err());
    assert!(calculate_charge(dec!(-10), FeeClass::Local).is_err());
}

#[test]
fn platform_service_charge_is_five_percent_rounded_half_up() {
    assert_eq!(platform_service_charge(dec!(10000)), dec!(500));
    assert_eq!(platform_service_charge(dec!(33.33)), dec!(1.67));
    assert_eq!(platform_service_charge(dec!(0.10)), dec!(0.01));
}

#[test]
fn kobo_conversion_round_trips() {
    assert_eq!(to_kobo(dec!(10253.81)).unwrap(), 1_025_381);
    assert_eq!(from_kobo(1_025_381), dec!(10253.81));
    // Half a kobo rounds away from zero.
    assert_eq!(to_kobo(dec!(0.005)).unwrap(), 1);
}

#[test]
fn withdrawal_reserves_amount_plus_flat_fee() {
    assert_eq!(withdrawal_fee(), dec!(100));
    assert_eq!(required_balance(dec!(5000)), dec!(5100));
}
