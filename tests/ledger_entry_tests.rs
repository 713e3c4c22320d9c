use rust_decimal_macros::dec;
use uuid::Uuid;
use wishwell::models::entities::NewWalletTransaction;
use wishwell::models::enums::EntryType;

#[test]
fn credit_entry_balances_add_up() {
    let entry = NewWalletTransaction::for_applied_delta(
        Uuid::new_v4(),
        dec!(250),
        EntryType::Credit,
        "Level 1 referral commission",
        "ref-sub-abc-l1",
        dec!(1250),
    );

    assert_eq!(entry.balance_before, dec!(1000));
    assert_eq!(entry.balance_after, entry.balance_before + entry.amount);
    assert!(entry.amount > dec!(0));
}

#[test]
fn debit_entry_carries_a_signed_amount() {
    // ₦5,000 withdrawal plus the ₦100 fee against a ₦10,000 balance.
    let principal = NewWalletTransaction::for_applied_delta(
        Uuid::new_v4(),
        dec!(-5000),
        EntryType::Debit,
        "Withdrawal request",
        "wd-1",
        dec!(5000),
    );
    assert_eq!(principal.balance_before, dec!(10000));
    assert_eq!(principal.balance_after, principal.balance_before + principal.amount);

    let fee = NewWalletTransaction::for_applied_delta(
        Uuid::new_v4(),
        dec!(-100),
        EntryType::Debit,
        "Withdrawal fee",
        "wd-1-fee",
        dec!(4900),
    );
    assert_eq!(fee.balance_before, dec!(5000));
    assert_eq!(fee.balance_after, dec!(4900));
}

#[test]
fn refund_pair_restores_the_original_balance() {
    let user = Uuid::new_v4();
    let start = dec!(10000);

    // Reserve, then refund after a failed transfer; the entry chain must
    // conserve the starting balance.
    let deltas = [dec!(-5000), dec!(-100), dec!(5000), dec!(100)];
    let mut balance = start;
    for (i, delta) in deltas.iter().enumerate() {
        balance += *delta;
        let entry = NewWalletTransaction::for_applied_delta(
            user,
            *delta,
            if *delta < dec!(0) { EntryType::Debit } else { EntryType::Credit },
            "Withdrawal lifecycle",
            &format!("wd-2-step-{}", i),
            balance,
        );
        assert_eq!(entry.balance_after, entry.balance_before + entry.amount);
    }
    assert_eq!(balance, start);
}
