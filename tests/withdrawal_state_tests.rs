use wishwell::models::enums::{SubscriptionPlan, WithdrawalStatus};

use WithdrawalStatus::*;

const ALL_STATUSES: [WithdrawalStatus; 5] = [Pending, Processing, Completed, Failed, Reversed];

#[test]
fn pending_goes_to_processing_or_failed_only() {
    assert!(Pending.can_transition_to(Processing));
    assert!(Pending.can_transition_to(Failed));
    assert!(!Pending.can_transition_to(Completed));
    assert!(!Pending.can_transition_to(Reversed));
    assert!(!Pending.can_transition_to(Pending));
}

#[test]
fn processing_resolves_to_a_terminal_state() {
    assert!(Processing.can_transition_to(Completed));
    assert!(Processing.can_transition_to(Failed));
    assert!(Processing.can_transition_to(Reversed));
    assert!(!Processing.can_transition_to(Pending));
    assert!(!Processing.can_transition_to(Processing));
}

#[test]
fn terminal_states_are_absorbing() {
    for terminal in [Completed, Failed, Reversed] {
        assert!(terminal.is_terminal());
        for next in ALL_STATUSES {
            assert!(!terminal.can_transition_to(next));
        }
    }
    assert!(!Pending.is_terminal());
    assert!(!Processing.is_terminal());
}

#[test]
fn every_transition_target_is_reachable_from_a_live_state() {
    // No status is dead on arrival except Pending, which is the entry point.
    for target in [Processing, Completed, Failed, Reversed] {
        assert!(
            ALL_STATUSES.iter().any(|s| s.can_transition_to(target)),
            "{:?} is unreachable",
            target
        );
    }
}

#[test]
fn plan_limits_order_sensibly() {
    for plan in [
        SubscriptionPlan::Free,
        SubscriptionPlan::Basic,
        SubscriptionPlan::Premium,
    ] {
        assert!(plan.withdrawal_min() < plan.withdrawal_max());
    }
    // Paid plans loosen both ends of the range.
    assert!(SubscriptionPlan::Premium.withdrawal_min() < SubscriptionPlan::Free.withdrawal_min());
    assert!(SubscriptionPlan::Premium.withdrawal_max() > SubscriptionPlan::Free.withdrawal_max());
}
