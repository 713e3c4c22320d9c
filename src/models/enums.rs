use diesel_derive_enum::DbEnum;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum, Display, EnumString, ToSchema,
)]
#[ExistingTypePath = "crate::schema::sql_types::SubscriptionPlan"]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SubscriptionPlan {
    Free,
    Basic,
    Premium,
}

impl SubscriptionPlan {
    /// Monthly plan price in NGN. Free never triggers a charge.
    pub fn price(&self) -> Decimal {
        match self {
            SubscriptionPlan::Free => Decimal::ZERO,
            SubscriptionPlan::Basic => Decimal::new(2_500, 0),
            SubscriptionPlan::Premium => Decimal::new(7_500, 0),
        }
    }

    pub fn withdrawal_min(&self) -> Decimal {
        match self {
            SubscriptionPlan::Free => Decimal::new(1_000, 0),
            SubscriptionPlan::Basic => Decimal::new(500, 0),
            SubscriptionPlan::Premium => Decimal::new(100, 0),
        }
    }

    pub fn withdrawal_max(&self) -> Decimal {
        match self {
            SubscriptionPlan::Free => Decimal::new(50_000, 0),
            SubscriptionPlan::Basic => Decimal::new(200_000, 0),
            SubscriptionPlan::Premium => Decimal::new(1_000_000, 0),
        }
    }

    pub fn card_quota(&self) -> i64 {
        match self {
            SubscriptionPlan::Free => 1,
            SubscriptionPlan::Basic => 5,
            SubscriptionPlan::Premium => 20,
        }
    }

    pub fn item_quota(&self) -> i64 {
        match self {
            SubscriptionPlan::Free => 5,
            SubscriptionPlan::Basic => 25,
            SubscriptionPlan::Premium => 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum, Display, ToSchema)]
#[ExistingTypePath = "crate::schema::sql_types::EntryType"]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntryType {
    Credit,
    Debit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum, Display, ToSchema)]
#[ExistingTypePath = "crate::schema::sql_types::WithdrawalStatus"]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WithdrawalStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Reversed,
}

impl WithdrawalStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WithdrawalStatus::Completed | WithdrawalStatus::Failed | WithdrawalStatus::Reversed
        )
    }

    /// The closed transition relation of the withdrawal state machine.
    pub fn can_transition_to(&self, next: WithdrawalStatus) -> bool {
        use WithdrawalStatus::*;
        matches!(
            (self, next),
            (Pending, Processing)
                | (Pending, Failed)
                | (Processing, Completed)
                | (Processing, Failed)
                | (Processing, Reversed)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum, ToSchema)]
#[ExistingTypePath = "crate::schema::sql_types::RevenueType"]
#[serde(rename_all = "snake_case")]
pub enum RevenueType {
    PaymentFee,
    WithdrawalFee,
    Subscription,
    PremiumFeature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum, ToSchema)]
#[ExistingTypePath = "crate::schema::sql_types::EarningStatus"]
#[serde(rename_all = "lowercase")]
pub enum EarningStatus {
    Pending,
    Credited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum, ToSchema)]
#[ExistingTypePath = "crate::schema::sql_types::PaymentKind"]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    Promise,
    Subscription,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_accept_no_transition() {
        use WithdrawalStatus::*;
        for terminal in [Completed, Failed, Reversed] {
            for next in [Pending, Processing, Completed, Failed, Reversed] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn pending_cannot_complete_directly() {
        assert!(!WithdrawalStatus::Pending.can_transition_to(WithdrawalStatus::Completed));
        assert!(!WithdrawalStatus::Pending.can_transition_to(WithdrawalStatus::Reversed));
    }
}
