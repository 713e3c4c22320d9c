use crate::error::ApiError;
use rust_decimal::Decimal;
use tracing::info;

/// Notification collaborator. Delivery is handled by the mail platform; from the
/// core's point of view sends are fire-and-forget and must never roll back a
/// committed ledger mutation.
#[derive(Clone, Default)]
pub struct EmailClient;

impl EmailClient {
    pub fn new() -> Self {
        Self
    }

    pub async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), ApiError> {
        info!("email: to={}, subject={}, body_len={}", to, subject, body.len());
        Ok(())
    }

    pub async fn withdrawal_approved(&self, to: &str, amount: Decimal) -> Result<(), ApiError> {
        self.send(
            to,
            "Your withdrawal is on its way",
            &format!("Your withdrawal of ₦{} has been approved and is being processed.", amount),
        )
        .await
    }

    pub async fn withdrawal_completed(&self, to: &str, amount: Decimal) -> Result<(), ApiError> {
        self.send(
            to,
            "Withdrawal completed",
            &format!("₦{} has been paid out to your bank account.", amount),
        )
        .await
    }

    pub async fn withdrawal_failed(&self, to: &str, amount: Decimal, reason: &str) -> Result<(), ApiError> {
        self.send(
            to,
            "Withdrawal failed",
            &format!(
                "Your withdrawal of ₦{} could not be completed ({}). The full amount including fees has been returned to your wallet.",
                amount, reason
            ),
        )
        .await
    }

    pub async fn withdrawal_reversed(&self, to: &str, amount: Decimal) -> Result<(), ApiError> {
        self.send(
            to,
            "Withdrawal reversed",
            &format!(
                "Your withdrawal of ₦{} was reversed by the bank. The full amount including fees has been returned to your wallet.",
                amount
            ),
        )
        .await
    }

    pub async fn promise_fulfilled(&self, to: &str, item_title: &str, amount: Decimal) -> Result<(), ApiError> {
        self.send(
            to,
            "A promise on your wish card was fulfilled!",
            &format!("₦{} for \"{}\" has been added to your wallet.", amount, item_title),
        )
        .await
    }

    pub async fn referral_credited(&self, to: &str, amount: Decimal, level: i32) -> Result<(), ApiError> {
        self.send(
            to,
            "You earned a referral commission",
            &format!("₦{} (level {} referral) has been added to your wallet.", amount, level),
        )
        .await
    }

    pub async fn subscription_activated(&self, to: &str, plan: &str) -> Result<(), ApiError> {
        self.send(
            to,
            "Subscription active",
            &format!("Your {} plan is now active. Enjoy your upgraded quotas!", plan),
        )
        .await
    }
}
