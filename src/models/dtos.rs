use crate::models::enums::{SubscriptionPlan, WithdrawalStatus};
use crate::services::fee_service::FeeClass;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, ToSchema, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Deserialize, ToSchema, Debug)]
pub struct WithdrawRequest {
    pub amount: Decimal,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct WithdrawResponse {
    pub withdrawal_id: Uuid,
    pub amount: Decimal,
    pub fee: Decimal,
    pub status: WithdrawalStatus,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct WithdrawalDto {
    pub id: Uuid,
    pub amount: Decimal,
    pub fee: Decimal,
    pub account_number: String,
    pub bank_code: String,
    pub status: WithdrawalStatus,
    pub failure_reason: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<crate::models::entities::Withdrawal> for WithdrawalDto {
    fn from(w: crate::models::entities::Withdrawal) -> Self {
        WithdrawalDto {
            id: w.id,
            amount: w.amount,
            fee: w.fee,
            account_number: w.account_number,
            bank_code: w.bank_code,
            status: w.status,
            failure_reason: w.failure_reason,
            requested_at: w.requested_at,
            completed_at: w.completed_at,
        }
    }
}

#[derive(Deserialize, ToSchema, Validate, Debug)]
pub struct RejectWithdrawalRequest {
    #[validate(length(min = 3, max = 500, message = "Reason must be between 3 and 500 characters"))]
    pub reason: String,
}

#[derive(Deserialize, ToSchema, Debug)]
pub struct BatchApproveRequest {
    pub withdrawal_ids: Vec<Uuid>,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct BatchItemOutcome {
    pub withdrawal_id: Uuid,
    pub success: bool,
    pub message: String,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct BatchApproveResponse {
    pub results: Vec<BatchItemOutcome>,
}

#[derive(Deserialize, ToSchema, Validate, Debug)]
pub struct InitializePromisePaymentRequest {
    pub promise_id: Uuid,
    pub amount: Decimal,
    #[serde(default)]
    pub fee_class: FeeClass,
    #[validate(email(message = "Invalid email format"))]
    pub payer_email: String,
}

#[derive(Deserialize, ToSchema, Debug)]
pub struct InitializeSubscriptionRequest {
    pub plan: SubscriptionPlan,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct InitializePaymentResponse {
    pub authorization_url: String,
    pub reference: String,
    pub charge_amount: Decimal,
    pub fees_passed: Decimal,
    pub net_amount: Decimal,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct VerifyPaymentResponse {
    pub reference: String,
    pub settled: bool,
    pub message: String,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct WalletResponse {
    pub balance: Decimal,
    pub subscription_plan: SubscriptionPlan,
    pub card_quota: i64,
    pub item_quota: i64,
}

#[derive(Deserialize, ToSchema, Validate, Debug)]
pub struct BankDetailsRequest {
    #[validate(length(min = 2, max = 255))]
    pub account_name: String,
    #[validate(length(min = 10, max = 10, message = "Account number must be 10 digits"))]
    pub account_number: String,
    #[validate(length(min = 3, max = 10))]
    pub bank_code: String,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct BankDetailsResponse {
    pub account_name: String,
    pub account_number: String,
    pub bank_code: String,
    pub payout_recipient_id: String,
}

#[derive(Deserialize, ToSchema, Validate, Debug)]
pub struct ClaimReferralRequest {
    #[validate(length(min = 6, max = 12, message = "Invalid referral code"))]
    pub code: String,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct ReferralCodeResponse {
    pub code: String,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct EarningsResponse {
    pub earnings: Vec<crate::models::entities::ReferralEarning>,
    pub total: Decimal,
}

/// Incoming Paystack webhook envelope. Only the fields the pipeline consumes;
/// everything else in the payload is deliberately ignored.
#[derive(Deserialize, Debug)]
pub struct PaystackEvent {
    pub event: String,
    #[serde(default)]
    pub data: PaystackEventData,
}

#[derive(Deserialize, Debug, Default)]
pub struct PaystackEventData {
    pub reference: Option<String>,
    pub transfer_code: Option<String>,
    pub status: Option<String>,
    pub reason: Option<String>,
    pub message: Option<String>,
    pub amount: Option<i64>,
}
