use crate::handlers::{
    admin_withdrawals::__path_approve_withdrawal,
    admin_withdrawals::__path_approve_withdrawal_batch,
    admin_withdrawals::__path_list_pending_withdrawals,
    admin_withdrawals::__path_reject_withdrawal,
    bank_details::__path_update_bank_details,
    health::__path_health_check,
    payments::__path_initialize_promise_payment,
    payments::__path_initialize_subscription_payment,
    payments::__path_verify_payment,
    referral::__path_claim_referral,
    referral::__path_get_referral_code,
    referral::__path_get_referral_earnings,
    wallet::__path_get_transactions,
    wallet::__path_get_wallet,
    webhook::__path_paystack_webhook,
    withdraw::__path_list_withdrawals,
    withdraw::__path_request_withdrawal,
};
use crate::models::dtos::*;
use crate::models::entities::{ReferralEarning, WalletTransaction};
use crate::models::enums::{EntryType, SubscriptionPlan, WithdrawalStatus};
use crate::services::fee_service::FeeClass;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        initialize_promise_payment, initialize_subscription_payment, verify_payment,
        paystack_webhook,
        get_wallet, get_transactions, update_bank_details,
        request_withdrawal, list_withdrawals,
        list_pending_withdrawals, approve_withdrawal, reject_withdrawal,
        approve_withdrawal_batch,
        get_referral_code, claim_referral, get_referral_earnings
    ),
    components(schemas(
        ErrorResponse, WithdrawRequest, WithdrawResponse, WithdrawalDto,
        RejectWithdrawalRequest, BatchApproveRequest, BatchApproveResponse,
        BatchItemOutcome, InitializePromisePaymentRequest,
        InitializeSubscriptionRequest, InitializePaymentResponse,
        VerifyPaymentResponse, WalletResponse, BankDetailsRequest,
        BankDetailsResponse, ClaimReferralRequest, ReferralCodeResponse,
        EarningsResponse, WalletTransaction, ReferralEarning,
        SubscriptionPlan, WithdrawalStatus, EntryType, FeeClass
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Payments", description = "Charge initialization and verification"),
        (name = "Webhooks", description = "Payment processor callbacks"),
        (name = "Wallet", description = "Balance, history and payout destination"),
        (name = "Withdrawals", description = "User withdrawal requests"),
        (name = "Admin", description = "Withdrawal review queue"),
        (name = "Referrals", description = "Referral codes and commissions")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "bearerAuth".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
