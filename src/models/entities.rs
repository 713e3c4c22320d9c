use crate::models::enums::*;
use crate::schema::*;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value as JsonValue;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(table_name = users)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub wallet_balance: Decimal,
    pub subscription_plan: SubscriptionPlan,
    pub payout_recipient_id: Option<String>,
    pub account_name: Option<String>,
    pub account_number: Option<String>,
    pub bank_code: Option<String>,
    pub referral_code: Option<String>,
    pub referred_by: Option<Uuid>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn has_bank_details(&self) -> bool {
        self.account_name.is_some() && self.account_number.is_some() && self.bank_code.is_some()
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub email: String,
    pub display_name: String,
    pub referred_by: Option<Uuid>,
}

// Append-only ledger entry. Never updated or deleted after insert.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, ToSchema)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(table_name = wallet_transactions)]
pub struct WalletTransaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub entry_type: EntryType,
    pub description: String,
    pub reference: String,
    pub balance_before: Decimal,
    pub balance_after: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = wallet_transactions)]
pub struct NewWalletTransaction {
    pub user_id: Uuid,
    pub amount: Decimal,
    pub entry_type: EntryType,
    pub description: String,
    pub reference: String,
    pub balance_before: Decimal,
    pub balance_after: Decimal,
}

impl NewWalletTransaction {
    /// Entry for a signed delta that has already landed on the balance;
    /// `balance_before` is derived so the row always satisfies
    /// `balance_after = balance_before + amount`.
    pub fn for_applied_delta(
        user_id: Uuid,
        signed_amount: Decimal,
        entry_type: EntryType,
        description: &str,
        reference: &str,
        balance_after: Decimal,
    ) -> Self {
        NewWalletTransaction {
            user_id,
            amount: signed_amount,
            entry_type,
            description: description.to_string(),
            reference: reference.to_string(),
            balance_before: balance_after - signed_amount,
            balance_after,
        }
    }
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(table_name = withdrawals)]
pub struct Withdrawal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub fee: Decimal,
    pub account_name: String,
    pub account_number: String,
    pub bank_code: String,
    pub status: WithdrawalStatus,
    pub transfer_reference: Option<String>,
    pub processor_transfer_id: Option<String>,
    pub failure_reason: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl Withdrawal {
    /// Principal plus fee, the total reserved from the wallet at request time.
    pub fn total_debited(&self) -> Decimal {
        self.amount + self.fee
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = withdrawals)]
pub struct NewWithdrawal {
    pub user_id: Uuid,
    pub amount: Decimal,
    pub fee: Decimal,
    pub account_name: String,
    pub account_number: String,
    pub bank_code: String,
    pub status: WithdrawalStatus,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(table_name = wish_items)]
pub struct WishItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(table_name = promises)]
pub struct Promise {
    pub id: Uuid,
    pub item_id: Uuid,
    pub promiser_email: String,
    pub verified: bool,
    pub fulfilled: bool,
    pub payment_reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = revenues)]
pub struct NewRevenue {
    pub amount: Decimal,
    pub revenue_type: RevenueType,
    pub source: String,
    pub user_id: Option<Uuid>,
    pub promise_id: Option<Uuid>,
    pub withdrawal_id: Option<Uuid>,
    pub metadata: Option<JsonValue>,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, ToSchema)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(table_name = referral_earnings)]
pub struct ReferralEarning {
    pub id: Uuid,
    pub user_id: Uuid,
    pub referred_user_id: Uuid,
    pub level: i32,
    pub amount: Decimal,
    pub percentage: Decimal,
    pub status: EarningStatus,
    pub reference: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = referral_earnings)]
pub struct NewReferralEarning {
    pub user_id: Uuid,
    pub referred_user_id: Uuid,
    pub level: i32,
    pub amount: Decimal,
    pub percentage: Decimal,
    pub status: EarningStatus,
    pub reference: String,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(table_name = referrals)]
pub struct Referral {
    pub id: Uuid,
    pub referrer_id: Uuid,
    pub referred_id: Uuid,
    pub level: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = referrals)]
pub struct NewReferral {
    pub referrer_id: Uuid,
    pub referred_id: Uuid,
    pub level: i32,
}

/// Typed event context persisted at charge initialization. Settlement resolves
/// everything from this row by charge reference instead of trusting metadata
/// echoed back by the processor.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(table_name = payment_contexts)]
pub struct PaymentContext {
    pub id: Uuid,
    pub reference: String,
    pub version: i32,
    pub kind: PaymentKind,
    pub promise_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub plan: Option<SubscriptionPlan>,
    pub desired_amount: Decimal,
    pub charge_amount: Decimal,
    pub fees_passed: Decimal,
    pub settled: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = payment_contexts)]
pub struct NewPaymentContext {
    pub reference: String,
    pub version: i32,
    pub kind: PaymentKind,
    pub promise_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub plan: Option<SubscriptionPlan>,
    pub desired_amount: Decimal,
    pub charge_amount: Decimal,
    pub fees_passed: Decimal,
}
