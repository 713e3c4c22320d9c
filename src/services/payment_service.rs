use crate::error::ApiError;
use crate::models::dtos::{
    InitializePaymentResponse, InitializePromisePaymentRequest, VerifyPaymentResponse,
};
use crate::models::entities::{
    NewPaymentContext, NewRevenue, PaymentContext, Promise, ReferralEarning, User, WishItem,
};
use crate::models::enums::{PaymentKind, RevenueType, SubscriptionPlan};
use crate::models::AppState;
use crate::schema::{payment_contexts, promises, users, wish_items};
use crate::services::fee_service::{self, FeeClass};
use crate::services::ledger_service::LedgerService;
use crate::services::referral_service;
use crate::services::subscription_service::SubscriptionService;
use chrono::Utc;
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

const PAYMENT_CONTEXT_VERSION: i32 = 1;

/// What a settled charge did, carried out of the transaction so notifications
/// can be sent after commit.
enum Settlement {
    AlreadySettled,
    Promise {
        owner_email: String,
        item_title: String,
        credited: Decimal,
    },
    Subscription {
        user_email: String,
        plan: SubscriptionPlan,
        earnings: Vec<ReferralEarning>,
    },
}

pub struct PaymentService;

impl PaymentService {
    /// Starts a charge for a promise. The full fee math and the typed context
    /// are pinned locally before the payer is redirected; settlement never
    /// trusts anything echoed back by the processor.
    pub async fn initialize_promise_payment(
        state: Arc<AppState>,
        req: InitializePromisePaymentRequest,
    ) -> Result<InitializePaymentResponse, ApiError> {
        let mut conn = state.db.get()?;

        let promise = promises::table
            .find(req.promise_id)
            .select(Promise::as_select())
            .first(&mut conn)
            .optional()?
            .ok_or_else(|| ApiError::NotFound("Promise".to_string()))?;

        if !promise.verified {
            return Err(ApiError::Validation(
                "Promise must be email-verified before payment".to_string(),
            ));
        }
        if promise.fulfilled {
            return Err(ApiError::Validation("Promise is already fulfilled".to_string()));
        }

        let breakdown = fee_service::calculate_charge(req.amount, req.fee_class)?;
        let reference = format!("pay-{}", Uuid::new_v4().simple());

        diesel::insert_into(payment_contexts::table)
            .values(NewPaymentContext {
                reference: reference.clone(),
                version: PAYMENT_CONTEXT_VERSION,
                kind: PaymentKind::Promise,
                promise_id: Some(promise.id),
                user_id: None,
                plan: None,
                // Credit from the recomputed net, not the requested figure.
                desired_amount: breakdown.net_amount,
                charge_amount: breakdown.charge_amount,
                fees_passed: breakdown.fees_passed,
            })
            .execute(&mut conn)?;

        let authorization_url = state
            .paystack
            .initialize_charge(
                &req.payer_email,
                fee_service::to_kobo(breakdown.charge_amount)?,
                &reference,
                &format!("{}/payments/callback", state.app_url),
            )
            .await?;

        info!(
            "payment.initialize: promise {} charge ₦{} (net ₦{}, reference {})",
            promise.id, breakdown.charge_amount, breakdown.net_amount, reference
        );

        Ok(InitializePaymentResponse {
            authorization_url,
            reference,
            charge_amount: breakdown.charge_amount,
            fees_passed: breakdown.fees_passed,
            net_amount: breakdown.net_amount,
        })
    }

    /// Starts a subscription charge for the authenticated user.
    pub async fn initialize_subscription_payment(
        state: Arc<AppState>,
        user_id: Uuid,
        plan: SubscriptionPlan,
    ) -> Result<InitializePaymentResponse, ApiError> {
        if plan == SubscriptionPlan::Free {
            return Err(ApiError::Validation(
                "The free plan does not require payment".to_string(),
            ));
        }

        let mut conn = state.db.get()?;
        let user = users::table
            .find(user_id)
            .select(User::as_select())
            .first(&mut conn)
            .optional()?
            .ok_or_else(|| ApiError::NotFound("User".to_string()))?;

        let breakdown = fee_service::calculate_charge(plan.price(), FeeClass::Local)?;
        let reference = format!("sub-{}", Uuid::new_v4().simple());

        diesel::insert_into(payment_contexts::table)
            .values(NewPaymentContext {
                reference: reference.clone(),
                version: PAYMENT_CONTEXT_VERSION,
                kind: PaymentKind::Subscription,
                promise_id: None,
                user_id: Some(user.id),
                plan: Some(plan),
                desired_amount: breakdown.net_amount,
                charge_amount: breakdown.charge_amount,
                fees_passed: breakdown.fees_passed,
            })
            .execute(&mut conn)?;

        let authorization_url = state
            .paystack
            .initialize_charge(
                &user.email,
                fee_service::to_kobo(breakdown.charge_amount)?,
                &reference,
                &format!("{}/payments/callback", state.app_url),
            )
            .await?;

        info!(
            "payment.initialize: user {} {} subscription (reference {})",
            user.id, plan, reference
        );

        Ok(InitializePaymentResponse {
            authorization_url,
            reference,
            charge_amount: breakdown.charge_amount,
            fees_passed: breakdown.fees_passed,
            net_amount: breakdown.net_amount,
        })
    }

    /// Applies a successful charge exactly once. Shared by the webhook and the
    /// synchronous verify-poll; both converge on the context's one-way
    /// `settled` flag and the idempotent ledger references underneath it.
    pub async fn settle_charge(state: &AppState, reference: &str) -> Result<bool, ApiError> {
        let mut conn = state.db.get()?;

        let settlement = conn.transaction(|conn| {
            let context = payment_contexts::table
                .filter(payment_contexts::reference.eq(reference))
                .select(PaymentContext::as_select())
                .first(conn)
                .optional()?
                .ok_or_else(|| ApiError::NotFound("Payment".to_string()))?;

            // One-way claim; a redelivered webhook or a racing poll loses here.
            let claimed = diesel::update(
                payment_contexts::table
                    .find(context.id)
                    .filter(payment_contexts::settled.eq(false)),
            )
            .set(payment_contexts::settled.eq(true))
            .execute(conn)?;
            if claimed == 0 {
                return Ok(Settlement::AlreadySettled);
            }

            match context.kind {
                PaymentKind::Promise => Self::settle_promise(conn, &context, reference),
                PaymentKind::Subscription => Self::settle_subscription(conn, &context, reference),
            }
        })?;

        match settlement {
            Settlement::AlreadySettled => {
                info!("payment.settle: {} already settled, no-op", reference);
                Ok(false)
            }
            Settlement::Promise {
                owner_email,
                item_title,
                credited,
            } => {
                if let Err(e) = state
                    .email
                    .promise_fulfilled(&owner_email, &item_title, credited)
                    .await
                {
                    warn!("payment.settle: notification failed: {}", e);
                }
                Ok(true)
            }
            Settlement::Subscription {
                user_email,
                plan,
                earnings,
            } => {
                if let Err(e) = state
                    .email
                    .subscription_activated(&user_email, &plan.to_string())
                    .await
                {
                    warn!("payment.settle: notification failed: {}", e);
                }
                referral_service::notify_earnings(state, &earnings).await;
                Ok(true)
            }
        }
    }

    /// User-initiated verification poll. Asks the processor for the charge
    /// state and funnels success into the same settlement path as the webhook.
    pub async fn verify_payment(
        state: Arc<AppState>,
        reference: &str,
    ) -> Result<VerifyPaymentResponse, ApiError> {
        let verification = state.paystack.verify_charge(reference).await?;

        if verification.status != "success" {
            return Ok(VerifyPaymentResponse {
                reference: reference.to_string(),
                settled: false,
                message: format!("Payment not confirmed yet (status: {})", verification.status),
            });
        }

        let settled_now = Self::settle_charge(&state, reference).await?;
        Ok(VerifyPaymentResponse {
            reference: reference.to_string(),
            settled: true,
            message: if settled_now {
                "Payment confirmed and credited".to_string()
            } else {
                "Payment was already processed".to_string()
            },
        })
    }

    fn settle_promise(
        conn: &mut PgConnection,
        context: &PaymentContext,
        reference: &str,
    ) -> Result<Settlement, ApiError> {
        let promise_id = context
            .promise_id
            .ok_or_else(|| ApiError::Internal("Promise context without promise id".to_string()))?;

        let promise = promises::table
            .find(promise_id)
            .select(Promise::as_select())
            .first::<Promise>(conn)?;
        if promise.fulfilled {
            return Ok(Settlement::AlreadySettled);
        }

        diesel::update(promises::table.find(promise.id))
            .set((
                promises::fulfilled.eq(true),
                promises::payment_reference.eq(reference),
                promises::updated_at.eq(Utc::now()),
            ))
            .execute(conn)?;

        let item = wish_items::table
            .find(promise.item_id)
            .select(WishItem::as_select())
            .first::<WishItem>(conn)?;
        let owner = users::table
            .find(item.user_id)
            .select(User::as_select())
            .first::<User>(conn)?;

        let service_charge = fee_service::platform_service_charge(context.desired_amount);
        let credited = context.desired_amount - service_charge;

        LedgerService::credit(
            conn,
            owner.id,
            credited,
            &format!("Promise fulfilled: {}", item.title),
            &format!("promise-{}", reference),
        )?;

        diesel::insert_into(crate::schema::revenues::table)
            .values(NewRevenue {
                amount: service_charge,
                revenue_type: RevenueType::PaymentFee,
                source: format!("Service charge on promise {}", promise.id),
                user_id: Some(owner.id),
                promise_id: Some(promise.id),
                withdrawal_id: None,
                metadata: None,
            })
            .execute(conn)?;

        info!(
            "payment.settle: promise {} credited ₦{} to {} (service charge ₦{})",
            promise.id, credited, owner.id, service_charge
        );

        Ok(Settlement::Promise {
            owner_email: owner.email,
            item_title: item.title,
            credited,
        })
    }

    fn settle_subscription(
        conn: &mut PgConnection,
        context: &PaymentContext,
        reference: &str,
    ) -> Result<Settlement, ApiError> {
        let user_id = context
            .user_id
            .ok_or_else(|| ApiError::Internal("Subscription context without user id".to_string()))?;
        let plan = context
            .plan
            .ok_or_else(|| ApiError::Internal("Subscription context without plan".to_string()))?;

        let earnings =
            SubscriptionService::activate(conn, user_id, plan, context.desired_amount, reference)?;

        let user_email = users::table
            .find(user_id)
            .select(users::email)
            .first::<String>(conn)?;

        Ok(Settlement::Subscription {
            user_email,
            plan,
            earnings,
        })
    }
}
