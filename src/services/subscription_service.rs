use crate::error::ApiError;
use crate::models::entities::{NewRevenue, ReferralEarning};
use crate::models::enums::{RevenueType, SubscriptionPlan};
use crate::schema::users;
use crate::services::referral_service::ReferralService;
use chrono::Utc;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

pub struct SubscriptionService;

impl SubscriptionService {
    /// Switches the user to a paid plan, books the subscription revenue and
    /// fans out referral commissions, all in the caller's transaction.
    /// Idempotency is the caller's job (payment contexts settle exactly once).
    pub fn activate(
        conn: &mut PgConnection,
        user_id: Uuid,
        plan: SubscriptionPlan,
        amount_paid: Decimal,
        payment_reference: &str,
    ) -> Result<Vec<ReferralEarning>, ApiError> {
        if plan == SubscriptionPlan::Free {
            return Err(ApiError::Validation(
                "The free plan cannot be purchased".to_string(),
            ));
        }

        let updated = diesel::update(users::table.find(user_id))
            .set((
                users::subscription_plan.eq(plan),
                users::updated_at.eq(Utc::now()),
            ))
            .execute(conn)?;
        if updated == 0 {
            return Err(ApiError::NotFound("User".to_string()));
        }

        diesel::insert_into(crate::schema::revenues::table)
            .values(NewRevenue {
                amount: plan.price(),
                revenue_type: RevenueType::Subscription,
                source: format!("{} subscription", plan),
                user_id: Some(user_id),
                promise_id: None,
                withdrawal_id: None,
                metadata: Some(json!({
                    "payment_reference": payment_reference,
                    "amount_paid": amount_paid.to_string(),
                })),
            })
            .execute(conn)?;

        info!(
            "subscription.activate: user {} upgraded to {} (reference {})",
            user_id, plan, payment_reference
        );

        ReferralService::credit_commissions(conn, user_id, plan, payment_reference)
    }
}
