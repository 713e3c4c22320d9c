use crate::error::ApiError;
use crate::models::entities::{NewReferral, NewReferralEarning, Referral, ReferralEarning, User};
use crate::models::enums::{EarningStatus, SubscriptionPlan};
use crate::schema::{referral_earnings, referrals, users};
use crate::services::ledger_service::LedgerService;
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use rand::Rng;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{info, warn};
use uuid::Uuid;

pub const MAX_REFERRAL_LEVELS: i32 = 3;

/// Commission rates per upline level, in percent of the plan price.
pub fn commission_rate(level: i32) -> Decimal {
    match level {
        1 => Decimal::new(30, 0),
        2 => Decimal::new(20, 0),
        3 => Decimal::new(5, 0),
        _ => Decimal::ZERO,
    }
}

/// Commission owed to a referrer at `level` when the referred user pays for
/// `plan`. Rounded half-up to the kobo.
pub fn commission_amount(plan: SubscriptionPlan, level: i32) -> Decimal {
    (plan.price() * commission_rate(level) / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub struct ReferralService;

impl ReferralService {
    /// Returns the user's referral code, generating a collision-checked one on
    /// first use.
    pub fn ensure_referral_code(conn: &mut PgConnection, user_id: Uuid) -> Result<String, ApiError> {
        let existing = users::table
            .find(user_id)
            .select(users::referral_code)
            .first::<Option<String>>(conn)
            .optional()?
            .ok_or_else(|| ApiError::NotFound("User".to_string()))?;

        if let Some(code) = existing {
            return Ok(code);
        }

        for _ in 0..5 {
            let code = Self::generate_code();
            let taken = diesel::select(diesel::dsl::exists(
                users::table.filter(users::referral_code.eq(&code)),
            ))
            .get_result::<bool>(conn)?;
            if taken {
                continue;
            }

            match diesel::update(users::table.find(user_id))
                .set((
                    users::referral_code.eq(&code),
                    users::updated_at.eq(Utc::now()),
                ))
                .execute(conn)
            {
                Ok(_) => return Ok(code),
                // A concurrent user grabbed the same code between the check and
                // the update; roll another one.
                Err(e) if is_unique_violation(&e) => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(ApiError::Internal("Could not generate a unique referral code".to_string()))
    }

    /// Records the upline snapshot for a newly referred user: the code owner is
    /// level 1, their referrer level 2, and so on up to three hops. The walk
    /// happens once, here; later changes to the graph never rewrite it.
    pub fn link_referral(
        conn: &mut PgConnection,
        referred_id: Uuid,
        code: &str,
    ) -> Result<Vec<Referral>, ApiError> {
        let referrer = users::table
            .filter(users::referral_code.eq(code))
            .select(User::as_select())
            .first(conn)
            .optional()?
            .ok_or_else(|| ApiError::NotFound("Referral code".to_string()))?;

        if referrer.id == referred_id {
            return Err(ApiError::Validation("You cannot refer yourself".to_string()));
        }

        let result = conn.transaction(|conn| {
            let already_linked = diesel::select(diesel::dsl::exists(
                referrals::table.filter(referrals::referred_id.eq(referred_id)),
            ))
            .get_result::<bool>(conn)?;
            if already_linked {
                return Err(ApiError::Validation("Referral already claimed".to_string()));
            }
            diesel::update(users::table.find(referred_id))
                .set((
                    users::referred_by.eq(referrer.id),
                    users::updated_at.eq(Utc::now()),
                ))
                .execute(conn)?;

            let mut edges = Vec::new();
            let mut upline = Some(referrer.id);
            let mut level = 1;

            while let Some(referrer_id) = upline {
                if level > MAX_REFERRAL_LEVELS {
                    break;
                }
                let edge = diesel::insert_into(referrals::table)
                    .values(NewReferral {
                        referrer_id,
                        referred_id,
                        level,
                    })
                    .get_result::<Referral>(conn)?;
                edges.push(edge);

                upline = users::table
                    .find(referrer_id)
                    .select(users::referred_by)
                    .first::<Option<Uuid>>(conn)?;
                level += 1;
            }

            info!(
                "referral.link: user {} linked to {} upline level(s)",
                referred_id,
                edges.len()
            );
            Ok(edges)
        });

        // Two claims racing past the pre-check collide on the per-level unique
        // constraint; the loser's snapshot never half-applies.
        match result {
            Err(ApiError::Database(e)) if is_unique_violation(&e) => {
                Err(ApiError::Validation("Referral already claimed".to_string()))
            }
            other => other,
        }
    }

    /// Credits commissions for every persisted upline edge of the upgrading
    /// user. Earning row and wallet credit land in the caller's transaction;
    /// earnings are born credited (no deferred sweep).
    pub fn credit_commissions(
        conn: &mut PgConnection,
        upgraded_user_id: Uuid,
        plan: SubscriptionPlan,
        payment_reference: &str,
    ) -> Result<Vec<ReferralEarning>, ApiError> {
        if plan == SubscriptionPlan::Free {
            return Ok(Vec::new());
        }

        let edges = referrals::table
            .filter(referrals::referred_id.eq(upgraded_user_id))
            .order(referrals::level.asc())
            .select(Referral::as_select())
            .load::<Referral>(conn)?;

        let mut earnings = Vec::new();
        for edge in edges {
            let percentage = commission_rate(edge.level);
            let amount = commission_amount(plan, edge.level);
            if amount <= Decimal::ZERO {
                continue;
            }

            let reference = format!("ref-{}-l{}", payment_reference, edge.level);
            let earning = diesel::insert_into(referral_earnings::table)
                .values(NewReferralEarning {
                    user_id: edge.referrer_id,
                    referred_user_id: upgraded_user_id,
                    level: edge.level,
                    amount,
                    percentage,
                    status: EarningStatus::Credited,
                    reference: reference.clone(),
                })
                .get_result::<ReferralEarning>(conn)?;

            LedgerService::credit(
                conn,
                edge.referrer_id,
                amount,
                &format!("Level {} referral commission", edge.level),
                &reference,
            )?;

            info!(
                "referral.commission: ₦{} to {} (level {}, reference {})",
                amount, edge.referrer_id, edge.level, reference
            );
            earnings.push(earning);
        }

        Ok(earnings)
    }

    pub fn earnings_for_user(
        conn: &mut PgConnection,
        user_id: Uuid,
    ) -> Result<Vec<ReferralEarning>, ApiError> {
        referral_earnings::table
            .filter(referral_earnings::user_id.eq(user_id))
            .order(referral_earnings::created_at.desc())
            .select(ReferralEarning::as_select())
            .load(conn)
            .map_err(ApiError::Database)
    }

    fn generate_code() -> String {
        // Unambiguous uppercase alphabet, 8 characters.
        const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
        let mut rng = rand::thread_rng();
        (0..8)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

fn is_unique_violation(err: &DieselError) -> bool {
    matches!(
        err,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_use_the_unambiguous_alphabet() {
        for _ in 0..50 {
            let code = ReferralService::generate_code();
            assert_eq!(code.len(), 8);
            assert!(code
                .bytes()
                .all(|b| b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789".contains(&b)));
        }
    }

    #[test]
    fn duplicate_key_errors_are_recognized() {
        let dup = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value".to_string()),
        );
        assert!(is_unique_violation(&dup));
        assert!(!is_unique_violation(&DieselError::NotFound));
    }
}

/// Notifies referrers about credited commissions. Separate from the crediting
/// transaction; a failed send never unwinds the credit.
pub async fn notify_earnings(state: &crate::models::AppState, earnings: &[ReferralEarning]) {
    for earning in earnings {
        let email = {
            let Ok(mut conn) = state.db.get() else {
                warn!("referral.notify: no database connection, skipping");
                return;
            };
            users::table
                .find(earning.user_id)
                .select(users::email)
                .first::<String>(&mut conn)
                .ok()
        };
        if let Some(email) = email {
            if let Err(e) = state
                .email
                .referral_credited(&email, earning.amount, earning.level)
                .await
            {
                warn!("referral.notify: notification failed: {}", e);
            }
        }
    }
}
