use crate::clients::paystack::BulkTransferItem;
use crate::error::ApiError;
use crate::models::dtos::{
    BatchApproveResponse, BatchItemOutcome, WithdrawRequest, WithdrawResponse, WithdrawalDto,
};
use crate::models::entities::{NewRevenue, NewWithdrawal, User, Withdrawal};
use crate::models::enums::{RevenueType, SubscriptionPlan, WithdrawalStatus};
use crate::models::AppState;
use crate::schema::{revenues, users, withdrawals};
use crate::services::fee_service::{self, withdrawal_fee};
use crate::services::ledger_service::LedgerService;
use chrono::Utc;
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Terminal outcome reported by a transfer webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    Success,
    Failed,
    Reversed,
}

/// A pending withdrawal vetted for bulk submission.
struct PreparedTransfer {
    withdrawal: Withdrawal,
    recipient_code: String,
    reference: String,
    user_email: String,
}

pub struct WithdrawalService;

impl WithdrawalService {
    /// Creates a pending withdrawal and immediately reserves principal + fee
    /// from the wallet, so the balance cannot be double-spent while the
    /// transfer is in flight.
    pub async fn request_withdrawal(
        state: Arc<AppState>,
        user_id: Uuid,
        req: WithdrawRequest,
    ) -> Result<WithdrawResponse, ApiError> {
        let mut conn = state.db.get()?;

        let user = users::table
            .find(user_id)
            .select(User::as_select())
            .first(&mut conn)
            .optional()?
            .ok_or_else(|| ApiError::NotFound("User".to_string()))?;

        if !user.has_bank_details() {
            return Err(ApiError::Validation(
                "Add your bank details before requesting a withdrawal".to_string(),
            ));
        }

        let amount = req.amount;
        validate_request(user.subscription_plan, amount, user.wallet_balance)?;
        let fee = withdrawal_fee();

        let withdrawal = conn.transaction(|conn| {
            let withdrawal = diesel::insert_into(withdrawals::table)
                .values(NewWithdrawal {
                    user_id,
                    amount,
                    fee,
                    // Snapshot the destination; later profile edits must not
                    // redirect an in-flight withdrawal.
                    account_name: user.account_name.clone().unwrap_or_default(),
                    account_number: user.account_number.clone().unwrap_or_default(),
                    bank_code: user.bank_code.clone().unwrap_or_default(),
                    status: WithdrawalStatus::Pending,
                })
                .get_result::<Withdrawal>(conn)?;

            LedgerService::debit(
                conn,
                user_id,
                amount,
                "Withdrawal request",
                &format!("wd-{}", withdrawal.id),
            )?;
            LedgerService::debit(
                conn,
                user_id,
                fee,
                "Withdrawal fee",
                &format!("wd-{}-fee", withdrawal.id),
            )?;

            Ok::<Withdrawal, ApiError>(withdrawal)
        })?;

        info!(
            "withdrawal.request: user {} reserved ₦{} + ₦{} fee (withdrawal {})",
            user_id, amount, fee, withdrawal.id
        );

        Ok(WithdrawResponse {
            withdrawal_id: withdrawal.id,
            amount: withdrawal.amount,
            fee: withdrawal.fee,
            status: withdrawal.status,
        })
    }

    /// Admin approval: registers a payout recipient if the user has none,
    /// submits the transfer, and moves pending → processing. A processor
    /// failure leaves the row pending with funds still reserved; the admin
    /// retries manually.
    pub async fn approve(
        state: Arc<AppState>,
        withdrawal_id: Uuid,
    ) -> Result<WithdrawalDto, ApiError> {
        let mut conn = state.db.get()?;

        let withdrawal = Self::find(&mut conn, withdrawal_id)?;
        if withdrawal.status != WithdrawalStatus::Pending {
            return Err(ApiError::Validation(format!(
                "Withdrawal is {} and cannot be approved",
                withdrawal.status
            )));
        }

        let user = users::table
            .find(withdrawal.user_id)
            .select(User::as_select())
            .first(&mut conn)?;

        let recipient_code = Self::ensure_recipient(&state, &mut conn, &user, &withdrawal).await?;
        let transfer_reference = Self::fresh_transfer_reference(&mut conn, &withdrawal)?;

        let transfer_code = state
            .paystack
            .initiate_transfer(
                fee_service::to_kobo(withdrawal.amount)?,
                &recipient_code,
                &transfer_reference,
                "WishWell wallet withdrawal",
            )
            .await?;

        let updated = diesel::update(
            withdrawals::table
                .find(withdrawal.id)
                .filter(withdrawals::status.eq(WithdrawalStatus::Pending)),
        )
        .set((
            withdrawals::status.eq(WithdrawalStatus::Processing),
            withdrawals::processor_transfer_id.eq(&transfer_code),
            withdrawals::processed_at.eq(Utc::now()),
            withdrawals::updated_at.eq(Utc::now()),
        ))
        .get_result::<Withdrawal>(&mut conn)
        .optional()?;

        let updated = updated.ok_or_else(|| {
            error!(
                "withdrawal.approve: {} left pending state while transfer {} was submitted",
                withdrawal.id, transfer_code
            );
            ApiError::Internal("Withdrawal state changed during approval".to_string())
        })?;

        info!(
            "withdrawal.approve: {} submitted as {} (reference {})",
            withdrawal.id, transfer_code, transfer_reference
        );

        if let Err(e) = state.email.withdrawal_approved(&user.email, withdrawal.amount).await {
            warn!("withdrawal.approve: notification failed: {}", e);
        }

        Ok(updated.into())
    }

    /// Submits several pending withdrawals as one bulk transfer. Outcomes are
    /// per item; one bad withdrawal never blocks the rest of the batch.
    pub async fn approve_batch(
        state: Arc<AppState>,
        ids: Vec<Uuid>,
    ) -> Result<BatchApproveResponse, ApiError> {
        let mut conn = state.db.get()?;

        let mut results = Vec::with_capacity(ids.len());
        let mut submittable: Vec<PreparedTransfer> = Vec::new();

        for id in ids {
            match Self::prepare_for_batch(&state, &mut conn, id).await {
                Ok(prepared) => submittable.push(prepared),
                Err(e) => results.push(BatchItemOutcome {
                    withdrawal_id: id,
                    success: false,
                    message: e.to_string(),
                }),
            }
        }

        if submittable.is_empty() {
            return Ok(BatchApproveResponse { results });
        }

        let items: Vec<BulkTransferItem> = submittable
            .iter()
            .map(|p| {
                Ok(BulkTransferItem {
                    amount_kobo: fee_service::to_kobo(p.withdrawal.amount)?,
                    recipient_code: p.recipient_code.clone(),
                    reference: p.reference.clone(),
                    reason: "WishWell wallet withdrawal".to_string(),
                })
            })
            .collect::<Result<_, ApiError>>()?;

        match state.paystack.initiate_bulk_transfer(&items).await {
            Ok(outcomes) => {
                for (prepared, outcome) in submittable.iter().zip(outcomes) {
                    debug_assert_eq!(outcome.reference, prepared.reference);
                    let withdrawal = &prepared.withdrawal;
                    match outcome.transfer_code {
                        Some(code) => {
                            let transitioned = diesel::update(
                                withdrawals::table
                                    .find(withdrawal.id)
                                    .filter(withdrawals::status.eq(WithdrawalStatus::Pending)),
                            )
                            .set((
                                withdrawals::status.eq(WithdrawalStatus::Processing),
                                withdrawals::processor_transfer_id.eq(&code),
                                withdrawals::processed_at.eq(Utc::now()),
                                withdrawals::updated_at.eq(Utc::now()),
                            ))
                            .execute(&mut conn)?;

                            if transitioned == 1 {
                                // Same approval notification as the single-item path.
                                if let Err(e) = state
                                    .email
                                    .withdrawal_approved(&prepared.user_email, withdrawal.amount)
                                    .await
                                {
                                    warn!("withdrawal.approve_batch: notification failed: {}", e);
                                }
                            }

                            results.push(BatchItemOutcome {
                                withdrawal_id: withdrawal.id,
                                success: transitioned == 1,
                                message: if transitioned == 1 {
                                    format!("Submitted as {}", code)
                                } else {
                                    "State changed during batch approval".to_string()
                                },
                            });
                        }
                        None => results.push(BatchItemOutcome {
                            withdrawal_id: withdrawal.id,
                            success: false,
                            message: outcome
                                .error
                                .unwrap_or_else(|| "Not acknowledged by processor".to_string()),
                        }),
                    }
                }
            }
            Err(e) => {
                // Batch call itself failed: every prepared item stays pending.
                error!("withdrawal.approve_batch: bulk submission failed: {}", e);
                for prepared in &submittable {
                    results.push(BatchItemOutcome {
                        withdrawal_id: prepared.withdrawal.id,
                        success: false,
                        message: "Processor rejected the batch, withdrawal left pending".to_string(),
                    });
                }
            }
        }

        Ok(BatchApproveResponse { results })
    }

    /// Admin rejection: pending → failed with the refund applied in the same
    /// transaction as the status flip.
    pub async fn reject(
        state: Arc<AppState>,
        withdrawal_id: Uuid,
        reason: &str,
    ) -> Result<WithdrawalDto, ApiError> {
        let mut conn = state.db.get()?;

        let updated = conn.transaction(|conn| {
            let updated = diesel::update(
                withdrawals::table
                    .find(withdrawal_id)
                    .filter(withdrawals::status.eq(WithdrawalStatus::Pending)),
            )
            .set((
                withdrawals::status.eq(WithdrawalStatus::Failed),
                withdrawals::failure_reason.eq(format!("Rejected: {}", reason)),
                withdrawals::updated_at.eq(Utc::now()),
            ))
            .get_result::<Withdrawal>(conn)
            .optional()?;

            let updated = match updated {
                Some(w) => w,
                None => {
                    let current = Self::find(conn, withdrawal_id)?;
                    return Err(ApiError::Validation(format!(
                        "Withdrawal is {} and cannot be rejected",
                        current.status
                    )));
                }
            };

            Self::refund(conn, &updated)?;
            Ok::<Withdrawal, ApiError>(updated)
        })?;

        info!("withdrawal.reject: {} rejected ({})", withdrawal_id, reason);

        let user_email = Self::user_email(&mut conn, updated.user_id)?;
        if let Err(e) = state
            .email
            .withdrawal_failed(&user_email, updated.amount, reason)
            .await
        {
            warn!("withdrawal.reject: notification failed: {}", e);
        }

        Ok(updated.into())
    }

    /// Applies an async transfer outcome from the processor. Terminal states
    /// are the source of truth: re-delivered or out-of-order callbacks for an
    /// already-settled withdrawal are no-ops.
    pub async fn handle_transfer_outcome(
        state: &AppState,
        outcome: TransferOutcome,
        transfer_code: Option<&str>,
        reference: Option<&str>,
        failure_reason: Option<String>,
    ) -> Result<(), ApiError> {
        let mut conn = state.db.get()?;

        let withdrawal = Self::find_by_transfer(&mut conn, transfer_code, reference)?;

        if withdrawal.status.is_terminal() {
            info!(
                "withdrawal.callback: {} already {}, ignoring duplicate",
                withdrawal.id, withdrawal.status
            );
            return Ok(());
        }
        if withdrawal.status != WithdrawalStatus::Processing {
            warn!(
                "withdrawal.callback: {} is {} but received {:?}, ignoring",
                withdrawal.id, withdrawal.status, outcome
            );
            return Ok(());
        }

        let settled = conn.transaction(|conn| {
            match outcome {
                TransferOutcome::Success => {
                    let updated = diesel::update(
                        withdrawals::table
                            .find(withdrawal.id)
                            .filter(withdrawals::status.eq(WithdrawalStatus::Processing)),
                    )
                    .set((
                        withdrawals::status.eq(WithdrawalStatus::Completed),
                        withdrawals::completed_at.eq(Utc::now()),
                        withdrawals::updated_at.eq(Utc::now()),
                    ))
                    .execute(conn)?;

                    if updated == 1 {
                        // The fee becomes platform revenue only once the payout
                        // actually went through.
                        diesel::insert_into(revenues::table)
                            .values(NewRevenue {
                                amount: withdrawal.fee,
                                revenue_type: RevenueType::WithdrawalFee,
                                source: format!("Withdrawal {}", withdrawal.id),
                                user_id: Some(withdrawal.user_id),
                                promise_id: None,
                                withdrawal_id: Some(withdrawal.id),
                                metadata: None,
                            })
                            .execute(conn)?;
                    }
                    Ok::<bool, ApiError>(updated == 1)
                }
                TransferOutcome::Failed | TransferOutcome::Reversed => {
                    let next = if outcome == TransferOutcome::Failed {
                        WithdrawalStatus::Failed
                    } else {
                        WithdrawalStatus::Reversed
                    };
                    let updated = diesel::update(
                        withdrawals::table
                            .find(withdrawal.id)
                            .filter(withdrawals::status.eq(WithdrawalStatus::Processing)),
                    )
                    .set((
                        withdrawals::status.eq(next),
                        withdrawals::failure_reason
                            .eq(failure_reason.clone().unwrap_or_else(|| "Transfer failed".to_string())),
                        withdrawals::updated_at.eq(Utc::now()),
                    ))
                    .execute(conn)?;

                    if updated == 1 {
                        Self::refund(conn, &withdrawal)?;
                    }
                    Ok(updated == 1)
                }
            }
        })?;

        if !settled {
            // Lost the race to a concurrent callback; that delivery owns the transition.
            return Ok(());
        }

        info!(
            "withdrawal.callback: {} settled as {:?}",
            withdrawal.id, outcome
        );

        let user_email = Self::user_email(&mut conn, withdrawal.user_id)?;
        let notify = match outcome {
            TransferOutcome::Success => {
                state
                    .email
                    .withdrawal_completed(&user_email, withdrawal.amount)
                    .await
            }
            TransferOutcome::Failed => {
                state
                    .email
                    .withdrawal_failed(
                        &user_email,
                        withdrawal.amount,
                        failure_reason.as_deref().unwrap_or("transfer failed"),
                    )
                    .await
            }
            TransferOutcome::Reversed => {
                state
                    .email
                    .withdrawal_reversed(&user_email, withdrawal.amount)
                    .await
            }
        };
        if let Err(e) = notify {
            warn!("withdrawal.callback: notification failed: {}", e);
        }

        Ok(())
    }

    pub fn list_pending(conn: &mut PgConnection) -> Result<Vec<Withdrawal>, ApiError> {
        withdrawals::table
            .filter(withdrawals::status.eq(WithdrawalStatus::Pending))
            .order(withdrawals::requested_at.asc())
            .select(Withdrawal::as_select())
            .load(conn)
            .map_err(ApiError::Database)
    }

    pub fn list_for_user(conn: &mut PgConnection, user_id: Uuid) -> Result<Vec<Withdrawal>, ApiError> {
        withdrawals::table
            .filter(withdrawals::user_id.eq(user_id))
            .order(withdrawals::requested_at.desc())
            .select(Withdrawal::as_select())
            .load(conn)
            .map_err(ApiError::Database)
    }

    fn find(conn: &mut PgConnection, id: Uuid) -> Result<Withdrawal, ApiError> {
        withdrawals::table
            .find(id)
            .select(Withdrawal::as_select())
            .first(conn)
            .optional()?
            .ok_or_else(|| ApiError::NotFound("Withdrawal".to_string()))
    }

    /// Either identifier may be present depending on the delivery path.
    fn find_by_transfer(
        conn: &mut PgConnection,
        transfer_code: Option<&str>,
        reference: Option<&str>,
    ) -> Result<Withdrawal, ApiError> {
        if let Some(code) = transfer_code {
            if let Some(w) = withdrawals::table
                .filter(withdrawals::processor_transfer_id.eq(code))
                .select(Withdrawal::as_select())
                .first(conn)
                .optional()?
            {
                return Ok(w);
            }
        }
        if let Some(reference) = reference {
            if let Some(w) = withdrawals::table
                .filter(withdrawals::transfer_reference.eq(reference))
                .select(Withdrawal::as_select())
                .first(conn)
                .optional()?
            {
                return Ok(w);
            }
        }
        Err(ApiError::NotFound("Withdrawal".to_string()))
    }

    /// Refund pair mirroring the reservation pair from request time. References
    /// are derived from the withdrawal id, so reject and failure callbacks
    /// converge on the same idempotent entries.
    fn refund(conn: &mut PgConnection, withdrawal: &Withdrawal) -> Result<(), ApiError> {
        LedgerService::credit(
            conn,
            withdrawal.user_id,
            withdrawal.amount,
            "Withdrawal refund",
            &format!("wd-{}-refund", withdrawal.id),
        )?;
        LedgerService::credit(
            conn,
            withdrawal.user_id,
            withdrawal.fee,
            "Withdrawal fee refund",
            &format!("wd-{}-fee-refund", withdrawal.id),
        )?;
        Ok(())
    }

    async fn ensure_recipient(
        state: &AppState,
        conn: &mut PgConnection,
        user: &User,
        withdrawal: &Withdrawal,
    ) -> Result<String, ApiError> {
        if let Some(code) = &user.payout_recipient_id {
            return Ok(code.clone());
        }

        let code = state
            .paystack
            .create_transfer_recipient(
                &withdrawal.account_name,
                &withdrawal.account_number,
                &withdrawal.bank_code,
            )
            .await?;

        diesel::update(users::table.find(user.id))
            .set((
                users::payout_recipient_id.eq(&code),
                users::updated_at.eq(Utc::now()),
            ))
            .execute(conn)?;

        info!("withdrawal: registered payout recipient for user {}", user.id);
        Ok(code)
    }

    /// A fresh idempotency key per submission attempt, persisted before the
    /// processor call so a crash mid-flight is still attributable.
    fn fresh_transfer_reference(
        conn: &mut PgConnection,
        withdrawal: &Withdrawal,
    ) -> Result<String, ApiError> {
        let reference = format!("wd-{}-{}", withdrawal.id, Uuid::new_v4().simple());
        diesel::update(withdrawals::table.find(withdrawal.id))
            .set((
                withdrawals::transfer_reference.eq(&reference),
                withdrawals::updated_at.eq(Utc::now()),
            ))
            .execute(conn)?;
        Ok(reference)
    }

    async fn prepare_for_batch(
        state: &AppState,
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<PreparedTransfer, ApiError> {
        let withdrawal = Self::find(conn, id)?;
        if withdrawal.status != WithdrawalStatus::Pending {
            return Err(ApiError::Validation(format!(
                "Withdrawal is {} and cannot be approved",
                withdrawal.status
            )));
        }
        let user = users::table
            .find(withdrawal.user_id)
            .select(User::as_select())
            .first::<User>(conn)?;
        let recipient_code = Self::ensure_recipient(state, conn, &user, &withdrawal).await?;
        let reference = Self::fresh_transfer_reference(conn, &withdrawal)?;
        Ok(PreparedTransfer {
            withdrawal,
            recipient_code,
            reference,
            user_email: user.email,
        })
    }

    fn user_email(conn: &mut PgConnection, user_id: Uuid) -> Result<String, ApiError> {
        users::table
            .find(user_id)
            .select(users::email)
            .first::<String>(conn)
            .map_err(ApiError::Database)
    }
}

/// Total a user must hold to request `amount`: principal plus the flat fee.
pub fn required_balance(amount: Decimal) -> Decimal {
    amount + withdrawal_fee()
}

/// Pure request guards: kobo precision, plan limits, and the reserve
/// requirement (principal + fee).
pub fn validate_request(
    plan: SubscriptionPlan,
    amount: Decimal,
    balance: Decimal,
) -> Result<(), ApiError> {
    if amount != amount.round_dp(2) {
        return Err(ApiError::Validation(
            "Amount cannot have more than two decimal places".to_string(),
        ));
    }
    if amount < plan.withdrawal_min() {
        return Err(ApiError::Validation(format!(
            "Minimum withdrawal on your plan is ₦{}",
            plan.withdrawal_min()
        )));
    }
    if amount > plan.withdrawal_max() {
        return Err(ApiError::Validation(format!(
            "Maximum withdrawal on your plan is ₦{}",
            plan.withdrawal_max()
        )));
    }
    if required_balance(amount) > balance {
        return Err(ApiError::InsufficientBalance);
    }
    Ok(())
}
