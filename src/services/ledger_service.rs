use crate::error::ApiError;
use crate::models::entities::{NewWalletTransaction, WalletTransaction};
use crate::models::enums::EntryType;
use crate::schema::{users, wallet_transactions};
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

/// Result of applying (or re-applying) a ledger operation.
pub struct LedgerOutcome {
    pub balance: Decimal,
    pub entry: WalletTransaction,
    pub already_applied: bool,
}

/// The single door through which wallet balances change. One signed delta, one
/// append-only entry, both inside one database transaction, keyed by a unique
/// reference so redelivered webhooks and concurrent retries collapse to a no-op.
pub struct LedgerService;

impl LedgerService {
    pub fn credit(
        conn: &mut PgConnection,
        user_id: Uuid,
        amount: Decimal,
        description: &str,
        reference: &str,
    ) -> Result<LedgerOutcome, ApiError> {
        if amount <= Decimal::ZERO {
            return Err(ApiError::Validation("Credit amount must be positive".to_string()));
        }
        Self::apply(conn, user_id, amount, EntryType::Credit, description, reference)
    }

    pub fn debit(
        conn: &mut PgConnection,
        user_id: Uuid,
        amount: Decimal,
        description: &str,
        reference: &str,
    ) -> Result<LedgerOutcome, ApiError> {
        if amount <= Decimal::ZERO {
            return Err(ApiError::Validation("Debit amount must be positive".to_string()));
        }
        Self::apply(conn, user_id, -amount, EntryType::Debit, description, reference)
    }

    fn apply(
        conn: &mut PgConnection,
        user_id: Uuid,
        signed_amount: Decimal,
        entry_type: EntryType,
        description: &str,
        reference: &str,
    ) -> Result<LedgerOutcome, ApiError> {
        let result = conn.transaction(|conn| {
            if let Some(existing) = Self::find_by_reference(conn, reference)? {
                info!("ledger.apply: reference {} already applied, no-op", reference);
                let balance = Self::current_balance(conn, user_id)?;
                return Ok(LedgerOutcome {
                    balance,
                    entry: existing,
                    already_applied: true,
                });
            }

            // Balance mutation is a single conditional update, never
            // read-then-write; the debit guard makes overdrafts impossible even
            // under concurrent requests for the same user.
            let update = diesel::update(users::table.filter(users::id.eq(user_id)));
            let balance_after = match entry_type {
                EntryType::Debit => update
                    .filter(users::wallet_balance.ge(-signed_amount))
                    .set((
                        users::wallet_balance.eq(users::wallet_balance + signed_amount),
                        users::updated_at.eq(Utc::now()),
                    ))
                    .returning(users::wallet_balance)
                    .get_result::<Decimal>(conn)
                    .optional()?,
                EntryType::Credit => diesel::update(users::table.filter(users::id.eq(user_id)))
                    .set((
                        users::wallet_balance.eq(users::wallet_balance + signed_amount),
                        users::updated_at.eq(Utc::now()),
                    ))
                    .returning(users::wallet_balance)
                    .get_result::<Decimal>(conn)
                    .optional()?,
            };

            let balance_after = match balance_after {
                Some(balance) => balance,
                None => {
                    let user_exists = diesel::select(diesel::dsl::exists(
                        users::table.filter(users::id.eq(user_id)),
                    ))
                    .get_result::<bool>(conn)?;
                    if user_exists {
                        warn!(
                            "ledger.apply: insufficient balance for user {} (reference {})",
                            user_id, reference
                        );
                        return Err(ApiError::InsufficientBalance);
                    }
                    return Err(ApiError::NotFound("User".to_string()));
                }
            };

            let entry = diesel::insert_into(wallet_transactions::table)
                .values(NewWalletTransaction::for_applied_delta(
                    user_id,
                    signed_amount,
                    entry_type,
                    description,
                    reference,
                    balance_after,
                ))
                .get_result::<WalletTransaction>(conn)?;

            info!(
                "ledger.apply: user {} {} {} (reference {}, balance {})",
                user_id, entry_type, signed_amount.abs(), reference, balance_after
            );

            Ok(LedgerOutcome {
                balance: balance_after,
                entry,
                already_applied: false,
            })
        });

        match result {
            // A concurrent writer committed the same reference first. Their entry
            // is the canonical one; surface it as already applied.
            Err(ApiError::Database(DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                _,
            ))) => {
                let entry = Self::find_by_reference(conn, reference)?.ok_or_else(|| {
                    ApiError::Internal(format!(
                        "Duplicate ledger reference {} but no entry found",
                        reference
                    ))
                })?;
                let balance = Self::current_balance(conn, user_id)?;
                Ok(LedgerOutcome {
                    balance,
                    entry,
                    already_applied: true,
                })
            }
            other => other,
        }
    }

    pub fn find_by_reference(
        conn: &mut PgConnection,
        reference: &str,
    ) -> Result<Option<WalletTransaction>, ApiError> {
        wallet_transactions::table
            .filter(wallet_transactions::reference.eq(reference))
            .select(WalletTransaction::as_select())
            .first(conn)
            .optional()
            .map_err(ApiError::Database)
    }

    pub fn current_balance(conn: &mut PgConnection, user_id: Uuid) -> Result<Decimal, ApiError> {
        users::table
            .find(user_id)
            .select(users::wallet_balance)
            .first::<Decimal>(conn)
            .optional()?
            .ok_or_else(|| ApiError::NotFound("User".to_string()))
    }

    pub fn history(
        conn: &mut PgConnection,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<WalletTransaction>, ApiError> {
        wallet_transactions::table
            .filter(wallet_transactions::user_id.eq(user_id))
            .order(wallet_transactions::created_at.desc())
            .limit(limit)
            .select(WalletTransaction::as_select())
            .load(conn)
            .map_err(ApiError::Database)
    }
}
