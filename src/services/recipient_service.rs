use crate::error::ApiError;
use crate::models::dtos::{BankDetailsRequest, BankDetailsResponse};
use crate::models::AppState;
use crate::schema::users;
use chrono::Utc;
use diesel::prelude::*;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct RecipientService;

impl RecipientService {
    /// Rotates the user's payout destination. The replacement recipient is
    /// registered at the processor first; the stored snapshot and recipient
    /// pointer only change once that succeeds, so an in-flight transfer can
    /// still resolve the old code and a processor failure changes nothing.
    pub async fn rotate(
        state: Arc<AppState>,
        user_id: Uuid,
        req: BankDetailsRequest,
    ) -> Result<BankDetailsResponse, ApiError> {
        if !req.account_number.chars().all(|c| c.is_ascii_digit()) {
            return Err(ApiError::Validation(
                "Account number must contain only digits".to_string(),
            ));
        }

        let recipient_code = state
            .paystack
            .create_transfer_recipient(&req.account_name, &req.account_number, &req.bank_code)
            .await?;

        let mut conn = state.db.get()?;
        let updated = diesel::update(users::table.find(user_id))
            .set((
                users::account_name.eq(&req.account_name),
                users::account_number.eq(&req.account_number),
                users::bank_code.eq(&req.bank_code),
                users::payout_recipient_id.eq(&recipient_code),
                users::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;
        if updated == 0 {
            return Err(ApiError::NotFound("User".to_string()));
        }

        info!("recipient.rotate: user {} now pays out to {}", user_id, recipient_code);

        Ok(BankDetailsResponse {
            account_name: req.account_name,
            account_number: req.account_number,
            bank_code: req.bank_code,
            payout_recipient_id: recipient_code,
        })
    }
}
