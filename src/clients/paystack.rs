use crate::error::ApiError;
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use sha2::Sha512;
use subtle::ConstantTimeEq;
use tracing::{debug, error};

type HmacSha512 = Hmac<Sha512>;

/// Thin wrapper over the Paystack REST API. Every call unwraps the
/// `{status, message, data}` envelope; `status: false` is a hard upstream
/// failure and never mutates local state.
#[derive(Clone)]
pub struct PaystackClient {
    http: Client,
    base_url: String,
    secret_key: String,
}

#[derive(Debug, Deserialize)]
pub struct ChargeVerification {
    pub status: String,
    pub amount: i64,
    pub reference: String,
}

#[derive(Debug)]
pub struct BulkTransferItem {
    pub amount_kobo: i64,
    pub recipient_code: String,
    pub reference: String,
    pub reason: String,
}

#[derive(Debug)]
pub struct BulkTransferOutcome {
    pub reference: String,
    pub transfer_code: Option<String>,
    pub error: Option<String>,
}

impl PaystackClient {
    pub fn new(base_url: String, secret_key: String) -> Self {
        PaystackClient {
            http: Client::new(),
            base_url,
            secret_key,
        }
    }

    /// Verifies the HMAC-SHA512 signature Paystack sends with every webhook.
    /// Must run on the raw body before anything is parsed.
    pub fn verify_signature(
        secret: &str,
        payload: &[u8],
        actual_signature: &str,
    ) -> Result<(), ApiError> {
        let mut mac = HmacSha512::new_from_slice(secret.as_bytes())
            .map_err(|_| ApiError::Internal("Invalid webhook secret".to_string()))?;
        mac.update(payload);
        let expected = hex::encode(mac.finalize().into_bytes());

        if expected
            .as_bytes()
            .ct_eq(actual_signature.as_bytes())
            .unwrap_u8()
            != 1
        {
            return Err(ApiError::SignatureMismatch);
        }
        Ok(())
    }

    pub async fn create_transfer_recipient(
        &self,
        account_name: &str,
        account_number: &str,
        bank_code: &str,
    ) -> Result<String, ApiError> {
        let data = self
            .post(
                "/transferrecipient",
                &json!({
                    "type": "nuban",
                    "name": account_name,
                    "account_number": account_number,
                    "bank_code": bank_code,
                    "currency": "NGN",
                }),
            )
            .await?;

        data["recipient_code"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                error!("paystack: recipient response missing recipient_code");
                ApiError::Upstream("Invalid recipient response".to_string())
            })
    }

    pub async fn initiate_transfer(
        &self,
        amount_kobo: i64,
        recipient_code: &str,
        reference: &str,
        reason: &str,
    ) -> Result<String, ApiError> {
        let data = self
            .post(
                "/transfer",
                &json!({
                    "source": "balance",
                    "amount": amount_kobo,
                    "recipient": recipient_code,
                    "reference": reference,
                    "reason": reason,
                }),
            )
            .await?;

        data["transfer_code"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                error!("paystack: transfer response missing transfer_code");
                ApiError::Upstream("Invalid transfer response".to_string())
            })
    }

    /// Submits several transfers in one call. Paystack acknowledges each item
    /// independently, so the result is per-item; references missing from the
    /// response are reported as failed rather than failing the whole batch.
    pub async fn initiate_bulk_transfer(
        &self,
        items: &[BulkTransferItem],
    ) -> Result<Vec<BulkTransferOutcome>, ApiError> {
        let transfers: Vec<Value> = items
            .iter()
            .map(|t| {
                json!({
                    "amount": t.amount_kobo,
                    "recipient": t.recipient_code,
                    "reference": t.reference,
                    "reason": t.reason,
                })
            })
            .collect();

        let data = self
            .post(
                "/transfer/bulk",
                &json!({
                    "source": "balance",
                    "currency": "NGN",
                    "transfers": transfers,
                }),
            )
            .await?;

        let accepted = data.as_array().cloned().unwrap_or_default();
        let outcomes = items
            .iter()
            .map(|item| {
                let entry = accepted
                    .iter()
                    .find(|a| a["reference"].as_str() == Some(item.reference.as_str()));
                match entry {
                    Some(a) => BulkTransferOutcome {
                        reference: item.reference.clone(),
                        transfer_code: a["transfer_code"].as_str().map(str::to_string),
                        error: None,
                    },
                    None => BulkTransferOutcome {
                        reference: item.reference.clone(),
                        transfer_code: None,
                        error: Some("Transfer not acknowledged by processor".to_string()),
                    },
                }
            })
            .collect();

        Ok(outcomes)
    }

    pub async fn initialize_charge(
        &self,
        email: &str,
        amount_kobo: i64,
        reference: &str,
        callback_url: &str,
    ) -> Result<String, ApiError> {
        let data = self
            .post(
                "/transaction/initialize",
                &json!({
                    "email": email,
                    "amount": amount_kobo,
                    "reference": reference,
                    "callback_url": callback_url,
                }),
            )
            .await?;

        data["authorization_url"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                error!("paystack: initialize response missing authorization_url");
                ApiError::Upstream("Invalid charge initialization response".to_string())
            })
    }

    pub async fn verify_charge(&self, reference: &str) -> Result<ChargeVerification, ApiError> {
        let data = self
            .get(&format!("/transaction/verify/{}", reference))
            .await?;

        serde_json::from_value(data).map_err(|e| {
            error!("paystack: malformed verification response: {}", e);
            ApiError::Upstream("Invalid charge verification response".to_string())
        })
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let resp = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .header("Authorization", format!("Bearer {}", self.secret_key))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!("paystack: request to {} failed: {}", path, e);
                ApiError::Upstream(e.to_string())
            })?;

        Self::unwrap_envelope(path, resp.json::<Value>().await?)
    }

    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        let resp = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .header("Authorization", format!("Bearer {}", self.secret_key))
            .send()
            .await
            .map_err(|e| {
                error!("paystack: request to {} failed: {}", path, e);
                ApiError::Upstream(e.to_string())
            })?;

        Self::unwrap_envelope(path, resp.json::<Value>().await?)
    }

    fn unwrap_envelope(path: &str, body: Value) -> Result<Value, ApiError> {
        if body["status"].as_bool() != Some(true) {
            let message = body["message"]
                .as_str()
                .unwrap_or("Unknown processor error")
                .to_string();
            error!("paystack: {} returned status=false: {}", path, message);
            return Err(ApiError::Upstream(message));
        }
        debug!("paystack: {} ok", path);
        Ok(body["data"].clone())
    }
}
