use crate::error::ApiError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Percentage of a promise's desired amount retained by the platform on settlement.
pub const PLATFORM_SERVICE_CHARGE_PCT: u32 = 5;

/// Flat fee debited alongside every withdrawal, in NGN.
pub fn withdrawal_fee() -> Decimal {
    Decimal::new(100, 0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FeeClass {
    #[default]
    Local,
    International,
}

#[derive(Debug, Clone, Copy)]
pub struct FeeSchedule {
    pub percentage: Decimal,
    pub flat_fee: Decimal,
    pub cap: Option<Decimal>,
}

impl FeeClass {
    pub fn schedule(&self) -> FeeSchedule {
        match self {
            // Paystack NGN card charges: 1.5% + ₦100, capped at ₦2,000.
            FeeClass::Local => FeeSchedule {
                percentage: Decimal::new(15, 3),
                flat_fee: Decimal::new(100, 0),
                cap: Some(Decimal::new(2_000, 0)),
            },
            // International cards: 3.9% + ₦100, uncapped.
            FeeClass::International => FeeSchedule {
                percentage: Decimal::new(39, 3),
                flat_fee: Decimal::new(100, 0),
                cap: None,
            },
        }
    }
}

/// Result of grossing a desired net amount up so that processor fees land on the
/// payer. `net_amount` and `fees_passed` are recomputed from the rounded charge;
/// callers must credit from those, not from `desired_net`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeBreakdown {
    pub desired_net: Decimal,
    pub applicable_fee: Decimal,
    pub charge_amount: Decimal,
    pub net_amount: Decimal,
    pub fees_passed: Decimal,
    pub capped: bool,
}

/// Computes the gross amount to charge so the payee nets `desired_net` after the
/// processor takes its cut. Pure; rounding is half-up to the kobo.
pub fn calculate_charge(desired_net: Decimal, class: FeeClass) -> Result<ChargeBreakdown, ApiError> {
    if desired_net <= Decimal::ZERO {
        return Err(ApiError::Validation(
            "Amount must be greater than zero".to_string(),
        ));
    }

    let schedule = class.schedule();
    let applicable_fee = desired_net * schedule.percentage + schedule.flat_fee;

    let (charge_amount, capped) = match schedule.cap {
        Some(cap) if applicable_fee >= cap => (desired_net + cap, true),
        _ => {
            let divisor = Decimal::ONE - schedule.percentage;
            if divisor <= Decimal::ZERO {
                return Err(ApiError::Internal("Fee percentage must be below 100%".to_string()));
            }
            (
                ((desired_net + schedule.flat_fee) / divisor)
                    .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
                false,
            )
        }
    };

    // Rounding shifted the charge, so the fee has to be recomputed from it.
    let recomputed = charge_amount * schedule.percentage + schedule.flat_fee;
    let fees_passed = match schedule.cap {
        Some(cap) if recomputed >= cap => cap,
        _ => recomputed.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
    };
    let net_amount = charge_amount - fees_passed;

    Ok(ChargeBreakdown {
        desired_net,
        applicable_fee,
        charge_amount,
        net_amount,
        fees_passed,
        capped,
    })
}

/// Platform's own cut of a promise settlement, rounded half-up to the kobo.
pub fn platform_service_charge(desired_amount: Decimal) -> Decimal {
    (desired_amount * Decimal::new(PLATFORM_SERVICE_CHARGE_PCT as i64, 2))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Paystack speaks kobo; everything internal is NGN major units.
pub fn to_kobo(amount: Decimal) -> Result<i64, ApiError> {
    (amount * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(|| ApiError::Internal(format!("Amount out of range: {}", amount)))
}

pub fn from_kobo(kobo: i64) -> Decimal {
    Decimal::new(kobo, 2)
}
