//! Monetary arithmetic for the platform
//!
//! All amounts are fixed-point `Decimal` values carried in Uzbek so'm with
//! two fractional digits. Floating point is never used for money: rounding
//! happens exactly once per derived value, half away from zero.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Number of fractional digits carried by every monetary value
pub const MONEY_SCALE: u32 = 2;

/// Lowest commission rate the platform will apply at release time
pub const COMMISSION_RATE_MIN: Decimal = dec!(10);

/// Highest commission rate the platform will apply at release time
pub const COMMISSION_RATE_MAX: Decimal = dec!(15);

/// Commission rate stamped onto new orders
pub const COMMISSION_RATE_DEFAULT: Decimal = dec!(12);

/// Round a monetary value to two fractional digits, half away from zero
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamp a stored commission rate into the platform's allowed band
///
/// The stored rate is re-clamped on every release so a stale or corrupted
/// row can never take more (or less) than the band allows.
pub fn clamp_commission_rate(rate: Decimal) -> Decimal {
    rate.clamp(COMMISSION_RATE_MIN, COMMISSION_RATE_MAX)
}

/// Result of splitting an escrowed amount between specialist and platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionSplit {
    /// Effective (clamped) commission rate in percent
    pub rate: Decimal,
    /// Platform's cut, rounded to two digits
    pub commission: Decimal,
    /// Specialist's income, the exact complement of the commission
    pub specialist_income: Decimal,
}

impl CommissionSplit {
    /// Split an escrowed amount at the given stored rate
    ///
    /// The commission is the only rounded value; the specialist income is
    /// computed as the exact complement so the two always sum back to the
    /// escrowed amount.
    pub fn compute(escrow_amount: Decimal, stored_rate: Decimal) -> Self {
        let rate = clamp_commission_rate(stored_rate);
        let commission = round_money(escrow_amount * rate / dec!(100));
        let specialist_income = escrow_amount - commission;
        Self {
            rate,
            commission,
            specialist_income,
        }
    }
}
