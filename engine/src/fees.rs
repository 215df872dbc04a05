use crate::types::{Amount, Price};
use alloy_primitives::U256;

/// Trading fee in basis points (10000 = 100%)
pub const FEE_BPS: u64 = 30;

/// Basis-point denominator
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Quote-token value of a fill: floor(amount * price / SCALE)
///
/// Computed at U256 width so u64-scale operands cannot overflow.
pub fn trade_value(amount: Amount, price: Price) -> U256 {
    U256::from(amount) * U256::from(price.0) / U256::from(Price::SCALE)
}

/// Fee on a trade value: floor(value * 30 / 10000)
pub fn calculate_fee(value: U256) -> U256 {
    value * U256::from(FEE_BPS) / U256::from(BPS_DENOMINATOR)
}
