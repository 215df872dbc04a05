use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique order identifier
pub type OrderId = u64;

/// Trade identifier (drawn from the running total-volume counter)
pub type TradeId = U256;

/// Quantity in base-asset units, fixed-point at `Price::SCALE`
pub type Amount = u64;

/// Price in fixed-point representation (6 decimals)
/// Example: 1_500_000 = $1.50
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Price(pub u64);

impl Price {
    pub const DECIMALS: u32 = 6;
    pub const SCALE: u64 = 1_000_000;

    pub fn from_float(price: f64) -> Self {
        Self((price * Self::SCALE as f64) as u64)
    }

    pub fn to_float(&self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }
}

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

/// Order type
///
/// Only limit orders exist; market, stop etc. are not part of this engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    Limit,
}

/// Order lifecycle status
///
/// Transitions are monotonic: Open -> {Partial, Filled}, Partial -> Filled.
/// Derived from filled_amount vs amount but also stored on the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Open,
    Partial,
    Filled,
}

/// Trading pair, e.g. base "STX" quoted in "USDT"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pair {
    pub base: String,
    pub quote: String,
}

impl Pair {
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            quote: quote.into(),
        }
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.base, self.quote)
    }
}

impl FromStr for Pair {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('-') {
            Some((base, quote)) if !base.is_empty() && !quote.is_empty() => {
                Ok(Self::new(base, quote))
            }
            _ => Err(format!("invalid pair symbol: {}", s)),
        }
    }
}

/// A resting limit order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub owner: Address,
    pub side: Side,
    pub pair: Pair,
    pub amount: Amount,
    pub price: Price,
    /// Cumulative quantity matched so far (0 <= filled_amount <= amount)
    pub filled_amount: Amount,
    pub status: OrderStatus,
    pub order_type: OrderType,
    /// Block height at creation
    pub created_at: u64,
}

impl Order {
    pub fn new(
        id: OrderId,
        owner: Address,
        side: Side,
        pair: Pair,
        amount: Amount,
        price: Price,
        created_at: u64,
    ) -> Self {
        Self {
            id,
            owner,
            side,
            pair,
            amount,
            price,
            filled_amount: 0,
            status: OrderStatus::Open,
            order_type: OrderType::Limit,
            created_at,
        }
    }

    /// Unfilled quantity
    pub fn remaining(&self) -> Amount {
        self.amount - self.filled_amount
    }

    pub fn is_filled(&self) -> bool {
        self.filled_amount == self.amount
    }
}

/// Immutable record of one settlement event
///
/// Only the buy order id is recorded; the sell side is captured through
/// the seller identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub buy_order_id: OrderId,
    pub buyer: Address,
    pub seller: Address,
    pub amount: Amount,
    pub price: Price,
    pub fee: U256,
    /// Block height at settlement
    pub executed_at: u64,
}

/// Settlement terms returned by a successful trade execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeReceipt {
    pub amount: Amount,
    pub price: Price,
    /// Quote-token value of the trade: floor(amount * price / SCALE)
    pub value: U256,
    pub fee: U256,
}

/// Engine-wide aggregate counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DexStats {
    pub total_volume: U256,
    pub total_fees: U256,
    pub next_order_id: OrderId,
}
