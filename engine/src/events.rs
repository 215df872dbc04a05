//! Settlement events
//!
//! Events are immutable records appended by the two mutating operations.
//! Each carries every field a downstream indexer needs to reconstruct
//! engine state; delivery to subscribers is an external concern.

use crate::types::{Amount, OrderId, OrderStatus, OrderType, Pair, Price, Side, TradeId};
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// A new resting order was created and escrow reserved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPlaced {
    pub order_id: OrderId,
    pub owner: Address,
    pub side: Side,
    pub pair: Pair,
    pub amount: Amount,
    pub price: Price,
    pub status: OrderStatus,
    pub order_type: OrderType,
    /// Escrow reserved for this order
    pub reserved: U256,
    /// Token the reservation was taken in
    pub reserved_token: String,
    pub created_at: u64,
}

/// A proposed match between two resting orders settled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeExecuted {
    pub trade_id: TradeId,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub buyer: Address,
    pub seller: Address,
    pub amount: Amount,
    pub price: Price,
    pub value: U256,
    pub fee: U256,
    pub buy_status: OrderStatus,
    pub sell_status: OrderStatus,
    pub executed_at: u64,
}

/// Enum wrapper for all engine events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DexEvent {
    OrderPlaced(OrderPlaced),
    TradeExecuted(TradeExecuted),
}
