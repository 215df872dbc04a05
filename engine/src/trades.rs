use crate::types::{Trade, TradeId};
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Append-only trade log with running aggregates
///
/// Trades are keyed by the post-update cumulative volume rather than an
/// independent counter, preserving the upstream contract's keying. A
/// zero-value settlement therefore keys onto the unchanged cumulative
/// volume and overwrites the previous zero-value record at that key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeLog {
    trades: HashMap<TradeId, Trade>,
    total_volume: U256,
    total_fees: U256,
}

impl TradeLog {
    pub fn new() -> Self {
        Self {
            trades: HashMap::new(),
            total_volume: U256::ZERO,
            total_fees: U256::ZERO,
        }
    }

    /// Rebuild a log from persisted trades and aggregates
    pub fn restore(trades: Vec<(TradeId, Trade)>, total_volume: U256, total_fees: U256) -> Self {
        Self {
            trades: trades.into_iter().collect(),
            total_volume,
            total_fees,
        }
    }

    /// Fold a settlement into the aggregates and append the trade
    ///
    /// Returns the trade id under which the record was stored.
    pub fn record(&mut self, value: U256, fee: U256, trade: Trade) -> TradeId {
        self.total_volume = self.total_volume.saturating_add(value);
        self.total_fees = self.total_fees.saturating_add(fee);

        let trade_id = self.total_volume;
        self.trades.insert(trade_id, trade);
        trade_id
    }

    pub fn get(&self, trade_id: TradeId) -> Option<&Trade> {
        self.trades.get(&trade_id)
    }

    pub fn total_volume(&self) -> U256 {
        self.total_volume
    }

    pub fn total_fees(&self) -> U256 {
        self.total_fees
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TradeId, &Trade)> {
        self.trades.iter()
    }
}

impl Default for TradeLog {
    fn default() -> Self {
        Self::new()
    }
}
