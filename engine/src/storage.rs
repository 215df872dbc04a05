use crate::engine::DexEngine;
use crate::escrow::EscrowLedger;
use crate::orders::OrderStore;
use crate::trades::TradeLog;
use crate::types::{Order, Trade, TradeId};
use alloy_primitives::{Address, U256};
use anyhow::Result;
use rocksdb::{IteratorMode, Options, DB};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Engine storage layer using RocksDB
pub struct DexStorage {
    db: DB,
}

/// Escrow entry as persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EscrowRecord {
    user: Address,
    token: String,
    amount: U256,
}

/// Counters and aggregates persisted as a single record
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StatsRecord {
    total_volume: U256,
    total_fees: U256,
    height: u64,
}

impl DexStorage {
    /// Create a new storage instance
    pub fn new(path: &str) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);

        let db = DB::open(&opts, path)?;
        Ok(Self { db })
    }

    /// Store an order
    pub fn store_order(&self, order: &Order) -> Result<()> {
        let key = format!("order:{}", order.id);
        let value = serde_json::to_vec(order)?;
        self.db.put(key.as_bytes(), value)?;
        Ok(())
    }

    /// Load all orders
    pub fn load_orders(&self) -> Result<Vec<Order>> {
        let mut orders = Vec::new();

        let iter = self.db.iterator(IteratorMode::Start);
        for item in iter {
            let (key, value) = item?;
            let key_str = String::from_utf8_lossy(&key);

            if key_str.starts_with("order:") {
                let order: Order = serde_json::from_slice(&value)?;
                orders.push(order);
            }
        }

        Ok(orders)
    }

    /// Store a trade under its id
    pub fn store_trade(&self, trade_id: TradeId, trade: &Trade) -> Result<()> {
        let key = format!("trade:{}", trade_id);
        let value = serde_json::to_vec(&(trade_id, trade))?;
        self.db.put(key.as_bytes(), value)?;
        Ok(())
    }

    /// Load all trades with their ids
    pub fn load_trades(&self) -> Result<Vec<(TradeId, Trade)>> {
        let mut trades = Vec::new();

        let iter = self.db.iterator(IteratorMode::Start);
        for item in iter {
            let (key, value) = item?;
            let key_str = String::from_utf8_lossy(&key);

            if key_str.starts_with("trade:") {
                let entry: (TradeId, Trade) = serde_json::from_slice(&value)?;
                trades.push(entry);
            }
        }

        Ok(trades)
    }

    /// Store one escrow entry
    pub fn store_escrow_entry(&self, user: Address, token: &str, amount: U256) -> Result<()> {
        let key = format!("escrow:{}:{}", user, token);
        let record = EscrowRecord {
            user,
            token: token.to_string(),
            amount,
        };
        let value = serde_json::to_vec(&record)?;
        self.db.put(key.as_bytes(), value)?;
        Ok(())
    }

    /// Load all escrow entries
    pub fn load_escrow(&self) -> Result<Vec<(Address, String, U256)>> {
        let mut entries = Vec::new();

        let iter = self.db.iterator(IteratorMode::Start);
        for item in iter {
            let (key, value) = item?;
            let key_str = String::from_utf8_lossy(&key);

            if key_str.starts_with("escrow:") {
                let record: EscrowRecord = serde_json::from_slice(&value)?;
                entries.push((record.user, record.token, record.amount));
            }
        }

        Ok(entries)
    }

    fn store_stats(&self, stats: &StatsRecord) -> Result<()> {
        let value = serde_json::to_vec(stats)?;
        self.db.put(b"stats", value)?;
        Ok(())
    }

    fn load_stats(&self) -> Result<Option<StatsRecord>> {
        match self.db.get(b"stats")? {
            Some(value) => Ok(Some(serde_json::from_slice(&value)?)),
            None => Ok(None),
        }
    }

    /// Persist a full engine snapshot
    pub fn save_engine(&self, engine: &DexEngine) -> Result<()> {
        for order in engine.orders().iter() {
            self.store_order(order)?;
        }
        for (trade_id, trade) in engine.trades().iter() {
            self.store_trade(*trade_id, trade)?;
        }
        for ((user, token), amount) in engine.escrow().iter() {
            self.store_escrow_entry(*user, token, *amount)?;
        }
        self.store_stats(&StatsRecord {
            total_volume: engine.trades().total_volume(),
            total_fees: engine.trades().total_fees(),
            height: engine.block_height(),
        })?;
        Ok(())
    }

    /// Rebuild an engine from a persisted snapshot
    ///
    /// An empty database yields a fresh engine.
    pub fn load_engine(&self) -> Result<DexEngine> {
        let orders = self.load_orders()?;
        let trades = self.load_trades()?;
        let escrow_entries = self.load_escrow()?;
        let stats = self.load_stats()?.unwrap_or(StatsRecord {
            total_volume: U256::ZERO,
            total_fees: U256::ZERO,
            height: 0,
        });

        info!(
            "restored {} orders, {} trades from storage",
            orders.len(),
            trades.len()
        );

        let order_store = OrderStore::restore(orders);
        let trade_log = TradeLog::restore(trades, stats.total_volume, stats.total_fees);
        let mut escrow = EscrowLedger::new();
        for (user, token, amount) in escrow_entries {
            escrow.set_balance(user, token, amount);
        }

        Ok(DexEngine::from_parts(
            order_store,
            escrow,
            trade_log,
            stats.height,
        ))
    }

    /// Get reference to the underlying DB (for advanced operations)
    pub fn db(&self) -> &DB {
        &self.db
    }
}
