// OpenSettle Core Settlement Engine
//
// A minimal on-chain order book and trade-settlement engine: limit order
// placement with advisory escrow reservation, and settlement of proposed
// matches between resting buy and sell orders at the seller's limit price
// with a 30 bps fee. Matching selection is an external responsibility;
// this crate validates and settles.

pub mod engine;
pub mod errors;
pub mod escrow;
pub mod events;
pub mod fees;
pub mod orders;
pub mod storage;
pub mod trades;
pub mod types;

// Re-export commonly used types
pub use engine::{DexEngine, OrderBookView};
pub use errors::DexError;
pub use escrow::{Custody, EscrowLedger};
pub use events::{DexEvent, OrderPlaced, TradeExecuted};
pub use fees::{calculate_fee, trade_value, BPS_DENOMINATOR, FEE_BPS};
pub use orders::OrderStore;
pub use storage::DexStorage;
pub use trades::TradeLog;
pub use types::{
    Amount, DexStats, Order, OrderId, OrderStatus, OrderType, Pair, Price, Side, Trade, TradeId,
    TradeReceipt,
};
