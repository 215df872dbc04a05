use crate::errors::DexError;
use crate::escrow::{Custody, EscrowLedger};
use crate::events::{DexEvent, OrderPlaced, TradeExecuted};
use crate::fees;
use crate::orders::OrderStore;
use crate::trades::TradeLog;
use crate::types::*;
use alloy_primitives::{Address, U256};
use tracing::debug;

/// Order-book view returned by [`DexEngine::get_order_book`]
///
/// Placeholder aggregation only; a real book view is an indexer concern.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBookView {
    pub pair: Pair,
    pub bids: Vec<OrderId>,
    pub asks: Vec<OrderId>,
}

/// On-chain order book and trade-settlement engine
///
/// Holds the order store, the advisory escrow ledger, the trade log and
/// the event emission log behind one mutation surface. Every operation
/// runs to completion on `&mut self`; a host needing shared access wraps
/// the engine in a single mutual-exclusion domain. Each operation either
/// fully commits or returns an error having mutated nothing: all
/// preconditions are checked before the first write.
///
/// The engine does not search for matches. Matching selection is an
/// external responsibility; `execute_trade` only validates and settles a
/// proposed pairing.
pub struct DexEngine {
    orders: OrderStore,
    escrow: EscrowLedger,
    trades: TradeLog,
    events: Vec<DexEvent>,
    /// Block height supplied by the host, recorded on orders and trades
    height: u64,
}

impl DexEngine {
    pub fn new() -> Self {
        Self {
            orders: OrderStore::new(),
            escrow: EscrowLedger::new(),
            trades: TradeLog::new(),
            events: Vec::new(),
            height: 0,
        }
    }

    /// Rebuild an engine from persisted state
    ///
    /// The event log restarts empty: emitted events belong to the
    /// indexers that consumed them, not to engine state.
    pub fn from_parts(
        orders: OrderStore,
        escrow: EscrowLedger,
        trades: TradeLog,
        height: u64,
    ) -> Self {
        Self {
            orders,
            escrow,
            trades,
            events: Vec::new(),
            height,
        }
    }

    /// Record the current block height supplied by the host
    pub fn set_block_height(&mut self, height: u64) {
        self.height = height;
    }

    pub fn block_height(&self) -> u64 {
        self.height
    }

    /// Validate and create a resting limit order, reserving escrow
    ///
    /// Buy orders reserve `floor(amount * price / SCALE)` of the quote
    /// token; sell orders reserve `amount` of the base token. The
    /// reservation is advisory bookkeeping through the [`Custody`]
    /// capability; no real balance is checked.
    pub fn place_limit_order(
        &mut self,
        caller: Address,
        side: Side,
        pair: Pair,
        amount: Amount,
        price: Price,
    ) -> Result<OrderId, DexError> {
        if amount == 0 {
            return Err(DexError::InvalidAmount);
        }
        if price.0 == 0 {
            return Err(DexError::InvalidPrice);
        }

        let (required, token) = match side {
            Side::Buy => (fees::trade_value(amount, price), pair.quote.clone()),
            Side::Sell => (U256::from(amount), pair.base.clone()),
        };

        // Reserve before any store mutation; a custodian may veto.
        self.escrow.reserve(caller, &token, required)?;

        let order_id = self.orders.allocate_id();
        let order = Order::new(order_id, caller, side, pair, amount, price, self.height);

        self.events.push(DexEvent::OrderPlaced(OrderPlaced {
            order_id,
            owner: caller,
            side,
            pair: order.pair.clone(),
            amount,
            price,
            status: order.status,
            order_type: order.order_type,
            reserved: required,
            reserved_token: token,
            created_at: order.created_at,
        }));
        self.orders.insert(order);

        debug!(
            "order {} placed: {:?} {} at {} by {}",
            order_id, side, amount, price.0, caller
        );
        Ok(order_id)
    }

    /// Settle a proposed match between a resting buy and sell order
    ///
    /// The trade executes at the seller's limit price; the buyer keeps
    /// any spread as price improvement. Preconditions are checked in a
    /// fixed order and the first failure returns with no state change.
    pub fn execute_trade(
        &mut self,
        caller: Address,
        buy_order_id: OrderId,
        sell_order_id: OrderId,
        amount: Amount,
    ) -> Result<TradeReceipt, DexError> {
        let buy = self
            .orders
            .get(buy_order_id)
            .ok_or(DexError::OrderNotFound)?
            .clone();
        let sell = self
            .orders
            .get(sell_order_id)
            .ok_or(DexError::OrderNotFound)?
            .clone();

        if buy.side != Side::Buy || sell.side != Side::Sell {
            return Err(DexError::InvalidSide);
        }
        if buy.pair != sell.pair {
            return Err(DexError::InvalidSide);
        }
        if buy.owner == sell.owner {
            return Err(DexError::SameUser);
        }
        // Strictly Open: a partially filled order cannot be matched
        // again. Rejected with the not-found class, as upstream does.
        if buy.status != OrderStatus::Open || sell.status != OrderStatus::Open {
            return Err(DexError::OrderNotFound);
        }
        if amount == 0 {
            return Err(DexError::InvalidAmount);
        }
        if buy.price < sell.price {
            return Err(DexError::InvalidPrice);
        }
        if amount > buy.remaining() || amount > sell.remaining() {
            return Err(DexError::InsufficientBalance);
        }

        let price = sell.price;
        let value = fees::trade_value(amount, price);
        let fee = fees::calculate_fee(value);

        let buy_filled = buy.filled_amount + amount;
        let buy_status = if buy_filled == buy.amount {
            OrderStatus::Filled
        } else {
            OrderStatus::Partial
        };
        let sell_filled = sell.filled_amount + amount;
        let sell_status = if sell_filled == sell.amount {
            OrderStatus::Filled
        } else {
            OrderStatus::Partial
        };

        // Commit phase: nothing below can fail.
        if let Some(order) = self.orders.get_mut(buy_order_id) {
            order.filled_amount = buy_filled;
            order.status = buy_status;
        }
        if let Some(order) = self.orders.get_mut(sell_order_id) {
            order.filled_amount = sell_filled;
            order.status = sell_status;
        }

        let trade = Trade {
            buy_order_id,
            buyer: buy.owner,
            seller: sell.owner,
            amount,
            price,
            fee,
            executed_at: self.height,
        };
        let trade_id = self.trades.record(value, fee, trade);

        self.events.push(DexEvent::TradeExecuted(TradeExecuted {
            trade_id,
            buy_order_id,
            sell_order_id,
            buyer: buy.owner,
            seller: sell.owner,
            amount,
            price,
            value,
            fee,
            buy_status,
            sell_status,
            executed_at: self.height,
        }));

        debug!(
            "trade {}: {} at {} between {} and {}, settled by {}",
            trade_id, amount, price.0, buy.owner, sell.owner, caller
        );
        Ok(TradeReceipt {
            amount,
            price,
            value,
            fee,
        })
    }

    /// Look up an order by id
    pub fn get_order(&self, order_id: OrderId) -> Option<&Order> {
        self.orders.get(order_id)
    }

    /// Look up a trade by id
    pub fn get_trade(&self, trade_id: TradeId) -> Option<&Trade> {
        self.trades.get(trade_id)
    }

    /// Escrowed balance for (user, token), zero if absent
    pub fn get_user_balance(&self, user: &Address, token: &str) -> U256 {
        self.escrow.balance(user, token)
    }

    pub fn get_dex_stats(&self) -> DexStats {
        DexStats {
            total_volume: self.trades.total_volume(),
            total_fees: self.trades.total_fees(),
            next_order_id: self.orders.next_order_id(),
        }
    }

    /// Pure fee computation: floor(amount * 30 / 10000)
    pub fn calculate_fee(&self, amount: U256) -> U256 {
        fees::calculate_fee(amount)
    }

    /// Placeholder: per-user order aggregation belongs to an external
    /// indexer. Always returns an empty list.
    pub fn get_user_orders(&self, _user: &Address) -> Vec<Order> {
        Vec::new()
    }

    /// Placeholder: book aggregation belongs to an external indexer.
    /// Returns a view with the pair echoed back and no levels.
    pub fn get_order_book(&self, pair: &Pair) -> OrderBookView {
        OrderBookView {
            pair: pair.clone(),
            bids: Vec::new(),
            asks: Vec::new(),
        }
    }

    /// Emitted events, oldest first
    pub fn events(&self) -> &[DexEvent] {
        &self.events
    }

    pub fn orders(&self) -> &OrderStore {
        &self.orders
    }

    pub fn escrow(&self) -> &EscrowLedger {
        &self.escrow
    }

    pub fn trades(&self) -> &TradeLog {
        &self.trades
    }
}

impl Default for DexEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stx_usdt() -> Pair {
        Pair::new("STX", "USDT")
    }

    fn alice() -> Address {
        Address::from([1u8; 20])
    }

    fn bob() -> Address {
        Address::from([2u8; 20])
    }

    #[test]
    fn test_place_limit_order() {
        let mut engine = DexEngine::new();

        let id = engine
            .place_limit_order(alice(), Side::Buy, stx_usdt(), 1_000_000, Price(2_500_000))
            .unwrap();

        assert_eq!(id, 1);
        let order = engine.get_order(id).unwrap();
        assert_eq!(order.filled_amount, 0);
        assert_eq!(order.status, OrderStatus::Open);
        assert_eq!(engine.get_dex_stats().next_order_id, 2);
    }

    #[test]
    fn test_place_rejects_zero_amount() {
        let mut engine = DexEngine::new();

        let result =
            engine.place_limit_order(alice(), Side::Buy, stx_usdt(), 0, Price(2_500_000));

        assert_eq!(result, Err(DexError::InvalidAmount));
        assert_eq!(engine.get_dex_stats().next_order_id, 1);
        assert!(engine.events().is_empty());
    }

    #[test]
    fn test_place_rejects_zero_price() {
        let mut engine = DexEngine::new();

        let result = engine.place_limit_order(alice(), Side::Buy, stx_usdt(), 1_000_000, Price(0));

        assert_eq!(result, Err(DexError::InvalidPrice));
        assert_eq!(engine.get_user_balance(&alice(), "USDT"), U256::ZERO);
    }

    #[test]
    fn test_buy_reserves_quote_token() {
        let mut engine = DexEngine::new();

        engine
            .place_limit_order(alice(), Side::Buy, stx_usdt(), 1_000_000, Price(2_500_000))
            .unwrap();

        // 1.0 * 2.5 = 2.5 USDT
        assert_eq!(
            engine.get_user_balance(&alice(), "USDT"),
            U256::from(2_500_000u64)
        );
        assert_eq!(engine.get_user_balance(&alice(), "STX"), U256::ZERO);
    }

    #[test]
    fn test_sell_reserves_base_token() {
        let mut engine = DexEngine::new();

        engine
            .place_limit_order(bob(), Side::Sell, stx_usdt(), 500_000, Price(2_000_000))
            .unwrap();

        assert_eq!(
            engine.get_user_balance(&bob(), "STX"),
            U256::from(500_000u64)
        );
        assert_eq!(engine.get_user_balance(&bob(), "USDT"), U256::ZERO);
    }

    #[test]
    fn test_order_ids_increment() {
        let mut engine = DexEngine::new();

        let id1 = engine
            .place_limit_order(alice(), Side::Buy, stx_usdt(), 100, Price(1))
            .unwrap();
        let id2 = engine
            .place_limit_order(alice(), Side::Buy, stx_usdt(), 100, Price(1))
            .unwrap();

        assert_eq!(id2, id1 + 1);
    }

    #[test]
    fn test_created_at_records_height() {
        let mut engine = DexEngine::new();
        engine.set_block_height(77);

        let id = engine
            .place_limit_order(alice(), Side::Buy, stx_usdt(), 100, Price(1))
            .unwrap();

        assert_eq!(engine.get_order(id).unwrap().created_at, 77);
    }

    fn crossed_pair(engine: &mut DexEngine) -> (OrderId, OrderId) {
        let buy_id = engine
            .place_limit_order(alice(), Side::Buy, stx_usdt(), 1_000_000, Price(2_500_000))
            .unwrap();
        let sell_id = engine
            .place_limit_order(bob(), Side::Sell, stx_usdt(), 500_000, Price(2_000_000))
            .unwrap();
        (buy_id, sell_id)
    }

    #[test]
    fn test_execute_trade_worked_example() {
        let mut engine = DexEngine::new();
        let (buy_id, sell_id) = crossed_pair(&mut engine);

        let receipt = engine
            .execute_trade(alice(), buy_id, sell_id, 500_000)
            .unwrap();

        assert_eq!(receipt.price, Price(2_000_000));
        assert_eq!(receipt.value, U256::from(1_000_000u64));
        assert_eq!(receipt.fee, U256::from(3_000u64));

        let buy = engine.get_order(buy_id).unwrap();
        assert_eq!(buy.filled_amount, 500_000);
        assert_eq!(buy.status, OrderStatus::Partial);

        let sell = engine.get_order(sell_id).unwrap();
        assert_eq!(sell.filled_amount, 500_000);
        assert_eq!(sell.status, OrderStatus::Filled);

        let stats = engine.get_dex_stats();
        assert_eq!(stats.total_volume, U256::from(1_000_000u64));
        assert_eq!(stats.total_fees, U256::from(3_000u64));
    }

    #[test]
    fn test_trade_settles_at_sell_price() {
        let mut engine = DexEngine::new();
        let (buy_id, sell_id) = crossed_pair(&mut engine);

        let receipt = engine
            .execute_trade(alice(), buy_id, sell_id, 500_000)
            .unwrap();

        let buy = engine.get_order(buy_id).unwrap();
        assert_eq!(receipt.price, engine.get_order(sell_id).unwrap().price);
        assert!(receipt.price <= buy.price);
    }

    #[test]
    fn test_trade_records_buy_order_reference() {
        let mut engine = DexEngine::new();
        engine.set_block_height(9);
        let (buy_id, sell_id) = crossed_pair(&mut engine);

        engine
            .execute_trade(alice(), buy_id, sell_id, 500_000)
            .unwrap();

        let trade = engine.get_trade(U256::from(1_000_000u64)).unwrap();
        assert_eq!(trade.buy_order_id, buy_id);
        assert_eq!(trade.buyer, alice());
        assert_eq!(trade.seller, bob());
        assert_eq!(trade.executed_at, 9);
    }

    #[test]
    fn test_unknown_orders_rejected() {
        let mut engine = DexEngine::new();
        let (buy_id, _) = crossed_pair(&mut engine);

        assert_eq!(
            engine.execute_trade(alice(), buy_id, 999, 100),
            Err(DexError::OrderNotFound)
        );
        assert_eq!(
            engine.execute_trade(alice(), 999, buy_id, 100),
            Err(DexError::OrderNotFound)
        );
    }

    #[test]
    fn test_swapped_sides_rejected() {
        let mut engine = DexEngine::new();
        let (buy_id, sell_id) = crossed_pair(&mut engine);

        // Arguments reversed: sell order in the buy slot
        let result = engine.execute_trade(alice(), sell_id, buy_id, 100);
        assert_eq!(result, Err(DexError::InvalidSide));

        // No mutation
        assert_eq!(engine.get_order(buy_id).unwrap().filled_amount, 0);
        assert_eq!(engine.get_order(sell_id).unwrap().filled_amount, 0);
    }

    #[test]
    fn test_pair_mismatch_rejected_as_invalid_side() {
        let mut engine = DexEngine::new();
        let buy_id = engine
            .place_limit_order(alice(), Side::Buy, stx_usdt(), 1_000_000, Price(2_500_000))
            .unwrap();
        let sell_id = engine
            .place_limit_order(bob(), Side::Sell, Pair::new("BTC", "USDT"), 500_000, Price(2_000_000))
            .unwrap();

        assert_eq!(
            engine.execute_trade(alice(), buy_id, sell_id, 100),
            Err(DexError::InvalidSide)
        );
    }

    #[test]
    fn test_same_owner_rejected() {
        let mut engine = DexEngine::new();
        let buy_id = engine
            .place_limit_order(alice(), Side::Buy, stx_usdt(), 1_000_000, Price(2_500_000))
            .unwrap();
        let sell_id = engine
            .place_limit_order(alice(), Side::Sell, stx_usdt(), 500_000, Price(2_000_000))
            .unwrap();

        assert_eq!(
            engine.execute_trade(alice(), buy_id, sell_id, 100),
            Err(DexError::SameUser)
        );
        assert_eq!(engine.get_order(buy_id).unwrap().filled_amount, 0);
    }

    #[test]
    fn test_zero_trade_amount_rejected() {
        let mut engine = DexEngine::new();
        let (buy_id, sell_id) = crossed_pair(&mut engine);

        assert_eq!(
            engine.execute_trade(alice(), buy_id, sell_id, 0),
            Err(DexError::InvalidAmount)
        );
    }

    #[test]
    fn test_uncrossed_prices_rejected() {
        let mut engine = DexEngine::new();
        let buy_id = engine
            .place_limit_order(alice(), Side::Buy, stx_usdt(), 1_000_000, Price(1_500_000))
            .unwrap();
        let sell_id = engine
            .place_limit_order(bob(), Side::Sell, stx_usdt(), 500_000, Price(2_000_000))
            .unwrap();

        assert_eq!(
            engine.execute_trade(alice(), buy_id, sell_id, 100),
            Err(DexError::InvalidPrice)
        );

        // Both orders untouched
        assert_eq!(engine.get_order(buy_id).unwrap().status, OrderStatus::Open);
        assert_eq!(engine.get_order(sell_id).unwrap().status, OrderStatus::Open);
        assert_eq!(engine.get_dex_stats().total_volume, U256::ZERO);
    }

    #[test]
    fn test_amount_over_remaining_rejected() {
        let mut engine = DexEngine::new();
        let (buy_id, sell_id) = crossed_pair(&mut engine);

        // Sell order only has 500_000
        assert_eq!(
            engine.execute_trade(alice(), buy_id, sell_id, 600_000),
            Err(DexError::InsufficientBalance)
        );
    }

    #[test]
    fn test_partial_order_cannot_be_rematched() {
        // Chosen behavior: only Open orders settle; a Partial order is
        // rejected even though capacity remains. The permissive
        // alternative (Open or Partial) is deliberately not implemented.
        let mut engine = DexEngine::new();
        let buy_id = engine
            .place_limit_order(alice(), Side::Buy, stx_usdt(), 1_000_000, Price(2_500_000))
            .unwrap();
        let sell_id = engine
            .place_limit_order(bob(), Side::Sell, stx_usdt(), 1_000_000, Price(2_000_000))
            .unwrap();

        engine
            .execute_trade(alice(), buy_id, sell_id, 400_000)
            .unwrap();
        assert_eq!(
            engine.get_order(buy_id).unwrap().status,
            OrderStatus::Partial
        );

        assert_eq!(
            engine.execute_trade(alice(), buy_id, sell_id, 100_000),
            Err(DexError::OrderNotFound)
        );
        // Fill state frozen at the first settlement
        assert_eq!(engine.get_order(buy_id).unwrap().filled_amount, 400_000);
    }

    #[test]
    fn test_filled_orders_cannot_resettle() {
        let mut engine = DexEngine::new();
        let buy_id = engine
            .place_limit_order(alice(), Side::Buy, stx_usdt(), 500_000, Price(2_500_000))
            .unwrap();
        let sell_id = engine
            .place_limit_order(bob(), Side::Sell, stx_usdt(), 500_000, Price(2_000_000))
            .unwrap();

        engine
            .execute_trade(alice(), buy_id, sell_id, 500_000)
            .unwrap();

        // Replaying the identical call must not double-settle
        assert_eq!(
            engine.execute_trade(alice(), buy_id, sell_id, 500_000),
            Err(DexError::OrderNotFound)
        );
        assert_eq!(engine.get_dex_stats().total_volume, U256::from(1_000_000u64));
        assert_eq!(engine.trades().len(), 1);
    }

    #[test]
    fn test_exact_fill_marks_both_filled() {
        let mut engine = DexEngine::new();
        let buy_id = engine
            .place_limit_order(alice(), Side::Buy, stx_usdt(), 500_000, Price(2_000_000))
            .unwrap();
        let sell_id = engine
            .place_limit_order(bob(), Side::Sell, stx_usdt(), 500_000, Price(2_000_000))
            .unwrap();

        engine
            .execute_trade(bob(), buy_id, sell_id, 500_000)
            .unwrap();

        assert_eq!(engine.get_order(buy_id).unwrap().status, OrderStatus::Filled);
        assert_eq!(
            engine.get_order(sell_id).unwrap().status,
            OrderStatus::Filled
        );
    }

    #[test]
    fn test_events_emitted() {
        let mut engine = DexEngine::new();
        let (buy_id, sell_id) = crossed_pair(&mut engine);

        engine
            .execute_trade(alice(), buy_id, sell_id, 500_000)
            .unwrap();

        let events = engine.events();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], DexEvent::OrderPlaced(_)));
        assert!(matches!(events[1], DexEvent::OrderPlaced(_)));

        match &events[2] {
            DexEvent::TradeExecuted(e) => {
                assert_eq!(e.buy_order_id, buy_id);
                assert_eq!(e.sell_order_id, sell_id);
                assert_eq!(e.value, U256::from(1_000_000u64));
                assert_eq!(e.fee, U256::from(3_000u64));
                assert_eq!(e.buy_status, OrderStatus::Partial);
                assert_eq!(e.sell_status, OrderStatus::Filled);
            }
            other => panic!("expected TradeExecuted, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_trade_emits_nothing() {
        let mut engine = DexEngine::new();
        let (buy_id, sell_id) = crossed_pair(&mut engine);
        let before = engine.events().len();

        let _ = engine.execute_trade(alice(), buy_id, sell_id, 0);

        assert_eq!(engine.events().len(), before);
    }

    #[test]
    fn test_calculate_fee_surface() {
        let engine = DexEngine::new();
        assert_eq!(
            engine.calculate_fee(U256::from(1_000_000u64)),
            U256::from(3_000u64)
        );
    }

    #[test]
    fn test_stub_surfaces_return_placeholders() {
        let mut engine = DexEngine::new();
        engine
            .place_limit_order(alice(), Side::Buy, stx_usdt(), 100, Price(1))
            .unwrap();

        assert!(engine.get_user_orders(&alice()).is_empty());

        let view = engine.get_order_book(&stx_usdt());
        assert_eq!(view.pair, stx_usdt());
        assert!(view.bids.is_empty());
        assert!(view.asks.is_empty());
    }
}
