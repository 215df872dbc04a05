/// Canonical fixtures for settlement tests

use alloy_primitives::Address;
use engine::{DexEngine, OrderId, Pair, Price, Side};

/// First test trader
pub fn alice() -> Address {
    Address::from([1u8; 20])
}

/// Second test trader
pub fn bob() -> Address {
    Address::from([2u8; 20])
}

/// The canonical test pair
pub fn stx_usdt() -> Pair {
    Pair::new("STX", "USDT")
}

/// Engine with a crossed buy/sell pair resting on STX-USDT
///
/// Buy: alice, 1.0 at 2.50. Sell: bob, 0.5 at 2.00. Returns the engine
/// with the two order ids.
pub fn crossed_engine() -> (DexEngine, OrderId, OrderId) {
    let mut engine = DexEngine::new();
    let buy_id = engine
        .place_limit_order(alice(), Side::Buy, stx_usdt(), 1_000_000, Price(2_500_000))
        .expect("buy order placement");
    let sell_id = engine
        .place_limit_order(bob(), Side::Sell, stx_usdt(), 500_000, Price(2_000_000))
        .expect("sell order placement");
    (engine, buy_id, sell_id)
}
