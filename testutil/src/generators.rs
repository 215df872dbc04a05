/// Test data generators

use alloy_primitives::Address;
use engine::types::{Amount, Pair, Price, Side};
use rand::Rng;

/// Generate a random user address
pub fn random_address() -> Address {
    let mut rng = rand::thread_rng();
    Address::from(rng.gen::<[u8; 20]>())
}

/// Generate a random positive price (at most 1000.0 at 6 decimals)
pub fn random_price() -> Price {
    let mut rng = rand::thread_rng();
    Price(rng.gen_range(1..=1_000 * Price::SCALE))
}

/// Generate a random positive amount (at most 1000.0 at 6 decimals)
pub fn random_amount() -> Amount {
    let mut rng = rand::thread_rng();
    rng.gen_range(1..=1_000 * Price::SCALE)
}

/// Generate a random order side
pub fn random_side() -> Side {
    let mut rng = rand::thread_rng();
    if rng.gen_bool(0.5) {
        Side::Buy
    } else {
        Side::Sell
    }
}

/// Generate a random pair from a small symbol universe
pub fn random_pair() -> Pair {
    let mut rng = rand::thread_rng();
    let bases = ["STX", "BTC", "ETH", "SOL"];
    let base = bases[rng.gen_range(0..bases.len())];
    Pair::new(base, "USDT")
}
