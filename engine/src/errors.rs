//! Engine error taxonomy
//!
//! Every variant is a pure validation failure: the operation that returns
//! it has made no state change, and retrying without correcting the inputs
//! will fail identically.

use thiserror::Error;

/// Validation failures returned by order placement and trade execution
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DexError {
    #[error("unauthorized caller")]
    Unauthorized,

    #[error("amount must be positive")]
    InvalidAmount,

    #[error("price must be positive")]
    InvalidPrice,

    #[error("order not found or not open")]
    OrderNotFound,

    #[error("trade amount exceeds remaining order capacity")]
    InsufficientBalance,

    #[error("order sides or pair do not match")]
    InvalidSide,

    #[error("buy and sell orders belong to the same user")]
    SameUser,
}
