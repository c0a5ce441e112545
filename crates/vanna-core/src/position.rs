//! Positions held in a brokerage account.

use serde::{Deserialize, Serialize};

use crate::contract::Contract;

/// One account's holding of one contract.
///
/// Positions are pulled fresh from the market data adapter every cycle
/// and never persisted across cycles; the aggregation engine owns them
/// for the duration of one cycle only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Owning account id.
    pub account: String,
    /// The held contract.
    pub contract: Contract,
    /// Signed quantity; positive = long.
    pub quantity: f64,
    /// Average cost basis per contract.
    pub avg_cost: f64,
}

impl Position {
    /// Creates a position.
    pub fn new(account: impl Into<String>, contract: Contract, quantity: f64, avg_cost: f64) -> Self {
        Self {
            account: account.into(),
            contract,
            quantity,
            avg_cost,
        }
    }

    /// True for a flat (closed) position.
    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.quantity == 0.0
    }
}
