//! Types for conditional-token operations.

mod request;

pub use request::{PositionIdRequest, RedeemPositionsRequest, SplitPositionRequest};

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use crate::types::Address;

/// A holder's balance of one outcome token of a market.
///
/// Positions are ordered by outcome index: the `i`-th position of a market corresponds to the
/// singleton index set `1 << i`.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// The wrapped ERC-20 outcome token
    pub token_id: Address,
    pub balance: U256,
}

impl Position {
    #[must_use]
    pub fn new(token_id: Address, balance: U256) -> Self {
        Self { token_id, balance }
    }
}
