//! Request types for conditional-token operations.

use alloy::primitives::{B256, U256};
use bon::Builder;

use super::Position;
use crate::ctf::{generate_basic_partition, generate_winning_index_set};
use crate::types::Address;

/// Request to calculate a position ID on chain.
#[non_exhaustive]
#[derive(Debug, Clone, Builder)]
pub struct PositionIdRequest {
    /// The collateral token address (e.g., sDAI)
    pub collateral_token: Address,
    /// The collection ID
    pub collection_id: B256,
}

/// Request to split collateral into a full set of outcome tokens.
#[non_exhaustive]
#[derive(Debug, Clone, Builder)]
pub struct SplitPositionRequest {
    pub collateral_token: Address,
    /// Parent collection ID (zero for top-level positions)
    #[builder(default)]
    pub parent_collection_id: B256,
    pub condition_id: B256,
    /// Disjoint index sets, one per outcome slot
    pub partition: Vec<U256>,
    /// Amount of collateral to split
    pub amount: U256,
}

/// Request to redeem outcome tokens of a resolved condition.
#[non_exhaustive]
#[derive(Debug, Clone, Builder)]
pub struct RedeemPositionsRequest {
    pub collateral_token: Address,
    /// Parent collection ID (zero for top-level positions)
    #[builder(default)]
    pub parent_collection_id: B256,
    pub condition_id: B256,
    /// Index sets of the positions to redeem
    pub index_sets: Vec<U256>,
}

impl SplitPositionRequest {
    /// Creates a split request covering every one of `outcome_slot_count` outcomes.
    ///
    /// # Example
    ///
    /// ```
    /// # use seer_client_sdk::ctf::types::SplitPositionRequest;
    /// # use seer_client_sdk::types::{B256, U256, address};
    /// let request = SplitPositionRequest::for_outcomes(
    ///     address!("0xaf204776c7245bF4147c2612BF6e5972Ee483701"), // sDAI
    ///     B256::ZERO,
    ///     3,
    ///     U256::from(1_000_000_000_000_000_000_u64),
    /// );
    /// assert_eq!(request.partition, vec![U256::from(1), U256::from(2), U256::from(4)]);
    /// ```
    #[must_use]
    pub fn for_outcomes(
        collateral_token: Address,
        condition_id: B256,
        outcome_slot_count: usize,
        amount: U256,
    ) -> Self {
        Self {
            collateral_token,
            parent_collection_id: B256::ZERO,
            condition_id,
            partition: generate_basic_partition(outcome_slot_count),
            amount,
        }
    }
}

impl RedeemPositionsRequest {
    /// Creates a redeem request for every position the holder still has a balance in.
    #[must_use]
    pub fn for_positions(
        collateral_token: Address,
        condition_id: B256,
        positions: &[Position],
    ) -> Self {
        Self {
            collateral_token,
            parent_collection_id: B256::ZERO,
            condition_id,
            index_sets: generate_winning_index_set(positions),
        }
    }
}
