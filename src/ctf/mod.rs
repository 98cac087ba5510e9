//! Conditional Token Framework helpers.
//!
//! Seer markets are backed by Gnosis conditional tokens. Each outcome of a condition is
//! addressed by a bitmask index set, and each (collateral, collection) pair maps to an
//! ERC1155 position id. The derivations in this module are pure and match the contract's
//! own computations bit for bit.
//!
//! **Feature flag:** `ctf` enables [`Client`] for on-chain split, redeem and position id
//! lookups. The pure functions are always available.
//!
//! # Example
//!
//! ```
//! use seer_client_sdk::ctf::{generate_basic_partition, position_id};
//! use seer_client_sdk::types::{B256, U256, address};
//!
//! let partition = generate_basic_partition(3);
//! assert_eq!(partition, vec![U256::from(1), U256::from(2), U256::from(4)]);
//!
//! let sdai = address!("0xaf204776c7245bF4147c2612BF6e5972Ee483701");
//! let id = position_id(sdai, B256::ZERO);
//! assert_eq!(id, position_id(sdai, B256::ZERO));
//! ```
//!
//! # Resources
//!
//! - [Gnosis CTF Source Code](https://github.com/gnosis/conditional-tokens-contracts)

#[cfg(feature = "ctf")]
pub mod client;
pub mod types;

use alloy::primitives::{B256, U256, keccak256};

#[cfg(feature = "ctf")]
pub use client::Client;
use types::Position;

use crate::types::Address;

/// Most outcome slots a condition can have: the bit width of an index set.
pub const MAX_OUTCOME_SLOTS: usize = 256;

/// Returns the singleton index sets `[1, 2, 4, .., 2^(n-1)]` for `outcome_slot_count` outcomes.
///
/// Counts above [`MAX_OUTCOME_SLOTS`] yield the 256 representable index sets.
#[must_use]
pub fn generate_basic_partition(outcome_slot_count: usize) -> Vec<U256> {
    (0..outcome_slot_count.min(MAX_OUTCOME_SLOTS))
        .map(|i| U256::from(1_u8) << i)
        .collect()
}

/// Returns the index set `1 << i` of every position `i` with a non-zero balance, in order.
#[must_use]
pub fn generate_winning_index_set(positions: &[Position]) -> Vec<U256> {
    positions
        .iter()
        .take(MAX_OUTCOME_SLOTS)
        .enumerate()
        .filter(|(_, position)| position.balance > U256::ZERO)
        .map(|(i, _)| U256::from(1_u8) << i)
        .collect()
}

/// Computes the ERC1155 position id `keccak256(collateral ++ collection_id)`.
///
/// The preimage is the packed encoding: the 20 address bytes followed by the 32 collection
/// id bytes, with no padding.
#[must_use]
pub fn position_id(collateral_token: Address, collection_id: B256) -> U256 {
    let mut packed = [0_u8; 52];
    packed[..20].copy_from_slice(collateral_token.as_slice());
    packed[20..].copy_from_slice(collection_id.as_slice());

    U256::from_be_bytes(keccak256(packed).0)
}

#[cfg(test)]
mod tests {
    use alloy::primitives::b256;
    use alloy::sol_types::SolValue as _;

    use super::*;
    use crate::types::address;

    const USDC: Address = address!("0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174");

    fn position(balance: u64) -> Position {
        Position::new(Address::ZERO, U256::from(balance))
    }

    #[test]
    fn basic_partition_should_be_powers_of_two() {
        let partition = generate_basic_partition(5);

        assert_eq!(partition.len(), 5);
        for (i, index_set) in partition.iter().enumerate() {
            assert_eq!(*index_set, U256::from(2_u64.pow(u32::try_from(i).unwrap())));
        }
    }

    #[test]
    fn basic_partition_of_zero_is_empty() {
        assert!(generate_basic_partition(0).is_empty());
    }

    #[test]
    fn basic_partition_covers_wide_conditions() {
        let partition = generate_basic_partition(64);

        assert_eq!(partition[63], U256::from(1_u128 << 63));
        assert_eq!(partition.last(), Some(&(U256::from(1_u8) << 63_usize)));
    }

    #[test]
    fn basic_partition_stops_at_index_set_width() {
        let partition = generate_basic_partition(MAX_OUTCOME_SLOTS + 1);

        assert_eq!(partition.len(), MAX_OUTCOME_SLOTS);
        assert!(partition.iter().all(|index_set| !index_set.is_zero()), "no empty index set");
        assert_eq!(partition.last(), Some(&(U256::from(1_u8) << 255_usize)));
    }

    #[test]
    fn winning_index_set_ignores_positions_beyond_index_set_width() {
        let positions = vec![position(1); MAX_OUTCOME_SLOTS + 2];

        let index_sets = generate_winning_index_set(&positions);

        assert_eq!(index_sets.len(), MAX_OUTCOME_SLOTS);
        assert!(index_sets.iter().all(|index_set| !index_set.is_zero()), "no empty index set");
    }

    #[test]
    fn winning_index_set_skips_empty_positions() {
        let positions = [position(0), position(5), position(0), position(3)];

        assert_eq!(
            generate_winning_index_set(&positions),
            vec![U256::from(2), U256::from(8)]
        );
    }

    #[test]
    fn winning_index_set_of_empty_balances_is_empty() {
        let positions = [position(0), position(0)];

        assert!(generate_winning_index_set(&positions).is_empty());
        assert!(generate_winning_index_set(&[]).is_empty());
    }

    #[test]
    fn position_id_matches_known_vector() {
        let collection_id =
            b256!("0x0000000000000000000000000000000000000000000000000000000000000001");

        assert_eq!(
            position_id(USDC, collection_id),
            U256::from_str_radix(
                "e99252ce26521c6469e5fd6e2bb6eec1403edd40eb983348837bbcd19e5df16b",
                16
            )
            .unwrap()
        );
        assert_eq!(
            position_id(USDC, B256::ZERO),
            U256::from_str_radix(
                "0cd0ec9ee4a3ffdf8d4e94105cd1a76ac68fb61476659177a0acbbdbab2d930c",
                16
            )
            .unwrap()
        );
    }

    #[test]
    fn position_id_matches_packed_abi_encoding() {
        let sdai = address!("0xaf204776c7245bF4147c2612BF6e5972Ee483701");
        let collection_id =
            b256!("0x1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef");

        let expected = U256::from_be_bytes(keccak256((sdai, collection_id).abi_encode_packed()).0);

        assert_eq!(position_id(sdai, collection_id), expected);
        assert_eq!(
            expected,
            U256::from_str_radix(
                "0d89be75d629c4ccc6b2c76dcdcb008ac3635a153bace41a3e34240e4857dac2",
                16
            )
            .unwrap()
        );
    }

    #[test]
    fn position_id_changes_with_either_input() {
        let collection_id =
            b256!("0x0000000000000000000000000000000000000000000000000000000000000001");
        let base = position_id(USDC, collection_id);

        assert_ne!(base, position_id(USDC, B256::ZERO));
        assert_ne!(base, position_id(Address::ZERO, collection_id));
    }
}
