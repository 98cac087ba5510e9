//! Shared value types and re-exports from external crates.
//!
//! Primitive types are re-exported here so users don't need to add these
//! dependencies to their `Cargo.toml`.

/// Ethereum address type and the [`address!`] macro for compile-time address literals.
/// [`ChainId`] is a type alias for `u64` representing EVM chain IDs.
pub use alloy::primitives::{Address, B256, ChainId, U256, address, b256};
/// Arbitrary precision decimal type for user-entered amounts.
pub use rust_decimal::Decimal;
/// Macro for creating [`Decimal`] literals at compile time.
///
/// # Example
/// ```
/// use seer_client_sdk::types::dec;
/// let amount = dec!(0.55);
/// ```
pub use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
#[cfg(any(feature = "trade", feature = "markets", feature = "ctf"))]
use {
    alloy::network::{Network, ReceiptResponse as _},
    alloy::providers::PendingTransactionBuilder,
};

/// An ERC-20 token as seen by the UI: where it lives and how to scale its amounts.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub address: Address,
    pub decimals: u8,
    pub symbol: String,
}

impl Token {
    #[must_use]
    pub fn new<S: Into<String>>(address: Address, decimals: u8, symbol: S) -> Self {
        Self {
            address,
            decimals,
            symbol: symbol.into(),
        }
    }
}

/// Confirmation of a mined transaction.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionReceipt {
    /// Transaction hash
    pub transaction_hash: B256,
    /// Block number where the transaction was mined
    pub block_number: u64,
}

/// Waits for `pending` to be mined and turns a reverted or incomplete receipt into an error.
#[cfg(any(feature = "trade", feature = "markets", feature = "ctf"))]
pub(crate) async fn confirm<N: Network>(
    pending: PendingTransactionBuilder<N>,
    what: &str,
) -> crate::Result<TransactionReceipt> {
    let transaction_hash = *pending.tx_hash();

    let receipt = pending.get_receipt().await.map_err(|e| {
        crate::error::Error::transaction_with_source(format!("Failed to get {what} receipt"), e)
    })?;

    if !receipt.status() {
        return Err(crate::error::Error::transaction(format!(
            "{what} transaction {transaction_hash} reverted"
        )));
    }

    Ok(TransactionReceipt {
        transaction_hash,
        block_number: receipt.block_number().ok_or_else(|| {
            crate::error::Error::transaction("Block number not available in receipt")
        })?,
    })
}
