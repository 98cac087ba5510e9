//! Client for the Gnosis Conditional Tokens contract backing Seer markets.
//!
//! # Example
//!
//! ```no_run
//! use seer_client_sdk::ctf::Client;
//! use seer_client_sdk::GNOSIS;
//! use alloy::providers::ProviderBuilder;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = ProviderBuilder::new()
//!     .connect("https://rpc.gnosischain.com")
//!     .await?;
//!
//! let client = Client::new(provider, GNOSIS)?;
//! # Ok(())
//! # }
//! ```

#![allow(
    clippy::exhaustive_structs,
    clippy::exhaustive_enums,
    reason = "Alloy sol! macro generates code that triggers these lints"
)]

use alloy::primitives::{ChainId, U256};
use alloy::providers::Provider;
use alloy::sol;

use super::MAX_OUTCOME_SLOTS;
use super::types::{PositionIdRequest, RedeemPositionsRequest, SplitPositionRequest};
use crate::error::Error;
use crate::types::{TransactionReceipt, confirm};
use crate::{Result, require_chain_config};

// Subset of the Gnosis CTF interface Seer redemption flows need.
// Source: https://github.com/gnosis/conditional-tokens-contracts
sol! {
    #[sol(rpc)]
    interface IConditionalTokens {
        function getPositionId(
            address collateralToken,
            bytes32 collectionId
        ) external pure returns (uint256);

        function splitPosition(
            address collateralToken,
            bytes32 parentCollectionId,
            bytes32 conditionId,
            uint256[] calldata partition,
            uint256 amount
        ) external;

        function redeemPositions(
            address collateralToken,
            bytes32 parentCollectionId,
            bytes32 conditionId,
            uint256[] calldata indexSets
        ) external;
    }
}

/// Client for the conditional tokens contract of a chain.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct Client<P: Provider> {
    contract: IConditionalTokens::IConditionalTokensInstance<P>,
}

impl<P: Provider + Clone> Client<P> {
    /// Creates a client bound to the conditional tokens deployment of `chain_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the chain is not supported.
    pub fn new(provider: P, chain_id: ChainId) -> Result<Self> {
        let config = require_chain_config(chain_id)?;

        Ok(Self {
            contract: IConditionalTokens::new(config.conditional_tokens, provider),
        })
    }

    /// Asks the contract for a position id.
    ///
    /// [`super::position_id`] computes the same value locally; this exists to check a
    /// deployment against it.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self), fields(
            collateral_token = %request.collateral_token,
            collection_id = %request.collection_id
        ))
    )]
    pub async fn position_id(&self, request: &PositionIdRequest) -> Result<U256> {
        self.contract
            .getPositionId(request.collateral_token, request.collection_id)
            .call()
            .await
            .map_err(|e| Error::transaction_with_source("Failed to get position ID", e))
    }

    /// Splits collateral into a full set of outcome tokens.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self), fields(
            collateral_token = %request.collateral_token,
            condition_id = %request.condition_id,
            amount = %request.amount
        ))
    )]
    pub async fn split_position(
        &self,
        request: &SplitPositionRequest,
    ) -> Result<TransactionReceipt> {
        if request.partition.is_empty() {
            return Err(Error::validation("split partition must not be empty"));
        }
        if request.partition.len() > MAX_OUTCOME_SLOTS
            || request.partition.iter().any(U256::is_zero)
        {
            return Err(Error::validation(format!(
                "split partition needs between 1 and {MAX_OUTCOME_SLOTS} non-empty index sets"
            )));
        }

        let pending_tx = self
            .contract
            .splitPosition(
                request.collateral_token,
                request.parent_collection_id,
                request.condition_id,
                request.partition.clone(),
                request.amount,
            )
            .send()
            .await
            .map_err(|e| Error::transaction_with_source("Failed to send split transaction", e))?;

        confirm(pending_tx, "split").await
    }

    /// Redeems the given index sets of a resolved condition for collateral.
    ///
    /// Build the request with [`RedeemPositionsRequest::for_positions`] to redeem every
    /// outcome the holder still has a balance in.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self), fields(
            collateral_token = %request.collateral_token,
            condition_id = %request.condition_id,
            index_sets = request.index_sets.len()
        ))
    )]
    pub async fn redeem_positions(
        &self,
        request: &RedeemPositionsRequest,
    ) -> Result<TransactionReceipt> {
        if request.index_sets.is_empty() {
            return Err(Error::validation("nothing to redeem"));
        }

        let pending_tx = self
            .contract
            .redeemPositions(
                request.collateral_token,
                request.parent_collection_id,
                request.condition_id,
                request.index_sets.clone(),
            )
            .send()
            .await
            .map_err(|e| Error::transaction_with_source("Failed to send redeem transaction", e))?;

        confirm(pending_tx, "redeem").await
    }

    /// Returns a reference to the underlying provider.
    #[must_use]
    pub fn provider(&self) -> &P {
        self.contract.provider()
    }
}
