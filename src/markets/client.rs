//! Client for the Seer market factory contract.

#![allow(
    clippy::exhaustive_structs,
    clippy::exhaustive_enums,
    reason = "Alloy sol! macro generates code that triggers these lints"
)]

use std::sync::Arc;

use alloy::primitives::ChainId;
use alloy::providers::Provider;
use alloy::sol;

use super::types::{CreateMarketRequest, MarketType};
use crate::error::Error;
use crate::notify::{LogNotifier, Notifier, TxMessages, track_tx};
use crate::types::{TransactionReceipt, confirm};
use crate::{ChainConfig, Result, require_chain_config};

sol! {
    #[sol(rpc)]
    interface IMarketFactory {
        struct CreateMarketParams {
            string marketName;
            string[] encodedQuestions;
            string[] outcomes;
            uint256 lowerBound;
            uint256 upperBound;
            uint256 minBond;
            uint32 openingTime;
        }

        function createCategoricalMarket(CreateMarketParams calldata params) external returns (address);

        function createScalarMarket(CreateMarketParams calldata params) external returns (address);

        function createMultiScalarMarket(CreateMarketParams calldata params) external returns (address);
    }
}

const CREATE_MARKET: TxMessages = TxMessages::new("Creating market...", "Market created!");

/// Client for creating markets on one chain.
#[non_exhaustive]
#[derive(Clone)]
pub struct Client<P: Provider> {
    contract: IMarketFactory::IMarketFactoryInstance<P>,
    chain_id: ChainId,
    config: &'static ChainConfig,
    notifier: Arc<dyn Notifier>,
}

impl<P: Provider> std::fmt::Debug for Client<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("market_factory", self.contract.address())
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}

impl<P: Provider + Clone> Client<P> {
    /// Creates a client for the market factory deployed on `chain_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the chain is unsupported or has no market factory.
    pub fn new(provider: P, chain_id: ChainId) -> Result<Self> {
        let config = require_chain_config(chain_id)?;
        let factory = config
            .market_factory
            .ok_or_else(|| Error::missing_chain_config(chain_id, "market factory"))?;

        Ok(Self {
            contract: IMarketFactory::new(factory, provider),
            chain_id,
            config,
            notifier: Arc::new(LogNotifier),
        })
    }

    /// Reports transaction progress to `notifier` instead of the log.
    #[must_use]
    pub fn with_notifier<N: Notifier + 'static>(mut self, notifier: N) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    /// Encodes the market's questions and submits it to the factory entry point for its kind.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::Kind::Validation`] error for a request without outcomes or
    /// for a different chain, and the chain's error if the transaction fails or reverts.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self, request), fields(
            market_type = ?request.market_type,
            market_name = %request.market_name,
            outcomes = request.outcomes.len()
        ))
    )]
    pub async fn create_market(&self, request: &CreateMarketRequest) -> Result<TransactionReceipt> {
        if request.outcomes.is_empty() {
            return Err(Error::validation("a market needs at least one outcome"));
        }
        if let Some(chain_id) = request.chain_id
            && chain_id != self.chain_id
        {
            return Err(Error::validation(format!(
                "market for chain {chain_id} submitted to chain {}",
                self.chain_id
            )));
        }

        let params = self.params(request);

        let send = async {
            let sent = match request.market_type {
                MarketType::Categorical => {
                    self.contract.createCategoricalMarket(params).send().await
                }
                MarketType::Scalar => self.contract.createScalarMarket(params).send().await,
                MarketType::MultiScalar => {
                    self.contract.createMultiScalarMarket(params).send().await
                }
            };

            sent.map_err(|e| {
                Error::transaction_with_source("Failed to send create market transaction", e)
            })
        };

        track_tx(self.notifier.as_ref(), CREATE_MARKET, send, |pending_tx| {
            confirm(pending_tx, "create market")
        })
        .await
    }

    fn params(&self, request: &CreateMarketRequest) -> IMarketFactory::CreateMarketParams {
        IMarketFactory::CreateMarketParams {
            marketName: request.market_name.clone(),
            encodedQuestions: request.encoded_questions(),
            outcomes: request.outcomes.clone(),
            lowerBound: request.lower_bound,
            upperBound: request.upper_bound,
            minBond: self.config.min_bond,
            openingTime: request.opening_time,
        }
    }

    /// Returns the chain this client submits to.
    #[must_use]
    pub const fn chain_id(&self) -> ChainId {
        self.chain_id
    }
}
