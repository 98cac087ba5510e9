use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, ChainId};
use bon::Builder;
use dashmap::DashMap;
use futures::FutureExt as _;
use futures::future::try_join_all;
use reqwest::Client as ReqwestClient;
use reqwest::header::{HeaderMap, HeaderValue};

use super::batch::Batcher;
use super::subgraph::GraphClient;
use super::types::{Deposit, EternalFarming, Pool, PoolIncentive, PoolInfo, PoolKey};
use crate::error::Error;
use crate::{Result, require_chain_config, subgraph_config};

/// Default time keys are collected before a batch is fetched.
pub const DEFAULT_BATCH_WINDOW: Duration = Duration::from_millis(10);

/// Symbol of the token outcome pools are paired against.
const OUTCOME_POOL_SYMBOL: &str = "sDAI";

/// Subgraph endpoints replacing the built-in ones for a chain.
#[non_exhaustive]
#[derive(Clone, Debug, Default, Builder)]
pub struct Endpoints {
    #[builder(into)]
    pub algebra: Option<String>,
    #[builder(into)]
    pub algebra_farming: Option<String>,
}

#[non_exhaustive]
#[derive(Clone, Debug, Builder)]
pub struct Config {
    #[builder(default = DEFAULT_BATCH_WINDOW)]
    pub batch_window: Duration,
    /// Per-chain endpoint overrides. A chain listed here ignores the built-in endpoints.
    #[builder(default)]
    pub endpoints: HashMap<ChainId, Endpoints>,
}

impl Default for Config {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Clone, Copy, Debug)]
enum Graph {
    Algebra,
    AlgebraFarming,
}

/// Pool, incentive and deposit lookups with per-chain request batching.
///
/// Batchers are created on first use for each chain and kept until [`Client::reset`].
#[derive(Debug)]
pub struct Client {
    client: ReqwestClient,
    config: Config,
    pools: DashMap<ChainId, Arc<Batcher<PoolKey, Pool>>>,
    farmings: DashMap<ChainId, Arc<Batcher<Address, EternalFarming>>>,
}

impl Default for Client {
    fn default() -> Self {
        Client::new(Config::default()).expect("Client with default config should succeed")
    }
}

impl Client {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: Config) -> Result<Client> {
        let mut headers = HeaderMap::new();
        headers.insert("User-Agent", HeaderValue::from_static("seer_client_sdk"));
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = ReqwestClient::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            config,
            pools: DashMap::new(),
            farmings: DashMap::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Drops every batcher; the next lookup on a chain starts from scratch.
    pub fn reset(&self) {
        self.pools.clear();
        self.farmings.clear();
    }

    /// Pools between `outcome_token` and `collateral_token`, most valuable first, each with
    /// its eternal farming incentives.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::Kind::Unavailable`] error if the chain has no subgraph,
    /// or the error of the batched query.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(self)))]
    pub async fn pool_info(
        &self,
        chain_id: ChainId,
        outcome_token: Address,
        collateral_token: Address,
    ) -> Result<Vec<PoolInfo>> {
        let key = PoolKey::sorted(outcome_token, collateral_token);
        let pools = self.pools_batcher(chain_id)?.load(key).await?;

        if pools.is_empty() {
            return Ok(Vec::new());
        }

        let farmings = self.farmings_batcher(chain_id)?;

        try_join_all(pools.iter().map(|pool| {
            let farmings = Arc::clone(&farmings);
            async move {
                let incentives = farmings.load(pool.id).await?;

                Ok::<_, Error>(PoolInfo {
                    id: pool.id,
                    fee: pool.fee,
                    token0: key.token0,
                    token1: key.token1,
                    incentives: incentives.iter().map(PoolIncentive::from).collect(),
                })
            }
        }))
        .await
    }

    /// [`Client::pool_info`] for each of `tokens` against the chain's primary collateral,
    /// in the order of `tokens`.
    pub async fn market_pools(
        &self,
        chain_id: ChainId,
        tokens: &[Address],
    ) -> Result<Vec<Vec<PoolInfo>>> {
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let collateral = require_chain_config(chain_id)?.collateral;

        try_join_all(
            tokens
                .iter()
                .map(|token| self.pool_info(chain_id, *token, collateral)),
        )
        .await
    }

    /// Every pool with an sDAI leg.
    ///
    /// A failing query is logged and yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::Kind::Unavailable`] error if the chain has no subgraph.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(self)))]
    pub async fn all_outcome_pools(&self, chain_id: ChainId) -> Result<Option<Vec<Pool>>> {
        let graph = self
            .graph(chain_id, Graph::Algebra)?
            .ok_or_else(|| Error::subgraph_unavailable(chain_id))?;

        match graph.pools_with_symbol(OUTCOME_POOL_SYMBOL).await {
            Ok(pools) => Ok(Some(pools)),
            Err(error) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(%error, "outcome pools query failed");
                drop(error);

                Ok(None)
            }
        }
    }

    /// Deposits of `owner` with remaining liquidity in `pools`, grouped by pool.
    ///
    /// Without a farming subgraph for the chain, or without pools, the map is empty.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self, pools), fields(pools = pools.len()))
    )]
    pub async fn pools_deposits(
        &self,
        chain_id: ChainId,
        pools: &[Address],
        owner: Address,
    ) -> Result<HashMap<Address, Vec<Deposit>>> {
        let Some(graph) = self.graph(chain_id, Graph::AlgebraFarming)? else {
            return Ok(HashMap::new());
        };
        if pools.is_empty() {
            return Ok(HashMap::new());
        }

        let deposits = graph.deposits(pools, owner).await?;

        let mut by_pool: HashMap<Address, Vec<Deposit>> = HashMap::new();
        for deposit in deposits {
            by_pool.entry(deposit.pool).or_default().push(deposit);
        }

        Ok(by_pool)
    }

    fn pools_batcher(&self, chain_id: ChainId) -> Result<Arc<Batcher<PoolKey, Pool>>> {
        if let Some(batcher) = self.pools.get(&chain_id) {
            return Ok(Arc::clone(&batcher));
        }

        let graph = self
            .graph(chain_id, Graph::Algebra)?
            .ok_or_else(|| Error::subgraph_unavailable(chain_id))?;
        let window = self.config.batch_window;

        let batcher = self.pools.entry(chain_id).or_insert_with(|| {
            Arc::new(Batcher::new(
                window,
                move |keys: Vec<PoolKey>| {
                    let graph = graph.clone();
                    async move { graph.pools(&keys).await }.boxed()
                },
                |pools: &[Pool], key: &PoolKey| {
                    pools.iter().filter(|pool| key.matches(pool)).cloned().collect()
                },
            ))
        });

        Ok(Arc::clone(&batcher))
    }

    fn farmings_batcher(&self, chain_id: ChainId) -> Result<Arc<Batcher<Address, EternalFarming>>> {
        if let Some(batcher) = self.farmings.get(&chain_id) {
            return Ok(Arc::clone(&batcher));
        }

        let graph = self
            .graph(chain_id, Graph::AlgebraFarming)?
            .ok_or_else(|| Error::subgraph_unavailable(chain_id))?;
        let window = self.config.batch_window;

        let batcher = self.farmings.entry(chain_id).or_insert_with(|| {
            Arc::new(Batcher::new(
                window,
                move |pools: Vec<Address>| {
                    let graph = graph.clone();
                    async move { graph.eternal_farmings(&pools).await }.boxed()
                },
                |farmings: &[EternalFarming], pool: &Address| {
                    farmings
                        .iter()
                        .filter(|farming| farming.pool == *pool)
                        .cloned()
                        .collect()
                },
            ))
        });

        Ok(Arc::clone(&batcher))
    }

    /// The configured endpoint of `graph` for `chain_id`, if there is one.
    fn graph(&self, chain_id: ChainId, graph: Graph) -> Result<Option<GraphClient>> {
        let url = match self.config.endpoints.get(&chain_id) {
            Some(endpoints) => match graph {
                Graph::Algebra => endpoints.algebra.as_deref(),
                Graph::AlgebraFarming => endpoints.algebra_farming.as_deref(),
            },
            None => subgraph_config(chain_id).map(|config| match graph {
                Graph::Algebra => config.algebra,
                Graph::AlgebraFarming => config.algebra_farming,
            }),
        };

        url.map(|url| GraphClient::new(self.client.clone(), url))
            .transpose()
    }
}
