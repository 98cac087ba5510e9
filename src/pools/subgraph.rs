//! Minimal GraphQL client for the Algebra subgraphs.

use alloy::primitives::Address;
use reqwest::{Client as ReqwestClient, Method};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use url::Url;

use super::types::{Deposit, EternalFarming, Pool, PoolKey};
use crate::Result;
use crate::error::Error;

const GET_POOLS: &str = "
query GetPools($where: Pool_filter, $orderBy: Pool_orderBy, $orderDirection: OrderDirection) {
  pools(first: 1000, where: $where, orderBy: $orderBy, orderDirection: $orderDirection) {
    id
    fee
    liquidity
    token0 { id symbol decimals }
    token1 { id symbol decimals }
    totalValueLockedUSD
  }
}";

const GET_ETERNAL_FARMINGS: &str = "
query GetEternalFarmings($where: EternalFarming_filter) {
  eternalFarmings(first: 1000, where: $where) {
    id
    pool
    reward
    bonusReward
    rewardToken
    bonusRewardToken
    startTime
    endTime
  }
}";

const GET_DEPOSITS: &str = "
query GetDeposits($where: Deposit_filter) {
  deposits(first: 1000, where: $where) {
    id
    owner
    pool
    liquidity
    eternalFarming
  }
}";

#[derive(Debug, Deserialize)]
struct Response<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<ResponseError>,
}

#[derive(Debug, Deserialize)]
struct ResponseError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct Pools {
    pools: Vec<Pool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EternalFarmings {
    eternal_farmings: Vec<EternalFarming>,
}

#[derive(Debug, Deserialize)]
struct Deposits {
    deposits: Vec<Deposit>,
}

/// Subgraphs store addresses lowercased; filters must match that.
fn lower(address: &Address) -> String {
    format!("{address:#x}")
}

#[derive(Clone, Debug)]
pub(crate) struct GraphClient {
    client: ReqwestClient,
    url: Url,
}

impl GraphClient {
    pub(crate) fn new(client: ReqwestClient, url: &str) -> Result<Self> {
        Ok(Self {
            client,
            url: Url::parse(url)?,
        })
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self, query, variables), fields(url = %self.url))
    )]
    async fn query<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T> {
        let request = self
            .client
            .request(Method::POST, self.url.clone())
            .json(&json!({ "query": query, "variables": variables }))
            .build()?;

        let response: Response<T> = crate::request(&self.client, request).await?;

        if !response.errors.is_empty() {
            return Err(Error::subgraph(
                response.errors.into_iter().map(|e| e.message).collect(),
            ));
        }

        response
            .data
            .ok_or_else(|| Error::subgraph(vec!["response has no data".to_owned()]))
    }

    /// Pools for any of `keys`, most valuable first.
    pub(crate) async fn pools(&self, keys: &[PoolKey]) -> Result<Vec<Pool>> {
        let or: Vec<Value> = keys
            .iter()
            .map(|key| json!({ "token0": lower(&key.token0), "token1": lower(&key.token1) }))
            .collect();

        let Pools { pools } = self
            .query(
                GET_POOLS,
                json!({
                    "where": { "or": or },
                    "orderBy": "totalValueLockedUSD",
                    "orderDirection": "desc",
                }),
            )
            .await?;

        Ok(pools)
    }

    /// Pools with a leg whose symbol is `symbol`.
    pub(crate) async fn pools_with_symbol(&self, symbol: &str) -> Result<Vec<Pool>> {
        let Pools { pools } = self
            .query(
                GET_POOLS,
                json!({
                    "where": {
                        "or": [
                            { "token0_": { "symbol": symbol } },
                            { "token1_": { "symbol": symbol } },
                        ]
                    }
                }),
            )
            .await?;

        Ok(pools)
    }

    pub(crate) async fn eternal_farmings(&self, pools: &[Address]) -> Result<Vec<EternalFarming>> {
        let pools: Vec<String> = pools.iter().map(lower).collect();

        let EternalFarmings { eternal_farmings } = self
            .query(
                GET_ETERNAL_FARMINGS,
                json!({ "where": { "pool_in": pools } }),
            )
            .await?;

        Ok(eternal_farmings)
    }

    /// Deposits of `owner` with liquidity left in any of `pools`.
    pub(crate) async fn deposits(&self, pools: &[Address], owner: Address) -> Result<Vec<Deposit>> {
        let pools: Vec<String> = pools.iter().map(lower).collect();

        let Deposits { deposits } = self
            .query(
                GET_DEPOSITS,
                json!({
                    "where": {
                        "pool_in": pools,
                        "owner": lower(&owner),
                        "liquidity_not": "0",
                    }
                }),
            )
            .await?;

        Ok(deposits)
    }
}
