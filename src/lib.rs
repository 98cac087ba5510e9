//! Client SDK for Seer prediction markets.
//!
//! The crate is split into feature-gated API groups:
//!
//! | Module | Feature | Purpose |
//! |--------|---------|---------|
//! | [`trade`] | `trade` | Quote trades across CoW and Swapr, execute the selected quote |
//! | [`markets`] | `markets` | Create categorical, scalar and multi-scalar markets |
//! | [`pools`] | `pools` | Pool, incentive and deposit lookups against the Algebra subgraphs |
//! | [`ctf`] | always (`ctf` for the on-chain client) | Partitions, index sets and position ids |
//!
//! Per-chain contract addresses and endpoints live in static configuration, see
//! [`chain_config`] and [`subgraph_config`].

pub mod ctf;
pub mod error;
#[cfg(feature = "markets")]
pub mod markets;
pub mod notify;
#[cfg(feature = "pools")]
pub mod pools;
#[cfg(any(feature = "trade", feature = "pools"))]
pub(crate) mod serde_helpers;
#[cfg(feature = "trade")]
pub mod state;
#[cfg(feature = "trade")]
pub mod trade;
pub mod types;

use alloy::primitives::{ChainId, U256};
use phf::phf_map;
#[cfg(any(feature = "trade", feature = "pools"))]
use reqwest::{Request, StatusCode};
#[cfg(any(feature = "trade", feature = "pools"))]
use serde::de::DeserializeOwned;

use crate::error::Error;
use crate::types::{Address, address};

pub type Result<T> = std::result::Result<T, Error>;

/// [`ChainId`] for Ethereum mainnet
pub const MAINNET: ChainId = 1;

/// [`ChainId`] for Gnosis Chain
pub const GNOSIS: ChainId = 100;

/// Placeholder account used when quoting without a connected wallet.
pub const ZERO_ADDRESS: Address = Address::ZERO;

static CONFIG: phf::Map<ChainId, ChainConfig> = phf_map! {
    1_u64 => ChainConfig {
        market_factory: None,
        conditional_tokens: address!("0xC59b0e4De5F1248C1140964E0fF287B192407E0C"),
        collateral: address!("0x83F20F44975D03b1b09e64809B757c47f942BEeA"),
        wrapped_native: address!("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
        sdai: address!("0x83F20F44975D03b1b09e64809B757c47f942BEeA"),
        // 0.1 ETH
        min_bond: U256::from_limbs([100_000_000_000_000_000, 0, 0, 0]),
        swapr: None,
        cow: Some(CowConfig {
            api_host: "https://api.cow.fi/mainnet/api/v1/",
            settlement: address!("0x9008D19f58AAbD9eD0D60971565AA8510560ab41"),
            vault_relayer: address!("0xC92E8bdf79f0507f65a392b0ab4667716BFE0110"),
        }),
    },
    100_u64 => ChainConfig {
        market_factory: Some(address!("0x83183DA839Ce8228E31Ae41222EaD9EDBb5cDcf1")),
        conditional_tokens: address!("0xCeAfDD6bc0bEF976fdCd1112955828E00543c0Ce"),
        collateral: address!("0xaf204776c7245bF4147c2612BF6e5972Ee483701"),
        wrapped_native: address!("0xe91D153E0b41518A2Ce8Dd3D7944Fa863463a97d"),
        sdai: address!("0xaf204776c7245bF4147c2612BF6e5972Ee483701"),
        // 5 xDAI
        min_bond: U256::from_limbs([5_000_000_000_000_000_000, 0, 0, 0]),
        swapr: Some(SwaprConfig {
            quoter: address!("0xcBaD9FDf0D2814659Eb26f600EFDeAF005Eda0F7"),
            router: address!("0xfFB643E73f280B97809A8b41f7232AB401a04ee1"),
        }),
        cow: Some(CowConfig {
            api_host: "https://api.cow.fi/xdai/api/v1/",
            settlement: address!("0x9008D19f58AAbD9eD0D60971565AA8510560ab41"),
            vault_relayer: address!("0xC92E8bdf79f0507f65a392b0ab4667716BFE0110"),
        }),
    },
};

// Swapr runs on Algebra, which splits pool state and farming into separate subgraphs.
static SUBGRAPHS: phf::Map<ChainId, SubgraphConfig> = phf_map! {
    100_u64 => SubgraphConfig {
        algebra: "https://api.thegraph.com/subgraphs/name/swaprhq/algebrav19-v2",
        algebra_farming: "https://api.thegraph.com/subgraphs/name/swaprhq/farming-v2",
    },
};

/// Deployed contracts and chain-level parameters used across the SDK.
#[non_exhaustive]
#[derive(Debug)]
pub struct ChainConfig {
    /// Seer market factory. Not deployed on every chain.
    pub market_factory: Option<Address>,
    pub conditional_tokens: Address,
    /// Primary collateral token markets are quoted against.
    pub collateral: Address,
    /// Wrapped native token (WXDAI on Gnosis).
    pub wrapped_native: Address,
    /// Stable asset used as the intermediate hop when routing through the wrapped native token.
    pub sdai: Address,
    /// Minimum Reality.eth bond attached to newly created questions.
    pub min_bond: U256,
    pub swapr: Option<SwaprConfig>,
    pub cow: Option<CowConfig>,
}

/// Swapr (Algebra) periphery contracts.
#[non_exhaustive]
#[derive(Debug)]
pub struct SwaprConfig {
    pub quoter: Address,
    pub router: Address,
}

/// CoW Protocol deployment for a chain.
#[non_exhaustive]
#[derive(Debug)]
pub struct CowConfig {
    /// Order book API base URL, with trailing slash.
    pub api_host: &'static str,
    /// GPv2 settlement contract, the EIP-712 verifying contract for orders.
    pub settlement: Address,
    /// Spender that sell tokens must be approved for.
    pub vault_relayer: Address,
}

/// Subgraph endpoints for a chain.
#[non_exhaustive]
#[derive(Debug)]
pub struct SubgraphConfig {
    pub algebra: &'static str,
    pub algebra_farming: &'static str,
}

/// Return the [`ChainConfig`] for `chain_id`, if the chain is supported.
#[must_use]
pub fn chain_config(chain_id: ChainId) -> Option<&'static ChainConfig> {
    CONFIG.get(&chain_id)
}

/// Return the subgraph endpoints for `chain_id`, if any are deployed.
#[must_use]
pub fn subgraph_config(chain_id: ChainId) -> Option<&'static SubgraphConfig> {
    SUBGRAPHS.get(&chain_id)
}

/// Like [`chain_config`], but an unsupported chain is an error.
pub(crate) fn require_chain_config(chain_id: ChainId) -> Result<&'static ChainConfig> {
    chain_config(chain_id).ok_or_else(|| Error::missing_chain_config(chain_id, "chain"))
}

#[cfg(any(feature = "trade", feature = "pools"))]
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        level = "debug",
        skip(client, request),
        fields(
            method = %request.method(),
            path = request.url().path(),
            status_code
        )
    )
)]
async fn request<Response: DeserializeOwned>(
    client: &reqwest::Client,
    request: Request,
) -> Result<Response> {
    let method = request.method().clone();
    let path = request.url().path().to_owned();

    let response = client.execute(request).await?;
    let status_code = response.status();

    #[cfg(feature = "tracing")]
    tracing::Span::current().record("status_code", status_code.as_u16());

    if !status_code.is_success() {
        let message = response.text().await.unwrap_or_default();

        #[cfg(feature = "tracing")]
        tracing::warn!(
            status = %status_code,
            method = %method,
            path = %path,
            message = %message,
            "API request failed"
        );

        return Err(Error::status(status_code, method, path, message));
    }

    let json_value = response.json::<serde_json::Value>().await?;
    let response_data: Option<Response> = serde_helpers::deserialize_with_warnings(json_value)?;

    if let Some(response) = response_data {
        Ok(response)
    } else {
        #[cfg(feature = "tracing")]
        tracing::warn!(method = %method, path = %path, "API resource not found");
        Err(Error::status(
            StatusCode::NOT_FOUND,
            method,
            path,
            "Unable to find requested resource",
        ))
    }
}
