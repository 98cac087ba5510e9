//! Subgraph entities and the pool summaries built from them.
//!
//! The Algebra subgraphs encode `BigInt` and `BigDecimal` fields as decimal strings.

use alloy::primitives::{Address, U256};
use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};


/// A token as embedded in a subgraph pool.
#[non_exhaustive]
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PoolToken {
    pub id: Address,
    pub symbol: String,
    #[serde_as(as = "DisplayFromStr")]
    pub decimals: u8,
}

/// An Algebra liquidity pool.
#[non_exhaustive]
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    pub id: Address,
    /// Current fee in hundredths of a bip.
    #[serde_as(as = "DisplayFromStr")]
    pub fee: u32,
    #[serde_as(as = "DisplayFromStr")]
    pub liquidity: U256,
    pub token0: PoolToken,
    pub token1: PoolToken,
    /// Unbounded subgraph `BigDecimal`, kept as sent. Pools are ranked by it server side.
    #[serde(rename = "totalValueLockedUSD")]
    pub total_value_locked_usd: String,
}

/// An eternal farming program rewarding liquidity in one pool.
#[non_exhaustive]
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EternalFarming {
    pub id: String,
    pub pool: Address,
    #[serde_as(as = "DisplayFromStr")]
    pub reward: U256,
    #[serde_as(as = "DisplayFromStr")]
    pub bonus_reward: U256,
    pub reward_token: Address,
    pub bonus_reward_token: Address,
    #[serde_as(as = "DisplayFromStr")]
    pub start_time: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub end_time: u64,
}

/// A liquidity position NFT deposited in the farming center.
#[non_exhaustive]
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deposit {
    /// Position token id.
    pub id: String,
    pub owner: Address,
    pub pool: Address,
    #[serde_as(as = "DisplayFromStr")]
    pub liquidity: U256,
    /// Farming the position is staked in, if any.
    pub eternal_farming: Option<String>,
}

/// Pool between an outcome token and collateral, with its farming incentives.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub struct PoolInfo {
    pub id: Address,
    pub fee: u32,
    /// Lower address of the pair.
    pub token0: Address,
    /// Higher address of the pair.
    pub token1: Address,
    pub incentives: Vec<PoolIncentive>,
}

#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub struct PoolIncentive {
    pub reward: U256,
    /// Always `0` until reward token prices and staked TVL are available.
    pub apr: f64,
    pub reward_token: Address,
    pub bonus_reward_token: Address,
    pub start_time: u64,
    pub end_time: u64,
}

impl From<&EternalFarming> for PoolIncentive {
    fn from(farming: &EternalFarming) -> Self {
        Self {
            reward: farming.reward,
            apr: incentive_apr(farming),
            reward_token: farming.reward_token,
            bonus_reward_token: farming.bonus_reward_token,
            start_time: farming.start_time,
            end_time: farming.end_time,
        }
    }
}

// TODO: derive from the reward rate once a price feed for the reward token and the staked
// TVL of the pool are available.
const fn incentive_apr(_farming: &EternalFarming) -> f64 {
    0.0
}

/// Token pair used to look up pools, with `token0 < token1`.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PoolKey {
    pub token0: Address,
    pub token1: Address,
}

impl PoolKey {
    /// Orders the pair the way pools store it.
    #[must_use]
    pub fn sorted(a: Address, b: Address) -> Self {
        let (token0, token1) = if a > b { (b, a) } else { (a, b) };
        Self { token0, token1 }
    }

    pub(crate) fn matches(&self, pool: &Pool) -> bool {
        pool.token0.id == self.token0 && pool.token1.id == self.token1
    }
}
