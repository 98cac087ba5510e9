#![allow(
    clippy::module_name_repetitions,
    reason = "Trade prefix/suffix mirrors the backend names"
)]

use alloy::primitives::{Address, ChainId, U256};
use bon::Builder;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use super::cow::Order;
use crate::types::{Token, TransactionReceipt};

/// Maximum accepted slippage when none is configured: 1%.
pub const DEFAULT_MAX_SLIPPAGE_BPS: u32 = 100;

const BPS_DENOMINATOR: u32 = 10_000;

/// Direction of a trade from the point of view of the outcome token.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SwapType {
    /// Spend collateral, receive outcome tokens.
    Buy,
    /// Spend outcome tokens, receive collateral.
    Sell,
}

/// A user's request for a quote, as entered in a trade form.
#[non_exhaustive]
#[derive(Clone, Debug, Builder)]
pub struct QuoteRequest {
    pub chain_id: ChainId,
    /// Connected account, if any. Quotes without one use the zero address.
    pub account: Option<Address>,
    /// Human decimal amount of the sell token, e.g. `"1.5"`.
    #[builder(into)]
    pub amount: String,
    pub outcome_token: Token,
    pub collateral_token: Token,
    pub swap_type: SwapType,
}

impl QuoteRequest {
    /// Returns `(sell, buy)` for this swap direction.
    #[must_use]
    pub fn legs(&self) -> (&Token, &Token) {
        match self.swap_type {
            SwapType::Buy => (&self.collateral_token, &self.outcome_token),
            SwapType::Sell => (&self.outcome_token, &self.collateral_token),
        }
    }
}

/// Exact-input trade parameters handed to a backend.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TradeRequest {
    pub chain_id: ChainId,
    pub sell_token: Token,
    pub buy_token: Token,
    /// Sell amount in the sell token's smallest unit.
    pub amount_in: U256,
    pub max_slippage_bps: u32,
    pub user: Address,
    pub receiver: Address,
}

impl TradeRequest {
    #[must_use]
    pub const fn new(
        chain_id: ChainId,
        sell_token: Token,
        buy_token: Token,
        amount_in: U256,
        account: Address,
    ) -> Self {
        Self {
            chain_id,
            sell_token,
            buy_token,
            amount_in,
            max_slippage_bps: DEFAULT_MAX_SLIPPAGE_BPS,
            user: account,
            receiver: account,
        }
    }

    #[must_use]
    pub fn with_max_slippage_bps(mut self, max_slippage_bps: u32) -> Self {
        self.max_slippage_bps = max_slippage_bps;
        self
    }

    /// Lowest acceptable output for `amount_out` under this request's slippage.
    #[must_use]
    pub fn minimum_out(&self, amount_out: U256) -> U256 {
        apply_slippage(amount_out, self.max_slippage_bps)
    }
}

/// Reduces `amount` by `slippage_bps` basis points, rounding down.
#[must_use]
pub fn apply_slippage(amount: U256, slippage_bps: u32) -> U256 {
    let kept = BPS_DENOMINATOR.saturating_sub(slippage_bps);
    amount * U256::from(kept) / U256::from(BPS_DENOMINATOR)
}

/// A quote produced by the CoW order book, ready to be signed and submitted.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CowTrade {
    pub chain_id: ChainId,
    /// The order as it will be signed: buy amount already reduced by slippage.
    pub order: Order,
    /// Quoted buy amount before slippage.
    pub output_amount: U256,
    pub quote_id: Option<i64>,
    pub from: Address,
    /// Spender the sell token must be approved for.
    pub approve_address: Address,
}

/// A quote produced by the Swapr AMM.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwaprTrade {
    pub chain_id: ChainId,
    /// Tokens the swap goes through, sell token first.
    pub path: Vec<Address>,
    pub amount_in: U256,
    pub amount_out: U256,
    pub amount_out_minimum: U256,
    pub recipient: Address,
    /// Pool fee of each hop, in hundredths of a bip.
    pub fees: Vec<u16>,
    /// Router the sell token must be approved for.
    pub approve_address: Address,
}

/// An executable quote from exactly one backend.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Trade {
    Cow(CowTrade),
    Swapr(SwaprTrade),
}

impl Trade {
    /// Quoted output in the buy token's smallest unit.
    #[must_use]
    pub const fn output_amount(&self) -> U256 {
        match self {
            Trade::Cow(trade) => trade.output_amount,
            Trade::Swapr(trade) => trade.amount_out,
        }
    }

    /// Contract the sell token has to be approved for before executing.
    #[must_use]
    pub const fn approve_address(&self) -> Address {
        match self {
            Trade::Cow(trade) => trade.approve_address,
            Trade::Swapr(trade) => trade.approve_address,
        }
    }
}

/// A quote with the data a trade form needs to display it.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuoteTradeResult {
    /// Output amount of the trade, in the buy token's smallest unit.
    pub value: U256,
    /// Decimals of the sell token.
    pub decimals: u8,
    pub buy_token: Address,
    pub sell_token: Address,
    /// Sell amount in the sell token's smallest unit, as a decimal string.
    pub sell_amount: String,
    pub swap_type: SwapType,
    pub trade: Trade,
}

/// What a backend returned after executing a trade.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TradeOutcome {
    /// Off-chain order id, settled later by the protocol.
    OrderId(String),
    /// Receipt of the on-chain swap.
    Receipt(TransactionReceipt),
}
