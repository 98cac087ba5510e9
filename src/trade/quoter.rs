use std::str::FromStr as _;

use alloy::primitives::{Address, U256};
use bon::Builder;
use rust_decimal::RoundingStrategy;

use super::backend::{AmmBackend, OrderBackend};
use super::types::{
    CowTrade, DEFAULT_MAX_SLIPPAGE_BPS, QuoteRequest, QuoteTradeResult, SwaprTrade, Trade,
    TradeRequest,
};
use crate::error::Error;
use crate::types::Decimal;
use crate::{Result, ZERO_ADDRESS, chain_config};

/// Quoting parameters shared by every request.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Builder)]
pub struct Config {
    /// Maximum slippage accepted by both backends, in basis points.
    #[builder(default = DEFAULT_MAX_SLIPPAGE_BPS)]
    pub max_slippage_bps: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Asks both backends for a quote and picks one.
#[derive(Debug)]
pub struct Quoter<O, A> {
    order_backend: O,
    amm_backend: A,
    config: Config,
}

impl<O: OrderBackend, A: AmmBackend> Quoter<O, A> {
    #[must_use]
    pub fn new(order_backend: O, amm_backend: A) -> Self {
        Self::with_config(order_backend, amm_backend, Config::default())
    }

    #[must_use]
    pub const fn with_config(order_backend: O, amm_backend: A, config: Config) -> Self {
        Self {
            order_backend,
            amm_backend,
            config,
        }
    }

    /// Quotes `request` against the order book and the AMM at the same time.
    ///
    /// Returns `Ok(None)` without calling any backend when the amount is empty, zero or
    /// negative. When both backends answer, the order book's trade wins if it has one.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::Kind::NoRoute`] error if either backend fails, even when
    /// the other one produced a trade, and if neither has a trade. A malformed amount is a
    /// [`crate::error::Kind::Validation`] error.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self, request), fields(
            chain_id = request.chain_id,
            swap_type = %request.swap_type,
            amount = %request.amount
        ))
    )]
    pub async fn quote(&self, request: &QuoteRequest) -> Result<Option<QuoteTradeResult>> {
        let (sell_token, buy_token) = request.legs();

        let Some(amount_in) = parse_amount(&request.amount, sell_token.decimals)? else {
            return Ok(None);
        };

        let account = request.account.unwrap_or(ZERO_ADDRESS);
        let trade_request = TradeRequest::new(
            request.chain_id,
            sell_token.clone(),
            buy_token.clone(),
            amount_in,
            account,
        )
        .with_max_slippage_bps(self.config.max_slippage_bps);

        let (cow, swapr) = futures::join!(
            self.order_backend.best_trade_exact_in(&trade_request),
            self.quote_amm(&trade_request),
        );

        let trade = select_trade(cow, swapr)?;

        Ok(Some(QuoteTradeResult {
            value: trade.output_amount(),
            decimals: sell_token.decimals,
            buy_token: buy_token.address,
            sell_token: sell_token.address,
            sell_amount: amount_in.to_string(),
            swap_type: request.swap_type,
            trade,
        }))
    }

    async fn quote_amm(&self, request: &TradeRequest) -> Result<Option<SwaprTrade>> {
        match sdai_route(request) {
            Some(path) => self.amm_backend.quote_with_path(request, &path).await,
            None => self.amm_backend.quote(request).await,
        }
    }
}

/// Swaps touching the wrapped native token go through sDAI, where Swapr has liquidity.
fn sdai_route(request: &TradeRequest) -> Option<Vec<Address>> {
    let config = chain_config(request.chain_id)?;
    config.swapr.as_ref()?;

    let sell = request.sell_token.address;
    let buy = request.buy_token.address;

    (sell == config.wrapped_native || buy == config.wrapped_native)
        .then(|| vec![sell, config.sdai, buy])
}

fn select_trade(
    cow: Result<Option<CowTrade>>,
    swapr: Result<Option<SwaprTrade>>,
) -> Result<Trade> {
    match (cow, swapr) {
        (Ok(cow), Ok(swapr)) => cow
            .map(Trade::Cow)
            .or_else(|| swapr.map(Trade::Swapr))
            .ok_or_else(Error::no_route),
        (cow, swapr) => {
            // A single failing backend discards the other backend's quote as well.
            #[cfg(feature = "tracing")]
            {
                if let Err(error) = &cow {
                    tracing::warn!(backend = "cow", %error, "quote failed, discarding all quotes");
                }
                if let Err(error) = &swapr {
                    tracing::warn!(backend = "swapr", %error, "quote failed, discarding all quotes");
                }
            }
            drop((cow, swapr));

            Err(Error::no_route())
        }
    }
}

/// Parses a user-entered decimal amount into a token's smallest unit.
///
/// Digits beyond `decimals` are rounded half away from zero. Empty, zero and negative amounts yield `None`.
///
/// # Errors
///
/// Returns a [`crate::error::Kind::Validation`] error if `amount` is not a decimal number.
///
/// # Example
///
/// ```
/// use seer_client_sdk::trade::parse_amount;
/// use seer_client_sdk::types::U256;
///
/// assert_eq!(parse_amount("1.5", 6).unwrap(), Some(U256::from(1_500_000)));
/// assert_eq!(parse_amount("0", 18).unwrap(), None);
/// ```
pub fn parse_amount(amount: &str, decimals: u8) -> Result<Option<U256>> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Ok(None);
    }

    let value = Decimal::from_str(amount)
        .map_err(|e| Error::validation(format!("Invalid amount {amount:?}: {e}")))?;
    if value.is_sign_negative() || value.is_zero() {
        return Ok(None);
    }

    let decimals = u32::from(decimals);
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let exponent = decimals.saturating_sub(rounded.scale());
    let units = U256::from(rounded.mantissa().unsigned_abs())
        * U256::from(10_u8).pow(U256::from(exponent));

    Ok((!units.is_zero()).then_some(units))
}
