//! Swapr (Algebra) quoter and swap router client.

#![allow(
    clippy::exhaustive_structs,
    clippy::exhaustive_enums,
    reason = "Alloy sol! macro generates code that triggers these lints"
)]

use alloy::primitives::aliases::U160;
use alloy::primitives::{Address, Bytes, ChainId, U256};
use alloy::providers::Provider;
use alloy::sol;
use async_trait::async_trait;
use chrono::{TimeDelta, Utc};

use super::backend::AmmBackend;
use super::types::{SwaprTrade, TradeRequest};
use crate::error::Error;
use crate::types::{TransactionReceipt, confirm};
use crate::{Result, require_chain_config};

/// How long a sent swap may wait in the mempool before the router rejects it.
const SWAP_DEADLINE: TimeDelta = TimeDelta::minutes(20);

sol! {
    #[sol(rpc)]
    interface IAlgebraQuoter {
        function quoteExactInput(bytes path, uint256 amountIn)
            external
            returns (uint256 amountOut, uint16[] fees);

        function quoteExactInputSingle(
            address tokenIn,
            address tokenOut,
            uint256 amountIn,
            uint160 limitSqrtPrice
        ) external returns (uint256 amountOut, uint16 fee);
    }

    #[sol(rpc)]
    interface ISwapRouter {
        struct ExactInputSingleParams {
            address tokenIn;
            address tokenOut;
            address recipient;
            uint256 deadline;
            uint256 amountIn;
            uint256 amountOutMinimum;
            uint160 limitSqrtPrice;
        }

        struct ExactInputParams {
            bytes path;
            address recipient;
            uint256 deadline;
            uint256 amountIn;
            uint256 amountOutMinimum;
        }

        function exactInputSingle(ExactInputSingleParams calldata params)
            external
            payable
            returns (uint256 amountOut);

        function exactInput(ExactInputParams calldata params)
            external
            payable
            returns (uint256 amountOut);
    }
}

/// Algebra multi-hop path: the hop token addresses packed back to back.
#[must_use]
pub fn encode_path(path: &[Address]) -> Bytes {
    path.iter()
        .flat_map(|token| token.into_array())
        .collect::<Vec<u8>>()
        .into()
}

/// Quotes and executes swaps on the Swapr deployment of one chain.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct Client<P: Provider> {
    quoter: IAlgebraQuoter::IAlgebraQuoterInstance<P>,
    router: ISwapRouter::ISwapRouterInstance<P>,
    chain_id: ChainId,
}

impl<P: Provider + Clone> Client<P> {
    /// # Errors
    ///
    /// Returns an error if the chain is unsupported or Swapr is not deployed on it.
    pub fn new(provider: P, chain_id: ChainId) -> Result<Self> {
        let swapr = require_chain_config(chain_id)?
            .swapr
            .as_ref()
            .ok_or_else(|| Error::missing_chain_config(chain_id, "Swapr"))?;

        Ok(Self {
            quoter: IAlgebraQuoter::new(swapr.quoter, provider.clone()),
            router: ISwapRouter::new(swapr.router, provider),
            chain_id,
        })
    }

    #[must_use]
    pub const fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    /// Single-pool quote between the request's tokens. `None` when the pool yields nothing.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self, request), fields(
            sell_token = %request.sell_token.address,
            buy_token = %request.buy_token.address,
            amount_in = %request.amount_in
        ))
    )]
    pub async fn quote_exact_input_single(
        &self,
        request: &TradeRequest,
    ) -> Result<Option<SwaprTrade>> {
        self.check_chain(request)?;

        let quoted = self
            .quoter
            .quoteExactInputSingle(
                request.sell_token.address,
                request.buy_token.address,
                request.amount_in,
                U160::ZERO,
            )
            .call()
            .await
            .map_err(|e| Error::transaction_with_source("Failed to quote Swapr swap", e))?;

        Ok(self.trade(
            request,
            vec![request.sell_token.address, request.buy_token.address],
            quoted.amountOut,
            vec![quoted.fee],
        ))
    }

    /// Multi-hop quote along `path`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self, request), fields(
            amount_in = %request.amount_in,
            hops = path.len().saturating_sub(1)
        ))
    )]
    pub async fn quote_exact_input(
        &self,
        request: &TradeRequest,
        path: &[Address],
    ) -> Result<Option<SwaprTrade>> {
        self.check_chain(request)?;
        if path.len() < 2 {
            return Err(Error::validation("a swap path needs at least two tokens"));
        }

        let quoted = self
            .quoter
            .quoteExactInput(encode_path(path), request.amount_in)
            .call()
            .await
            .map_err(|e| Error::transaction_with_source("Failed to quote Swapr swap", e))?;

        Ok(self.trade(request, path.to_vec(), quoted.amountOut, quoted.fees))
    }

    /// Sends the swap for `trade` with `account` as recipient and waits for the receipt.
    ///
    /// The sell token must already be approved for the router.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self, trade), fields(
            amount_in = %trade.amount_in,
            amount_out_minimum = %trade.amount_out_minimum
        ))
    )]
    pub async fn swap(&self, trade: &SwaprTrade, account: Address) -> Result<TransactionReceipt> {
        let deadline = U256::from((Utc::now() + SWAP_DEADLINE).timestamp().unsigned_abs());

        let sent = match trade.path.as_slice() {
            [token_in, token_out] => {
                let params = ISwapRouter::ExactInputSingleParams {
                    tokenIn: *token_in,
                    tokenOut: *token_out,
                    recipient: account,
                    deadline,
                    amountIn: trade.amount_in,
                    amountOutMinimum: trade.amount_out_minimum,
                    limitSqrtPrice: U160::ZERO,
                };
                self.router.exactInputSingle(params).from(account).send().await
            }
            [_, _, _, ..] => {
                let params = ISwapRouter::ExactInputParams {
                    path: encode_path(&trade.path),
                    recipient: account,
                    deadline,
                    amountIn: trade.amount_in,
                    amountOutMinimum: trade.amount_out_minimum,
                };
                self.router.exactInput(params).from(account).send().await
            }
            _ => return Err(Error::validation("a swap path needs at least two tokens")),
        };

        let pending_tx =
            sent.map_err(|e| Error::transaction_with_source("Failed to send swap transaction", e))?;

        confirm(pending_tx, "swap").await
    }

    fn trade(
        &self,
        request: &TradeRequest,
        path: Vec<Address>,
        amount_out: U256,
        fees: Vec<u16>,
    ) -> Option<SwaprTrade> {
        (!amount_out.is_zero()).then(|| SwaprTrade {
            chain_id: self.chain_id,
            path,
            amount_in: request.amount_in,
            amount_out,
            amount_out_minimum: request.minimum_out(amount_out),
            recipient: request.receiver,
            fees,
            approve_address: *self.router.address(),
        })
    }

    fn check_chain(&self, request: &TradeRequest) -> Result<()> {
        if request.chain_id == self.chain_id {
            Ok(())
        } else {
            Err(Error::validation(format!(
                "quote for chain {} requested from Swapr on chain {}",
                request.chain_id, self.chain_id
            )))
        }
    }
}

#[async_trait]
impl<P: Provider + Clone> AmmBackend for Client<P> {
    async fn quote(&self, request: &TradeRequest) -> Result<Option<SwaprTrade>> {
        self.quote_exact_input_single(request).await
    }

    async fn quote_with_path(
        &self,
        request: &TradeRequest,
        path: &[Address],
    ) -> Result<Option<SwaprTrade>> {
        self.quote_exact_input(request, path).await
    }

    async fn execute(&self, trade: &SwaprTrade, account: Address) -> Result<TransactionReceipt> {
        self.swap(trade, account).await
    }
}
