//! Seams between the quoter/executor and the liquidity sources they drive.
//!
//! [`super::cow::Client`] implements [`OrderBackend`] and [`super::swapr::Client`]
//! implements [`AmmBackend`]; tests substitute in-memory fakes.

use std::sync::Arc;

use alloy::primitives::Address;
use async_trait::async_trait;

use super::types::{CowTrade, SwaprTrade, TradeRequest};
use crate::Result;
use crate::types::TransactionReceipt;

/// Off-chain order matching (CoW Protocol).
#[async_trait]
pub trait OrderBackend: Send + Sync {
    /// Best exact-input trade for `request`, or `None` if the order book has none.
    async fn best_trade_exact_in(&self, request: &TradeRequest) -> Result<Option<CowTrade>>;

    /// Signs and submits the order, returning its id.
    async fn submit(&self, trade: &CowTrade) -> Result<String>;
}

/// On-chain AMM (Swapr on Algebra).
#[async_trait]
pub trait AmmBackend: Send + Sync {
    /// Direct single-pool quote between the request's tokens.
    async fn quote(&self, request: &TradeRequest) -> Result<Option<SwaprTrade>>;

    /// Quote along `path`, which starts with the sell token and ends with the buy token.
    async fn quote_with_path(
        &self,
        request: &TradeRequest,
        path: &[Address],
    ) -> Result<Option<SwaprTrade>>;

    /// Sends the swap from `account` and waits for it to be mined.
    async fn execute(&self, trade: &SwaprTrade, account: Address) -> Result<TransactionReceipt>;
}

#[async_trait]
impl<T: OrderBackend + ?Sized> OrderBackend for &T {
    async fn best_trade_exact_in(&self, request: &TradeRequest) -> Result<Option<CowTrade>> {
        (**self).best_trade_exact_in(request).await
    }

    async fn submit(&self, trade: &CowTrade) -> Result<String> {
        (**self).submit(trade).await
    }
}

#[async_trait]
impl<T: OrderBackend + ?Sized> OrderBackend for Arc<T> {
    async fn best_trade_exact_in(&self, request: &TradeRequest) -> Result<Option<CowTrade>> {
        (**self).best_trade_exact_in(request).await
    }

    async fn submit(&self, trade: &CowTrade) -> Result<String> {
        (**self).submit(trade).await
    }
}

#[async_trait]
impl<T: AmmBackend + ?Sized> AmmBackend for &T {
    async fn quote(&self, request: &TradeRequest) -> Result<Option<SwaprTrade>> {
        (**self).quote(request).await
    }

    async fn quote_with_path(
        &self,
        request: &TradeRequest,
        path: &[Address],
    ) -> Result<Option<SwaprTrade>> {
        (**self).quote_with_path(request, path).await
    }

    async fn execute(&self, trade: &SwaprTrade, account: Address) -> Result<TransactionReceipt> {
        (**self).execute(trade, account).await
    }
}

#[async_trait]
impl<T: AmmBackend + ?Sized> AmmBackend for Arc<T> {
    async fn quote(&self, request: &TradeRequest) -> Result<Option<SwaprTrade>> {
        (**self).quote(request).await
    }

    async fn quote_with_path(
        &self,
        request: &TradeRequest,
        path: &[Address],
    ) -> Result<Option<SwaprTrade>> {
        (**self).quote_with_path(request, path).await
    }

    async fn execute(&self, trade: &SwaprTrade, account: Address) -> Result<TransactionReceipt> {
        (**self).execute(trade, account).await
    }
}
