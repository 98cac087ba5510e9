use std::sync::Arc;

use alloy::primitives::Address;

use super::backend::{AmmBackend, OrderBackend};
use super::types::{Trade, TradeOutcome};
use crate::Result;
use crate::state::{QueryKey, State};

/// Executes a selected [`Trade`] on the backend that produced it.
#[derive(Debug)]
pub struct Executor<O, A> {
    order_backend: O,
    amm_backend: A,
    state: Arc<State>,
}

impl<O: OrderBackend, A: AmmBackend> Executor<O, A> {
    #[must_use]
    pub const fn new(order_backend: O, amm_backend: A, state: Arc<State>) -> Self {
        Self {
            order_backend,
            amm_backend,
            state,
        }
    }

    #[must_use]
    pub fn state(&self) -> &Arc<State> {
        &self.state
    }

    /// Submits a CoW order or sends a Swapr swap for `account`.
    ///
    /// Order ids are recorded as pending in [`State`]. After either kind succeeds, the
    /// user's positions and token balances are invalidated.
    ///
    /// # Errors
    ///
    /// Backend errors are returned unchanged and leave the state untouched.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self, trade), fields(
            output_amount = %trade.output_amount()
        ))
    )]
    pub async fn execute(&self, trade: &Trade, account: Address) -> Result<TradeOutcome> {
        let outcome = match trade {
            Trade::Cow(trade) => {
                let order_id = self.order_backend.submit(trade).await?;
                self.state.add_pending_order(order_id.clone());
                TradeOutcome::OrderId(order_id)
            }
            Trade::Swapr(trade) => {
                TradeOutcome::Receipt(self.amm_backend.execute(trade, account).await?)
            }
        };

        #[cfg(feature = "tracing")]
        tracing::info!(?outcome, "trade executed");

        self.state.invalidate(QueryKey::UserPositions);
        self.state.invalidate(QueryKey::TokenBalance);

        Ok(outcome)
    }
}
