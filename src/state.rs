//! Client-side state shared by trade execution and its consumers.
//!
//! [`State`] keeps the ids of submitted CoW orders that have not settled yet and
//! broadcasts [`QueryKey`]s whenever cached data must be refetched, e.g. balances after a
//! swap.

use std::sync::Arc;

use dashmap::DashSet;
use tokio::sync::broadcast;

const INVALIDATION_CAPACITY: usize = 64;

/// Cached query families that can go stale after a write.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// Outcome-token positions of the connected account.
    UserPositions,
    /// ERC-20 balances of the connected account.
    TokenBalance,
}

/// Pending orders and query invalidations, cheap to share behind an [`Arc`].
#[derive(Debug)]
pub struct State {
    pending_orders: DashSet<String>,
    invalidations: broadcast::Sender<QueryKey>,
}

impl Default for State {
    fn default() -> Self {
        let (invalidations, _) = broadcast::channel(INVALIDATION_CAPACITY);

        Self {
            pending_orders: DashSet::new(),
            invalidations,
        }
    }
}

impl State {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Records a submitted order. Returns `false` if it was already pending.
    pub fn add_pending_order<S: Into<String>>(&self, order_id: S) -> bool {
        self.pending_orders.insert(order_id.into())
    }

    /// Forgets an order, typically once it has been filled or expired.
    pub fn remove_pending_order(&self, order_id: &str) -> bool {
        self.pending_orders.remove(order_id).is_some()
    }

    #[must_use]
    pub fn is_pending(&self, order_id: &str) -> bool {
        self.pending_orders.contains(order_id)
    }

    /// Snapshot of the pending order ids, in no particular order.
    #[must_use]
    pub fn pending_orders(&self) -> Vec<String> {
        self.pending_orders.iter().map(|id| id.key().clone()).collect()
    }

    /// Receives every [`QueryKey`] invalidated after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<QueryKey> {
        self.invalidations.subscribe()
    }

    /// Tells subscribers that data under `key` is stale.
    pub fn invalidate(&self, key: QueryKey) {
        if self.invalidations.send(key).is_err() {
            #[cfg(feature = "tracing")]
            tracing::trace!(?key, "no invalidation subscribers");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_orders_are_deduplicated() {
        let state = State::new();

        assert!(state.add_pending_order("0xabc"), "first insert is new");
        assert!(!state.add_pending_order("0xabc"), "second insert is a duplicate");
        assert!(state.is_pending("0xabc"), "order should be pending");
        assert_eq!(state.pending_orders(), vec!["0xabc".to_owned()]);

        assert!(state.remove_pending_order("0xabc"), "order was pending");
        assert!(state.pending_orders().is_empty(), "no orders left");
    }

    #[tokio::test]
    async fn invalidations_reach_subscribers() {
        let state = State::new();
        let mut rx = state.subscribe();

        state.invalidate(QueryKey::UserPositions);
        state.invalidate(QueryKey::TokenBalance);

        assert_eq!(rx.recv().await.unwrap(), QueryKey::UserPositions);
        assert_eq!(rx.recv().await.unwrap(), QueryKey::TokenBalance);
    }

    #[test]
    fn invalidate_without_subscribers_is_a_no_op() {
        let state = State::new();
        state.invalidate(QueryKey::TokenBalance);
    }
}
