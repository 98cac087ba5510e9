//! User-facing progress notifications for transactions.
//!
//! Write operations report through a [`Notifier`] so a front end can show toasts while a
//! transaction is pending. [`LogNotifier`] is the default and only emits log events.

use std::future::Future;

use crate::Result;

/// Titles shown while a transaction is pending and once it has been mined.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxMessages {
    pub sent: &'static str,
    pub success: &'static str,
}

impl TxMessages {
    #[must_use]
    pub const fn new(sent: &'static str, success: &'static str) -> Self {
        Self { sent, success }
    }
}

/// Receives transaction lifecycle events.
pub trait Notifier: Send + Sync {
    fn tx_sent(&self, title: &str);

    fn tx_success(&self, title: &str);

    fn tx_error(&self, error: &crate::error::Error);
}

/// [`Notifier`] that only logs, and does nothing when the `tracing` feature is off.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn tx_sent(&self, title: &str) {
        #[cfg(feature = "tracing")]
        tracing::info!(%title, "transaction sent");
        #[cfg(not(feature = "tracing"))]
        let _: &str = title;
    }

    fn tx_success(&self, title: &str) {
        #[cfg(feature = "tracing")]
        tracing::info!(%title, "transaction succeeded");
        #[cfg(not(feature = "tracing"))]
        let _: &str = title;
    }

    fn tx_error(&self, error: &crate::error::Error) {
        #[cfg(feature = "tracing")]
        tracing::warn!(%error, "transaction failed");
        #[cfg(not(feature = "tracing"))]
        let _: &crate::error::Error = error;
    }
}

/// Submits a transaction with `send`, then waits for it with `confirm`, reporting progress
/// to `notifier`.
///
/// `tx_sent` fires only once `send` has returned, so a transaction that fails to sign or
/// submit reports only `tx_error`. The outcome is returned unchanged.
pub async fn track_tx<N, S, P, C, F, T>(
    notifier: &N,
    messages: TxMessages,
    send: S,
    confirm: C,
) -> Result<T>
where
    N: Notifier + ?Sized,
    S: Future<Output = Result<P>>,
    C: FnOnce(P) -> F,
    F: Future<Output = Result<T>>,
{
    let pending = match send.await {
        Ok(pending) => pending,
        Err(error) => {
            notifier.tx_error(&error);
            return Err(error);
        }
    };

    notifier.tx_sent(messages.sent);

    match confirm(pending).await {
        Ok(value) => {
            notifier.tx_success(messages.success);
            Ok(value)
        }
        Err(error) => {
            notifier.tx_error(&error);
            Err(error)
        }
    }
}
