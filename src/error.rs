use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt;

use alloy::primitives::ChainId;
use alloy::primitives::ruint::ParseError;
/// HTTP method type, re-exported for use with error inspection.
pub use reqwest::Method;
/// HTTP status code type, re-exported for use with error inspection.
pub use reqwest::StatusCode;

#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Error related to non-successful HTTP call
    Status,
    /// Error related to invalid input or state within seer-client-sdk
    Validation,
    /// Internal error from dependencies
    Internal,
    /// A required external dependency (e.g. a subgraph) is not configured for the chain
    Unavailable,
    /// Neither trade backend produced a usable route
    NoRoute,
    /// A contract call or transaction failed
    Transaction,
    /// A GraphQL endpoint answered with an `errors` payload
    Subgraph,
}

#[derive(Debug)]
pub struct Error {
    kind: Kind,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    backtrace: Backtrace,
}

impl Error {
    pub fn with_source<S: StdError + Send + Sync + 'static>(kind: Kind, source: S) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
            backtrace: Backtrace::capture(),
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    pub fn inner(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        let e = self.source.as_deref()?;
        e.downcast_ref::<E>()
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Validation {
            reason: message.into(),
        }
        .into()
    }

    pub fn status<S: Into<String>>(
        status_code: StatusCode,
        method: Method,
        path: String,
        message: S,
    ) -> Self {
        Status {
            status_code,
            method,
            path,
            message: message.into(),
        }
        .into()
    }

    #[must_use]
    pub fn missing_chain_config(chain_id: ChainId, component: &'static str) -> Self {
        MissingChainConfig {
            chain_id,
            component,
        }
        .into()
    }

    #[must_use]
    pub fn subgraph_unavailable(chain_id: ChainId) -> Self {
        Unavailable {
            chain_id,
            resource: "Subgraph",
        }
        .into()
    }

    #[must_use]
    pub fn no_route() -> Self {
        NoRoute.into()
    }

    pub fn transaction<S: Into<String>>(message: S) -> Self {
        Transaction {
            message: message.into(),
            source: None,
        }
        .into()
    }

    /// A failed contract call or submission, keeping the underlying error (e.g. an
    /// [`alloy::contract::Error`] carrying revert data) reachable through
    /// [`Transaction::cause`].
    pub fn transaction_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: StdError + Send + Sync + 'static,
    {
        Transaction {
            message: message.into(),
            source: Some(Box::new(source)),
        }
        .into()
    }

    #[must_use]
    pub fn subgraph(messages: Vec<String>) -> Self {
        Subgraph { messages }.into()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(src) => write!(f, "{:?}: {}", self.kind, src),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

#[non_exhaustive]
#[derive(Debug)]
pub struct Status {
    pub status_code: StatusCode,
    pub method: Method,
    pub path: String,
    pub message: String,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "error({}) making {} call to {} with {}",
            self.status_code, self.method, self.path, self.message
        )
    }
}

impl StdError for Status {}

#[non_exhaustive]
#[derive(Debug)]
pub struct Validation {
    pub reason: String,
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid: {}", self.reason)
    }
}

impl StdError for Validation {}

#[non_exhaustive]
#[derive(Debug, Clone, Copy)]
pub struct MissingChainConfig {
    pub chain_id: ChainId,
    pub component: &'static str,
}

impl fmt::Display for MissingChainConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "missing {} config for chain id {}",
            self.component, self.chain_id,
        )
    }
}

impl StdError for MissingChainConfig {}

/// A dependency the operation cannot run without is not configured for the chain.
#[non_exhaustive]
#[derive(Debug, Clone, Copy)]
pub struct Unavailable {
    pub chain_id: ChainId,
    pub resource: &'static str,
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} not available for chain id {}",
            self.resource, self.chain_id
        )
    }
}

impl StdError for Unavailable {}

#[non_exhaustive]
#[derive(Debug, Clone, Copy)]
pub struct NoRoute;

impl fmt::Display for NoRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("No route found")
    }
}

impl StdError for NoRoute {}

/// A contract call could not be sent, reverted, or never produced a receipt.
#[non_exhaustive]
#[derive(Debug)]
pub struct Transaction {
    pub message: String,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl Transaction {
    /// The error returned by the provider or contract binding, when there was one.
    #[must_use]
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(src) => write!(f, "transaction failed: {}: {src}", self.message),
            None => write!(f, "transaction failed: {}", self.message),
        }
    }
}

impl StdError for Transaction {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

/// GraphQL `errors` returned alongside (or instead of) `data`.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct Subgraph {
    pub messages: Vec<String>,
}

impl fmt::Display for Subgraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subgraph query failed: {}", self.messages.join("; "))
    }
}

impl StdError for Subgraph {}

impl From<MissingChainConfig> for Error {
    fn from(err: MissingChainConfig) -> Self {
        Error::with_source(Kind::Internal, err)
    }
}

impl From<Unavailable> for Error {
    fn from(err: Unavailable) -> Self {
        Error::with_source(Kind::Unavailable, err)
    }
}

impl From<NoRoute> for Error {
    fn from(err: NoRoute) -> Self {
        Error::with_source(Kind::NoRoute, err)
    }
}

impl From<Transaction> for Error {
    fn from(err: Transaction) -> Self {
        Error::with_source(Kind::Transaction, err)
    }
}

impl From<Subgraph> for Error {
    fn from(err: Subgraph) -> Self {
        Error::with_source(Kind::Subgraph, err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<alloy::signers::Error> for Error {
    fn from(e: alloy::signers::Error) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<Validation> for Error {
    fn from(err: Validation) -> Self {
        Error::with_source(Kind::Validation, err)
    }
}

impl From<Status> for Error {
    fn from(err: Status) -> Self {
        Error::with_source(Kind::Status, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_route_display_should_succeed() {
        let error = Error::no_route();

        assert_eq!(error.kind(), Kind::NoRoute);
        assert_eq!(error.to_string(), "NoRoute: No route found");
    }

    #[test]
    fn subgraph_unavailable_should_succeed() {
        let error = Error::subgraph_unavailable(1);

        assert_eq!(error.kind(), Kind::Unavailable);
        assert!(
            error.to_string().contains("Subgraph not available"),
            "unexpected message: {error}"
        );
        assert!(error.downcast_ref::<Unavailable>().is_some());
    }

    #[test]
    fn missing_chain_config_into_error_should_succeed() {
        let error = Error::missing_chain_config(42, "market factory");

        assert_eq!(error.kind(), Kind::Internal);
        assert_eq!(
            error.to_string(),
            "Internal: missing market factory config for chain id 42"
        );
    }

    #[test]
    fn subgraph_errors_display_should_succeed() {
        let error: Error = Subgraph {
            messages: vec!["bad field".to_owned(), "timeout".to_owned()],
        }
        .into();

        assert_eq!(error.kind(), Kind::Subgraph);
        assert_eq!(
            error.to_string(),
            "Subgraph: subgraph query failed: bad field; timeout"
        );
    }

    #[test]
    fn transaction_keeps_underlying_error() {
        let cause = std::io::Error::other("execution reverted: 0x08c379a0");
        let error = Error::transaction_with_source("Failed to send swap transaction", cause);

        assert_eq!(error.kind(), Kind::Transaction);
        assert_eq!(
            error.to_string(),
            "Transaction: transaction failed: Failed to send swap transaction: execution \
             reverted: 0x08c379a0"
        );

        let transaction = error.downcast_ref::<Transaction>().unwrap();
        let io = transaction
            .cause()
            .and_then(|e| e.downcast_ref::<std::io::Error>())
            .unwrap();
        assert_eq!(io.kind(), std::io::ErrorKind::Other);
        assert!(StdError::source(transaction).is_some());
    }
}
