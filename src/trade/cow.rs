//! CoW Protocol order book client.
//!
//! Quotes come from `POST /quote`; an accepted quote is signed as a GPv2 order under
//! EIP-712 and posted to `POST /orders`. Orders settle off the caller's critical path, so
//! submitting only yields the order UID.
//!
//! # Example
//!
//! ```no_run
//! use alloy::signers::local::PrivateKeySigner;
//! use seer_client_sdk::GNOSIS;
//! use seer_client_sdk::trade::cow::Client;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let signer: PrivateKeySigner = "0x...".parse()?;
//! let client = Client::for_chain(GNOSIS)?.with_signer(signer);
//! # Ok(())
//! # }
//! ```

#![allow(
    clippy::exhaustive_structs,
    clippy::exhaustive_enums,
    reason = "Alloy sol! macro generates code that triggers these lints"
)]

use std::borrow::Cow;

use alloy::dyn_abi::Eip712Domain;
use alloy::primitives::{Address, B256, ChainId, U256};
use alloy::signers::Signer;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;
use alloy::sol_types::SolStruct as _;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Method};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as, skip_serializing_none};
use url::Url;

use super::backend::OrderBackend;
use super::types::{CowTrade, TradeRequest};
use crate::error::Error;
use crate::{CowConfig, Result, require_chain_config};

const DOMAIN_NAME: Option<Cow<'static, str>> = Some(Cow::Borrowed("Gnosis Protocol"));
const DOMAIN_VERSION: Option<Cow<'static, str>> = Some(Cow::Borrowed("v2"));

const KIND_SELL: &str = "sell";
const BALANCE_ERC20: &str = "erc20";
const SIGNING_SCHEME: &str = "eip712";

/// Seconds a quoted order stays valid.
const ORDER_VALIDITY_SECS: u32 = 30 * 60;

sol! {
    /// A GPv2 order, as hashed by the settlement contract and exchanged with the order book.
    ///
    /// <!-- The order book expects amounts as decimal strings. -->
    #[serde_as]
    #[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
    struct Order {
        address sellToken;
        address buyToken;
        address receiver;
        #[serde_as(as = "DisplayFromStr")]
        uint256 sellAmount;
        #[serde_as(as = "DisplayFromStr")]
        uint256 buyAmount;
        uint32 validTo;
        bytes32 appData;
        #[serde_as(as = "DisplayFromStr")]
        uint256 feeAmount;
        string kind;
        bool partiallyFillable;
        string sellTokenBalance;
        string buyTokenBalance;
    }
}

#[serde_as]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QuoteBody {
    sell_token: Address,
    buy_token: Address,
    receiver: Address,
    from: Address,
    kind: &'static str,
    #[serde_as(as = "DisplayFromStr")]
    sell_amount_before_fee: U256,
    app_data: B256,
    partially_fillable: bool,
    sell_token_balance: &'static str,
    buy_token_balance: &'static str,
    signing_scheme: &'static str,
    valid_for: u32,
}

impl From<&TradeRequest> for QuoteBody {
    fn from(request: &TradeRequest) -> Self {
        Self {
            sell_token: request.sell_token.address,
            buy_token: request.buy_token.address,
            receiver: request.receiver,
            from: request.user,
            kind: KIND_SELL,
            sell_amount_before_fee: request.amount_in,
            app_data: B256::ZERO,
            partially_fillable: false,
            sell_token_balance: BALANCE_ERC20,
            buy_token_balance: BALANCE_ERC20,
            signing_scheme: SIGNING_SCHEME,
            valid_for: ORDER_VALIDITY_SECS,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuoteResponse {
    pub(crate) quote: Order,
    pub(crate) from: Address,
    pub(crate) id: Option<i64>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderCreation<'order> {
    #[serde(flatten)]
    order: &'order Order,
    signing_scheme: &'static str,
    signature: String,
    from: Address,
    quote_id: Option<i64>,
}

/// Lifecycle state of a submitted order.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderState {
    PresignaturePending,
    Open,
    Fulfilled,
    Cancelled,
    Expired,
    #[serde(other)]
    Unknown,
}

impl OrderState {
    /// Whether the order can still be filled.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::PresignaturePending | Self::Open)
    }
}

/// A submitted order as reported by the order book.
#[non_exhaustive]
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatus {
    pub uid: String,
    pub status: OrderState,
    #[serde_as(as = "DisplayFromStr")]
    pub executed_sell_amount: U256,
    #[serde_as(as = "DisplayFromStr")]
    pub executed_buy_amount: U256,
}

/// Order book client for one chain. Quoting needs no signer; submitting does.
#[derive(Clone, Debug)]
pub struct Client<S = PrivateKeySigner> {
    host: Url,
    client: ReqwestClient,
    chain_id: ChainId,
    settlement: Address,
    vault_relayer: Address,
    signer: Option<S>,
}

impl Client {
    /// Creates a client for the order book deployed for `chain_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if CoW Protocol is not configured for the chain.
    pub fn for_chain(chain_id: ChainId) -> Result<Self> {
        let config = cow_config(chain_id)?;
        Self::new(config.api_host, chain_id)
    }

    /// Creates a client against a custom order book `host`, e.g. a staging API.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the HTTP client cannot be created or CoW
    /// Protocol is not configured for the chain.
    pub fn new(host: &str, chain_id: ChainId) -> Result<Self> {
        let config = cow_config(chain_id)?;

        let mut headers = HeaderMap::new();
        headers.insert("User-Agent", HeaderValue::from_static("seer_client_sdk"));
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = ReqwestClient::builder().default_headers(headers).build()?;

        Ok(Self {
            host: Url::parse(host)?,
            client,
            chain_id,
            settlement: config.settlement,
            vault_relayer: config.vault_relayer,
            signer: None,
        })
    }
}

impl<S> Client<S> {
    /// Uses `signer` to sign submitted orders.
    #[must_use]
    pub fn with_signer<T: Signer>(self, signer: T) -> Client<T> {
        Client {
            host: self.host,
            client: self.client,
            chain_id: self.chain_id,
            settlement: self.settlement,
            vault_relayer: self.vault_relayer,
            signer: Some(signer),
        }
    }

    #[must_use]
    pub fn host(&self) -> &Url {
        &self.host
    }

    /// EIP-712 domain orders on this chain are signed under.
    #[must_use]
    pub fn domain(&self) -> Eip712Domain {
        Eip712Domain {
            name: DOMAIN_NAME,
            version: DOMAIN_VERSION,
            chain_id: Some(U256::from(self.chain_id)),
            verifying_contract: Some(self.settlement),
            ..Eip712Domain::default()
        }
    }

    /// Fetches an exact-input sell quote and turns it into a signable order.
    ///
    /// The fee is folded into the sell amount so the signed order carries a zero fee, and
    /// the buy amount is reduced by the request's slippage.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self, request), fields(
            sell_token = %request.sell_token.address,
            buy_token = %request.buy_token.address,
            amount_in = %request.amount_in
        ))
    )]
    pub async fn quote(&self, request: &TradeRequest) -> Result<CowTrade> {
        if request.chain_id != self.chain_id {
            return Err(Error::validation(format!(
                "quote for chain {} requested from the order book of chain {}",
                request.chain_id, self.chain_id
            )));
        }

        let http_request = self
            .client
            .request(Method::POST, format!("{}quote", self.host))
            .json(&QuoteBody::from(request))
            .build()?;
        let QuoteResponse { quote, from, id } =
            crate::request(&self.client, http_request).await?;

        let output_amount = quote.buyAmount;
        let order = Order {
            sellAmount: quote.sellAmount + quote.feeAmount,
            buyAmount: request.minimum_out(output_amount),
            feeAmount: U256::ZERO,
            ..quote
        };

        Ok(CowTrade {
            chain_id: self.chain_id,
            order,
            output_amount,
            quote_id: id,
            from,
            approve_address: self.vault_relayer,
        })
    }

    /// Looks up a submitted order by UID.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(self)))]
    pub async fn order(&self, uid: &str) -> Result<OrderStatus> {
        let request = self
            .client
            .request(Method::GET, format!("{}orders/{uid}", self.host))
            .build()?;

        crate::request(&self.client, request).await
    }
}

impl<S: Signer> Client<S> {
    /// Signs `trade` and posts it to the order book, returning the order UID.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::Kind::Validation`] error if no signer is configured or the
    /// trade was quoted for another chain.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self, trade), fields(quote_id = ?trade.quote_id))
    )]
    pub async fn post_order(&self, trade: &CowTrade) -> Result<String> {
        let Some(signer) = &self.signer else {
            return Err(Error::validation("a signer is required to submit CoW orders"));
        };
        if trade.chain_id != self.chain_id {
            return Err(Error::validation(format!(
                "order quoted on chain {} submitted to chain {}",
                trade.chain_id, self.chain_id
            )));
        }

        let signature = signer
            .sign_hash(&trade.order.eip712_signing_hash(&self.domain()))
            .await?;

        let body = OrderCreation {
            order: &trade.order,
            signing_scheme: SIGNING_SCHEME,
            signature: signature.to_string(),
            from: signer.address(),
            quote_id: trade.quote_id,
        };

        let request = self
            .client
            .request(Method::POST, format!("{}orders", self.host))
            .json(&body)
            .build()?;

        crate::request(&self.client, request).await
    }
}

#[async_trait]
impl<S: Signer + Send + Sync> OrderBackend for Client<S> {
    async fn best_trade_exact_in(&self, request: &TradeRequest) -> Result<Option<CowTrade>> {
        self.quote(request).await.map(Some)
    }

    async fn submit(&self, trade: &CowTrade) -> Result<String> {
        self.post_order(trade).await
    }
}

fn cow_config(chain_id: ChainId) -> Result<&'static CowConfig> {
    require_chain_config(chain_id)?
        .cow
        .as_ref()
        .ok_or_else(|| Error::missing_chain_config(chain_id, "CoW Protocol"))
}
