//! Trade quoting and execution across CoW Protocol and Swapr.
//!
//! **Feature flag:** `trade` (required to use this module)
//!
//! [`Quoter`] asks both liquidity sources for an exact-input quote at the same time and
//! returns one [`types::Trade`]; [`Executor`] runs it on the backend that produced it.
//!
//! | Backend | Trait | Execution result |
//! |---------|-------|------------------|
//! | [`cow::Client`] (off-chain order book) | [`OrderBackend`] | order UID, recorded as pending |
//! | [`swapr::Client`] (Algebra AMM) | [`AmmBackend`] | transaction receipt |
//!
//! Quoting is all-or-nothing: if either backend fails, the quote fails with
//! [`crate::error::Kind::NoRoute`], even when the other backend had a trade.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use alloy::providers::ProviderBuilder;
//! use alloy::signers::local::PrivateKeySigner;
//! use seer_client_sdk::GNOSIS;
//! use seer_client_sdk::state::State;
//! use seer_client_sdk::trade::{Executor, Quoter, cow, swapr};
//! use seer_client_sdk::trade::types::{QuoteRequest, SwapType};
//! use seer_client_sdk::types::{Token, address};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let signer: PrivateKeySigner = "0x...".parse()?;
//! let account = signer.address();
//! let provider = ProviderBuilder::new()
//!     .connect("https://rpc.gnosischain.com")
//!     .await?;
//!
//! let order_book = Arc::new(cow::Client::for_chain(GNOSIS)?.with_signer(signer));
//! let amm = Arc::new(swapr::Client::new(provider, GNOSIS)?);
//!
//! let quoter = Quoter::new(Arc::clone(&order_book), Arc::clone(&amm));
//! let executor = Executor::new(order_book, amm, State::new());
//!
//! let request = QuoteRequest::builder()
//!     .chain_id(GNOSIS)
//!     .account(account)
//!     .amount("10")
//!     .outcome_token(Token::new(address!("0x1111111111111111111111111111111111111111"), 18, "YES"))
//!     .collateral_token(Token::new(address!("0xaf204776c7245bF4147c2612BF6e5972Ee483701"), 18, "sDAI"))
//!     .swap_type(SwapType::Buy)
//!     .build();
//!
//! if let Some(quote) = quoter.quote(&request).await? {
//!     let outcome = executor.execute(&quote.trade, account).await?;
//!     println!("{outcome:?}");
//! }
//! # Ok(())
//! # }
//! ```

mod backend;
pub mod cow;
mod executor;
mod quoter;
pub mod swapr;
#[cfg(test)]
mod testing;
pub mod types;

pub use backend::{AmmBackend, OrderBackend};
pub use executor::Executor;
pub use quoter::{Config, Quoter, parse_amount};
