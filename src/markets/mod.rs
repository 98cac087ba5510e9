//! Market creation through the Seer market factory.
//!
//! **Feature flag:** `markets` (required to use this module)
//!
//! A market is created from user-entered parameters: its kind, name, outcome labels and
//! bounds. The parameters are turned into one or more Reality.eth questions (see
//! [`reality`]) and submitted to the factory entry point matching the market kind.
//!
//! | Market kind | Questions | Factory entry point |
//! |-------------|-----------|---------------------|
//! | categorical | one `single-select` listing all outcomes | `createCategoricalMarket` |
//! | scalar | one `uint` question `"{name} [{unit}]"` | `createScalarMarket` |
//! | multi-scalar | one `uint` question per outcome, from a template | `createMultiScalarMarket` |
//!
//! # Example
//!
//! ```no_run
//! use seer_client_sdk::GNOSIS;
//! use seer_client_sdk::markets::{Client, types::{CreateMarketRequest, MarketType}};
//! use seer_client_sdk::types::U256;
//! use alloy::providers::ProviderBuilder;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = ProviderBuilder::new()
//!     .connect("https://rpc.gnosischain.com")
//!     .await?;
//! let client = Client::new(provider, GNOSIS)?;
//!
//! let request = CreateMarketRequest::builder()
//!     .market_type(MarketType::Categorical)
//!     .market_name("Who will win the 2026 World Cup?")
//!     .outcomes(vec!["Brazil".to_owned(), "France".to_owned()])
//!     .category("sports")
//!     .opening_time(1_785_000_000)
//!     .build();
//!
//! let receipt = client.create_market(&request).await?;
//! println!("Market created in block {}", receipt.block_number);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod reality;
pub mod types;

pub use client::Client;
