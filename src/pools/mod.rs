//! Liquidity pool data from the Algebra subgraphs.
//!
//! **Feature flag:** `pools` (required to use this module)
//!
//! Swapr runs on Algebra, whose state is split across two subgraphs: `algebra` indexes
//! pools and `algebra_farming` indexes eternal farmings and farming deposits. Endpoints
//! come from [`crate::subgraph_config`] and can be overridden per chain through
//! [`Config`].
//!
//! Lookups issued close together are merged: pool and farming queries go through a
//! [`batch::Batcher`] per chain, which collects keys for a short window (10 ms by default)
//! and resolves them with one GraphQL request.
//!
//! # Example
//!
//! ```no_run
//! use seer_client_sdk::GNOSIS;
//! use seer_client_sdk::pools::Client;
//! use seer_client_sdk::types::address;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::default();
//!
//! let outcomes = [
//!     address!("0x1111111111111111111111111111111111111111"),
//!     address!("0x2222222222222222222222222222222222222222"),
//! ];
//! for (outcome, pools) in outcomes.iter().zip(client.market_pools(GNOSIS, &outcomes).await?) {
//!     println!("{outcome}: {} pools", pools.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod client;
mod subgraph;
pub mod types;

pub use client::{Client, Config, Endpoints};
