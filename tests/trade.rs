#![cfg(feature = "trade")]
#![allow(
    clippy::unwrap_used,
    reason = "Do not need additional syntax for setting up tests"
)]

use std::str::FromStr as _;

use alloy::providers::ProviderBuilder;
use alloy::signers::local::PrivateKeySigner;
use httpmock::Method::{GET, POST};
use httpmock::MockServer;
use seer_client_sdk::error::Kind;
use seer_client_sdk::trade::cow;
use seer_client_sdk::trade::types::TradeRequest;
use seer_client_sdk::types::{Address, Token, U256, address};
use seer_client_sdk::{GNOSIS, MAINNET};
use serde_json::{Value, json};

// publicly known private key
const PRIVATE_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

const SDAI: Address = address!("0xaf204776c7245bF4147c2612BF6e5972Ee483701");
const YES: Address = address!("0x1111111111111111111111111111111111111111");
const ACCOUNT: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
const VAULT_RELAYER: Address = address!("0xC92E8bdf79f0507f65a392b0ab4667716BFE0110");

const ONE: u64 = 1_000_000_000_000_000_000;

fn sdai() -> Token {
    Token::new(SDAI, 18, "sDAI")
}

fn yes() -> Token {
    Token::new(YES, 18, "YES")
}

fn cow_client(server: &MockServer) -> cow::Client<PrivateKeySigner> {
    let signer = PrivateKeySigner::from_str(PRIVATE_KEY).unwrap();
    cow::Client::new(&server.url("/cow/"), GNOSIS)
        .unwrap()
        .with_signer(signer)
}

/// Order book quote selling 1 sDAI (0.99 + 0.01 fee) for 2 YES.
fn quote_response() -> Value {
    json!({
        "quote": {
            "sellToken": SDAI,
            "buyToken": YES,
            "receiver": ACCOUNT,
            "sellAmount": "990000000000000000",
            "buyAmount": "2000000000000000000",
            "validTo": 1_700_001_800,
            "appData": "0x0000000000000000000000000000000000000000000000000000000000000000",
            "feeAmount": "10000000000000000",
            "kind": "sell",
            "partiallyFillable": false,
            "sellTokenBalance": "erc20",
            "buyTokenBalance": "erc20",
            "signingScheme": "eip712"
        },
        "from": ACCOUNT,
        "expiration": "2023-11-14T22:43:20Z",
        "id": 4242,
        "verified": true
    })
}

mod cow_order_book {
    use super::*;

    #[tokio::test]
    async fn quote_folds_fee_and_applies_slippage() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = cow_client(&server);

        let mock = server.mock(|when, then| {
            when.method(POST).path("/cow/quote");
            then.status(200).json_body(quote_response());
        });

        let request = TradeRequest::new(GNOSIS, sdai(), yes(), U256::from(ONE), ACCOUNT);
        let trade = client.quote(&request).await?;

        mock.assert();
        assert_eq!(trade.order.sellAmount, U256::from(ONE));
        assert_eq!(trade.order.feeAmount, U256::ZERO);
        assert_eq!(trade.output_amount, U256::from(2 * ONE));
        // 1% default slippage
        assert_eq!(trade.order.buyAmount, U256::from(1_980_000_000_000_000_000_u64));
        assert_eq!(trade.quote_id, Some(4242));
        assert_eq!(trade.from, ACCOUNT);
        assert_eq!(trade.approve_address, VAULT_RELAYER);

        Ok(())
    }

    #[tokio::test]
    async fn quote_rejection_should_fail() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = cow_client(&server);

        server.mock(|when, then| {
            when.method(POST).path("/cow/quote");
            then.status(400).json_body(json!({
                "errorType": "NoLiquidity",
                "description": "no route found"
            }));
        });

        let request = TradeRequest::new(GNOSIS, sdai(), yes(), U256::from(ONE), ACCOUNT);
        let err = client.quote(&request).await.unwrap_err();

        assert_eq!(err.kind(), Kind::Status);
        assert!(err.to_string().contains("NoLiquidity"), "unexpected message: {err}");

        Ok(())
    }

    #[tokio::test]
    async fn quote_for_another_chain_is_rejected() {
        let server = MockServer::start();
        let client = cow_client(&server);

        let request = TradeRequest::new(MAINNET, sdai(), yes(), U256::from(ONE), ACCOUNT);
        let err = client.quote(&request).await.unwrap_err();

        assert_eq!(err.kind(), Kind::Validation);
    }

    #[tokio::test]
    async fn signed_order_is_posted() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = cow_client(&server);

        server.mock(|when, then| {
            when.method(POST).path("/cow/quote");
            then.status(200).json_body(quote_response());
        });
        let orders_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/cow/orders")
                .header("Content-Type", "application/json");
            then.status(201).json_body(json!("0xorderuid"));
        });

        let request = TradeRequest::new(GNOSIS, sdai(), yes(), U256::from(ONE), ACCOUNT);
        let trade = client.quote(&request).await?;
        let uid = client.post_order(&trade).await?;

        orders_mock.assert();
        assert_eq!(uid, "0xorderuid");

        Ok(())
    }

    #[tokio::test]
    async fn order_without_signer_is_rejected() -> anyhow::Result<()> {
        let server = MockServer::start();
        let quoting = cow::Client::new(&server.url("/cow/"), GNOSIS)?;

        server.mock(|when, then| {
            when.method(POST).path("/cow/quote");
            then.status(200).json_body(quote_response());
        });
        let orders_mock = server.mock(|when, then| {
            when.method(POST).path("/cow/orders");
            then.status(201).json_body(json!("0xorderuid"));
        });

        let request = TradeRequest::new(GNOSIS, sdai(), yes(), U256::from(ONE), ACCOUNT);
        let trade = quoting.quote(&request).await?;
        let err = quoting.post_order(&trade).await.unwrap_err();

        assert_eq!(err.kind(), Kind::Validation);
        orders_mock.assert_calls(0);

        Ok(())
    }

    #[tokio::test]
    async fn order_status_is_fetched_by_uid() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = cow_client(&server);

        let mock = server.mock(|when, then| {
            when.method(GET).path("/cow/orders/0xorderuid");
            then.status(200).json_body(json!({
                "uid": "0xorderuid",
                "status": "fulfilled",
                "executedSellAmount": "1000000000000000000",
                "executedBuyAmount": "1995000000000000000",
                "creationDate": "2023-11-14T22:13:20Z"
            }));
        });

        let order = client.order("0xorderuid").await?;

        mock.assert();
        assert_eq!(order.uid, "0xorderuid");
        assert_eq!(order.status, cow::OrderState::Fulfilled);
        assert!(!order.status.is_pending(), "settled");
        assert_eq!(order.executed_sell_amount, U256::from(ONE));

        Ok(())
    }
}

mod quote_and_execute {
    use seer_client_sdk::state::{QueryKey, State};
    use seer_client_sdk::trade::types::{QuoteRequest, SwapType, Trade, TradeOutcome};
    use seer_client_sdk::trade::{Executor, Quoter, swapr};

    use super::*;

    /// ABI-encoded `(uint256 amountOut, uint16 fee)` of a single-pool Swapr quote.
    fn swapr_quote(amount_out: U256, fee: u16) -> Value {
        json!({
            "jsonrpc": "2.0",
            "id": 0,
            "result": format!(
                "0x{}{fee:064x}",
                alloy::hex::encode(amount_out.to_be_bytes::<32>())
            )
        })
    }

    fn buy_request() -> QuoteRequest {
        QuoteRequest::builder()
            .chain_id(GNOSIS)
            .account(ACCOUNT)
            .amount("1")
            .outcome_token(yes())
            .collateral_token(sdai())
            .swap_type(SwapType::Buy)
            .build()
    }

    #[tokio::test]
    async fn order_book_quote_is_preferred_and_submitted() -> anyhow::Result<()> {
        let server = MockServer::start();
        let provider = ProviderBuilder::new()
            .connect(&server.url("/rpc"))
            .await?;

        server.mock(|when, then| {
            when.method(POST).path("/cow/quote");
            then.status(200).json_body(quote_response());
        });
        let rpc_mock = server.mock(|when, then| {
            when.method(POST).path("/rpc");
            then.status(200)
                .json_body(swapr_quote(U256::from(ONE + ONE / 2), 100));
        });
        server.mock(|when, then| {
            when.method(POST).path("/cow/orders");
            then.status(201).json_body(json!("0xorderuid"));
        });

        let quoter = Quoter::new(cow_client(&server), swapr::Client::new(provider.clone(), GNOSIS)?);
        let quote = quoter.quote(&buy_request()).await?.unwrap();

        rpc_mock.assert();
        assert!(matches!(quote.trade, Trade::Cow(_)), "CoW wins when both quote");
        assert_eq!(quote.value, U256::from(2 * ONE));
        assert_eq!(quote.sell_token, SDAI);
        assert_eq!(quote.buy_token, YES);
        assert_eq!(quote.sell_amount, ONE.to_string());
        assert_eq!(quote.trade.approve_address(), VAULT_RELAYER);

        let state = State::new();
        let mut invalidations = state.subscribe();
        let executor = Executor::new(
            cow_client(&server),
            swapr::Client::new(provider, GNOSIS)?,
            std::sync::Arc::clone(&state),
        );

        let outcome = executor.execute(&quote.trade, ACCOUNT).await?;

        assert_eq!(outcome, TradeOutcome::OrderId("0xorderuid".to_owned()));
        assert!(state.is_pending("0xorderuid"), "order recorded as pending");
        assert_eq!(invalidations.recv().await?, QueryKey::UserPositions);
        assert_eq!(invalidations.recv().await?, QueryKey::TokenBalance);

        Ok(())
    }

    #[tokio::test]
    async fn failing_order_book_discards_amm_quote() -> anyhow::Result<()> {
        let server = MockServer::start();
        let provider = ProviderBuilder::new()
            .connect(&server.url("/rpc"))
            .await?;

        server.mock(|when, then| {
            when.method(POST).path("/cow/quote");
            then.status(500).body("order book down");
        });
        server.mock(|when, then| {
            when.method(POST).path("/rpc");
            then.status(200)
                .json_body(swapr_quote(U256::from(ONE + ONE / 2), 100));
        });

        let quoter = Quoter::new(cow_client(&server), swapr::Client::new(provider, GNOSIS)?);
        let err = quoter.quote(&buy_request()).await.unwrap_err();

        assert_eq!(err.kind(), Kind::NoRoute);

        Ok(())
    }

    #[tokio::test]
    async fn empty_amount_sends_nothing() -> anyhow::Result<()> {
        let server = MockServer::start();
        let provider = ProviderBuilder::new()
            .connect(&server.url("/rpc"))
            .await?;

        let cow_mock = server.mock(|when, then| {
            when.method(POST).path("/cow/quote");
            then.status(200).json_body(quote_response());
        });

        let quoter = Quoter::new(cow_client(&server), swapr::Client::new(provider, GNOSIS)?);
        let request = QuoteRequest::builder()
            .chain_id(GNOSIS)
            .amount("")
            .outcome_token(yes())
            .collateral_token(sdai())
            .swap_type(SwapType::Sell)
            .build();

        assert!(quoter.quote(&request).await?.is_none(), "nothing to quote");
        cow_mock.assert_calls(0);

        Ok(())
    }
}
