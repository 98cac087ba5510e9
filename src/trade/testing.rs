//! In-memory backends for quoter and executor tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use alloy::primitives::{Address, B256, U256, address};
use async_trait::async_trait;

use super::backend::{AmmBackend, OrderBackend};
use super::cow::Order;
use super::types::{CowTrade, SwaprTrade, TradeRequest};
use crate::error::Error;
use crate::types::{Token, TransactionReceipt};
use crate::{GNOSIS, Result};

#[derive(Clone, Copy, Debug)]
pub(crate) enum Reply {
    Trade(U256),
    Empty,
    Fail,
}

pub(crate) fn collateral() -> Token {
    Token::new(
        address!("0xaf204776c7245bF4147c2612BF6e5972Ee483701"),
        18,
        "sDAI",
    )
}

pub(crate) fn outcome() -> Token {
    Token::new(
        address!("0x00000000000000000000000000000000000000aa"),
        18,
        "YES",
    )
}

pub(crate) fn wrapped_native() -> Token {
    Token::new(
        address!("0xe91D153E0b41518A2Ce8Dd3D7944Fa863463a97d"),
        18,
        "WXDAI",
    )
}

pub(crate) fn cow_trade(output_amount: U256) -> CowTrade {
    CowTrade {
        chain_id: GNOSIS,
        order: Order {
            buyAmount: output_amount,
            appData: B256::ZERO,
            ..Order::default()
        },
        output_amount,
        quote_id: Some(1),
        from: Address::ZERO,
        approve_address: Address::ZERO,
    }
}

pub(crate) fn swapr_trade(path: Vec<Address>, amount_out: U256) -> SwaprTrade {
    SwaprTrade {
        chain_id: GNOSIS,
        path,
        amount_in: U256::from(1),
        amount_out,
        amount_out_minimum: amount_out,
        recipient: Address::ZERO,
        fees: vec![100],
        approve_address: Address::ZERO,
    }
}

#[derive(Debug)]
pub(crate) struct FakeOrderBook {
    reply: Reply,
    pub quotes: AtomicUsize,
    pub requests: Mutex<Vec<TradeRequest>>,
    pub submitted: Mutex<Vec<CowTrade>>,
}

impl FakeOrderBook {
    pub(crate) fn new(reply: Reply) -> Self {
        Self {
            reply,
            quotes: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl OrderBackend for FakeOrderBook {
    async fn best_trade_exact_in(&self, request: &TradeRequest) -> Result<Option<CowTrade>> {
        self.quotes.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        match self.reply {
            Reply::Trade(amount) => Ok(Some(cow_trade(amount))),
            Reply::Empty => Ok(None),
            Reply::Fail => Err(Error::validation("order book unavailable")),
        }
    }

    async fn submit(&self, trade: &CowTrade) -> Result<String> {
        if matches!(self.reply, Reply::Fail) {
            return Err(Error::validation("order rejected"));
        }

        self.submitted.lock().unwrap().push(trade.clone());
        Ok("0xorder".to_owned())
    }
}

#[derive(Debug)]
pub(crate) struct FakeAmm {
    reply: Reply,
    pub quotes: AtomicUsize,
    pub paths: Mutex<Vec<Vec<Address>>>,
    pub executed: Mutex<Vec<(SwaprTrade, Address)>>,
}

impl FakeAmm {
    pub(crate) fn new(reply: Reply) -> Self {
        Self {
            reply,
            quotes: AtomicUsize::new(0),
            paths: Mutex::new(Vec::new()),
            executed: Mutex::new(Vec::new()),
        }
    }

    fn answer(&self, path: Vec<Address>) -> Result<Option<SwaprTrade>> {
        self.quotes.fetch_add(1, Ordering::SeqCst);

        match self.reply {
            Reply::Trade(amount) => Ok(Some(swapr_trade(path, amount))),
            Reply::Empty => Ok(None),
            Reply::Fail => Err(Error::transaction("execution reverted")),
        }
    }
}

#[async_trait]
impl AmmBackend for FakeAmm {
    async fn quote(&self, request: &TradeRequest) -> Result<Option<SwaprTrade>> {
        self.answer(vec![request.sell_token.address, request.buy_token.address])
    }

    async fn quote_with_path(
        &self,
        _request: &TradeRequest,
        path: &[Address],
    ) -> Result<Option<SwaprTrade>> {
        self.paths.lock().unwrap().push(path.to_vec());
        self.answer(path.to_vec())
    }

    async fn execute(&self, trade: &SwaprTrade, account: Address) -> Result<TransactionReceipt> {
        if matches!(self.reply, Reply::Fail) {
            return Err(Error::transaction("swap reverted"));
        }

        self.executed.lock().unwrap().push((trade.clone(), account));
        Ok(TransactionReceipt {
            transaction_hash: B256::repeat_byte(0x11),
            block_number: 42,
        })
    }
}
