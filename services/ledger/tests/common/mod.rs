//! Shared fixtures for ledger integration tests

#![allow(dead_code)]

use chrono::{Duration, Utc};
use ledger::store::{DocKey, Document, Transaction};
use ledger::{LedgerEngine, LedgerStore, MemoryStore};
use rust_decimal::Decimal;
use std::sync::Arc;
use types::caller::{Caller, Role};
use types::holding::{Holding, HoldingKey};
use types::ids::{MarketId, UserId};
use types::market::Market;
use types::order::Side;
use types::user::User;

pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub engine: LedgerEngine,
    pub market_id: MarketId,
}

impl Fixture {
    pub async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::with_store(store.clone(), store).await
    }

    /// Seed through `seed`, run the engine against `backend`
    pub async fn with_store(seed: Arc<MemoryStore>, backend: Arc<dyn LedgerStore>) -> Self {
        let now = Utc::now();
        let market = Market::new("Will it rain tomorrow?", now, now + Duration::days(1));
        let market_id = market.market_id;
        let mut txn = Transaction::new();
        txn.put(Document::Market(market));
        seed.commit(txn).await.unwrap();

        Self {
            store: seed,
            engine: LedgerEngine::new(backend),
            market_id,
        }
    }

    pub async fn user(&self, name: &str, balance: Decimal) -> Caller {
        let user_id = UserId::new(name);
        let mut txn = Transaction::new();
        txn.put(Document::User(User::new(user_id.clone(), balance)));
        self.store.commit(txn).await.unwrap();
        Caller::new(user_id)
    }

    pub async fn give_shares(&self, user: &Caller, side: Side, amount: Decimal) {
        let key = HoldingKey::new(user.user_id.clone(), self.market_id, side);
        let mut holding = Holding::empty(&key);
        holding.amount = amount;
        let mut txn = Transaction::new();
        txn.put(Document::Holding(holding));
        self.store.commit(txn).await.unwrap();
    }

    pub async fn balance(&self, user: &Caller) -> Decimal {
        self.engine.get_user(&user.user_id).await.unwrap().balance
    }

    pub async fn shares(&self, user: &Caller, side: Side) -> Decimal {
        let key = HoldingKey::new(user.user_id.clone(), self.market_id, side);
        match self.store.get(&DocKey::Holding(key)).await.unwrap() {
            Some(versioned) => match versioned.document {
                Document::Holding(holding) => holding.amount,
                other => panic!("unexpected document {:?}", other),
            },
            None => Decimal::ZERO,
        }
    }

    pub async fn market(&self) -> Market {
        self.engine.get_market(self.market_id).await.unwrap()
    }
}

pub fn manager() -> Caller {
    Caller::new(UserId::new("manager")).with_role(Role::MarketManager)
}
