//! Units of work and the optimistic retry loop
//!
//! A [`UnitOfWork`] reads documents through the store, remembering the
//! version of each one, and stages writes locally. Nothing reaches the
//! store until [`UnitOfWork::commit`], which submits the full read set so
//! that every precondition checked during the unit is re-validated at
//! commit time.

use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{debug, warn};
use types::errors::{AccountError, LedgerError, MarketError, OrderError, StoreError};
use types::holding::{Holding, HoldingKey};
use types::ids::{MarketId, OrderId, UserId};
use types::market::Market;
use types::order::Order;
use types::user::User;

use crate::config::LedgerConfig;
use crate::store::{DocKey, Document, LedgerStore, Transaction};

pub struct UnitOfWork<'a> {
    store: &'a dyn LedgerStore,
    txn: Transaction,
    /// Latest view of every key touched: read value overlaid by staged writes
    view: HashMap<DocKey, Option<Document>>,
}

impl<'a> UnitOfWork<'a> {
    pub fn begin(store: &'a dyn LedgerStore) -> Self {
        Self {
            store,
            txn: Transaction::new(),
            view: HashMap::new(),
        }
    }

    async fn load(&mut self, key: DocKey) -> Result<Option<Document>, StoreError> {
        if let Some(document) = self.view.get(&key) {
            return Ok(document.clone());
        }
        let found = self.store.get(&key).await?;
        self.txn.expect(key.clone(), found.as_ref().map(|v| v.version));
        let document = found.map(|v| v.document);
        self.view.insert(key, document.clone());
        Ok(document)
    }

    pub async fn find_user(&mut self, user_id: &UserId) -> Result<Option<User>, LedgerError> {
        let key = DocKey::User(user_id.clone());
        match self.load(key.clone()).await? {
            None => Ok(None),
            Some(Document::User(user)) => Ok(Some(user)),
            Some(_) => Err(mismatch(&key)),
        }
    }

    pub async fn user(&mut self, user_id: &UserId) -> Result<User, LedgerError> {
        self.find_user(user_id).await?.ok_or_else(|| {
            AccountError::UserNotFound {
                user_id: user_id.to_string(),
            }
            .into()
        })
    }

    pub async fn market(&mut self, market_id: &MarketId) -> Result<Market, LedgerError> {
        let key = DocKey::Market(*market_id);
        match self.load(key.clone()).await? {
            Some(Document::Market(market)) => Ok(market),
            None => Err(MarketError::NotFound {
                market_id: market_id.to_string(),
            }
            .into()),
            Some(_) => Err(mismatch(&key)),
        }
    }

    pub async fn order(&mut self, order_id: &OrderId) -> Result<Order, LedgerError> {
        let key = DocKey::Order(*order_id);
        match self.load(key.clone()).await? {
            Some(Document::Order(order)) => Ok(order),
            None => Err(OrderError::NotFound {
                order_id: order_id.to_string(),
            }
            .into()),
            Some(_) => Err(mismatch(&key)),
        }
    }

    /// Holding for `key`; an absent document reads as an empty holding
    pub async fn holding(&mut self, key: &HoldingKey) -> Result<Holding, LedgerError> {
        let doc_key = DocKey::Holding(key.clone());
        match self.load(doc_key.clone()).await? {
            Some(Document::Holding(holding)) => Ok(holding),
            None => Ok(Holding::empty(key)),
            Some(_) => Err(mismatch(&doc_key)),
        }
    }

    /// Stage a write. Inserting a key never read records it as expected-absent.
    pub fn stage(&mut self, document: Document) {
        let key = document.key();
        if !self.view.contains_key(&key) {
            self.txn.expect(key.clone(), None);
        }
        self.view.insert(key, Some(document.clone()));
        self.txn.put(document);
    }

    pub async fn commit(self) -> Result<(), StoreError> {
        if self.txn.is_read_only() {
            return Ok(());
        }
        debug!(
            reads = self.txn.reads.len(),
            writes = self.txn.writes.len(),
            "committing unit of work"
        );
        self.store.commit(self.txn).await
    }
}

fn mismatch(key: &DocKey) -> LedgerError {
    StoreError::Unavailable(format!("document type mismatch for {}", key)).into()
}

/// One attempt of an operation, re-run from scratch after a conflict
#[async_trait]
pub trait TxnBody: Send + Sync {
    type Output: Send;

    /// Operation name for logs
    const NAME: &'static str;

    async fn run(&self, uow: &mut UnitOfWork<'_>) -> Result<Self::Output, LedgerError>;
}

/// Run `body` until it commits, fails a precondition, or exhausts retries.
pub async fn transact<B: TxnBody>(
    store: &dyn LedgerStore,
    config: &LedgerConfig,
    body: &B,
) -> Result<B::Output, LedgerError> {
    let mut attempt = 1;
    loop {
        let mut uow = UnitOfWork::begin(store);
        let output = body.run(&mut uow).await?;
        match uow.commit().await {
            Ok(()) => return Ok(output),
            Err(StoreError::Conflict { key }) if attempt < config.max_commit_attempts => {
                warn!(op = B::NAME, %key, attempt, "commit conflict, retrying");
                tokio::time::sleep(config.backoff_for(attempt)).await;
                attempt += 1;
            }
            Err(err) => {
                warn!(op = B::NAME, attempt, error = %err, "commit failed");
                return Err(err.into());
            }
        }
    }
}
