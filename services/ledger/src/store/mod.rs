//! Ledger Store: transactional key-document store interface
//!
//! Every document carries a version stamp. A [`Transaction`] pairs a read
//! set (`key -> version observed`, absence included) with a write set; a
//! commit applies all writes only if every read-set version is still
//! current, otherwise nothing is written and `StoreError::Conflict` is
//! returned.

pub mod memory;

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;
use types::errors::StoreError;
use types::holding::{Holding, HoldingKey};
use types::ids::{MarketId, OrderId, UserId};
use types::market::Market;
use types::order::{Order, OrderStatus};
use types::user::User;

pub use memory::MemoryStore;

/// Address of a document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocKey {
    User(UserId),
    Market(MarketId),
    Order(OrderId),
    Holding(HoldingKey),
}

impl fmt::Display for DocKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocKey::User(id) => write!(f, "user:{}", id),
            DocKey::Market(id) => write!(f, "market:{}", id),
            DocKey::Order(id) => write!(f, "order:{}", id),
            DocKey::Holding(key) => write!(f, "holding:{}", key),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    User(User),
    Market(Market),
    Order(Order),
    Holding(Holding),
}

impl Document {
    pub fn key(&self) -> DocKey {
        match self {
            Document::User(user) => DocKey::User(user.user_id.clone()),
            Document::Market(market) => DocKey::Market(market.market_id),
            Document::Order(order) => DocKey::Order(order.order_id),
            Document::Holding(holding) => DocKey::Holding(holding.key()),
        }
    }
}

/// A document together with its version stamp
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned {
    pub version: u64,
    pub document: Document,
}

/// Equality filters supported by [`LedgerStore::query`]
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    OrdersByMarket {
        market_id: MarketId,
        status: Option<OrderStatus>,
    },
    HoldingsByMarket(MarketId),
    HoldingsByUser(UserId),
}

impl Filter {
    pub fn matches(&self, document: &Document) -> bool {
        match (self, document) {
            (Filter::OrdersByMarket { market_id, status }, Document::Order(order)) => {
                order.market_id == *market_id && status.map_or(true, |s| order.status == s)
            }
            (Filter::HoldingsByMarket(market_id), Document::Holding(holding)) => {
                holding.market_id == *market_id
            }
            (Filter::HoldingsByUser(user_id), Document::Holding(holding)) => {
                holding.user_id == *user_id
            }
            _ => false,
        }
    }
}

/// Read set + write set submitted atomically
#[derive(Debug, Clone, Default)]
pub struct Transaction {
    /// Version each read observed; `None` means the document was absent
    pub reads: BTreeMap<DocKey, Option<u64>>,
    pub writes: BTreeMap<DocKey, Document>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the version observed for `key`. The first observation wins.
    pub fn expect(&mut self, key: DocKey, version: Option<u64>) {
        self.reads.entry(key).or_insert(version);
    }

    pub fn put(&mut self, document: Document) {
        self.writes.insert(document.key(), document);
    }

    pub fn is_read_only(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Document store with optimistic transactions
///
/// Implementations must make `commit` atomic and serializable with respect
/// to other commits touching the same keys. Writes whose key is absent
/// from the read set are applied unconditionally.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn get(&self, key: &DocKey) -> Result<Option<Versioned>, StoreError>;

    async fn query(&self, filter: &Filter) -> Result<Vec<Versioned>, StoreError>;

    async fn commit(&self, txn: Transaction) -> Result<(), StoreError>;
}
