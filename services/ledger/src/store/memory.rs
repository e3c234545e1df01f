//! In-process ledger store enforcing optimistic version checks.
//!
//! The lock is only ever held inside a synchronous section, never across
//! an await point.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use types::errors::StoreError;

use super::{DocKey, Filter, LedgerStore, Transaction, Versioned};

#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<DocKey, Versioned>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    /// Current version of a document, if present
    pub fn version_of(&self, key: &DocKey) -> Option<u64> {
        self.documents.read().get(key).map(|v| v.version)
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn get(&self, key: &DocKey) -> Result<Option<Versioned>, StoreError> {
        Ok(self.documents.read().get(key).cloned())
    }

    async fn query(&self, filter: &Filter) -> Result<Vec<Versioned>, StoreError> {
        let documents = self.documents.read();
        let mut matches: Vec<Versioned> = documents
            .values()
            .filter(|v| filter.matches(&v.document))
            .cloned()
            .collect();
        // HashMap iteration order is arbitrary; keep results stable
        matches.sort_by_key(|v| v.document.key());
        Ok(matches)
    }

    async fn commit(&self, txn: Transaction) -> Result<(), StoreError> {
        let mut documents = self.documents.write();

        // Validate the whole read set before touching anything
        for (key, expected) in &txn.reads {
            let current = documents.get(key).map(|v| v.version);
            if current != *expected {
                return Err(StoreError::Conflict {
                    key: key.to_string(),
                });
            }
        }

        for (key, document) in txn.writes {
            let version = documents.get(&key).map_or(1, |v| v.version + 1);
            documents.insert(key, Versioned { version, document });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Document;
    use rust_decimal::Decimal;
    use types::ids::UserId;
    use types::user::User;

    fn user_doc(id: &str, balance: i64) -> Document {
        Document::User(User::new(UserId::new(id), Decimal::from(balance)))
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = MemoryStore::new();
        let mut txn = Transaction::new();
        txn.expect(DocKey::User(UserId::new("u1")), None);
        txn.put(user_doc("u1", 100));
        store.commit(txn).await.unwrap();

        let found = store.get(&DocKey::User(UserId::new("u1"))).await.unwrap().unwrap();
        assert_eq!(found.version, 1);
        assert_eq!(found.document, user_doc("u1", 100));
    }

    #[tokio::test]
    async fn test_insert_conflicts_when_document_exists() {
        let store = MemoryStore::new();
        let key = DocKey::User(UserId::new("u1"));
        for expected_ok in [true, false] {
            let mut txn = Transaction::new();
            txn.expect(key.clone(), None);
            txn.put(user_doc("u1", 100));
            assert_eq!(store.commit(txn).await.is_ok(), expected_ok);
        }
    }

    #[tokio::test]
    async fn test_stale_read_set_rejects_all_writes() {
        let store = MemoryStore::new();
        let mut seed = Transaction::new();
        seed.put(user_doc("u1", 100));
        seed.put(user_doc("u2", 100));
        store.commit(seed).await.unwrap();

        let k1 = DocKey::User(UserId::new("u1"));
        let k2 = DocKey::User(UserId::new("u2"));

        // Two writers observe version 1 of u1
        let mut first = Transaction::new();
        first.expect(k1.clone(), Some(1));
        first.put(user_doc("u1", 50));

        let mut second = Transaction::new();
        second.expect(k1.clone(), Some(1));
        second.expect(k2.clone(), Some(1));
        second.put(user_doc("u1", 0));
        second.put(user_doc("u2", 200));

        store.commit(first).await.unwrap();
        let err = store.commit(second).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));

        // u2 untouched by the failed commit
        assert_eq!(store.version_of(&k2), Some(1));
        assert_eq!(store.version_of(&k1), Some(2));
        let u1 = store.get(&k1).await.unwrap().unwrap();
        assert_eq!(u1.document, user_doc("u1", 50));
    }

    #[tokio::test]
    async fn test_query_filters_documents() {
        let store = MemoryStore::new();
        let mut seed = Transaction::new();
        seed.put(user_doc("u1", 1));
        store.commit(seed).await.unwrap();

        let market = types::ids::MarketId::new();
        let found = store.query(&Filter::HoldingsByMarket(market)).await.unwrap();
        assert!(found.is_empty());
        assert_eq!(store.len(), 1);
    }
}
