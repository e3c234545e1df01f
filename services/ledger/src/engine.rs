//! Ledger engine: orchestrator over the ledger services
//!
//! Ties together order lifecycle, resolution, provisioning, and the read
//! queries over a single store.

use std::sync::Arc;
use types::errors::{AccountError, LedgerError, MarketError};
use types::holding::Holding;
use types::ids::{MarketId, UserId};
use types::market::Market;
use types::user::User;

use crate::config::LedgerConfig;
use crate::orders::OrderManager;
use crate::provisioning::Provisioner;
use crate::resolution::ResolutionEngine;
use crate::store::{DocKey, Document, Filter, LedgerStore};

#[derive(Clone)]
pub struct LedgerEngine {
    store: Arc<dyn LedgerStore>,
    orders: OrderManager,
    resolution: ResolutionEngine,
    provisioning: Provisioner,
}

impl LedgerEngine {
    /// Create an engine with default configuration
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self::with_config(store, LedgerConfig::default())
    }

    pub fn with_config(store: Arc<dyn LedgerStore>, config: LedgerConfig) -> Self {
        Self {
            orders: OrderManager::new(store.clone(), config.clone()),
            resolution: ResolutionEngine::new(store.clone(), config.clone()),
            provisioning: Provisioner::new(store.clone(), config),
            store,
        }
    }

    pub fn orders(&self) -> &OrderManager {
        &self.orders
    }

    pub fn resolution(&self) -> &ResolutionEngine {
        &self.resolution
    }

    pub fn provisioning(&self) -> &Provisioner {
        &self.provisioning
    }

    pub async fn get_market(&self, market_id: MarketId) -> Result<Market, LedgerError> {
        match self.store.get(&DocKey::Market(market_id)).await? {
            Some(versioned) => match versioned.document {
                Document::Market(market) => Ok(market),
                _ => Err(MarketError::NotFound {
                    market_id: market_id.to_string(),
                }
                .into()),
            },
            None => Err(MarketError::NotFound {
                market_id: market_id.to_string(),
            }
            .into()),
        }
    }

    pub async fn get_user(&self, user_id: &UserId) -> Result<User, LedgerError> {
        match self.store.get(&DocKey::User(user_id.clone())).await? {
            Some(versioned) => match versioned.document {
                Document::User(user) => Ok(user),
                _ => Err(AccountError::UserNotFound {
                    user_id: user_id.to_string(),
                }
                .into()),
            },
            None => Err(AccountError::UserNotFound {
                user_id: user_id.to_string(),
            }
            .into()),
        }
    }

    pub async fn holdings_for_user(&self, user_id: &UserId) -> Result<Vec<Holding>, LedgerError> {
        let found = self.store.query(&Filter::HoldingsByUser(user_id.clone())).await?;
        Ok(found
            .into_iter()
            .filter_map(|v| match v.document {
                Document::Holding(holding) => Some(holding),
                _ => None,
            })
            .collect())
    }

    pub async fn holdings_for_market(&self, market_id: MarketId) -> Result<Vec<Holding>, LedgerError> {
        let found = self.store.query(&Filter::HoldingsByMarket(market_id)).await?;
        Ok(found
            .into_iter()
            .filter_map(|v| match v.document {
                Document::Holding(holding) => Some(holding),
                _ => None,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{Duration, Utc};
    use rust_decimal_macros::dec;
    use types::caller::{Caller, Role};

    #[tokio::test]
    async fn test_queries_after_provisioning() {
        let engine = LedgerEngine::new(Arc::new(MemoryStore::new()));
        let manager = Caller::new(UserId::new("m")).with_role(Role::MarketManager);
        let market = engine
            .provisioning()
            .open_market(&manager, "Q", Utc::now() + Duration::hours(1))
            .await
            .unwrap();
        engine
            .provisioning()
            .register_user(UserId::new("u1"), dec!(50))
            .await
            .unwrap();

        assert_eq!(engine.get_market(market.market_id).await.unwrap(), market);
        assert_eq!(engine.get_user(&UserId::new("u1")).await.unwrap().balance, dec!(50));
        assert!(engine.holdings_for_user(&UserId::new("u1")).await.unwrap().is_empty());
        assert_eq!(
            engine.get_user(&UserId::new("nobody")).await.unwrap_err().code(),
            "USER_NOT_FOUND"
        );
        assert_eq!(
            engine.get_market(MarketId::new()).await.unwrap_err().code(),
            "MARKET_NOT_FOUND"
        );
    }
}
