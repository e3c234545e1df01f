//! Market Resolution Engine
//!
//! Resolution runs in four committed steps:
//! 1. fence: the market moves OPEN -> RESOLVING with its result recorded.
//!    Every placement and settlement holds the market version in its read
//!    set, so none can commit on this market afterwards.
//! 2. every PENDING order is cancelled.
//! 3. every unresolved holding is retired, crediting its owner one unit of
//!    cash per winning share. The `resolved` flag flips in the same commit
//!    as the credit, so a holding pays out at most once.
//! 4. the market moves to CLOSED.
//!
//! Each step is idempotent. If a run stops part way (store outage, crash),
//! calling `resolve_market` again with the same result resumes it.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};
use types::caller::{Caller, Role};
use types::errors::{LedgerError, MarketError};
use types::holding::HoldingKey;
use types::ids::{MarketId, OrderId};
use types::market::{Market, MarketStatus};
use types::order::{OrderStatus, Side};

use crate::balances;
use crate::config::LedgerConfig;
use crate::store::{Document, Filter, LedgerStore};
use crate::txn::{transact, TxnBody, UnitOfWork};

/// Work done by one `resolve_market` call
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionReport {
    pub market: Market,
    pub orders_cancelled: usize,
    pub holdings_retired: usize,
    pub holdings_paid: usize,
    pub total_credited: Decimal,
}

struct FenceMarket {
    market_id: MarketId,
    result: Side,
}

#[async_trait]
impl TxnBody for FenceMarket {
    type Output = Market;
    const NAME: &'static str = "fence_market";

    async fn run(&self, uow: &mut UnitOfWork<'_>) -> Result<Market, LedgerError> {
        let mut market = uow.market(&self.market_id).await?;
        match (market.status, market.result) {
            (MarketStatus::Open, _) => {
                market.begin_resolution(self.result);
                uow.stage(Document::Market(market.clone()));
            }
            (MarketStatus::Resolving, Some(result)) if result == self.result => {
                debug!(market_id = %self.market_id, "resuming resolution");
            }
            (MarketStatus::Resolving, result) => {
                return Err(MarketError::ResolutionInProgress {
                    market_id: self.market_id.to_string(),
                    result: result.map_or_else(|| "unknown".to_string(), |r| r.to_string()),
                }
                .into());
            }
            (MarketStatus::Closed, _) => {
                return Err(MarketError::AlreadyClosed {
                    market_id: self.market_id.to_string(),
                }
                .into());
            }
        }
        Ok(market)
    }
}

struct CancelPending {
    order_id: OrderId,
}

#[async_trait]
impl TxnBody for CancelPending {
    type Output = bool;
    const NAME: &'static str = "cancel_pending";

    async fn run(&self, uow: &mut UnitOfWork<'_>) -> Result<bool, LedgerError> {
        let mut order = uow.order(&self.order_id).await?;
        if !order.is_pending() {
            // Settled before the fence, or swept by a concurrent resolver
            return Ok(false);
        }
        order.cancel(Utc::now())?;
        uow.stage(Document::Order(order));
        Ok(true)
    }
}

struct LiquidateHolding {
    key: HoldingKey,
    result: Side,
}

#[async_trait]
impl TxnBody for LiquidateHolding {
    type Output = Option<Decimal>;
    const NAME: &'static str = "liquidate_holding";

    async fn run(&self, uow: &mut UnitOfWork<'_>) -> Result<Option<Decimal>, LedgerError> {
        let mut holding = uow.holding(&self.key).await?;
        if holding.resolved {
            return Ok(None);
        }
        let payout = holding.payout(self.result);
        holding.resolved = true;
        uow.stage(Document::Holding(holding));
        if payout > Decimal::ZERO {
            balances::credit(uow, &self.key.user_id, payout).await?;
        }
        Ok(Some(payout))
    }
}

struct CloseMarket {
    market_id: MarketId,
}

#[async_trait]
impl TxnBody for CloseMarket {
    type Output = Market;
    const NAME: &'static str = "close_market";

    async fn run(&self, uow: &mut UnitOfWork<'_>) -> Result<Market, LedgerError> {
        let mut market = uow.market(&self.market_id).await?;
        if market.status != MarketStatus::Closed {
            market.close(Utc::now());
            uow.stage(Document::Market(market.clone()));
        }
        Ok(market)
    }
}

/// Market resolution service
#[derive(Clone)]
pub struct ResolutionEngine {
    store: Arc<dyn LedgerStore>,
    config: LedgerConfig,
}

impl ResolutionEngine {
    pub fn new(store: Arc<dyn LedgerStore>, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    /// Resolve `market_id` to `result`, liquidating every holding.
    pub async fn resolve_market(
        &self,
        caller: &Caller,
        market_id: MarketId,
        result: Side,
    ) -> Result<ResolutionReport, LedgerError> {
        caller.require_role(Role::MarketManager)?;
        let store = self.store.as_ref();

        transact(store, &self.config, &FenceMarket { market_id, result }).await?;
        info!(%market_id, %result, "market fenced for resolution");

        let orders_cancelled = self.cancel_pending_orders(market_id).await?;

        let mut holdings_retired = 0;
        let mut holdings_paid = 0;
        let mut total_credited = Decimal::ZERO;
        let holdings = store.query(&Filter::HoldingsByMarket(market_id)).await?;
        for versioned in holdings {
            let key = match versioned.document {
                Document::Holding(holding) if !holding.resolved => holding.key(),
                _ => continue,
            };
            let liquidated = transact(store, &self.config, &LiquidateHolding { key, result }).await?;
            if let Some(payout) = liquidated {
                holdings_retired += 1;
                if payout > Decimal::ZERO {
                    holdings_paid += 1;
                    total_credited += payout;
                }
            }
        }

        let market = transact(store, &self.config, &CloseMarket { market_id }).await?;
        info!(
            %market_id,
            %result,
            orders_cancelled,
            holdings_retired,
            %total_credited,
            "market closed"
        );

        Ok(ResolutionReport {
            market,
            orders_cancelled,
            holdings_retired,
            holdings_paid,
            total_credited,
        })
    }

    async fn cancel_pending_orders(&self, market_id: MarketId) -> Result<usize, LedgerError> {
        let store = self.store.as_ref();
        let pending = store
            .query(&Filter::OrdersByMarket {
                market_id,
                status: Some(OrderStatus::Pending),
            })
            .await?;

        let mut cancelled = 0;
        for versioned in pending {
            let order_id = match versioned.document {
                Document::Order(order) => order.order_id,
                _ => continue,
            };
            if transact(store, &self.config, &CancelPending { order_id }).await? {
                cancelled += 1;
            }
        }
        Ok(cancelled)
    }
}
