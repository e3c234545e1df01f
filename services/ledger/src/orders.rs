//! Order Lifecycle Manager
//!
//! Places PENDING orders and moves them to ACCEPTED or CANCELLED. An
//! acceptance stages the settlement and the status change in the same unit
//! of work, guarded by the versions of every document it read (the order,
//! the market, both users and both holdings). At most one responder can
//! commit against a given PENDING version of an order.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;
use types::caller::Caller;
use types::errors::{LedgerError, MarketError, OrderError};
use types::ids::{MarketId, OrderId};
use types::market::Market;
use types::numeric::{validate_amount, validate_notional, validate_price};
use types::order::{Decision, Order, OrderAction, OrderStatus, Side};

use crate::config::LedgerConfig;
use crate::settlement::{self, SettlementPlan};
use crate::store::{DocKey, Document, Filter, LedgerStore};
use crate::txn::{transact, TxnBody, UnitOfWork};

/// Parameters of a new order
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub market_id: MarketId,
    pub side: Side,
    pub action: OrderAction,
    pub amount: Decimal,
    pub price: Decimal,
}

impl NewOrder {
    /// Range checks that need no reads
    pub fn validate(&self) -> Result<(), LedgerError> {
        validate_amount(self.amount)?;
        validate_price(self.price)?;
        validate_notional(self.amount, self.price)?;
        Ok(())
    }
}

/// Outcome of a successful response
#[derive(Debug, Clone, PartialEq)]
pub struct OrderResponse {
    pub order: Order,
    /// Present when the order was accepted
    pub settlement: Option<SettlementPlan>,
}

pub(crate) fn ensure_open(market: &Market) -> Result<(), LedgerError> {
    if !market.is_open() {
        return Err(MarketError::Closed {
            market_id: market.market_id.to_string(),
            status: market.status.to_string(),
        }
        .into());
    }
    Ok(())
}

struct PlaceOrder<'r> {
    caller: &'r Caller,
    request: &'r NewOrder,
}

#[async_trait]
impl TxnBody for PlaceOrder<'_> {
    type Output = Order;
    const NAME: &'static str = "place_order";

    async fn run(&self, uow: &mut UnitOfWork<'_>) -> Result<Order, LedgerError> {
        let market = uow.market(&self.request.market_id).await?;
        ensure_open(&market)?;

        let order = Order::new(
            self.caller.user_id.clone(),
            market.market_id,
            self.request.side,
            self.request.action,
            self.request.amount,
            self.request.price,
            Utc::now(),
        );

        // Advisory: nothing is reserved, acceptance re-checks against live state
        let plan = SettlementPlan::for_order(&order);
        settlement::ensure_leg_fundable(uow, &order.owner_user_id, order.market_id, &plan.owner)
            .await?;

        uow.stage(Document::Order(order.clone()));
        Ok(order)
    }
}

struct RespondToOrder<'r> {
    caller: &'r Caller,
    order_id: OrderId,
    decision: Decision,
}

#[async_trait]
impl TxnBody for RespondToOrder<'_> {
    type Output = OrderResponse;
    const NAME: &'static str = "respond_to_order";

    async fn run(&self, uow: &mut UnitOfWork<'_>) -> Result<OrderResponse, LedgerError> {
        let mut order = uow.order(&self.order_id).await?;
        if !order.is_pending() {
            return Err(OrderError::NotPending {
                order_id: order.order_id.to_string(),
                status: order.status.to_string(),
            }
            .into());
        }

        // Reading the market puts its version in the read set, so a
        // concurrent resolution fence invalidates this unit
        let market = uow.market(&order.market_id).await?;
        ensure_open(&market)?;

        let caller = &self.caller.user_id;
        let settlement = match self.decision {
            Decision::Cancel => {
                if *caller != order.owner_user_id {
                    return Err(OrderError::NotOwner {
                        order_id: order.order_id.to_string(),
                    }
                    .into());
                }
                order.cancel(Utc::now())?;
                None
            }
            Decision::Accept => {
                if *caller == order.owner_user_id {
                    return Err(OrderError::SelfAcceptance.into());
                }
                let plan = settlement::settle(uow, &order, caller).await?;
                order.accept(caller.clone(), Utc::now())?;
                Some(plan)
            }
        };

        uow.stage(Document::Order(order.clone()));
        Ok(OrderResponse { order, settlement })
    }
}

/// Order lifecycle service
#[derive(Clone)]
pub struct OrderManager {
    store: Arc<dyn LedgerStore>,
    config: LedgerConfig,
}

impl OrderManager {
    pub fn new(store: Arc<dyn LedgerStore>, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    /// Place a PENDING order owned by the caller.
    pub async fn create_order(&self, caller: &Caller, request: NewOrder) -> Result<Order, LedgerError> {
        request.validate()?;
        let order = transact(
            self.store.as_ref(),
            &self.config,
            &PlaceOrder {
                caller,
                request: &request,
            },
        )
        .await?;

        info!(
            order_id = %order.order_id,
            market_id = %order.market_id,
            owner = %order.owner_user_id,
            side = %order.side,
            action = %order.action,
            amount = %order.amount,
            price = %order.price,
            "order placed"
        );
        Ok(order)
    }

    /// Accept or cancel a PENDING order.
    ///
    /// A committed ACCEPT must not be retried by the caller; every error
    /// returned here left the ledger untouched.
    pub async fn respond(
        &self,
        caller: &Caller,
        order_id: OrderId,
        decision: Decision,
    ) -> Result<OrderResponse, LedgerError> {
        let response = transact(
            self.store.as_ref(),
            &self.config,
            &RespondToOrder {
                caller,
                order_id,
                decision,
            },
        )
        .await?;

        match decision {
            Decision::Accept => info!(
                order_id = %order_id,
                acceptor = %caller.user_id,
                "order accepted"
            ),
            Decision::Cancel => info!(order_id = %order_id, "order cancelled"),
        }
        Ok(response)
    }

    pub async fn get_order(&self, order_id: OrderId) -> Result<Order, LedgerError> {
        match self.store.get(&DocKey::Order(order_id)).await? {
            Some(versioned) => match versioned.document {
                Document::Order(order) => Ok(order),
                _ => Err(OrderError::NotFound {
                    order_id: order_id.to_string(),
                }
                .into()),
            },
            None => Err(OrderError::NotFound {
                order_id: order_id.to_string(),
            }
            .into()),
        }
    }

    /// Orders on a market, oldest first
    pub async fn list_orders(
        &self,
        market_id: MarketId,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, LedgerError> {
        let found = self
            .store
            .query(&Filter::OrdersByMarket { market_id, status })
            .await?;
        let mut orders: Vec<Order> = found
            .into_iter()
            .filter_map(|v| match v.document {
                Document::Order(order) => Some(order),
                _ => None,
            })
            .collect();
        orders.sort_by_key(|o| o.order_id);
        Ok(orders)
    }
}
