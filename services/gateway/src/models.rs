use chrono::{DateTime, Utc};
use ledger::resolution::ResolutionReport;
use ledger::settlement::{Leg, SettlementPlan};
use ledger::OrderResponse;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::holding::Holding;
use types::ids::{MarketId, OrderId, UserId};
use types::market::{Market, MarketStatus};
use types::order::{Order, OrderAction, OrderStatus, Side};
use types::user::User;

// Side, action and decision arrive as strings so that bad values surface
// as ledger validation errors instead of extractor rejections.

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub market_id: MarketId,
    pub side: String,
    pub action: String,
    pub amount: Decimal,
    pub price: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RespondRequest {
    pub decision: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMarketRequest {
    pub title: String,
    pub close_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolveMarketRequest {
    pub result: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListOrdersQuery {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub order_id: OrderId,
    pub market_id: MarketId,
    pub side: Side,
    pub action: OrderAction,
    pub amount: Decimal,
    pub price: Decimal,
    pub owner_user_id: UserId,
    pub acceptor_user_id: Option<UserId>,
    pub placed_at: DateTime<Utc>,
    pub last_change_at: DateTime<Utc>,
    pub status: OrderStatus,
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.order_id,
            market_id: order.market_id,
            side: order.side,
            action: order.action,
            amount: order.amount,
            price: order.price,
            owner_user_id: order.owner_user_id,
            acceptor_user_id: order.acceptor_user_id,
            placed_at: order.placed_at,
            last_change_at: order.last_change_at,
            status: order.status,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LegView {
    pub cash: Decimal,
    pub side: Side,
    pub shares: Decimal,
}

impl From<Leg> for LegView {
    fn from(leg: Leg) -> Self {
        Self {
            cash: leg.cash,
            side: leg.side,
            shares: leg.shares,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SettlementView {
    pub owner: LegView,
    pub acceptor: LegView,
}

impl From<SettlementPlan> for SettlementView {
    fn from(plan: SettlementPlan) -> Self {
        Self {
            owner: plan.owner.into(),
            acceptor: plan.acceptor.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RespondView {
    pub order: OrderView,
    pub settlement: Option<SettlementView>,
}

impl From<OrderResponse> for RespondView {
    fn from(response: OrderResponse) -> Self {
        Self {
            order: response.order.into(),
            settlement: response.settlement.map(Into::into),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketView {
    pub market_id: MarketId,
    pub title: String,
    pub open_date: DateTime<Utc>,
    pub close_date: DateTime<Utc>,
    pub status: MarketStatus,
    pub result: Option<Side>,
}

impl From<Market> for MarketView {
    fn from(market: Market) -> Self {
        Self {
            market_id: market.market_id,
            title: market.title,
            open_date: market.open_date,
            close_date: market.close_date,
            status: market.status,
            result: market.result,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionView {
    pub market: MarketView,
    pub orders_cancelled: usize,
    pub holdings_retired: usize,
    pub holdings_paid: usize,
    pub total_credited: Decimal,
}

impl From<ResolutionReport> for ResolutionView {
    fn from(report: ResolutionReport) -> Self {
        Self {
            market: report.market.into(),
            orders_cancelled: report.orders_cancelled,
            holdings_retired: report.holdings_retired,
            holdings_paid: report.holdings_paid,
            total_credited: report.total_credited,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingView {
    pub market_id: MarketId,
    pub side: Side,
    pub amount: Decimal,
    pub resolved: bool,
}

impl From<Holding> for HoldingView {
    fn from(holding: Holding) -> Self {
        Self {
            market_id: holding.market_id,
            side: holding.side,
            amount: holding.amount,
            resolved: holding.resolved,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub user_id: UserId,
    pub balance: Decimal,
    pub holdings: Vec<HoldingView>,
}

impl UserView {
    pub fn new(user: User, holdings: Vec<Holding>) -> Self {
        Self {
            user_id: user.user_id,
            balance: user.balance,
            holdings: holdings.into_iter().map(Into::into).collect(),
        }
    }
}
