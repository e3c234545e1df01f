//! End-to-end settlement scenarios
//!
//! Each test drives the public engine surface and checks the exact
//! balances and holdings left behind.

mod common;

use common::{manager, Fixture};
use ledger::NewOrder;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use types::errors::ErrorKind;
use types::market::MarketStatus;
use types::order::{Decision, OrderAction, OrderStatus, Side};

fn order(fx: &Fixture, side: Side, action: OrderAction, amount: Decimal, price: Decimal) -> NewOrder {
    NewOrder {
        market_id: fx.market_id,
        side,
        action,
        amount,
        price,
    }
}

#[tokio::test]
async fn buy_accept_splits_cost_and_mints_both_sides() {
    let fx = Fixture::new().await;
    let u1 = fx.user("u1", dec!(100)).await;
    let u2 = fx.user("u2", dec!(100)).await;

    let placed = fx
        .engine
        .orders()
        .create_order(&u1, order(&fx, Side::YES, OrderAction::BUY, dec!(10), dec!(0.4)))
        .await
        .unwrap();
    // Placement reserves nothing
    assert_eq!(fx.balance(&u1).await, dec!(100));

    let response = fx
        .engine
        .orders()
        .respond(&u2, placed.order_id, Decision::Accept)
        .await
        .unwrap();
    assert_eq!(response.order.status, OrderStatus::Accepted);
    assert_eq!(response.order.acceptor_user_id, Some(u2.user_id.clone()));

    assert_eq!(fx.balance(&u1).await, dec!(96));
    assert_eq!(fx.shares(&u1, Side::YES).await, dec!(10));
    assert_eq!(fx.balance(&u2).await, dec!(94));
    assert_eq!(fx.shares(&u2, Side::NO).await, dec!(10));
    assert_eq!(fx.shares(&u2, Side::YES).await, Decimal::ZERO);

    let stored = fx.engine.orders().get_order(placed.order_id).await.unwrap();
    assert_eq!(stored.status, OrderStatus::Accepted);
    assert!(stored.last_change_at >= stored.placed_at);
}

#[tokio::test]
async fn sell_accept_moves_cash_to_owner_and_shares_to_acceptor() {
    let fx = Fixture::new().await;
    let u1 = fx.user("u1", dec!(0)).await;
    let u2 = fx.user("u2", dec!(100)).await;
    fx.give_shares(&u1, Side::YES, dec!(10)).await;

    let placed = fx
        .engine
        .orders()
        .create_order(&u1, order(&fx, Side::YES, OrderAction::SELL, dec!(5), dec!(0.6)))
        .await
        .unwrap();
    fx.engine
        .orders()
        .respond(&u2, placed.order_id, Decision::Accept)
        .await
        .unwrap();

    assert_eq!(fx.balance(&u2).await, dec!(97));
    assert_eq!(fx.shares(&u2, Side::YES).await, dec!(5));
    assert_eq!(fx.balance(&u1).await, dec!(3));
    assert_eq!(fx.shares(&u1, Side::YES).await, dec!(5));
}

#[tokio::test]
async fn resolution_pays_winners_and_cancels_pending() {
    let fx = Fixture::new().await;
    let u1 = fx.user("u1", dec!(20)).await;
    let u2 = fx.user("u2", dec!(20)).await;
    fx.give_shares(&u1, Side::YES, dec!(10)).await;
    fx.give_shares(&u2, Side::NO, dec!(10)).await;

    let pending = fx
        .engine
        .orders()
        .create_order(&u1, order(&fx, Side::NO, OrderAction::BUY, dec!(2), dec!(0.5)))
        .await
        .unwrap();

    let report = fx
        .engine
        .resolution()
        .resolve_market(&manager(), fx.market_id, Side::YES)
        .await
        .unwrap();
    assert_eq!(report.orders_cancelled, 1);
    assert_eq!(report.holdings_retired, 2);
    assert_eq!(report.holdings_paid, 1);
    assert_eq!(report.total_credited, dec!(10));

    let order = fx.engine.orders().get_order(pending.order_id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Cancelled);
    assert_eq!(fx.balance(&u1).await, dec!(30));
    assert_eq!(fx.balance(&u2).await, dec!(20));

    let market = fx.market().await;
    assert_eq!(market.status, MarketStatus::Closed);
    assert_eq!(market.result, Some(Side::YES));

    let holdings = fx.engine.holdings_for_market(fx.market_id).await.unwrap();
    assert!(holdings.iter().all(|h| h.resolved));
}

#[tokio::test]
async fn insufficient_acceptor_funds_leave_ledger_untouched() {
    let fx = Fixture::new().await;
    let u1 = fx.user("u1", dec!(100)).await;
    let u2 = fx.user("u2", dec!(1)).await;

    let placed = fx
        .engine
        .orders()
        .create_order(&u1, order(&fx, Side::YES, OrderAction::BUY, dec!(10), dec!(0.5)))
        .await
        .unwrap();
    let before = fx.store.len();

    let err = fx
        .engine
        .orders()
        .respond(&u2, placed.order_id, Decision::Accept)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Precondition);
    assert_eq!(err.code(), "INSUFFICIENT_BALANCE");
    assert!(!err.is_retryable());

    assert_eq!(fx.store.len(), before);
    assert_eq!(fx.balance(&u1).await, dec!(100));
    assert_eq!(fx.balance(&u2).await, dec!(1));
    assert_eq!(fx.shares(&u1, Side::YES).await, Decimal::ZERO);
    assert!(fx.engine.orders().get_order(placed.order_id).await.unwrap().is_pending());
}

#[tokio::test]
async fn owner_spending_elsewhere_fails_the_later_acceptance() {
    // Funds back several pending orders; the second acceptance finds them gone
    let fx = Fixture::new().await;
    let u1 = fx.user("u1", dec!(5)).await;
    let u2 = fx.user("u2", dec!(100)).await;

    let first = fx
        .engine
        .orders()
        .create_order(&u1, order(&fx, Side::YES, OrderAction::BUY, dec!(10), dec!(0.5)))
        .await
        .unwrap();
    let second = fx
        .engine
        .orders()
        .create_order(&u1, order(&fx, Side::NO, OrderAction::BUY, dec!(10), dec!(0.5)))
        .await
        .unwrap();

    fx.engine
        .orders()
        .respond(&u2, first.order_id, Decision::Accept)
        .await
        .unwrap();
    let err = fx
        .engine
        .orders()
        .respond(&u2, second.order_id, Decision::Accept)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "INSUFFICIENT_BALANCE");
    assert_eq!(fx.balance(&u1).await, Decimal::ZERO);
    assert_eq!(fx.balance(&u2).await, dec!(95));
}

#[tokio::test]
async fn closed_market_rejects_orders_and_responses() {
    let fx = Fixture::new().await;
    let u1 = fx.user("u1", dec!(100)).await;
    let u2 = fx.user("u2", dec!(100)).await;
    let placed = fx
        .engine
        .orders()
        .create_order(&u1, order(&fx, Side::YES, OrderAction::BUY, dec!(1), dec!(0.5)))
        .await
        .unwrap();

    fx.engine
        .resolution()
        .resolve_market(&manager(), fx.market_id, Side::NO)
        .await
        .unwrap();

    let err = fx
        .engine
        .orders()
        .create_order(&u1, order(&fx, Side::YES, OrderAction::BUY, dec!(1), dec!(0.5)))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "MARKET_CLOSED");

    // Resolution already cancelled it
    let err = fx
        .engine
        .orders()
        .respond(&u2, placed.order_id, Decision::Accept)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "ORDER_NOT_PENDING");
}

#[tokio::test]
async fn list_orders_filters_by_status() {
    let fx = Fixture::new().await;
    let u1 = fx.user("u1", dec!(100)).await;
    let u2 = fx.user("u2", dec!(100)).await;

    let mut ids = Vec::new();
    for _ in 0..3 {
        let placed = fx
            .engine
            .orders()
            .create_order(&u1, order(&fx, Side::YES, OrderAction::BUY, dec!(1), dec!(0.5)))
            .await
            .unwrap();
        ids.push(placed.order_id);
    }
    fx.engine.orders().respond(&u2, ids[0], Decision::Accept).await.unwrap();
    fx.engine.orders().respond(&u1, ids[1], Decision::Cancel).await.unwrap();

    let orders = fx.engine.orders();
    assert_eq!(orders.list_orders(fx.market_id, None).await.unwrap().len(), 3);
    let pending = orders
        .list_orders(fx.market_id, Some(OrderStatus::Pending))
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].order_id, ids[2]);
    let accepted = orders
        .list_orders(fx.market_id, Some(OrderStatus::Accepted))
        .await
        .unwrap();
    assert_eq!(accepted[0].order_id, ids[0]);
}
