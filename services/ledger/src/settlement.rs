//! Settlement planning and execution
//!
//! A binary market's YES share and NO share together are worth exactly one
//! unit of cash at resolution. Accepting a BUY order mints `amount` pairs:
//! the owner funds their side at `price`, the acceptor funds the opposite
//! side at `1 - price`. Accepting a SELL order moves existing shares of
//! `side` from owner to acceptor for `price * amount` cash.
//!
//! Cash legs are rounded to ledger precision. In a BUY the acceptor's
//! contribution is derived as `amount - owner's`, so the pair is always
//! funded by exactly `amount`.

use rust_decimal::Decimal;
use types::errors::LedgerError;
use types::holding::HoldingKey;
use types::ids::{MarketId, UserId};
use types::numeric::round_cash;
use types::order::{Order, OrderAction, Side};

use crate::txn::UnitOfWork;
use crate::{balances, holdings};

/// Signed movement for one party
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leg {
    /// Cash delta (negative = pays)
    pub cash: Decimal,
    /// Side whose shares move
    pub side: Side,
    /// Share delta (negative = gives up shares)
    pub shares: Decimal,
}

impl Leg {
    /// Cash this party must have on hand
    pub fn cash_required(&self) -> Decimal {
        (-self.cash).max(Decimal::ZERO)
    }

    /// Shares of `side` this party must have on hand
    pub fn shares_required(&self) -> Decimal {
        (-self.shares).max(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementPlan {
    pub owner: Leg,
    pub acceptor: Leg,
}

impl SettlementPlan {
    pub fn for_order(order: &Order) -> Self {
        match order.action {
            OrderAction::BUY => {
                let owner_cost = round_cash(order.price * order.amount);
                let acceptor_cost = order.amount - owner_cost;
                Self {
                    owner: Leg {
                        cash: -owner_cost,
                        side: order.side,
                        shares: order.amount,
                    },
                    acceptor: Leg {
                        cash: -acceptor_cost,
                        side: order.side.opposite(),
                        shares: order.amount,
                    },
                }
            }
            OrderAction::SELL => {
                let proceeds = round_cash(order.price * order.amount);
                Self {
                    owner: Leg {
                        cash: proceeds,
                        side: order.side,
                        shares: -order.amount,
                    },
                    acceptor: Leg {
                        cash: -proceeds,
                        side: order.side,
                        shares: order.amount,
                    },
                }
            }
        }
    }

    /// Net cash leaving both parties
    pub fn cash_out(&self) -> Decimal {
        -(self.owner.cash + self.acceptor.cash)
    }

    /// Net shares of each side created by the settlement (YES, NO)
    pub fn shares_minted(&self) -> (Decimal, Decimal) {
        let mut yes = Decimal::ZERO;
        let mut no = Decimal::ZERO;
        for leg in [self.owner, self.acceptor] {
            match leg.side {
                Side::YES => yes += leg.shares,
                Side::NO => no += leg.shares,
            }
        }
        (yes, no)
    }
}

/// Check that `user` could fund their leg right now, without staging writes.
pub async fn ensure_leg_fundable(
    uow: &mut UnitOfWork<'_>,
    user_id: &UserId,
    market_id: MarketId,
    leg: &Leg,
) -> Result<(), LedgerError> {
    if leg.cash_required() > Decimal::ZERO {
        balances::ensure_funds(uow, user_id, leg.cash_required()).await?;
    }
    if leg.shares_required() > Decimal::ZERO {
        let key = HoldingKey::new(user_id.clone(), market_id, leg.side);
        holdings::ensure_shares(uow, &key, leg.shares_required()).await?;
    }
    Ok(())
}

async fn apply_leg(
    uow: &mut UnitOfWork<'_>,
    user_id: &UserId,
    market_id: MarketId,
    leg: &Leg,
) -> Result<(), LedgerError> {
    balances::apply_delta(uow, user_id, leg.cash).await?;
    let key = HoldingKey::new(user_id.clone(), market_id, leg.side);
    holdings::apply_delta(uow, &key, leg.shares).await
}

/// Stage the settlement of `order` against `acceptor`.
///
/// Both parties are checked against the unit's current view before any
/// write is staged; any failure leaves the unit to be discarded.
pub async fn settle(
    uow: &mut UnitOfWork<'_>,
    order: &Order,
    acceptor: &UserId,
) -> Result<SettlementPlan, LedgerError> {
    let plan = SettlementPlan::for_order(order);

    ensure_leg_fundable(uow, acceptor, order.market_id, &plan.acceptor).await?;
    ensure_leg_fundable(uow, &order.owner_user_id, order.market_id, &plan.owner).await?;

    apply_leg(uow, acceptor, order.market_id, &plan.acceptor).await?;
    apply_leg(uow, &order.owner_user_id, order.market_id, &plan.owner).await?;
    Ok(plan)
}
