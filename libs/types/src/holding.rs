//! Share holding types
//!
//! A holding is keyed by (user, market, side) and is never deleted. It may
//! reach zero, and once resolved it is inert.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::{MarketId, UserId};
use crate::order::Side;

/// Unique key of a holding
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HoldingKey {
    pub user_id: UserId,
    pub market_id: MarketId,
    pub side: Side,
}

impl HoldingKey {
    pub fn new(user_id: UserId, market_id: MarketId, side: Side) -> Self {
        Self {
            user_id,
            market_id,
            side,
        }
    }
}

impl fmt::Display for HoldingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.user_id, self.market_id, self.side)
    }
}

/// Holding document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub user_id: UserId,
    pub market_id: MarketId,
    pub side: Side,
    /// Shares of `side` owned; never negative
    pub amount: Decimal,
    /// Set once the holding has been liquidated by market resolution
    pub resolved: bool,
}

impl Holding {
    /// Empty holding for a key that has no document yet
    pub fn empty(key: &HoldingKey) -> Self {
        Self {
            user_id: key.user_id.clone(),
            market_id: key.market_id,
            side: key.side,
            amount: Decimal::ZERO,
            resolved: false,
        }
    }

    pub fn key(&self) -> HoldingKey {
        HoldingKey::new(self.user_id.clone(), self.market_id, self.side)
    }

    /// Cash paid out for this holding if the market resolves to `result`
    pub fn payout(&self, result: Side) -> Decimal {
        if self.side == result {
            self.amount
        } else {
            Decimal::ZERO
        }
    }
}
