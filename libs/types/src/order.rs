//! Order lifecycle types
//!
//! An order is a standing offer on one side of a binary market. It is
//! accepted whole by a single counterparty or cancelled by its owner;
//! both outcomes are terminal.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{OrderError, ValidationError};
use crate::ids::{MarketId, OrderId, UserId};

/// Outcome side of a binary market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    YES,
    NO,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::YES => Side::NO,
            Side::NO => Side::YES,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::YES => f.write_str("YES"),
            Side::NO => f.write_str("NO"),
        }
    }
}

impl FromStr for Side {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "YES" => Ok(Side::YES),
            "NO" => Ok(Side::NO),
            _ => Err(ValidationError::InvalidSide(s.to_string())),
        }
    }
}

/// Whether accepting the order makes its owner a buyer or a seller of `side`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderAction {
    BUY,
    SELL,
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderAction::BUY => f.write_str("BUY"),
            OrderAction::SELL => f.write_str("SELL"),
        }
    }
}

impl FromStr for OrderAction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(OrderAction::BUY),
            "SELL" => Ok(OrderAction::SELL),
            _ => Err(ValidationError::InvalidAction(s.to_string())),
        }
    }
}

/// Order status
///
/// `Accepted` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "PENDING")]
    Pending,

    #[serde(rename = "ACCEPTED")]
    Accepted,

    #[serde(rename = "CANCELLED")]
    Cancelled,
}

impl OrderStatus {
    /// Check if status is terminal (no further transitions possible)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => f.write_str("PENDING"),
            OrderStatus::Accepted => f.write_str("ACCEPTED"),
            OrderStatus::Cancelled => f.write_str("CANCELLED"),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(OrderStatus::Pending),
            "ACCEPTED" => Ok(OrderStatus::Accepted),
            "CANCELLED" | "CANCELED" => Ok(OrderStatus::Cancelled),
            _ => Err(ValidationError::InvalidStatus(s.to_string())),
        }
    }
}

/// A counterparty's (or the owner's) response to a pending order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Accept,
    Cancel,
}

impl FromStr for Decision {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACCEPT" => Ok(Decision::Accept),
            "CANCEL" => Ok(Decision::Cancel),
            _ => Err(ValidationError::InvalidDecision(s.to_string())),
        }
    }
}

/// Order document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub market_id: MarketId,
    pub side: Side,
    pub action: OrderAction,
    /// Number of shares of `side`
    pub amount: Decimal,
    /// Price per share of `side`, strictly inside (0, 1)
    pub price: Decimal,
    pub owner_user_id: UserId,
    pub acceptor_user_id: Option<UserId>,
    pub placed_at: DateTime<Utc>,
    pub last_change_at: DateTime<Utc>,
    pub status: OrderStatus,
}

impl Order {
    /// Create a new pending order
    pub fn new(
        owner_user_id: UserId,
        market_id: MarketId,
        side: Side,
        action: OrderAction,
        amount: Decimal,
        price: Decimal,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            order_id: OrderId::new(),
            market_id,
            side,
            action,
            amount,
            price,
            owner_user_id,
            acceptor_user_id: None,
            placed_at: now,
            last_change_at: now,
            status: OrderStatus::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    fn ensure_pending(&self) -> Result<(), OrderError> {
        if !self.is_pending() {
            return Err(OrderError::NotPending {
                order_id: self.order_id.to_string(),
                status: self.status.to_string(),
            });
        }
        Ok(())
    }

    /// Transition PENDING -> ACCEPTED
    pub fn accept(&mut self, acceptor: UserId, now: DateTime<Utc>) -> Result<(), OrderError> {
        self.ensure_pending()?;
        self.status = OrderStatus::Accepted;
        self.acceptor_user_id = Some(acceptor);
        self.last_change_at = now;
        Ok(())
    }

    /// Transition PENDING -> CANCELLED
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<(), OrderError> {
        self.ensure_pending()?;
        self.status = OrderStatus::Cancelled;
        self.acceptor_user_id = None;
        self.last_change_at = now;
        Ok(())
    }
}
