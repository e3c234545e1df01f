//! Binary-outcome market types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::MarketId;
use crate::order::Side;

/// Market status
///
/// `Resolving` is the fence written as the first step of resolution: from
/// that point no order may be placed or accepted on the market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarketStatus {
    Open,
    Resolving,
    Closed,
}

impl fmt::Display for MarketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketStatus::Open => f.write_str("OPEN"),
            MarketStatus::Resolving => f.write_str("RESOLVING"),
            MarketStatus::Closed => f.write_str("CLOSED"),
        }
    }
}

/// Market document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub market_id: MarketId,
    pub title: String,
    pub open_date: DateTime<Utc>,
    /// Scheduled close while open; actual close time once resolved
    pub close_date: DateTime<Utc>,
    pub status: MarketStatus,
    pub result: Option<Side>,
}

impl Market {
    /// Create a new open market
    pub fn new(title: impl Into<String>, open_date: DateTime<Utc>, close_date: DateTime<Utc>) -> Self {
        Self {
            market_id: MarketId::new(),
            title: title.into(),
            open_date,
            close_date,
            status: MarketStatus::Open,
            result: None,
        }
    }

    /// Check if the market accepts new orders and settlements
    pub fn is_open(&self) -> bool {
        self.status == MarketStatus::Open
    }

    /// Fence the market for resolution with the given result
    pub fn begin_resolution(&mut self, result: Side) {
        self.status = MarketStatus::Resolving;
        self.result = Some(result);
    }

    /// Finalize resolution
    pub fn close(&mut self, now: DateTime<Utc>) {
        self.status = MarketStatus::Closed;
        self.close_date = now;
    }
}
