//! Types library for the prediction market ledger
//!
//! Core document and identifier definitions shared by the ledger service
//! and the gateway.
//!
//! # Modules
//! - `ids`: Identifiers (OrderId, MarketId, UserId)
//! - `numeric`: Cash rounding and amount/price validation
//! - `order`: Order lifecycle types
//! - `market`: Market document and status
//! - `holding`: Per-(user, market, side) share holdings
//! - `user`: User cash balance
//! - `caller`: Verified caller identity and roles
//! - `errors`: Error taxonomy

pub mod ids;
pub mod numeric;
pub mod order;
pub mod market;
pub mod holding;
pub mod user;
pub mod caller;
pub mod errors;

pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::caller::*;
    pub use crate::errors::*;
    pub use crate::holding::*;
    pub use crate::ids::*;
    pub use crate::market::*;
    pub use crate::numeric::*;
    pub use crate::order::*;
    pub use crate::user::*;
}
