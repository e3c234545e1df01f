//! Order Acceptance & Settlement Ledger
//!
//! Users take opposing YES/NO positions on binary-outcome markets by
//! posting orders that other users accept whole. Acceptance settles cash
//! and shares between the two parties; market resolution cancels what is
//! still pending and pays out winning shares.
//!
//! All multi-document updates go through optimistic units of work against
//! a versioned [`store::LedgerStore`]: nothing is written unless every
//! document read along the way is unchanged at commit, and conflicting
//! attempts are retried from scratch. No in-process lock is held across a
//! store call.
//!
//! # Modules
//! - `store`: store interface and the in-memory implementation
//! - `txn`: units of work and the retry loop
//! - `balances`: User Balance Ledger
//! - `holdings`: Holdings Ledger
//! - `settlement`: settlement planning and execution
//! - `orders`: Order Lifecycle Manager
//! - `resolution`: Market Resolution Engine
//! - `provisioning`: market and user creation
//! - `engine`: orchestrator and read queries

pub mod config;
pub mod store;
pub mod txn;
pub mod balances;
pub mod holdings;
pub mod settlement;
pub mod orders;
pub mod resolution;
pub mod provisioning;
pub mod engine;

pub use config::LedgerConfig;
pub use engine::LedgerEngine;
pub use orders::{NewOrder, OrderManager, OrderResponse};
pub use resolution::{ResolutionEngine, ResolutionReport};
pub use store::{LedgerStore, MemoryStore};
