//! Error types for the ledger
//!
//! Comprehensive error taxonomy using thiserror. Every failure maps to an
//! `ErrorKind` so callers can tell "retry" apart from "state is final".

use thiserror::Error;

/// Top-level ledger error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    #[error("Market error: {0}")]
    Market(#[from] MarketError),

    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    #[error("Authorization error: {0}")]
    Auth(#[from] AuthError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Coarse failure classes surfaced to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or out-of-range input, rejected before any read
    Validation,
    /// Order, market or user absent
    NotFound,
    /// Business precondition not met; state unchanged
    Precondition,
    /// Caller lacks the capability for the operation
    Unauthorized,
    /// Lost an optimistic-concurrency race; retry from scratch
    ConcurrencyConflict,
    /// Transport or storage failure; retry with backoff
    StoreUnavailable,
}

impl ErrorKind {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::ConcurrencyConflict | ErrorKind::StoreUnavailable)
    }
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::Validation(_) => ErrorKind::Validation,
            LedgerError::Order(OrderError::NotFound { .. }) => ErrorKind::NotFound,
            LedgerError::Order(OrderError::NotOwner { .. }) => ErrorKind::Unauthorized,
            LedgerError::Order(_) => ErrorKind::Precondition,
            LedgerError::Market(MarketError::NotFound { .. }) => ErrorKind::NotFound,
            LedgerError::Market(_) => ErrorKind::Precondition,
            LedgerError::Account(AccountError::UserNotFound { .. }) => ErrorKind::NotFound,
            LedgerError::Account(AccountError::NegativeAmount { .. })
            | LedgerError::Account(AccountError::Overflow) => ErrorKind::Validation,
            LedgerError::Account(_) => ErrorKind::Precondition,
            LedgerError::Auth(_) => ErrorKind::Unauthorized,
            LedgerError::Store(StoreError::Conflict { .. }) => ErrorKind::ConcurrencyConflict,
            LedgerError::Store(StoreError::Unavailable(_)) => ErrorKind::StoreUnavailable,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::Validation(e) => match e {
                ValidationError::InvalidAmount(_) => "INVALID_AMOUNT",
                ValidationError::InvalidPrice(_) => "INVALID_PRICE",
                ValidationError::InvalidAction(_) => "INVALID_ACTION",
                ValidationError::InvalidSide(_) => "INVALID_SIDE",
                ValidationError::InvalidDecision(_) => "INVALID_DECISION",
                ValidationError::InvalidStatus(_) => "INVALID_STATUS",
                ValidationError::InvalidRole(_) => "INVALID_ROLE",
                ValidationError::InvalidMarket(_) => "INVALID_MARKET",
            },
            LedgerError::Order(e) => match e {
                OrderError::NotFound { .. } => "ORDER_NOT_FOUND",
                OrderError::NotPending { .. } => "ORDER_NOT_PENDING",
                OrderError::SelfAcceptance => "SELF_ACCEPTANCE",
                OrderError::NotOwner { .. } => "NOT_ORDER_OWNER",
            },
            LedgerError::Market(e) => match e {
                MarketError::NotFound { .. } => "MARKET_NOT_FOUND",
                MarketError::Closed { .. } => "MARKET_CLOSED",
                MarketError::AlreadyClosed { .. } => "MARKET_ALREADY_CLOSED",
                MarketError::ResolutionInProgress { .. } => "RESOLUTION_IN_PROGRESS",
            },
            LedgerError::Account(e) => match e {
                AccountError::UserNotFound { .. } => "USER_NOT_FOUND",
                AccountError::UserExists { .. } => "USER_EXISTS",
                AccountError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
                AccountError::InsufficientHoldings { .. } => "INSUFFICIENT_HOLDINGS",
                AccountError::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
                AccountError::Overflow => "OVERFLOW",
            },
            LedgerError::Auth(_) => "FORBIDDEN",
            LedgerError::Store(e) => match e {
                StoreError::Conflict { .. } => "CONCURRENCY_CONFLICT",
                StoreError::Unavailable(_) => "STORE_UNAVAILABLE",
            },
        }
    }
}

/// Malformed input
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid price: {0} (must be strictly between 0 and 1)")]
    InvalidPrice(String),

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Invalid side: {0}")]
    InvalidSide(String),

    #[error("Invalid decision: {0}")]
    InvalidDecision(String),

    #[error("Invalid order status: {0}")]
    InvalidStatus(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Invalid market: {0}")]
    InvalidMarket(String),
}

/// Order-specific errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {order_id}")]
    NotFound { order_id: String },

    #[error("Order {order_id} is not pending: {status}")]
    NotPending { order_id: String, status: String },

    #[error("Order owner cannot accept their own order")]
    SelfAcceptance,

    #[error("Only the owner may cancel order {order_id}")]
    NotOwner { order_id: String },
}

/// Market-specific errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketError {
    #[error("Market not found: {market_id}")]
    NotFound { market_id: String },

    #[error("Market {market_id} is not open: {status}")]
    Closed { market_id: String, status: String },

    #[error("Market already closed: {market_id}")]
    AlreadyClosed { market_id: String },

    #[error("Market {market_id} is already resolving to {result}")]
    ResolutionInProgress { market_id: String, result: String },
}

/// Balance and holdings errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AccountError {
    #[error("User not found: {user_id}")]
    UserNotFound { user_id: String },

    #[error("User already registered: {user_id}")]
    UserExists { user_id: String },

    #[error("Insufficient balance for {user_id}: required {required}, available {available}")]
    InsufficientBalance {
        user_id: String,
        required: String,
        available: String,
    },

    #[error("Insufficient {side} holdings for {user_id} in {market_id}: required {required}, available {available}")]
    InsufficientHoldings {
        user_id: String,
        market_id: String,
        side: String,
        required: String,
        available: String,
    },

    #[error("Negative transfer amount: {amount}")]
    NegativeAmount { amount: String },

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,
}

/// Capability errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("User {user_id} lacks role {role}")]
    MissingRole { user_id: String, role: String },
}

/// Ledger store failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Version conflict on {key}")]
    Conflict { key: String },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
