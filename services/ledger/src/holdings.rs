//! Holdings Ledger
//!
//! Share balances per (user, market, side). A holding document is created
//! the first time shares move into its key and is never deleted.

use rust_decimal::Decimal;
use types::errors::{AccountError, LedgerError, MarketError};
use types::holding::{Holding, HoldingKey};

use crate::store::Document;
use crate::txn::UnitOfWork;

pub async fn shares_of(uow: &mut UnitOfWork<'_>, key: &HoldingKey) -> Result<Decimal, LedgerError> {
    Ok(uow.holding(key).await?.amount)
}

/// Fail with `InsufficientHoldings` unless `key` holds at least `amount` shares.
pub async fn ensure_shares(
    uow: &mut UnitOfWork<'_>,
    key: &HoldingKey,
    amount: Decimal,
) -> Result<(), LedgerError> {
    let holding = uow.holding(key).await?;
    check_available(&holding, amount)
}

fn check_available(holding: &Holding, amount: Decimal) -> Result<(), LedgerError> {
    if holding.amount < amount {
        return Err(AccountError::InsufficientHoldings {
            user_id: holding.user_id.to_string(),
            market_id: holding.market_id.to_string(),
            side: holding.side.to_string(),
            required: amount.to_string(),
            available: holding.amount.to_string(),
        }
        .into());
    }
    Ok(())
}

fn check_live(holding: &Holding) -> Result<(), LedgerError> {
    if holding.resolved {
        return Err(MarketError::AlreadyClosed {
            market_id: holding.market_id.to_string(),
        }
        .into());
    }
    Ok(())
}

pub async fn add_shares(
    uow: &mut UnitOfWork<'_>,
    key: &HoldingKey,
    amount: Decimal,
) -> Result<(), LedgerError> {
    if amount < Decimal::ZERO {
        return Err(AccountError::NegativeAmount {
            amount: amount.to_string(),
        }
        .into());
    }
    let mut holding = uow.holding(key).await?;
    check_live(&holding)?;
    holding.amount = holding
        .amount
        .checked_add(amount)
        .ok_or(AccountError::Overflow)?;
    uow.stage(Document::Holding(holding));
    Ok(())
}

pub async fn remove_shares(
    uow: &mut UnitOfWork<'_>,
    key: &HoldingKey,
    amount: Decimal,
) -> Result<(), LedgerError> {
    if amount < Decimal::ZERO {
        return Err(AccountError::NegativeAmount {
            amount: amount.to_string(),
        }
        .into());
    }
    let mut holding = uow.holding(key).await?;
    check_live(&holding)?;
    check_available(&holding, amount)?;
    holding.amount -= amount;
    uow.stage(Document::Holding(holding));
    Ok(())
}

/// Apply a signed share delta
pub async fn apply_delta(
    uow: &mut UnitOfWork<'_>,
    key: &HoldingKey,
    delta: Decimal,
) -> Result<(), LedgerError> {
    if delta < Decimal::ZERO {
        remove_shares(uow, key, -delta).await
    } else if delta > Decimal::ZERO {
        add_shares(uow, key, delta).await
    } else {
        Ok(())
    }
}
