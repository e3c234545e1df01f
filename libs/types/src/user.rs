//! User cash account

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::AccountError;
use crate::ids::UserId;

/// User document
///
/// Invariant: balance >= 0. Mutated only through ledger transfers and
/// market liquidation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub balance: Decimal,
}

impl User {
    pub fn new(user_id: UserId, balance: Decimal) -> Self {
        Self { user_id, balance }
    }

    /// Deduct cash, refusing to go negative
    pub fn debit(&mut self, amount: Decimal) -> Result<(), AccountError> {
        if amount < Decimal::ZERO {
            return Err(AccountError::NegativeAmount {
                amount: amount.to_string(),
            });
        }
        if self.balance < amount {
            return Err(AccountError::InsufficientBalance {
                user_id: self.user_id.to_string(),
                required: amount.to_string(),
                available: self.balance.to_string(),
            });
        }
        self.balance -= amount;
        Ok(())
    }

    pub fn credit(&mut self, amount: Decimal) -> Result<(), AccountError> {
        if amount < Decimal::ZERO {
            return Err(AccountError::NegativeAmount {
                amount: amount.to_string(),
            });
        }
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(AccountError::Overflow)?;
        Ok(())
    }
}
