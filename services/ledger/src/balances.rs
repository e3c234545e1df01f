//! User Balance Ledger
//!
//! Cash movements on User documents, staged into a unit of work. Callers
//! pair every debit with credits of the same total (or with share
//! issuance in a BUY settlement) so value is conserved.

use rust_decimal::Decimal;
use types::errors::{AccountError, LedgerError};
use types::ids::UserId;

use crate::store::Document;
use crate::txn::UnitOfWork;

pub async fn balance_of(uow: &mut UnitOfWork<'_>, user_id: &UserId) -> Result<Decimal, LedgerError> {
    Ok(uow.user(user_id).await?.balance)
}

/// Fail with `InsufficientBalance` unless the user holds at least `amount`.
pub async fn ensure_funds(
    uow: &mut UnitOfWork<'_>,
    user_id: &UserId,
    amount: Decimal,
) -> Result<(), LedgerError> {
    let available = balance_of(uow, user_id).await?;
    if available < amount {
        return Err(AccountError::InsufficientBalance {
            user_id: user_id.to_string(),
            required: amount.to_string(),
            available: available.to_string(),
        }
        .into());
    }
    Ok(())
}

pub async fn debit(
    uow: &mut UnitOfWork<'_>,
    user_id: &UserId,
    amount: Decimal,
) -> Result<(), LedgerError> {
    let mut user = uow.user(user_id).await?;
    user.debit(amount)?;
    uow.stage(Document::User(user));
    Ok(())
}

pub async fn credit(
    uow: &mut UnitOfWork<'_>,
    user_id: &UserId,
    amount: Decimal,
) -> Result<(), LedgerError> {
    let mut user = uow.user(user_id).await?;
    user.credit(amount)?;
    uow.stage(Document::User(user));
    Ok(())
}

/// Apply a signed cash delta
pub async fn apply_delta(
    uow: &mut UnitOfWork<'_>,
    user_id: &UserId,
    delta: Decimal,
) -> Result<(), LedgerError> {
    if delta < Decimal::ZERO {
        debit(uow, user_id, -delta).await
    } else if delta > Decimal::ZERO {
        credit(uow, user_id, delta).await
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{LedgerStore, MemoryStore, Transaction};
    use rust_decimal_macros::dec;
    use types::user::User;

    async fn store_with(balances: &[(&str, Decimal)]) -> MemoryStore {
        let store = MemoryStore::new();
        let mut txn = Transaction::new();
        for (id, balance) in balances {
            txn.put(Document::User(User::new(UserId::new(*id), *balance)));
        }
        store.commit(txn).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_debit_then_credit_in_one_unit() {
        let store = store_with(&[("u1", dec!(100)), ("u2", dec!(5))]).await;
        let (u1, u2) = (UserId::new("u1"), UserId::new("u2"));

        let mut uow = UnitOfWork::begin(&store);
        debit(&mut uow, &u1, dec!(12.50)).await.unwrap();
        credit(&mut uow, &u2, dec!(12.50)).await.unwrap();
        assert_eq!(balance_of(&mut uow, &u1).await.unwrap(), dec!(87.50));
        uow.commit().await.unwrap();

        let mut check = UnitOfWork::begin(&store);
        assert_eq!(balance_of(&mut check, &u1).await.unwrap(), dec!(87.50));
        assert_eq!(balance_of(&mut check, &u2).await.unwrap(), dec!(17.50));
    }

    #[tokio::test]
    async fn test_ensure_funds() {
        let store = store_with(&[("u1", dec!(1))]).await;
        let mut uow = UnitOfWork::begin(&store);
        let u1 = UserId::new("u1");
        assert!(ensure_funds(&mut uow, &u1, dec!(1)).await.is_ok());
        let err = ensure_funds(&mut uow, &u1, dec!(5)).await.unwrap_err();
        assert_eq!(err.code(), "INSUFFICIENT_BALANCE");
    }

    #[tokio::test]
    async fn test_apply_delta_signs() {
        let store = store_with(&[("u1", dec!(10))]).await;
        let u1 = UserId::new("u1");
        let mut uow = UnitOfWork::begin(&store);
        apply_delta(&mut uow, &u1, dec!(-4)).await.unwrap();
        apply_delta(&mut uow, &u1, dec!(1.25)).await.unwrap();
        apply_delta(&mut uow, &u1, Decimal::ZERO).await.unwrap();
        assert_eq!(balance_of(&mut uow, &u1).await.unwrap(), dec!(7.25));
        assert!(apply_delta(&mut uow, &u1, dec!(-8)).await.is_err());
    }
}
