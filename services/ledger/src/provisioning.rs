//! Market and user provisioning
//!
//! The only place documents other than orders and holdings are created.
//! Starting balances enter the ledger here; everything after that moves
//! through settlement and liquidation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;
use types::caller::{Caller, Role};
use types::errors::{AccountError, LedgerError, ValidationError};
use types::ids::UserId;
use types::market::Market;
use types::numeric::round_cash;
use types::user::User;

use crate::config::LedgerConfig;
use crate::store::{Document, LedgerStore};
use crate::txn::{transact, TxnBody, UnitOfWork};

struct RegisterUser {
    user_id: UserId,
    starting_balance: Decimal,
}

#[async_trait]
impl TxnBody for RegisterUser {
    type Output = User;
    const NAME: &'static str = "register_user";

    async fn run(&self, uow: &mut UnitOfWork<'_>) -> Result<User, LedgerError> {
        if uow.find_user(&self.user_id).await?.is_some() {
            return Err(AccountError::UserExists {
                user_id: self.user_id.to_string(),
            }
            .into());
        }
        let user = User::new(self.user_id.clone(), self.starting_balance);
        uow.stage(Document::User(user.clone()));
        Ok(user)
    }
}

struct OpenMarket {
    title: String,
    close_date: DateTime<Utc>,
}

#[async_trait]
impl TxnBody for OpenMarket {
    type Output = Market;
    const NAME: &'static str = "open_market";

    async fn run(&self, uow: &mut UnitOfWork<'_>) -> Result<Market, LedgerError> {
        let market = Market::new(self.title.clone(), Utc::now(), self.close_date);
        uow.stage(Document::Market(market.clone()));
        Ok(market)
    }
}

#[derive(Clone)]
pub struct Provisioner {
    store: Arc<dyn LedgerStore>,
    config: LedgerConfig,
}

impl Provisioner {
    pub fn new(store: Arc<dyn LedgerStore>, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    /// Create the caller's account with a starting balance.
    pub async fn register_user(
        &self,
        user_id: UserId,
        starting_balance: Decimal,
    ) -> Result<User, LedgerError> {
        if starting_balance < Decimal::ZERO {
            return Err(ValidationError::InvalidAmount(starting_balance.to_string()).into());
        }
        let body = RegisterUser {
            user_id,
            starting_balance: round_cash(starting_balance),
        };
        let user = transact(self.store.as_ref(), &self.config, &body).await?;
        info!(user_id = %user.user_id, balance = %user.balance, "user registered");
        Ok(user)
    }

    /// Open a new market. Requires the market manager role.
    pub async fn open_market(
        &self,
        caller: &Caller,
        title: &str,
        close_date: DateTime<Utc>,
    ) -> Result<Market, LedgerError> {
        caller.require_role(Role::MarketManager)?;
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::InvalidMarket("title is empty".to_string()).into());
        }
        if close_date <= Utc::now() {
            return Err(ValidationError::InvalidMarket(format!(
                "close date {} is in the past",
                close_date
            ))
            .into());
        }

        let body = OpenMarket {
            title: title.to_string(),
            close_date,
        };
        let market = transact(self.store.as_ref(), &self.config, &body).await?;
        info!(market_id = %market.market_id, title = %market.title, "market opened");
        Ok(market)
    }
}
