use crate::auth::JwtKeys;
use crate::config::GatewayConfig;
use crate::rate_limit::RateLimiter;
use axum::extract::FromRef;
use ledger::{LedgerEngine, LedgerStore};
use rust_decimal::Decimal;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub engine: LedgerEngine,
    pub rate_limiter: Arc<RateLimiter>,
    pub jwt: Arc<JwtKeys>,
    pub starting_balance: Decimal,
}

impl AppState {
    pub fn new(config: &GatewayConfig, store: Arc<dyn LedgerStore>) -> Self {
        Self {
            engine: LedgerEngine::with_config(store, config.ledger_config()),
            rate_limiter: Arc::new(RateLimiter::new(
                config.rate_limit_capacity,
                config.rate_limit_refill_per_sec,
                config.rate_limit_idle_ttl(),
            )),
            jwt: Arc::new(JwtKeys::new(config.jwt_secret.as_bytes())),
            starting_balance: config.starting_balance,
        }
    }
}

impl FromRef<AppState> for Arc<JwtKeys> {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}
