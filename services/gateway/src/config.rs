use clap::Parser;
use ledger::LedgerConfig;
use rust_decimal::Decimal;
use std::net::SocketAddr;
use std::time::Duration;

/// Gateway settings, read from flags or the environment (`.env` honoured)
#[derive(Parser, Debug, Clone)]
#[command(name = "gateway")]
#[command(about = "HTTP gateway for the order acceptance and settlement ledger")]
pub struct GatewayConfig {
    /// Address to listen on
    #[arg(long, env = "GATEWAY_LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen_addr: SocketAddr,

    /// HMAC secret used to verify bearer tokens
    #[arg(long, env = "GATEWAY_JWT_SECRET")]
    pub jwt_secret: String,

    /// Balance granted when a user registers
    #[arg(long, env = "GATEWAY_STARTING_BALANCE", default_value = "100")]
    pub starting_balance: Decimal,

    /// Requests a caller may burst per endpoint
    #[arg(long, env = "GATEWAY_RATE_LIMIT_CAPACITY", default_value = "20")]
    pub rate_limit_capacity: u32,

    /// Tokens refilled per second
    #[arg(long, env = "GATEWAY_RATE_LIMIT_REFILL", default_value = "10")]
    pub rate_limit_refill_per_sec: f64,

    /// Idle buckets are evicted after this many seconds
    #[arg(long, env = "GATEWAY_RATE_LIMIT_IDLE_TTL_SECS", default_value = "300")]
    pub rate_limit_idle_ttl_secs: u64,

    #[arg(long, env = "LEDGER_MAX_COMMIT_ATTEMPTS", default_value = "8")]
    pub max_commit_attempts: u32,

    #[arg(long, env = "LEDGER_RETRY_BACKOFF_BASE_MS", default_value = "5")]
    pub retry_backoff_base_ms: u64,

    #[arg(long, env = "LEDGER_RETRY_BACKOFF_MAX_MS", default_value = "200")]
    pub retry_backoff_max_ms: u64,
}

impl GatewayConfig {
    pub fn ledger_config(&self) -> LedgerConfig {
        LedgerConfig::default()
            .with_max_commit_attempts(self.max_commit_attempts)
            .with_backoff(self.retry_backoff_base_ms, self.retry_backoff_max_ms)
    }

    pub fn rate_limit_idle_ttl(&self) -> Duration {
        Duration::from_secs(self.rate_limit_idle_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::try_parse_from(["gateway", "--jwt-secret", "s3cret"]).unwrap();
        assert_eq!(config.listen_addr.port(), 8080);
        assert_eq!(config.starting_balance, Decimal::from(100));
        assert_eq!(config.ledger_config(), LedgerConfig::default());
        assert_eq!(config.rate_limit_idle_ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_overrides() {
        let config = GatewayConfig::try_parse_from([
            "gateway",
            "--jwt-secret",
            "s3cret",
            "--starting-balance",
            "250.50",
            "--max-commit-attempts",
            "3",
        ])
        .unwrap();
        assert_eq!(config.starting_balance, Decimal::new(25050, 2));
        assert_eq!(config.ledger_config().max_commit_attempts, 3);
    }
}
