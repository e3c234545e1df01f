pub mod market;
pub mod order;
pub mod user;

use crate::auth::AuthenticatedCaller;
use crate::error::AppError;
use crate::state::AppState;

/// Charge one token from the caller's bucket for `endpoint`
pub(crate) fn throttle(
    state: &AppState,
    caller: &AuthenticatedCaller,
    endpoint: &str,
) -> Result<(), AppError> {
    state
        .rate_limiter
        .check_rate_limit(&format!("{}:{}", caller.0.user_id, endpoint))
}
