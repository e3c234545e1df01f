use crate::auth::AuthenticatedCaller;
use crate::error::AppError;
use crate::handlers::throttle;
use crate::models::UserView;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

pub async fn register(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
) -> Result<(StatusCode, Json<UserView>), AppError> {
    throttle(&state, &caller, "user_register")?;
    let user = state
        .engine
        .provisioning()
        .register_user(caller.0.user_id.clone(), state.starting_balance)
        .await?;
    Ok((StatusCode::CREATED, Json(UserView::new(user, Vec::new()))))
}

pub async fn get_me(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
) -> Result<Json<UserView>, AppError> {
    throttle(&state, &caller, "user_query")?;
    let user = state.engine.get_user(&caller.0.user_id).await?;
    let holdings = state.engine.holdings_for_user(&caller.0.user_id).await?;
    Ok(Json(UserView::new(user, holdings)))
}
