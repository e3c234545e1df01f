use crate::auth::AuthenticatedCaller;
use crate::error::AppError;
use crate::handlers::throttle;
use crate::models::{CreateOrderRequest, OrderView, RespondRequest, RespondView};
use crate::state::AppState;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};
use ledger::NewOrder;
use types::errors::LedgerError;
use types::ids::OrderId;
use types::order::{Decision, OrderAction, Side};

pub async fn create_order(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderView>), AppError> {
    throttle(&state, &caller, "order_placement")?;

    let request = NewOrder {
        market_id: payload.market_id,
        side: payload.side.parse::<Side>().map_err(LedgerError::from)?,
        action: payload.action.parse::<OrderAction>().map_err(LedgerError::from)?,
        amount: payload.amount,
        price: payload.price,
    };
    let order = state.engine.orders().create_order(&caller.0, request).await?;
    Ok((StatusCode::CREATED, Json(order.into())))
}

pub async fn get_order(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
    order_id: Result<Path<OrderId>, PathRejection>,
) -> Result<Json<OrderView>, AppError> {
    throttle(&state, &caller, "order_query")?;
    let Path(order_id) = order_id?;
    let order = state.engine.orders().get_order(order_id).await?;
    Ok(Json(order.into()))
}

pub async fn respond_to_order(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
    order_id: Result<Path<OrderId>, PathRejection>,
    Json(payload): Json<RespondRequest>,
) -> Result<Json<RespondView>, AppError> {
    throttle(&state, &caller, "order_respond")?;
    let Path(order_id) = order_id?;
    let decision = payload.decision.parse::<Decision>().map_err(LedgerError::from)?;
    let response = state.engine.orders().respond(&caller.0, order_id, decision).await?;
    Ok(Json(response.into()))
}
