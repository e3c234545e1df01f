use crate::auth::AuthenticatedCaller;
use crate::error::AppError;
use crate::handlers::throttle;
use crate::models::{
    CreateMarketRequest, ListOrdersQuery, MarketView, OrderView, ResolutionView,
    ResolveMarketRequest,
};
use crate::state::AppState;
use axum::{
    extract::{rejection::PathRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use types::errors::LedgerError;
use types::ids::MarketId;
use types::order::{OrderStatus, Side};

pub async fn create_market(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
    Json(payload): Json<CreateMarketRequest>,
) -> Result<(StatusCode, Json<MarketView>), AppError> {
    throttle(&state, &caller, "market_admin")?;
    let market = state
        .engine
        .provisioning()
        .open_market(&caller.0, &payload.title, payload.close_date)
        .await?;
    Ok((StatusCode::CREATED, Json(market.into())))
}

pub async fn get_market(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
    market_id: Result<Path<MarketId>, PathRejection>,
) -> Result<Json<MarketView>, AppError> {
    throttle(&state, &caller, "market_query")?;
    let Path(market_id) = market_id?;
    let market = state.engine.get_market(market_id).await?;
    Ok(Json(market.into()))
}

pub async fn list_orders(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
    market_id: Result<Path<MarketId>, PathRejection>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<OrderView>>, AppError> {
    throttle(&state, &caller, "market_query")?;
    let Path(market_id) = market_id?;
    let status = query
        .status
        .as_deref()
        .map(str::parse::<OrderStatus>)
        .transpose()
        .map_err(LedgerError::from)?;
    // Surface an unknown market as 404 rather than an empty list
    state.engine.get_market(market_id).await?;
    let orders = state.engine.orders().list_orders(market_id, status).await?;
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

pub async fn resolve_market(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
    market_id: Result<Path<MarketId>, PathRejection>,
    Json(payload): Json<ResolveMarketRequest>,
) -> Result<Json<ResolutionView>, AppError> {
    throttle(&state, &caller, "market_admin")?;
    let Path(market_id) = market_id?;
    let result = payload.result.parse::<Side>().map_err(LedgerError::from)?;
    let report = state
        .engine
        .resolution()
        .resolve_market(&caller.0, market_id, result)
        .await?;
    Ok(Json(report.into()))
}
