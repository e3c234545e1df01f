use crate::handlers::{market, order, user};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": types::LIB_VERSION }))
}

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/users/me", post(user::register).get(user::get_me))
        .route("/markets", post(market::create_market))
        .route("/markets/{id}", get(market::get_market))
        .route("/markets/{id}/orders", get(market::list_orders))
        .route("/markets/{id}/resolve", post(market::resolve_market))
        .route("/orders", post(order::create_order))
        .route("/orders/{id}", get(order::get_order))
        .route("/orders/{id}/respond", post(order::respond_to_order));

    Router::new()
        .route("/health", get(health))
        .nest("/v1", api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
