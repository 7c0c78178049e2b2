use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{analyze, comments, data, health};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    let api = data::router().nest("/comments", comments::router());

    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api", api)
        .nest("/analyze", analyze::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
