pub mod clients;
pub mod config;
pub mod error;
pub mod routes;
pub mod selector;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::selector::MoveSelector;

/// Build the HTTP router around a move selector.
pub fn router(selector: Arc<dyn MoveSelector>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/new", post(routes::game::new_game))
        .route("/move", post(routes::game::make_move))
        .layer(Extension(selector))
        .layer(cors)
}
