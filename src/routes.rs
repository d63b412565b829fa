//! Route definitions for the Target Onchain API

use axum::{routing::get, Router};

use crate::app_state::AppState;
use crate::handlers::*;

// Frame routes: authoring CRUD plus the interaction pipeline
pub fn frame_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/frame",
            get(list_frames)
                .post(create_frame)
                .put(update_frame)
                .delete(delete_frame),
        )
        .route("/api/frame/:id/action", axum::routing::post(frame_action))
        .route("/api/frame/:id/explain", axum::routing::post(frame_explain))
}

// Composer routes
pub fn composer_routes() -> Router<AppState> {
    Router::new()
        .route("/api/frame/composer/metadata", get(composer_metadata))
        .route(
            "/api/frame/composer",
            axum::routing::post(composer_action),
        )
}

// Storefront directory routes
pub fn store_routes() -> Router<AppState> {
    Router::new().route("/api/slice/stores", get(list_stores))
}
