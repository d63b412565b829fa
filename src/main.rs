//! Target Onchain Backend Server
//!
//! Serves storefront frames: a frame displays a shop's products and, once a
//! viewer interacts, looks up onchain attestations to decide which product
//! to recommend.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;

use target_onchain_server::app_state::AppState;
use target_onchain_server::config::AppConfig;
use target_onchain_server::handlers::{health_check, root};
use target_onchain_server::routes;
use target_onchain_server::services::attestation::EasClient;
use target_onchain_server::services::catalog::PgFrameStore;
use target_onchain_server::services::neynar::NeynarClient;
use target_onchain_server::services::recommendation::RecommendationPolicy;
use target_onchain_server::services::verification::VerificationEngine;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Arc::new(AppConfig::from_env());

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres");

    let attestation_index = Arc::new(EasClient::new(config.eas_scan_url.clone()));
    let app_state = AppState::new(
        Arc::new(PgFrameStore::new(pool)),
        Arc::new(NeynarClient::new(config.neynar_api_key.clone())),
        Arc::new(VerificationEngine::new(attestation_index, config.clone())),
        Arc::new(RecommendationPolicy::new(config.base_url.clone())),
        config,
    );

    // Create the app router
    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(routes::frame_routes())
        .merge(routes::composer_routes())
        .merge(routes::store_routes())
        .layer(build_cors_layer())
        .with_state(app_state);

    // Get port from environment or default to 3001
    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "3001".to_string())
        .parse()
        .expect("PORT must be a number");

    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    tracing::info!("Server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

fn build_cors_layer() -> CorsLayer {
    let allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000".to_string())
        .split(',')
        .filter_map(|origin| origin.trim().parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(false)
}
