//! # Planframe Node
//!
//! HTTP service over the frame registry.

pub mod api;
pub mod config;
pub mod logging;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use config::NodeConfig;
pub use state::AppState;

/// Run the node until the server stops.
pub async fn run_server(config: NodeConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let state = AppState::from_config(&config)?;

    info!(
        "Planframe node starting, frames stored in {}",
        config.data_dir.display()
    );

    let app = create_router(state);

    info!("Listening on http://{}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(api::health::health_check))
        .route("/frame", post(api::frame::create_frame))
        .route("/frame/:id", get(api::frame::get_frame))
        .route("/frame/:id/state", post(api::frame::update_state))
        .route("/frame/:id/validate", post(api::frame::validate_frame))
        .route("/frame/:id/evaluate", post(api::frame::evaluate_frame))
        .route("/frame/:id/optimize", post(api::frame::optimize_frame))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
