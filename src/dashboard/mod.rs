//! Dashboard — Axum web server for the ledger.
//!
//! Serves the REST API consumed by the charts and tables, plus a
//! self-contained HTML page. CORS enabled for local development.

pub mod routes;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    response::Html,
    routing::{delete, get, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tracing::info;

use routes::AppState;

/// The embedded dashboard HTML (compiled into the binary).
const DASHBOARD_HTML: &str = include_str!("templates/index.html");

/// Serve the dashboard until shutdown is signalled (ctrl-c).
pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!(port, "Dashboard starting on http://localhost:{port}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind dashboard port")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Dashboard server error")
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received.");
}

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin("*".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route(
            "/api/players",
            get(routes::get_players).post(routes::create_player),
        )
        .route(
            "/api/players/:id",
            put(routes::rename_player).delete(routes::delete_player),
        )
        .route(
            "/api/games",
            get(routes::get_games).post(routes::create_game),
        )
        .route("/api/games/:id", delete(routes::delete_game))
        .route("/api/games/:id/results", get(routes::get_game_results))
        .route("/api/stats", get(routes::get_stats))
        .route("/api/trend", get(routes::get_trend))
        .route("/api/win-distribution", get(routes::get_win_distribution))
        .route("/api/summary", get(routes::get_summary))
        .route("/api/export.csv", get(routes::get_export_csv))
        .route("/api/settings/fee", put(routes::set_fee))
        .route("/health", get(routes::health))
        // Dashboard HTML
        .route("/", get(serve_dashboard))
        .layer(cors)
        .with_state(state)
}

/// Serve the embedded HTML dashboard.
async fn serve_dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
