mod config;
mod error;
mod handlers;
mod models;
mod storage;
mod store;
mod vitals;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use config::Config;
pub use error::{AppError, Result};
use store::HealthStore;

pub struct AppState {
    pub config: Config,
    pub store: HealthStore,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            store: HealthStore::seeded(),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/api/health", get(handlers::health_check))
        .route("/api/health/summary", get(handlers::health_summary))
        .route("/api/vitals", get(handlers::vitals::get_vitals))
        // Reports
        .route("/api/reports", get(handlers::records::list_reports))
        .route("/api/reports/:id", get(handlers::records::get_report))
        .route("/api/reports/upload", post(handlers::upload::upload_report))
        .route(
            "/api/reports/from-voice",
            post(handlers::voice::report_from_voice),
        )
        .route("/api/medication", get(handlers::records::list_medications))
        .route(
            "/api/consultations",
            get(handlers::records::list_consultations),
        )
        .route(
            "/api/avatar/mood",
            get(handlers::avatar::get_mood).post(handlers::avatar::set_mood),
        )
        // Saved uploads
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .layer(DefaultBodyLimit::max(state.config.max_request_body_bytes()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config
    let config = Config::from_env()?;

    tokio::fs::create_dir_all(&config.upload_dir).await?;
    tracing::info!("Uploads stored in {}", config.upload_dir.display());

    let addr = config.bind_addr();
    let state = Arc::new(AppState::new(config));
    let app = router(state);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
