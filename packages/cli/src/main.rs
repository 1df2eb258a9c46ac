use axum::http::Method;
use axum::response::Json as ResponseJson;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use taskdeck_api::{create_tasks_router, AppState};
use taskdeck_tasks::{StoreFactory, TaskService};

mod config;

use config::Config;

async fn root() -> ResponseJson<serde_json::Value> {
    ResponseJson(serde_json::json!({ "message": "Welcome to the Taskdeck API" }))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    info!("Starting Taskdeck server on port {}", config.port);

    let store = StoreFactory::from_url(&config.database_url).await?;
    let service = TaskService::new(store);
    let state = AppState::new(service);

    // Create CORS layer
    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<axum::http::HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(root))
        .nest("/api/v1/tasks", create_tasks_router())
        .with_state(state)
        .layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
