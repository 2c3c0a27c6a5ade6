// src/bin/api_server.rs

use contact_management::infra::{logging, AppConfig, StoreKind};
use contact_management::storage::{ContactStore, InMemoryContactStore, PgContactStore};
use contact_management::transport::http::{self, AppState, ErrorMapper};
use contact_management::ContactService;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

async fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn ContactStore>> {
    match config.store {
        StoreKind::Memory => {
            tracing::warn!("using the in-memory contact store; data is lost on exit");
            Ok(Arc::new(InMemoryContactStore::new()))
        }
        StoreKind::Postgres => {
            let db = &config.database;
            tracing::info!(database = %db.display_target(), "connecting to PostgreSQL");
            let store = PgContactStore::connect(db.connect_options()?, db.max_connections).await?;
            if db.synchronize {
                store.sync_schema().await?;
                tracing::info!("contacts schema synchronized");
            }
            Ok(Arc::new(store))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        port = config.port,
        production = config.production,
        store = ?config.store,
        empty_list = ?config.empty_list,
        delete_response = ?config.delete_response,
        "configuration loaded"
    );

    // --- Service Initialization ---
    let store = build_store(&config).await?;
    let app_state = AppState {
        contacts: Arc::new(ContactService::new(store, config.empty_list)),
        errors: ErrorMapper::new(config.production),
        delete_response: config.delete_response,
    };

    // --- API Server Initialization ---
    let cors = http::cors_layer(&config.cors)?;
    let app = http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", http::ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("API server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://localhost:{}/swagger-ui", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
            tracing::info!("shutdown signal received");
        })
        .await?;

    tracing::info!("graceful shutdown complete");
    Ok(())
}
