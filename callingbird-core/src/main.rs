use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::Json;
use axum::routing::{get, post, put};
use axum::Router;
use dotenv::dotenv;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use callingbird_core::auth;
use callingbird_core::billing::run::BillingRunner;
use callingbird_core::config::AppConfig;
use callingbird_core::crypto::TokenCipher;
use callingbird_core::db;
use callingbird_core::email::LogMailer;
use callingbird_core::payments::MollieClient;
use callingbird_core::state::AppState;
use callingbird_core::sync::{AssistantSyncService, SyncCoalescer, VapiClient};
use callingbird_core::{billing, commerce, sync};

/// Health check endpoint.
///
/// Returns a simple JSON response indicating the server is running.
/// Useful for monitoring and load balancer health checks.
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "callingbird-core",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Database health check endpoint.
async fn db_health_check(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    sqlx::query("SELECT 1")
        .execute(&state.db)
        .await
        .map_err(|e| {
            tracing::error!("Database health check failed: {}", e);
            StatusCode::SERVICE_UNAVAILABLE
        })?;

    Ok(Json(serde_json::json!({
        "status": "ok",
        "database": "connected"
    })))
}

/// Creates the main application router.
///
/// Tenant-scoped routes sit behind the company JWT middleware; admin routes
/// behind the separate admin JWT middleware. The Mollie webhook is public
/// by design (Mollie authenticates by payment id lookup).
fn create_router(state: AppState) -> Router {
    let company_routes = Router::new()
        .route("/settings/voice", put(sync::handlers::update_voice_settings))
        .route(
            "/settings/instructions",
            put(sync::handlers::update_instructions),
        )
        .route(
            "/scheduling/appointment-types",
            post(sync::handlers::create_appointment_type),
        )
        .route(
            "/scheduling/appointment-types/:id",
            put(sync::handlers::update_appointment_type),
        )
        .route(
            "/products/:id/publish",
            put(sync::handlers::set_product_published),
        )
        .route(
            "/commerce/:provider/products/match",
            get(commerce::handlers::match_product),
        )
        .route_layer(middleware::from_fn(auth::company_auth));

    let admin_routes = Router::new()
        .route("/billing/run", post(billing::handlers::run_billing))
        .route_layer(middleware::from_fn(auth::admin_auth));

    Router::new()
        .route("/health", get(health_check))
        .route("/health/db", get(db_health_check))
        .route("/billing/webhook", post(billing::handlers::mollie_webhook))
        .nest("/admin", admin_routes)
        .merge(company_routes)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"))
        .add_directive(LevelFilter::INFO.into());

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    info!("Starting CallingBird Core Server...");

    // Fail fast on missing configuration
    let config = AppConfig::from_env()?;
    let cipher = TokenCipher::from_hex_key(&config.master_key_hex)?;

    // Initialize database connection pool
    let pool = db::create_pool(&config.database_url).await?;

    // Third-party clients and services
    let payments = Arc::new(MollieClient::new(config.mollie_api_key.clone()));
    let mailer = Arc::new(LogMailer);
    let assistant_client = Arc::new(VapiClient::new(config.vapi_api_key.clone()));
    let sync_service = Arc::new(AssistantSyncService::new(pool.clone(), assistant_client));
    let coalescer = SyncCoalescer::new(sync_service);
    let runner = Arc::new(BillingRunner::new(
        pool.clone(),
        payments.clone(),
        mailer.clone(),
        config.default_price_per_minute,
    ));

    let app_state = AppState {
        db: pool,
        config,
        coalescer,
        runner,
        payments,
        mailer,
        cipher,
    };

    let app = create_router(app_state);

    // Get server configuration
    let host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("SERVER_PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()
        .map_err(|_| anyhow::anyhow!("Invalid SERVER_PORT"))?;

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}:{}: {}", host, port, e))?;

    info!("Server listening on {}:{}", host, port);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
