use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use mindline::config::AppConfig;
use mindline::db;
use mindline::handlers;
use mindline::services::notify::{Notifier, WhatsAppGateway};
use mindline::services::otp::{self, OtpStore};
use mindline::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    let gateway_configured = !config.gateway_url.is_empty() && !config.gateway_api_key.is_empty();
    if !gateway_configured {
        tracing::warn!("messaging gateway not configured, notifications will be skipped");
    }
    let gateway = WhatsAppGateway::new(config.gateway_url.clone(), config.gateway_api_key.clone());
    let notifier = Notifier::new(
        Box::new(gateway),
        config.sender_name.clone(),
        gateway_configured,
    );

    let otp_store = OtpStore::new(Duration::from_secs(config.otp_ttl_secs));

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        notifier,
        otp: otp_store,
    });

    otp::spawn_sweeper(state.clone(), Duration::from_secs(60));

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/webhook", post(handlers::webhook::dialogue_webhook))
        .route(
            "/api/professionals",
            get(handlers::professionals::list_professionals)
                .post(handlers::professionals::create_professional),
        )
        .route(
            "/api/professionals/:id",
            get(handlers::professionals::get_professional),
        )
        .route(
            "/api/clients/phone/:phone",
            get(handlers::clients::get_client_by_phone),
        )
        .route("/api/whatsapp/send", post(handlers::whatsapp::send_message))
        .route("/api/otp/send", post(handlers::otp::send_otp))
        .route("/api/otp/verify", post(handlers::otp::verify_otp))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
