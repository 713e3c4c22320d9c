use diesel::r2d2::{ConnectionManager, Pool};
use diesel::PgConnection;
use dotenvy::dotenv;
use http::HeaderValue;
use std::{env, net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
use wishwell::app::create_router;
use wishwell::clients::email::EmailClient;
use wishwell::clients::paystack::PaystackClient;
use wishwell::logging::setup_logging;
use wishwell::models::AppState;

#[tokio::main]
async fn main() -> Result<(), eyre::Error> {
    setup_logging();

    info!("Starting WishWell payments backend");

    dotenv().ok();
    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());

    let cors_origins = env::var("CORS_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:5173".to_string())
        .split(',')
        .map(|s| s.trim().to_string())
        .collect::<Vec<String>>();

    info!("cors origins: {:?}", cors_origins);

    let manager = ConnectionManager::<PgConnection>::new(db_url);
    let pool = Pool::builder().max_size(10).build(manager).map_err(|e| {
        error!("Failed to create database pool: {}", e);
        eyre::eyre!("Failed to create database pool: {}", e)
    })?;

    let paystack_secret = env::var("PAYSTACK_SECRET_KEY").map_err(|_| {
        error!("PAYSTACK_SECRET_KEY environment variable not set");
        eyre::eyre!("PAYSTACK_SECRET_KEY environment variable must be set")
    })?;
    // Paystack signs webhooks with the account secret key unless a dedicated
    // secret is configured.
    let webhook_secret =
        env::var("PAYSTACK_WEBHOOK_SECRET").unwrap_or_else(|_| paystack_secret.clone());
    let paystack_api_url =
        env::var("PAYSTACK_API_URL").unwrap_or_else(|_| "https://api.paystack.co".to_string());

    let state = Arc::new(AppState {
        db: pool,
        jwt_secret: env::var("JWT_SECRET").map_err(|_| {
            error!("JWT_SECRET environment variable not set");
            eyre::eyre!("JWT_SECRET environment variable must be set")
        })?,
        paystack: PaystackClient::new(paystack_api_url, paystack_secret),
        paystack_webhook_secret: webhook_secret,
        email: EmailClient::new(),
        app_url: env::var("APP_URL").unwrap_or_else(|_| "http://localhost:8080".to_string()),
    });

    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_origin(
            cors_origins
                .iter()
                .map(|s| s.parse::<HeaderValue>())
                .collect::<Result<Vec<_>, _>>()?,
        );

    let app = create_router(state).layer(cors);

    let addr = format!("{}:{}", host, port).parse::<SocketAddr>()?;
    let listener = TcpListener::bind(&addr).await?;
    info!("Server running on http://{}", addr);
    info!(
        "Swagger UI available at http://{}/swagger-ui/index.html#/",
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

// handle Ctrl+C for graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
