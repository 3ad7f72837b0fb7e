use sea_orm::{Database, DatabaseConnection};
use std::sync::Arc;

use rust_kuruma::api::{create_api_router, AppState};
use rust_kuruma::config::Config;
use rust_kuruma::entities::{seed, setup_schema};
use rust_kuruma::storage::LocalStorage;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env();

    let db: DatabaseConnection = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");
    setup_schema(&db).await.expect("Failed to create schema");
    seed(&db, &config).await.expect("Failed to seed database");

    let storage =
        LocalStorage::new(&config.uploads_dir).expect("Failed to prepare uploads directory");

    let state = AppState {
        db,
        storage: Arc::new(storage),
        jwt_secret: config.jwt_secret.clone(),
    };

    let app = create_api_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.server_port))
        .await
        .expect("Failed to bind server port");
    tracing::info!(port = config.server_port, "listening");
    axum::serve(listener, app).await.expect("Server error");
}
