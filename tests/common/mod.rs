use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::Arc;
use uuid::Uuid;

use rust_kuruma::api::{create_api_router, AppState};
use rust_kuruma::config::Config;
use rust_kuruma::entities::{seed, setup_schema};
use rust_kuruma::storage::LocalStorage;
use rust_kuruma::validation::VehicleInput;

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        server_port: 0,
        uploads_dir: std::env::temp_dir()
            .join(format!("kuruma-test-{}", Uuid::new_v4()))
            .to_string_lossy()
            .into_owned(),
        jwt_secret: "test-secret".to_string(),
        admin_username: "admin".to_string(),
        admin_password: "admin1234".to_string(),
    }
}

/// Fresh schema-initialized and seeded in-memory database. A single pooled
/// connection, otherwise every pool member would see its own empty memory db.
pub async fn test_db(config: &Config) -> DatabaseConnection {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options.max_connections(1);
    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    setup_schema(&db).await.expect("Failed to create schema");
    seed(&db, config).await.expect("Failed to seed database");
    db
}

pub fn test_storage(config: &Config) -> LocalStorage {
    LocalStorage::new(&config.uploads_dir).expect("Failed to prepare test uploads directory")
}

/// Spawns the full router on an ephemeral port and hands back its base URL.
pub async fn spawn_server() -> (String, AppState) {
    let config = test_config();
    let db = test_db(&config).await;
    let storage = test_storage(&config);

    let state = AppState {
        db,
        storage: Arc::new(storage),
        jwt_secret: config.jwt_secret.clone(),
    };

    let app = create_api_router(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read test address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server error");
    });

    (format!("http://{}", addr), state)
}

pub fn vehicle_input(category: &str) -> VehicleInput {
    VehicleInput {
        category: category.to_string(),
        make: "Tadano".to_string(),
        model: "GR-250N".to_string(),
        year: 2018,
        mileage: 45000,
        price: 12_500_000,
        engine_type: Some("diesel".to_string()),
        dimensions: None,
        condition: Some("good".to_string()),
        features: vec!["radio control".to_string(), "4WD".to_string()],
        description_ja: Some("25トンラフタークレーン".to_string()),
        description_en: Some("25t rough terrain crane".to_string()),
        status: None,
    }
}

/// Minimal valid PNG payload for upload tests.
pub fn png_bytes() -> Vec<u8> {
    let image = image::RgbImage::from_pixel(8, 6, image::Rgb([120, 40, 200]));
    let mut buffer = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(image)
        .write_to(&mut buffer, image::ImageFormat::Png)
        .expect("Failed to encode test image");
    buffer.into_inner()
}
