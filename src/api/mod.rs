pub mod admin;
pub mod auth;
pub mod public;

use axum::{middleware::from_fn, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::middleware::logging::logging_middleware;
use crate::storage::LocalStorage;

use admin::admin_api_router;
use auth::auth_api_router;
use public::public_api_router;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub storage: Arc<LocalStorage>,
    pub jwt_secret: String,
}

pub fn create_api_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", public_api_router(state.clone()))
        .nest("/api", auth_api_router(state.clone()))
        .nest("/api", admin_api_router(state))
        .layer(from_fn(logging_middleware))
}
