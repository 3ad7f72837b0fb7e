pub mod category;
pub mod image;
pub mod inquiry;
pub mod page;
pub mod vehicle;

use axum::{middleware::from_fn_with_state, Router};

use crate::api::AppState;
use crate::middleware::auth::{auth_middleware, AuthState};

use category::admin_category_router;
use image::admin_image_router;
use inquiry::admin_inquiry_router;
use page::admin_page_router;
use vehicle::admin_vehicle_router;

pub fn admin_api_router(state: AppState) -> Router {
    let auth_state = AuthState {
        db: state.db.clone(),
        secret: state.jwt_secret.clone(),
    };

    Router::new()
        .merge(admin_category_router(state.clone()))
        .merge(admin_vehicle_router(state.clone()))
        .merge(admin_image_router(state.clone()))
        .merge(admin_inquiry_router(state.clone()))
        .merge(admin_page_router(state))
        .layer(from_fn_with_state(auth_state, auth_middleware))
}
