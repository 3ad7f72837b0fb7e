pub mod category;
pub mod inquiry;
pub mod page;
pub mod uploads;
pub mod vehicle;

use axum::Router;

use crate::api::AppState;

use category::category_router;
use inquiry::inquiry_router;
use page::page_router;
use uploads::uploads_router;
use vehicle::vehicle_router;

pub fn public_api_router(state: AppState) -> Router {
    Router::new()
        .merge(category_router(state.clone()))
        .merge(vehicle_router(state.clone()))
        .merge(inquiry_router(state.clone()))
        .merge(page_router(state.clone()))
        .merge(uploads_router(state))
}
