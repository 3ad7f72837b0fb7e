use axum::{
    extract::{Extension, Path, Query},
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;

use crate::api::AppState;
use crate::error::ApiError;
use crate::services::inquiries::{self, InquiryFilters};

//ROUTERS
pub fn admin_inquiry_router(state: AppState) -> Router {
    Router::new()
        .route("/inquiries", get(get_inquiries))
        .route("/inquiries/:id", put(update_inquiry_status))
        .layer(Extension(state))
}

//ROUTES
async fn get_inquiries(
    Query(filters): Query<InquiryFilters>,
    Extension(state): Extension<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let page = inquiries::list_inquiries(&state.db, &filters).await?;
    Ok(Json(page))
}

async fn update_inquiry_status(
    Path(id): Path<i32>,
    Extension(state): Extension<AppState>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let inquiry = inquiries::update_inquiry_status(&state.db, id, &payload.status).await?;
    Ok(Json(inquiry))
}

//structs
#[derive(Clone, Debug, Deserialize)]
struct UpdateStatusPayload {
    status: String,
}
