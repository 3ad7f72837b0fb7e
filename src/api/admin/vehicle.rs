use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{post, put},
    Json, Router,
};

use crate::api::AppState;
use crate::error::ApiError;
use crate::services::{images, vehicles};
use crate::validation::VehicleInput;

//ROUTERS
pub fn admin_vehicle_router(state: AppState) -> Router {
    Router::new()
        .route("/vehicles", post(create_vehicle))
        .route("/vehicles/:id", put(update_vehicle).delete(delete_vehicle))
        .layer(Extension(state))
}

//ROUTES
async fn create_vehicle(
    Extension(state): Extension<AppState>,
    Json(payload): Json<VehicleInput>,
) -> Result<impl IntoResponse, ApiError> {
    let vehicle = vehicles::create_vehicle(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

async fn update_vehicle(
    Path(id): Path<i32>,
    Extension(state): Extension<AppState>,
    Json(payload): Json<VehicleInput>,
) -> Result<impl IntoResponse, ApiError> {
    let vehicle = vehicles::update_vehicle(&state.db, id, payload).await?;
    Ok(Json(vehicle))
}

async fn delete_vehicle(
    Path(id): Path<i32>,
    Extension(state): Extension<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    // Blob cleanup belongs to the image component and must run before the
    // metadata cascade takes the rows with it.
    images::delete_vehicle_assets(&state.db, &state.storage, id).await?;
    vehicles::delete_vehicle(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
