use axum::{
    extract::{Extension, Path, Query},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::AppState;
use crate::error::ApiError;
use crate::services::{images, vehicles, vehicles::VehicleFilters};

//ROUTERS
pub fn vehicle_router(state: AppState) -> Router {
    Router::new()
        .route("/vehicles", get(get_vehicles))
        .route("/vehicles/search", get(search_vehicles))
        .route("/vehicles/:id", get(get_vehicle))
        .route("/vehicles/:id/related", get(get_related_vehicles))
        .route("/vehicles/:id/images", get(get_vehicle_images))
        .layer(Extension(state))
}

//ROUTES
async fn get_vehicles(
    Query(filters): Query<VehicleFilters>,
    Extension(state): Extension<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let page = vehicles::list_vehicles(&state.db, &filters).await?;
    Ok(Json(page))
}

async fn search_vehicles(
    Query(params): Query<SearchQuery>,
    Extension(state): Extension<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let query = params.q.unwrap_or_default();
    let items = vehicles::search_vehicles(&state.db, &query).await?;
    Ok(Json(items))
}

async fn get_vehicle(
    Path(id): Path<i32>,
    Extension(state): Extension<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let vehicle = vehicles::get_vehicle(&state.db, id).await?;
    Ok(Json(vehicle))
}

async fn get_related_vehicles(
    Path(id): Path<i32>,
    Query(params): Query<RelatedQuery>,
    Extension(state): Extension<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let items = vehicles::related_vehicles(&state.db, id, params.limit).await?;
    Ok(Json(items))
}

async fn get_vehicle_images(
    Path(id): Path<i32>,
    Extension(state): Extension<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let items = images::list_vehicle_images(&state.db, id).await?;
    Ok(Json(items))
}

//structs
#[derive(Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

#[derive(Deserialize)]
struct RelatedQuery {
    limit: Option<u64>,
}
