use axum::{
    extract::{Extension, Path},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::api::AppState;
use crate::error::ApiError;
use crate::services::categories;

//ROUTERS
pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/:id", get(get_category))
        .layer(Extension(state))
}

//ROUTES
async fn get_categories(
    Extension(state): Extension<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let items = categories::list_categories(&state.db).await?;
    Ok(Json(items))
}

async fn get_category(
    Path(id): Path<i32>,
    Extension(state): Extension<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let category = categories::get_category(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("category", id))?;
    Ok(Json(category))
}
