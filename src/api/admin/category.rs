use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, post},
    Json, Router,
};

use crate::api::AppState;
use crate::error::ApiError;
use crate::services::categories::{self, CategoryInput};

//ROUTERS
pub fn admin_category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", post(create_category))
        .route("/categories/:id", delete(delete_category))
        .layer(Extension(state))
}

//ROUTES
async fn create_category(
    Extension(state): Extension<AppState>,
    Json(payload): Json<CategoryInput>,
) -> Result<impl IntoResponse, ApiError> {
    let category = categories::create_category(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

async fn delete_category(
    Path(id): Path<i32>,
    Extension(state): Extension<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    categories::delete_category(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
