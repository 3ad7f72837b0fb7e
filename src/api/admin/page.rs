use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};

use crate::api::AppState;
use crate::error::ApiError;
use crate::services::pages::{self, PageInput};

//ROUTERS
pub fn admin_page_router(state: AppState) -> Router {
    Router::new()
        .route("/admin/pages", get(get_pages).post(create_page))
        .route("/admin/pages/:id", put(update_page).delete(delete_page))
        .layer(Extension(state))
}

//ROUTES
async fn get_pages(Extension(state): Extension<AppState>) -> Result<impl IntoResponse, ApiError> {
    let items = pages::list_pages(&state.db).await?;
    Ok(Json(items))
}

async fn create_page(
    Extension(state): Extension<AppState>,
    Json(payload): Json<PageInput>,
) -> Result<impl IntoResponse, ApiError> {
    let page = pages::create_page(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(page)))
}

async fn update_page(
    Path(id): Path<i32>,
    Extension(state): Extension<AppState>,
    Json(payload): Json<PageInput>,
) -> Result<impl IntoResponse, ApiError> {
    let page = pages::update_page(&state.db, &state.storage, id, payload).await?;
    Ok(Json(page))
}

async fn delete_page(
    Path(id): Path<i32>,
    Extension(state): Extension<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    pages::delete_page(&state.db, &state.storage, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
