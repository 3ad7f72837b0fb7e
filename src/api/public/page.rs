use axum::{
    extract::{Extension, Path, Query},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::AppState;
use crate::error::ApiError;
use crate::services::pages;

//ROUTERS
pub fn page_router(state: AppState) -> Router {
    Router::new()
        .route("/pages", get(get_pages))
        .route("/pages/:slug", get(get_page))
        .layer(Extension(state))
}

//ROUTES
async fn get_pages(
    Query(params): Query<PagesQuery>,
    Extension(state): Extension<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let items = pages::list_published(&state.db, params.nav.unwrap_or(false)).await?;
    Ok(Json(items))
}

async fn get_page(
    Path(slug): Path<String>,
    Extension(state): Extension<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let page = pages::get_published_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::not_found("page", slug))?;
    Ok(Json(page))
}

//structs
#[derive(Deserialize)]
struct PagesQuery {
    nav: Option<bool>,
}
