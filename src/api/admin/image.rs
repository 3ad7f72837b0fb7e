use axum::{
    extract::{DefaultBodyLimit, Extension, Multipart, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, post},
    Json, Router,
};

use crate::api::AppState;
use crate::error::ApiError;
use crate::services::images;

// Leaves headroom over the per-file limit for multipart framing.
const UPLOAD_BODY_LIMIT: usize = images::MAX_FILE_SIZE + 1024 * 1024;

//ROUTERS
pub fn admin_image_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/vehicles/:id/images",
            post(upload_image).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/images/:id", delete(delete_image))
        .layer(Extension(state))
}

//ROUTES
async fn upload_image(
    Path(vehicle_id): Path<i32>,
    Extension(state): Extension<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::Invalid(format!("invalid multipart request: {err}")))?
    {
        let is_file = field.name() == Some("file") || field.file_name().is_some();
        if !is_file {
            continue;
        }

        let content_type = field
            .content_type()
            .map(|value| value.to_owned())
            .or_else(|| {
                field
                    .file_name()
                    .and_then(|name| mime_guess::from_path(name).first_raw())
                    .map(|value| value.to_owned())
            })
            .ok_or_else(|| ApiError::Invalid("content type is not set".to_string()))?;

        let bytes = field
            .bytes()
            .await
            .map_err(|err| ApiError::Invalid(format!("failed to read file bytes: {err}")))?;

        let image =
            images::upload_image(&state.db, &state.storage, vehicle_id, &content_type, &bytes)
                .await?;
        return Ok((StatusCode::CREATED, Json(image)));
    }

    Err(ApiError::Invalid(
        "multipart request contained no file field".to_string(),
    ))
}

async fn delete_image(
    Path(id): Path<i32>,
    Extension(state): Extension<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    images::delete_image(&state.db, &state.storage, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
