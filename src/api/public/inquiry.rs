use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::AppState;
use crate::error::ApiError;
use crate::services::inquiries;
use crate::validation::InquiryInput;

//ROUTERS
pub fn inquiry_router(state: AppState) -> Router {
    Router::new()
        .route("/inquiries", post(create_inquiry))
        .layer(Extension(state))
}

//ROUTES
async fn create_inquiry(
    Extension(state): Extension<AppState>,
    Json(payload): Json<InquirySubmission>,
) -> Result<Response, ApiError> {
    // Bots fill the hidden website field; humans never see it. Drop such
    // submissions without revealing that anything was filtered.
    if payload
        .website
        .as_deref()
        .map(str::trim)
        .is_some_and(|value| !value.is_empty())
    {
        tracing::info!("dropped inquiry submission that tripped the honeypot");
        return Ok((
            StatusCode::CREATED,
            Json(json!({ "message": "Inquiry received" })),
        )
            .into_response());
    }

    let inquiry = inquiries::create_inquiry(&state.db, payload.input).await?;
    Ok((StatusCode::CREATED, Json(inquiry)).into_response())
}

//structs
#[derive(Clone, Debug, Deserialize)]
struct InquirySubmission {
    #[serde(flatten)]
    input: InquiryInput,
    website: Option<String>,
}
