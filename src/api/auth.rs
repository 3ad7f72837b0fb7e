use axum::{
    extract::Extension,
    middleware::from_fn_with_state,
    routing::{get, post},
    Json, Router,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::AppState;
use crate::entities::user::{self, Entity as UserEntity};
use crate::error::ApiError;
use crate::middleware::auth::{auth_middleware, generate_token, AuthState, Claims};

//ROUTERS
pub fn auth_api_router(state: AppState) -> Router {
    let auth_state = AuthState {
        db: state.db.clone(),
        secret: state.jwt_secret.clone(),
    };

    Router::new()
        .route("/auth/verify", get(verify))
        .layer(from_fn_with_state(auth_state, auth_middleware))
        .route("/auth/login", post(login))
        .layer(Extension(state))
}

//ROUTES
async fn login(
    Extension(state): Extension<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = UserEntity::find()
        .filter(user::Column::Username.eq(payload.username.as_str()))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid username or password".to_string()))?;

    user.check_hash(&payload.password)
        .map_err(|_| ApiError::Unauthorized("Invalid username or password".to_string()))?;

    let token = generate_token(&state.jwt_secret, user.id, user.role.as_str())?;
    Ok(Json(json!({ "token": token })))
}

async fn verify(Extension(claims): Extension<Claims>) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        user_id: claims.user_id,
        role: claims.role,
        exp: claims.exp,
    })
}

//structs
#[derive(Clone, Debug, Deserialize)]
struct LoginPayload {
    username: String,
    password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyResponse {
    user_id: i32,
    role: String,
    exp: usize,
}
