use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::entities::user::{self, Entity as UserEntity, Role};
use crate::error::ApiError;

const TOKEN_LIFETIME_HOURS: i64 = 24;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i32,
    pub role: String,
    pub exp: usize,
}

#[derive(Clone)]
pub struct AuthState {
    pub db: DatabaseConnection,
    pub secret: String,
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok());

    let token = auth_header
        .and_then(|header| header.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

    let claims = validate_token(&state, token).await?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

pub fn generate_token(secret: &str, user_id: i32, role: &str) -> Result<String, ApiError> {
    let exp = Utc::now()
        .checked_add_signed(Duration::hours(TOKEN_LIFETIME_HOURS))
        .ok_or_else(|| ApiError::Internal("token expiry overflowed".to_string()))?
        .timestamp() as usize;

    let claims = Claims {
        user_id,
        role: role.to_owned(),
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|err| ApiError::Internal(format!("failed to generate token: {err}")))
}

/// A token is only as good as the row behind it: after the signature and
/// expiry check, the user must still exist with the admin role.
pub async fn validate_token(state: &AuthState, token: &str) -> Result<Claims, ApiError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.secret.as_bytes()),
        &validation,
    )
    .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

    let claims = token_data.claims;
    let role = Role::from_str(&claims.role)
        .map_err(|_| ApiError::Unauthorized("Invalid user or role".to_string()))?;

    match UserEntity::find_by_id(claims.user_id)
        .filter(user::Column::Role.eq(role))
        .one(&state.db)
        .await
    {
        Ok(Some(_)) => Ok(claims),
        Ok(None) => Err(ApiError::Unauthorized("Invalid user or role".to_string())),
        Err(err) => Err(ApiError::Database(err)),
    }
}
