use crate::error::ApiError;
use crate::models::AppState;
use crate::schema::users;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::extract::State;
use diesel::prelude::*;
use http::{HeaderMap, StatusCode};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// Claims minted by the authentication service (magic-link flow, external to
/// this backend). This middleware only verifies and forwards them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, ApiError> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| ApiError::Auth("Invalid subject in token".to_string()))
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| ApiError::Auth("Authorization header required".to_string()))?
        .to_str()
        .map_err(|_| ApiError::Auth("Invalid Authorization format".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Auth("Invalid Authorization format".to_string()))?
        .trim();

    if token.is_empty() {
        return Err(ApiError::Auth("Invalid Authorization format".to_string()));
    }
    Ok(token.to_string())
}

pub fn verify_token(state: &AppState, token: &str) -> Result<Claims, ApiError> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        warn!("auth: token verification failed: {}", e);
        ApiError::Auth("Token verification failed".to_string())
    })
}

pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer_token(req.headers()).map_err(|e| e.into_response())?;
    let claims = verify_token(&state, &token).map_err(|e| e.into_response())?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Admin routes additionally check the caller's stored admin flag; the claim
/// set carries identity only.
pub async fn admin_middleware(
    State(state): State<Arc<AppState>>,
    req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .cloned()
        .ok_or_else(|| {
            (StatusCode::UNAUTHORIZED, "Authentication required".to_string()).into_response()
        })?;

    let user_id = claims.user_id().map_err(|e| e.into_response())?;

    let mut conn = state.db.get().map_err(|e| {
        ApiError::DatabaseConnection(e.to_string()).into_response()
    })?;

    let is_admin = users::table
        .find(user_id)
        .select(users::is_admin)
        .first::<bool>(&mut conn)
        .optional()
        .map_err(|e| ApiError::Database(e).into_response())?
        .unwrap_or(false);

    if !is_admin {
        warn!("auth: non-admin {} hit an admin route", user_id);
        return Err((StatusCode::FORBIDDEN, "Admin access required".to_string()).into_response());
    }

    Ok(next.run(req).await)
}
