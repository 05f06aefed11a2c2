//! Session handlers: register, login, logout, current user.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::{Role, UserView};

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserView,
}

/// Self-registration always creates an employee; admins are promoted via
/// the role endpoint or created from the CLI.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserView>), ApiError> {
    if body.username.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::BadRequest(
            "username and password must not be empty".to_string(),
        ));
    }

    let user = state
        .sessions
        .register(&body.username, &body.password, &body.name, Role::Employee)
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (token, user) = state.sessions.login(&body.username, &body.password).await?;
    Ok(Json(LoginResponse { token, user }))
}

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    if let Some(token) = super::bearer_token(&headers) {
        state.sessions.logout(token).await;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// The user behind the current session, 401 when anonymous.
pub async fn current_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserView>, ApiError> {
    let token = super::bearer_token(&headers).ok_or(ApiError::Unauthorized)?;
    let user = state
        .sessions
        .current_user(token)
        .await?
        .ok_or(ApiError::Unauthorized)?;
    Ok(Json(user))
}
