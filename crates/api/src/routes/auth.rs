//! Registration and login handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use ecom_core::{Email, UserId};

use crate::error::Result;
use crate::services::auth::{AuthService, Registration};
use crate::state::AppState;

/// Body of `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: UserId,
    pub email: Email,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub user_id: String,
    pub token: String,
}

/// Create an account.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Registration>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let Json(registration) = payload?;

    let user = AuthService::new(state.users(), state.jwt())
        .register(&registration)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id,
            email: user.email,
        }),
    ))
}

/// Exchange email and password for an access token.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let Json(request) = payload?;

    let (user, token) = AuthService::new(state.users(), state.jwt())
        .login(&request.email, &request.password)
        .await?;

    tracing::info!(user_id = %user.id, "user logged in");
    Ok(Json(LoginResponse {
        message: "login successful",
        user_id: user.id.to_string(),
        token,
    }))
}
