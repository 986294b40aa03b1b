use axum::{Json, debug_handler, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;

use crate::{
    AppError, AppResult, JsonBody,
    db::{self, NewUser},
};

use super::hash_password;

#[derive(Debug, Deserialize)]
pub(crate) struct SignUpRequest {
    username: String,
    password: String,
    nickname: String,
    email: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SignUpResponse {
    username: String,
    nickname: String,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn sign_up(
    State(db_pool): State<SqlitePool>,
    JsonBody(req): JsonBody<SignUpRequest>,
) -> AppResult<(StatusCode, Json<SignUpResponse>)> {
    for (field, value) in [
        ("username", &req.username),
        ("password", &req.password),
        ("nickname", &req.nickname),
        ("email", &req.email),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::validation(format!("{field} must not be blank")));
        }
    }

    let password_hash = hash_password(&req.password)?;
    let user_id = db::create_user(
        &db_pool,
        NewUser {
            username: &req.username,
            password_hash: &password_hash,
            nickname: &req.nickname,
            email: &req.email,
        },
    )
    .await?;

    info!("signed up @{}#{user_id}", req.username);

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            username: req.username,
            nickname: req.nickname,
        }),
    ))
}
