use axum::{Json, debug_handler, extract::State};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tower_sessions::Session;
use tracing::info;

use crate::{AppError, AppResult, JsonBody, db, session::SignedIn};

use super::verify_password;

const BAD_CREDENTIALS: &str = "invalid username or password";

#[derive(Debug, Deserialize)]
pub(crate) struct SignInRequest {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SignInResponse {
    pub(crate) username: String,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn sign_in(
    State(db_pool): State<SqlitePool>,
    session: Session,
    JsonBody(SignInRequest { username, password }): JsonBody<SignInRequest>,
) -> AppResult<Json<SignInResponse>> {
    let Some(user) = db::find_user(&db_pool, &username).await? else {
        return Err(AppError::Unauthorized(BAD_CREDENTIALS));
    };

    if !verify_password(&password, &user.password) {
        return Err(AppError::Unauthorized(BAD_CREDENTIALS));
    }

    SignedIn {
        user_id: user.id,
        username: user.username.clone(),
    }
    .start(&session)
    .await?;

    info!("welcome @{}#{}", user.username, user.id);

    Ok(Json(SignInResponse {
        username: user.username,
    }))
}
