use axum::{
    Json, debug_handler,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;

use crate::{AppError, AppResult, JsonBody, db, session::SignedIn};

#[derive(Debug, Serialize)]
pub(crate) struct ProfileResponse {
    username: String,
    nickname: String,
    /// Only shown to the profile's owner.
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileUpdate {
    nickname: Option<String>,
    email: Option<String>,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn profile(
    Path(username): Path<String>,
    State(db_pool): State<SqlitePool>,
    viewer: SignedIn,
) -> AppResult<Json<ProfileResponse>> {
    let Some(profile) = db::find_profile(&db_pool, &username).await? else {
        return Err(AppError::NotFound("profile"));
    };

    let avatar = profile
        .avatar
        .as_ref()
        .map(|_| format!("/api/avatar/{}", profile.username));
    let email = (viewer.username == profile.username).then_some(profile.email);

    Ok(Json(ProfileResponse {
        username: profile.username,
        nickname: profile.nickname,
        email,
        avatar,
    }))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn edit_profile(
    Path(username): Path<String>,
    State(db_pool): State<SqlitePool>,
    user: SignedIn,
    JsonBody(ProfileUpdate { nickname, email }): JsonBody<ProfileUpdate>,
) -> AppResult<StatusCode> {
    if user.username != username {
        return Err(AppError::Forbidden("cannot edit another user's profile"));
    }

    for (field, value) in [("nickname", &nickname), ("email", &email)] {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err(AppError::validation(format!("{field} must not be blank")));
        }
    }

    db::update_profile(&db_pool, user.user_id, nickname.as_deref(), email.as_deref()).await?;
    info!("@{username} updated their profile");

    Ok(StatusCode::NO_CONTENT)
}
