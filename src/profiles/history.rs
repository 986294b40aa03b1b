use axum::{
    Json, debug_handler,
    extract::{Path, State},
};
use sqlx::SqlitePool;

use crate::{AppError, AppResult, db, session::SignedIn};

#[debug_handler(state = crate::AppState)]
pub(crate) async fn history(
    Path(username): Path<String>,
    State(db_pool): State<SqlitePool>,
    _viewer: SignedIn,
) -> AppResult<Json<Vec<db::GameRecord>>> {
    let Some(user) = db::find_user(&db_pool, &username).await? else {
        return Err(AppError::NotFound("user"));
    };

    Ok(Json(db::game_history(&db_pool, user.id).await?))
}
