use std::sync::Arc;

use axum::{Json, debug_handler, extract::State, http::StatusCode};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::{
    AppError, AppResult, JsonBody, cache::SharedCache, config::Config, db, session::SignedIn,
};

use super::{RoomState, RoomSummary, cache_key, hash_room_password};

#[derive(Debug, Deserialize)]
pub(crate) struct NewRoomRequest {
    title: String,
    password: Option<String>,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn new_room(
    State(db_pool): State<SqlitePool>,
    State(cache): State<SharedCache>,
    State(config): State<Arc<Config>>,
    user: SignedIn,
    JsonBody(NewRoomRequest { title, password }): JsonBody<NewRoomRequest>,
) -> AppResult<(StatusCode, Json<RoomSummary>)> {
    if title.trim().is_empty() {
        return Err(AppError::validation("title must not be blank"));
    }

    let password_hash = password
        .as_deref()
        .filter(|password| !password.is_empty())
        .map(hash_room_password);

    let mut tx = db_pool.begin().await?;
    let room = db::insert_room(&mut tx, &title, password_hash.as_deref(), user.user_id).await?;

    // the row only commits once its cache entry exists
    let state = RoomState::from(&room);
    let key = cache_key(room.id);
    cache
        .set(&key, serde_json::to_value(&state)?, config.room_cache_ttl)
        .await?;

    if let Err(e) = tx.commit().await {
        if let Err(cache_err) = cache.delete(&key).await {
            warn!("could not drop {key} after failed commit: {cache_err}");
        }
        return Err(e.into());
    }

    info!("@{} opened {key} {:?} (private: {})", user.username, state.title, state.is_private);

    Ok((StatusCode::CREATED, Json(state.into())))
}
