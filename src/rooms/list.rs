use axum::{Json, debug_handler, extract::State};
use sqlx::SqlitePool;

use crate::{AppResult, cache::SharedCache, db, session::SignedIn};

use super::{RoomState, RoomSummary, cache_key};

/// Rooms whose cache entry is still around, in creation order.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn rooms(
    State(db_pool): State<SqlitePool>,
    State(cache): State<SharedCache>,
    _viewer: SignedIn,
) -> AppResult<Json<Vec<RoomSummary>>> {
    let mut rooms: Vec<RoomSummary> = Vec::new();

    for room_id in db::room_ids(&db_pool).await? {
        let Some(value) = cache.get(&cache_key(room_id)).await? else {
            continue;
        };
        let state: RoomState = serde_json::from_value(value)?;
        rooms.push(state.into());
    }

    Ok(Json(rooms))
}
