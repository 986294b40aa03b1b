mod list;
mod new;

use axum::{Router, routing::get};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{AppState, db};

pub fn router() -> Router<AppState> {
    Router::new().route("/room", get(list::rooms).post(new::new_room))
}

pub fn cache_key(room_id: i64) -> String {
    format!("room:{room_id}")
}

/// Rooms only ever store this digest, lowercase hex.
pub fn hash_room_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Live state of a room, kept in the cache under [`cache_key`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomState {
    pub room_id: String,
    pub title: String,
    pub is_private: bool,
    pub player_count: i64,
    pub players: Vec<String>,
}

impl From<&db::Room> for RoomState {
    fn from(room: &db::Room) -> Self {
        Self {
            room_id: room.id.to_string(),
            title: room.title.clone(),
            is_private: room.password.is_some(),
            player_count: room.player_count,
            players: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct RoomSummary {
    room_id: String,
    title: String,
    is_private: bool,
    player_count: i64,
}

impl From<RoomState> for RoomSummary {
    fn from(state: RoomState) -> Self {
        Self {
            room_id: state.room_id,
            title: state.title,
            is_private: state.is_private,
            player_count: state.player_count,
        }
    }
}
