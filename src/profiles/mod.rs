mod avatar;
mod history;
mod page;

use axum::{Router, extract::DefaultBodyLimit, routing::get};

use crate::AppState;

/// Largest avatar accepted, in bytes.
pub const AVATAR_MAX_BYTES: usize = 2_000_000;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile/{username}", get(page::profile).put(page::edit_profile))
        .route(
            "/avatar",
            get(avatar::my_avatar)
                .post(avatar::upload_avatar)
                // leave room for multipart framing so the handler sees oversized files itself
                .layer(DefaultBodyLimit::max(AVATAR_MAX_BYTES * 2)),
        )
        .route("/avatar/{username}", get(avatar::avatar))
        .route("/history/{username}", get(history::history))
}
