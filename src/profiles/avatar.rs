use std::{path::Path as FsPath, sync::Arc};

use axum::{
    body::Bytes,
    debug_handler,
    extract::{Multipart, Path, State, multipart::MultipartRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use sqlx::SqlitePool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{AppError, AppResult, config::Config, db, session::SignedIn};

use super::AVATAR_MAX_BYTES;

const AVATAR_FIELD: &str = "avatar";

/// Image formats accepted as avatars, recognised by their leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ImageKind {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageKind {
    pub(crate) fn sniff(bytes: &[u8]) -> Option<Self> {
        use ImageKind::*;
        match bytes {
            [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, ..] => Some(Png),
            [0xff, 0xd8, 0xff, ..] => Some(Jpeg),
            [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some(Gif),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some(Webp),
            _ => None,
        }
    }

    pub(crate) fn from_file_name(name: &str) -> Option<Self> {
        use ImageKind::*;
        match FsPath::new(name).extension()?.to_str()? {
            "png" => Some(Png),
            "jpg" => Some(Jpeg),
            "gif" => Some(Gif),
            "webp" => Some(Webp),
            _ => None,
        }
    }

    pub(crate) fn extension(self) -> &'static str {
        use ImageKind::*;
        match self {
            Png => "png",
            Jpeg => "jpg",
            Gif => "gif",
            Webp => "webp",
        }
    }

    pub(crate) fn mime(self) -> &'static str {
        use ImageKind::*;
        match self {
            Png => "image/png",
            Jpeg => "image/jpeg",
            Gif => "image/gif",
            Webp => "image/webp",
        }
    }
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn upload_avatar(
    State(db_pool): State<SqlitePool>,
    State(config): State<Arc<Config>>,
    user: SignedIn,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<StatusCode> {
    let mut multipart = multipart.map_err(|e| AppError::validation(e.body_text()))?;

    let mut upload: Option<Bytes> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(AVATAR_FIELD) {
            upload = Some(field.bytes().await?);
            break;
        }
    }
    let Some(bytes) = upload else {
        return Err(AppError::validation("missing avatar file"));
    };

    if bytes.len() > AVATAR_MAX_BYTES {
        return Err(AppError::PayloadTooLarge { max: AVATAR_MAX_BYTES });
    }
    let Some(kind) = ImageKind::sniff(&bytes) else {
        return Err(AppError::validation("avatar must be a PNG, JPEG, GIF or WebP image"));
    };

    let dir = config.avatar_dir();
    tokio::fs::create_dir_all(&dir).await?;

    let file_name = format!("{}.{}", Uuid::now_v7().simple(), kind.extension());
    let path = dir.join(&file_name);
    tokio::fs::write(&path, &bytes).await?;

    let previous = match db::replace_avatar(&db_pool, user.user_id, &file_name).await {
        Ok(previous) => previous,
        Err(e) => {
            let _ = tokio::fs::remove_file(&path).await;
            return Err(e);
        }
    };

    if let Some(previous) = previous {
        if let Err(e) = tokio::fs::remove_file(dir.join(&previous)).await {
            warn!("could not remove old avatar {previous}: {e}");
        }
    }

    info!("@{} uploaded avatar {file_name} ({} bytes)", user.username, bytes.len());
    Ok(StatusCode::NO_CONTENT)
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn my_avatar(
    State(db_pool): State<SqlitePool>,
    State(config): State<Arc<Config>>,
    user: SignedIn,
) -> AppResult<Response> {
    serve_avatar(&db_pool, &config, &user.username).await
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn avatar(
    Path(username): Path<String>,
    State(db_pool): State<SqlitePool>,
    State(config): State<Arc<Config>>,
    _viewer: SignedIn,
) -> AppResult<Response> {
    serve_avatar(&db_pool, &config, &username).await
}

async fn serve_avatar(
    db_pool: &SqlitePool,
    config: &Config,
    username: &str,
) -> AppResult<Response> {
    let Some(file_name) = db::find_profile(db_pool, username)
        .await?
        .and_then(|profile| profile.avatar)
    else {
        return Err(AppError::NotFound("avatar"));
    };
    let Some(kind) = ImageKind::from_file_name(&file_name) else {
        return Err(anyhow::anyhow!("stored avatar {file_name} has no known extension").into());
    };

    let bytes = match tokio::fs::read(config.avatar_dir().join(&file_name)).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound("avatar"));
        }
        Err(e) => return Err(e.into()),
    };

    Ok(([(header::CONTENT_TYPE, kind.mime())], bytes).into_response())
}
