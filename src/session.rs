use anyhow::anyhow;
use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::{AppError, AppResult};

pub const USER_ID: &str = "user_id";
pub const USERNAME: &str = "username";

pub const NO_SESSION: &str = "not signed in";

/// The user behind the current session. Extracting it rejects with 401
/// when nobody is signed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedIn {
    pub user_id: i64,
    pub username: String,
}

impl SignedIn {
    pub async fn from_session(session: &Session) -> AppResult<Option<Self>> {
        let Some(user_id) = session.get::<i64>(USER_ID).await? else {
            return Ok(None);
        };
        let Some(username) = session.get::<String>(USERNAME).await? else {
            return Ok(None);
        };

        Ok(Some(Self { user_id, username }))
    }

    /// Binds this user to `session` under a fresh session id.
    pub async fn start(&self, session: &Session) -> AppResult<()> {
        session.cycle_id().await?;
        session.insert(USER_ID, self.user_id).await?;
        session.insert(USERNAME, &self.username).await?;
        Ok(())
    }
}

impl<S> FromRequestParts<S> for SignedIn
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::Internal(anyhow!(msg)))?;

        SignedIn::from_session(&session)
            .await?
            .ok_or(AppError::Unauthorized(NO_SESSION))
    }
}
