use axum::{Json, debug_handler};

use crate::{AppResult, session::SignedIn};

use super::signin::SignInResponse;

#[debug_handler]
pub(crate) async fn verify_session(
    SignedIn { username, .. }: SignedIn,
) -> AppResult<Json<SignInResponse>> {
    Ok(Json(SignInResponse { username }))
}
