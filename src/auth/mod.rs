use anyhow::anyhow;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    Router,
    routing::{get, post},
};

use crate::{AppResult, AppState};

mod session;
mod signin;
mod signout;
mod signup;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sign_up", post(signup::sign_up))
        .route("/sign_in", post(signin::sign_in))
        .route("/sign_out", get(signout::sign_out))
        .route("/verify_session", get(session::verify_session))
}

pub(crate) fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("hashing password: {e}"))?;
    Ok(hash.to_string())
}

/// `false` for a wrong password and for a stored hash that doesn't parse.
pub(crate) fn verify_password(password: &str, stored: &str) -> bool {
    PasswordHash::new(stored).is_ok_and(|hash| {
        Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok()
    })
}
