use std::str::FromStr;

use serde::Serialize;
use sqlx::{
    FromRow, Sqlite, SqlitePool, Transaction,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tracing::info;

use crate::{AppError, AppResult};

/// Opens the pool and brings the schema up to date.
pub async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let db_pool = SqlitePoolOptions::new()
        .max_connections(16)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&db_pool).await?;
    info!("database ready at {database_url}");

    Ok(db_pool)
}

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub email: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    pub user_id: i64,
    pub username: String,
    pub nickname: String,
    pub email: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Room {
    pub id: i64,
    pub title: String,
    pub password: Option<String>,
    pub creator_id: i64,
    pub player_count: i64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GameRecord {
    pub result: String,
    pub friend: Option<String>,
    pub played_at: String,
}

pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub nickname: &'a str,
    pub email: &'a str,
}

/// Inserts a user together with its profile. Returns the new user id.
pub async fn create_user(db_pool: &SqlitePool, new_user: NewUser<'_>) -> AppResult<i64> {
    let mut tx = db_pool.begin().await?;

    if sqlx::query("SELECT 1 FROM users WHERE username=?")
        .bind(new_user.username)
        .fetch_optional(&mut *tx)
        .await?
        .is_some()
    {
        return Err(AppError::validation("username already taken"));
    }

    if sqlx::query("SELECT 1 FROM profiles WHERE nickname=?")
        .bind(new_user.nickname)
        .fetch_optional(&mut *tx)
        .await?
        .is_some()
    {
        return Err(AppError::validation("nickname already taken"));
    }

    let user_id = sqlx::query("INSERT INTO users (username,password,email) VALUES (?,?,?)")
        .bind(new_user.username)
        .bind(new_user.password_hash)
        .bind(new_user.email)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

    sqlx::query("INSERT INTO profiles (user_id,nickname) VALUES (?,?)")
        .bind(user_id)
        .bind(new_user.nickname)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(user_id)
}

pub async fn find_user(db_pool: &SqlitePool, username: &str) -> AppResult<Option<User>> {
    Ok(
        sqlx::query_as("SELECT id,username,password,email FROM users WHERE username=?")
            .bind(username)
            .fetch_optional(db_pool)
            .await?,
    )
}

pub async fn find_profile(db_pool: &SqlitePool, username: &str) -> AppResult<Option<Profile>> {
    Ok(sqlx::query_as(
        "SELECT u.id AS user_id,u.username,p.nickname,u.email,p.avatar
         FROM users u JOIN profiles p ON p.user_id=u.id
         WHERE u.username=?",
    )
    .bind(username)
    .fetch_optional(db_pool)
    .await?)
}

/// Applies whichever of `nickname` and `email` are given.
pub async fn update_profile(
    db_pool: &SqlitePool,
    user_id: i64,
    nickname: Option<&str>,
    email: Option<&str>,
) -> AppResult<()> {
    let mut tx = db_pool.begin().await?;

    if let Some(nickname) = nickname {
        sqlx::query("UPDATE profiles SET nickname=? WHERE user_id=?")
            .bind(nickname)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
    }

    if let Some(email) = email {
        sqlx::query("UPDATE users SET email=? WHERE id=?")
            .bind(email)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Points the profile at a new avatar file, handing back the one it replaced.
pub async fn replace_avatar(
    db_pool: &SqlitePool,
    user_id: i64,
    avatar: &str,
) -> AppResult<Option<String>> {
    let mut tx = db_pool.begin().await?;

    let (previous,): (Option<String>,) =
        sqlx::query_as("SELECT avatar FROM profiles WHERE user_id=?")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

    sqlx::query("UPDATE profiles SET avatar=? WHERE user_id=?")
        .bind(avatar)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(previous)
}

pub async fn insert_room(
    tx: &mut Transaction<'_, Sqlite>,
    title: &str,
    password_hash: Option<&str>,
    creator_id: i64,
) -> AppResult<Room> {
    Ok(sqlx::query_as(
        "INSERT INTO rooms (title,password,creator_id) VALUES (?,?,?)
         RETURNING id,title,password,creator_id,player_count",
    )
    .bind(title)
    .bind(password_hash)
    .bind(creator_id)
    .fetch_one(&mut **tx)
    .await?)
}

/// Every room id, oldest first.
pub async fn room_ids(db_pool: &SqlitePool) -> AppResult<Vec<i64>> {
    let ids: Vec<(i64,)> = sqlx::query_as("SELECT id FROM rooms ORDER BY id")
        .fetch_all(db_pool)
        .await?;
    Ok(ids.into_iter().map(|(id,)| id).collect())
}

pub async fn find_room(db_pool: &SqlitePool, room_id: i64) -> AppResult<Option<Room>> {
    Ok(sqlx::query_as(
        "SELECT id,title,password,creator_id,player_count FROM rooms WHERE id=?",
    )
    .bind(room_id)
    .fetch_optional(db_pool)
    .await?)
}

pub async fn record_game(
    db_pool: &SqlitePool,
    user_id: i64,
    friend_id: Option<i64>,
    result: &str,
) -> AppResult<i64> {
    Ok(
        sqlx::query("INSERT INTO game_histories (user_id,friend_id,result) VALUES (?,?,?)")
            .bind(user_id)
            .bind(friend_id)
            .bind(result)
            .execute(db_pool)
            .await?
            .last_insert_rowid(),
    )
}

/// Matches played by `user_id`, newest first.
pub async fn game_history(db_pool: &SqlitePool, user_id: i64) -> AppResult<Vec<GameRecord>> {
    Ok(sqlx::query_as(
        "SELECT g.result,f.username AS friend,g.played_at
         FROM game_histories g LEFT JOIN users f ON f.id=g.friend_id
         WHERE g.user_id=?
         ORDER BY g.id DESC",
    )
    .bind(user_id)
    .fetch_all(db_pool)
    .await?)
}
