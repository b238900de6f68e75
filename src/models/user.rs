use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Sqlite};
use validator::Validate;

use crate::auth::password::validate_password_bytes;
use crate::error::AppError;

lazy_static! {
    // Usernames are matched case-sensitively and verbatim, so whitespace is refused outright.
    static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^\S+$").unwrap();
}

/// A registered account. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub hashed_password: String,
}

/// Public view of a user, returned by `/register` and `/users/me`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

/// Registration payload.
#[derive(Debug, Deserialize, Validate)]
pub struct UserInput {
    #[validate(
        length(min = 1, max = 64),
        regex(path = "USERNAME_REGEX", message = "Username must not contain whitespace")
    )]
    pub username: String,
    /// bcrypt only reads the first 72 bytes of its input, so the limit is in bytes.
    #[validate(length(min = 1), custom = "validate_password_bytes")]
    pub password: String,
}

impl User {
    pub async fn find_by_username<'e, E>(
        executor: E,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, User>(
            "SELECT id, username, hashed_password FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(executor)
        .await
    }

    /// Inserts a new user. A taken username surfaces as `AppError::Conflict`.
    pub async fn create<'e, E>(
        executor: E,
        username: &str,
        hashed_password: &str,
    ) -> Result<User, AppError>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (username, hashed_password) VALUES (?, ?)
             RETURNING id, username, hashed_password",
        )
        .bind(username)
        .bind(hashed_password)
        .fetch_one(executor)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("Username already registered".into())
            }
            other => AppError::from(other),
        })
    }
}
