//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every failure a handler can produce ends up as one of its variants, from request
//! validation through credential checks to store errors.
//!
//! `AppError` implements `actix_web::error::ResponseError` so handlers can return it
//! directly. Authentication failures are deliberately coarse: callers learn that a login
//! or a token was rejected, never why. Store and internal failures are logged with their
//! detail and answered with a generic body.

use actix_web::{
    error::{BlockingError, ResponseError},
    http::{header, StatusCode},
    HttpResponse,
};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::auth::token::InvalidToken;

/// Message returned for every rejected bearer token.
pub const UNAUTHENTICATED_MESSAGE: &str = "Could not validate credentials";
/// Message returned for every rejected login.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Incorrect username or password";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// The request body, form or query could not be parsed or failed validation (HTTP 422).
    ValidationError(String),
    /// The request clashes with existing state, e.g. a taken username (HTTP 400).
    Conflict(String),
    /// Login with an unknown username or a wrong password (HTTP 401).
    InvalidCredentials,
    /// Missing, malformed, expired or otherwise unusable bearer token, or a token whose
    /// subject no longer exists (HTTP 401 with a `WWW-Authenticate: Bearer` challenge).
    Unauthenticated,
    /// An unexpected server-side error (HTTP 500).
    InternalServerError(String),
    /// An error originating from database operations (HTTP 500).
    DatabaseError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::InvalidCredentials => write!(f, "Unauthorized: {}", INVALID_CREDENTIALS_MESSAGE),
            AppError::Unauthenticated => write!(f, "Unauthorized: {}", UNAUTHENTICATED_MESSAGE),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::ValidationError(msg) => HttpResponse::UnprocessableEntity().json(json!({
                "error": msg
            })),
            AppError::Conflict(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::InvalidCredentials => HttpResponse::Unauthorized().json(json!({
                "error": INVALID_CREDENTIALS_MESSAGE
            })),
            AppError::Unauthenticated => HttpResponse::Unauthorized()
                .insert_header((header::WWW_AUTHENTICATE, "Bearer"))
                .json(json!({
                    "error": UNAUTHENTICATED_MESSAGE
                })),
            // Internal details go to the log, never to the client.
            AppError::InternalServerError(msg) => {
                log::error!("internal error: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "error": "Internal server error"
                }))
            }
            AppError::DatabaseError(msg) => {
                log::error!("database error: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "error": "Internal server error"
                }))
            }
        }
    }
}

/// Converts `sqlx::Error` into `AppError::DatabaseError`.
///
/// Constraint violations that carry domain meaning (duplicate usernames) are mapped by
/// the store functions themselves before reaching this conversion.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        AppError::DatabaseError(error.to_string())
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
///
/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(format!("password hashing failed: {}", error))
    }
}

/// A blocking task (password hashing) was cancelled or panicked.
impl From<BlockingError> for AppError {
    fn from(error: BlockingError) -> AppError {
        AppError::InternalServerError(format!("blocking task failed: {}", error))
    }
}

impl From<InvalidToken> for AppError {
    fn from(_: InvalidToken) -> AppError {
        AppError::Unauthenticated
    }
}
