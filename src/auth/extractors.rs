use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, Error as ActixError, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqliteConnection};
use std::ops::{Deref, DerefMut};

use crate::error::AppError;
use crate::models::User;
use crate::state::AppState;

/// Reads the token out of an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively. Any other scheme, or an empty token, yields
/// `None`.
pub fn bearer_token(req: &HttpRequest) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

fn app_state(req: &HttpRequest) -> Result<web::Data<AppState>, AppError> {
    req.app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| AppError::InternalServerError("AppState is not registered".into()))
}

/// A database connection held for the lifetime of one request.
///
/// The connection returns to the pool when the value is dropped, whichever way the
/// handler exits.
pub struct DbSession(PoolConnection<Sqlite>);

impl DbSession {
    pub async fn acquire(state: &AppState) -> Result<Self, AppError> {
        Ok(DbSession(state.pool.acquire().await?))
    }
}

impl Deref for DbSession {
    type Target = SqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DbSession {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl FromRequest for DbSession {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = app_state(req);
        Box::pin(async move {
            let state = state?;
            let session = DbSession::acquire(&state).await?;
            Ok::<_, ActixError>(session)
        })
    }
}

/// The authenticated caller together with the connection used to resolve them.
///
/// Handlers on protected routes take this as a parameter; the token is checked before
/// any connection is taken, and the same connection then serves the handler's queries.
pub struct AuthSession {
    pub user: User,
    pub db: DbSession,
}

impl FromRequest for AuthSession {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let state = app_state(req);
        Box::pin(async move {
            let token = token.ok_or(AppError::Unauthenticated)?;
            let state = state?;
            let mut db = DbSession::acquire(&state).await?;
            let user = state.identity.resolve(&mut db, &token).await?;
            Ok::<_, ActixError>(AuthSession { user, db })
        })
    }
}
