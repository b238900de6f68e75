use crate::{
    auth::{DbSession, LoginForm, TokenResponse},
    error::AppError,
    models::{User, UserInput, UserResponse},
    state::AppState,
};
use actix_web::{post, web, HttpResponse, Responder};
use sqlx::Connection;
use validator::Validate;

/// Register a new user
///
/// Creates an account and returns its public view. The password is stored only as a
/// bcrypt hash.
///
/// ## Responses:
/// - `200 OK`: `{ "id": ..., "username": ... }`.
/// - `400 Bad Request`: The username is already registered.
/// - `422 Unprocessable Entity`: The body is malformed or fails validation.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    mut db: DbSession,
    register_data: web::Json<UserInput>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;
    let UserInput { username, password } = register_data.into_inner();

    // Cheap early exit; the unique constraint below still settles races.
    if User::find_by_username(&mut *db, &username).await?.is_some() {
        return Err(AppError::Conflict("Username already registered".into()));
    }

    let hasher = state.hasher.clone();
    let hashed_password = web::block(move || hasher.hash(&password)).await??;

    let mut tx = db.begin().await?;
    let user = User::create(&mut *tx, &username, &hashed_password).await?;
    tx.commit().await?;

    log::info!("registered user id={}", user.id);
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// Login user
///
/// OAuth2 password flow: takes a form-encoded `username` and `password` and returns a
/// bearer access token.
///
/// ## Responses:
/// - `200 OK`: `{ "access_token": ..., "token_type": "bearer" }`.
/// - `401 Unauthorized`: Unknown username or wrong password; the two are not told apart.
/// - `422 Unprocessable Entity`: The form is malformed.
#[post("/token")]
pub async fn login(
    state: web::Data<AppState>,
    mut db: DbSession,
    login_data: web::Form<LoginForm>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;
    let LoginForm {
        username, password, ..
    } = login_data.into_inner();

    let user = User::find_by_username(&mut *db, &username).await?;
    // Nothing else needs the store; hand the connection back before hashing.
    drop(db);

    let hasher = state.hasher.clone();
    let stored_hash = user.as_ref().map(|u| u.hashed_password.clone());
    let verified = web::block(move || match stored_hash {
        Some(hashed) => hasher.verify(&password, &hashed),
        None => {
            hasher.verify_dummy(&password);
            false
        }
    })
    .await?;

    match user {
        Some(user) if verified => {
            let access_token = state.tokens().issue(&user.username)?;
            log::info!("issued access token for user id={}", user.id);
            Ok(HttpResponse::Ok().json(TokenResponse::bearer(access_token)))
        }
        _ => {
            log::info!("rejected login attempt");
            Err(AppError::InvalidCredentials)
        }
    }
}
