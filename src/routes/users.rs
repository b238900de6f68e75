use crate::{auth::AuthSession, models::UserResponse};
use actix_web::{get, HttpResponse, Responder};

/// Returns the account the bearer token resolves to.
#[get("/users/me")]
pub async fn me(session: AuthSession) -> impl Responder {
    HttpResponse::Ok().json(UserResponse::from(session.user))
}
