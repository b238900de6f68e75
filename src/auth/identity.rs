use sqlx::SqliteConnection;

use crate::auth::token::TokenService;
use crate::error::AppError;
use crate::models::User;

/// Turns a bearer token into the stored user it was issued to.
///
/// Stateless between calls: every request validates its token again and reads the user
/// from the store once.
#[derive(Clone)]
pub struct IdentityResolver {
    tokens: TokenService,
}

impl IdentityResolver {
    pub fn new(tokens: TokenService) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Resolves `token` on the caller's request-scoped connection.
    ///
    /// A token that fails validation and a token whose subject no longer exists are
    /// indistinguishable to the caller: both yield `AppError::Unauthenticated`.
    pub async fn resolve(
        &self,
        conn: &mut SqliteConnection,
        token: &str,
    ) -> Result<User, AppError> {
        let username = self.tokens.validate(token)?;

        match User::find_by_username(conn, &username).await? {
            Some(user) => Ok(user),
            None => {
                log::debug!("token subject no longer exists");
                Err(AppError::Unauthenticated)
            }
        }
    }
}
