use sqlx::SqlitePool;

use crate::auth::{IdentityResolver, PasswordHasher, TokenService};
use crate::config::Config;
use crate::db;
use crate::error::AppError;

/// Shared, read-only application state handed to every worker via `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub hasher: PasswordHasher,
    pub identity: IdentityResolver,
}

impl AppState {
    pub fn new(pool: SqlitePool, hasher: PasswordHasher, tokens: TokenService) -> Self {
        Self {
            pool,
            hasher,
            identity: IdentityResolver::new(tokens),
        }
    }

    /// Connects to the configured database and builds the auth services from `config`.
    pub async fn from_config(config: &Config) -> Result<Self, AppError> {
        let pool = db::connect(&config.database_url, config.database_max_connections).await?;
        let hasher = PasswordHasher::new(config.bcrypt_cost)?;
        Ok(Self::new(pool, hasher, TokenService::from_config(config)))
    }

    pub fn tokens(&self) -> &TokenService {
        self.identity.tokens()
    }
}
