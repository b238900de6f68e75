pub mod extractors;
pub mod identity;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

// Re-export necessary items
pub use extractors::{bearer_token, AuthSession, DbSession};
pub use identity::IdentityResolver;
pub use password::PasswordHasher;
pub use token::{Claims, InvalidToken, TokenService};

/// OAuth2 password flow: the grant type, when sent, must be exactly "password".
fn validate_grant_type(grant_type: &str) -> Result<(), ValidationError> {
    if grant_type == "password" {
        return Ok(());
    }
    let mut err = ValidationError::new("unsupported_grant_type");
    err.message = Some("grant_type must be \"password\"".into());
    Err(err)
}

/// Represents the form body of a `POST /token` request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1))]
    pub username: String,
    /// No byte limit here: an over-long password simply fails verification.
    #[validate(length(min = 1))]
    pub password: String,
    #[validate(custom = "validate_grant_type")]
    pub grant_type: Option<String>,
    /// Accepted for OAuth2 client compatibility; scopes are not used.
    #[serde(default)]
    pub scope: String,
}

/// Response body for a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}
