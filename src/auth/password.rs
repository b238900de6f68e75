use crate::error::AppError;
use bcrypt::{hash, verify};
use validator::ValidationError;

/// bcrypt only reads this many bytes of its input; anything after is silently ignored.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Field validator for passwords. Counts bytes, not characters.
pub fn validate_password_bytes(password: &str) -> Result<(), ValidationError> {
    if password.len() > MAX_PASSWORD_BYTES {
        let mut err = ValidationError::new("password_too_long");
        err.message = Some("Password must be at most 72 bytes".into());
        return Err(err);
    }
    Ok(())
}

/// Salted bcrypt hashing for user passwords.
///
/// Both operations are CPU-bound and intentionally slow; call them through
/// `actix_web::web::block` from request handlers.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    /// Hash of a throwaway password, verified against when the username is unknown.
    dummy_hash: String,
}

impl PasswordHasher {
    /// `cost` must lie in bcrypt's accepted range (4..=31); `Config` enforces this.
    pub fn new(cost: u32) -> Result<Self, AppError> {
        let dummy_hash = hash("taskvault-dummy-password", cost)?;
        Ok(Self { cost, dummy_hash })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Refuses passwords bcrypt would truncate.
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(AppError::ValidationError(
                "Password must be at most 72 bytes".into(),
            ));
        }
        hash(password, self.cost)
            .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
    }

    /// Returns `false` on mismatch, on a stored hash bcrypt cannot parse, and on a
    /// password too long to have been hashed in the first place.
    pub fn verify(&self, password: &str, hashed_password: &str) -> bool {
        if password.len() > MAX_PASSWORD_BYTES {
            return false;
        }
        match verify(password, hashed_password) {
            Ok(matches) => matches,
            Err(e) => {
                log::warn!("stored password hash could not be verified: {}", e);
                false
            }
        }
    }

    /// Spends the same work as a real verification. The outcome is discarded.
    pub fn verify_dummy(&self, password: &str) {
        let _ = verify(password, &self.dummy_hash);
    }
}
