//! Password hashing and verification.
//!
//! Hashes are argon2id PHC strings (`$argon2id$v=19$...`) with a random salt
//! per call, so hashing the same password twice yields different strings.

use std::fmt;

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash as PhcHash, PasswordHasher, PasswordVerifier, SaltString,
};

/// Errors raised while hashing or parsing stored hashes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordError {
    /// Refused to hash an empty password.
    #[error("password must not be empty")]
    Empty,
    /// The hasher rejected its input or parameters.
    #[error("password hashing failed: {message}")]
    Hashing { message: String },
    /// A stored value was not a PHC hash string.
    #[error("stored password hash is malformed: {message}")]
    Malformed { message: String },
}

/// An encoded password hash as stored alongside a user account.
///
/// `Debug` never prints the hash itself.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a stored PHC string after checking that it parses.
    pub fn parse(encoded: impl Into<String>) -> Result<Self, PasswordError> {
        let encoded = encoded.into();
        PhcHash::new(&encoded).map_err(|err| PasswordError::Malformed {
            message: err.to_string(),
        })?;
        Ok(Self(encoded))
    }

    /// PHC string form.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Hash `plain` with a fresh random salt.
///
/// # Examples
/// ```
/// use backend::domain::{hash_password, verify_password};
///
/// let hash = hash_password("s3cret").expect("hashing succeeds");
/// assert!(verify_password("s3cret", &hash));
/// assert!(!verify_password("guess", &hash));
/// ```
pub fn hash_password(plain: &str) -> Result<PasswordHash, PasswordError> {
    if plain.is_empty() {
        return Err(PasswordError::Empty);
    }
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| PasswordHash(hash.to_string()))
        .map_err(|err| PasswordError::Hashing {
            message: err.to_string(),
        })
}

/// Check `plain` against a stored hash in constant time.
///
/// Any parse or verification failure is reported as a mismatch.
pub fn verify_password(plain: &str, hash: &PasswordHash) -> bool {
    let Ok(parsed) = PhcHash::new(hash.as_str()) else {
        return false;
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}
