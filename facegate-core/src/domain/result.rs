//! Result and error types for the core library

use thiserror::Error;

/// Core library error type
///
/// Login failures are deliberately coarse: `InvalidCredentials` covers
/// unknown usernames and wrong passwords alike, so a caller cannot probe
/// which usernames exist.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Username already exists: {0}")]
    UsernameTaken(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("No account found for that email address")]
    EmailNotFound,

    #[error("Invalid or expired reset code")]
    InvalidOrExpiredCode,

    #[error("Weak password: {0}")]
    WeakPassword(&'static str),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("No user is logged in")]
    NotLoggedIn,

    #[error("Key store error: {0}")]
    KeyStore(String),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("Face model error: {0}")]
    FaceModel(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a key store error
    pub fn key_store(msg: impl Into<String>) -> Self {
        Self::KeyStore(msg.into())
    }

    /// Create an encryption error
    pub fn encryption(msg: impl Into<String>) -> Self {
        Self::Encryption(msg.into())
    }

    /// Create a face model error
    pub fn face_model(msg: impl Into<String>) -> Self {
        Self::FaceModel(msg.into())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_credentials_is_undifferentiated() {
        // Unknown username and wrong password must render identically.
        let unknown = Error::InvalidCredentials;
        let wrong = Error::InvalidCredentials;
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[test]
    fn test_error_display() {
        let err = Error::UsernameTaken("alice".to_string());
        assert_eq!(err.to_string(), "Username already exists: alice");

        let err = Error::key_store("cannot read secret.key");
        assert!(err.to_string().contains("secret.key"));
    }
}
