//! Credential service - password hashing and policy
//!
//! Pure, stateless operations. Uses Argon2id with a per-password random
//! salt; hashes are stored in PHC string format.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::domain::result::{Error, Result};

/// Hash a plaintext password with a fresh random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::encryption(format!("Password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC hash
///
/// Returns false for a malformed hash rather than erroring; a record with
/// an unparseable hash simply never verifies.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(password_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Validate the password policy for new and reset passwords
///
/// At least 8 characters with one uppercase letter, one lowercase letter
/// and one digit.
pub fn validate_password_policy(password: &str) -> Result<()> {
    if password.chars().count() < 8 {
        return Err(Error::WeakPassword(
            "password must be at least 8 characters long",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(Error::WeakPassword(
            "password must contain at least one uppercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(Error::WeakPassword(
            "password must contain at least one lowercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(Error::WeakPassword(
            "password must contain at least one digit",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Sekret123").unwrap();
        assert_ne!(hash, "Sekret123");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("Sekret123", &hash));
        assert!(!verify_password("sekret123", &hash));
        assert!(!verify_password("", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("Sekret123").unwrap();
        let b = hash_password("Sekret123").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("Sekret123", &a));
        assert!(verify_password("Sekret123", &b));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(!verify_password("Sekret123", "not-a-phc-string"));
        assert!(!verify_password("Sekret123", ""));
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password_policy("Sekret12").is_ok());
        assert!(validate_password_policy("Abc1xyzz").is_ok());

        // too short
        assert!(validate_password_policy("Ab1").is_err());
        // missing uppercase
        assert!(validate_password_policy("sekret123").is_err());
        // missing lowercase
        assert!(validate_password_policy("SEKRET123").is_err());
        // missing digit
        assert!(validate_password_policy("Sekretqq").is_err());
    }
}
