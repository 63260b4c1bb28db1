//! Password reset service - reset-code lifecycle
//!
//! Per-user state machine keyed by email: no request, code issued, then
//! consumed or expired. Codes expire 300 seconds after issue; expiry is
//! enforced lazily at verification time, so an expired unconsumed code
//! simply sits on the record until overwritten or consumed.
//!
//! No email transport lives here. Issued codes are returned to the caller
//! for out-of-band delivery.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::Rng;
use tracing::info;

use crate::domain::result::{Error, Result};
use crate::domain::ResetChallenge;
use crate::services::credentials;
use crate::services::directory::UserDirectory;

/// Reset code length in characters
pub const RESET_CODE_LENGTH: usize = 6;

/// Reset code lifetime
pub const RESET_CODE_TTL_SECS: i64 = 300;

const RESET_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Issues, verifies and consumes password reset codes
pub struct PasswordResetFlow {
    directory: Arc<UserDirectory>,
}

impl PasswordResetFlow {
    pub fn new(directory: Arc<UserDirectory>) -> Self {
        Self { directory }
    }

    /// Issue a reset code for the first user matching `email`
    ///
    /// Stores the code/expiry pair on the record and returns the code to
    /// the caller for delivery. A repeat request overwrites any earlier
    /// challenge.
    pub fn request_reset(&self, email: &str) -> Result<String> {
        let code = generate_reset_code();
        let challenge = ResetChallenge {
            code: code.clone(),
            expires_at: Utc::now() + Duration::seconds(RESET_CODE_TTL_SECS),
        };
        self.directory.begin_reset(email, challenge)?;
        info!(email, "issued password reset code");
        Ok(code)
    }

    /// Check a reset code without consuming it
    ///
    /// True only for the exact issued code before its expiry. Idempotent
    /// and side-effect-free, so a UI can pre-check before prompting for
    /// the new password.
    pub fn verify_code(&self, email: &str, code: &str) -> bool {
        self.directory
            .peek_reset(email)
            .is_some_and(|challenge| challenge.code == code && challenge.is_live(Utc::now()))
    }

    /// Consume a valid reset code and replace the password
    ///
    /// The code is re-verified here rather than trusting the caller to
    /// have called [`verify_code`](Self::verify_code) first; a caller
    /// that skips verification cannot reset without a live code. On
    /// success the code/expiry pair is cleared with the hash update as
    /// one persisted write.
    pub fn reset_password(&self, email: &str, code: &str, new_password: &str) -> Result<()> {
        if !self.verify_code(email, code) {
            return Err(Error::InvalidOrExpiredCode);
        }
        credentials::validate_password_policy(new_password)?;

        let new_hash = credentials::hash_password(new_password)?;
        self.directory.apply_password_reset(email, new_hash)?;
        info!(email, "password reset completed");
        Ok(())
    }
}

/// Generate a random uppercase-alphanumeric reset code
fn generate_reset_code() -> String {
    let mut rng = rand::thread_rng();
    (0..RESET_CODE_LENGTH)
        .map(|_| RESET_CODE_CHARSET[rng.gen_range(0..RESET_CODE_CHARSET.len())] as char)
        .collect()
}

/// Generate a 6-digit email verification code for registration
///
/// Comparison against the user's input happens in the presentation
/// layer, matching the registration flow's out-of-band delivery.
pub fn email_verification_code() -> String {
    let mut rng = rand::thread_rng();
    (0..6).map(|_| rng.gen_range(b'0'..=b'9') as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::key_store::KEY_LENGTH;
    use crate::services::store::EncryptedUserStore;
    use tempfile::tempdir;

    fn setup(dir: &std::path::Path) -> (Arc<UserDirectory>, PasswordResetFlow) {
        let store = EncryptedUserStore::new(dir.join("users.dat"), &[5u8; KEY_LENGTH]);
        let directory = Arc::new(UserDirectory::new(store));
        directory
            .register("alice", "Sekret123", "a@b.com")
            .unwrap();
        let flow = PasswordResetFlow::new(Arc::clone(&directory));
        (directory, flow)
    }

    #[test]
    fn test_code_format() {
        let code = generate_reset_code();
        assert_eq!(code.len(), RESET_CODE_LENGTH);
        assert!(code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));

        let digits = email_verification_code();
        assert_eq!(digits.len(), 6);
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_request_and_verify() {
        let dir = tempdir().unwrap();
        let (_directory, flow) = setup(dir.path());

        let code = flow.request_reset("a@b.com").unwrap();
        assert!(flow.verify_code("a@b.com", &code));
        // Verification does not consume the code
        assert!(flow.verify_code("a@b.com", &code));
        assert!(!flow.verify_code("a@b.com", "WRONG1"));
        assert!(!flow.verify_code("other@b.com", &code));
    }

    #[test]
    fn test_request_unknown_email() {
        let dir = tempdir().unwrap();
        let (_directory, flow) = setup(dir.path());

        let err = flow.request_reset("nobody@b.com").unwrap_err();
        assert!(matches!(err, Error::EmailNotFound));
    }

    #[test]
    fn test_expired_code_fails_verification() {
        let dir = tempdir().unwrap();
        let (directory, flow) = setup(dir.path());

        directory
            .begin_reset(
                "a@b.com",
                ResetChallenge {
                    code: "AAAAAA".to_string(),
                    expires_at: Utc::now() - Duration::seconds(1),
                },
            )
            .unwrap();

        assert!(!flow.verify_code("a@b.com", "AAAAAA"));
        let err = flow
            .reset_password("a@b.com", "AAAAAA", "Fresh123")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOrExpiredCode));
    }

    #[test]
    fn test_reset_password_rotates_hash_and_clears_pair() {
        let dir = tempdir().unwrap();
        let (directory, flow) = setup(dir.path());

        let code = flow.request_reset("a@b.com").unwrap();
        flow.reset_password("a@b.com", &code, "Fresh123").unwrap();

        // Old password out, new one in
        assert!(directory.login("alice", "Sekret123").is_err());
        directory.login("alice", "Fresh123").unwrap();

        // Challenge pair is gone; the consumed code no longer verifies
        assert!(directory.peek_reset("a@b.com").is_none());
        assert!(!flow.verify_code("a@b.com", &code));
    }

    #[test]
    fn test_reset_password_requires_live_code() {
        let dir = tempdir().unwrap();
        let (directory, flow) = setup(dir.path());

        flow.request_reset("a@b.com").unwrap();
        let err = flow
            .reset_password("a@b.com", "BOGUS1", "Fresh123")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOrExpiredCode));

        // Password unchanged
        directory.login("alice", "Sekret123").unwrap();
    }

    #[test]
    fn test_reset_password_enforces_policy() {
        let dir = tempdir().unwrap();
        let (_directory, flow) = setup(dir.path());

        let code = flow.request_reset("a@b.com").unwrap();
        let err = flow.reset_password("a@b.com", &code, "weak").unwrap_err();
        assert!(matches!(err, Error::WeakPassword(_)));
        // The code survives a rejected password and can still be used
        assert!(flow.verify_code("a@b.com", &code));
    }

    #[test]
    fn test_failed_save_keeps_old_password() {
        let dir = tempdir().unwrap();
        let (directory, flow) = setup(dir.path());
        let code = flow.request_reset("a@b.com").unwrap();

        // A directory at the store path makes every save fail
        let store_path = dir.path().join("users.dat");
        std::fs::remove_file(&store_path).unwrap();
        std::fs::create_dir(&store_path).unwrap();

        assert!(flow.reset_password("a@b.com", &code, "Fresh123").is_err());

        // Memory still agrees with disk: old password in, new one out
        directory.login("alice", "Sekret123").unwrap();
        assert!(directory.login("alice", "Fresh123").is_err());
    }

    #[test]
    fn test_new_request_overwrites_previous_code() {
        let dir = tempdir().unwrap();
        let (_directory, flow) = setup(dir.path());

        let first = flow.request_reset("a@b.com").unwrap();
        let second = flow.request_reset("a@b.com").unwrap();

        assert!(flow.verify_code("a@b.com", &second));
        if first != second {
            assert!(!flow.verify_code("a@b.com", &first));
        }
    }
}
