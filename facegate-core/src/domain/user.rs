//! User domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An active password-reset challenge
///
/// The code and its expiry always travel together; a `User` either has a
/// complete challenge or none at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetChallenge {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl ResetChallenge {
    /// True if the challenge has not yet expired at `now`
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// A registered user record
///
/// `username` is the directory key (case-sensitive, immutable after
/// creation). `password_hash` is an Argon2id PHC string; the plaintext
/// password is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub registered_at: DateTime<Utc>,
    /// Label the face classifier predicts against. 1-based directory
    /// position at assignment time; unique while assigned.
    #[serde(default)]
    pub face_id: Option<u32>,
    #[serde(default)]
    pub reset: Option<ResetChallenge>,
}

impl User {
    /// Create a new user record with an already-hashed password
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            email: email.into(),
            registered_at: Utc::now(),
            face_id: None,
            reset: None,
        }
    }

    /// True if this user has an enrolled face
    pub fn has_face(&self) -> bool {
        self.face_id.is_some()
    }
}
