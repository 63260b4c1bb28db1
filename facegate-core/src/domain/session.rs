//! Login session state
//!
//! One session per directory, created with it and mutated only by
//! login/logout. Holds at most one identity at a time.

use serde::{Deserialize, Serialize};

use super::User;

/// The active login session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    current_user: Option<User>,
}

impl Session {
    /// Create a logged-out session
    pub fn new() -> Self {
        Self::default()
    }

    /// True if a user is currently logged in
    pub fn is_logged_in(&self) -> bool {
        self.current_user.is_some()
    }

    /// The currently logged-in user, if any
    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    /// Record a successful login
    pub fn log_in(&mut self, user: User) {
        self.current_user = Some(user);
    }

    /// Clear the session. Idempotent.
    pub fn log_out(&mut self) {
        self.current_user = None;
    }
}
