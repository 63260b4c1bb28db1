//! User directory service - the in-memory user collection
//!
//! Loaded once from the encrypted store at construction. Every mutation
//! is written back synchronously before the call returns, so a crash
//! right after a successful call cannot lose that write. Owns the login
//! session; at most one user is logged in at a time.

use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info};

use crate::domain::result::{Error, Result};
use crate::domain::{ResetChallenge, Session, User};
use crate::services::credentials;
use crate::services::store::EncryptedUserStore;

struct DirectoryState {
    users: Vec<User>,
    session: Session,
}

/// In-memory user collection backed by the encrypted store
pub struct UserDirectory {
    store: EncryptedUserStore,
    inner: Mutex<DirectoryState>,
}

impl UserDirectory {
    /// Create the directory, loading the user collection from disk
    pub fn new(store: EncryptedUserStore) -> Self {
        let users = store.load();
        debug!(count = users.len(), "loaded user directory");
        Self {
            store,
            inner: Mutex::new(DirectoryState {
                users,
                session: Session::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DirectoryState> {
        // The core runs on a single logical thread; a poisoned lock can
        // only mean a panicked caller, whose partial state is still the
        // best state we have.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a new user
    ///
    /// Rejects an already-taken username (exact, case-sensitive match)
    /// and passwords that fail the policy. The stored record holds only
    /// the salted hash.
    pub fn register(&self, username: &str, password: &str, email: &str) -> Result<()> {
        credentials::validate_password_policy(password)?;

        let mut state = self.lock();
        if state.users.iter().any(|u| u.username == username) {
            return Err(Error::UsernameTaken(username.to_string()));
        }

        let hash = credentials::hash_password(password)?;
        state.users.push(User::new(username, hash, email));
        if let Err(e) = self.store.save(&state.users) {
            // Keep memory and disk in agreement: an unpersisted record
            // must not hold the username until restart
            state.users.pop();
            return Err(e);
        }
        info!(username, "registered new user");
        Ok(())
    }

    /// Log in with username and password
    ///
    /// Unknown usernames and wrong passwords both return
    /// `InvalidCredentials`; the caller learns nothing about which
    /// usernames exist.
    pub fn login(&self, username: &str, password: &str) -> Result<User> {
        let mut state = self.lock();
        let user = state
            .users
            .iter()
            .find(|u| u.username == username)
            .filter(|u| credentials::verify_password(password, &u.password_hash))
            .cloned()
            .ok_or(Error::InvalidCredentials)?;

        state.session.log_in(user.clone());
        info!(username, "password login succeeded");
        Ok(user)
    }

    /// Log the current user out. Idempotent.
    pub fn logout(&self) {
        self.lock().session.log_out();
    }

    /// True if a user is currently logged in
    pub fn is_logged_in(&self) -> bool {
        self.lock().session.is_logged_in()
    }

    /// Snapshot of the currently logged-in user, if any
    pub fn current_user(&self) -> Option<User> {
        self.lock().session.current_user().cloned()
    }

    /// Record a successful face login for `username`
    pub fn complete_face_login(&self, username: &str) -> Result<User> {
        let mut state = self.lock();
        let user = state
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned()
            .ok_or_else(|| Error::UserNotFound(username.to_string()))?;
        state.session.log_in(user.clone());
        info!(username, "face login succeeded");
        Ok(user)
    }

    /// Assign a face id to `username`, or return the existing one
    ///
    /// The id is the user's 1-based position in the directory at
    /// assignment time and stays stable for the lifetime of the
    /// enrollment; re-running enrollment reuses it.
    pub fn assign_face_id(&self, username: &str) -> Result<u32> {
        let mut state = self.lock();
        let position = state
            .users
            .iter()
            .position(|u| u.username == username)
            .ok_or_else(|| Error::UserNotFound(username.to_string()))?;

        if let Some(id) = state.users[position].face_id {
            return Ok(id);
        }

        let id = (position + 1) as u32;
        state.users[position].face_id = Some(id);
        if let Err(e) = self.store.save(&state.users) {
            state.users[position].face_id = None;
            return Err(e);
        }
        info!(username, face_id = id, "assigned face id");
        Ok(id)
    }

    /// Remove the face enrollment for `username`
    pub fn clear_face_id(&self, username: &str) -> Result<()> {
        let mut state = self.lock();
        let position = state
            .users
            .iter()
            .position(|u| u.username == username)
            .ok_or_else(|| Error::UserNotFound(username.to_string()))?;

        let previous = state.users[position].face_id.take();
        if let Err(e) = self.store.save(&state.users) {
            state.users[position].face_id = previous;
            return Err(e);
        }
        info!(username, "cleared face id");
        Ok(())
    }

    /// Number of registered users
    pub fn user_count(&self) -> usize {
        self.lock().users.len()
    }

    /// Snapshot of all users with an enrolled face
    pub fn enrolled_users(&self) -> Vec<User> {
        self.lock()
            .users
            .iter()
            .filter(|u| u.has_face())
            .cloned()
            .collect()
    }

    /// Store a reset challenge on the first user matching `email`
    pub(crate) fn begin_reset(&self, email: &str, challenge: ResetChallenge) -> Result<()> {
        let mut state = self.lock();
        let position = state
            .users
            .iter()
            .position(|u| u.email == email)
            .ok_or(Error::EmailNotFound)?;

        let previous = state.users[position].reset.replace(challenge);
        if let Err(e) = self.store.save(&state.users) {
            state.users[position].reset = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Look at the active reset challenge for `email`, without consuming it
    pub(crate) fn peek_reset(&self, email: &str) -> Option<ResetChallenge> {
        self.lock()
            .users
            .iter()
            .find(|u| u.email == email)
            .and_then(|u| u.reset.clone())
    }

    /// Replace the password hash for `email` and clear the reset pair
    pub(crate) fn apply_password_reset(&self, email: &str, new_hash: String) -> Result<()> {
        let mut state = self.lock();
        let position = state
            .users
            .iter()
            .position(|u| u.email == email)
            .ok_or(Error::EmailNotFound)?;

        let previous_hash =
            std::mem::replace(&mut state.users[position].password_hash, new_hash);
        let previous_reset = state.users[position].reset.take();
        if let Err(e) = self.store.save(&state.users) {
            state.users[position].password_hash = previous_hash;
            state.users[position].reset = previous_reset;
            return Err(e);
        }
        Ok(())
    }
}
