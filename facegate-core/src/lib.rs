//! FaceGate Core - Authentication and persistence logic
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (User, Session, face-auth types)
//! - **ports**: Trait definitions for external dependencies (FaceMatcher)
//! - **services**: Business logic orchestration
//!
//! Presentation concerns (windowing, capture loops, widget wiring) live
//! outside this crate and call in through [`FacegateContext`].

pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use config::Config;
use ports::FaceMatcher;
use services::{
    EncryptedUserStore, EnrollmentService, FaceAuthSession, KeyStore, PasswordResetFlow,
    UserDirectory,
};

// Re-export commonly used types at crate root
pub use domain::result::{Error, Result};
pub use domain::{FaceLoginOutcome, FaceModel, FaceSample, Prediction, ResetChallenge, User};

/// Main context for FaceGate operations
///
/// This is the primary entry point for all business logic. It holds the
/// configuration, the user directory with its login session, and the
/// password reset flow. Construction is fatal if the encryption key
/// cannot be obtained; a store that fails to decrypt is reset instead.
pub struct FacegateContext {
    pub config: Config,
    pub directory: Arc<UserDirectory>,
    pub reset_flow: PasswordResetFlow,
}

impl FacegateContext {
    /// Create a new FaceGate context rooted at `data_dir`
    pub fn new(data_dir: &Path) -> Result<Self> {
        let config = Config::load(data_dir)?;

        let key_store = KeyStore::new(config.key_path(), config.legacy_key_path());
        let key = key_store.load_or_create()?;

        let store = EncryptedUserStore::new(config.store_path(), &key);
        let directory = Arc::new(UserDirectory::new(store));
        let reset_flow = PasswordResetFlow::new(Arc::clone(&directory));

        Ok(Self {
            config,
            directory,
            reset_flow,
        })
    }

    /// Create an enrollment service bound to the given matcher
    pub fn enrollment(&self, matcher: Arc<dyn FaceMatcher>) -> EnrollmentService {
        EnrollmentService::new(Arc::clone(&self.directory), matcher)
    }

    /// Start a face login session over the current enrollment snapshot
    pub fn face_auth_session(&self) -> FaceAuthSession {
        FaceAuthSession::new(self.directory.enrolled_users())
    }
}
