//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

pub mod credentials;
mod directory;
mod enrollment;
mod face_auth;
mod key_store;
mod reset;
mod store;

pub use directory::UserDirectory;
pub use enrollment::EnrollmentService;
pub use face_auth::{FaceAuthSession, CONFIDENCE_THRESHOLD, MAX_FAILED_ATTEMPTS};
pub use key_store::{KeyStore, KEY_LENGTH};
pub use reset::{email_verification_code, PasswordResetFlow, RESET_CODE_LENGTH, RESET_CODE_TTL_SECS};
pub use store::EncryptedUserStore;
