//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod face;
pub mod result;
mod session;
mod user;

pub use face::{FaceLoginOutcome, FaceModel, FaceSample, Prediction};
pub use session::Session;
pub use user::{ResetChallenge, User};
