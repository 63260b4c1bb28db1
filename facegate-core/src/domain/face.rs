//! Face recognition domain types
//!
//! These types carry data between the external capture/recognition
//! pipeline and the authentication core. The core never looks at pixels;
//! it only consumes per-frame predictions and produces a login outcome.

use serde::{Deserialize, Serialize};

use super::User;

/// One recognizer prediction for one detected face in one frame
///
/// `confidence` follows nearest-neighbor-distance semantics: lower means
/// a better match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub candidate_id: u32,
    pub confidence: f64,
}

impl Prediction {
    pub fn new(candidate_id: u32, confidence: f64) -> Self {
        Self {
            candidate_id,
            confidence,
        }
    }
}

/// Terminal result of a face login session
#[derive(Debug, Clone, PartialEq)]
pub enum FaceLoginOutcome {
    /// A prediction matched an enrolled user under the threshold
    Authenticated(User),
    /// Faces were seen but none matched an enrolled user
    UnknownFace,
    /// The failed-attempt cap was hit before any match
    MaxAttemptsReached,
    /// The stream ended without a single detectable face
    NoFaceDetected,
    /// The user aborted capture
    Cancelled,
}

impl FaceLoginOutcome {
    /// True only for a successful authentication
    pub fn is_authenticated(&self) -> bool {
        matches!(self, FaceLoginOutcome::Authenticated(_))
    }
}

/// A labeled grayscale face region used for model training
#[derive(Debug, Clone)]
pub struct FaceSample {
    /// The enrolled user's face id this sample belongs to
    pub face_id: u32,
    /// Raw image region bytes, as produced by the capture pipeline
    pub data: Vec<u8>,
}

/// An opaque trained recognizer model
///
/// Produced by [`crate::ports::FaceMatcher::train`] and consumed by
/// [`crate::ports::FaceMatcher::predict`]. The core never interprets the
/// bytes or touches the model's on-disk location.
#[derive(Debug, Clone, Default)]
pub struct FaceModel(pub Vec<u8>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_is_authenticated() {
        let user = User::new("alice", "$argon2id$fake", "a@b.com");
        assert!(FaceLoginOutcome::Authenticated(user).is_authenticated());
        assert!(!FaceLoginOutcome::UnknownFace.is_authenticated());
        assert!(!FaceLoginOutcome::MaxAttemptsReached.is_authenticated());
        assert!(!FaceLoginOutcome::NoFaceDetected.is_authenticated());
        assert!(!FaceLoginOutcome::Cancelled.is_authenticated());
    }
}
