//! FaceMatcher port - face recognition abstraction
//!
//! The detection and embedding algorithms live outside the core. The core
//! depends only on this trait: given labeled samples it gets back an
//! opaque model, and given a model plus an image region it gets back a
//! `(candidate_id, confidence)` prediction.

use crate::domain::result::Result;
use crate::domain::{FaceModel, FaceSample, Prediction};

/// Face recognition capability supplied by the presentation layer
///
/// Implementations own the classifier and any model persistence; the core
/// only invokes retraining after enrollment changes and consumes
/// predictions during face login.
pub trait FaceMatcher: Send + Sync {
    /// Train a model from labeled face samples
    fn train(&self, samples: &[FaceSample]) -> Result<FaceModel>;

    /// Predict the closest enrolled identity for an image region
    ///
    /// Lower confidence means a better match (nearest-neighbor distance).
    fn predict(&self, model: &FaceModel, region: &[u8]) -> Result<Prediction>;
}
