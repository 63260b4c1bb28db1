//! Face enrollment service - enrollment lifecycle orchestration
//!
//! Ties face-id assignment to classifier retraining. Sample capture and
//! sample storage belong to the presentation layer; this service labels
//! freshly captured regions with the user's face id and invokes
//! [`FaceMatcher::train`] after every assignment or removal, so the
//! trained model never drifts from the directory. The core never touches
//! the model's on-disk location.

use std::sync::Arc;

use tracing::info;

use crate::domain::result::{Error, Result};
use crate::domain::{FaceModel, FaceSample};
use crate::ports::FaceMatcher;
use crate::services::directory::UserDirectory;

/// Orchestrates enrollment changes for the logged-in user
pub struct EnrollmentService {
    directory: Arc<UserDirectory>,
    matcher: Arc<dyn FaceMatcher>,
}

impl EnrollmentService {
    pub fn new(directory: Arc<UserDirectory>, matcher: Arc<dyn FaceMatcher>) -> Self {
        Self { directory, matcher }
    }

    /// Enroll (or re-enroll) the logged-in user's face
    ///
    /// Assigns a face id if the user has none (re-enrollment reuses the
    /// existing id), labels the freshly captured regions with it, and
    /// retrains over those plus the other users' existing samples.
    /// Returns the new model for the caller to persist.
    pub fn enroll(
        &self,
        captured_regions: &[Vec<u8>],
        existing_samples: Vec<FaceSample>,
    ) -> Result<FaceModel> {
        let user = self.directory.current_user().ok_or(Error::NotLoggedIn)?;
        let face_id = self.directory.assign_face_id(&user.username)?;

        let mut samples = existing_samples;
        samples.extend(captured_regions.iter().map(|data| FaceSample {
            face_id,
            data: data.clone(),
        }));

        let model = self.matcher.train(&samples)?;
        info!(
            username = %user.username,
            face_id,
            sample_count = samples.len(),
            "retrained face model after enrollment"
        );
        Ok(model)
    }

    /// Withdraw the logged-in user's face enrollment
    ///
    /// Clears the face id and retrains over the remaining users'
    /// samples. With nobody left enrolled there is nothing to train on
    /// and no model is produced.
    pub fn withdraw(&self, remaining_samples: Vec<FaceSample>) -> Result<Option<FaceModel>> {
        let user = self.directory.current_user().ok_or(Error::NotLoggedIn)?;
        self.directory.clear_face_id(&user.username)?;

        if remaining_samples.is_empty() {
            info!(username = %user.username, "enrollment withdrawn, no samples left to train");
            return Ok(None);
        }

        let model = self.matcher.train(&remaining_samples)?;
        info!(username = %user.username, "retrained face model after withdrawal");
        Ok(Some(model))
    }
}
