//! Face authentication session - per-frame prediction reduction
//!
//! Consumes a stream of recognizer predictions (one per detected face per
//! frame, produced by the external capture pipeline) and reduces it to a
//! single login outcome. Pure given the event stream: no camera, no
//! classifier, no clock. Events are processed one at a time and in
//! temporal order; the session is not reentrant.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::{FaceLoginOutcome, Prediction, User};

/// Recognizer distance below which a prediction counts as a match
///
/// Calibration constant of the classifier in use; lower is better.
pub const CONFIDENCE_THRESHOLD: f64 = 50.0;

/// Unmatched-face observations allowed before the session gives up
pub const MAX_FAILED_ATTEMPTS: u32 = 50;

/// State machine turning per-frame predictions into a login outcome
///
/// Starts searching; terminal states (`Authenticated`, `UnknownFace`,
/// `MaxAttemptsReached`, `NoFaceDetected`, `Cancelled`) absorb all
/// further events.
pub struct FaceAuthSession {
    enrolled: HashMap<u32, User>,
    failed_attempts: u32,
    unmatched_seen: bool,
    outcome: Option<FaceLoginOutcome>,
}

impl FaceAuthSession {
    /// Start a session over a snapshot of enrolled users
    ///
    /// Users without a face id are ignored. The snapshot is fixed for the
    /// session; enrollment changes mid-stream are not observed.
    pub fn new(users: impl IntoIterator<Item = User>) -> Self {
        let enrolled = users
            .into_iter()
            .filter_map(|u| u.face_id.map(|id| (id, u)))
            .collect();
        Self {
            enrolled,
            failed_attempts: 0,
            unmatched_seen: false,
            outcome: None,
        }
    }

    /// Feed one prediction; returns the outcome once the session is terminal
    pub fn observe(&mut self, prediction: Prediction) -> Option<FaceLoginOutcome> {
        if self.outcome.is_some() {
            return self.outcome.clone();
        }

        debug!(
            candidate_id = prediction.candidate_id,
            confidence = prediction.confidence,
            "face prediction"
        );

        if prediction.confidence < CONFIDENCE_THRESHOLD {
            if let Some(user) = self.enrolled.get(&prediction.candidate_id) {
                self.outcome = Some(FaceLoginOutcome::Authenticated(user.clone()));
                return self.outcome.clone();
            }
            // A confident prediction for an id nobody is enrolled under
            // counts as a failure like any other unmatched sighting.
        }
        self.unmatched_seen = true;
        self.failed_attempts += 1;

        if self.failed_attempts >= MAX_FAILED_ATTEMPTS {
            self.outcome = Some(FaceLoginOutcome::MaxAttemptsReached);
        }
        self.outcome.clone()
    }

    /// Abort the session (user cancelled capture)
    ///
    /// A session that already reached a terminal state keeps its outcome.
    pub fn cancel(&mut self) {
        if self.outcome.is_none() {
            self.outcome = Some(FaceLoginOutcome::Cancelled);
        }
    }

    /// Resolve the session after the event stream has ended
    ///
    /// Without a terminal state: seeing any unmatched face yields
    /// `UnknownFace`, otherwise `NoFaceDetected` (the camera never
    /// produced a detectable face).
    pub fn finish(self) -> FaceLoginOutcome {
        if let Some(outcome) = self.outcome {
            return outcome;
        }
        if self.unmatched_seen {
            FaceLoginOutcome::UnknownFace
        } else {
            FaceLoginOutcome::NoFaceDetected
        }
    }

    /// Drive a whole event stream to its outcome
    pub fn resolve(mut self, events: impl IntoIterator<Item = Prediction>) -> FaceLoginOutcome {
        for event in events {
            if let Some(outcome) = self.observe(event) {
                return outcome;
            }
        }
        self.finish()
    }

    /// Unmatched-face observations so far
    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    /// True once the session has reached a terminal state
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enrolled(pairs: &[(&str, u32)]) -> Vec<User> {
        pairs
            .iter()
            .map(|(name, id)| {
                let mut user = User::new(*name, "$argon2id$fake", format!("{name}@example.com"));
                user.face_id = Some(*id);
                user
            })
            .collect()
    }

    #[test]
    fn test_confident_match_authenticates() {
        let session = FaceAuthSession::new(enrolled(&[("alice", 7)]));
        let outcome = session.resolve([Prediction::new(7, 30.0)]);
        match outcome {
            FaceLoginOutcome::Authenticated(user) => assert_eq!(user.username, "alice"),
            other => panic!("expected Authenticated, got {other:?}"),
        }
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // confidence == 50 is not a match
        let mut session = FaceAuthSession::new(enrolled(&[("alice", 7)]));
        assert!(session.observe(Prediction::new(7, 50.0)).is_none());
        assert_eq!(session.failed_attempts(), 1);

        // just under the threshold is
        let outcome = session.observe(Prediction::new(7, 49.9)).unwrap();
        assert!(outcome.is_authenticated());
    }

    #[test]
    fn test_max_attempts_reached() {
        let session = FaceAuthSession::new(enrolled(&[("alice", 7)]));
        let events = std::iter::repeat(Prediction::new(99, 10.0)).take(50);
        assert_eq!(session.resolve(events), FaceLoginOutcome::MaxAttemptsReached);
    }

    #[test]
    fn test_unknown_face_on_stream_end() {
        let session = FaceAuthSession::new(enrolled(&[("alice", 7)]));
        let outcome = session.resolve([Prediction::new(99, 10.0)]);
        assert_eq!(outcome, FaceLoginOutcome::UnknownFace);
    }

    #[test]
    fn test_empty_stream_means_no_face_detected() {
        let session = FaceAuthSession::new(enrolled(&[("alice", 7)]));
        assert_eq!(session.resolve([]), FaceLoginOutcome::NoFaceDetected);
    }

    #[test]
    fn test_match_on_final_attempt_wins() {
        // 49 failures, then a match: authentication beats the cap
        let mut session = FaceAuthSession::new(enrolled(&[("alice", 7)]));
        for _ in 0..49 {
            assert!(session.observe(Prediction::new(99, 10.0)).is_none());
        }
        let outcome = session.observe(Prediction::new(7, 20.0)).unwrap();
        assert!(outcome.is_authenticated());
    }

    #[test]
    fn test_cancel() {
        let mut session = FaceAuthSession::new(enrolled(&[("alice", 7)]));
        session.observe(Prediction::new(99, 10.0));
        session.cancel();
        assert!(session.is_terminal());
        assert_eq!(session.finish(), FaceLoginOutcome::Cancelled);
    }

    #[test]
    fn test_cancel_does_not_override_terminal_state() {
        let mut session = FaceAuthSession::new(enrolled(&[("alice", 7)]));
        session.observe(Prediction::new(7, 20.0));
        session.cancel();
        assert!(session.finish().is_authenticated());
    }

    #[test]
    fn test_terminal_state_absorbs_events() {
        let mut session = FaceAuthSession::new(enrolled(&[("alice", 7)]));
        session.observe(Prediction::new(7, 20.0));
        let attempts_before = session.failed_attempts();

        let outcome = session.observe(Prediction::new(99, 10.0)).unwrap();
        assert!(outcome.is_authenticated());
        assert_eq!(session.failed_attempts(), attempts_before);
    }

    #[test]
    fn test_unenrolled_users_are_ignored() {
        // A user without a face id never matches, whatever the prediction
        let users = vec![User::new("alice", "$argon2id$fake", "a@b.com")];
        let session = FaceAuthSession::new(users);
        let outcome = session.resolve([Prediction::new(0, 1.0)]);
        assert_eq!(outcome, FaceLoginOutcome::UnknownFace);
    }
}
