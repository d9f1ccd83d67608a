//! Contributor sessions: prompt scheduling plus the submission lifecycle.
//!
//! A session owns its username, its digit sequence, and the current prompt,
//! so concurrent sessions (or test runs) cannot interfere through shared
//! state. Persisting a submission is a two-step write against the store:
//! the counter increment happens first, and a failed append is compensated
//! by decrementing again, so callers can treat a reported failure as
//! "nothing was persisted".

use chrono::Utc;
use log::{info, warn};

use crate::canvas::StrokeSurface;
use crate::canvas::rasterize::rasterize;
use crate::error::{CollectError, CollectResult};
use crate::model::{NewSample, StoredSample};
use crate::sequence::DigitSequence;
use crate::store::SampleStore;

/// One contributor's active drawing session.
pub struct Session<'a> {
    store: &'a dyn SampleStore,
    username: String,
    sequence: DigitSequence,
    current_digit: u8,
}

impl<'a> Session<'a> {
    /// Starts a session: validates the username and draws the first prompt.
    pub fn start(store: &'a dyn SampleStore, username: &str) -> CollectResult<Self> {
        let username = username.trim();
        if username.is_empty() {
            return Err(CollectError::Validation(
                "username must not be empty".to_string(),
            ));
        }

        let mut sequence = DigitSequence::start();
        let current_digit = sequence.next_digit();
        Ok(Self {
            store,
            username: username.to_string(),
            sequence,
            current_digit,
        })
    }

    /// The session's contributor name.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The digit the contributor is currently asked to draw.
    pub fn current_digit(&self) -> u8 {
        self.current_digit
    }

    /// Rasterizes the surface and submits it for the current prompt.
    ///
    /// Rejects an empty canvas before rasterization is attempted.
    pub fn submit_surface(&mut self, surface: &StrokeSurface) -> CollectResult<StoredSample> {
        if !surface.has_ink() {
            return Err(CollectError::EmptyCanvas);
        }
        self.submit_and_advance(rasterize(surface.raster()))
    }

    /// Persists `pixels` as a sample for the current digit, then advances
    /// the prompt.
    ///
    /// Write order is increment-then-append; a failed append triggers a
    /// compensating decrement so the counter never counts a sample that was
    /// not stored. Validation failures reject before any store mutation.
    pub fn submit_and_advance(&mut self, pixels: Vec<u8>) -> CollectResult<StoredSample> {
        crate::model::validate_sample(&self.username, self.current_digit, &pixels)?;

        self.store.increment_or_create_user(&self.username)?;

        let sample = NewSample {
            username: self.username.clone(),
            digit: self.current_digit,
            pixels,
            captured_at: Utc::now(),
        };
        match self.store.append(sample) {
            Ok(stored) => {
                info!(
                    "stored digit {} for {} (sample {})",
                    stored.digit, self.username, stored.id
                );
                self.current_digit = self.sequence.next_digit();
                Ok(stored)
            }
            Err(err) => {
                if let Err(comp) = self.store.decrement_user(&self.username) {
                    // Counter drift stays repairable via reconcile().
                    warn!(
                        "compensating decrement for {} failed: {}",
                        self.username, comp
                    );
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PIXEL_COUNT, UserRecord};
    use crate::store::MemoryStore;
    use std::collections::HashMap;

    #[test]
    fn test_start_rejects_blank_username() {
        let store = MemoryStore::new();
        assert!(Session::start(&store, "  ").is_err());
    }

    #[test]
    fn test_start_trims_username() {
        let store = MemoryStore::new();
        let session = Session::start(&store, "  alice ").unwrap();
        assert_eq!(session.username(), "alice");
    }

    #[test]
    fn test_counter_tracks_submissions() {
        let store = MemoryStore::new();
        let mut session = Session::start(&store, "alice").unwrap();

        for _ in 0..5 {
            session.submit_and_advance(vec![0; PIXEL_COUNT]).unwrap();
        }

        let users = store.list_users().unwrap();
        let samples = store.list_samples().unwrap();
        assert_eq!(users["alice"].contribution_count, 5);
        assert_eq!(
            samples.iter().filter(|s| s.username == "alice").count(),
            5
        );
    }

    #[test]
    fn test_submission_records_prompted_digit() {
        let store = MemoryStore::new();
        let mut session = Session::start(&store, "alice").unwrap();

        let prompted = session.current_digit();
        let stored = session.submit_and_advance(vec![0; PIXEL_COUNT]).unwrap();
        assert_eq!(stored.digit, prompted);
    }

    #[test]
    fn test_validation_failure_leaves_store_untouched() {
        let store = MemoryStore::new();
        let mut session = Session::start(&store, "alice").unwrap();

        assert!(session.submit_and_advance(vec![0; 10]).is_err());
        assert!(store.list_users().unwrap().is_empty());
        assert!(store.list_samples().unwrap().is_empty());
    }

    #[test]
    fn test_empty_canvas_rejected_before_rasterization() {
        let store = MemoryStore::new();
        let mut session = Session::start(&store, "alice").unwrap();
        let surface = StrokeSurface::new();

        let err = session.submit_surface(&surface).unwrap_err();
        assert!(matches!(err, CollectError::EmptyCanvas));
        assert!(store.list_samples().unwrap().is_empty());
    }

    #[test]
    fn test_inked_surface_submits() {
        use crate::canvas::event::{PointerEvent, PointerPhase};

        let store = MemoryStore::new();
        let mut session = Session::start(&store, "alice").unwrap();

        let mut surface = StrokeSurface::new();
        surface.handle_event(PointerEvent::new(PointerPhase::Down, 60.0, 60.0));
        surface.handle_event(PointerEvent::new(PointerPhase::Move, 220.0, 220.0));
        surface.handle_event(PointerEvent::new(PointerPhase::Up, 220.0, 220.0));

        let stored = session.submit_surface(&surface).unwrap();
        assert_eq!(stored.pixels.len(), PIXEL_COUNT);
        // The stroke must survive normalization.
        assert!(stored.pixels.iter().any(|&p| p > 0));
    }

    /// Store whose append always fails, for exercising compensation.
    struct FailingAppendStore {
        inner: MemoryStore,
    }

    impl SampleStore for FailingAppendStore {
        fn append(&self, _sample: NewSample) -> CollectResult<StoredSample> {
            Err(CollectError::Persistence("disk full".to_string()))
        }
        fn increment_or_create_user(&self, username: &str) -> CollectResult<UserRecord> {
            self.inner.increment_or_create_user(username)
        }
        fn decrement_user(&self, username: &str) -> CollectResult<()> {
            self.inner.decrement_user(username)
        }
        fn list_samples(&self) -> CollectResult<Vec<StoredSample>> {
            self.inner.list_samples()
        }
        fn list_users(&self) -> CollectResult<HashMap<String, UserRecord>> {
            self.inner.list_users()
        }
        fn clear_all(&self) -> CollectResult<()> {
            self.inner.clear_all()
        }
        fn reconcile(&self) -> CollectResult<()> {
            self.inner.reconcile()
        }
    }

    #[test]
    fn test_failed_append_compensates_counter() {
        let store = FailingAppendStore {
            inner: MemoryStore::new(),
        };
        let mut session = Session::start(&store, "alice").unwrap();

        let prompted = session.current_digit();
        let err = session.submit_and_advance(vec![0; PIXEL_COUNT]).unwrap_err();
        assert!(matches!(err, CollectError::Persistence(_)));

        // The increment was rolled back and the prompt did not advance.
        let users = store.list_users().unwrap();
        assert_eq!(users["alice"].contribution_count, 0);
        assert_eq!(session.current_digit(), prompted);
    }
}
