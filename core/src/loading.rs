//! Reference-counted loading indicator.
//!
//! # Design
//! The indicator is visible while at least one masked call is in flight.
//! `LoadingTracker::acquire` returns a guard; the host's `show_loading` fires
//! on the first acquisition and `hide_loading` when the last guard drops, so an
//! early finisher cannot hide the indicator under a slower call.
//!
//! The count and the host notification change together under one lock, so
//! show and hide calls reach the host strictly alternating.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::host::Host;

#[derive(Debug, Default)]
pub struct LoadingTracker {
    active: Mutex<usize>,
}

impl LoadingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn count(&self) -> MutexGuard<'_, usize> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of masked calls currently in flight.
    pub fn active(&self) -> usize {
        *self.count()
    }

    pub fn acquire<'a, H: Host + ?Sized>(&'a self, host: &'a H) -> LoadingGuard<'a, H> {
        let mut count = self.count();
        if *count == 0 {
            host.show_loading();
        }
        *count += 1;
        drop(count);
        LoadingGuard {
            held: Some((self, host)),
        }
    }

    /// A guard that releases nothing, for calls made without the mask.
    pub fn inert<'a, H: Host + ?Sized>(&'a self) -> LoadingGuard<'a, H> {
        LoadingGuard { held: None }
    }
}

/// Releases one acquisition of the indicator when dropped.
#[must_use = "dropping the guard immediately hides the indicator"]
pub struct LoadingGuard<'a, H: Host + ?Sized> {
    held: Option<(&'a LoadingTracker, &'a H)>,
}

impl<H: Host + ?Sized> LoadingGuard<'_, H> {
    /// Release now instead of at end of scope. Further releases are no-ops.
    pub fn release(&mut self) {
        if let Some((tracker, host)) = self.held.take() {
            let mut count = tracker.count();
            *count = count.saturating_sub(1);
            if *count == 0 {
                host.hide_loading();
            }
        }
    }
}

impl<H: Host + ?Sized> Drop for LoadingGuard<'_, H> {
    fn drop(&mut self) {
        self.release();
    }
}
