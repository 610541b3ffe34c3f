//! Recall Engine — the fretboard quiz that gates the chord diagrams.
//!
//! A session starts in [`RecallState::AwaitingInput`] with nothing
//! selected. Fretboard clicks toggle pitch classes in and out of the
//! selection; [`RecallSession::check`] resolves the session once every
//! required pitch class is selected. Only the key's root is required.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::pitch::PitchClass;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RecallState {
    AwaitingInput,
    Resolved,
}

/// Result of [`RecallSession::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RecallVerdict {
    /// All required notes were found; the chord diagrams unlock.
    Unlock,
    /// Something is missing; the selection is kept for another try.
    Retry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecallSession {
    root: PitchClass,
    required: BTreeSet<PitchClass>,
    selected: BTreeSet<PitchClass>,
    state: RecallState,
}

impl RecallSession {
    /// Fresh session for a progression rooted at `root`.
    pub fn new(root: PitchClass) -> Self {
        RecallSession {
            root,
            required: BTreeSet::from([root]),
            selected: BTreeSet::new(),
            state: RecallState::AwaitingInput,
        }
    }

    pub fn root(&self) -> PitchClass {
        self.root
    }

    pub fn state(&self) -> RecallState {
        self.state
    }

    pub fn is_resolved(&self) -> bool {
        self.state == RecallState::Resolved
    }

    pub fn required(&self) -> &BTreeSet<PitchClass> {
        &self.required
    }

    pub fn selected(&self) -> &BTreeSet<PitchClass> {
        &self.selected
    }

    /// Prompt shown above the fretboard.
    pub fn hint(&self) -> String {
        format!("Find all {} notes on the fretboard", self.root)
    }

    /// Flip `pitch` in the selection. Returns whether it is now selected.
    ///
    /// A resolved session ignores clicks and returns `false`.
    pub fn toggle(&mut self, pitch: PitchClass) -> bool {
        if self.is_resolved() {
            log::debug!("ignoring {pitch} toggle on resolved recall session");
            return false;
        }
        if self.selected.remove(&pitch) {
            false
        } else {
            self.selected.insert(pitch);
            true
        }
    }

    /// Resolve the session if every required pitch class is selected.
    ///
    /// Checking an already resolved session unlocks again without any
    /// further transition.
    pub fn check(&mut self) -> RecallVerdict {
        if self.is_resolved() {
            return RecallVerdict::Unlock;
        }
        if self.required.is_subset(&self.selected) {
            self.state = RecallState::Resolved;
            log::debug!("recall resolved for {}", self.root);
            RecallVerdict::Unlock
        } else {
            RecallVerdict::Retry
        }
    }
}
