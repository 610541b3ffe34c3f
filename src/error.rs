//! # Error Types
//!
//! Every fallible operation in the crate returns [`TrainerError`]. Errors are
//! recovered by the action that triggered them: the [`Trainer`](crate::trainer::Trainer)
//! turns the user-facing ones into a notice via [`TrainerError::notice`], and
//! `MalformedPersistedData` never leaves the store (a bad blob reads as an
//! empty list).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrainerError {
    /// A progression was requested before a key was chosen.
    #[error("No key selected")]
    NoKeySelected,

    /// An action needs a current progression and there is none.
    #[error("No progression")]
    NoProgression,

    /// An index into the saved list (or a progression's chords) is out of range.
    ///
    /// ```
    /// # use fretcoach_core::error::TrainerError;
    /// let err = TrainerError::IndexOutOfRange { index: 4, len: 2 };
    /// assert_eq!(err.to_string(), "Index 4 out of range for list of length 2");
    /// ```
    #[error("Index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A chord quality tag that is not major, minor or dim.
    #[error("Unknown chord quality '{0}'")]
    UnknownQuality(String),

    /// A note name that does not denote one of the 12 pitch classes.
    #[error("Unknown pitch '{0}'")]
    UnknownPitch(String),

    /// The persisted progression document could not be read back.
    #[error("Malformed persisted data: {0}")]
    MalformedPersistedData(String),

    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The key-value store refused a write (e.g. storage quota exceeded).
    #[error("Could not save: {0}")]
    Storage(String),

    /// A tempo whose quarter-note length does not fit a MIDI tempo event.
    ///
    /// ```
    /// # use fretcoach_core::error::TrainerError;
    /// assert_eq!(TrainerError::TempoOutOfRange(3).to_string(), "Tempo 3 BPM cannot be exported");
    /// ```
    #[error("Tempo {0} BPM cannot be exported")]
    TempoOutOfRange(u32),

    /// Configuration values that cannot drive the trainer.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl TrainerError {
    /// Text shown to the user when this error aborts an action.
    pub fn notice(&self) -> String {
        match self {
            TrainerError::NoKeySelected | TrainerError::UnknownPitch(_) => {
                "Select a key first.".to_string()
            }
            TrainerError::NoProgression => "Generate chords first.".to_string(),
            other => other.to_string(),
        }
    }
}
