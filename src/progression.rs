//! Progression Generator — four distinct diatonic triads in a major key.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::chord::{Chord, Quality};
use crate::error::TrainerError;
use crate::pitch::PitchClass;

/// Number of chords in a generated progression.
pub const PROGRESSION_LENGTH: usize = 4;

/// Name given to progressions the user has not named yet.
pub const DEFAULT_NAME: &str = "Untitled";

/// Scale degrees I–vii° of the major scale: semitone offset and triad quality.
const MAJOR_SCALE_DEGREES: [(i32, Quality); 7] = [
    (0, Quality::Major),
    (2, Quality::Minor),
    (4, Quality::Minor),
    (5, Quality::Major),
    (7, Quality::Major),
    (9, Quality::Minor),
    (11, Quality::Diminished),
];

/// Source of uniform random indices for chord sampling.
///
/// Every `rand` generator is a source, so tests pass a seeded `StdRng`.
pub trait RandomSource {
    /// A uniformly distributed index in `0..bound`. `bound` is never zero.
    fn next_index(&mut self, bound: usize) -> usize;
}

impl<R: RngCore> RandomSource for R {
    fn next_index(&mut self, bound: usize) -> usize {
        self.gen_range(0..bound)
    }
}

/// The seven diatonic triads of `root`'s major scale, in degree order.
pub fn diatonic_triads(root: PitchClass) -> [Chord; 7] {
    MAJOR_SCALE_DEGREES.map(|(offset, quality)| Chord::new(root.transpose(offset), quality))
}

/// A named chord progression in a major key.
///
/// The serde form is the persisted document record:
/// `{name, root, key, chords, notes}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    pub name: String,
    pub root: PitchClass,
    #[serde(rename = "key")]
    pub key_label: String,
    pub chords: [Chord; PROGRESSION_LENGTH],
    #[serde(default)]
    pub notes: Option<String>,
}

impl Progression {
    /// Build an untitled progression, checking the chord invariants.
    pub fn new(root: PitchClass, chords: [Chord; PROGRESSION_LENGTH]) -> Result<Self, TrainerError> {
        let progression = Progression {
            name: DEFAULT_NAME.to_string(),
            root,
            key_label: key_label(root),
            chords,
            notes: None,
        };
        progression.validate()?;
        Ok(progression)
    }

    /// The key label must name the root, and the chords must be pairwise
    /// distinct and diatonic to the root's major scale.
    pub fn validate(&self) -> Result<(), TrainerError> {
        let expected = key_label(self.root);
        if self.key_label != expected {
            return Err(TrainerError::MalformedPersistedData(format!(
                "key '{}' does not match root {} (expected '{expected}')",
                self.key_label, self.root
            )));
        }
        let diatonic = diatonic_triads(self.root);
        for (i, chord) in self.chords.iter().enumerate() {
            if !diatonic.contains(chord) {
                return Err(TrainerError::MalformedPersistedData(format!(
                    "{chord} is not in {}",
                    key_label(self.root)
                )));
            }
            if self.chords[..i].contains(chord) {
                return Err(TrainerError::MalformedPersistedData(format!(
                    "{chord} appears twice"
                )));
            }
        }
        Ok(())
    }

    /// Chord labels joined for display, e.g. `"C major, G major, A minor, F major"`.
    pub fn chord_list(&self) -> String {
        self.chords
            .iter()
            .map(Chord::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// `"<root> major"`.
pub fn key_label(root: PitchClass) -> String {
    format!("{root} major")
}

/// Generate a progression of four distinct diatonic triads in `root` major.
///
/// Chords are drawn uniformly from the seven triads and kept only if not
/// already chosen; the result is in acceptance order.
pub fn generate<R: RandomSource + ?Sized>(
    root: Option<PitchClass>,
    rng: &mut R,
) -> Result<Progression, TrainerError> {
    let root = root.ok_or(TrainerError::NoKeySelected)?;
    let candidates = diatonic_triads(root);

    let mut chosen: Vec<Chord> = Vec::with_capacity(PROGRESSION_LENGTH);
    while chosen.len() < PROGRESSION_LENGTH {
        let chord = candidates[rng.next_index(candidates.len())];
        if !chosen.contains(&chord) {
            chosen.push(chord);
        }
    }

    let chords = [chosen[0], chosen[1], chosen[2], chosen[3]];
    log::debug!("generated progression in {root} major: {chords:?}");

    Ok(Progression {
        name: DEFAULT_NAME.to_string(),
        root,
        key_label: key_label(root),
        chords,
        notes: None,
    })
}
