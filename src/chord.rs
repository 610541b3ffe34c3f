//! Chord Builder — triads from a root and a quality.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TrainerError;
use crate::pitch::PitchClass;

/// Triad quality in the major-scale harmonisation model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Major,
    Minor,
    Diminished,
}

impl Quality {
    /// Semitone offsets from the root.
    pub fn intervals(self) -> [i32; 3] {
        match self {
            Quality::Major => [0, 4, 7],
            Quality::Minor => [0, 3, 7],
            Quality::Diminished => [0, 3, 6],
        }
    }

    /// Label used in chord names and persisted documents.
    pub fn label(self) -> &'static str {
        match self {
            Quality::Major => "major",
            Quality::Minor => "minor",
            Quality::Diminished => "dim",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Quality {
    type Err = TrainerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "major" => Ok(Quality::Major),
            "minor" => Ok(Quality::Minor),
            "dim" | "diminished" => Ok(Quality::Diminished),
            other => Err(TrainerError::UnknownQuality(other.to_string())),
        }
    }
}

/// The three pitch classes of a triad, root first.
pub fn build_triad(root: PitchClass, quality: Quality) -> [PitchClass; 3] {
    quality.intervals().map(|offset| root.transpose(offset))
}

/// A triad named by its root and quality, e.g. `"C major"` or `"B dim"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Chord {
    pub root: PitchClass,
    pub quality: Quality,
}

impl Chord {
    pub fn new(root: PitchClass, quality: Quality) -> Self {
        Chord { root, quality }
    }

    pub fn notes(&self) -> [PitchClass; 3] {
        build_triad(self.root, self.quality)
    }

    /// Display label, e.g. `"F# minor"`.
    pub fn label(&self) -> String {
        format!("{} {}", self.root, self.quality)
    }

    /// Path of the chord diagram image served next to the page.
    ///
    /// Spaces become underscores and `#` is URL-encoded, so `C# minor`
    /// maps to `/C%23_minor.svg`.
    pub fn diagram_path(&self) -> String {
        let file_name = self.label().replace(' ', "_").replace('#', "%23");
        format!("/{file_name}.svg")
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.root, self.quality)
    }
}

impl FromStr for Chord {
    type Err = TrainerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let root = parts
            .next()
            .ok_or_else(|| TrainerError::UnknownPitch(s.to_string()))?
            .parse::<PitchClass>()?;
        let quality = parts
            .next()
            .ok_or_else(|| TrainerError::UnknownQuality(String::new()))?
            .parse::<Quality>()?;
        if let Some(extra) = parts.next() {
            return Err(TrainerError::UnknownQuality(extra.to_string()));
        }
        Ok(Chord { root, quality })
    }
}

impl TryFrom<String> for Chord {
    type Error = TrainerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Chord> for String {
    fn from(chord: Chord) -> Self {
        chord.label()
    }
}

/// The "build chords" chart: major and minor triads on `root`.
pub fn build_chart(root: PitchClass) -> String {
    let join = |notes: [PitchClass; 3]| {
        notes
            .iter()
            .map(|pc| pc.name())
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "Build chords in {root}\n\nMajor: {}\nMinor: {}",
        join(build_triad(root, Quality::Major)),
        join(build_triad(root, Quality::Minor)),
    )
}
