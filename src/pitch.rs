//! Pitch Table — the 12 pitch classes and their frequencies.
//!
//! Names are canonical and sharp-based. Flats and other enharmonic
//! spellings are normalised on parse, so `"B♭"`, `"Bb"` and `"A#"` all
//! become [`PitchClass::ASharp`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TrainerError;

/// One of the 12 octave-independent note names, ordered by semitone index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PitchClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl PitchClass {
    /// All pitch classes in semitone order, starting at C.
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
    ];

    const NAMES: [&'static str; 12] = [
        "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
    ];

    /// Semitone index 0–11 (C = 0).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Pitch class for any integer semitone, wrapping the octave.
    pub fn from_index(semitone: i32) -> Self {
        Self::ALL[semitone.rem_euclid(12) as usize]
    }

    pub fn name(self) -> &'static str {
        Self::NAMES[self.index()]
    }

    /// Move by `semitones` (either direction), modulo 12.
    pub fn transpose(self, semitones: i32) -> Self {
        Self::from_index(self.index() as i32 + semitones)
    }

    /// Frequency of this pitch class in the octave that contains A4.
    ///
    /// `tuning_pitch` is the frequency of A4, usually 440.0.
    pub fn frequency(self, tuning_pitch: f64) -> f64 {
        tuning_pitch * 2.0_f64.powf((self.index() as f64 - 9.0) / 12.0)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PitchClass {
    type Err = TrainerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();

        let base = match chars.next() {
            Some('C') => 0,
            Some('D') => 2,
            Some('E') => 4,
            Some('F') => 5,
            Some('G') => 7,
            Some('A') => 9,
            Some('B') => 11,
            _ => return Err(TrainerError::UnknownPitch(s.to_string())),
        };

        let mut semitone = base;
        for ch in chars {
            match ch {
                '#' | '♯' => semitone += 1,
                'b' | '♭' => semitone -= 1,
                _ => return Err(TrainerError::UnknownPitch(s.to_string())),
            }
        }

        Ok(Self::from_index(semitone))
    }
}

impl TryFrom<String> for PitchClass {
    type Error = TrainerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PitchClass> for String {
    fn from(pc: PitchClass) -> Self {
        pc.name().to_string()
    }
}
