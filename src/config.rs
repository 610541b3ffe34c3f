//! Trainer configuration.
//!
//! Every field has a default, so a host can pass `{}` or only the values it
//! wants to override, e.g. `{"defaultTempo": 90, "exportOctave": 3}`.

use serde::{Deserialize, Serialize};

use crate::error::TrainerError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrainerConfig {
    /// Key of the saved-progression document in the key-value store.
    pub storage_key: String,
    /// Tempo in BPM before the user touches the slider.
    pub default_tempo: u32,
    pub min_tempo: u32,
    pub max_tempo: u32,
    /// Reference frequency of A4 in Hz.
    pub tuning_pitch: f64,
    /// Gain of each chord-playback tone.
    pub chord_gain: f64,
    /// Chord playback length in seconds.
    pub chord_duration: f64,
    pub click_frequency: f64,
    pub click_gain: f64,
    /// Metronome click length in seconds.
    pub click_duration: f64,
    /// Octave used for exported notes (C4 = MIDI 60).
    pub export_octave: u8,
    pub ticks_per_quarter: u16,
    pub export_velocity: u8,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            storage_key: "progressions".to_string(),
            default_tempo: 100,
            min_tempo: 20,
            max_tempo: 300,
            tuning_pitch: 440.0,
            chord_gain: 0.06,
            chord_duration: 0.8,
            click_frequency: 1000.0,
            click_gain: 0.1,
            click_duration: 0.05,
            export_octave: 4,
            ticks_per_quarter: 128,
            export_velocity: 64,
        }
    }
}

impl TrainerConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json(json: &str) -> Result<Self, TrainerError> {
        let config: TrainerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TrainerError> {
        if self.storage_key.is_empty() {
            return Err(TrainerError::InvalidConfig("storageKey is empty".into()));
        }
        if self.min_tempo == 0 || self.min_tempo > self.max_tempo {
            return Err(TrainerError::InvalidConfig(format!(
                "tempo range {}..={} is empty or starts at zero",
                self.min_tempo, self.max_tempo
            )));
        }
        if !(self.min_tempo..=self.max_tempo).contains(&self.default_tempo) {
            return Err(TrainerError::InvalidConfig(format!(
                "defaultTempo {} outside {}..={}",
                self.default_tempo, self.min_tempo, self.max_tempo
            )));
        }
        for (name, value) in [
            ("tuningPitch", self.tuning_pitch),
            ("chordDuration", self.chord_duration),
            ("clickFrequency", self.click_frequency),
            ("clickDuration", self.click_duration),
        ] {
            if !(value > 0.0) {
                return Err(TrainerError::InvalidConfig(format!("{name} must be positive")));
            }
        }
        // Highest exported note is B in the export octave.
        if 12 * (self.export_octave as u32 + 1) + 11 > 127 {
            return Err(TrainerError::InvalidConfig(format!(
                "exportOctave {} exceeds the MIDI note range",
                self.export_octave
            )));
        }
        if self.ticks_per_quarter == 0 || self.ticks_per_quarter > 0x7FFF {
            return Err(TrainerError::InvalidConfig("ticksPerQuarter must be 1..=32767".into()));
        }
        if self.export_velocity == 0 || self.export_velocity > 127 {
            return Err(TrainerError::InvalidConfig("exportVelocity must be 1..=127".into()));
        }
        Ok(())
    }

    /// Clamp a requested tempo into the configured range.
    pub fn clamp_tempo(&self, bpm: u32) -> u32 {
        bpm.clamp(self.min_tempo, self.max_tempo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = TrainerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.storage_key, "progressions");
        assert_eq!(config.default_tempo, 100);
    }

    #[test]
    fn empty_document_gives_defaults() {
        assert_eq!(TrainerConfig::from_json("{}").unwrap(), TrainerConfig::default());
    }

    #[test]
    fn partial_override() {
        let config = TrainerConfig::from_json(r#"{"defaultTempo": 90, "exportOctave": 3}"#).unwrap();
        assert_eq!(config.default_tempo, 90);
        assert_eq!(config.export_octave, 3);
        assert_eq!(config.ticks_per_quarter, 128);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            TrainerConfig::from_json(r#"{"defaultTempo": 500}"#),
            Err(TrainerError::InvalidConfig(_))
        ));
        assert!(TrainerConfig::from_json(r#"{"minTempo": 0}"#).is_err());
        assert!(TrainerConfig::from_json(r#"{"exportOctave": 10}"#).is_err());
        assert!(TrainerConfig::from_json(r#"{"chordDuration": 0}"#).is_err());
        assert!(TrainerConfig::from_json(r#"{"storageKey": ""}"#).is_err());
        assert!(matches!(
            TrainerConfig::from_json("not json"),
            Err(TrainerError::Serialize(_))
        ));
    }

    #[test]
    fn clamps_tempo() {
        let config = TrainerConfig::default();
        assert_eq!(config.clamp_tempo(0), 20);
        assert_eq!(config.clamp_tempo(120), 120);
        assert_eq!(config.clamp_tempo(1000), 300);
    }
}
