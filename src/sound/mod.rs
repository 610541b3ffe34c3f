//! Sound Output — tone requests for chord playback and metronome clicks.
//!
//! Requests are fire-and-forget: each carries its own stop time on the
//! audio clock, so nothing needs to be tracked or cleaned up afterwards.
//! The page turns them into Web Audio oscillators; [`renderer`] turns them
//! into samples for offline use.

pub mod metronome;
pub mod oscillator;
pub mod renderer;

use serde::Serialize;

use crate::chord::Chord;
use crate::config::TrainerConfig;

/// One tone to emit, with times in seconds on a monotonic audio clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ToneRequest {
    /// Frequency in Hz.
    pub frequency: f64,
    pub gain: f64,
    pub start: f64,
    pub stop: f64,
}

/// Levels and lengths for generated tones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundSettings {
    pub tuning_pitch: f64,
    pub chord_gain: f64,
    pub chord_duration: f64,
    pub click_frequency: f64,
    pub click_gain: f64,
    pub click_duration: f64,
}

impl Default for SoundSettings {
    fn default() -> Self {
        SoundSettings::from(&TrainerConfig::default())
    }
}

impl From<&TrainerConfig> for SoundSettings {
    fn from(config: &TrainerConfig) -> Self {
        SoundSettings {
            tuning_pitch: config.tuning_pitch,
            chord_gain: config.chord_gain,
            chord_duration: config.chord_duration,
            click_frequency: config.click_frequency,
            click_gain: config.click_gain,
            click_duration: config.click_duration,
        }
    }
}

/// Simultaneous tones for `chord`, starting at `now`.
pub fn chord_tones(chord: &Chord, now: f64, settings: &SoundSettings) -> Vec<ToneRequest> {
    chord
        .notes()
        .iter()
        .map(|pc| ToneRequest {
            frequency: pc.frequency(settings.tuning_pitch),
            gain: settings.chord_gain,
            start: now,
            stop: now + settings.chord_duration,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::PitchClass;

    #[test]
    fn a_minor_tones() {
        let chord: Chord = "A minor".parse().unwrap();
        let tones = chord_tones(&chord, 1.5, &SoundSettings::default());
        assert_eq!(tones.len(), 3);

        let freqs: Vec<f64> = tones.iter().map(|t| t.frequency).collect();
        assert!((freqs[0] - 440.0).abs() < 1e-9);
        assert!((freqs[1] - PitchClass::C.frequency(440.0)).abs() < 1e-9);
        assert!((freqs[2] - PitchClass::E.frequency(440.0)).abs() < 1e-9);

        for t in &tones {
            assert_eq!(t.gain, 0.06);
            assert_eq!(t.start, 1.5);
            assert!((t.stop - 2.3).abs() < 1e-12);
        }
    }

    #[test]
    fn settings_follow_config() {
        let config = TrainerConfig {
            tuning_pitch: 432.0,
            chord_gain: 0.2,
            ..TrainerConfig::default()
        };
        let settings = SoundSettings::from(&config);
        let chord: Chord = "A major".parse().unwrap();
        let tones = chord_tones(&chord, 0.0, &settings);
        assert!((tones[0].frequency - 432.0).abs() < 1e-9);
        assert_eq!(tones[0].gain, 0.2);
    }
}
