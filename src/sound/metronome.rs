//! Metronome — toggle state for a fixed-interval click timer.
//!
//! The host owns the actual timer (`setInterval` in the browser). The
//! metronome decides when to start or cancel it and at what interval, and
//! turns each timer tick into a click tone.

use serde::Serialize;

use super::{SoundSettings, ToneRequest};

/// What the host timer should do after [`Metronome::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum MetronomeCommand {
    #[serde(rename_all = "camelCase")]
    Start { interval_ms: f64 },
    Stop,
}

#[derive(Debug, Clone, Default)]
pub struct Metronome {
    /// Interval of the running timer, fixed when it was started.
    running: Option<f64>,
}

/// Milliseconds between clicks at `tempo_bpm`.
pub fn interval_ms(tempo_bpm: u32) -> f64 {
    60_000.0 / tempo_bpm.max(1) as f64
}

impl Metronome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Interval of the active timer, if any.
    pub fn interval_ms(&self) -> Option<f64> {
        self.running
    }

    /// Start if stopped, stop if running. At most one timer is ever active.
    pub fn toggle(&mut self, tempo_bpm: u32) -> MetronomeCommand {
        match self.running.take() {
            Some(_) => {
                log::debug!("metronome stopped");
                MetronomeCommand::Stop
            }
            None => {
                let interval_ms = interval_ms(tempo_bpm);
                self.running = Some(interval_ms);
                log::debug!("metronome started at {tempo_bpm} BPM ({interval_ms:.1} ms)");
                MetronomeCommand::Start { interval_ms }
            }
        }
    }

    /// Click for a timer tick at audio-clock time `now`. Nothing while stopped.
    pub fn tick(&self, now: f64, settings: &SoundSettings) -> Option<ToneRequest> {
        self.running?;
        Some(ToneRequest {
            frequency: settings.click_frequency,
            gain: settings.click_gain,
            start: now,
            stop: now + settings.click_duration,
        })
    }
}
