//! MIDI export — writes a progression as a Standard MIDI File.
//!
//! One format-0 track: a tempo meta event, then each chord as a half note
//! with all three triad notes struck together, then end-of-track.

use serde::Serialize;

use crate::config::TrainerConfig;
use crate::error::TrainerError;
use crate::pitch::PitchClass;
use crate::progression::Progression;

pub const MIDI_MIME_TYPE: &str = "audio/midi";

/// Fixed encoding parameters for exported files.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportSettings {
    pub ticks_per_quarter: u16,
    /// Octave every chord note is placed in (C4 = 60).
    pub octave: u8,
    pub velocity: u8,
    pub channel: u8,
}

impl Default for ExportSettings {
    fn default() -> Self {
        ExportSettings {
            ticks_per_quarter: 128,
            octave: 4,
            velocity: 64,
            channel: 0,
        }
    }
}

impl From<&TrainerConfig> for ExportSettings {
    fn from(config: &TrainerConfig) -> Self {
        ExportSettings {
            ticks_per_quarter: config.ticks_per_quarter,
            octave: config.export_octave,
            velocity: config.export_velocity,
            channel: 0,
        }
    }
}

impl ExportSettings {
    /// MIDI note number of `pitch` in the export octave.
    pub fn note_number(&self, pitch: PitchClass) -> Result<u8, TrainerError> {
        let note = 12 * (self.octave as u32 + 1) + pitch.index() as u32;
        if note > 127 {
            return Err(TrainerError::InvalidConfig(format!(
                "{pitch} in octave {} is above MIDI note 127",
                self.octave
            )));
        }
        Ok(note as u8)
    }

    /// Reject values a Standard MIDI File cannot carry.
    pub fn validate(&self) -> Result<(), TrainerError> {
        if self.ticks_per_quarter == 0 || self.ticks_per_quarter > 0x7FFF {
            return Err(TrainerError::InvalidConfig("ticksPerQuarter must be 1..=32767".into()));
        }
        if self.velocity == 0 || self.velocity > 127 {
            return Err(TrainerError::InvalidConfig("exportVelocity must be 1..=127".into()));
        }
        if self.channel > 15 {
            return Err(TrainerError::InvalidConfig(format!(
                "channel {} outside 0..=15",
                self.channel
            )));
        }
        Ok(())
    }

    /// Length of each chord: a half note.
    pub fn chord_ticks(&self) -> u32 {
        2 * self.ticks_per_quarter as u32
    }
}

/// A file ready to hand to the page for download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Largest value a tempo meta event can hold (three bytes).
const MAX_TEMPO_MICROS: u32 = 0xFF_FFFF;

/// Microseconds per quarter note at `tempo_bpm`.
pub fn tempo_micros(tempo_bpm: u32) -> Result<u32, TrainerError> {
    match 60_000_000u32.checked_div(tempo_bpm) {
        Some(micros) if micros <= MAX_TEMPO_MICROS => Ok(micros),
        _ => Err(TrainerError::TempoOutOfRange(tempo_bpm)),
    }
}

/// Encode `progression` at `tempo_bpm`. Identical inputs give identical bytes.
pub fn encode(
    progression: Option<&Progression>,
    tempo_bpm: u32,
    settings: &ExportSettings,
) -> Result<Vec<u8>, TrainerError> {
    let progression = progression.ok_or(TrainerError::NoProgression)?;
    settings.validate()?;
    let micros = tempo_micros(tempo_bpm)?;
    let track = build_track_chunk(progression, micros, settings)?;

    let mut buf = Vec::with_capacity(22 + track.len());

    // Header chunk: format 0, one track
    buf.extend_from_slice(b"MThd");
    buf.extend_from_slice(&6u32.to_be_bytes());
    buf.extend_from_slice(&0u16.to_be_bytes());
    buf.extend_from_slice(&1u16.to_be_bytes());
    buf.extend_from_slice(&settings.ticks_per_quarter.to_be_bytes());

    // Track chunk
    buf.extend_from_slice(b"MTrk");
    buf.extend_from_slice(&(track.len() as u32).to_be_bytes());
    buf.extend_from_slice(&track);

    Ok(buf)
}

/// Encode and wrap as a downloadable `<name>.mid`.
pub fn export_file(
    progression: Option<&Progression>,
    tempo_bpm: u32,
    settings: &ExportSettings,
) -> Result<ExportFile, TrainerError> {
    let bytes = encode(progression, tempo_bpm, settings)?;
    let name = progression.map_or("Untitled", |p| p.name.as_str());
    Ok(ExportFile {
        file_name: format!("{name}.mid"),
        mime_type: MIDI_MIME_TYPE.to_string(),
        bytes,
    })
}

fn build_track_chunk(
    progression: &Progression,
    micros: u32,
    settings: &ExportSettings,
) -> Result<Vec<u8>, TrainerError> {
    let mut t = Vec::new();
    let channel = settings.channel;

    // Tempo meta event; `micros` fits in 24 bits
    t.push(0x00);
    t.extend_from_slice(&[0xFF, 0x51, 0x03]);
    t.extend_from_slice(&micros.to_be_bytes()[1..]);

    for chord in &progression.chords {
        let [a, b, c] = chord.notes();
        let keys = [
            settings.note_number(a)?,
            settings.note_number(b)?,
            settings.note_number(c)?,
        ];

        for &key in &keys {
            write_vlq(&mut t, 0);
            t.extend_from_slice(&[0x90 | channel, key, settings.velocity]);
        }
        for (i, &key) in keys.iter().enumerate() {
            let delta = if i == 0 { settings.chord_ticks() } else { 0 };
            write_vlq(&mut t, delta);
            t.extend_from_slice(&[0x80 | channel, key, 0]);
        }
    }

    // End of track
    t.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);
    Ok(t)
}

/// Append `value` as a MIDI variable-length quantity.
fn write_vlq(buf: &mut Vec<u8>, value: u32) {
    let mut groups = [0u8; 5];
    let mut n = 0;
    let mut v = value;
    loop {
        groups[n] = (v & 0x7F) as u8;
        n += 1;
        v >>= 7;
        if v == 0 {
            break;
        }
    }
    for i in (0..n).rev() {
        let continuation = if i > 0 { 0x80 } else { 0x00 };
        buf.push(groups[i] | continuation);
    }
}
