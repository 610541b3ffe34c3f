pub mod chord;
pub mod config;
pub mod error;
pub mod export;
pub mod pitch;
pub mod progression;
pub mod recall;
pub mod sound;
pub mod store;
pub mod surface;
pub mod trainer;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::chord::Chord;
use crate::config::TrainerConfig;
use crate::error::TrainerError;
use crate::pitch::PitchClass;
use crate::sound::ToneRequest;
use crate::store::MemoryStore;
use crate::surface::{RecordingSurface, ToneLog};
use crate::trainer::{Trainer, report};

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&format!("{e}")))
}

fn js_err(e: TrainerError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// WASM-exposed: return the fretcoach-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// Labels of the seven diatonic triads of `key` major, in degree order.
pub fn diatonic_chord_labels(key: &str) -> Result<Vec<String>, TrainerError> {
    let root = key.parse::<PitchClass>()?;
    Ok(progression::diatonic_triads(root).iter().map(Chord::label).collect())
}

/// Note names of the triad named by `label`, e.g. `"A minor"` → `["A", "C", "E"]`.
pub fn triad_note_names(label: &str) -> Result<Vec<String>, TrainerError> {
    let chord = label.parse::<Chord>()?;
    Ok(chord.notes().iter().map(|pc| pc.name().to_string()).collect())
}

/// WASM-exposed: the seven diatonic chord labels of a key.
#[wasm_bindgen]
pub fn diatonic_chords(key: &str) -> Result<JsValue, JsValue> {
    to_js(&diatonic_chord_labels(key).map_err(js_err)?)
}

/// WASM-exposed: note names of a chord label.
#[wasm_bindgen]
pub fn build_triad_notes(label: &str) -> Result<JsValue, JsValue> {
    to_js(&triad_note_names(label).map_err(js_err)?)
}

/// WASM-exposed: render a chord label to mono f32 samples.
/// Returns the raw audio buffer for AudioWorklet playback.
#[wasm_bindgen]
pub fn render_chord_samples(label: &str, sample_rate: u32) -> Result<Vec<f32>, JsValue> {
    let chord = label.parse::<Chord>().map_err(js_err)?;
    let tones = sound::chord_tones(&chord, 0.0, &sound::SoundSettings::default());
    Ok(sound::renderer::render_tones(&tones, sample_rate))
}

/// WASM-exposed trainer. Holds all page state; every action returns the
/// list of surface updates the page should apply. Failed actions show up
/// as a `notice` update rather than a thrown error.
#[wasm_bindgen]
pub struct WasmTrainer {
    inner: Trainer<MemoryStore, StdRng>,
    surface: RecordingSurface,
}

impl WasmTrainer {
    fn flush(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.surface.drain())
    }

    /// Tones for chord `index`, or `None` with a notice left for `takeUpdates`.
    fn chord_tones(&mut self, index: usize, now: f64) -> Option<Vec<ToneRequest>> {
        let mut audio = ToneLog::default();
        let result = self.inner.play_chord(index, now, &mut audio);
        report(result, &mut self.surface).map(|()| audio.tones)
    }
}

#[wasm_bindgen]
impl WasmTrainer {
    /// `saved_document` is the stored progression list (from localStorage),
    /// `config_json` an optional partial `TrainerConfig`, `seed` the seed for
    /// chord sampling.
    #[wasm_bindgen(constructor)]
    pub fn new(
        saved_document: Option<String>,
        config_json: Option<String>,
        seed: u64,
    ) -> Result<WasmTrainer, JsValue> {
        let config = match config_json {
            Some(json) => TrainerConfig::from_json(&json).map_err(js_err)?,
            None => TrainerConfig::default(),
        };
        let backend = match saved_document {
            Some(doc) => MemoryStore::with_entry(&config.storage_key, doc),
            None => MemoryStore::new(),
        };
        let inner = Trainer::new(config, backend, StdRng::seed_from_u64(seed)).map_err(js_err)?;
        Ok(WasmTrainer {
            inner,
            surface: RecordingSurface::new(),
        })
    }

    #[wasm_bindgen(js_name = renderStart)]
    pub fn render_start(&mut self) -> Result<JsValue, JsValue> {
        self.inner.render_start(&mut self.surface);
        self.flush()
    }

    #[wasm_bindgen(js_name = selectKey)]
    pub fn select_key(&mut self, key: &str) -> Result<JsValue, JsValue> {
        let result = self.inner.select_key(key);
        report(result, &mut self.surface);
        self.flush()
    }

    pub fn generate(&mut self) -> Result<JsValue, JsValue> {
        let result = self.inner.generate(&mut self.surface).map(|_| ());
        report(result, &mut self.surface);
        self.flush()
    }

    #[wasm_bindgen(js_name = showChart)]
    pub fn show_chart(&mut self) -> Result<JsValue, JsValue> {
        let result = self.inner.show_chart(&mut self.surface);
        report(result, &mut self.surface);
        self.flush()
    }

    /// Fretboard click. Returns whether the note is now selected.
    #[wasm_bindgen(js_name = toggleNote)]
    pub fn toggle_note(&mut self, note: &str) -> bool {
        match note.parse::<PitchClass>() {
            Ok(pitch) => self.inner.toggle_note(pitch).unwrap_or(false),
            Err(e) => {
                log::warn!("ignoring fretboard click: {e}");
                false
            }
        }
    }

    #[wasm_bindgen(js_name = checkRecall)]
    pub fn check_recall(&mut self) -> Result<JsValue, JsValue> {
        let result = self.inner.check_recall(&mut self.surface);
        report(result, &mut self.surface);
        self.flush()
    }

    #[wasm_bindgen(js_name = saveCurrent)]
    pub fn save_current(
        &mut self,
        name: Option<String>,
        notes: Option<String>,
    ) -> Result<JsValue, JsValue> {
        let result = self
            .inner
            .save_current(name.as_deref(), notes.as_deref(), &mut self.surface);
        report(result, &mut self.surface);
        self.flush()
    }

    #[wasm_bindgen(js_name = openSaved)]
    pub fn open_saved(&mut self, index: usize) -> Result<JsValue, JsValue> {
        let result = self.inner.open_saved(index, &mut self.surface);
        report(result, &mut self.surface);
        self.flush()
    }

    #[wasm_bindgen(js_name = deleteSaved)]
    pub fn delete_saved(&mut self, index: usize) -> Result<JsValue, JsValue> {
        let result = self.inner.delete_saved(index, &mut self.surface).map(|_| ());
        report(result, &mut self.surface);
        self.flush()
    }

    /// The saved-list document to write back to localStorage.
    #[wasm_bindgen(js_name = savedDocument)]
    pub fn saved_document(&self) -> Option<String> {
        self.inner.store().document()
    }

    #[wasm_bindgen(js_name = setTempo)]
    pub fn set_tempo(&mut self, bpm: u32) -> Result<JsValue, JsValue> {
        self.inner.set_tempo(bpm, &mut self.surface);
        self.flush()
    }

    /// Returns `{action: "start", intervalMs}` or `{action: "stop"}` for the
    /// page's timer.
    #[wasm_bindgen(js_name = toggleMetronome)]
    pub fn toggle_metronome(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.toggle_metronome())
    }

    /// Timer callback. Returns the tones to start (empty when stopped).
    #[wasm_bindgen(js_name = metronomeTick)]
    pub fn metronome_tick(&self, now: f64) -> Result<JsValue, JsValue> {
        let mut audio = ToneLog::default();
        self.inner.metronome_tick(now, &mut audio);
        to_js(&audio.tones)
    }

    /// Tones for chord `index` of the current progression, or `undefined`
    /// after showing a notice.
    #[wasm_bindgen(js_name = playChord)]
    pub fn play_chord(&mut self, index: usize, now: f64) -> Result<JsValue, JsValue> {
        match self.chord_tones(index, now) {
            Some(tones) => to_js(&tones),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// `{fileName, mimeType, bytes}` for the current progression, or
    /// `undefined` after showing a notice.
    #[wasm_bindgen(js_name = exportMidi)]
    pub fn export_midi(&mut self) -> Result<JsValue, JsValue> {
        let result = self.inner.export_midi();
        match report(result, &mut self.surface) {
            Some(file) => to_js(&file),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Updates recorded since the last call (e.g. a notice from `exportMidi`
    /// or `playChord`).
    #[wasm_bindgen(js_name = takeUpdates)]
    pub fn take_updates(&mut self) -> Result<JsValue, JsValue> {
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_matches_manifest() {
        assert_eq!(core_version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn diatonic_labels_for_flat_key() {
        assert_eq!(
            diatonic_chord_labels("B♭").unwrap(),
            ["A# major", "C minor", "D minor", "D# major", "F major", "G minor", "A dim"]
        );
        assert!(diatonic_chord_labels("Q").is_err());
    }

    #[test]
    fn triad_names_from_label() {
        assert_eq!(triad_note_names("A minor").unwrap(), ["A", "C", "E"]);
        assert!(matches!(
            triad_note_names("A sus2"),
            Err(TrainerError::UnknownQuality(_))
        ));
    }

    #[test]
    fn play_chord_failure_leaves_a_notice() {
        let mut trainer = WasmTrainer::new(None, None, 4).unwrap();
        assert!(trainer.chord_tones(0, 0.0).is_none());
        assert_eq!(trainer.surface.last_notice(), Some("Generate chords first."));

        trainer.inner.select_key("C").unwrap();
        trainer.inner.generate(&mut trainer.surface).unwrap();
        assert_eq!(trainer.chord_tones(1, 0.0).map(|t| t.len()), Some(3));
        assert!(trainer.chord_tones(9, 0.0).is_none());
    }
}
