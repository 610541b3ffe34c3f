//! Trainer — the application state and the actions the page triggers.
//!
//! One [`Trainer`] owns everything that changes while the page is open:
//! the selected key, the current progression, the saved list, the recall
//! session, the tempo and the metronome. Each action runs to completion and
//! reports through a [`Surface`]. Failed actions return a [`TrainerError`]
//! and change nothing; callers show [`TrainerError::notice`] to the user
//! (see [`report`]).

use crate::chord;
use crate::config::TrainerConfig;
use crate::error::TrainerError;
use crate::export::{self, ExportSettings};
use crate::pitch::PitchClass;
use crate::progression::{self, Progression, RandomSource};
use crate::recall::{RecallSession, RecallVerdict};
use crate::sound::metronome::{Metronome, MetronomeCommand};
use crate::sound::{self, SoundSettings};
use crate::store::{KeyValueStore, ProgressionStore};
use crate::surface::{AudioDevice, FileDelivery, Region, Surface};

pub const FEEDBACK_CORRECT: &str = "✅ Correct — chords unlocked";
pub const FEEDBACK_RETRY: &str = "❌ Not quite — look for the pattern";

/// Show a failed action's notice. Errors never propagate past the action.
pub fn report<T>(result: Result<T, TrainerError>, surface: &mut impl Surface) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::debug!("action failed: {e}");
            surface.notify(&e.notice());
            None
        }
    }
}

pub struct Trainer<S, R> {
    config: TrainerConfig,
    store: ProgressionStore<S>,
    rng: R,
    selected_key: Option<PitchClass>,
    current: Option<Progression>,
    saved: Vec<Progression>,
    session: Option<RecallSession>,
    tempo: u32,
    metronome: Metronome,
}

impl<S: KeyValueStore, R: RandomSource> Trainer<S, R> {
    /// Validate `config` and load the saved list from `backend`.
    pub fn new(config: TrainerConfig, backend: S, rng: R) -> Result<Self, TrainerError> {
        config.validate()?;
        let store = ProgressionStore::new(backend, config.storage_key.clone());
        let saved = store.load();
        log::debug!("trainer started with {} saved progressions", saved.len());
        Ok(Trainer {
            tempo: config.default_tempo,
            config,
            store,
            rng,
            selected_key: None,
            current: None,
            saved,
            session: None,
            metronome: Metronome::new(),
        })
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn store(&self) -> &ProgressionStore<S> {
        &self.store
    }

    pub fn selected_key(&self) -> Option<PitchClass> {
        self.selected_key
    }

    pub fn current(&self) -> Option<&Progression> {
        self.current.as_ref()
    }

    pub fn saved(&self) -> &[Progression] {
        &self.saved
    }

    pub fn session(&self) -> Option<&RecallSession> {
        self.session.as_ref()
    }

    pub fn tempo(&self) -> u32 {
        self.tempo
    }

    pub fn metronome(&self) -> &Metronome {
        &self.metronome
    }

    /// Initial page state: saved names and tempo readout.
    pub fn render_start(&self, surface: &mut impl Surface) {
        self.render_saved(surface);
        surface.set_text(Region::TempoValue, &self.tempo.to_string());
    }

    /// Choose the key for the next progression. Flats are normalised.
    pub fn select_key(&mut self, key: &str) -> Result<PitchClass, TrainerError> {
        let root = key.parse::<PitchClass>()?;
        self.selected_key = Some(root);
        Ok(root)
    }

    /// Generate a progression in the selected key, make it current and
    /// start a fresh recall session.
    pub fn generate(&mut self, surface: &mut impl Surface) -> Result<&Progression, TrainerError> {
        let progression = progression::generate(self.selected_key, &mut self.rng)?;

        surface.set_text(
            Region::Output,
            &format!(
                "Key: {}\n\nChords:\n{}",
                progression.key_label,
                progression.chord_list()
            ),
        );

        self.start_recall(progression.root, surface);
        Ok(&*self.current.insert(progression))
    }

    /// Lock the diagrams again and quiz on `root`.
    fn start_recall(&mut self, root: PitchClass, surface: &mut impl Surface) {
        surface.set_visible(Region::ChordDiagrams, false);
        surface.set_text(Region::RecallFeedback, "");

        let session = RecallSession::new(root);
        surface.set_visible(Region::RecallSection, true);
        surface.set_text(Region::RecallHint, &session.hint());
        self.session = Some(session);
    }

    /// Show the major/minor triad chart for the current root.
    pub fn show_chart(&self, surface: &mut impl Surface) -> Result<(), TrainerError> {
        let current = self.current.as_ref().ok_or(TrainerError::NoProgression)?;
        surface.set_text(Region::Output, &chord::build_chart(current.root));
        Ok(())
    }

    /// A fretboard click. Returns whether the note is now selected, or
    /// `None` when no session is running.
    pub fn toggle_note(&mut self, pitch: PitchClass) -> Option<bool> {
        self.session.as_mut().map(|s| s.toggle(pitch))
    }

    /// Check the recall answer; on success reveal the chord diagrams.
    pub fn check_recall(&mut self, surface: &mut impl Surface) -> Result<RecallVerdict, TrainerError> {
        let (Some(current), Some(session)) = (self.current.as_ref(), self.session.as_mut()) else {
            return Err(TrainerError::NoProgression);
        };

        let verdict = session.check();
        match verdict {
            RecallVerdict::Unlock => {
                surface.set_text(Region::RecallFeedback, FEEDBACK_CORRECT);
                surface.set_visible(Region::ChordDiagrams, true);
                let diagrams: Vec<String> =
                    current.chords.iter().map(|c| c.diagram_path()).collect();
                surface.set_items(Region::ChordDiagrams, &diagrams);
            }
            RecallVerdict::Retry => {
                surface.set_text(Region::RecallFeedback, FEEDBACK_RETRY);
            }
        }
        Ok(verdict)
    }

    /// Name the current progression and append a copy of it to the saved list.
    ///
    /// A missing or blank name keeps the current one; empty notes are stored
    /// as none.
    pub fn save_current(
        &mut self,
        name: Option<&str>,
        notes: Option<&str>,
        surface: &mut impl Surface,
    ) -> Result<(), TrainerError> {
        let mut named = self.current.clone().ok_or(TrainerError::NoProgression)?;

        if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
            named.name = name.to_string();
        }
        named.notes = notes.filter(|n| !n.is_empty()).map(str::to_string);

        self.store.append(&mut self.saved, named.clone())?;
        self.current = Some(named);
        self.render_saved(surface);
        Ok(())
    }

    /// Make a copy of saved entry `index` current, show it, and quiz on
    /// its root before its diagrams unlock.
    pub fn open_saved(&mut self, index: usize, surface: &mut impl Surface) -> Result<(), TrainerError> {
        let saved = self.saved.get(index).cloned().ok_or(TrainerError::IndexOutOfRange {
            index,
            len: self.saved.len(),
        })?;

        surface.set_text(
            Region::Output,
            &format!(
                "{}\n{}\n\n{}\n\nNotes:\n{}",
                saved.name,
                saved.key_label,
                saved.chord_list(),
                saved.notes.as_deref().unwrap_or("—")
            ),
        );
        self.start_recall(saved.root, surface);
        self.current = Some(saved);
        Ok(())
    }

    /// Delete saved entry `index` and persist.
    pub fn delete_saved(
        &mut self,
        index: usize,
        surface: &mut impl Surface,
    ) -> Result<Progression, TrainerError> {
        let removed = self.store.remove(&mut self.saved, index)?;
        self.render_saved(surface);
        Ok(removed)
    }

    fn render_saved(&self, surface: &mut impl Surface) {
        let names: Vec<String> = self.saved.iter().map(|p| p.name.clone()).collect();
        surface.set_items(Region::SavedList, &names);
    }

    /// Set the tempo, clamped to the configured range. A running metronome
    /// keeps its interval until restarted.
    pub fn set_tempo(&mut self, bpm: u32, surface: &mut impl Surface) -> u32 {
        self.tempo = self.config.clamp_tempo(bpm);
        surface.set_text(Region::TempoValue, &self.tempo.to_string());
        self.tempo
    }

    pub fn toggle_metronome(&mut self) -> MetronomeCommand {
        self.metronome.toggle(self.tempo)
    }

    /// Host timer callback. Returns whether a click was played.
    pub fn metronome_tick(&self, now: f64, audio: &mut impl AudioDevice) -> bool {
        match self.metronome.tick(now, &SoundSettings::from(&self.config)) {
            Some(click) => {
                audio.play(&[click]);
                true
            }
            None => false,
        }
    }

    /// Play chord `index` of the current progression.
    pub fn play_chord(
        &self,
        index: usize,
        now: f64,
        audio: &mut impl AudioDevice,
    ) -> Result<(), TrainerError> {
        let current = self.current.as_ref().ok_or(TrainerError::NoProgression)?;
        let chord = current.chords.get(index).ok_or(TrainerError::IndexOutOfRange {
            index,
            len: current.chords.len(),
        })?;
        audio.play(&sound::chord_tones(chord, now, &SoundSettings::from(&self.config)));
        Ok(())
    }

    /// Encode the current progression at the current tempo.
    pub fn export_midi(&self) -> Result<export::ExportFile, TrainerError> {
        export::export_file(
            self.current.as_ref(),
            self.tempo,
            &ExportSettings::from(&self.config),
        )
    }

    /// Encode the current progression and hand it to `delivery`.
    pub fn export(&self, delivery: &mut impl FileDelivery) -> Result<(), TrainerError> {
        let file = self.export_midi()?;
        log::debug!("exporting {} ({} bytes)", file.file_name, file.bytes.len());
        delivery.deliver(file);
        Ok(())
    }
}
