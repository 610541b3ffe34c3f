//! Collaborators outside the core: the rendering surface, the audio device
//! and file delivery.
//!
//! The in-memory implementations record what they were asked to do. The
//! WASM bindings hand the recorded [`SurfaceUpdate`]s to the page, which
//! applies them to the DOM.

use std::collections::HashMap;

use serde::Serialize;

use crate::export::ExportFile;
use crate::sound::ToneRequest;

/// Named regions of the page the trainer writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Region {
    /// Main text output (progression, chord chart, opened save).
    Output,
    RecallSection,
    RecallHint,
    RecallFeedback,
    /// Chord diagram images, hidden until recall succeeds.
    ChordDiagrams,
    SavedList,
    TempoValue,
}

/// Text/visibility setters for the page.
pub trait Surface {
    fn set_text(&mut self, region: Region, text: &str);
    fn set_visible(&mut self, region: Region, visible: bool);
    /// Replace the items listed in `region` (saved names, diagram paths).
    fn set_items(&mut self, region: Region, items: &[String]);
    /// Show a one-off notice, e.g. an alert.
    fn notify(&mut self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum SurfaceUpdate {
    Text { region: Region, text: String },
    Visible { region: Region, visible: bool },
    Items { region: Region, items: Vec<String> },
    Notice { message: String },
}

/// A [`Surface`] that records every update in order and keeps the latest
/// state of each region.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    updates: Vec<SurfaceUpdate>,
    text: HashMap<Region, String>,
    visible: HashMap<Region, bool>,
    items: HashMap<Region, Vec<String>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the updates recorded since the last drain.
    pub fn drain(&mut self) -> Vec<SurfaceUpdate> {
        std::mem::take(&mut self.updates)
    }

    pub fn updates(&self) -> &[SurfaceUpdate] {
        &self.updates
    }

    /// Current text of `region` (empty if never set).
    pub fn text(&self, region: Region) -> &str {
        self.text.get(&region).map_or("", String::as_str)
    }

    /// Regions start hidden.
    pub fn is_visible(&self, region: Region) -> bool {
        self.visible.get(&region).copied().unwrap_or(false)
    }

    pub fn items(&self, region: Region) -> &[String] {
        self.items.get(&region).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The most recent notice, if any.
    pub fn last_notice(&self) -> Option<&str> {
        self.updates.iter().rev().find_map(|u| match u {
            SurfaceUpdate::Notice { message } => Some(message.as_str()),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn set_text(&mut self, region: Region, text: &str) {
        self.text.insert(region, text.to_string());
        self.updates.push(SurfaceUpdate::Text {
            region,
            text: text.to_string(),
        });
    }

    fn set_visible(&mut self, region: Region, visible: bool) {
        self.visible.insert(region, visible);
        self.updates.push(SurfaceUpdate::Visible { region, visible });
    }

    fn set_items(&mut self, region: Region, items: &[String]) {
        self.items.insert(region, items.to_vec());
        self.updates.push(SurfaceUpdate::Items {
            region,
            items: items.to_vec(),
        });
    }

    fn notify(&mut self, message: &str) {
        self.updates.push(SurfaceUpdate::Notice {
            message: message.to_string(),
        });
    }
}

/// Emits simultaneous tones.
pub trait AudioDevice {
    fn play(&mut self, tones: &[ToneRequest]);
}

/// An [`AudioDevice`] that keeps every request.
#[derive(Debug, Clone, Default)]
pub struct ToneLog {
    pub tones: Vec<ToneRequest>,
}

impl AudioDevice for ToneLog {
    fn play(&mut self, tones: &[ToneRequest]) {
        self.tones.extend_from_slice(tones);
    }
}

/// Hands a finished file to the user (a browser download).
pub trait FileDelivery {
    fn deliver(&mut self, file: ExportFile);
}

/// A [`FileDelivery`] that keeps every delivered file.
#[derive(Debug, Clone, Default)]
pub struct DownloadLog {
    pub files: Vec<ExportFile>,
}

impl FileDelivery for DownloadLog {
    fn deliver(&mut self, file: ExportFile) {
        self.files.push(file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_surface_tracks_latest_state() {
        let mut surface = RecordingSurface::new();
        surface.set_text(Region::Output, "first");
        surface.set_text(Region::Output, "second");
        surface.set_visible(Region::RecallSection, true);
        surface.set_items(Region::SavedList, &["Verse".to_string()]);

        assert_eq!(surface.text(Region::Output), "second");
        assert_eq!(surface.text(Region::RecallHint), "");
        assert!(surface.is_visible(Region::RecallSection));
        assert!(!surface.is_visible(Region::ChordDiagrams));
        assert_eq!(surface.items(Region::SavedList), ["Verse"]);
        assert_eq!(surface.updates().len(), 4);
    }

    #[test]
    fn drain_empties_updates_but_keeps_state() {
        let mut surface = RecordingSurface::new();
        surface.notify("Select a key first.");
        assert_eq!(surface.last_notice(), Some("Select a key first."));

        let drained = surface.drain();
        assert_eq!(drained.len(), 1);
        assert!(surface.updates().is_empty());
        assert_eq!(surface.last_notice(), None);
    }

    #[test]
    fn updates_serialize_for_the_page() {
        let update = SurfaceUpdate::Visible {
            region: Region::ChordDiagrams,
            visible: true,
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"op": "visible", "region": "chordDiagrams", "visible": true})
        );
    }
}
