//! Progression Store — the saved list as one JSON document in a key-value store.
//!
//! The document is a JSON array of progression records and is replaced
//! whole on every write. Anything that does not read back as a list of
//! valid progressions is discarded and loads as an empty list.

use std::collections::HashMap;

use crate::error::TrainerError;
use crate::progression::Progression;

/// String key-value storage, e.g. the browser's `localStorage`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    /// Fails with [`TrainerError::Storage`] when the value is not stored.
    fn set(&mut self, key: &str, value: String) -> Result<(), TrainerError>;
}

/// In-memory [`KeyValueStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store already holding `value` under `key`.
    pub fn with_entry(key: &str, value: impl Into<String>) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), value.into());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), TrainerError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// Reads and writes the saved progression list under a single key.
#[derive(Debug, Clone)]
pub struct ProgressionStore<S> {
    backend: S,
    key: String,
}

impl<S: KeyValueStore> ProgressionStore<S> {
    pub fn new(backend: S, key: impl Into<String>) -> Self {
        ProgressionStore {
            backend,
            key: key.into(),
        }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// The raw persisted document, if any.
    pub fn document(&self) -> Option<String> {
        self.backend.get(&self.key)
    }

    /// Load the saved list. Missing or malformed data yields an empty list.
    pub fn load(&self) -> Vec<Progression> {
        let Some(document) = self.backend.get(&self.key) else {
            return Vec::new();
        };
        match parse_document(&document) {
            Ok(list) => list,
            Err(e) => {
                log::warn!("discarding saved progressions under '{}': {e}", self.key);
                Vec::new()
            }
        }
    }

    /// Replace the persisted document with `list`.
    pub fn save(&mut self, list: &[Progression]) -> Result<(), TrainerError> {
        let document = serde_json::to_string(list)?;
        self.backend.set(&self.key, document)?;
        log::debug!("persisted {} saved progressions", list.len());
        Ok(())
    }

    /// Push `progression` to the end of `list` and persist. `list` only
    /// changes once the write succeeds.
    pub fn append(
        &mut self,
        list: &mut Vec<Progression>,
        progression: Progression,
    ) -> Result<(), TrainerError> {
        let mut next = Vec::with_capacity(list.len() + 1);
        next.extend_from_slice(list);
        next.push(progression);
        self.save(&next)?;
        *list = next;
        Ok(())
    }

    /// Remove the entry at `index` and persist. Out of range or a failed
    /// write leaves `list` untouched.
    pub fn remove(
        &mut self,
        list: &mut Vec<Progression>,
        index: usize,
    ) -> Result<Progression, TrainerError> {
        if index >= list.len() {
            return Err(TrainerError::IndexOutOfRange {
                index,
                len: list.len(),
            });
        }
        let mut next = list.clone();
        let removed = next.remove(index);
        self.save(&next)?;
        *list = next;
        Ok(removed)
    }
}

/// Parse and validate a persisted document.
pub fn parse_document(document: &str) -> Result<Vec<Progression>, TrainerError> {
    let list: Vec<Progression> = serde_json::from_str(document)
        .map_err(|e| TrainerError::MalformedPersistedData(e.to_string()))?;
    for progression in &list {
        progression.validate()?;
    }
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::PitchClass;

    const KEY: &str = "progressions";

    /// Backend whose quota is always exhausted.
    struct FullStore;

    impl KeyValueStore for FullStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&mut self, _key: &str, _value: String) -> Result<(), TrainerError> {
            Err(TrainerError::Storage("quota exceeded".into()))
        }
    }

    fn verse() -> Progression {
        let mut p = Progression::new(
            PitchClass::C,
            [
                "C major".parse().unwrap(),
                "G major".parse().unwrap(),
                "A minor".parse().unwrap(),
                "F major".parse().unwrap(),
            ],
        )
        .unwrap();
        p.name = "Verse".to_string();
        p
    }

    fn chorus() -> Progression {
        let mut p = Progression::new(
            PitchClass::G,
            [
                "E minor".parse().unwrap(),
                "C major".parse().unwrap(),
                "G major".parse().unwrap(),
                "D major".parse().unwrap(),
            ],
        )
        .unwrap();
        p.name = "Chorus".to_string();
        p.notes = Some("palm mute".to_string());
        p
    }

    #[test]
    fn empty_store_loads_empty() {
        let store = ProgressionStore::new(MemoryStore::new(), KEY);
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_then_load_round_trip() {
        let mut store = ProgressionStore::new(MemoryStore::new(), KEY);
        let list = vec![verse(), chorus()];
        store.save(&list).unwrap();
        assert_eq!(store.load(), list);
    }

    #[test]
    fn persisted_document_shape() {
        let mut store = ProgressionStore::new(MemoryStore::new(), KEY);
        let mut list = Vec::new();
        store.append(&mut list, verse()).unwrap();

        let doc: serde_json::Value = serde_json::from_str(&store.document().unwrap()).unwrap();
        let entries = doc.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["name"], "Verse");
        assert_eq!(
            entries[0]["chords"],
            serde_json::json!(["C major", "G major", "A minor", "F major"])
        );
    }

    #[test]
    fn malformed_json_loads_empty() {
        let store = ProgressionStore::new(MemoryStore::with_entry(KEY, "{not json"), KEY);
        assert!(store.load().is_empty());
    }

    #[test]
    fn invalid_records_discard_whole_document() {
        let three_chords = r#"[{"name":"x","root":"C","key":"C major","chords":["C major","D minor","E minor"],"notes":null}]"#;
        let bad_quality = r#"[{"name":"x","root":"C","key":"C major","chords":["C major","D minor","E minor","F sus4"],"notes":null}]"#;
        let duplicated = r#"[{"name":"x","root":"C","key":"C major","chords":["C major","C major","E minor","F major"],"notes":null}]"#;
        let wrong_key = r#"[{"name":"x","root":"C","key":"G major","chords":["C major","D minor","E minor","F major"],"notes":null}]"#;
        let not_list = r#"{"name":"x"}"#;
        for doc in [three_chords, bad_quality, duplicated, wrong_key, not_list] {
            let store = ProgressionStore::new(MemoryStore::with_entry(KEY, doc), KEY);
            assert!(store.load().is_empty(), "expected empty for {doc}");
        }
    }

    #[test]
    fn missing_notes_field_is_tolerated() {
        let doc = r#"[{"name":"Old","root":"D","key":"D major","chords":["D major","A major","B minor","G major"]}]"#;
        let store = ProgressionStore::new(MemoryStore::with_entry(KEY, doc), KEY);
        let list = store.load();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "Old");
        assert_eq!(list[0].notes, None);
    }

    #[test]
    fn append_preserves_order_and_persists() {
        let mut store = ProgressionStore::new(MemoryStore::new(), KEY);
        let mut list = Vec::new();
        store.append(&mut list, verse()).unwrap();
        store.append(&mut list, chorus()).unwrap();

        let names: Vec<String> = store.load().into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["Verse", "Chorus"]);
    }

    #[test]
    fn remove_in_range() {
        let mut store = ProgressionStore::new(MemoryStore::new(), KEY);
        let mut list = vec![verse(), chorus(), verse()];
        store.save(&list).unwrap();

        let removed = store.remove(&mut list, 1).unwrap();
        assert_eq!(removed.name, "Chorus");
        assert_eq!(list.len(), 2);
        assert_eq!(store.load(), list);
    }

    #[test]
    fn remove_out_of_range_leaves_list() {
        let mut store = ProgressionStore::new(MemoryStore::new(), KEY);
        let mut list = vec![verse()];
        store.save(&list).unwrap();
        let before = store.document();

        match store.remove(&mut list, 1) {
            Err(TrainerError::IndexOutOfRange { index, len }) => {
                assert_eq!((index, len), (1, 1));
            }
            other => panic!("expected IndexOutOfRange, got {other:?}"),
        }
        assert_eq!(list, vec![verse()]);
        assert_eq!(store.document(), before);
    }

    #[test]
    fn failed_write_leaves_list_untouched() {
        let mut store = ProgressionStore::new(FullStore, KEY);
        let mut list = vec![verse()];

        assert!(matches!(
            store.append(&mut list, chorus()),
            Err(TrainerError::Storage(_))
        ));
        assert_eq!(list, vec![verse()]);

        assert!(store.remove(&mut list, 0).is_err());
        assert_eq!(list, vec![verse()]);
    }
}
