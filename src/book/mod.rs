//! Book content model and the entry index.
//!
//! A book is an ordered list of entries (definitions, axioms, propositions,
//! ...), each carrying per-language text and the ids of the earlier entries
//! it cites as logical prerequisites. `EntryIndex` owns the canonical order
//! and provides O(1) id/position lookups; the dependency relation itself
//! lives in `crate::graph`.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

use crate::errors::{BookError, GraphError};

pub mod notation;

/// Unique identifier of one entry, e.g. `e1p8` for Proposition 8 of Part 1.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EntryId(pub String);

impl EntryId {
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Language of an entry text. `En` is the default and the fallback when a
/// translation is missing for a particular entry.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Hash, Default,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    La,
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lang::En => f.write_str("en"),
            Lang::La => f.write_str("la"),
        }
    }
}

/// One entry as authored in the book source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntrySource {
    pub id: String,
    /// Ids of the entries this entry is proved from, in citation order.
    #[serde(default)]
    pub parents: Vec<String>,
    /// Per-language text. The default language must be present.
    #[serde(default)]
    pub text: BTreeMap<Lang, String>,
}

/// The raw book document: entries in canonical reading order.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Book {
    pub entries: Vec<EntrySource>,
}

impl Book {
    /// Load a book document from a JSON file.
    ///
    /// # Errors
    /// Returns `BookError::Io` if the file cannot be read and
    /// `BookError::Json` if it is not a valid book document.
    pub fn load_json(path: &Path) -> Result<Self, BookError> {
        let data = std::fs::read_to_string(path)?;
        let book: Book = serde_json::from_str(&data)?;
        Ok(book)
    }
}

/// One immutable entry after indexing.
#[derive(Debug, Clone, Serialize)]
pub struct Entry {
    pub id: EntryId,
    /// Dense 0-based index in canonical reading order.
    pub position: usize,
    text: BTreeMap<Lang, String>,
}

/// Canonical ordered list of entries with O(1) lookups in both directions.
///
/// Built once from static content; immutable for the process lifetime, so
/// concurrent reads need no locking.
#[derive(Debug, Clone, Default)]
pub struct EntryIndex {
    entries: Vec<Entry>,
    by_id: HashMap<EntryId, usize>,
}

impl EntryIndex {
    /// Index the given sources in their authored order.
    ///
    /// # Errors
    /// Returns `BookError::DuplicateEntry` if two sources share an id and
    /// `BookError::MissingText` if an entry lacks default-language text.
    pub fn from_sources(sources: &[EntrySource]) -> Result<Self, BookError> {
        let mut entries: Vec<Entry> = Vec::with_capacity(sources.len());
        let mut by_id: HashMap<EntryId, usize> = HashMap::with_capacity(sources.len());
        for (position, src) in sources.iter().enumerate() {
            let id = EntryId::new(&src.id);
            if !src.text.contains_key(&Lang::default()) {
                return Err(BookError::MissingText { id, lang: Lang::default() });
            }
            if by_id.insert(id.clone(), position).is_some() {
                return Err(BookError::DuplicateEntry { id });
            }
            entries.push(Entry { id, position, text: src.text.clone() });
        }
        Ok(Self { entries, by_id })
    }

    /// Number of entries in the book.
    #[must_use]
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in canonical reading order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// Resolve an id to its canonical position.
    ///
    /// # Errors
    /// Returns `GraphError::NotFound` for an unknown id.
    pub fn position_of(&self, id: &EntryId) -> Result<usize, GraphError> {
        self.by_id.get(id).copied().ok_or_else(|| GraphError::NotFound { id: id.clone() })
    }

    // Infallible position lookup for positions the graph already validated.
    pub(crate) fn id_of_position(&self, position: usize) -> &EntryId {
        &self.entries[position].id
    }

    /// Resolve a canonical position to its entry id.
    ///
    /// # Errors
    /// Returns `GraphError::PositionOutOfRange` for positions >= `count()`.
    pub fn id_at(&self, position: usize) -> Result<&EntryId, GraphError> {
        self.entries.get(position).map(|e| &e.id).ok_or(GraphError::PositionOutOfRange {
            position,
            count: self.entries.len(),
        })
    }

    /// Displayable text of an entry in the requested language, falling back
    /// to the default language when that translation is absent.
    ///
    /// # Errors
    /// Returns `GraphError::NotFound` for an unknown id.
    pub fn text_of(&self, id: &EntryId, lang: Lang) -> Result<&str, GraphError> {
        let entry = &self.entries[self.position_of(id)?];
        // Default-language text is guaranteed present by `from_sources`.
        entry
            .text
            .get(&lang)
            .or_else(|| entry.text.get(&Lang::default()))
            .map(String::as_str)
            .ok_or_else(|| GraphError::NotFound { id: id.clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn src(id: &str, texts: &[(Lang, &str)]) -> EntrySource {
        EntrySource {
            id: id.to_string(),
            parents: vec![],
            text: texts.iter().map(|(l, t)| (*l, (*t).to_string())).collect(),
        }
    }

    #[test]
    fn lookups_are_total_and_inverse() {
        let index = EntryIndex::from_sources(&[
            src("e1d1", &[(Lang::En, "By cause of itself...")]),
            src("e1a1", &[(Lang::En, "All things that are...")]),
            src("e1p1", &[(Lang::En, "A substance is prior...")]),
        ])
        .unwrap();

        assert_eq!(index.count(), 3);
        for pos in 0..index.count() {
            let id = index.id_at(pos).unwrap().clone();
            assert_eq!(index.position_of(&id).unwrap(), pos);
        }
        assert!(matches!(
            index.id_at(3),
            Err(GraphError::PositionOutOfRange { position: 3, count: 3 })
        ));
        assert!(matches!(
            index.position_of(&EntryId::new("e9p9")),
            Err(GraphError::NotFound { .. })
        ));
    }

    #[test]
    fn text_falls_back_to_default_language() {
        let index = EntryIndex::from_sources(&[
            src("e1p1", &[(Lang::En, "A substance is prior..."), (Lang::La, "Substantia prior est...")]),
            src("e1p2", &[(Lang::En, "Two substances...")]),
        ])
        .unwrap();

        assert_eq!(index.text_of(&"e1p1".into(), Lang::La).unwrap(), "Substantia prior est...");
        // No Latin text for e1p2: fall back to English rather than silence.
        assert_eq!(index.text_of(&"e1p2".into(), Lang::La).unwrap(), "Two substances...");
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let err = EntryIndex::from_sources(&[
            src("e1p1", &[(Lang::En, "x")]),
            src("e1p1", &[(Lang::En, "y")]),
        ])
        .unwrap_err();
        assert!(matches!(err, BookError::DuplicateEntry { id } if id.as_str() == "e1p1"));
    }

    #[test]
    fn missing_default_text_is_rejected() {
        let err = EntryIndex::from_sources(&[src("e1p1", &[(Lang::La, "Substantia...")])])
            .unwrap_err();
        assert!(matches!(err, BookError::MissingText { lang: Lang::En, .. }));
    }

    #[test]
    fn book_json_round_trip() {
        let json = r#"{
            "entries": [
                { "id": "e1d1", "text": { "en": "By cause of itself..." } },
                { "id": "e1p1", "parents": ["e1d1"], "text": { "en": "...", "la": "..." } }
            ]
        }"#;
        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(book.entries.len(), 2);
        assert_eq!(book.entries[1].parents, vec!["e1d1".to_string()]);
        let index = EntryIndex::from_sources(&book.entries).unwrap();
        assert_eq!(index.position_of(&"e1p1".into()).unwrap(), 1);
    }
}
