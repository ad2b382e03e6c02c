use crate::book::{EntryId, Lang};
use thiserror::Error;

/// Construction-time errors: the book content itself is broken and must be
/// fixed at the source, never worked around at query time.
#[derive(Debug, Error)]
pub enum BookError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid book JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate entry id {id}")]
    DuplicateEntry { id: EntryId },

    #[error("entry {id} has no {lang} text (the default language must always be present)")]
    MissingText { id: EntryId, lang: Lang },

    #[error("entry {entry} cites unknown parent {parent}")]
    UnknownReference { entry: EntryId, parent: EntryId },

    #[error("dependency cycle detected: {}", path.iter().map(|id| id.0.as_str()).collect::<Vec<_>>().join(" -> "))]
    CycleDetected { path: Vec<EntryId> },
}

/// Recoverable query-time errors, surfaced at the API boundary when a caller
/// asks about an entry the loaded book does not contain.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("no such entry: {id}")]
    NotFound { id: EntryId },

    #[error("position {position} out of range (book has {count} entries)")]
    PositionOutOfRange { position: usize, count: usize },
}
