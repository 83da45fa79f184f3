mod config;
pub mod database;
pub mod memory;

pub use config::Config;
pub use database::SqliteStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::catalog::{Assignment, CurriculumTemplate, LessonRecord};
use crate::error::StoreError;
use crate::wordbook::{WordEntry, Wordbook};

/// Read access to stored wordbooks.
///
/// `Ok(None)` means the id is unknown; callers that schedule against a
/// wordbook treat that the same as a read failure and resolve nothing.
pub trait WordbookStore {
    fn wordbook(&self, id: &str) -> Result<Option<Wordbook>, StoreError>;

    /// The word list alone, in import order.
    fn words(&self, wordbook_id: &str) -> Result<Option<Vec<WordEntry>>, StoreError>;
}

/// Read access to curriculum templates.
pub trait CurriculumCatalog {
    fn template(&self, id: &str) -> Result<Option<CurriculumTemplate>, StoreError>;

    fn templates(&self) -> Result<Vec<CurriculumTemplate>, StoreError>;
}

/// Per-student curriculum assignments.
pub trait AssignmentStore {
    fn assignments_for(&self, student: &str) -> Result<Vec<Assignment>, StoreError>;

    /// Inserts or overwrites by assignment id.
    fn upsert_assignment(&self, student: &str, assignment: &Assignment) -> Result<(), StoreError>;

    /// Removing an unknown id is a no-op.
    fn remove_assignment(&self, student: &str, assignment_id: &str) -> Result<(), StoreError>;
}

/// Per-student lesson completion history.
pub trait HistoryStore {
    /// Every record for `student`, ordered by date.
    fn history_for(&self, student: &str) -> Result<Vec<LessonRecord>, StoreError>;

    /// Inserts or overwrites the record keyed by the record's curriculum
    /// and date, so re-taking a lesson replaces the earlier attempt.
    fn upsert_record(&self, student: &str, record: &LessonRecord) -> Result<(), StoreError>;
}

/// Returns `~/.config/wordpace[-dev]/` based on WORDPACE_ENV.
///
/// Set WORDPACE_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("WORDPACE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("wordpace-dev")
    } else {
        base_dir.join("wordpace")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
