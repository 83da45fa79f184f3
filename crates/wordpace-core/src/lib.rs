//! # WordPace Core Library
//!
//! This library provides the core business logic for the WordPace learning
//! academy: curriculum scheduling and adaptive vocabulary test sessions.
//! Front ends (dashboards, the mobile study view) are thin layers over the
//! same operations exposed here.
//!
//! ## Architecture
//!
//! - **Wordbook**: Imported word lists and on-demand unit indexing
//! - **Catalog**: Curriculum templates, per-student assignments, history
//! - **Schedule**: Date-to-lesson resolution, pacing policies, review
//!   windows and backlog scanning
//! - **Session**: A phase-based test state machine driven by caller
//!   commands
//! - **Storage**: SQLite-backed stores behind repository traits, plus
//!   TOML-based configuration
//!
//! ## Key Components
//!
//! - [`ScheduleCalculator`]: Resolves what a student owes on a date
//! - [`TestSession`]: The study/test/review state machine
//! - [`SqliteStore`]: Persistence for the whole academy dataset
//! - [`Config`]: Application configuration management

pub mod catalog;
pub mod error;
pub mod schedule;
pub mod session;
pub mod storage;
pub mod wordbook;

pub use catalog::{
    Assignment, CurriculumItem, CurriculumTemplate, DailyGoal, ItemSettings, LessonRecord,
    StudyDay, TestKind,
};
pub use error::{ConfigError, CoreError, Result, SessionError, StoreError};
pub use schedule::{
    BacklogScanner, DailyLesson, IncompleteLesson, ReviewWindowResolver, ScheduleCalculator,
};
pub use session::{AnswerFeedback, PhaseTag, Prompt, SessionInput, SessionResult, TestSession};
pub use storage::{
    AssignmentStore, Config, CurriculumCatalog, HistoryStore, MemoryStore, SqliteStore,
    WordbookStore,
};
pub use wordbook::{index_units, Unit, WordEntry, Wordbook};
