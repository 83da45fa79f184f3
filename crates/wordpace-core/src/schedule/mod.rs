//! Curriculum scheduling.
//!
//! Maps calendar dates to the exact word slice a student owes that day:
//!
//! - [`pacing`]: per-item day counts and day slices (the pacing policies)
//! - [`calculator`]: date -> active item -> [`DailyLesson`]
//! - [`review`]: pools words from the most recent prior learning days
//! - [`backlog`]: reports past learning days with no completion record
//!
//! Everything here is a pure function of (catalog, wordbooks, date) and is
//! safe to recompute at will.

pub mod backlog;
pub mod calculator;
pub mod pacing;
pub mod review;

pub use backlog::{BacklogScanner, IncompleteLesson};
pub use calculator::ScheduleCalculator;
pub use pacing::DaySlice;
pub use review::ReviewWindowResolver;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::{DailyGoal, TestKind};
use crate::wordbook::WordEntry;

/// Everything a client needs to present one day's lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLesson {
    /// The learning day this lesson is due on.
    pub date: NaiveDate,
    pub wordbook_id: String,
    /// Title of the active curriculum item.
    pub item_title: String,
    pub textbook: String,
    /// Major section label(s) covered by the slice.
    pub major: String,
    /// Minor section label(s) covered by the slice.
    pub minor: String,
    pub unit_name: String,
    /// 1-based position range of the slice, rendered as `"a~b"`.
    pub word_range: String,
    pub word_count: usize,
    /// The words due, in wordbook order. Never empty.
    pub words: Vec<WordEntry>,
    pub daily_goal: DailyGoal,
    pub test_kind: TestKind,
    /// Minimum main-round score required to advance, 0..=100.
    pub pass_score: u32,
}
