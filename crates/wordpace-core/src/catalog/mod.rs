//! Curriculum templates and student assignments.
//!
//! A curriculum template is an ordered list of items; each item points at a
//! wordbook and carries the pacing and test settings for it. Item order
//! defines sequential unlock: one item's learning days are fully consumed
//! before the next item begins. Templates are shared; the per-student
//! [`Assignment`] binds one to a start date and weekday set.

pub mod assignment;
pub mod history;

pub use assignment::{Assignment, StudyDay};
pub use history::LessonRecord;

use serde::{Deserialize, Serialize};

/// Pacing policy: how much of a wordbook is due per learning day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DailyGoal {
    /// A fixed word count per day, taken from [`ItemSettings::word_count`].
    #[serde(rename = "manual")]
    Manual,
    /// Half a unit per day: even days take the first `ceil(n/2)` words of
    /// the unit, odd days the remainder.
    #[serde(rename = "0.5_unit")]
    HalfUnit,
    /// One unit per day.
    #[serde(rename = "1_unit")]
    OneUnit,
    /// Two units per day.
    #[serde(rename = "2_units")]
    TwoUnits,
}

/// Input mode of the main test phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestKind {
    /// The student types the English headword.
    Typing,
    /// The student reassembles the headword from shuffled fragments.
    Scramble,
}

/// Pacing and scoring settings for one curriculum item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSettings {
    pub daily_goal: DailyGoal,
    /// Words per day under [`DailyGoal::Manual`]; ignored otherwise.
    #[serde(default = "default_word_count")]
    pub word_count: usize,
    pub test_kind: TestKind,
    /// Minimum main-round score (0..=100) required to advance.
    #[serde(default = "default_pass_score")]
    pub pass_score: u32,
}

fn default_word_count() -> usize {
    10
}

fn default_pass_score() -> u32 {
    70
}

impl Default for ItemSettings {
    fn default() -> Self {
        Self {
            daily_goal: DailyGoal::OneUnit,
            word_count: default_word_count(),
            test_kind: TestKind::Typing,
            pass_score: default_pass_score(),
        }
    }
}

/// One ordered entry of a curriculum template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurriculumItem {
    /// Wordbook this item walks through.
    pub wordbook_id: String,
    pub title: String,
    pub settings: ItemSettings,
}

/// An ordered list of items making up one course of study.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurriculumTemplate {
    pub id: String,
    pub title: String,
    pub items: Vec<CurriculumItem>,
}
