//! Lesson completion records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Result of one completed test session, keyed by the scheduled date.
///
/// `date` is the date the lesson was due, not the date it was finished.
/// Redoing a lesson overwrites the earlier record for the same
/// (curriculum, date) key; there is never more than one record per key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonRecord {
    /// Template id of the assignment the lesson belonged to.
    pub curriculum_id: String,
    /// Scheduled date of the lesson.
    pub date: NaiveDate,
    pub completed_at: DateTime<Utc>,
    /// Main-phase score, 0..=100.
    pub main_score: u32,
    /// First full review-round score; `None` when no review pool existed.
    pub review_score: Option<u32>,
}
