//! Missed-lesson scanning.
//!
//! Walks every learning day from an assignment's start date up to (but
//! not including) today and reports the ones with no completion record.
//! Read-side only; nothing here mutates history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::{Assignment, LessonRecord};
use crate::schedule::{DailyLesson, ScheduleCalculator};

/// A scheduled lesson that was never completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncompleteLesson {
    pub assignment_id: String,
    pub curriculum_id: String,
    pub date: NaiveDate,
    /// The lesson as it was due, so callers can render it directly.
    pub lesson: DailyLesson,
}

/// Scans assignments for learning days missing a history record.
#[derive(Clone, Copy)]
pub struct BacklogScanner<'a> {
    calculator: ScheduleCalculator<'a>,
}

impl<'a> BacklogScanner<'a> {
    pub fn new(calculator: ScheduleCalculator<'a>) -> Self {
        Self { calculator }
    }

    /// Every learning day in `[start_date, today)` without a matching
    /// record, oldest first per assignment.
    ///
    /// Days where nothing resolves (weekends, the exhausted tail of a
    /// curriculum) are not missing, they were never due.
    pub fn scan(
        &self,
        assignments: &[Assignment],
        history: &[LessonRecord],
        today: NaiveDate,
    ) -> Vec<IncompleteLesson> {
        let mut missing = Vec::new();
        for assignment in assignments {
            let mut date = assignment.start_date;
            while date < today {
                if let Some(lesson) = self.calculator.resolve(assignment, date) {
                    let done = history.iter().any(|record| {
                        record.curriculum_id == assignment.curriculum_id && record.date == date
                    });
                    if !done {
                        missing.push(IncompleteLesson {
                            assignment_id: assignment.id.clone(),
                            curriculum_id: assignment.curriculum_id.clone(),
                            date,
                            lesson,
                        });
                    }
                }
                date += chrono::Duration::days(1);
            }
        }
        missing
    }
}
