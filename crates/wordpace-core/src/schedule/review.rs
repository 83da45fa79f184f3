//! Review pools.
//!
//! Gathers the words of the most recent prior learning days so a test
//! session can re-ask them at spaced intervals.

use chrono::NaiveDate;

use crate::catalog::Assignment;
use crate::schedule::ScheduleCalculator;
use crate::wordbook::WordEntry;

/// Builds review pools by walking back through prior learning days.
#[derive(Clone, Copy)]
pub struct ReviewWindowResolver<'a> {
    calculator: ScheduleCalculator<'a>,
}

impl<'a> ReviewWindowResolver<'a> {
    pub fn new(calculator: ScheduleCalculator<'a>) -> Self {
        Self { calculator }
    }

    /// Words from up to `cycles` learning days before `today`, nearest day
    /// first. Empty when `today` is not itself a learning day or no prior
    /// learning days exist.
    ///
    /// Duplicates across days are kept on purpose: a word that showed up
    /// on two recent days is simply asked about more often.
    pub fn resolve(
        &self,
        assignment: &Assignment,
        today: NaiveDate,
        cycles: u32,
    ) -> Vec<WordEntry> {
        let current = match ScheduleCalculator::elapsed_learning_days(assignment, today) {
            Some(n) => n,
            None => return Vec::new(),
        };

        let mut pool = Vec::new();
        for i in 1..=cycles as usize {
            if i > current {
                break;
            }
            let target = current - i;
            if let Some(date) = ScheduleCalculator::date_for_learning_day(assignment, target) {
                if let Some(lesson) = self.calculator.resolve(assignment, date) {
                    pool.extend(lesson.words);
                }
            }
        }
        pool
    }
}
