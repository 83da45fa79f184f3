//! Date-to-lesson resolution.
//!
//! [`ScheduleCalculator`] answers "what does this student owe on this
//! date". Template and wordbook lookups go through injected store ports;
//! a miss of any kind (date outside the plan, exhausted curriculum,
//! unknown template or wordbook) resolves to `None`, because a day with
//! nothing due is a normal outcome rather than an error.

use chrono::{Datelike, NaiveDate};

use crate::catalog::{Assignment, CurriculumItem, StudyDay};
use crate::schedule::{pacing, DailyLesson};
use crate::storage::{CurriculumCatalog, WordbookStore};
use crate::wordbook::{index_units, WordEntry};

/// Resolves calendar dates to daily lessons for one assignment.
///
/// Holds borrowed ports only, so call sites construct one per use.
#[derive(Clone, Copy)]
pub struct ScheduleCalculator<'a> {
    templates: &'a dyn CurriculumCatalog,
    wordbooks: &'a dyn WordbookStore,
}

impl<'a> ScheduleCalculator<'a> {
    pub fn new(templates: &'a dyn CurriculumCatalog, wordbooks: &'a dyn WordbookStore) -> Self {
        Self {
            templates,
            wordbooks,
        }
    }

    /// Zero-based learning-day index of `date`, or `None` when `date` is
    /// before the start or not on a configured weekday.
    ///
    /// Weeks are 7-day windows anchored at the start date; within a week,
    /// a date's index follows the configured order of `days`.
    pub fn elapsed_learning_days(assignment: &Assignment, date: NaiveDate) -> Option<usize> {
        if date < assignment.start_date || assignment.days.is_empty() {
            return None;
        }
        let study_day = StudyDay::from_weekday(date.weekday())?;
        let day_index = assignment.days.iter().position(|d| *d == study_day)?;
        let week_offset = ((date - assignment.start_date).num_days() / 7) as usize;
        Some(week_offset * assignment.days.len() + day_index)
    }

    /// Calendar date whose learning-day index equals `n`; the inverse of
    /// [`Self::elapsed_learning_days`].
    pub fn date_for_learning_day(assignment: &Assignment, n: usize) -> Option<NaiveDate> {
        if assignment.days.is_empty() {
            return None;
        }
        let week = (n / assignment.days.len()) as i64;
        let day = assignment.days[n % assignment.days.len()];
        let start_weekday = assignment.start_date.weekday().num_days_from_monday() as i64;
        let target_weekday = day.weekday().num_days_from_monday() as i64;
        let offset = (target_weekday - start_weekday).rem_euclid(7);
        Some(assignment.start_date + chrono::Duration::days(week * 7 + offset))
    }

    /// Resolve the lesson due on `date`, or `None` when nothing is due.
    pub fn resolve(&self, assignment: &Assignment, date: NaiveDate) -> Option<DailyLesson> {
        // 1. Locate the date within the plan.
        let elapsed = Self::elapsed_learning_days(assignment, date)?;

        // 2. Fetch the template; a missing reference means nothing due.
        let template = self
            .templates
            .template(&assignment.curriculum_id)
            .ok()
            .flatten()?;

        // 3. Walk the ordered items until one absorbs the remaining days.
        let mut remaining = elapsed;
        for item in &template.items {
            let words = self.wordbooks.words(&item.wordbook_id).ok().flatten()?;
            let days = pacing::total_days(&item.settings, &words);
            if remaining < days {
                return build_lesson(item, &words, remaining, date);
            }
            remaining -= days;
        }

        // 4. Every item consumed: the curriculum is exhausted.
        None
    }
}

/// Assembles the lesson for `day` within `item`.
///
/// Returns `None` when the resolved slice is empty (the odd-day remainder
/// of a half-unit split over a single-word unit), so a non-`None` lesson
/// always carries at least one word.
fn build_lesson(
    item: &CurriculumItem,
    words: &[WordEntry],
    day: usize,
    date: NaiveDate,
) -> Option<DailyLesson> {
    let slice = pacing::slice_for_day(&item.settings, words, day)?;
    let slice_words = slice.words(words);
    if slice_words.is_empty() {
        return None;
    }

    // Position range relative to the containing unit when the slice stays
    // inside one, else relative to the whole book.
    let units = index_units(words);
    let (lo, hi) = match units
        .iter()
        .find(|u| u.start <= slice.start && slice.end <= u.end)
    {
        Some(unit) => (slice.start - unit.start + 1, slice.end - unit.start),
        None => (slice.start + 1, slice.end),
    };

    Some(DailyLesson {
        date,
        wordbook_id: item.wordbook_id.clone(),
        item_title: item.title.clone(),
        textbook: slice_words[0].textbook.clone(),
        major: joined_label(slice_words.iter().map(|w| w.major.as_str())),
        minor: joined_label(slice_words.iter().map(|w| w.minor.as_str())),
        unit_name: joined_label(slice_words.iter().map(|w| w.unit_name.as_str())),
        word_range: format!("{}~{}", lo, hi),
        word_count: slice_words.len(),
        words: slice_words.to_vec(),
        daily_goal: item.settings.daily_goal,
        test_kind: item.settings.test_kind,
        pass_score: item.settings.pass_score,
    })
}

/// Unique non-empty values in first-seen order, comma-joined; a literal
/// placeholder when nothing remains.
fn joined_label<'a>(values: impl Iterator<Item = &'a str>) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for value in values {
        if !value.is_empty() && !seen.contains(&value) {
            seen.push(value);
        }
    }
    if seen.is_empty() {
        "unspecified".to_string()
    } else {
        seen.join(", ")
    }
}
