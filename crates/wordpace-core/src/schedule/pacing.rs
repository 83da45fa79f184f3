//! Per-item pacing.
//!
//! Answers two questions for a curriculum item: how many learning days it
//! consumes in total, and which contiguous slice of its wordbook is due on
//! a given day. Unit-based policies lean on [`index_units`]; the manual
//! policy windows the raw word list.

use crate::catalog::{DailyGoal, ItemSettings};
use crate::wordbook::{index_units, Unit, WordEntry};

/// A resolved day slice: a contiguous index range into the wordbook.
///
/// Every pacing policy produces contiguous ranges because units partition
/// the word list in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySlice {
    /// Start index (inclusive).
    pub start: usize,
    /// End index (exclusive).
    pub end: usize,
}

impl DaySlice {
    /// The entries this slice spans within its source list.
    pub fn words<'a>(&self, words: &'a [WordEntry]) -> &'a [WordEntry] {
        &words[self.start..self.end]
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Number of learning days the item consumes.
///
/// An item with zero words, zero units, or a zero manual word count takes
/// zero days and is skipped entirely by the schedule walk.
pub fn total_days(settings: &ItemSettings, words: &[WordEntry]) -> usize {
    if words.is_empty() {
        return 0;
    }
    match settings.daily_goal {
        DailyGoal::Manual => {
            if settings.word_count == 0 {
                return 0;
            }
            ceil_div(words.len(), settings.word_count)
        }
        DailyGoal::HalfUnit => index_units(words).len() * 2,
        DailyGoal::OneUnit => index_units(words).len(),
        DailyGoal::TwoUnits => ceil_div(index_units(words).len(), 2),
    }
}

/// The slice due on `day` (zero-based within the item), or `None` once the
/// item is exhausted.
///
/// The caller subtracts [`total_days`] and moves to the next item on
/// `None`. The returned slice can be empty on the odd day of a half-unit
/// split over a single-word unit; it is still a scheduled day.
pub fn slice_for_day(settings: &ItemSettings, words: &[WordEntry], day: usize) -> Option<DaySlice> {
    if day >= total_days(settings, words) {
        return None;
    }
    let slice = match settings.daily_goal {
        DailyGoal::Manual => {
            let start = day * settings.word_count;
            let end = (start + settings.word_count).min(words.len());
            DaySlice { start, end }
        }
        DailyGoal::HalfUnit => {
            let units = index_units(words);
            half_slice(&units[day / 2], day % 2 == 0)
        }
        DailyGoal::OneUnit => {
            let units = index_units(words);
            DaySlice {
                start: units[day].start,
                end: units[day].end,
            }
        }
        DailyGoal::TwoUnits => {
            let units = index_units(words);
            let first = &units[day * 2];
            let last = units.get(day * 2 + 1).unwrap_or(first);
            DaySlice {
                start: first.start,
                end: last.end,
            }
        }
    };
    Some(slice)
}

/// Splits a unit for the half-unit policy.
///
/// The first half always takes `ceil(n/2)` words, so an odd unit front-
/// loads the extra word and the remainder may even be empty for a
/// single-word unit.
fn half_slice(unit: &Unit, first_half: bool) -> DaySlice {
    let mid = unit.start + ceil_div(unit.len(), 2);
    if first_half {
        DaySlice {
            start: unit.start,
            end: mid,
        }
    } else {
        DaySlice {
            start: mid,
            end: unit.end,
        }
    }
}

fn ceil_div(a: usize, b: usize) -> usize {
    (a + b - 1) / b
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TestKind;

    fn make_words(unit_sizes: &[usize]) -> Vec<WordEntry> {
        let mut words = Vec::new();
        let mut number = 1;
        for (u, size) in unit_sizes.iter().enumerate() {
            for _ in 0..*size {
                words.push(WordEntry {
                    number,
                    textbook: "Basic English".to_string(),
                    major: "Ch1".to_string(),
                    minor: format!("U{}", u + 1),
                    unit_name: format!("Unit {}", u + 1),
                    english: format!("word{number}"),
                    korean: format!("뜻{number}"),
                });
                number += 1;
            }
        }
        words
    }

    fn settings(daily_goal: DailyGoal, word_count: usize) -> ItemSettings {
        ItemSettings {
            daily_goal,
            word_count,
            test_kind: TestKind::Typing,
            pass_score: 70,
        }
    }

    #[test]
    fn manual_pacing_windows_the_word_list() {
        let words = make_words(&[25]);
        let s = settings(DailyGoal::Manual, 10);
        assert_eq!(total_days(&s, &words), 3);
        assert_eq!(slice_for_day(&s, &words, 0).unwrap().len(), 10);
        assert_eq!(slice_for_day(&s, &words, 1).unwrap().len(), 10);
        let last = slice_for_day(&s, &words, 2).unwrap();
        assert_eq!(last.len(), 5);
        assert_eq!((last.start, last.end), (20, 25));
        assert!(slice_for_day(&s, &words, 3).is_none());
    }

    #[test]
    fn one_unit_pacing_follows_unit_sizes() {
        let words = make_words(&[4, 6, 2]);
        let s = settings(DailyGoal::OneUnit, 10);
        assert_eq!(total_days(&s, &words), 3);
        let sizes: Vec<usize> = (0..3)
            .map(|d| slice_for_day(&s, &words, d).unwrap().len())
            .collect();
        assert_eq!(sizes, vec![4, 6, 2]);
        assert!(slice_for_day(&s, &words, 3).is_none());
    }

    #[test]
    fn two_units_pacing_pairs_units() {
        let words = make_words(&[4, 6, 2]);
        let s = settings(DailyGoal::TwoUnits, 10);
        assert_eq!(total_days(&s, &words), 2);
        assert_eq!(slice_for_day(&s, &words, 0).unwrap().len(), 10);
        // The trailing odd unit stands alone.
        assert_eq!(slice_for_day(&s, &words, 1).unwrap().len(), 2);
    }

    #[test]
    fn half_unit_pacing_front_loads_odd_counts() {
        let words = make_words(&[5]);
        let s = settings(DailyGoal::HalfUnit, 10);
        assert_eq!(total_days(&s, &words), 2);
        let first = slice_for_day(&s, &words, 0).unwrap();
        let second = slice_for_day(&s, &words, 1).unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(second.len(), 2);
        assert_eq!((first.start, second.start), (0, 3));
    }

    #[test]
    fn half_unit_pacing_walks_units_in_pairs_of_days() {
        let words = make_words(&[4, 2]);
        let s = settings(DailyGoal::HalfUnit, 10);
        assert_eq!(total_days(&s, &words), 4);
        let sizes: Vec<usize> = (0..4)
            .map(|d| slice_for_day(&s, &words, d).unwrap().len())
            .collect();
        assert_eq!(sizes, vec![2, 2, 1, 1]);
    }

    #[test]
    fn half_unit_remainder_of_single_word_unit_is_empty() {
        let words = make_words(&[1]);
        let s = settings(DailyGoal::HalfUnit, 10);
        assert_eq!(total_days(&s, &words), 2);
        assert_eq!(slice_for_day(&s, &words, 0).unwrap().len(), 1);
        let second = slice_for_day(&s, &words, 1).unwrap();
        assert!(second.is_empty());
    }

    #[test]
    fn empty_item_takes_zero_days() {
        let s = settings(DailyGoal::OneUnit, 10);
        assert_eq!(total_days(&s, &[]), 0);
        assert!(slice_for_day(&s, &[], 0).is_none());
    }

    #[test]
    fn zero_manual_word_count_takes_zero_days() {
        let words = make_words(&[5]);
        let s = settings(DailyGoal::Manual, 0);
        assert_eq!(total_days(&s, &words), 0);
        assert!(slice_for_day(&s, &words, 0).is_none());
    }

    #[test]
    fn slices_cover_the_wordbook_in_order() {
        let words = make_words(&[3, 5, 1, 4]);
        for goal in [
            DailyGoal::Manual,
            DailyGoal::HalfUnit,
            DailyGoal::OneUnit,
            DailyGoal::TwoUnits,
        ] {
            let s = settings(goal, 4);
            let mut covered = Vec::new();
            for day in 0..total_days(&s, &words) {
                let slice = slice_for_day(&s, &words, day).unwrap();
                covered.extend(slice.words(&words).iter().map(|w| w.number));
            }
            let expected: Vec<u32> = words.iter().map(|w| w.number).collect();
            assert_eq!(covered, expected, "goal {goal:?} must cover every word once");
        }
    }
}
