//! Student curriculum assignments.
//!
//! An assignment binds a curriculum template to one student: which
//! weekdays lessons fall on, when the plan started, and how many prior
//! learning days feed the review pool. Assignments are created at
//! enrollment and deleted when the curriculum is taken away again.

use std::fmt;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A weekday lessons can be scheduled on. Weekends are never study days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudyDay {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
}

impl StudyDay {
    /// All study days in calendar order.
    pub const ALL: [StudyDay; 5] = [
        StudyDay::Mon,
        StudyDay::Tue,
        StudyDay::Wed,
        StudyDay::Thu,
        StudyDay::Fri,
    ];

    pub fn weekday(self) -> Weekday {
        match self {
            StudyDay::Mon => Weekday::Mon,
            StudyDay::Tue => Weekday::Tue,
            StudyDay::Wed => Weekday::Wed,
            StudyDay::Thu => Weekday::Thu,
            StudyDay::Fri => Weekday::Fri,
        }
    }

    /// Maps a calendar weekday back; `None` for Saturday and Sunday.
    pub fn from_weekday(weekday: Weekday) -> Option<StudyDay> {
        match weekday {
            Weekday::Mon => Some(StudyDay::Mon),
            Weekday::Tue => Some(StudyDay::Tue),
            Weekday::Wed => Some(StudyDay::Wed),
            Weekday::Thu => Some(StudyDay::Thu),
            Weekday::Fri => Some(StudyDay::Fri),
            Weekday::Sat | Weekday::Sun => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StudyDay::Mon => "mon",
            StudyDay::Tue => "tue",
            StudyDay::Wed => "wed",
            StudyDay::Thu => "thu",
            StudyDay::Fri => "fri",
        }
    }

    pub fn parse(s: &str) -> Option<StudyDay> {
        match s {
            "mon" => Some(StudyDay::Mon),
            "tue" => Some(StudyDay::Tue),
            "wed" => Some(StudyDay::Wed),
            "thu" => Some(StudyDay::Thu),
            "fri" => Some(StudyDay::Fri),
            _ => None,
        }
    }
}

impl fmt::Display for StudyDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A curriculum attached to one student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: String,
    /// Template this assignment follows.
    pub curriculum_id: String,
    pub title: String,
    /// Weekdays lessons fall on, in the order they were configured.
    pub days: Vec<StudyDay>,
    pub start_date: NaiveDate,
    /// How many prior learning days feed the review pool.
    #[serde(default = "default_review_cycles")]
    pub review_cycles: u32,
}

fn default_review_cycles() -> u32 {
    3
}

impl Assignment {
    pub fn new(
        curriculum_id: impl Into<String>,
        title: impl Into<String>,
        days: Vec<StudyDay>,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            curriculum_id: curriculum_id.into(),
            title: title.into(),
            days,
            start_date,
            review_cycles: default_review_cycles(),
        }
    }
}
