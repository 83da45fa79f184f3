//! Adaptive test sessions.
//!
//! One [`TestSession`] drives a student through a day's words: a study
//! pass, the main test (typing or scramble input), wrong-answer
//! remediation loops, a multiple-choice review over recent days' words,
//! and review remediation, ending in a scored result. The flow rules live
//! in [`engine`]; [`answer`] holds the answer matcher and [`choice`] the
//! multiple-choice assembly.

pub mod answer;
pub mod choice;
pub mod engine;

pub use answer::{assemble_fragments, check_typing_answer, normalize};
pub use choice::ChoiceQuestion;
pub use engine::TestSession;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::Assignment;
use crate::schedule::DailyLesson;
use crate::wordbook::WordEntry;

/// Payload a caller assembles before starting a session.
///
/// `lesson` is normally the output of
/// [`ScheduleCalculator::resolve`](crate::schedule::ScheduleCalculator::resolve)
/// and `review_pool` the output of
/// [`ReviewWindowResolver::resolve`](crate::schedule::ReviewWindowResolver::resolve).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInput {
    pub assignment: Assignment,
    pub lesson: DailyLesson,
    /// Words pooled from recent learning days; empty skips the review
    /// phases entirely.
    #[serde(default)]
    pub review_pool: Vec<WordEntry>,
}

/// Terminal output of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    /// Score of the passing main round, 0..=100.
    pub main_score: u32,
    /// Score of the full review round; `None` when there was no review.
    pub review_score: Option<u32>,
}

/// Discriminant of a session's current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseTag {
    Study,
    Main,
    MainRetry,
    WrongReview,
    WrongRetry,
    Review,
    ReviewWrongStudy,
    ReviewRetry,
    Complete,
}

impl PhaseTag {
    pub fn as_str(self) -> &'static str {
        match self {
            PhaseTag::Study => "study",
            PhaseTag::Main => "main",
            PhaseTag::MainRetry => "main_retry",
            PhaseTag::WrongReview => "wrong_review",
            PhaseTag::WrongRetry => "wrong_retry",
            PhaseTag::Review => "review",
            PhaseTag::ReviewWrongStudy => "review_wrong_study",
            PhaseTag::ReviewRetry => "review_retry",
            PhaseTag::Complete => "complete",
        }
    }
}

impl fmt::Display for PhaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the student should be shown for the current step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// Flashcards to read through before continuing.
    Study { words: Vec<WordEntry> },
    /// Type the English headword for this meaning.
    Typing {
        korean: String,
        position: usize,
        total: usize,
    },
    /// Reassemble the English headword from shuffled fragments.
    Scramble {
        korean: String,
        fragments: Vec<String>,
        position: usize,
        total: usize,
    },
    /// Pick the meaning of the headword among the options.
    Choice {
        question: ChoiceQuestion,
        position: usize,
        total: usize,
    },
    /// The session is over.
    Finished { result: SessionResult },
}

/// Outcome of one submitted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub correct: bool,
    /// The expected answer: the headword in typing/scramble phases, the
    /// correct meaning in choice phases.
    pub expected: String,
    /// Phase the session is in after this answer.
    pub phase: PhaseTag,
    /// Score of the round this answer closed, if it closed one.
    pub round_score: Option<u32>,
}
