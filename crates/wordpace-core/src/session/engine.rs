//! Test session state machine.
//!
//! Phases own their data: each round carries its own queue, cursor, and
//! wrong set, so an illegal phase/data combination cannot be represented.
//! Commands that do not belong to the current phase return
//! [`SessionError::PhaseMismatch`] and leave the session untouched.
//!
//! The flow is: study, then the main round over the day's slice (a full
//! redo whenever the score misses the pass mark), then wrong-answer
//! remediation until a clean pass, then one multiple-choice round over the
//! review pool whose score is recorded but never blocks completion, then
//! review remediation until clean. Completion hands the caller a result to
//! persist; the session itself never writes storage.

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;

use crate::catalog::{LessonRecord, TestKind};
use crate::error::SessionError;
use crate::session::answer;
use crate::session::choice::{build_choice_question, ChoiceQuestion};
use crate::session::{AnswerFeedback, PhaseTag, Prompt, SessionInput, SessionResult};
use crate::wordbook::WordEntry;

/// One pass over a word queue in a typing/scramble phase.
#[derive(Debug, Clone)]
struct QuizRound {
    queue: Vec<WordEntry>,
    cursor: usize,
    correct: usize,
    /// Words answered wrongly this pass, in encounter order, deduplicated
    /// by word number.
    wrong: Vec<WordEntry>,
    /// Scramble fragments for the word under the cursor; `None` in typing
    /// mode.
    fragments: Option<Vec<String>>,
}

/// One pass over a word queue in a multiple-choice phase.
#[derive(Debug, Clone)]
struct ChoiceRound {
    queue: Vec<WordEntry>,
    /// Question for the word under the cursor.
    question: ChoiceQuestion,
    cursor: usize,
    correct: usize,
    wrong: Vec<WordEntry>,
}

#[derive(Debug, Clone)]
enum Phase {
    Study,
    /// `attempt` 0 is the first pass; anything later is a full redo.
    Main { round: QuizRound, attempt: u32 },
    WrongReview { words: Vec<WordEntry> },
    WrongRetry { round: QuizRound },
    Review { round: ChoiceRound },
    ReviewWrongStudy { words: Vec<WordEntry> },
    ReviewRetry { round: ChoiceRound },
    Complete { result: SessionResult },
}

fn tag_of(phase: &Phase) -> PhaseTag {
    match phase {
        Phase::Study => PhaseTag::Study,
        Phase::Main { attempt: 0, .. } => PhaseTag::Main,
        Phase::Main { .. } => PhaseTag::MainRetry,
        Phase::WrongReview { .. } => PhaseTag::WrongReview,
        Phase::WrongRetry { .. } => PhaseTag::WrongRetry,
        Phase::Review { .. } => PhaseTag::Review,
        Phase::ReviewWrongStudy { .. } => PhaseTag::ReviewWrongStudy,
        Phase::ReviewRetry { .. } => PhaseTag::ReviewRetry,
        Phase::Complete { .. } => PhaseTag::Complete,
    }
}

/// Percentage score of a finished round, rounded half-up.
fn round_score(correct: usize, total: usize) -> u32 {
    ((100.0 * correct as f64) / total as f64).round() as u32
}

/// Adaptive test session over one daily lesson.
#[derive(Debug)]
pub struct TestSession {
    input: SessionInput,
    /// Distractor pool for multiple-choice questions: the review pool and
    /// the day's slice combined.
    choice_pool: Vec<WordEntry>,
    phase: Phase,
    rng: Mcg128Xsl64,
    main_score: Option<u32>,
    review_score: Option<u32>,
}

impl TestSession {
    /// Creates a session in the study phase.
    ///
    /// A fixed `seed` makes every shuffle and distractor draw
    /// reproducible; `None` seeds from entropy.
    pub fn new(input: SessionInput, seed: Option<u64>) -> Result<Self, SessionError> {
        if input.lesson.words.is_empty() {
            return Err(SessionError::EmptyWordList);
        }
        let rng = match seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        let mut choice_pool = input.review_pool.clone();
        choice_pool.extend(input.lesson.words.iter().cloned());
        Ok(Self {
            input,
            choice_pool,
            phase: Phase::Study,
            rng,
            main_score: None,
            review_score: None,
        })
    }

    /// Creates a session seeded from entropy.
    pub fn start(input: SessionInput) -> Result<Self, SessionError> {
        Self::new(input, None)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> PhaseTag {
        tag_of(&self.phase)
    }

    /// What to show the student right now.
    pub fn prompt(&self) -> Prompt {
        match &self.phase {
            Phase::Study => Prompt::Study {
                words: self.input.lesson.words.clone(),
            },
            Phase::Main { round, .. } | Phase::WrongRetry { round } => {
                let word = &round.queue[round.cursor];
                let position = round.cursor + 1;
                let total = round.queue.len();
                match &round.fragments {
                    Some(fragments) => Prompt::Scramble {
                        korean: word.korean.clone(),
                        fragments: fragments.clone(),
                        position,
                        total,
                    },
                    None => Prompt::Typing {
                        korean: word.korean.clone(),
                        position,
                        total,
                    },
                }
            }
            Phase::WrongReview { words } | Phase::ReviewWrongStudy { words } => Prompt::Study {
                words: words.clone(),
            },
            Phase::Review { round } | Phase::ReviewRetry { round } => Prompt::Choice {
                question: round.question.clone(),
                position: round.cursor + 1,
                total: round.queue.len(),
            },
            Phase::Complete { result } => Prompt::Finished { result: *result },
        }
    }

    /// Terminal result, available from completion on. Stays available so a
    /// failed history write can be retried without re-running the test.
    pub fn result(&self) -> Option<SessionResult> {
        match &self.phase {
            Phase::Complete { result } => Some(*result),
            _ => None,
        }
    }

    /// History record for the completed session, keyed by the scheduled
    /// date. `None` until the session completes.
    pub fn record(&self) -> Option<LessonRecord> {
        let result = self.result()?;
        Some(LessonRecord {
            curriculum_id: self.input.assignment.curriculum_id.clone(),
            date: self.input.lesson.date,
            completed_at: Utc::now(),
            main_score: result.main_score,
            review_score: result.review_score,
        })
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Leaves the study phase and starts the main round.
    pub fn begin(&mut self) -> Result<(), SessionError> {
        if !matches!(self.phase, Phase::Study) {
            return Err(SessionError::PhaseMismatch {
                action: "begin",
                phase: self.phase(),
            });
        }
        let words = self.input.lesson.words.clone();
        let round = self.new_quiz_round(words);
        self.phase = Phase::Main { round, attempt: 0 };
        Ok(())
    }

    /// Moves from a remediation study list to the matching retry round.
    pub fn continue_study(&mut self) -> Result<(), SessionError> {
        match std::mem::replace(&mut self.phase, Phase::Study) {
            Phase::WrongReview { words } => {
                let round = self.new_quiz_round(words);
                self.phase = Phase::WrongRetry { round };
                Ok(())
            }
            Phase::ReviewWrongStudy { words } => {
                let round = self.new_choice_round(words);
                self.phase = Phase::ReviewRetry { round };
                Ok(())
            }
            other => {
                let phase = tag_of(&other);
                self.phase = other;
                Err(SessionError::PhaseMismatch {
                    action: "continue_study",
                    phase,
                })
            }
        }
    }

    /// Submits a typed (or reassembled) answer for the current word.
    pub fn submit_answer(&mut self, submitted: &str) -> Result<AnswerFeedback, SessionError> {
        match std::mem::replace(&mut self.phase, Phase::Study) {
            Phase::Main { round, attempt } => Ok(self.advance_quiz(round, Some(attempt), submitted)),
            Phase::WrongRetry { round } => Ok(self.advance_quiz(round, None, submitted)),
            other => {
                let phase = tag_of(&other);
                self.phase = other;
                Err(SessionError::PhaseMismatch {
                    action: "submit_answer",
                    phase,
                })
            }
        }
    }

    /// Picks a multiple-choice option for the current word.
    pub fn choose(&mut self, index: usize) -> Result<AnswerFeedback, SessionError> {
        match std::mem::replace(&mut self.phase, Phase::Study) {
            Phase::Review { round } => self.advance_choice(round, true, index),
            Phase::ReviewRetry { round } => self.advance_choice(round, false, index),
            other => {
                let phase = tag_of(&other);
                self.phase = other;
                Err(SessionError::PhaseMismatch {
                    action: "choose",
                    phase,
                })
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Shuffled quiz round over `queue`. The queue must not be empty.
    fn new_quiz_round(&mut self, mut queue: Vec<WordEntry>) -> QuizRound {
        queue.shuffle(&mut self.rng);
        let fragments = self.fragments_for(&queue[0]);
        QuizRound {
            queue,
            cursor: 0,
            correct: 0,
            wrong: Vec::new(),
            fragments,
        }
    }

    /// Shuffled choice round over `queue`. The queue must not be empty.
    fn new_choice_round(&mut self, mut queue: Vec<WordEntry>) -> ChoiceRound {
        queue.shuffle(&mut self.rng);
        let question = build_choice_question(&queue[0], &self.choice_pool, &mut self.rng);
        ChoiceRound {
            queue,
            question,
            cursor: 0,
            correct: 0,
            wrong: Vec::new(),
        }
    }

    fn fragments_for(&mut self, word: &WordEntry) -> Option<Vec<String>> {
        match self.input.lesson.test_kind {
            TestKind::Scramble => Some(answer::scramble_fragments(&word.english, &mut self.rng)),
            TestKind::Typing => None,
        }
    }

    /// Scores one quiz answer and advances the round. `main_attempt` is
    /// `Some` in the main phase, `None` in wrong-retry.
    fn advance_quiz(
        &mut self,
        mut round: QuizRound,
        main_attempt: Option<u32>,
        submitted: &str,
    ) -> AnswerFeedback {
        let word = round.queue[round.cursor].clone();
        let correct = answer::check_typing_answer(submitted, &word.english);
        if correct {
            round.correct += 1;
        } else if !round.wrong.iter().any(|w| w.number == word.number) {
            round.wrong.push(word.clone());
        }
        round.cursor += 1;

        if round.cursor < round.queue.len() {
            round.fragments = self.fragments_for(&round.queue[round.cursor]);
            self.phase = match main_attempt {
                Some(attempt) => Phase::Main { round, attempt },
                None => Phase::WrongRetry { round },
            };
            return AnswerFeedback {
                correct,
                expected: word.english,
                phase: self.phase(),
                round_score: None,
            };
        }

        let score = round_score(round.correct, round.queue.len());
        match main_attempt {
            Some(attempt) => {
                if score < self.input.lesson.pass_score {
                    // Below the pass mark the whole slice is redone from
                    // scratch; the wrong set is discarded.
                    let words = self.input.lesson.words.clone();
                    let next = self.new_quiz_round(words);
                    self.phase = Phase::Main {
                        round: next,
                        attempt: attempt + 1,
                    };
                } else {
                    self.main_score = Some(score);
                    self.finish_quiz(round.wrong);
                }
            }
            None => self.finish_quiz(round.wrong),
        }
        AnswerFeedback {
            correct,
            expected: word.english,
            phase: self.phase(),
            round_score: Some(score),
        }
    }

    /// Routes a cleanly finished quiz round onward: remediation when wrong
    /// answers remain, else review or completion.
    fn finish_quiz(&mut self, wrong: Vec<WordEntry>) {
        if wrong.is_empty() {
            self.enter_review_or_complete();
        } else {
            self.phase = Phase::WrongReview { words: wrong };
        }
    }

    fn enter_review_or_complete(&mut self) {
        if self.input.review_pool.is_empty() {
            self.complete();
        } else {
            let pool = self.input.review_pool.clone();
            let round = self.new_choice_round(pool);
            self.phase = Phase::Review { round };
        }
    }

    /// Scores one choice answer and advances the round. `full_review` is
    /// true for the first full pass over the pool, whose score is the one
    /// recorded.
    fn advance_choice(
        &mut self,
        mut round: ChoiceRound,
        full_review: bool,
        index: usize,
    ) -> Result<AnswerFeedback, SessionError> {
        let len = round.question.options.len();
        if index >= len {
            self.phase = if full_review {
                Phase::Review { round }
            } else {
                Phase::ReviewRetry { round }
            };
            return Err(SessionError::ChoiceOutOfRange { index, len });
        }

        let word = round.queue[round.cursor].clone();
        let correct = index == round.question.answer;
        let expected = round.question.options[round.question.answer].clone();
        if correct {
            round.correct += 1;
        } else if !round.wrong.iter().any(|w| w.number == word.number) {
            round.wrong.push(word);
        }
        round.cursor += 1;

        if round.cursor < round.queue.len() {
            round.question =
                build_choice_question(&round.queue[round.cursor], &self.choice_pool, &mut self.rng);
            self.phase = if full_review {
                Phase::Review { round }
            } else {
                Phase::ReviewRetry { round }
            };
            return Ok(AnswerFeedback {
                correct,
                expected,
                phase: self.phase(),
                round_score: None,
            });
        }

        let score = round_score(round.correct, round.queue.len());
        if full_review {
            self.review_score = Some(score);
        }
        if round.wrong.is_empty() {
            self.complete();
        } else {
            // A failing review never redoes the whole pool; only the wrong
            // answers are studied again.
            self.phase = Phase::ReviewWrongStudy { words: round.wrong };
        }
        Ok(AnswerFeedback {
            correct,
            expected,
            phase: self.phase(),
            round_score: Some(score),
        })
    }

    fn complete(&mut self) {
        let result = SessionResult {
            main_score: self.main_score.unwrap_or(0),
            review_score: self.review_score,
        };
        self.phase = Phase::Complete { result };
    }
}
