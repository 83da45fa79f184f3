//! End-to-end test session flows.
//!
//! These tests resolve real lessons from a seeded store and drive
//! [`TestSession`] through its public API only: the prompt says what a
//! student would see, and a meaning-to-headword map plays the student.

use std::collections::HashMap;

use chrono::NaiveDate;
use proptest::prelude::*;

use wordpace_core::{
    Assignment, CurriculumItem, CurriculumTemplate, DailyGoal, HistoryStore, ItemSettings,
    LessonRecord, MemoryStore, PhaseTag, Prompt, ReviewWindowResolver, ScheduleCalculator,
    SessionInput, SqliteStore, StudyDay, TestKind, TestSession, WordEntry, Wordbook,
};

fn make_word(number: u32, english: &str, korean: &str) -> WordEntry {
    WordEntry {
        number,
        textbook: "Basic English".to_string(),
        major: "Ch1".to_string(),
        minor: "U1".to_string(),
        unit_name: "Unit 1".to_string(),
        english: english.to_string(),
        korean: korean.to_string(),
    }
}

/// One wordbook of `word_total` words paced at `per_day` words per day.
fn make_store(word_total: u32, per_day: usize, test_kind: TestKind, pass_score: u32) -> MemoryStore {
    let store = MemoryStore::new();
    let words = (1..=word_total)
        .map(|n| make_word(n, &format!("word{n}"), &format!("뜻{n}")))
        .collect();
    store.insert_wordbook(Wordbook::new("wb-a", "Basic English", words));
    store.insert_template(CurriculumTemplate {
        id: "cur-1".to_string(),
        title: "기본 과정".to_string(),
        items: vec![CurriculumItem {
            wordbook_id: "wb-a".to_string(),
            title: "기본".to_string(),
            settings: ItemSettings {
                daily_goal: DailyGoal::Manual,
                word_count: per_day,
                test_kind,
                pass_score,
            },
        }],
    });
    store
}

/// Monday, learning day 0 of the plan.
fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
}

fn make_assignment() -> Assignment {
    Assignment::new("cur-1", "기본 과정", StudyDay::ALL.to_vec(), monday())
}

/// Resolves the lesson and review pool due on `day` into a session input.
fn lesson_input(store: &MemoryStore, assignment: &Assignment, day: NaiveDate) -> SessionInput {
    let calc = ScheduleCalculator::new(store, store);
    let lesson = calc.resolve(assignment, day).unwrap();
    let review_pool =
        ReviewWindowResolver::new(calc).resolve(assignment, day, assignment.review_cycles);
    SessionInput {
        assignment: assignment.clone(),
        lesson,
        review_pool,
    }
}

/// What the student would answer: meaning to headword, over everything the
/// session can ask about.
fn answer_key(input: &SessionInput) -> HashMap<String, String> {
    input
        .lesson
        .words
        .iter()
        .chain(input.review_pool.iter())
        .map(|w| (w.korean.clone(), w.english.clone()))
        .collect()
}

/// Drives a session to completion, getting everything right except an
/// optional single wrong first answer. Returns the history record.
fn run_session(input: SessionInput, seed: u64, miss_first: bool) -> (LessonRecord, Vec<PhaseTag>) {
    let key = answer_key(&input);
    let mut session = TestSession::new(input, Some(seed)).unwrap();
    let mut may_miss = miss_first;
    let mut phases = vec![session.phase()];
    loop {
        match session.prompt() {
            Prompt::Study { .. } => {
                if session.phase() == PhaseTag::Study {
                    session.begin().unwrap();
                } else {
                    session.continue_study().unwrap();
                }
            }
            Prompt::Typing { korean, .. } | Prompt::Scramble { korean, .. } => {
                if may_miss {
                    may_miss = false;
                    session.submit_answer("oops").unwrap();
                } else {
                    session.submit_answer(&key[&korean]).unwrap();
                }
            }
            Prompt::Choice { question, .. } => {
                session.choose(question.answer).unwrap();
            }
            Prompt::Finished { .. } => break,
        }
        phases.push(session.phase());
    }
    (session.record().unwrap(), phases)
}

#[test]
fn test_clean_run_records_a_perfect_main() {
    let store = make_store(9, 3, TestKind::Typing, 70);
    let assignment = make_assignment();
    let input = lesson_input(&store, &assignment, monday());
    assert!(input.review_pool.is_empty());

    let (record, phases) = run_session(input, 11, false);
    assert_eq!(record.curriculum_id, "cur-1");
    assert_eq!(record.date, monday());
    assert_eq!(record.main_score, 100);
    assert_eq!(record.review_score, None);
    assert!(!phases.contains(&PhaseTag::WrongReview));

    store.upsert_record("stu-1", &record).unwrap();
    let history = store.history_for("stu-1").unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].date, monday());
}

#[test]
fn test_missed_words_are_retested_until_learned() {
    let store = make_store(9, 3, TestKind::Typing, 0);
    let assignment = make_assignment();
    let input = lesson_input(&store, &assignment, monday());

    let (record, phases) = run_session(input, 11, true);
    // 2 of 3 on the main round; the miss then cleared in remediation.
    assert_eq!(record.main_score, 67);
    assert!(phases.contains(&PhaseTag::WrongReview));
    assert!(phases.contains(&PhaseTag::WrongRetry));
    assert_eq!(*phases.last().unwrap(), PhaseTag::Complete);
}

#[test]
fn test_failing_main_repeats_the_whole_slice() {
    // Pass score 100: a single miss forces a full redo.
    let store = make_store(9, 3, TestKind::Typing, 100);
    let assignment = make_assignment();
    let input = lesson_input(&store, &assignment, monday());
    let key = answer_key(&input);

    let mut session = TestSession::new(input, Some(3)).unwrap();
    session.begin().unwrap();
    let mut asked = 0;
    let mut may_miss = true;
    while session.phase() != PhaseTag::Complete {
        match session.prompt() {
            Prompt::Typing { korean, .. } => {
                asked += 1;
                if may_miss {
                    may_miss = false;
                    session.submit_answer("oops").unwrap();
                } else {
                    session.submit_answer(&key[&korean]).unwrap();
                }
            }
            other => panic!("unexpected prompt {other:?}"),
        }
    }
    // Three questions failed the round, three more passed it.
    assert_eq!(asked, 6);
    assert_eq!(session.result().unwrap().main_score, 100);
}

#[test]
fn test_review_round_covers_the_pool() {
    let store = make_store(9, 3, TestKind::Typing, 70);
    let assignment = make_assignment();
    // Tuesday reviews Monday's words.
    let input = lesson_input(&store, &assignment, monday().succ_opt().unwrap());
    assert_eq!(input.review_pool.len(), 3);
    let key = answer_key(&input);

    let mut session = TestSession::new(input, Some(5)).unwrap();
    session.begin().unwrap();
    let mut reviewed = Vec::new();
    while session.phase() != PhaseTag::Complete {
        match session.prompt() {
            Prompt::Typing { korean, .. } => {
                session.submit_answer(&key[&korean]).unwrap();
            }
            Prompt::Choice { question, .. } => {
                assert_eq!(question.options.len(), 5);
                // The marked option is the asked word's own meaning.
                assert_eq!(
                    key[&question.options[question.answer]],
                    question.prompt
                );
                reviewed.push(question.prompt.clone());
                session.choose(question.answer).unwrap();
            }
            other => panic!("unexpected prompt {other:?}"),
        }
    }

    // Every pooled word was asked exactly once.
    let mut expected: Vec<String> = (1..=3).map(|n| format!("word{n}")).collect();
    reviewed.sort();
    expected.sort();
    assert_eq!(reviewed, expected);
    assert_eq!(
        session.result().unwrap().review_score,
        Some(100),
        "clean review scores 100"
    );
}

#[test]
fn test_failed_review_remediates_without_blocking() {
    let store = make_store(9, 3, TestKind::Typing, 70);
    let assignment = make_assignment();
    let input = lesson_input(&store, &assignment, monday().succ_opt().unwrap());
    let key = answer_key(&input);

    let mut session = TestSession::new(input, Some(5)).unwrap();
    session.begin().unwrap();
    let mut full_round_missed = 0;
    while session.phase() != PhaseTag::Complete {
        match session.prompt() {
            Prompt::Study { .. } => {
                session.continue_study().unwrap();
            }
            Prompt::Typing { korean, .. } => {
                session.submit_answer(&key[&korean]).unwrap();
            }
            Prompt::Choice { question, .. } => {
                if session.phase() == PhaseTag::Review {
                    // Miss the whole first review round.
                    full_round_missed += 1;
                    let wrong = (question.answer + 1) % question.options.len();
                    session.choose(wrong).unwrap();
                } else {
                    session.choose(question.answer).unwrap();
                }
            }
            other => panic!("unexpected prompt {other:?}"),
        }
    }

    assert_eq!(full_round_missed, 3);
    let result = session.result().unwrap();
    assert_eq!(result.main_score, 100);
    // The recorded review score is the failed round's; remediation only
    // gates completion, never the score.
    assert_eq!(result.review_score, Some(0));
}

#[test]
fn test_history_upsert_is_idempotent_across_stores() {
    let store = make_store(9, 3, TestKind::Typing, 0);
    let assignment = make_assignment();

    // The same lesson taken twice: a rough first run, then a clean retake.
    let (first, _) = run_session(lesson_input(&store, &assignment, monday()), 21, true);
    let (retake, _) = run_session(lesson_input(&store, &assignment, monday()), 22, false);
    assert_eq!(first.main_score, 67);
    assert_eq!(retake.main_score, 100);

    let dir = tempfile::tempdir().unwrap();
    let sqlite = SqliteStore::open_at(&dir.path().join("wordpace.db")).unwrap();
    for store in [&store as &dyn HistoryStore, &sqlite as &dyn HistoryStore] {
        store.upsert_record("stu-1", &first).unwrap();
        store.upsert_record("stu-1", &retake).unwrap();

        let history = store.history_for("stu-1").unwrap();
        assert_eq!(history.len(), 1, "one record per lesson date");
        assert_eq!(history[0].main_score, 100);
    }
}

#[test]
fn test_same_seed_replays_the_same_session() {
    let store = make_store(9, 3, TestKind::Scramble, 70);
    let assignment = make_assignment();

    let transcript = |seed: u64| -> Vec<String> {
        let input = lesson_input(&store, &assignment, monday());
        let key = answer_key(&input);
        let mut session = TestSession::new(input, Some(seed)).unwrap();
        session.begin().unwrap();
        let mut order = Vec::new();
        while session.phase() != PhaseTag::Complete {
            match session.prompt() {
                Prompt::Scramble {
                    korean, fragments, ..
                } => {
                    order.push(format!("{korean}:{}", fragments.join("|")));
                    session.submit_answer(&key[&korean]).unwrap();
                }
                other => panic!("unexpected prompt {other:?}"),
            }
        }
        order
    };

    assert_eq!(transcript(77), transcript(77));
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// A student who answers everything correctly always finishes with a
    /// perfect main score, whatever the seed, lesson size, or input mode.
    #[test]
    fn clean_runs_complete_for_any_seed(
        seed in any::<u64>(),
        word_total in 1u32..=9,
        scramble in any::<bool>(),
    ) {
        let kind = if scramble { TestKind::Scramble } else { TestKind::Typing };
        let store = make_store(word_total, word_total as usize, kind, 70);
        let assignment = make_assignment();
        let input = lesson_input(&store, &assignment, monday());

        let (record, phases) = run_session(input, seed, false);
        prop_assert_eq!(record.main_score, 100);
        prop_assert_eq!(record.review_score, None);
        prop_assert_eq!(*phases.last().unwrap(), PhaseTag::Complete);
    }
}
