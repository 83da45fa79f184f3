//! In-memory store.
//!
//! Hash maps behind a mutex, implementing every store port with the same
//! `&self` surface as the SQLite store. Backs tests and callers that load
//! wordbooks from somewhere other than the local database.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::catalog::{Assignment, CurriculumTemplate, LessonRecord};
use crate::error::StoreError;
use crate::storage::{AssignmentStore, CurriculumCatalog, HistoryStore, WordbookStore};
use crate::wordbook::{WordEntry, Wordbook};

#[derive(Debug, Default)]
struct Inner {
    wordbooks: HashMap<String, Wordbook>,
    templates: HashMap<String, CurriculumTemplate>,
    assignments: HashMap<String, Vec<Assignment>>,
    history: HashMap<String, Vec<LessonRecord>>,
}

/// Volatile store for tests and in-process embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_wordbook(&self, wordbook: Wordbook) {
        self.lock().wordbooks.insert(wordbook.id.clone(), wordbook);
    }

    pub fn insert_template(&self, template: CurriculumTemplate) {
        self.lock().templates.insert(template.id.clone(), template);
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic while holding the lock leaves plain data; keep serving it.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl WordbookStore for MemoryStore {
    fn wordbook(&self, id: &str) -> Result<Option<Wordbook>, StoreError> {
        Ok(self.lock().wordbooks.get(id).cloned())
    }

    fn words(&self, wordbook_id: &str) -> Result<Option<Vec<WordEntry>>, StoreError> {
        Ok(self
            .lock()
            .wordbooks
            .get(wordbook_id)
            .map(|wb| wb.words.clone()))
    }
}

impl CurriculumCatalog for MemoryStore {
    fn template(&self, id: &str) -> Result<Option<CurriculumTemplate>, StoreError> {
        Ok(self.lock().templates.get(id).cloned())
    }

    fn templates(&self) -> Result<Vec<CurriculumTemplate>, StoreError> {
        let mut all: Vec<CurriculumTemplate> = self.lock().templates.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }
}

impl AssignmentStore for MemoryStore {
    fn assignments_for(&self, student: &str) -> Result<Vec<Assignment>, StoreError> {
        Ok(self
            .lock()
            .assignments
            .get(student)
            .cloned()
            .unwrap_or_default())
    }

    fn upsert_assignment(&self, student: &str, assignment: &Assignment) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let list = inner.assignments.entry(student.to_string()).or_default();
        match list.iter_mut().find(|a| a.id == assignment.id) {
            Some(existing) => *existing = assignment.clone(),
            None => list.push(assignment.clone()),
        }
        Ok(())
    }

    fn remove_assignment(&self, student: &str, assignment_id: &str) -> Result<(), StoreError> {
        if let Some(list) = self.lock().assignments.get_mut(student) {
            list.retain(|a| a.id != assignment_id);
        }
        Ok(())
    }
}

impl HistoryStore for MemoryStore {
    fn history_for(&self, student: &str) -> Result<Vec<LessonRecord>, StoreError> {
        let mut records = self
            .lock()
            .history
            .get(student)
            .cloned()
            .unwrap_or_default();
        records.sort_by_key(|r| r.date);
        Ok(records)
    }

    fn upsert_record(&self, student: &str, record: &LessonRecord) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let list = inner.history.entry(student.to_string()).or_default();
        match list
            .iter_mut()
            .find(|r| r.curriculum_id == record.curriculum_id && r.date == record.date)
        {
            Some(existing) => *existing = record.clone(),
            None => list.push(record.clone()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StudyDay;
    use chrono::{NaiveDate, Utc};

    fn make_record(curriculum_id: &str, date: NaiveDate, main_score: u32) -> LessonRecord {
        LessonRecord {
            curriculum_id: curriculum_id.to_string(),
            date,
            completed_at: Utc::now(),
            main_score,
            review_score: None,
        }
    }

    #[test]
    fn unknown_ids_read_back_empty() {
        let store = MemoryStore::new();
        assert!(store.wordbook("nope").unwrap().is_none());
        assert!(store.words("nope").unwrap().is_none());
        assert!(store.template("nope").unwrap().is_none());
        assert!(store.assignments_for("nobody").unwrap().is_empty());
        assert!(store.history_for("nobody").unwrap().is_empty());
    }

    #[test]
    fn assignment_upsert_replaces_by_id() {
        let store = MemoryStore::new();
        let start = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let mut a = Assignment::new("cur-1", "기본 과정", vec![StudyDay::Mon], start);
        store.upsert_assignment("stu-1", &a).unwrap();

        a.review_cycles = 5;
        store.upsert_assignment("stu-1", &a).unwrap();

        let listed = store.assignments_for("stu-1").unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].review_cycles, 5);

        store.remove_assignment("stu-1", &a.id).unwrap();
        assert!(store.assignments_for("stu-1").unwrap().is_empty());
    }

    #[test]
    fn history_upsert_is_keyed_by_curriculum_and_date() {
        let store = MemoryStore::new();
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        store
            .upsert_record("stu-1", &make_record("cur-1", date, 60))
            .unwrap();
        store
            .upsert_record("stu-1", &make_record("cur-1", date, 85))
            .unwrap();
        store
            .upsert_record("stu-1", &make_record("cur-2", date, 70))
            .unwrap();

        let records = store.history_for("stu-1").unwrap();
        assert_eq!(records.len(), 2);
        let retaken = records
            .iter()
            .find(|r| r.curriculum_id == "cur-1")
            .unwrap();
        assert_eq!(retaken.main_score, 85);
    }

    #[test]
    fn history_lists_in_date_order() {
        let store = MemoryStore::new();
        let d1 = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
        store
            .upsert_record("stu-1", &make_record("cur-1", d2, 90))
            .unwrap();
        store
            .upsert_record("stu-1", &make_record("cur-1", d1, 80))
            .unwrap();

        let dates: Vec<NaiveDate> = store
            .history_for("stu-1")
            .unwrap()
            .iter()
            .map(|r| r.date)
            .collect();
        assert_eq!(dates, vec![d1, d2]);
    }

    #[test]
    fn students_are_isolated() {
        let store = MemoryStore::new();
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        store
            .upsert_record("stu-1", &make_record("cur-1", date, 90))
            .unwrap();
        assert!(store.history_for("stu-2").unwrap().is_empty());
    }
}
