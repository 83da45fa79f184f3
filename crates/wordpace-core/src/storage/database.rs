//! SQLite-based academy storage.
//!
//! Provides persistent storage for:
//! - Wordbooks and their ordered word lists
//! - Curriculum templates and their ordered items
//! - Per-student assignments
//! - Per-student lesson completion history
//!
//! One open handle implements every store port, so schedule resolution,
//! backlog scans, and history writes share a single database file.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::catalog::{Assignment, CurriculumItem, CurriculumTemplate, LessonRecord};
use crate::error::StoreError;
use crate::storage::{AssignmentStore, CurriculumCatalog, HistoryStore, WordbookStore};
use crate::wordbook::{WordEntry, Wordbook};

use super::data_dir;

/// SQLite database behind the store ports.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the store at `~/.config/wordpace/wordpace.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StoreError> {
        let path = data_dir()?.join("wordpace.db");
        Self::open_at(&path)
    }

    /// Open the store at an explicit path, creating schema as needed.
    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::OpenFailed {
            path: std::path::PathBuf::from(":memory:"),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS wordbooks (
                    id    TEXT PRIMARY KEY,
                    title TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS words (
                    wordbook_id TEXT NOT NULL,
                    seq         INTEGER NOT NULL,
                    number      INTEGER NOT NULL,
                    textbook    TEXT NOT NULL DEFAULT '',
                    major       TEXT NOT NULL DEFAULT '',
                    minor       TEXT NOT NULL DEFAULT '',
                    unit_name   TEXT NOT NULL DEFAULT '',
                    english     TEXT NOT NULL,
                    korean      TEXT NOT NULL,
                    PRIMARY KEY (wordbook_id, seq)
                );

                CREATE TABLE IF NOT EXISTS templates (
                    id    TEXT PRIMARY KEY,
                    title TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS template_items (
                    template_id TEXT NOT NULL,
                    position    INTEGER NOT NULL,
                    wordbook_id TEXT NOT NULL,
                    title       TEXT NOT NULL,
                    settings    TEXT NOT NULL,
                    PRIMARY KEY (template_id, position)
                );

                CREATE TABLE IF NOT EXISTS assignments (
                    id            TEXT PRIMARY KEY,
                    student       TEXT NOT NULL,
                    curriculum_id TEXT NOT NULL,
                    title         TEXT NOT NULL,
                    days          TEXT NOT NULL,
                    start_date    TEXT NOT NULL,
                    review_cycles INTEGER NOT NULL
                );

                CREATE TABLE IF NOT EXISTS lesson_history (
                    student       TEXT NOT NULL,
                    curriculum_id TEXT NOT NULL,
                    date          TEXT NOT NULL,
                    completed_at  TEXT NOT NULL,
                    main_score    INTEGER NOT NULL,
                    review_score  INTEGER,
                    PRIMARY KEY (student, curriculum_id, date)
                );

                -- Create indexes for per-student dashboard queries
                CREATE INDEX IF NOT EXISTS idx_assignments_student ON assignments(student);
                CREATE INDEX IF NOT EXISTS idx_history_student_date ON lesson_history(student, date);",
            )
            .map_err(|e| StoreError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    // === Import / admin writes ===

    /// Insert or replace a wordbook and its whole word list in a single
    /// transaction. Word rows are numbered by import order.
    pub fn upsert_wordbook(&self, wordbook: &Wordbook) -> Result<(), StoreError> {
        self.conn.execute_batch("BEGIN IMMEDIATE TRANSACTION;")?;
        let result: Result<(), StoreError> = (|| {
            self.conn.execute(
                "INSERT OR REPLACE INTO wordbooks (id, title) VALUES (?1, ?2)",
                params![wordbook.id, wordbook.title],
            )?;
            self.conn.execute(
                "DELETE FROM words WHERE wordbook_id = ?1",
                params![wordbook.id],
            )?;
            for (seq, word) in wordbook.words.iter().enumerate() {
                self.conn.execute(
                    "INSERT INTO words
                     (wordbook_id, seq, number, textbook, major, minor, unit_name, english, korean)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                    params![
                        wordbook.id,
                        seq as i64,
                        word.number,
                        word.textbook,
                        word.major,
                        word.minor,
                        word.unit_name,
                        word.english,
                        word.korean,
                    ],
                )?;
            }
            Ok(())
        })();
        match result {
            Ok(()) => {
                self.conn.execute_batch("COMMIT;")?;
                Ok(())
            }
            Err(err) => {
                let _ = self.conn.execute_batch("ROLLBACK;");
                Err(err)
            }
        }
    }

    /// Insert or replace a curriculum template and its ordered items in a
    /// single transaction.
    pub fn upsert_template(&self, template: &CurriculumTemplate) -> Result<(), StoreError> {
        self.conn.execute_batch("BEGIN IMMEDIATE TRANSACTION;")?;
        let result: Result<(), StoreError> = (|| {
            self.conn.execute(
                "INSERT OR REPLACE INTO templates (id, title) VALUES (?1, ?2)",
                params![template.id, template.title],
            )?;
            self.conn.execute(
                "DELETE FROM template_items WHERE template_id = ?1",
                params![template.id],
            )?;
            for (position, item) in template.items.iter().enumerate() {
                self.conn.execute(
                    "INSERT INTO template_items
                     (template_id, position, wordbook_id, title, settings)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        template.id,
                        position as i64,
                        item.wordbook_id,
                        item.title,
                        encode_json("item settings", &item.settings)?,
                    ],
                )?;
            }
            Ok(())
        })();
        match result {
            Ok(()) => {
                self.conn.execute_batch("COMMIT;")?;
                Ok(())
            }
            Err(err) => {
                let _ = self.conn.execute_batch("ROLLBACK;");
                Err(err)
            }
        }
    }

    // === Row assembly ===

    fn title_of(&self, table: &str, id: &str) -> Result<Option<String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT title FROM {table} WHERE id = ?1"))?;
        let result = stmt.query_row(params![id], |row| row.get::<_, String>(0));
        match result {
            Ok(title) => Ok(Some(title)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn words_of(&self, wordbook_id: &str) -> Result<Vec<WordEntry>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT number, textbook, major, minor, unit_name, english, korean
             FROM words WHERE wordbook_id = ?1 ORDER BY seq",
        )?;
        let rows = stmt.query_map(params![wordbook_id], |row| {
            Ok(WordEntry {
                number: row.get(0)?,
                textbook: row.get(1)?,
                major: row.get(2)?,
                minor: row.get(3)?,
                unit_name: row.get(4)?,
                english: row.get(5)?,
                korean: row.get(6)?,
            })
        })?;
        let mut words = Vec::new();
        for row in rows {
            words.push(row?);
        }
        Ok(words)
    }

    fn items_of(&self, template_id: &str) -> Result<Vec<CurriculumItem>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT wordbook_id, title, settings FROM template_items
             WHERE template_id = ?1 ORDER BY position",
        )?;
        let rows = stmt.query_map(params![template_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;
        let mut items = Vec::new();
        for row in rows {
            let (wordbook_id, title, settings_json) = row?;
            items.push(CurriculumItem {
                wordbook_id,
                title,
                settings: decode_json("item settings", &settings_json)?,
            });
        }
        Ok(items)
    }
}

impl WordbookStore for SqliteStore {
    fn wordbook(&self, id: &str) -> Result<Option<Wordbook>, StoreError> {
        let title = match self.title_of("wordbooks", id)? {
            Some(title) => title,
            None => return Ok(None),
        };
        Ok(Some(Wordbook {
            id: id.to_string(),
            title,
            words: self.words_of(id)?,
        }))
    }

    fn words(&self, wordbook_id: &str) -> Result<Option<Vec<WordEntry>>, StoreError> {
        if self.title_of("wordbooks", wordbook_id)?.is_none() {
            return Ok(None);
        }
        Ok(Some(self.words_of(wordbook_id)?))
    }
}

impl CurriculumCatalog for SqliteStore {
    fn template(&self, id: &str) -> Result<Option<CurriculumTemplate>, StoreError> {
        let title = match self.title_of("templates", id)? {
            Some(title) => title,
            None => return Ok(None),
        };
        Ok(Some(CurriculumTemplate {
            id: id.to_string(),
            title,
            items: self.items_of(id)?,
        }))
    }

    fn templates(&self) -> Result<Vec<CurriculumTemplate>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title FROM templates ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        let mut heads = Vec::new();
        for row in rows {
            heads.push(row?);
        }
        let mut templates = Vec::new();
        for (id, title) in heads {
            let items = self.items_of(&id)?;
            templates.push(CurriculumTemplate { id, title, items });
        }
        Ok(templates)
    }
}

impl AssignmentStore for SqliteStore {
    fn assignments_for(&self, student: &str) -> Result<Vec<Assignment>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, curriculum_id, title, days, start_date, review_cycles
             FROM assignments WHERE student = ?1 ORDER BY start_date, id",
        )?;
        let rows = stmt.query_map(params![student], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, u32>(5)?,
            ))
        })?;
        let mut assignments = Vec::new();
        for row in rows {
            let (id, curriculum_id, title, days_json, start_date, review_cycles) = row?;
            assignments.push(Assignment {
                id,
                curriculum_id,
                title,
                days: decode_json("assignment days", &days_json)?,
                start_date: parse_date("assignment start date", &start_date)?,
                review_cycles,
            });
        }
        Ok(assignments)
    }

    fn upsert_assignment(&self, student: &str, assignment: &Assignment) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO assignments
             (id, student, curriculum_id, title, days, start_date, review_cycles)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                assignment.id,
                student,
                assignment.curriculum_id,
                assignment.title,
                encode_json("assignment days", &assignment.days)?,
                format_date(assignment.start_date),
                assignment.review_cycles,
            ],
        )?;
        Ok(())
    }

    fn remove_assignment(&self, student: &str, assignment_id: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "DELETE FROM assignments WHERE student = ?1 AND id = ?2",
            params![student, assignment_id],
        )?;
        Ok(())
    }
}

impl HistoryStore for SqliteStore {
    fn history_for(&self, student: &str) -> Result<Vec<LessonRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT curriculum_id, date, completed_at, main_score, review_score
             FROM lesson_history WHERE student = ?1 ORDER BY date, curriculum_id",
        )?;
        let rows = stmt.query_map(params![student], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, u32>(3)?,
                row.get::<_, Option<u32>>(4)?,
            ))
        })?;
        let mut records = Vec::new();
        for row in rows {
            let (curriculum_id, date, completed_at, main_score, review_score) = row?;
            records.push(LessonRecord {
                curriculum_id,
                date: parse_date("history date", &date)?,
                completed_at: parse_timestamp("history completion time", &completed_at)?,
                main_score,
                review_score,
            });
        }
        Ok(records)
    }

    fn upsert_record(&self, student: &str, record: &LessonRecord) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO lesson_history
             (student, curriculum_id, date, completed_at, main_score, review_score)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                student,
                record.curriculum_id,
                format_date(record.date),
                record.completed_at.to_rfc3339(),
                record.main_score,
                record.review_score,
            ],
        )?;
        Ok(())
    }
}

// === Column codecs ===

fn encode_json<T: Serialize>(what: &str, value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|e| StoreError::Corrupt {
        what: what.to_string(),
        message: e.to_string(),
    })
}

fn decode_json<T: DeserializeOwned>(what: &str, json: &str) -> Result<T, StoreError> {
    serde_json::from_str(json).map_err(|e| StoreError::Corrupt {
        what: what.to_string(),
        message: e.to_string(),
    })
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_date(what: &str, s: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| StoreError::Corrupt {
        what: what.to_string(),
        message: e.to_string(),
    })
}

fn parse_timestamp(what: &str, s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt {
            what: what.to_string(),
            message: e.to_string(),
        })
}
