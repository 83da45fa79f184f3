//! Wordbook model and unit indexing.
//!
//! A wordbook is a flat, ordered list of vocabulary entries imported from a
//! textbook. Entry order is significant: it defines unit boundaries and
//! every slice position the scheduler hands out, so entries are never
//! reordered after import.

use serde::{Deserialize, Serialize};

/// One vocabulary entry of a wordbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    /// 1-based position printed in the textbook.
    pub number: u32,
    /// Textbook title this entry belongs to.
    pub textbook: String,
    /// Major section label (e.g. a chapter).
    pub major: String,
    /// Minor section label (e.g. a lesson within the chapter).
    pub minor: String,
    /// Display name of the unit.
    pub unit_name: String,
    /// English headword.
    pub english: String,
    /// Korean meaning.
    pub korean: String,
}

/// A wordbook: an id, a title, and its ordered entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wordbook {
    pub id: String,
    pub title: String,
    pub words: Vec<WordEntry>,
}

impl Wordbook {
    pub fn new(id: impl Into<String>, title: impl Into<String>, words: Vec<WordEntry>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            words,
        }
    }
}

/// A maximal run of consecutive entries sharing one (major, minor) pair.
///
/// Derived on demand from a word list via [`index_units`]; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub major: String,
    pub minor: String,
    /// Start index into the source word list (inclusive).
    pub start: usize,
    /// End index (exclusive).
    pub end: usize,
}

impl Unit {
    /// The entries this unit spans within its source list.
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

/// Groups an ordered word list into contiguous units.
///
/// Opens a new unit whenever the (major, minor) pair differs from the
/// running one; the trailing run closes the final unit. Empty input yields
/// no units.
pub fn index_units(words: &[WordEntry]) -> Vec<Unit> {
    let mut units: Vec<Unit> = Vec::new();
    for (i, word) in words.iter().enumerate() {
        match units.last_mut() {
            Some(unit) if unit.major == word.major && unit.minor == word.minor => {
                unit.end = i + 1;
            }
            _ => units.push(Unit {
                major: word.major.clone(),
                minor: word.minor.clone(),
                start: i,
                end: i + 1,
            }),
        }
    }
    units
}
