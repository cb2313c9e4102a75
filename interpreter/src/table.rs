//! The sixty-four hexagram table.

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Binary strings are six characters, bottom line first, '1' = solid.
const BINARY_LEN: usize = 6;
const HEXAGRAM_COUNT: usize = 64;

static EMBEDDED_JSON: &str = include_str!("../data/hexagrams.json");

/// One hexagram record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hexagram {
    /// King Wen sequence number, 1..=64.
    pub number: u8,
    /// Chinese name.
    pub name: String,
    pub pinyin: String,
    pub english: String,
    /// Bottom-up line encoding, e.g. "111010".
    pub binary: String,
    /// The judgment text (卦辞).
    pub judgment: String,
}

impl Hexagram {
    /// Short display label, e.g. "乾卦 (第1卦)".
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}卦 (第{}卦)", self.name, self.number)
    }

    /// The judgment text with its attribution, for quoting in prompts.
    #[must_use]
    pub fn cited_judgment(&self) -> String {
        format!("{}卦（{}，第{}卦）\n卦辞：{}", self.name, self.pinyin, self.number, self.judgment)
    }
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read hexagram data file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse hexagram data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("hexagram table must have {HEXAGRAM_COUNT} entries, got {0}")]
    WrongCount(usize),
    #[error("hexagram {number} has malformed binary {binary:?}")]
    BadBinary { number: u8, binary: String },
    #[error("hexagrams {first} and {second} share binary {binary:?}")]
    DuplicateBinary { first: u8, second: u8, binary: String },
}

/// All sixty-four hexagrams, indexed by their binary encoding.
#[derive(Debug, Clone)]
pub struct HexagramTable {
    entries: Vec<Hexagram>,
    by_binary: HashMap<String, usize>,
}

impl HexagramTable {
    /// The table compiled into the binary.
    ///
    /// Parsed once on first use; the embedded data is validated by tests,
    /// so a failure here means a corrupted build.
    pub fn embedded() -> &'static Self {
        static TABLE: OnceLock<HexagramTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            Self::from_json(EMBEDDED_JSON).expect("embedded hexagram table must be valid")
        })
    }

    /// Parse and validate a table from JSON text.
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        let entries: Vec<Hexagram> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    /// Load a replacement table from disk, e.g. one carrying line texts or
    /// commentary beyond the embedded judgments.
    pub fn load(path: &Path) -> Result<Self, TableError> {
        let json = std::fs::read_to_string(path)?;
        tracing::info!(path = %path.display(), "loaded hexagram table override");
        Self::from_json(&json)
    }

    fn from_entries(entries: Vec<Hexagram>) -> Result<Self, TableError> {
        if entries.len() != HEXAGRAM_COUNT {
            return Err(TableError::WrongCount(entries.len()));
        }

        let mut by_binary = HashMap::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            let well_formed = entry.binary.len() == BINARY_LEN
                && entry.binary.bytes().all(|b| b == b'0' || b == b'1');
            if !well_formed {
                return Err(TableError::BadBinary {
                    number: entry.number,
                    binary: entry.binary.clone(),
                });
            }
            if let Some(prev) = by_binary.insert(entry.binary.clone(), idx) {
                return Err(TableError::DuplicateBinary {
                    first: entries[prev].number,
                    second: entry.number,
                    binary: entry.binary.clone(),
                });
            }
        }

        Ok(Self { entries, by_binary })
    }

    /// Look up a hexagram by its bottom-up binary encoding.
    #[must_use]
    pub fn by_binary(&self, binary: &str) -> Option<&Hexagram> {
        self.by_binary.get(binary).map(|&idx| &self.entries[idx])
    }

    #[must_use]
    pub fn entries(&self) -> &[Hexagram] {
        &self.entries
    }
}
