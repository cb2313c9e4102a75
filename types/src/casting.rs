//! Record types produced by a yarrow-stalk casting.
//!
//! These are the value types the counting engine emits and every other layer
//! consumes: the narrator replays the change records, the interpreter reads
//! the binary encodings. All of them are plain immutable data; the serde
//! field names are the wire schema downstream consumers depend on.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The four classical line values a completed count can land on.
///
/// Old lines (6 and 9) are "moving": they flip polarity in the transformed
/// hexagram. Young lines (7 and 8) carry over unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum LineValue {
    /// 6 - old yin, broken line that transforms to solid.
    OldYin,
    /// 7 - young yang, solid line.
    YoungYang,
    /// 8 - young yin, broken line.
    YoungYin,
    /// 9 - old yang, solid line that transforms to broken.
    OldYang,
}

#[derive(Debug, Error)]
#[error("line value must be 6, 7, 8, or 9, got {0}")]
pub struct InvalidLineValueError(pub u8);

impl LineValue {
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::OldYin => 6,
            Self::YoungYang => 7,
            Self::YoungYin => 8,
            Self::OldYang => 9,
        }
    }

    /// Whether the line is drawn solid in the primary hexagram.
    #[must_use]
    pub const fn is_yang(self) -> bool {
        matches!(self, Self::YoungYang | Self::OldYang)
    }

    /// Whether the line flips in the transformed hexagram.
    #[must_use]
    pub const fn is_moving(self) -> bool {
        matches!(self, Self::OldYin | Self::OldYang)
    }

    /// Whether the line is drawn solid after transformation.
    ///
    /// Old yin becomes yang, old yang becomes yin; young lines keep their
    /// polarity.
    #[must_use]
    pub const fn is_yang_after_change(self) -> bool {
        matches!(self, Self::OldYin | Self::YoungYang)
    }

    #[must_use]
    pub const fn chinese_name(self) -> &'static str {
        match self {
            Self::OldYin => "老阴",
            Self::YoungYang => "少阳",
            Self::YoungYin => "少阴",
            Self::OldYang => "老阳",
        }
    }
}

impl TryFrom<u8> for LineValue {
    type Error = InvalidLineValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            6 => Ok(Self::OldYin),
            7 => Ok(Self::YoungYang),
            8 => Ok(Self::YoungYin),
            9 => Ok(Self::OldYang),
            other => Err(InvalidLineValueError(other)),
        }
    }
}

impl From<LineValue> for u8 {
    fn from(value: LineValue) -> Self {
        value.as_u8()
    }
}

impl std::fmt::Display for LineValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// One divide / hang-one / count-by-fours cycle on the stalk pile.
///
/// Invariants maintained by the engine: both remainders are in `1..=4`,
/// `removed == 1 + left_rem + right_rem`, and `new_total` is the pile size
/// the next cycle starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Stalks taken into the left hand by the divide.
    pub left: u32,
    /// Stalks taken into the right hand, before one is hung aside.
    pub right: u32,
    /// Left-hand remainder after counting off by fours.
    pub left_rem: u32,
    /// Right-hand remainder after hanging one and counting off by fours.
    pub right_rem: u32,
    /// Stalks set aside this cycle: the hung stalk plus both remainders.
    pub removed: u32,
    /// Stalks remaining in play after this cycle.
    pub new_total: u32,
}

/// The three recorded change cycles that determined one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRecord {
    /// 1-based position, 1 = bottom line.
    pub line_idx: u8,
    pub value: LineValue,
    pub changes: [ChangeRecord; 3],
}

/// The primary and transformed hexagrams derived from six line values.
///
/// `original_binary` and `changed_binary` are six characters of `'0'`/`'1'`,
/// index 0 = bottom line, `'1'` = solid. When no line is moving the two
/// encodings are identical and `changing_lines` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexagramResult {
    pub original_lines: [LineValue; 6],
    pub original_binary: String,
    pub changed_binary: String,
    /// Ascending 1-based positions of moving lines.
    pub changing_lines: Vec<u8>,
    pub has_change: bool,
}

/// Complete output of one casting: the hexagram pair plus the step-by-step
/// log the narrator replays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivinationResult {
    pub hex_result: HexagramResult,
    /// One record per line, in casting order (bottom line first).
    pub process_log: Vec<LineRecord>,
}
