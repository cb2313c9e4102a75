//! Resolving a casting into hexagram records and a reading rule.

use thiserror::Error;
use yarrow_types::HexagramResult;

use crate::table::{Hexagram, HexagramTable};

#[derive(Debug, Error)]
pub enum InterpretError {
    /// The binary encoding has no entry in the table. Unreachable with the
    /// embedded table; a replacement data file can get here.
    #[error("no hexagram found for binary {binary:?}")]
    UnknownHexagram { binary: String },
}

/// A casting resolved against the hexagram table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpretation<'a> {
    pub original: &'a Hexagram,
    /// Present exactly when the casting has moving lines.
    pub changed: Option<&'a Hexagram>,
    /// Ascending 1-based positions of moving lines.
    pub changing_lines: Vec<u8>,
    /// The classical rule for which text governs this reading.
    pub guide: &'static str,
}

/// Look up the primary and transformed hexagrams for a casting.
pub fn interpret<'a>(
    table: &'a HexagramTable,
    hex: &HexagramResult,
) -> Result<Interpretation<'a>, InterpretError> {
    let original =
        table
            .by_binary(&hex.original_binary)
            .ok_or_else(|| InterpretError::UnknownHexagram {
                binary: hex.original_binary.clone(),
            })?;

    let changed = if hex.has_change {
        Some(table.by_binary(&hex.changed_binary).ok_or_else(|| {
            InterpretError::UnknownHexagram {
                binary: hex.changed_binary.clone(),
            }
        })?)
    } else {
        None
    };

    let guide = reading_guide(hex.changing_lines.len(), &hex.original_binary);
    tracing::debug!(
        original = original.number,
        changed = changed.map(|h| h.number),
        moving = hex.changing_lines.len(),
        "casting interpreted"
    );

    Ok(Interpretation {
        original,
        changed,
        changing_lines: hex.changing_lines.clone(),
        guide,
    })
}

/// The classical rule for which text governs a reading, keyed on how many
/// lines are moving.
///
/// Six moving lines are special-cased for the first two hexagrams, which
/// carry a dedicated all-lines text.
#[must_use]
pub fn reading_guide(moving: usize, original_binary: &str) -> &'static str {
    match moving {
        0 => "六爻安静，以本卦卦辞断之。",
        1 => "一爻动，以本卦动爻爻辞断之。",
        2 => "二爻动，以本卦两个动爻爻辞断之，以上爻为主。",
        3 => "三爻动，以本卦及之卦卦辞合断，本卦为贞，之卦为悔。",
        4 => "四爻动，以之卦两个不变爻爻辞断之，以下爻为主。",
        5 => "五爻动，以之卦不变爻爻辞断之。",
        _ => match original_binary {
            "111111" => "六爻皆动，以乾卦用九之辞断之。",
            "000000" => "六爻皆动，以坤卦用六之辞断之。",
            _ => "六爻皆动，以之卦卦辞断之。",
        },
    }
}
