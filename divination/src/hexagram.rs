//! Deriving the primary and transformed hexagrams from six line values.

use yarrow_types::{HexagramResult, LineValue};

/// Encode six line values (bottom line first) as the primary and
/// transformed binary strings plus the moving-line positions.
///
/// Pure function of its input; the engine is the only caller that matters,
/// but replaying a recorded casting through it gives the same result.
#[must_use]
pub fn build_hexagram(lines: [LineValue; 6]) -> HexagramResult {
    let mut original_binary = String::with_capacity(lines.len());
    let mut changed_binary = String::with_capacity(lines.len());
    let mut changing_lines = Vec::new();

    for (idx, value) in lines.iter().enumerate() {
        original_binary.push(if value.is_yang() { '1' } else { '0' });
        changed_binary.push(if value.is_yang_after_change() { '1' } else { '0' });
        if value.is_moving() {
            changing_lines.push(idx as u8 + 1);
        }
    }

    let has_change = !changing_lines.is_empty();
    HexagramResult {
        original_lines: lines,
        original_binary,
        changed_binary,
        changing_lines,
        has_change,
    }
}
