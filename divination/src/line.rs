//! Three changes resolve one line.

use yarrow_types::{ChangeRecord, LineValue};

use crate::change::perform_change;
use crate::splitter::PileSplitter;

/// Stalks in play at the start of every line: the nominal fifty less the
/// one set aside before counting begins.
pub const STARTING_STALKS: u32 = 49;

/// Change cycles per line.
pub const CHANGES_PER_LINE: usize = 3;

/// Count out a single line from a fresh pool.
///
/// Each change feeds its remaining total into the next; after the third,
/// the pool holds 24, 28, 32, or 36 stalks, and dividing by four gives the
/// line value.
pub fn resolve_line<S: PileSplitter + ?Sized>(
    splitter: &mut S,
) -> (LineValue, [ChangeRecord; CHANGES_PER_LINE]) {
    let mut current = STARTING_STALKS;
    let changes: [ChangeRecord; CHANGES_PER_LINE] = std::array::from_fn(|_| {
        let record = perform_change(splitter, current);
        current = record.new_total;
        record
    });

    let value = LineValue::try_from((current / 4) as u8)
        .expect("three changes always leave 24, 28, 32, or 36 stalks");
    (value, changes)
}
