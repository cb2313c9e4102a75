//! Casting orchestration: six lines, bottom to top.

use rand::rngs::ThreadRng;
use yarrow_types::{DivinationResult, LineRecord, LineValue};

use crate::hexagram::build_hexagram;
use crate::line::resolve_line;
use crate::splitter::{HandSplitter, PileSplitter};

/// Lines per hexagram.
pub const LINES_PER_HEXAGRAM: usize = 6;

/// Runs complete castings over an injected splitter.
///
/// The engine holds no state besides the splitter, and every call to
/// [`run`](Self::run) allocates fresh records, so repeated castings are
/// independent trials.
#[derive(Debug, Clone)]
pub struct DivinationEngine<S> {
    splitter: S,
}

impl DivinationEngine<HandSplitter<ThreadRng>> {
    /// Engine over thread-local entropy with the default hand spread.
    #[must_use]
    pub fn new() -> Self {
        Self::with_splitter(HandSplitter::new(rand::rng()))
    }

    /// Engine over thread-local entropy with a caller-chosen hand spread.
    #[must_use]
    pub fn with_spread(spread: f64) -> Self {
        Self::with_splitter(HandSplitter::with_spread(rand::rng(), spread))
    }
}

impl Default for DivinationEngine<HandSplitter<ThreadRng>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PileSplitter> DivinationEngine<S> {
    /// Engine over a caller-supplied splitter.
    ///
    /// Fixing the splitter's randomness makes the whole casting
    /// reproducible.
    pub fn with_splitter(splitter: S) -> Self {
        Self { splitter }
    }

    /// Cast a full hexagram.
    ///
    /// Six lines, each counted from a fresh 49-stalk pool; no total carries
    /// over between lines. Returns the hexagram pair together with the
    /// change-by-change log the narrator replays.
    pub fn run(&mut self) -> DivinationResult {
        let mut process_log = Vec::with_capacity(LINES_PER_HEXAGRAM);

        let lines: [LineValue; LINES_PER_HEXAGRAM] = std::array::from_fn(|idx| {
            let (value, changes) = resolve_line(&mut self.splitter);
            process_log.push(LineRecord {
                line_idx: idx as u8 + 1,
                value,
                changes,
            });
            value
        });

        let hex_result = build_hexagram(lines);
        tracing::debug!(
            lines = ?lines.map(LineValue::as_u8),
            original = %hex_result.original_binary,
            changed = %hex_result.changed_binary,
            "casting complete"
        );

        DivinationResult {
            hex_result,
            process_log,
        }
    }
}
