//! Streaming events emitted by the interpretation provider.

use serde::{Deserialize, Serialize};

/// Generation counters reported by the model server when a stream finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateStats {
    /// Wall-clock duration of the whole request, in nanoseconds.
    pub total_duration: Option<u64>,
    /// Number of tokens generated.
    pub eval_count: Option<u64>,
}

/// Normalized streaming event from the interpretation provider.
///
/// Errors during streaming are delivered as `Error` events rather than
/// `Result::Err` returns, so partial output stays printable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Incremental text content from the model.
    TextDelta(String),
    /// Stream completed successfully.
    Done(GenerateStats),
    /// Stream terminated with an error.
    Error(String),
}
