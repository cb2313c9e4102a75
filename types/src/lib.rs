//! Core domain types for Yarrow.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod casting;
mod stream;

pub use casting::{
    ChangeRecord, DivinationResult, HexagramResult, InvalidLineValueError, LineRecord, LineValue,
};
pub use stream::{GenerateStats, StreamEvent};
