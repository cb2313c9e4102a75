//! The Dayan ("Great Expansion") yarrow-stalk counting engine.
//!
//! # Method
//!
//! A casting starts from a pool of forty-nine stalks per line. Each line is
//! determined by three *changes*; one change is:
//!
//! 1. **Divide** - the pile is split into two hands, roughly in half.
//! 2. **Hang one** - a single stalk is taken from the right hand and set
//!    between the fingers.
//! 3. **Count by fours** - each hand is counted off in groups of four; an
//!    exact multiple leaves a full group of four in hand.
//! 4. **Set aside** - the hung stalk plus both remainders leave the pool.
//!
//! After three changes the remaining count divided by four is the line
//! value: 6 (old yin), 7 (young yang), 8 (young yin), or 9 (old yang). Six
//! lines, counted bottom to top, form the hexagram; old lines flip polarity
//! in the transformed hexagram.
//!
//! # Randomness
//!
//! The only stochastic step is the divide. It is modeled as a capability
//! ([`PileSplitter`]) passed into the engine, so castings are reproducible
//! under a seeded generator or a scripted sequence. The production
//! implementation, [`HandSplitter`], biases the split toward an even divide
//! the way a human hand does.

mod change;
mod engine;
mod hexagram;
mod line;
mod splitter;

pub use change::{count_off_by_fours, perform_change};
pub use engine::{DivinationEngine, LINES_PER_HEXAGRAM};
pub use hexagram::build_hexagram;
pub use line::{CHANGES_PER_LINE, STARTING_STALKS, resolve_line};
pub use splitter::{DEFAULT_SPREAD, HandSplitter, PileSplitter, ScriptedSplitter};
