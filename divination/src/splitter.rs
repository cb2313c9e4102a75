//! The divide step: splitting the stalk pile between two hands.

use rand::{Rng, RngExt};

/// Default standard deviation of the hand-split error, in stalks.
///
/// This is a tuning choice with no classical source; it is exposed through
/// configuration rather than fixed here.
pub const DEFAULT_SPREAD: f64 = 2.0;

/// Capability that divides a pile of `total` stalks into two nonempty piles.
///
/// `total` is always at least 2 when called from the counting engine. The
/// returned pair must sum to `total` with both sides nonzero.
pub trait PileSplitter {
    fn split(&mut self, total: u32) -> (u32, u32);
}

/// Simulates a human dividing the pile by feel.
///
/// The left-hand count is drawn from a normal distribution centered on half
/// the pile, rounded, then clamped so neither hand ends up empty. Most
/// divides land near the middle; the occasional one drifts a few stalks off.
#[derive(Debug, Clone)]
pub struct HandSplitter<R> {
    rng: R,
    spread: f64,
}

impl<R: Rng> HandSplitter<R> {
    pub fn new(rng: R) -> Self {
        Self::with_spread(rng, DEFAULT_SPREAD)
    }

    pub fn with_spread(rng: R, spread: f64) -> Self {
        Self { rng, spread }
    }
}

impl<R: Rng> PileSplitter for HandSplitter<R> {
    fn split(&mut self, total: u32) -> (u32, u32) {
        let half = f64::from(total) / 2.0;
        let drawn = (half + self.spread * standard_normal(&mut self.rng)).round();
        // The float-to-int cast saturates, so even an extreme draw stays
        // inside the clamp's domain.
        let left = (drawn as i64).clamp(1, i64::from(total) - 1) as u32;
        (left, total - left)
    }
}

/// Standard normal draw via the Box-Muller transform.
fn standard_normal<R: Rng>(rng: &mut R) -> f64 {
    // Uniform draws land in [0, 1); flipping the first one keeps the
    // logarithm's argument strictly positive.
    let u: f64 = 1.0 - rng.random::<f64>();
    let v: f64 = rng.random();
    (-2.0 * u.ln()).sqrt() * (std::f64::consts::TAU * v).cos()
}

/// Replays a fixed sequence of left-hand counts.
///
/// Used to reproduce a recorded casting exactly, change by change.
///
/// # Panics
///
/// Panics when asked for more splits than the script contains.
#[derive(Debug, Clone)]
pub struct ScriptedSplitter {
    lefts: Vec<u32>,
    next: usize,
}

impl ScriptedSplitter {
    #[must_use]
    pub fn new(lefts: Vec<u32>) -> Self {
        Self { lefts, next: 0 }
    }
}

impl PileSplitter for ScriptedSplitter {
    fn split(&mut self, total: u32) -> (u32, u32) {
        let left = *self
            .lefts
            .get(self.next)
            .expect("scripted splitter ran out of left-hand counts");
        self.next += 1;
        assert!(
            left >= 1 && left < total,
            "scripted left-hand count {left} does not fit a pile of {total}"
        );
        (left, total - left)
    }
}
