//! Fallback value synthesis.
//!
//! Aggregators call into a [`Synthesizer`] whenever a metric cannot be
//! computed from the rows at hand: an empty month, a lot with no dates, a
//! process sheet without step names. Every draw goes through one of the
//! documented [`ranges`], so tests can assert the range contract without
//! caring about the exact value.
//!
//! Two implementations ship with the crate:
//!
//! - [`SeededSynthesizer`]: `StdRng` draws, seeded from entropy or a fixed
//!   seed for reproducible artifacts.
//! - [`MidpointSynthesizer`]: always the middle of the range. Useful when a
//!   run must be fully deterministic.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::metrics::round1;

/// Half-open interval `[low, high)` a synthesized value is drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackRange {
    pub low: f64,
    pub high: f64,
}

impl FallbackRange {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    /// True if `value`, after one-decimal rounding, lies within the range.
    /// Rounding can land exactly on `high`, so the upper bound is inclusive.
    pub fn contains_rounded(&self, value: f64) -> bool {
        value >= round1(self.low) && value <= round1(self.high)
    }
}

/// Documented ranges for every synthesized metric.
pub mod ranges {
    use super::FallbackRange;

    /// Monthly internal record RFT when a month has no internal rows.
    pub const INTERNAL_MONTH_RFT: FallbackRange = FallbackRange::new(90.0, 95.0);
    /// Monthly external record RFT when a month has no external rows.
    pub const EXTERNAL_MONTH_RFT: FallbackRange = FallbackRange::new(88.0, 93.0);
    /// NN review time for a month without NN reviews.
    pub const NN_REVIEW_TIME: FallbackRange = FallbackRange::new(2.5, 3.5);
    /// PCI review time for a month without PCI reviews.
    pub const PCI_REVIEW_TIME: FallbackRange = FallbackRange::new(3.0, 4.0);
    /// Spread applied around an undated mean review time.
    pub const REVIEW_JITTER: FallbackRange = FallbackRange::new(-0.25, 0.25);
    /// Spread applied around a default step duration.
    pub const STEP_JITTER: FallbackRange = FallbackRange::new(-0.25, 0.25);
    /// Wait between steps when no end/start dates pair up.
    pub const WAIT_TIME: FallbackRange = FallbackRange::new(0.5, 2.0);
    /// Lot cycle time when neither a recorded value nor a date span exists.
    pub const LOT_CYCLE_TIME: FallbackRange = FallbackRange::new(15.0, 20.0);
    /// Period-over-period change in lot pass percentage.
    pub const LOT_QUALITY_CHANGE: FallbackRange = FallbackRange::new(-1.0, 3.0);
    /// Noise on synthesized monthly RFT trend points.
    pub const TREND_NOISE: FallbackRange = FallbackRange::new(-0.5, 0.5);
    /// RFT of a synthesized lot without errors.
    pub const CLEAN_LOT_RFT: FallbackRange = FallbackRange::new(90.0, 98.0);
    /// RFT of a synthesized lot with errors.
    pub const FAILING_LOT_RFT: FallbackRange = FallbackRange::new(85.0, 90.0);
    /// Number of lots synthesized when no lot ids exist, `[low, high)`.
    pub const SYNTHETIC_LOT_COUNT: (u64, u64) = (50, 80);
    /// Probability that a synthesized lot has errors.
    pub const SYNTHETIC_LOT_ERROR_PROBABILITY: f64 = 0.15;
}

/// Source of fallback values. Object safe so aggregators take
/// `&mut dyn Synthesizer`.
pub trait Synthesizer {
    /// Uniform draw in `[low, high)`. Returns `low` for an empty interval.
    fn uniform(&mut self, low: f64, high: f64) -> f64;

    fn draw(&mut self, range: FallbackRange) -> f64 {
        self.uniform(range.low, range.high)
    }

    /// One-decimal draw from `range`.
    fn draw1(&mut self, range: FallbackRange) -> f64 {
        round1(self.draw(range))
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.uniform(0.0, 1.0) < probability
    }

    /// Integer draw in `[low, high)`.
    fn count(&mut self, low: u64, high: u64) -> u64 {
        if high <= low {
            return low;
        }
        (self.uniform(low as f64, high as f64).floor() as u64).clamp(low, high - 1)
    }

    /// Index draw in `[0, len)`.
    fn index(&mut self, len: usize) -> usize {
        self.count(0, len as u64) as usize
    }
}

/// Synthesized point of a gently improving monthly trend:
/// `base + 0.5 × month_index` plus noise.
pub fn monthly_trend(synth: &mut dyn Synthesizer, base: f64, month_index: usize) -> f64 {
    round1(base + 0.5 * month_index as f64 + synth.draw(ranges::TREND_NOISE))
}

/// Random draws from `StdRng`.
pub struct SeededSynthesizer {
    rng: StdRng,
}

impl SeededSynthesizer {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Fixed seed when given, entropy otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_entropy(),
        }
    }
}

impl Synthesizer for SeededSynthesizer {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..high)
    }
}

/// Always returns the middle of the requested interval.
#[derive(Debug, Default, Clone, Copy)]
pub struct MidpointSynthesizer;

impl Synthesizer for MidpointSynthesizer {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        (low + high) / 2.0
    }
}
