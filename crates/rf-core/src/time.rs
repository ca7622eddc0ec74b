//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Step` counter shared by every agent.
//! There is no wall-clock mapping in the kernel: a step is whatever period
//! the input deck says it is (fuel-cycle decks typically use months).
//! Using an integer step as the canonical unit means all lifetime and
//! decommission arithmetic is exact and comparisons are O(1).

use std::fmt;

// ── Step ─────────────────────────────────────────────────────────────────────

/// An absolute simulation step counter.
///
/// `u64` so overflow is a non-concern for any conceivable run length.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step(pub u64);

impl Step {
    pub const ZERO: Step = Step(0);

    /// Return the step `n` periods after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Step {
        Step(self.0 + n)
    }

    /// Steps elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Step) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Step {
    type Output = Step;
    #[inline]
    fn add(self, rhs: u64) -> Step {
        Step(self.0 + rhs)
    }
}

impl std::ops::Sub for Step {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Step) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── Lifetime ─────────────────────────────────────────────────────────────────

/// How long an agent stays live once built.
///
/// Unbounded lifetimes never trip the timer-driven decommission transition;
/// such agents only retire when externally forced or when their own
/// decommission condition fires.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Lifetime {
    /// Live for exactly `n` steps from the build step.
    Finite(u64),
    /// Never decommissioned on a timer.
    Unbounded,
}

impl Lifetime {
    /// The step at which an agent built at `build` is due for decommission,
    /// or `None` for an unbounded lifetime.
    ///
    /// Lifetimes come from user input; an absurd value saturates to the end
    /// of the step range rather than panicking.
    #[inline]
    pub fn decommission_step(self, build: Step) -> Option<Step> {
        match self {
            Lifetime::Finite(n) => Some(Step(build.0.saturating_add(n))),
            Lifetime::Unbounded => None,
        }
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifetime::Finite(n) => write!(f, "{n} steps"),
            Lifetime::Unbounded => write!(f, "unbounded"),
        }
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The kernel's single clock — advanced exactly once per scheduler step.
///
/// Cheap to copy and intentionally holds no heap data.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// The current step — advanced by `SimClock::advance()` each period.
    pub current_step: Step,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by one step.
    #[inline]
    pub fn advance(&mut self) {
        self.current_step = Step(self.current_step.0 + 1);
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.current_step)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Produced by the (external) input-deck layer after validation and passed to
/// the scheduler builder; the kernel never parses configuration documents.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Total steps to simulate.
    pub total_steps: u64,
}

impl SimConfig {
    /// The step at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_step(&self) -> Step {
        Step(self.total_steps)
    }
}
