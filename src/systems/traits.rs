//! Recurrence Kernel Traits: Standardized API for Sequence Producers
//!
//! Every system explored by this crate is expressed as a pure update rule.
//! A kernel owns its parameters (bound once at construction) and maps a
//! state to the next state with no side effects, so a producer task can
//! iterate it indefinitely and two runs from the same inputs agree bit for
//! bit.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   RecurrenceKernel Trait                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  + advance(state)      - Next state, parameters fixed       │
//! │  + observe(state)      - Point handed to consumers          │
//! │  + is_finite(state)    - False once NaN/Inf appears         │
//! │  + name()              - Label for logging                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! `State` and `Point` differ only where a kernel carries bookkeeping the
//! consumers must not see (the Duffing oscillator's internal clock).

use std::fmt::Debug;

/// Deterministic one-step update rule of a dynamical system
pub trait RecurrenceKernel: Send + Sync + 'static {
    /// Full internal state advanced by the kernel
    type State: Copy + Send + 'static;

    /// Observable part of the state emitted into a sequence
    type Point: Copy + Debug + Send + 'static;

    /// Compute the next state
    fn advance(&self, state: &Self::State) -> Self::State;

    /// Project a state onto what consumers observe
    fn observe(&self, state: &Self::State) -> Self::Point;

    /// Whether every coordinate of `state` is finite
    ///
    /// A producer emits the first non-finite state as a terminal marker and
    /// stops.
    fn is_finite(&self, state: &Self::State) -> bool;

    /// Short system name for log fields
    fn name(&self) -> &'static str;
}

/// One-dimensional kernels with a known derivative of the update rule
///
/// Required by the Liapunov estimator, which averages `ln|f'(x)|` along a
/// trajectory.
pub trait Differentiable: RecurrenceKernel<Point = f64> {
    /// Derivative of the map evaluated at `x`
    fn derivative(&self, x: f64) -> f64;
}

/// Distance between two observed points, used to compare neighbouring
/// trajectories
pub trait PhaseDistance {
    fn distance(&self, other: &Self) -> f64;
}

impl PhaseDistance for f64 {
    fn distance(&self, other: &Self) -> f64 {
        (self - other).abs()
    }
}
