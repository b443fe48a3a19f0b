//! Recurrence Kernels: Dynamical Models Explored by the Engine
//!
//! - **Logistic map**: Period doubling and chaos in one dimension
//! - **Duffing**: Periodically forced double-well oscillator
//! - **Rössler**: Continuous-time chaotic flow
//!
//! Kernels are pure update rules; the sequence layer runs them.

mod traits;
mod logistic;
mod duffing;
mod rossler;

pub use traits::{RecurrenceKernel, Differentiable, PhaseDistance};
pub use logistic::LogisticMap;
pub use duffing::{DuffingOscillator, DuffingState, PhasePoint};
pub use rossler::{RosslerFlow, RosslerPoint};
