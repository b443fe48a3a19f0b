//! # chaos-dynamics
//!
//! Concurrent exploration of discrete- and continuous-time dynamical
//! systems over grids of parameters and initial conditions.
//!
//! ## Engine
//!
//! Every (parameter, initial condition) pair is an independent, unbounded,
//! lazily computed trajectory. A producer task iterates the system's
//! recurrence kernel and writes into a bounded queue of 400 samples; a full
//! queue suspends the producer. Analyses run as ordinary sequential code
//! that suspends only while waiting on a specific queue, drawing exactly as
//! many elements as they need.
//!
//! ### Systems
//!
//! 1. **Logistic map**: x' = r·x·(1 - x), r ∈ [0, 4]
//! 2. **Forced Duffing oscillator**: double well with damping 0.5
//! 3. **Rössler flow**: explicit Euler with h = 1/1000, terminating on
//!    NaN/∞
//!
//! ### Analyses
//!
//! - Transient removal, convergence to known attractors
//! - Period-doubling detection along r (1→2 near 3.0, 2→4 near 3.449)
//! - Liapunov exponent curve (zero crossing near r ≈ 3.57)
//! - Separation of neighbouring initial conditions
//! - Bifurcation diagram point sets
//!
//! Rendering, flag parsing and report formatting are left to callers,
//! which receive point sets, scalar curves and numeric records.
//!
//! ## Example
//!
//! ```no_run
//! use chaos_dynamics::{Axis, ParameterGrid, LogisticMap, sample_diagram};
//!
//! # async fn run() -> chaos_dynamics::Result<()> {
//! let rows = Axis::new("r", 2.5, 4.0, 0.01)?;
//! let cols = Axis::new("x0", 0.0, 1.0, 0.1)?;
//! let mut grid = ParameterGrid::build(rows, cols, 400, LogisticMap::cell)?;
//! let diagram = sample_diagram(&mut grid, 300).await?;
//! grid.shutdown().await?;
//! # let _ = diagram;
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod sequence;
pub mod systems;

pub use error::{DynamicsError, Result};

// Re-exports from systems
pub use systems::{
    // Traits
    RecurrenceKernel,
    Differentiable,
    PhaseDistance,
    // Logistic
    LogisticMap,
    // Duffing
    DuffingOscillator,
    DuffingState,
    PhasePoint,
    // Rössler
    RosslerFlow,
    RosslerPoint,
};

// Re-exports from sequence
pub use sequence::{Axis, ParameterGrid, Sample, Sequence, DEFAULT_CAPACITY};

// Re-exports from analysis
pub use analysis::{
    skip_transient,
    classify,
    Attractor,
    ConvergenceReport,
    BifurcationDetector,
    BifurcationPoints,
    LiapunovCurve,
    LiapunovEstimator,
    compare,
    DivergenceRecord,
    flat_index,
    sample_diagram,
    BifurcationDiagram,
    record_pair,
    record_trajectory,
    Trajectory,
};

// Re-exports from config
pub use config::{ExplorerConfig, SystemKind};
