//! Analysis Consumers: Steady-State and Statistical Quantities
//!
//! Each consumer draws a controlled number of elements from one or more
//! sequences:
//!
//! - **Transient**: Discard the first n elements
//! - **Convergence**: Compare samples against a known attractor
//! - **Bifurcation**: Detect period doublings along the r axis
//! - **Liapunov**: Average log-derivative along a trajectory
//! - **Divergence**: Separation of neighbouring initial conditions
//! - **Diagram**: One steady-state point per grid cell
//! - **Trajectory**: Raw point sets for phase portraits

mod transient;
mod convergence;
mod bifurcation;
mod liapunov;
mod divergence;
mod diagram;
mod trajectory;

pub use transient::{skip_transient, DEFAULT_TRANSIENT};
pub use convergence::{classify, Attractor, ConvergenceRecord, ConvergenceReport};
pub use bifurcation::{
    BifurcationDetector,
    BifurcationPoints,
    Regime,
    BIFURCATION_TOLERANCE,
    SETTLE_DISCARD,
};
pub use liapunov::{LiapunovCurve, LiapunovEstimator, LiapunovPoint};
pub use divergence::{compare, decorrelation_time, DivergenceRecord};
pub use diagram::{flat_index, sample_diagram, BifurcationDiagram};
pub use trajectory::{record_pair, record_trajectory, Trajectory};
