//! Sequence Engine: Producers, Queues and the Parameter Grid
//!
//! Every (parameter, initial condition) pair gets its own producer task
//! feeding a bounded FIFO queue. Analyses pull from these queues through
//! the grid accessor, suspending only while waiting on a specific queue.
//!
//! ```text
//!  kernel ──▶ producer task ──▶ [ bounded queue (400) ] ──▶ consumer
//!                  ▲                                           │
//!                  └──────────── cancellation signal ◀─────────┘
//! ```

mod axis;
mod grid;
mod stream;

pub use axis::Axis;
pub use grid::ParameterGrid;
pub use stream::{Sample, Sequence, DEFAULT_CAPACITY};
