//! Sequence Producer: one background task per trajectory
//!
//! A [`Sequence`] pairs a spawned producer task with the receiving end of a
//! bounded channel. The task iterates its kernel forever, suspending
//! whenever the channel is full, so a slow consumer throttles only its own
//! producer. The first non-finite state is sent once as
//! [`Sample::Terminal`] and the task exits; reads after that fail with
//! [`DynamicsError::EndOfSequence`] instead of blocking.
//!
//! Each sequence owns a cancellation signal. Cancelling, calling
//! [`Sequence::shutdown`], or dropping the handle stops the producer.

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::{DynamicsError, Result};
use crate::systems::RecurrenceKernel;

/// Queue capacity per sequence
pub const DEFAULT_CAPACITY: usize = 400;

/// Element of a sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample<P> {
    /// Regular finite state
    Value(P),
    /// First non-finite state; nothing follows it
    Terminal(P),
}

impl<P> Sample<P> {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Sample::Terminal(_))
    }

    pub fn into_point(self) -> P {
        match self {
            Sample::Value(p) | Sample::Terminal(p) => p,
        }
    }
}

/// Handle to a lazily computed, unbounded trajectory
///
/// Reading needs `&mut self`, which keeps a sequence to one active reader.
#[derive(Debug)]
pub struct Sequence<P> {
    rx: mpsc::Receiver<Sample<P>>,
    cancel: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
    /// Number of elements consumed so far
    position: usize,
    finished: bool,
}

impl<P: Send + 'static> Sequence<P> {
    /// Spawn a producer with the default queue capacity
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<K>(kernel: K, initial: K::State) -> Result<Self>
    where
        K: RecurrenceKernel<Point = P>,
    {
        Self::spawn_with_capacity(kernel, initial, DEFAULT_CAPACITY)
    }

    /// Spawn a producer whose queue holds at most `capacity` samples
    pub fn spawn_with_capacity<K>(kernel: K, initial: K::State, capacity: usize) -> Result<Self>
    where
        K: RecurrenceKernel<Point = P>,
    {
        if capacity == 0 {
            return Err(DynamicsError::Config("queue capacity must be positive".into()));
        }
        let (tx, rx) = mpsc::channel(capacity);
        let (cancel, cancelled) = watch::channel(false);
        let task = tokio::spawn(produce(kernel, initial, tx, cancelled));

        Ok(Self {
            rx,
            cancel,
            task: Some(task),
            position: 0,
            finished: false,
        })
    }

    /// Read the next sample, suspending until the producer supplies it
    ///
    /// The terminal marker is returned exactly once; any later read is an
    /// `EndOfSequence` error.
    pub async fn next(&mut self) -> Result<Sample<P>> {
        if self.finished {
            return Err(DynamicsError::EndOfSequence { index: self.position });
        }
        match self.rx.recv().await {
            Some(sample) => {
                if sample.is_terminal() {
                    self.finished = true;
                }
                self.position += 1;
                Ok(sample)
            }
            None => {
                self.finished = true;
                Err(DynamicsError::EndOfSequence { index: self.position })
            }
        }
    }

    /// Read the next finite point
    ///
    /// A terminal marker is reported as `NumericDivergence` at its index.
    pub async fn next_value(&mut self) -> Result<P> {
        let index = self.position;
        match self.next().await? {
            Sample::Value(p) => Ok(p),
            Sample::Terminal(_) => Err(DynamicsError::NumericDivergence { index }),
        }
    }

    /// Number of elements consumed so far (index of the next element)
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether the terminal marker or the end of the stream has been seen
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Signal the producer to stop without waiting for it
    pub fn cancel(&self) {
        let _ = self.cancel.send(true);
    }

    /// Stop the producer and wait for its task to exit
    pub async fn shutdown(&mut self) -> Result<()> {
        self.cancel();
        self.rx.close();
        self.finished = true;
        match self.task.take() {
            Some(task) => match task.await {
                Ok(()) => Ok(()),
                Err(e) if e.is_cancelled() => Ok(()),
                Err(e) => Err(DynamicsError::Producer(e.to_string())),
            },
            None => Ok(()),
        }
    }
}

impl<P> Drop for Sequence<P> {
    fn drop(&mut self) {
        let _ = self.cancel.send(true);
    }
}

async fn produce<K: RecurrenceKernel>(
    kernel: K,
    initial: K::State,
    tx: mpsc::Sender<Sample<K::Point>>,
    mut cancelled: watch::Receiver<bool>,
) {
    let mut state = initial;
    let mut emitted = 0usize;

    loop {
        let finite = kernel.is_finite(&state);
        let point = kernel.observe(&state);
        let sample = if finite { Sample::Value(point) } else { Sample::Terminal(point) };

        tokio::select! {
            biased;
            _ = cancelled.changed() => {
                debug!(system = kernel.name(), emitted, "producer cancelled");
                return;
            }
            sent = tx.send(sample) => {
                if sent.is_err() {
                    debug!(system = kernel.name(), emitted, "consumer gone, producer stopping");
                    return;
                }
            }
        }

        if !finite {
            debug!(system = kernel.name(), index = emitted, "non-finite state, sequence terminated");
            return;
        }
        emitted += 1;
        state = kernel.advance(&state);
    }
}
