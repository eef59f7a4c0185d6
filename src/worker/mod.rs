//! Worker loop
//!
//! Each worker owns its own `LocalStats` and blocks on a single inbound
//! channel from the coordinator. It never touches the input stream and never
//! talks to another worker; its only outbound communication is the aggregate
//! it returns when the loop ends, which is the worker's contribution to the
//! reduction stage.
//!
//! The loop distinguishes messages by variant, not by content: a `Record` is
//! folded, a `Terminate` ends the loop. A channel that disconnects before
//! `Terminate` arrives means the coordinator died mid-run, which is a
//! protocol violation and aborts this worker with an error instead of
//! silently under-counting.

use crossbeam::channel::Receiver;

use crate::pipeline::{Dispatch, PipelineError};
use crate::record::FieldLayout;
use crate::stats::LocalStats;
use crate::Result;

/// One member of the worker pool
pub struct Worker {
    /// Worker ID (owner index in the round-robin, never 0)
    id: usize,
    /// Shared field layout, cloned per worker so the loop stays lock-free
    layout: FieldLayout,
    /// Exclusively owned running aggregate
    stats: LocalStats,
}

impl Worker {
    /// Create a worker around a pre-shaped aggregate
    pub fn new(id: usize, layout: FieldLayout, stats: LocalStats) -> Self {
        Self { id, layout, stats }
    }

    /// Worker ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Receive and fold records until the termination signal arrives
    ///
    /// Returns this worker's aggregate on clean termination, or a
    /// `PipelineError::ChannelClosed` if the channel disconnects first.
    pub fn run(mut self, receiver: Receiver<Dispatch>) -> Result<LocalStats> {
        loop {
            match receiver.recv() {
                Ok(Dispatch::Record(line)) => {
                    self.stats.record_verdict(self.layout.evaluate(&line));
                }
                Ok(Dispatch::Terminate) => break,
                Err(_) => return Err(PipelineError::ChannelClosed { id: self.id }.into()),
            }
        }

        Ok(self.stats)
    }
}
