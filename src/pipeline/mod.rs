//! Coordinator, dispatch and reduction
//!
//! The pipeline is a single batch: the coordinator owns the only handle to
//! the input stream, spawns the worker pool, round-robins raw record lines
//! over one FIFO channel per worker (keeping every `pool_size`-th record for
//! itself as owner 0), signals termination exactly once per worker at stream
//! exhaustion, then joins the pool and reduces every thread's `LocalStats`
//! into the final report.
//!
//! Invariants:
//!
//! - Each record is assigned to exactly one thread (`owner = seq % pool`).
//! - Per-channel FIFO delivery means no worker sees `Terminate` before a
//!   record sent to it earlier.
//! - The reduction starts only after every join has completed, so no
//!   aggregate is read while its owner is still running.

use anyhow::Context;
use crossbeam::channel::{bounded, Sender};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::config::Config;
use crate::stats::aggregator::StatsAggregator;
use crate::stats::histogram::{ScoreHistogram, SCORE_SCALE_MAX};
use crate::stats::LocalStats;
use crate::worker::Worker;
use crate::Result;

/// Message from the coordinator to one worker
///
/// A tagged variant rather than an in-band sentinel value, so no record
/// content can ever collide with the termination signal.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// One raw record line
    Record(String),
    /// No further records will be sent
    Terminate,
}

/// Unrecoverable pipeline faults
///
/// Per-record problems (short lines, bad numbers) are recovered locally and
/// never show up here; these variants are protocol violations that abort the
/// run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A channel endpoint disappeared before the termination signal
    #[error("worker {id} channel closed before the termination signal")]
    ChannelClosed { id: usize },
    /// A worker thread panicked instead of returning its aggregate
    #[error("worker {id} panicked")]
    WorkerPanicked { id: usize },
}

/// Final result of one run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Global aggregate across the whole pool
    pub stats: LocalStats,
    /// Wall-clock time for the run
    pub elapsed: Duration,
    /// Pool size used (coordinator included)
    pub pool_size: usize,
}

/// Execute the full pipeline against the configured input file
///
/// Failure to open the input is fatal and happens before any worker thread
/// is spawned, so a bad path never leaves threads blocked on channels.
pub fn run(config: &Config) -> Result<RunReport> {
    let start = Instant::now();

    let file = File::open(&config.input.path)
        .with_context(|| format!("Failed to open input file: {}", config.input.path.display()))?;

    run_from_reader(config, BufReader::new(file), start)
}

fn run_from_reader<R: BufRead>(config: &Config, reader: R, start: Instant) -> Result<RunReport> {
    let pool_size = config.pool.size;
    let fresh_stats = || {
        LocalStats::with_histogram(ScoreHistogram::new(
            config.output.histogram_buckets,
            SCORE_SCALE_MAX,
        ))
    };

    // Fixed pool, established before the first record is read
    let num_workers = pool_size.saturating_sub(1);
    let mut senders: Vec<Sender<Dispatch>> = Vec::with_capacity(num_workers);
    let mut handles: Vec<JoinHandle<Result<LocalStats>>> = Vec::with_capacity(num_workers);
    for id in 1..pool_size {
        let (tx, rx) = bounded(config.pool.channel_capacity);
        let worker = Worker::new(id, config.layout.clone(), fresh_stats());
        let handle = std::thread::Builder::new()
            .name(format!("worker-{}", id))
            .spawn(move || worker.run(rx))
            .context("Failed to spawn worker thread")?;
        senders.push(tx);
        handles.push(handle);
    }

    let mut local = fresh_stats();
    let dispatch_result = dispatch(config, reader, &senders, &mut local);

    // Exactly one termination signal per worker. This also runs when the
    // dispatch loop failed mid-stream, so workers never hang on a channel
    // that will not fill again.
    for tx in &senders {
        let _ = tx.send(Dispatch::Terminate);
    }
    drop(senders);

    // Reduction barrier: every worker must have observed termination before
    // its aggregate is read
    let mut aggregator = StatsAggregator::new();
    aggregator.add_thread(0, local);
    for (idx, handle) in handles.into_iter().enumerate() {
        let id = idx + 1;
        let stats = handle
            .join()
            .map_err(|_| PipelineError::WorkerPanicked { id })??;
        aggregator.add_thread(id, stats);
    }

    dispatch_result?;

    let stats = aggregator.aggregate().clone();
    if config.runtime.debug {
        eprintln!(
            "DEBUG: reduced {} thread aggregates ({} records seen, {} qualifying)",
            aggregator.num_threads(),
            stats.seen(),
            stats.qualifying()
        );
    }

    Ok(RunReport {
        stats,
        elapsed: start.elapsed(),
        pool_size,
    })
}

/// Read the stream and assign every record to exactly one owner
fn dispatch<R: BufRead>(
    config: &Config,
    reader: R,
    senders: &[Sender<Dispatch>],
    local: &mut LocalStats,
) -> Result<()> {
    let pool_size = senders.len() + 1;
    let mut lines = reader.lines();

    if config.input.has_header {
        if let Some(header) = lines.next() {
            header.context("Failed to read header line")?;
        }
    }

    let mut seq: u64 = 0;
    for line in lines {
        let line = line.context("Failed to read input record")?;
        seq += 1;

        // Deterministic round-robin; owner 0 is the coordinator itself
        let owner = (seq % pool_size as u64) as usize;
        if owner == 0 {
            local.record_verdict(config.layout.evaluate(&line));
        } else {
            senders[owner - 1]
                .send(Dispatch::Record(line))
                .map_err(|_| PipelineError::ChannelClosed { id: owner })?;
        }
    }

    if config.runtime.debug {
        eprintln!(
            "DEBUG: dispatched {} records across {} thread(s)",
            seq, pool_size
        );
    }

    Ok(())
}
