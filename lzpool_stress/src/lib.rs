//! Concurrency harness: many workers hammering encode → decode round trips
//! through a shared buffer pool.
//!
//! This is the component that makes buffer-lifetime and format bugs
//! observable: a decoder writing past its declared length, or a pool
//! handing one buffer to two owners, shows up as a byte-level deviation in
//! some worker's round trip. Any deviation or unexpected decode error is a
//! hard failure — never retried, never suppressed.

use std::thread;

use anyhow::Context;

use lzpool_core::{decode, decoded_len, encode, BufferPool};

pub mod fixtures;

/// Shape of a stress run.
pub struct StressConfig {
    /// Number of concurrent workers.
    pub workers: usize,
    /// Passes each worker makes over the payload set.
    pub rounds: usize,
    /// Free-list capacity of the shared buffer pool.
    pub max_idle_buffers: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            workers: 8,
            rounds: 100,
            max_idle_buffers: 64,
        }
    }
}

/// Aggregate totals across all workers of a completed run.
#[derive(Debug, Default, Clone, Copy)]
pub struct StressReport {
    pub round_trips: usize,
    pub raw_bytes: u64,
    pub compressed_bytes: u64,
}

/// Run `workers` concurrent workers, each performing `rounds` passes over
/// the shared read-only `payloads`, every pass encoding each payload and
/// decoding it into a pool-acquired destination.
///
/// Returns after all workers have joined (the verification barrier). The
/// first round-trip deviation or decode error aborts the run with an error
/// naming the worker, round, and payload.
pub fn run(config: &StressConfig, payloads: &[Vec<u8>]) -> anyhow::Result<StressReport> {
    anyhow::ensure!(config.workers > 0, "stress run needs at least one worker");
    anyhow::ensure!(!payloads.is_empty(), "stress run needs at least one payload");

    let pool = BufferPool::new(config.max_idle_buffers);
    let rounds = config.rounds;
    let mut report = StressReport::default();

    thread::scope(|scope| -> anyhow::Result<()> {
        let handles: Vec<_> = (0..config.workers)
            .map(|worker| {
                let pool = pool.clone();
                scope.spawn(move || worker_loop(worker, rounds, payloads, &pool))
            })
            .collect();

        for handle in handles {
            let partial = handle
                .join()
                .map_err(|_| anyhow::anyhow!("stress worker panicked"))??;
            report.round_trips += partial.round_trips;
            report.raw_bytes += partial.raw_bytes;
            report.compressed_bytes += partial.compressed_bytes;
        }
        Ok(())
    })?;

    log::debug!(
        "stress run complete: {} round trips, {} raw bytes, {} compressed bytes",
        report.round_trips,
        report.raw_bytes,
        report.compressed_bytes
    );
    Ok(report)
}

fn worker_loop(
    worker: usize,
    rounds: usize,
    payloads: &[Vec<u8>],
    pool: &BufferPool,
) -> anyhow::Result<StressReport> {
    let mut report = StressReport::default();

    for round in 0..rounds {
        for (idx, payload) in payloads.iter().enumerate() {
            let block = encode(payload);
            let len = decoded_len(&block)
                .with_context(|| format!("worker {worker} round {round} payload {idx}"))?
                as usize;

            let mut dst = pool.acquire();
            dst.resize(len, 0);
            let written = decode(&block, &mut dst)
                .with_context(|| format!("worker {worker} round {round} payload {idx}"))?;

            anyhow::ensure!(
                written == payload.len() && dst[..written] == payload[..],
                "round-trip deviation: worker {worker} round {round} payload {idx} \
                 ({written} bytes recovered, {} expected)",
                payload.len()
            );

            report.round_trips += 1;
            report.raw_bytes += payload.len() as u64;
            report.compressed_bytes += block.len() as u64;
        }
    }

    log::trace!("worker {worker} finished {} round trips", report.round_trips);
    Ok(report)
}
