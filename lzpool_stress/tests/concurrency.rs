//! Contention coverage: pool exclusivity under concurrent checkout churn,
//! and the full many-worker round-trip stress scenario.

use std::thread;

use lzpool_core::BufferPool;
use lzpool_stress::{fixtures, run, StressConfig};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Every freshly acquired buffer must be empty, and must hold only its
/// owner's writes until release — across many workers churning ~20-byte
/// payloads through a small shared pool.
#[test]
fn pool_buffers_are_exclusive_under_contention() {
    init_logging();

    const WORKERS: usize = 8;
    const CYCLES: usize = 500;
    const STAMP_LEN: usize = 20;

    let pool = BufferPool::new(4);

    thread::scope(|scope| {
        for worker in 0..WORKERS {
            let pool = pool.clone();
            scope.spawn(move || {
                for cycle in 0..CYCLES {
                    let mut buf = pool.acquire();
                    assert!(
                        buf.is_empty(),
                        "worker {worker} cycle {cycle}: acquired buffer held {} stale bytes",
                        buf.len()
                    );

                    let stamp: Vec<u8> = (0..STAMP_LEN)
                        .map(|i| (worker * 31 + cycle + i) as u8)
                        .collect();
                    buf.extend_from_slice(&stamp);
                    // Another worker clobbering this buffer would show here.
                    assert_eq!(
                        &buf[..],
                        &stamp[..],
                        "worker {worker} cycle {cycle}: buffer content changed under us"
                    );
                } // release on drop
            });
        }
    });
}

/// The original reproduction shape: 500 concurrent workers, each round
/// tripping 6 structured fixture payloads, 3000 round trips total, zero
/// deviations.
#[test]
fn five_hundred_workers_six_fixtures() {
    init_logging();

    let payloads = fixtures::fixture_payloads();
    let config = StressConfig {
        workers: 500,
        rounds: 1,
        max_idle_buffers: 64,
    };

    let report = run(&config, &payloads).expect("stress run must not deviate");
    assert_eq!(report.round_trips, 3000);
    let expected_raw: u64 = payloads.iter().map(|p| p.len() as u64).sum::<u64>() * 500;
    assert_eq!(report.raw_bytes, expected_raw);
}

/// Sustained churn: fewer workers, many rounds, so buffers are reused
/// thousands of times across owners.
#[test]
fn sustained_rounds_reuse_pooled_buffers() {
    init_logging();

    let payloads = fixtures::fixture_payloads();
    let config = StressConfig {
        workers: 4,
        rounds: 250,
        max_idle_buffers: 8,
    };

    let report = run(&config, &payloads).expect("stress run must not deviate");
    assert_eq!(report.round_trips, 4 * 250 * payloads.len());
    assert!(report.compressed_bytes > 0);
}
