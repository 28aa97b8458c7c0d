//! The three execution strategies that the sweep compares.
//!
//! Every strategy executes a number of workload invocations, each with its own three samples
//! drawn from an [`InputPool`], and measures the wall-clock time this takes.

use std::iter;
use std::num::NonZero;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use num_integer::Integer;
use tracing::warn;

use crate::{
    InputPool, ProcessPool, Result, ThreadPool, WorkerAssignment, WorkerReport, run_workload,
};

/// Outcome of running one execution strategy.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Measurement {
    elapsed: Duration,
    invocations: u64,
}

impl Measurement {
    /// Wall-clock time the strategy took.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// How many workload invocations were actually executed.
    #[must_use]
    pub fn invocations(&self) -> u64 {
        self.invocations
    }
}

/// Executes `repetitions` workload invocations one after another on the current thread.
///
/// # Errors
///
/// Stops at the first failed invocation and returns its error.
pub fn run_sequential(
    inputs: &InputPool,
    repetitions: u64,
    rounds: NonZero<u32>,
) -> Result<Measurement> {
    let mut rng = rand::rng();

    let start = Instant::now();

    for _ in 0..repetitions {
        run_workload(&inputs.choose(&mut rng), rounds)?;
    }

    Ok(Measurement {
        elapsed: start.elapsed(),
        invocations: repetitions,
    })
}

/// Executes `repetitions` workload invocations as separate tasks on a new thread pool with
/// `threads` workers, waiting for all of them to complete.
///
/// Creating and shutting down the pool is part of the measurement.
///
/// # Errors
///
/// If any invocation fails, the first failure in submission order is returned once all
/// invocations have completed.
pub fn run_thread_pool(
    inputs: &Arc<InputPool>,
    repetitions: u64,
    threads: NonZero<usize>,
    rounds: NonZero<u32>,
) -> Result<Measurement> {
    let start = Instant::now();

    let pool = ThreadPool::new(threads);

    let results = pool.execute_batch((0..repetitions).map(|_| {
        let inputs = Arc::clone(inputs);
        move || run_workload(&inputs.choose(&mut rand::rng()), rounds)
    }));

    drop(pool);

    let elapsed = start.elapsed();

    let invocations = u64::try_from(results.len()).expect("one result per u64 repetition");

    results.into_iter().collect::<std::result::Result<(), _>>()?;

    Ok(Measurement {
        elapsed,
        invocations,
    })
}

/// Splits `repetitions` evenly between `processes` worker processes, returning the share of
/// each process and the number of repetitions that do not fit into an even split.
///
/// The remainder is not executed by anyone.
#[must_use]
pub fn partition_repetitions(repetitions: u64, processes: NonZero<usize>) -> (u64, u64) {
    let processes = u64::try_from(processes.get()).expect("process count always fits in u64");

    repetitions.div_rem(&processes)
}

/// Executes `repetitions` workload invocations split between `processes` worker processes,
/// each of which runs its share sequentially (with one thread) or on a pool of `threads`
/// threads. Waits for all worker processes to complete.
///
/// The share of each process is `repetitions / processes`; the remainder of the division is
/// dropped, which the returned invocation count reflects.
///
/// # Errors
///
/// Fails if any worker process fails, including when one of its invocations fails.
pub fn run_process_pool(
    program: &Path,
    inputs: &InputPool,
    repetitions: u64,
    processes: NonZero<usize>,
    threads: NonZero<usize>,
    rounds: NonZero<u32>,
) -> Result<Measurement> {
    let (per_process, dropped) = partition_repetitions(repetitions, processes);

    if dropped > 0 {
        warn!(
            repetitions,
            processes = processes.get(),
            dropped,
            "repetitions do not divide evenly between processes, dropping the remainder"
        );
    }

    let assignment = WorkerAssignment::new(per_process, threads, rounds, inputs);

    let start = Instant::now();

    let reports = ProcessPool::new(program, processes)
        .execute_batch(iter::repeat_n(assignment, processes.get()))?;

    let elapsed = start.elapsed();

    Ok(Measurement {
        elapsed,
        invocations: reports.iter().map(WorkerReport::invocations).sum(),
    })
}
