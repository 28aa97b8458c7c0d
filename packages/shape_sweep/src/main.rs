#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))]

//! Binary entry point: runs the sweep, or serves as a worker process for it.
//!
//! This module is excluded from mutation testing because testing process entry/exit behavior
//! is impractical - it requires spawning subprocesses and checking exit codes.

use std::env;
use std::io;
use std::num::NonZero;
use std::process::ExitCode;

use new_zealand::nz;
use shape_sweep::{InputPool, Sweep, SweepConfig, SweepError, is_worker_process, serve};
use tracing_subscriber::EnvFilter;

const N_REPETITIONS: u64 = 100;
const N_PROCESSES: usize = 3;
const N_THREADS: usize = 10;
const PROBLEM_REPETITIONS: usize = 3;
const WORKLOAD_ROUNDS: NonZero<u32> = nz!(1000);
const INPUT_POOL_SIZE: NonZero<usize> = nz!(10);

// Binary entry point - mutations would require subprocess testing which is impractical.
#[cfg_attr(test, mutants::skip)]
fn main() -> ExitCode {
    init_logging();

    let result = if is_worker_process() {
        serve(io::stdin().lock(), io::stdout().lock())
    } else {
        run_sweep()
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg_attr(test, mutants::skip)]
fn run_sweep() -> Result<(), SweepError> {
    let config = SweepConfig::builder()
        .repetitions(N_REPETITIONS)
        .max_processes(N_PROCESSES)
        .max_threads(N_THREADS)
        .problem_repetitions(PROBLEM_REPETITIONS)
        .workload_rounds(WORKLOAD_ROUNDS)
        .input_pool_size(INPUT_POOL_SIZE)
        .build();

    let inputs = InputPool::generate(config.input_pool_size(), &mut rand::rng());

    // Worker processes are further instances of this same executable.
    let program = env::current_exe().map_err(SweepError::WorkerSpawn)?;

    Sweep::new(config, inputs, program).run(&mut io::stdout().lock())?;

    Ok(())
}

/// Logs go to stderr, filtered by `RUST_LOG` (warnings only by default). Stdout carries the
/// report, or the protocol messages when running as a worker.
#[cfg_attr(test, mutants::skip)]
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
