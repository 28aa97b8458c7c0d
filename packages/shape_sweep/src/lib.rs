#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Compares how long a CPU-bound workload takes when executed sequentially, on a thread pool
//! and on a pool of worker processes that each run their own thread pool.
//!
//! The workload builds a trapezoid, a rectangle and a square from randomly drawn samples and
//! compares and combines them by area many times over (see [`run_workload()`]). It exists only
//! to give the benchmark a nontrivial unit of work.
//!
//! The core functionality includes:
//! - [`run_sequential()`], [`run_thread_pool()`] and [`run_process_pool()`] - the three
//!   execution strategies, each returning a [`Measurement`]
//! - [`ThreadPool`] and [`ProcessPool`] - bounded executors with submit-batch-and-join semantics
//! - [`Sweep`] - runs every strategy over a range of process and thread counts, repeatedly,
//!   and reports the fastest configuration of each [`Trial`]
//!
//! This package is not meant for use in production, serving only as a tool for comparing
//! concurrency strategies.
//!
//! # Worker processes
//!
//! The process pool starts worker processes from an executable that must call [`serve()`]
//! when [`is_worker_process()`] is true. The `shape_sweep` binary does this on startup.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use new_zealand::nz;
//! use shape_sweep::{InputPool, Sample, run_sequential, run_thread_pool};
//!
//! let inputs = Arc::new(InputPool::new(vec![Sample::new([3, 4, 5])]).unwrap());
//!
//! let sequential = run_sequential(&inputs, 4, nz!(10)).unwrap();
//! let threaded = run_thread_pool(&inputs, 4, nz!(2), nz!(10)).unwrap();
//!
//! assert_eq!(sequential.invocations(), threaded.invocations());
//! println!("sequential: {:?}, threaded: {:?}", sequential.elapsed(), threaded.elapsed());
//! ```

mod config;
mod error;
mod input;
mod label;
mod process_pool;
mod strategy;
mod sweep;
mod thread_pool;
mod worker;
mod workload;

pub use config::*;
pub use error::*;
pub use input::*;
pub use label::*;
pub use process_pool::*;
pub use strategy::*;
pub use sweep::*;
pub use thread_pool::*;
pub use worker::*;
pub use workload::*;
