use std::io;
use std::process::ExitStatus;

use shapes::ShapeError;
use thiserror::Error;

/// Errors that abort a benchmark configuration and, through it, the whole sweep.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SweepError {
    /// A workload invocation failed because a shape operation failed.
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// An input pool was created without any samples to draw from.
    #[error("the input pool must contain at least one sample")]
    EmptyInputPool,

    /// A worker process could not be started.
    #[error("failed to start worker process: {0}")]
    WorkerSpawn(#[source] io::Error),

    /// Sending an assignment to a worker process or collecting its report failed.
    #[error("failed to communicate with worker process: {0}")]
    WorkerIo(#[source] io::Error),

    /// A worker process exited without success.
    #[error("worker process failed: {status}")]
    WorkerFailed {
        /// The exit status reported by the operating system.
        status: ExitStatus,
    },

    /// A workload invocation failed inside a worker process, for a reason that has no
    /// [`ShapeError`] counterpart on this side of the process boundary.
    #[error("workload failed in worker process: {message}")]
    WorkerTask {
        /// The error message reported by the worker process.
        message: String,
    },

    /// A worker protocol message could not be encoded.
    #[error("failed to encode worker message: {0}")]
    Encode(#[from] toml::ser::Error),

    /// A worker protocol message could not be decoded.
    #[error("failed to decode worker message: {0}")]
    Decode(#[from] toml::de::Error),

    /// The sweep report could not be written to its output.
    #[error("failed to write report: {0}")]
    Output(#[source] io::Error),
}

/// A specialized `Result` type for sweep operations, returning the crate's
/// [`SweepError`] type as the error value.
pub type Result<T> = std::result::Result<T, SweepError>;
