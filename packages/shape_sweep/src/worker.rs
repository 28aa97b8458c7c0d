//! Worker process side of the process pool, plus the messages exchanged with it.
//!
//! The parent writes one TOML-encoded [`WorkerAssignment`] to the worker's stdin and closes it.
//! The worker runs the assignment and writes one TOML-encoded [`WorkerReport`] to its stdout.

use std::env;
use std::io::{Read, Write};
use std::num::NonZero;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shapes::ShapeError;
use tracing::debug;

use crate::{InputPool, Result, Sample, SweepError, run_sequential, run_thread_pool};

/// Environment variable that switches the executable into worker mode when set to `1`.
pub const WORKER_ENV_VAR: &str = "SHAPE_SWEEP_WORKER";

/// Whether the current process was started as a worker by a [`ProcessPool`][crate::ProcessPool].
#[must_use]
pub fn is_worker_process() -> bool {
    env::var_os(WORKER_ENV_VAR).is_some_and(|value| value == "1")
}

/// The share of a process pool batch that one worker process executes.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct WorkerAssignment {
    repetitions: u64,
    threads: NonZero<usize>,
    rounds: NonZero<u32>,
    samples: Vec<Sample>,
}

impl WorkerAssignment {
    /// Creates an assignment to run `repetitions` workload invocations of `rounds` rounds each,
    /// drawing inputs from `inputs`.
    ///
    /// With a single thread the worker runs the invocations sequentially, otherwise on a
    /// thread pool of `threads` workers.
    #[must_use]
    pub fn new(
        repetitions: u64,
        threads: NonZero<usize>,
        rounds: NonZero<u32>,
        inputs: &InputPool,
    ) -> Self {
        Self {
            repetitions,
            threads,
            rounds,
            samples: inputs.samples().copied().collect(),
        }
    }

    /// How many workload invocations the worker is to execute.
    #[must_use]
    pub fn repetitions(&self) -> u64 {
        self.repetitions
    }

    /// How many threads the worker is to execute the invocations on.
    #[must_use]
    pub fn threads(&self) -> NonZero<usize> {
        self.threads
    }

    pub(crate) fn encode(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    pub(crate) fn decode(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

/// What a worker process reports back after completing its assignment.
///
/// A worker whose workload failed still writes a report, describing the failure, before it
/// exits without success. The parent turns that into the same error the other strategies return.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct WorkerReport {
    invocations: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    failure: Option<TaskFailure>,
}

impl WorkerReport {
    fn completed(invocations: u64) -> Self {
        Self {
            invocations,
            failure: None,
        }
    }

    fn failed(error: &ShapeError) -> Self {
        Self {
            invocations: 0,
            failure: Some(TaskFailure::from(error)),
        }
    }

    /// How many workload invocations the worker executed.
    #[must_use]
    pub fn invocations(&self) -> u64 {
        self.invocations
    }

    /// Converts a report of a failed workload into the error that failed it.
    pub(crate) fn into_result(self) -> Result<Self> {
        match self.failure {
            Some(failure) => Err(failure.into()),
            None => Ok(self),
        }
    }

    pub(crate) fn encode(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    pub(crate) fn decode(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

/// A workload failure as it travels from a worker process to the parent.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
struct TaskFailure {
    kind: TaskFailureKind,
    message: String,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
enum TaskFailureKind {
    ZeroArea,
    Other,
}

impl From<&ShapeError> for TaskFailure {
    fn from(error: &ShapeError) -> Self {
        let kind = match error {
            ShapeError::ZeroArea => TaskFailureKind::ZeroArea,
            _ => TaskFailureKind::Other,
        };

        Self {
            kind,
            message: error.to_string(),
        }
    }
}

impl From<TaskFailure> for SweepError {
    fn from(failure: TaskFailure) -> Self {
        match failure.kind {
            TaskFailureKind::ZeroArea => Self::Shape(ShapeError::ZeroArea),
            TaskFailureKind::Other => Self::WorkerTask {
                message: failure.message,
            },
        }
    }
}

/// Executes the assignment read from `input` and writes the report to `output`.
///
/// This is the body of a worker process, with stdin and stdout as the two streams.
///
/// # Errors
///
/// Fails if the assignment cannot be read or decoded, if it contains no samples, if a workload
/// invocation fails or if the report cannot be written. A failed workload invocation is also
/// described in the report written to `output`.
pub fn serve(mut input: impl Read, mut output: impl Write) -> Result<()> {
    let mut text = String::new();
    input
        .read_to_string(&mut text)
        .map_err(SweepError::WorkerIo)?;

    let assignment = WorkerAssignment::decode(&text)?;

    debug!(
        repetitions = assignment.repetitions,
        threads = assignment.threads.get(),
        "worker received assignment"
    );

    let (report, outcome) = match execute(assignment) {
        Ok(invocations) => (WorkerReport::completed(invocations), Ok(())),
        Err(SweepError::Shape(error)) => (WorkerReport::failed(&error), Err(error.into())),
        Err(error) => return Err(error),
    };

    output
        .write_all(report.encode()?.as_bytes())
        .and_then(|()| output.flush())
        .map_err(SweepError::WorkerIo)?;

    outcome
}

fn execute(assignment: WorkerAssignment) -> Result<u64> {
    let inputs = InputPool::new(assignment.samples)?;

    let measurement = if assignment.threads.get() == 1 {
        run_sequential(&inputs, assignment.repetitions, assignment.rounds)?
    } else {
        run_thread_pool(
            &Arc::new(inputs),
            assignment.repetitions,
            assignment.threads,
            assignment.rounds,
        )?
    };

    debug!(
        elapsed = ?measurement.elapsed(),
        invocations = measurement.invocations(),
        "worker completed assignment"
    );

    Ok(measurement.invocations())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::io::Cursor;

    use new_zealand::nz;
    use shapes::ShapeKind;

    use super::*;

    fn pool(samples: &[[u32; 3]]) -> InputPool {
        InputPool::new(samples.iter().copied().map(Sample::new).collect()).unwrap()
    }

    fn serve_to_report(assignment: &WorkerAssignment) -> WorkerReport {
        let mut output = Vec::new();
        serve(Cursor::new(assignment.encode().unwrap()), &mut output).unwrap();

        WorkerReport::decode(&String::from_utf8(output).unwrap()).unwrap()
    }

    #[test]
    fn assignment_survives_encoding() {
        let assignment = WorkerAssignment::new(7, nz!(3), nz!(11), &pool(&[[1, 2, 3], [4, 5, 6]]));

        let decoded = WorkerAssignment::decode(&assignment.encode().unwrap()).unwrap();

        assert_eq!(decoded, assignment);
        assert_eq!(decoded.repetitions(), 7);
        assert_eq!(decoded.threads().get(), 3);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(
            WorkerReport::decode("this is not = = toml"),
            Err(SweepError::Decode(_))
        ));
    }

    #[test]
    fn sequential_assignment_reports_invocations() {
        let assignment = WorkerAssignment::new(3, nz!(1), nz!(2), &pool(&[[3, 4, 5]]));

        assert_eq!(serve_to_report(&assignment).invocations(), 3);
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn threaded_assignment_reports_invocations() {
        let assignment = WorkerAssignment::new(5, nz!(2), nz!(2), &pool(&[[3, 4, 5], [9, 1, 2]]));

        assert_eq!(serve_to_report(&assignment).invocations(), 5);
    }

    #[test]
    fn workload_failure_is_propagated() {
        let assignment = WorkerAssignment::new(2, nz!(1), nz!(1), &pool(&[[0, 0, 0]]));
        let mut output = Vec::new();

        let result = serve(Cursor::new(assignment.encode().unwrap()), &mut output);

        assert!(matches!(
            result,
            Err(SweepError::Shape(ShapeError::ZeroArea))
        ));

        let report = WorkerReport::decode(&String::from_utf8(output).unwrap()).unwrap();
        assert!(matches!(
            report.into_result(),
            Err(SweepError::Shape(ShapeError::ZeroArea))
        ));
    }

    #[test]
    fn completed_report_has_no_failure() {
        let report = WorkerReport::completed(4);

        let decoded = WorkerReport::decode(&report.encode().unwrap()).unwrap();

        assert_eq!(decoded.into_result().unwrap().invocations(), 4);
    }

    #[test]
    fn other_shape_failures_keep_their_message() {
        let error = ShapeError::WrongArity {
            kind: ShapeKind::Square,
            expected: 1,
            received: 2,
        };
        let report = WorkerReport::failed(&error);

        let decoded = WorkerReport::decode(&report.encode().unwrap()).unwrap();

        match decoded.into_result() {
            Err(SweepError::WorkerTask { message }) => assert_eq!(message, error.to_string()),
            other => panic!("expected a worker task failure, got {other:?}"),
        }
    }

    #[test]
    fn empty_sample_list_is_rejected() {
        let text = "repetitions = 1\nthreads = 1\nrounds = 1\nsamples = []\n";

        assert!(matches!(
            serve(Cursor::new(text), Vec::new()),
            Err(SweepError::EmptyInputPool)
        ));
    }
}
