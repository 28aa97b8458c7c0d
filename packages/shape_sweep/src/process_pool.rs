use std::io::Write;
use std::num::NonZero;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::{Result, SweepError, WORKER_ENV_VAR, WorkerAssignment, WorkerReport};

const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Bounded pool of worker processes.
///
/// Each worker process is a fresh instance of `program` started with [`WORKER_ENV_VAR`] set, so
/// the program must hand control to [`serve()`][crate::serve] when it finds itself started that
/// way. Worker processes share no memory with the parent or with each other.
#[derive(Debug)]
pub struct ProcessPool {
    program: PathBuf,
    max_processes: NonZero<usize>,
}

impl ProcessPool {
    /// Creates a pool that runs at most `max_processes` instances of `program` at a time.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>, max_processes: NonZero<usize>) -> Self {
        Self {
            program: program.into(),
            max_processes,
        }
    }

    /// The executable started for every worker process.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// The maximum number of worker processes alive at the same time.
    #[must_use]
    pub fn max_processes(&self) -> NonZero<usize> {
        self.max_processes
    }

    /// Starts one worker process per assignment and waits for all of them to complete,
    /// returning the reports in submission order.
    ///
    /// When the pool is full, the next worker starts as soon as any running worker has exited.
    ///
    /// # Errors
    ///
    /// Fails on the first worker that cannot be started, exits without success or does not
    /// produce a valid report. A worker whose workload failed yields the error of that workload.
    /// Workers still running at that point are killed.
    pub fn execute_batch(
        &self,
        assignments: impl IntoIterator<Item = WorkerAssignment>,
    ) -> Result<Vec<WorkerReport>> {
        let mut running: Vec<(usize, RunningWorker)> =
            Vec::with_capacity(self.max_processes.get());
        let mut finished = Vec::new();

        for (index, assignment) in assignments.into_iter().enumerate() {
            if running.len() == self.max_processes.get() {
                let (exited_index, exited) = take_exited(&mut running);

                finished.push((exited_index, exited.finish()?));
            }

            running.push((index, self.spawn(&assignment)?));
        }

        for (index, worker) in running.drain(..) {
            finished.push((index, worker.finish()?));
        }

        finished.sort_unstable_by_key(|(index, _)| *index);

        Ok(finished.into_iter().map(|(_, report)| report).collect())
    }

    #[cfg_attr(test, mutants::skip)] // Process spawning is exercised by the integration tests.
    fn spawn(&self, assignment: &WorkerAssignment) -> Result<RunningWorker> {
        let payload = assignment.encode()?;

        let mut child = Command::new(&self.program)
            .env(WORKER_ENV_VAR, "1")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(SweepError::WorkerSpawn)?;

        debug!(
            pid = child.id(),
            repetitions = assignment.repetitions(),
            threads = assignment.threads().get(),
            "worker process started"
        );

        // From here on the worker is owned by the guard, so it is killed if we bail out.
        let mut stdin = child.stdin.take().expect("stdin was configured as piped");
        let worker = RunningWorker { child: Some(child) };

        stdin
            .write_all(payload.as_bytes())
            .map_err(SweepError::WorkerIo)?;

        // Closing stdin tells the worker that the assignment is complete.
        drop(stdin);

        Ok(worker)
    }
}

/// Removes and returns a worker that has exited, waiting until there is one.
///
/// `running` must not be empty.
fn take_exited(running: &mut Vec<(usize, RunningWorker)>) -> (usize, RunningWorker) {
    assert!(!running.is_empty(), "no worker to wait for");

    loop {
        if let Some(position) = running.iter_mut().position(|(_, worker)| worker.has_exited()) {
            return running.swap_remove(position);
        }

        thread::sleep(EXIT_POLL_INTERVAL);
    }
}

/// A worker process that has received its assignment and not yet been waited for.
struct RunningWorker {
    child: Option<Child>,
}

impl RunningWorker {
    /// Whether the worker can be waited for without blocking. A worker whose status cannot be
    /// queried counts as exited, so that [`finish()`][Self::finish] surfaces the error.
    fn has_exited(&mut self) -> bool {
        self.child
            .as_mut()
            .is_none_or(|child| !matches!(child.try_wait(), Ok(None)))
    }

    fn finish(mut self) -> Result<WorkerReport> {
        let child = self
            .child
            .take()
            .expect("child is only taken by finish(), which consumes the worker");

        let pid = child.id();
        let output = child.wait_with_output().map_err(SweepError::WorkerIo)?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        if !output.status.success() {
            // A worker whose workload failed describes the failure in its report.
            if let Ok(report) = WorkerReport::decode(&stdout) {
                report.into_result()?;
            }

            return Err(SweepError::WorkerFailed {
                status: output.status,
            });
        }

        let report = WorkerReport::decode(&stdout)?.into_result()?;

        debug!(
            pid,
            invocations = report.invocations(),
            "worker process completed"
        );

        Ok(report)
    }
}

impl Drop for RunningWorker {
    #[cfg_attr(test, mutants::skip)] // Only reached when a batch is abandoned half way.
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            warn!(pid = child.id(), "abandoning worker process");

            // The worker may already have exited, in which case there is nothing to kill.
            drop(child.kill());
            drop(child.wait());
        }
    }
}
