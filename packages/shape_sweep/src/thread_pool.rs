use std::any::type_name;
use std::fmt;
use std::num::NonZero;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, mpsc};
use std::thread::{self, JoinHandle};

use tracing::{debug, trace};

/// Bounded pool of worker threads that execute submitted tasks.
///
/// At most [`thread_count()`][Self::thread_count] tasks are in flight at any time. Submitting a
/// task never blocks - tasks wait in a queue until a worker thread becomes free.
///
/// # Examples
///
/// ```
/// use new_zealand::nz;
/// use shape_sweep::ThreadPool;
///
/// let pool = ThreadPool::new(nz!(2));
///
/// let squares = pool.execute_batch((1..=4_u32).map(|x| move || x * x));
///
/// assert_eq!(squares, vec![1, 4, 9, 16]);
/// ```
///
/// # Lifecycle
///
/// Dropping the pool will wait for all threads to finish executing their tasks.
#[derive(Debug)]
pub struct ThreadPool {
    command_tx: mpsc::Sender<Command>,
    join_handles: Vec<JoinHandle<()>>,
    thread_count: NonZero<usize>,
}

impl ThreadPool {
    /// Creates a thread pool with `thread_count` worker threads.
    #[must_use]
    pub fn new(thread_count: NonZero<usize>) -> Self {
        let (command_tx, command_rx) = mpsc::channel();

        // All workers pull from the same queue, so whichever worker is free takes the next task.
        let command_rx = Arc::new(Mutex::new(command_rx));

        let join_handles = (0..thread_count.get())
            .map(|worker_index| {
                let command_rx = Arc::clone(&command_rx);

                thread::Builder::new()
                    .name(format!("shape-sweep-w{worker_index}"))
                    .spawn(move || {
                        debug!(worker_index, "worker thread started");
                        worker_entrypoint(&command_rx);
                        debug!(worker_index, "worker thread exiting");
                    })
                    .expect(
                        "failed to spawn worker thread: thread spawning failure is not supported",
                    )
            })
            .collect();

        Self {
            command_tx,
            join_handles,
            thread_count,
        }
    }

    /// Returns the number of threads in the pool.
    #[must_use]
    pub fn thread_count(&self) -> NonZero<usize> {
        self.thread_count
    }

    /// Enqueues a task for execution, returning a handle that can be used to wait for its result.
    pub fn submit<F, R>(&self, task: F) -> TaskHandle<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let (result_tx, result_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Execute(Box::new(move || {
                let result = panic::catch_unwind(AssertUnwindSafe(task));

                // If the handle has been dropped, nobody is interested in the result.
                drop(result_tx.send(result));
            })))
            .expect("worker threads must still exist - they only exit when the pool is dropped");

        TaskHandle { result_rx }
    }

    /// Submits every task and then waits for all of them to complete, returning the results in
    /// submission order.
    ///
    /// # Panics
    ///
    /// If any task panicked, the panic is re-thrown once that task's result is reached.
    pub fn execute_batch<I, F, R>(&self, tasks: I) -> Vec<R>
    where
        I: IntoIterator<Item = F>,
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let handles = tasks
            .into_iter()
            .map(|task| self.submit(task))
            .collect::<Vec<_>>();

        trace!(tasks = handles.len(), "batch submitted");

        handles.into_iter().map(TaskHandle::join).collect()
    }
}

impl Drop for ThreadPool {
    #[cfg_attr(test, mutants::skip)] // Impractical to test that stuff stops happening.
    fn drop(&mut self) {
        if thread::panicking() {
            // If the thread is panicking, we are probably in a dirty state and shutting down
            // may make the problem worse by hiding the original panic, so just do nothing.
            return;
        }

        for _ in &self.join_handles {
            self.command_tx
                .send(Command::Shutdown)
                .expect("worker threads must still exist - they only exit on shutdown");
        }

        for handle in self.join_handles.drain(..) {
            if let Err(payload) = handle.join() {
                // Tasks run inside a panic trap, so a panicking worker means the pool itself
                // is broken. Do not let that pass silently.
                panic::resume_unwind(payload);
            }
        }
    }
}

/// Handle to a task submitted to a [`ThreadPool`].
pub struct TaskHandle<R> {
    result_rx: oneshot::Receiver<thread::Result<R>>,
}

impl<R> TaskHandle<R> {
    /// Blocks until the task has completed and returns its result.
    ///
    /// # Panics
    ///
    /// Re-throws the panic if the task panicked.
    pub fn join(self) -> R {
        match self.result_rx.recv() {
            Ok(Ok(value)) => value,
            Ok(Err(payload)) => panic::resume_unwind(payload),
            Err(_) => panic!("task was abandoned because its worker thread exited"),
        }
    }
}

impl<R> fmt::Debug for TaskHandle<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>()).finish_non_exhaustive()
    }
}

enum Command {
    Execute(Box<dyn FnOnce() + Send>),
    Shutdown,
}

#[cfg_attr(test, mutants::skip)] // Impractical to test that things do not happen when worker function is missing.
fn worker_entrypoint(command_rx: &Mutex<mpsc::Receiver<Command>>) {
    loop {
        let command = command_rx
            .lock()
            .expect("lock is never held while a task executes, so it cannot be poisoned")
            .recv();

        match command {
            Ok(Command::Execute(task)) => task(),
            Ok(Command::Shutdown) | Err(_) => break,
        }
    }
}
