use std::num::NonZero;

use new_zealand::nz;

const DEFAULT_REPETITIONS: u64 = 100;
const DEFAULT_MAX_PROCESSES: usize = 3;
const DEFAULT_MAX_THREADS: usize = 10;
const DEFAULT_PROBLEM_REPETITIONS: usize = 3;
const DEFAULT_WORKLOAD_ROUNDS: NonZero<u32> = nz!(1000);
const DEFAULT_INPUT_POOL_SIZE: NonZero<usize> = nz!(10);

/// Bounds of a [`Sweep`][crate::Sweep].
///
/// # Examples
///
/// ```
/// use new_zealand::nz;
/// use shape_sweep::SweepConfig;
///
/// let config = SweepConfig::builder()
///     .repetitions(20)
///     .max_threads(4)
///     .workload_rounds(nz!(10))
///     .build();
///
/// assert_eq!(config.repetitions(), 20);
/// assert_eq!(config.max_processes(), 3);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SweepConfig {
    repetitions: u64,
    max_processes: usize,
    max_threads: usize,
    problem_repetitions: usize,
    workload_rounds: NonZero<u32>,
    input_pool_size: NonZero<usize>,
}

impl SweepConfig {
    /// Creates a builder for configuring the sweep.
    #[must_use]
    pub fn builder() -> SweepConfigBuilder {
        SweepConfigBuilder::new()
    }

    /// Workload invocations executed by every measured configuration.
    #[must_use]
    pub fn repetitions(&self) -> u64 {
        self.repetitions
    }

    /// Upper bound of the process count sweep, which starts at 2.
    #[must_use]
    pub fn max_processes(&self) -> usize {
        self.max_processes
    }

    /// Upper bound of the thread count sweeps.
    #[must_use]
    pub fn max_threads(&self) -> usize {
        self.max_threads
    }

    /// How many times the whole sweep is repeated, each repetition being one trial.
    #[must_use]
    pub fn problem_repetitions(&self) -> usize {
        self.problem_repetitions
    }

    /// Rounds of shape operations in one workload invocation.
    #[must_use]
    pub fn workload_rounds(&self) -> NonZero<u32> {
        self.workload_rounds
    }

    /// Number of samples in a generated input pool.
    #[must_use]
    pub fn input_pool_size(&self) -> NonZero<usize> {
        self.input_pool_size
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for configuring a [`SweepConfig`].
#[derive(Debug)]
pub struct SweepConfigBuilder {
    config: SweepConfig,
}

impl SweepConfigBuilder {
    fn new() -> Self {
        Self {
            config: SweepConfig {
                repetitions: DEFAULT_REPETITIONS,
                max_processes: DEFAULT_MAX_PROCESSES,
                max_threads: DEFAULT_MAX_THREADS,
                problem_repetitions: DEFAULT_PROBLEM_REPETITIONS,
                workload_rounds: DEFAULT_WORKLOAD_ROUNDS,
                input_pool_size: DEFAULT_INPUT_POOL_SIZE,
            },
        }
    }

    /// Sets the workload invocations executed by every measured configuration.
    ///
    /// Default is 100.
    #[must_use]
    pub fn repetitions(mut self, repetitions: u64) -> Self {
        self.config.repetitions = repetitions;
        self
    }

    /// Sets the upper bound of the process count sweep. Values below 2 disable the
    /// process pool strategy.
    ///
    /// Default is 3.
    #[must_use]
    pub fn max_processes(mut self, max_processes: usize) -> Self {
        self.config.max_processes = max_processes;
        self
    }

    /// Sets the upper bound of the thread count sweeps.
    ///
    /// Default is 10.
    #[must_use]
    pub fn max_threads(mut self, max_threads: usize) -> Self {
        self.config.max_threads = max_threads;
        self
    }

    /// Sets how many trials the sweep consists of.
    ///
    /// Default is 3.
    #[must_use]
    pub fn problem_repetitions(mut self, problem_repetitions: usize) -> Self {
        self.config.problem_repetitions = problem_repetitions;
        self
    }

    /// Sets the rounds of shape operations in one workload invocation.
    ///
    /// Default is 1000.
    #[must_use]
    pub fn workload_rounds(mut self, workload_rounds: NonZero<u32>) -> Self {
        self.config.workload_rounds = workload_rounds;
        self
    }

    /// Sets the number of samples in a generated input pool.
    ///
    /// Default is 10.
    #[must_use]
    pub fn input_pool_size(mut self, input_pool_size: NonZero<usize>) -> Self {
        self.config.input_pool_size = input_pool_size;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> SweepConfig {
        self.config
    }
}
