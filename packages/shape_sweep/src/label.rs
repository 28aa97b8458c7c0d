use std::fmt;

/// Identifies one measured configuration of the sweep by its process and thread counts.
///
/// A count of zero means the dimension does not apply: `(0, 0)` is sequential execution and
/// `(0, t)` is a thread pool in the current process.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ConfigLabel {
    processes: usize,
    threads: usize,
}

impl ConfigLabel {
    /// Label of the sequential strategy.
    #[must_use]
    pub const fn sequential() -> Self {
        Self {
            processes: 0,
            threads: 0,
        }
    }

    /// Label of the thread pool strategy with `threads` workers.
    #[must_use]
    pub const fn threads(threads: usize) -> Self {
        Self {
            processes: 0,
            threads,
        }
    }

    /// Label of the process pool strategy with `processes` workers of `threads` threads each.
    #[must_use]
    pub const fn processes_and_threads(processes: usize, threads: usize) -> Self {
        Self { processes, threads }
    }

    /// Number of worker processes, or zero if the configuration runs in the current process.
    #[must_use]
    pub fn process_count(&self) -> usize {
        self.processes
    }

    /// Number of threads per process, or zero for sequential execution.
    #[must_use]
    pub fn thread_count(&self) -> usize {
        self.threads
    }
}

impl fmt::Display for ConfigLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.processes, self.threads) {
            (0, 0) => write!(f, "sequential execution"),
            (0, threads) => write!(f, "{threads} threads"),
            (processes, threads) => write!(f, "{processes} processes and {threads} threads"),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(ConfigLabel::sequential().to_string(), "sequential execution");
        assert_eq!(ConfigLabel::threads(4).to_string(), "4 threads");
        assert_eq!(
            ConfigLabel::processes_and_threads(2, 1).to_string(),
            "2 processes and 1 threads"
        );
    }

    #[test]
    fn ordered_by_processes_then_threads() {
        let mut labels = vec![
            ConfigLabel::processes_and_threads(2, 3),
            ConfigLabel::threads(5),
            ConfigLabel::processes_and_threads(2, 1),
            ConfigLabel::sequential(),
            ConfigLabel::threads(2),
        ];

        labels.sort();

        assert_eq!(
            labels,
            vec![
                ConfigLabel::sequential(),
                ConfigLabel::threads(2),
                ConfigLabel::threads(5),
                ConfigLabel::processes_and_threads(2, 1),
                ConfigLabel::processes_and_threads(2, 3),
            ]
        );
    }

    #[test]
    fn counts() {
        let label = ConfigLabel::processes_and_threads(3, 7);

        assert_eq!(label.process_count(), 3);
        assert_eq!(label.thread_count(), 7);
    }
}
