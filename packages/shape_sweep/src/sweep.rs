use std::collections::BTreeMap;
use std::io::{self, Write};
use std::num::NonZero;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::{
    ConfigLabel, InputPool, Measurement, Result, SweepConfig, SweepError, run_process_pool,
    run_sequential, run_thread_pool,
};

/// Timings of every configuration measured in one repetition of the sweep.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Trial {
    index: usize,
    timings: BTreeMap<ConfigLabel, Duration>,
}

impl Trial {
    /// Creates an empty trial for the outer repetition `index`.
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self {
            index,
            timings: BTreeMap::new(),
        }
    }

    /// Index of the outer repetition this trial belongs to.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Records the elapsed time of a configuration, replacing any earlier record for it.
    pub fn record(&mut self, label: ConfigLabel, elapsed: Duration) {
        self.timings.insert(label, elapsed);
    }

    /// Elapsed time of a configuration, if it was measured.
    #[must_use]
    pub fn get(&self, label: ConfigLabel) -> Option<Duration> {
        self.timings.get(&label).copied()
    }

    /// Number of measured configurations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.timings.len()
    }

    /// Whether no configuration was measured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timings.is_empty()
    }

    /// Every measured configuration with its elapsed time, ordered by label.
    pub fn iter(&self) -> impl Iterator<Item = (ConfigLabel, Duration)> {
        self.timings.iter().map(|(label, elapsed)| (*label, *elapsed))
    }

    /// The configuration with the smallest elapsed time. Ties go to the smallest label.
    #[must_use]
    pub fn fastest(&self) -> Option<(ConfigLabel, Duration)> {
        self.iter().min_by_key(|(_, elapsed)| *elapsed)
    }
}

/// Results of a whole sweep, one [`Trial`] per outer repetition.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SweepReport {
    trials: Vec<Trial>,
}

impl SweepReport {
    /// The trials in the order they were executed.
    #[must_use]
    pub fn trials(&self) -> &[Trial] {
        &self.trials
    }

    /// Writes one line per trial naming the fastest configuration and its elapsed time.
    ///
    /// # Errors
    ///
    /// Returns any error from writing to `out`.
    pub fn write_summary(&self, out: &mut impl Write) -> io::Result<()> {
        for trial in &self.trials {
            if let Some((label, elapsed)) = trial.fastest() {
                writeln!(
                    out,
                    "fastest in trial {}: {label} took {}",
                    trial.index(),
                    elapsed.as_secs_f64()
                )?;
            }
        }

        Ok(())
    }
}

/// Drives the benchmark: measures every configuration of every strategy, repeatedly.
///
/// Each trial measures, in order:
///
/// 1. the process pool strategy for every process count in `2..=max_processes` and every
///    thread count in `1..=max_threads`,
/// 2. the thread pool strategy for every thread count in `2..=max_threads`,
/// 3. the sequential strategy.
#[derive(Debug)]
pub struct Sweep {
    config: SweepConfig,
    inputs: Arc<InputPool>,
    worker_program: PathBuf,
}

impl Sweep {
    /// Creates a sweep that draws workload inputs from `inputs` and starts worker processes
    /// from `worker_program`.
    #[must_use]
    pub fn new(config: SweepConfig, inputs: InputPool, worker_program: impl Into<PathBuf>) -> Self {
        Self {
            config,
            inputs: Arc::new(inputs),
            worker_program: worker_program.into(),
        }
    }

    /// Runs every trial, writing a line per measurement and finally the per-trial summary to
    /// `out`.
    ///
    /// # Errors
    ///
    /// The first failed measurement aborts the sweep. Failing to write to `out` does too.
    pub fn run(&self, out: &mut impl Write) -> Result<SweepReport> {
        let mut report = SweepReport::default();

        for index in 0..self.config.problem_repetitions() {
            info!(trial = index, "starting trial");

            report.trials.push(self.run_trial(index, out)?);
        }

        report.write_summary(out).map_err(SweepError::Output)?;

        Ok(report)
    }

    fn run_trial(&self, index: usize, out: &mut impl Write) -> Result<Trial> {
        let mut trial = Trial::new(index);

        let repetitions = self.config.repetitions();
        let rounds = self.config.workload_rounds();

        for processes in 2..=self.config.max_processes() {
            for threads in 1..=self.config.max_threads() {
                let measurement = run_process_pool(
                    &self.worker_program,
                    &self.inputs,
                    repetitions,
                    non_zero(processes),
                    non_zero(threads),
                    rounds,
                )?;

                record(
                    &mut trial,
                    ConfigLabel::processes_and_threads(processes, threads),
                    measurement,
                    out,
                )?;
            }
        }

        for threads in 2..=self.config.max_threads() {
            let measurement =
                run_thread_pool(&self.inputs, repetitions, non_zero(threads), rounds)?;

            record(&mut trial, ConfigLabel::threads(threads), measurement, out)?;
        }

        let measurement = run_sequential(&self.inputs, repetitions, rounds)?;
        record(&mut trial, ConfigLabel::sequential(), measurement, out)?;

        Ok(trial)
    }
}

fn record(
    trial: &mut Trial,
    label: ConfigLabel,
    measurement: Measurement,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(
        out,
        "took with {label}: {}",
        measurement.elapsed().as_secs_f64()
    )
    .map_err(SweepError::Output)?;

    trial.record(label, measurement.elapsed());

    Ok(())
}

fn non_zero(count: usize) -> NonZero<usize> {
    NonZero::new(count).expect("sweep ranges start above zero")
}
