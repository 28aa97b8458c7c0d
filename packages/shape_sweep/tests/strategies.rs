//! End-to-end tests of the execution strategies and the sweep driver.
//!
//! The process pool tests start real worker processes from the `shape_sweep` binary. They are
//! ignored under Miri because Miri does not support spawning threads or processes.

use std::path::Path;
use std::sync::Arc;

use new_zealand::nz;
use shape_sweep::{
    ConfigLabel, InputPool, ProcessPool, Sample, Sweep, SweepConfig, SweepError, WorkerAssignment,
    WorkerReport, run_process_pool, run_sequential, run_thread_pool,
};
use shapes::ShapeError;

fn worker_program() -> &'static Path {
    Path::new(env!("CARGO_BIN_EXE_shape_sweep"))
}

fn fixed_inputs() -> InputPool {
    InputPool::new(vec![
        Sample::new([3, 4, 5]),
        Sample::new([10, 2, 7]),
        Sample::new([6, 6, 6]),
    ])
    .unwrap()
}

fn zero_inputs() -> InputPool {
    InputPool::new(vec![Sample::new([0, 0, 0])]).unwrap()
}

#[cfg_attr(miri, ignore)]
#[test]
fn thread_pool_behaves_like_sequential() {
    let inputs = Arc::new(fixed_inputs());

    let sequential = run_sequential(&inputs, 4, nz!(50)).unwrap();
    let threaded = run_thread_pool(&inputs, 4, nz!(2), nz!(50)).unwrap();

    assert_eq!(threaded.invocations(), 4);
    assert_eq!(threaded.invocations(), sequential.invocations());
}

#[cfg_attr(miri, ignore)]
#[test]
fn thread_pool_fails_like_sequential() {
    let inputs = Arc::new(zero_inputs());

    assert!(matches!(
        run_sequential(&inputs, 4, nz!(1)),
        Err(SweepError::Shape(ShapeError::ZeroArea))
    ));
    assert!(matches!(
        run_thread_pool(&inputs, 4, nz!(2), nz!(1)),
        Err(SweepError::Shape(ShapeError::ZeroArea))
    ));
}

#[cfg_attr(miri, ignore)]
#[test]
fn process_pool_drops_remainder_repetitions() {
    // 5 repetitions over 2 processes is 2 per process. The fifth repetition is never executed.
    for threads in [nz!(1), nz!(2)] {
        let measurement = run_process_pool(
            worker_program(),
            &fixed_inputs(),
            5,
            nz!(2),
            threads,
            nz!(10),
        )
        .unwrap();

        assert_eq!(measurement.invocations(), 4, "with {threads} threads");
    }
}

#[cfg_attr(miri, ignore)]
#[test]
fn process_pool_with_even_split_executes_everything() {
    let measurement =
        run_process_pool(worker_program(), &fixed_inputs(), 6, nz!(3), nz!(2), nz!(10)).unwrap();

    assert_eq!(measurement.invocations(), 6);
}

#[cfg_attr(miri, ignore)]
#[test]
fn process_pool_fails_like_sequential() {
    let inputs = zero_inputs();

    assert!(matches!(
        run_sequential(&inputs, 4, nz!(1)),
        Err(SweepError::Shape(ShapeError::ZeroArea))
    ));

    for threads in [nz!(1), nz!(2)] {
        let result = run_process_pool(worker_program(), &inputs, 4, nz!(2), threads, nz!(1));

        assert!(
            matches!(result, Err(SweepError::Shape(ShapeError::ZeroArea))),
            "with {threads} threads: {result:?}"
        );
    }
}

#[cfg_attr(miri, ignore)]
#[test]
fn single_slot_process_pool_runs_assignments_in_turn() {
    let pool = ProcessPool::new(worker_program(), nz!(1));
    let inputs = fixed_inputs();

    let assignments = [3, 1, 2].map(|repetitions| {
        WorkerAssignment::new(repetitions, nz!(1), nz!(5), &inputs)
    });

    let reports = pool.execute_batch(assignments).unwrap();

    assert_eq!(
        reports
            .iter()
            .map(WorkerReport::invocations)
            .collect::<Vec<_>>(),
        vec![3, 1, 2]
    );
}

#[cfg_attr(miri, ignore)]
#[test]
fn process_pool_with_fewer_slots_than_assignments_keeps_submission_order() {
    let pool = ProcessPool::new(worker_program(), nz!(2));
    let inputs = fixed_inputs();

    let assignments = [40, 1, 20, 2, 3].map(|repetitions| {
        WorkerAssignment::new(repetitions, nz!(2), nz!(5), &inputs)
    });

    let reports = pool.execute_batch(assignments).unwrap();

    assert_eq!(
        reports
            .iter()
            .map(WorkerReport::invocations)
            .collect::<Vec<_>>(),
        vec![40, 1, 20, 2, 3]
    );
}

#[cfg_attr(miri, ignore)]
#[test]
fn sweep_measures_every_configuration() {
    let config = SweepConfig::builder()
        .repetitions(4)
        .max_processes(2)
        .max_threads(2)
        .problem_repetitions(2)
        .workload_rounds(nz!(5))
        .build();

    let sweep = Sweep::new(config, fixed_inputs(), worker_program());

    let mut out = Vec::new();
    let report = sweep.run(&mut out).unwrap();

    let expected_labels = vec![
        ConfigLabel::sequential(),
        ConfigLabel::threads(2),
        ConfigLabel::processes_and_threads(2, 1),
        ConfigLabel::processes_and_threads(2, 2),
    ];

    assert_eq!(report.trials().len(), 2);

    for trial in report.trials() {
        assert_eq!(
            trial.iter().map(|(label, _)| label).collect::<Vec<_>>(),
            expected_labels
        );

        let (fastest_label, fastest_elapsed) = trial.fastest().unwrap();
        assert_eq!(trial.get(fastest_label), Some(fastest_elapsed));
        assert!(trial.iter().all(|(_, elapsed)| elapsed >= fastest_elapsed));
    }

    let output = String::from_utf8(out).unwrap();
    let lines = output.lines().collect::<Vec<_>>();

    // Four measurements per trial, then one summary line per trial.
    assert_eq!(lines.len(), 10);
    assert_eq!(
        lines
            .iter()
            .take(4)
            .map(|line| line.split(':').next().unwrap())
            .collect::<Vec<_>>(),
        vec![
            "took with 2 processes and 1 threads",
            "took with 2 processes and 2 threads",
            "took with 2 threads",
            "took with sequential execution",
        ]
    );
    assert!(lines.get(8).unwrap().starts_with("fastest in trial 0: "));
    assert!(lines.get(9).unwrap().starts_with("fastest in trial 1: "));
}
