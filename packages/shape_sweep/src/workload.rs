use std::hint::black_box;
use std::num::NonZero;

use itertools::Itertools;
use shapes::ShapeError;

use crate::Choice;

/// One workload invocation: the CPU-bound unit of work that every execution strategy
/// dispatches.
///
/// For each of `rounds` rounds, builds the three shapes of `choice` fresh and applies
/// greater-than, less-than, add, modulo in both operand orders and less-or-equal to every
/// unordered pair of them. All results are discarded.
///
/// # Errors
///
/// Returns the first error raised by a shape operation, e.g. [`ShapeError::ZeroArea`] if a
/// sample contains zeroes.
pub fn run_workload(choice: &Choice, rounds: NonZero<u32>) -> Result<(), ShapeError> {
    for _ in 0..rounds.get() {
        let shapes = black_box(choice).shapes();

        for (x, y) in shapes.iter().tuple_combinations() {
            black_box(x.greater_than(y)?);
            black_box(x.less_than(y)?);
            black_box(x.add_areas(y)?);
            black_box(x.mod_areas(y)?);
            black_box(y.mod_areas(x)?);
            black_box(x.less_or_equal(y)?);
        }
    }

    Ok(())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use new_zealand::nz;

    use super::*;
    use crate::Sample;

    #[test]
    fn valid_choice_completes() {
        let choice = Choice::new(
            Sample::new([4, 2, 3]),
            Sample::new([5, 6, 7]),
            Sample::new([8, 9, 10]),
        );

        run_workload(&choice, nz!(10)).unwrap();
    }

    #[test]
    fn zero_area_shape_fails() {
        let choice = Choice::new(
            Sample::new([4, 2, 3]),
            Sample::new([5, 6, 7]),
            Sample::new([0, 9, 10]),
        );

        assert!(matches!(
            run_workload(&choice, nz!(1)),
            Err(ShapeError::ZeroArea)
        ));
    }
}
