use std::num::NonZero;

use nonempty::NonEmpty;
use rand::Rng;
use serde::{Deserialize, Serialize};
use shapes::Shape;

use crate::{Result, SweepError};

/// Smallest value of a generated sample.
const SAMPLE_MIN: u32 = 1;

/// Largest value of a generated sample.
const SAMPLE_MAX: u32 = 200;

/// One raw input of three integers.
///
/// How many of the values are used depends on which shape the sample becomes: a trapezoid
/// uses all three, a rectangle the first two and a square only the first.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Sample([u32; 3]);

impl Sample {
    /// Creates a sample from its three values.
    #[must_use]
    pub const fn new(values: [u32; 3]) -> Self {
        Self(values)
    }

    /// The three values of the sample.
    #[must_use]
    pub fn values(&self) -> [u32; 3] {
        self.0
    }
}

impl From<[u32; 3]> for Sample {
    fn from(values: [u32; 3]) -> Self {
        Self(values)
    }
}

/// The three samples that one workload invocation builds its shapes from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Choice {
    trapezoid: Sample,
    rectangle: Sample,
    square: Sample,
}

impl Choice {
    /// Creates a choice from one sample per shape kind.
    #[must_use]
    pub fn new(trapezoid: Sample, rectangle: Sample, square: Sample) -> Self {
        Self {
            trapezoid,
            rectangle,
            square,
        }
    }

    /// Builds fresh trapezoid, rectangle and square shapes from the samples.
    #[must_use]
    pub fn shapes(&self) -> [Shape; 3] {
        let [a, b, h] = self.trapezoid.values();
        let [side, height, _] = self.rectangle.values();
        let [square_side, _, _] = self.square.values();

        [
            Shape::trapezoid(a, b, h),
            Shape::rectangle(side, height),
            Shape::square(square_side),
        ]
    }
}

/// The samples that workload invocations draw their inputs from.
///
/// # Examples
///
/// ```
/// use shape_sweep::{InputPool, Sample};
///
/// let pool = InputPool::new(vec![Sample::new([3, 4, 5])]).unwrap();
/// let choice = pool.choose(&mut rand::rng());
///
/// // With a single sample, every draw picks the same one.
/// assert_eq!(choice.shapes()[2].area(), 9.0);
/// ```
#[derive(Clone, Debug)]
pub struct InputPool {
    samples: NonEmpty<Sample>,
}

impl InputPool {
    /// Creates a pool from a list of samples.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::EmptyInputPool`] if `samples` is empty.
    pub fn new(samples: Vec<Sample>) -> Result<Self> {
        NonEmpty::from_vec(samples)
            .map(|samples| Self { samples })
            .ok_or(SweepError::EmptyInputPool)
    }

    /// Creates a pool of `size` samples with every value drawn uniformly from `1..=200`.
    ///
    /// The three values of a sample are drawn independently of each other rather than repeating
    /// one value, so trapezoids and rectangles built from a sample are generally not squares.
    pub fn generate<R: Rng + ?Sized>(size: NonZero<usize>, rng: &mut R) -> Self {
        let samples = (0..size.get())
            .map(|_| {
                Sample::new([
                    rng.random_range(SAMPLE_MIN..=SAMPLE_MAX),
                    rng.random_range(SAMPLE_MIN..=SAMPLE_MAX),
                    rng.random_range(SAMPLE_MIN..=SAMPLE_MAX),
                ])
            })
            .collect();

        Self {
            samples: NonEmpty::from_vec(samples).expect("size is non-zero"),
        }
    }

    /// Number of samples in the pool.
    #[must_use]
    pub fn len(&self) -> NonZero<usize> {
        NonZero::new(self.samples.len()).expect("pool is never empty")
    }

    /// The samples in the pool, in insertion order.
    pub fn samples(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// Draws three samples with replacement.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Choice {
        Choice::new(
            self.choose_one(rng),
            self.choose_one(rng),
            self.choose_one(rng),
        )
    }

    fn choose_one<R: Rng + ?Sized>(&self, rng: &mut R) -> Sample {
        let index = rng.random_range(0..self.samples.len());

        *self
            .samples
            .get(index)
            .expect("index is drawn from the range of valid indexes")
    }
}
