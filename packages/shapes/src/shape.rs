use std::cmp::Ordering;
use std::fmt;

use derive_more::Display;

use crate::{Operand, Result, ShapeError};

/// The constructor a [`Shape`] was created with.
///
/// The kind only affects how a shape is displayed and described in errors. All operations
/// work on the canonical `(a, b, h)` form, so a square and a trapezoid with the same
/// dimensions are indistinguishable by area.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[expect(
    clippy::exhaustive_enums,
    reason = "the set of shape kinds is closed, every consumer matches on all of them"
)]
pub enum ShapeKind {
    /// General trapezoid with two parallel sides `a` and `b` and height `h`.
    #[display("trapezoid")]
    Trapezoid,

    /// Trapezoid with equal parallel sides.
    #[display("rectangle")]
    Rectangle,

    /// Rectangle with height equal to its side.
    #[display("square")]
    Square,
}

impl ShapeKind {
    /// How many parameters [`Shape::from_params()`] expects for this kind.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Trapezoid => 3,
            Self::Rectangle => 2,
            Self::Square => 1,
        }
    }
}

/// An immutable trapezoid, rectangle or square.
///
/// # Examples
///
/// ```
/// use shapes::{Shape, ShapeKind};
///
/// let rectangle = Shape::from_params(ShapeKind::Rectangle, &[3, 2]).unwrap();
/// let trapezoid = Shape::trapezoid(3, 3, 2);
///
/// assert_eq!(rectangle.area(), 6.0);
/// assert!(rectangle.equals(&trapezoid).unwrap());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Shape {
    kind: ShapeKind,
    a: u32,
    b: u32,
    h: u32,
}

impl Shape {
    /// Creates a trapezoid with parallel sides `a` and `b` and height `h`.
    #[must_use]
    pub const fn trapezoid(a: u32, b: u32, h: u32) -> Self {
        Self {
            kind: ShapeKind::Trapezoid,
            a,
            b,
            h,
        }
    }

    /// Creates a rectangle with side `a` and height `h`.
    #[must_use]
    pub const fn rectangle(a: u32, h: u32) -> Self {
        Self {
            kind: ShapeKind::Rectangle,
            a,
            b: a,
            h,
        }
    }

    /// Creates a square with side `a`.
    #[must_use]
    pub const fn square(a: u32) -> Self {
        Self {
            kind: ShapeKind::Square,
            a,
            b: a,
            h: a,
        }
    }

    /// Creates a shape of the given kind from a parameter list.
    ///
    /// The list must have exactly [`ShapeKind::arity()`] elements, in the same order as the
    /// arguments of the matching constructor.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::WrongArity`] if the parameter count does not match the kind.
    pub fn from_params(kind: ShapeKind, params: &[u32]) -> Result<Self> {
        match (kind, params) {
            (ShapeKind::Trapezoid, &[a, b, h]) => Ok(Self::trapezoid(a, b, h)),
            (ShapeKind::Rectangle, &[a, h]) => Ok(Self::rectangle(a, h)),
            (ShapeKind::Square, &[a]) => Ok(Self::square(a)),
            _ => Err(ShapeError::WrongArity {
                kind,
                expected: kind.arity(),
                received: params.len(),
            }),
        }
    }

    /// The constructor this shape was created with.
    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// The canonical `(a, b, h)` dimensions of the shape.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32, u32) {
        (self.a, self.b, self.h)
    }

    /// Area of the shape: `min(a, b) * h + |a - b| * h / 2`.
    #[must_use]
    pub fn area(&self) -> f64 {
        halve(self.doubled_area())
    }

    /// Compares the areas of two shapes.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::TypeMismatch`] if `other` is not a shape.
    pub fn compare<'a>(&self, other: impl Into<Operand<'a>>) -> Result<Ordering> {
        let other = self.expect_shape(other.into())?;

        Ok(self.doubled_area().cmp(&other.doubled_area()))
    }

    /// Whether the area of `self` is smaller than the area of `other`.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::TypeMismatch`] if `other` is not a shape.
    pub fn less_than<'a>(&self, other: impl Into<Operand<'a>>) -> Result<bool> {
        Ok(self.compare(other)?.is_lt())
    }

    /// Whether the area of `self` is smaller than or equal to the area of `other`.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::TypeMismatch`] if `other` is not a shape.
    pub fn less_or_equal<'a>(&self, other: impl Into<Operand<'a>>) -> Result<bool> {
        Ok(self.compare(other)?.is_le())
    }

    /// Whether the area of `self` is greater than the area of `other`.
    ///
    /// This is a strict comparison: shapes with equal areas are not greater than each other.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::TypeMismatch`] if `other` is not a shape.
    pub fn greater_than<'a>(&self, other: impl Into<Operand<'a>>) -> Result<bool> {
        Ok(self.compare(other)?.is_gt())
    }

    /// Whether the area of `self` is greater than or equal to the area of `other`.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::TypeMismatch`] if `other` is not a shape.
    pub fn greater_or_equal<'a>(&self, other: impl Into<Operand<'a>>) -> Result<bool> {
        Ok(self.compare(other)?.is_ge())
    }

    /// Whether two shapes have the same area, regardless of their kind or dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::TypeMismatch`] if `other` is not a shape.
    pub fn equals<'a>(&self, other: impl Into<Operand<'a>>) -> Result<bool> {
        Ok(self.compare(other)?.is_eq())
    }

    /// Sum of the areas of two shapes.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::TypeMismatch`] if `other` is not a shape.
    pub fn add_areas<'a>(&self, other: impl Into<Operand<'a>>) -> Result<f64> {
        let other = self.expect_shape(other.into())?;

        let doubled_sum = self
            .doubled_area()
            .checked_add(other.doubled_area())
            .expect("doubled areas of u32 dimensions stay far below u128::MAX");

        Ok(halve(doubled_sum))
    }

    /// Absolute difference between the areas of two shapes.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::TypeMismatch`] if `other` is not a shape.
    pub fn sub_areas<'a>(&self, other: impl Into<Operand<'a>>) -> Result<f64> {
        let other = self.expect_shape(other.into())?;

        Ok(halve(self.doubled_area().abs_diff(other.doubled_area())))
    }

    /// How many whole times the area of `other` fits into the area of `self`,
    /// i.e. `floor(area(self) / area(other))`.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::TypeMismatch`] if `other` is not a shape and
    /// [`ShapeError::ZeroArea`] if `other` has zero area.
    pub fn mod_areas<'a>(&self, other: impl Into<Operand<'a>>) -> Result<u128> {
        let other = self.expect_shape(other.into())?;

        // Both areas are doubled, so the quotient is the same as for the real areas.
        self.doubled_area()
            .checked_div(other.doubled_area())
            .ok_or(ShapeError::ZeroArea)
    }

    fn expect_shape<'a>(&self, operand: Operand<'a>) -> Result<&'a Self> {
        match operand {
            Operand::Shape(shape) => Ok(shape),
            other @ Operand::Scalar(_) => Err(ShapeError::TypeMismatch {
                expected: self.kind,
                received: other.describe(),
            }),
        }
    }

    /// Twice the area, which is always an integer and therefore exact to compare.
    #[expect(
        clippy::arithmetic_side_effects,
        reason = "products and sums of u32 values cannot overflow u128"
    )]
    fn doubled_area(&self) -> u128 {
        let a = u128::from(self.a);
        let b = u128::from(self.b);
        let h = u128::from(self.h);

        a.min(b) * h * 2 + a.abs_diff(b) * h
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ShapeKind::Trapezoid => write!(
                f,
                "trapezoid (sides {}, {}; height {})",
                self.a, self.b, self.h
            ),
            ShapeKind::Rectangle => write!(f, "rectangle (side {}; height {})", self.a, self.h),
            ShapeKind::Square => write!(f, "square (side {})", self.a),
        }
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "areas above 2^53 lose precision, which is acceptable for a floating point result"
)]
fn halve(doubled: u128) -> f64 {
    doubled as f64 / 2.0
}
