#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Value objects for trapezoids and their constrained special cases, rectangles and squares.
//!
//! Every shape is stored in the canonical `(a, b, h)` trapezoid form: `a` and `b` are the two
//! parallel sides and `h` is the height. A rectangle is a trapezoid with `a == b` and a square
//! is a rectangle with `h == a`. Shapes are compared and combined purely by area.
//!
//! ```
//! use shapes::Shape;
//!
//! let trapezoid = Shape::trapezoid(4, 2, 3);
//! let square = Shape::square(3);
//!
//! assert_eq!(trapezoid.area(), 9.0);
//! assert!(trapezoid.equals(&square).unwrap());
//! assert_eq!(trapezoid.add_areas(&square).unwrap(), 18.0);
//! ```
//!
//! # Operands
//!
//! The binary operations accept anything that converts into an [`Operand`]. Only shapes are
//! valid operands - a non-shape operand fails with [`ShapeError::TypeMismatch`]:
//!
//! ```
//! use shapes::{Shape, ShapeError};
//!
//! let square = Shape::square(2);
//!
//! assert!(matches!(
//!     square.less_than(7.5),
//!     Err(ShapeError::TypeMismatch { .. })
//! ));
//! ```

mod error;
mod operand;
mod shape;

pub use error::*;
pub use operand::*;
pub use shape::*;
