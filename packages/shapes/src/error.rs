use thiserror::Error;

use crate::ShapeKind;

/// Errors that can occur when constructing shapes or combining them with other operands.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ShapeError {
    /// A shape was constructed from a parameter list of the wrong length.
    #[error("wrong number of parameters for {kind}: expected {expected}, received {received}")]
    WrongArity {
        /// The kind of shape that was being constructed.
        kind: ShapeKind,

        /// How many parameters this kind of shape takes.
        expected: usize,

        /// How many parameters were provided.
        received: usize,
    },

    /// A binary shape operation received an operand that is not a shape.
    #[error("expected {expected} to be combined with a shape, received {received}")]
    TypeMismatch {
        /// The kind of the shape on the left-hand side of the operation.
        expected: ShapeKind,

        /// A description of the operand that was received instead of a shape.
        received: &'static str,
    },

    /// The right-hand side of an area division has zero area.
    #[error("cannot divide by a shape with zero area")]
    ZeroArea,
}

/// A specialized `Result` type for shape operations, returning the crate's
/// [`ShapeError`] type as the error value.
pub type Result<T> = std::result::Result<T, ShapeError>;
