use crate::Shape;

/// The right-hand side of a binary shape operation.
///
/// Shape operations are only defined between two shapes. Other values can still be passed in,
/// which is how callers working with loosely typed inputs end up with
/// [`ShapeError::TypeMismatch`][crate::ShapeError::TypeMismatch].
#[derive(Clone, Copy, Debug)]
#[non_exhaustive]
pub enum Operand<'a> {
    /// Another shape. This is the only operand the operations accept.
    Shape(&'a Shape),

    /// A plain number.
    Scalar(f64),
}

impl Operand<'_> {
    /// Short human-readable name of what the operand holds, used in error messages.
    #[must_use]
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Shape(_) => "shape",
            Self::Scalar(_) => "scalar",
        }
    }
}

impl<'a> From<&'a Shape> for Operand<'a> {
    fn from(value: &'a Shape) -> Self {
        Self::Shape(value)
    }
}

impl From<f64> for Operand<'_> {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<u32> for Operand<'_> {
    fn from(value: u32) -> Self {
        Self::Scalar(f64::from(value))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn describe_matches_variant() {
        let square = Shape::square(1);

        assert_eq!(Operand::from(&square).describe(), "shape");
        assert_eq!(Operand::from(1.5).describe(), "scalar");
        assert_eq!(Operand::from(3_u32).describe(), "scalar");
    }
}
