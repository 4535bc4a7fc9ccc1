//! Lightweight wrapper for tensor shapes and axis bookkeeping.

use crate::error::{Error, Result};

/// Stores the logical dimensions of a tensor.
///
/// Shapes are immutable value types; tensors share them behind `Arc` and
/// compare them by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    /// Constructs a new shape from the provided dimensions.
    ///
    /// Panics if `dims` is empty, ensuring every tensor has at least one axis.
    pub fn new<D: Into<Vec<usize>>>(dims: D) -> Self {
        let dims = dims.into();
        assert!(!dims.is_empty(), "shape must have at least one dimension");
        Shape { dims }
    }

    /// Borrow the raw dimension slice for downstream calculations.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Returns the rank (number of axes) of the shape.
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Computes the total number of elements implied by the shape.
    ///
    /// A zero extent on any axis makes the product zero.
    pub fn num_elements(&self) -> usize {
        self.dims.iter().product()
    }

    /// Returns the extent of the axis at `index`, failing past the rank.
    pub fn at(&self, index: usize) -> Result<usize> {
        self.dims
            .get(index)
            .copied()
            .ok_or(Error::IndexOutOfRange {
                index,
                rank: self.dims.len(),
            })
    }
}
