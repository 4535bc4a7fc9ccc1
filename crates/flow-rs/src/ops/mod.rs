//! Fill functionals that produce eager mirrored tensors.

mod fill;

pub use fill::{constant_full, uniform_full, ConstantOperand};
