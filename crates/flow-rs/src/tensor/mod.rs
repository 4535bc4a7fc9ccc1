//! Core tensor abstractions: descriptors, impl variants, and the
//! determination engine.
//!
//! Tensors start undetermined (partially-specified attributes) and resolve
//! into a mirrored or consistent backing exactly once, on first access
//! through [`FacadeTensor`].

mod determined;
pub mod device;
pub mod dtype;
mod facade;
mod impls;
pub mod placement;
pub mod shape;
pub mod storage;
mod undetermined;

pub use determined::{ConsistentTensor, DeterminedTensor, MirroredTensor};
pub use device::{Device, DeviceKind};
pub use dtype::DType;
pub use facade::FacadeTensor;
pub use placement::{Distribute, ParallelDesc};
pub use shape::Shape;
pub use storage::Storage;
pub use undetermined::UndeterminedTensor;
