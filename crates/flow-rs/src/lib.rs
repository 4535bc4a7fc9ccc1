pub mod autograd;
mod env;
pub mod error;
pub mod ops;
pub mod registry;
pub mod rng;
pub mod tensor;

pub use error::{Error, Result};
pub use rng::Generator;
pub use tensor::{
    ConsistentTensor, DType, DeterminedTensor, Device, DeviceKind, Distribute, FacadeTensor,
    MirroredTensor, ParallelDesc, Shape, UndeterminedTensor,
};
