//! Placeholder tensors whose placement and backing are not yet fixed.

use std::sync::Arc;

use crate::error::{Error, Result};

use super::determined::{ConsistentTensor, DeterminedTensor, MirroredTensor};
use super::device::Device;
use super::dtype::DType;
use super::placement::{Distribute, ParallelDesc};
use super::shape::Shape;

/// Tensor with partially-specified attributes.
///
/// Shape and dtype must be present before determination; exactly one of
/// `device` or `distribute` + `parallel_desc` selects the mirrored or
/// consistent path. `is_lazy` defaults from the process-wide execution
/// mode (`FLOWRS_EAGER`) until pinned explicitly.
#[derive(Debug)]
pub struct UndeterminedTensor {
    shape: Option<Arc<Shape>>,
    dtype: Option<DType>,
    device: Option<Arc<Device>>,
    distribute: Option<Arc<Distribute>>,
    parallel_desc: Option<Arc<ParallelDesc>>,
    is_lazy: bool,
    requires_grad: bool,
    is_leaf: bool,
    retain_grad: bool,
}

impl UndeterminedTensor {
    pub fn new() -> Self {
        UndeterminedTensor {
            shape: None,
            dtype: None,
            device: None,
            distribute: None,
            parallel_desc: None,
            is_lazy: !crate::env::eager_enabled(),
            requires_grad: false,
            is_leaf: true,
            retain_grad: false,
        }
    }

    pub fn with_shape(mut self, shape: Arc<Shape>) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn with_dtype(mut self, dtype: DType) -> Self {
        self.dtype = Some(dtype);
        self
    }

    pub fn with_device(mut self, device: Arc<Device>) -> Self {
        self.device = Some(device);
        self
    }

    pub fn with_distribute(mut self, distribute: Arc<Distribute>) -> Self {
        self.distribute = Some(distribute);
        self
    }

    pub fn with_parallel_desc(mut self, parallel_desc: Arc<ParallelDesc>) -> Self {
        self.parallel_desc = Some(parallel_desc);
        self
    }

    pub fn with_is_lazy(mut self, is_lazy: bool) -> Self {
        self.is_lazy = is_lazy;
        self
    }

    pub fn with_requires_grad(mut self, requires_grad: bool) -> Self {
        self.requires_grad = requires_grad;
        self
    }

    pub fn with_is_leaf(mut self, is_leaf: bool) -> Self {
        self.is_leaf = is_leaf;
        self
    }

    pub fn with_retain_grad(mut self, retain_grad: bool) -> Self {
        self.retain_grad = retain_grad;
        self
    }

    pub fn shape(&self) -> Result<&Arc<Shape>> {
        self.shape.as_ref().ok_or_else(|| Error::undetermined("shape"))
    }

    pub fn dtype(&self) -> Result<DType> {
        self.dtype.ok_or_else(|| Error::undetermined("dtype"))
    }

    pub fn device(&self) -> Result<&Arc<Device>> {
        self.device
            .as_ref()
            .ok_or_else(|| Error::undetermined("device"))
    }

    pub fn distribute(&self) -> Result<&Arc<Distribute>> {
        self.distribute
            .as_ref()
            .ok_or_else(|| Error::undetermined("distribute"))
    }

    pub fn parallel_desc(&self) -> Result<&Arc<ParallelDesc>> {
        self.parallel_desc
            .as_ref()
            .ok_or_else(|| Error::undetermined("parallel_desc"))
    }

    pub fn is_lazy(&self) -> bool {
        self.is_lazy
    }

    pub fn requires_grad(&self) -> bool {
        self.requires_grad
    }

    pub fn is_leaf(&self) -> bool {
        self.is_leaf
    }

    pub fn retain_grad(&self) -> bool {
        self.retain_grad
    }

    /// A tensor is consistent when both distribution descriptors are present.
    pub fn is_consistent(&self) -> bool {
        self.distribute.is_some() && self.parallel_desc.is_some()
    }

    /// Checks that every field determination will read is present, without
    /// consuming the tensor. A passing validation guarantees
    /// [`determine_and_destroy`](Self::determine_and_destroy) succeeds.
    pub fn validate(&self) -> Result<()> {
        self.shape()?;
        self.dtype()?;
        if !self.is_consistent() {
            self.device()?;
        }
        Ok(())
    }

    /// Resolves the placeholder into a concrete determined tensor.
    ///
    /// Consuming `self` makes the transition destructive: the placeholder
    /// cannot be determined twice, and a failed call reports the first
    /// missing field. The lazy/eager split happens inside the mirrored and
    /// consistent constructors and nowhere else.
    pub fn determine_and_destroy(self) -> Result<DeterminedTensor> {
        let UndeterminedTensor {
            shape,
            dtype,
            device,
            distribute,
            parallel_desc,
            is_lazy,
            requires_grad,
            is_leaf,
            retain_grad,
        } = self;

        let shape = shape.ok_or_else(|| Error::undetermined("shape"))?;
        let dtype = dtype.ok_or_else(|| Error::undetermined("dtype"))?;

        match (distribute, parallel_desc) {
            (Some(distribute), Some(parallel_desc)) => {
                Ok(DeterminedTensor::Consistent(ConsistentTensor::make(
                    shape,
                    dtype,
                    distribute,
                    parallel_desc,
                    is_lazy,
                    requires_grad,
                    is_leaf,
                    retain_grad,
                )))
            }
            _ => {
                let device = device.ok_or_else(|| Error::undetermined("device"))?;
                Ok(DeterminedTensor::Mirrored(MirroredTensor::make(
                    shape,
                    dtype,
                    device,
                    is_lazy,
                    requires_grad,
                    is_leaf,
                    retain_grad,
                )))
            }
        }
    }
}

impl Default for UndeterminedTensor {
    fn default() -> Self {
        Self::new()
    }
}
