//! Determined tensors: mirrored and consistent variants with a fixed impl.

use std::sync::Arc;

use crate::autograd::{AutogradMeta, FunctionNode};
use crate::error::Result;

use super::device::{Device, DeviceKind};
use super::dtype::DType;
use super::impls::{ConsistentTensorImpl, MirroredTensorImpl, TensorAttrs};
use super::placement::{Distribute, ParallelDesc};
use super::shape::Shape;
use super::storage::Storage;

/// Tensor fully resident on a single device.
#[derive(Debug)]
pub struct MirroredTensor {
    impl_: MirroredTensorImpl,
    autograd: AutogradMeta,
}

impl MirroredTensor {
    /// Builds a mirrored tensor, selecting the lazy or eager impl on `is_lazy`.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn make(
        shape: Arc<Shape>,
        dtype: DType,
        device: Arc<Device>,
        is_lazy: bool,
        requires_grad: bool,
        is_leaf: bool,
        retain_grad: bool,
    ) -> Self {
        let attrs = TensorAttrs {
            shape,
            dtype,
            requires_grad,
            is_leaf,
            retain_grad,
        };
        MirroredTensor {
            impl_: MirroredTensorImpl::new(attrs, device, is_lazy),
            autograd: AutogradMeta::default(),
        }
    }

    pub fn shape(&self) -> &Arc<Shape> {
        &self.impl_.attrs().shape
    }

    pub fn dtype(&self) -> DType {
        self.impl_.attrs().dtype
    }

    pub fn device(&self) -> &Arc<Device> {
        self.impl_.device()
    }

    pub fn ndim(&self) -> usize {
        self.shape().rank()
    }

    pub fn nelement(&self) -> usize {
        self.shape().num_elements()
    }

    pub fn dim(&self, index: usize) -> Result<usize> {
        self.shape().at(index)
    }

    /// Whether the tensor lives on a CUDA device.
    pub fn is_cuda(&self) -> bool {
        self.device().kind() == DeviceKind::Cuda
    }

    pub fn is_lazy(&self) -> bool {
        self.impl_.is_lazy()
    }

    pub fn requires_grad(&self) -> bool {
        self.impl_.attrs().requires_grad
    }

    pub fn is_leaf(&self) -> bool {
        self.impl_.attrs().is_leaf
    }

    pub fn retain_grad(&self) -> bool {
        self.impl_.attrs().retain_grad
    }

    /// Concrete storage when the impl is eager; lazy impls have none.
    pub fn storage(&self) -> Option<&Storage> {
        self.impl_.storage()
    }

    pub(crate) fn storage_mut(&mut self) -> Option<&mut Storage> {
        self.impl_.storage_mut()
    }
}

/// Tensor logically partitioned across a set of devices.
#[derive(Debug)]
pub struct ConsistentTensor {
    impl_: ConsistentTensorImpl,
    autograd: AutogradMeta,
}

impl ConsistentTensor {
    /// Builds a consistent tensor, selecting the lazy or eager impl on `is_lazy`.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn make(
        shape: Arc<Shape>,
        dtype: DType,
        distribute: Arc<Distribute>,
        parallel_desc: Arc<ParallelDesc>,
        is_lazy: bool,
        requires_grad: bool,
        is_leaf: bool,
        retain_grad: bool,
    ) -> Self {
        let attrs = TensorAttrs {
            shape,
            dtype,
            requires_grad,
            is_leaf,
            retain_grad,
        };
        ConsistentTensor {
            impl_: ConsistentTensorImpl::new(attrs, distribute, parallel_desc, is_lazy),
            autograd: AutogradMeta::default(),
        }
    }

    pub fn shape(&self) -> &Arc<Shape> {
        &self.impl_.attrs().shape
    }

    pub fn dtype(&self) -> DType {
        self.impl_.attrs().dtype
    }

    pub fn distribute(&self) -> &Arc<Distribute> {
        self.impl_.distribute()
    }

    pub fn parallel_desc(&self) -> &Arc<ParallelDesc> {
        self.impl_.parallel_desc()
    }

    pub fn ndim(&self) -> usize {
        self.shape().rank()
    }

    pub fn nelement(&self) -> usize {
        self.shape().num_elements()
    }

    pub fn dim(&self, index: usize) -> Result<usize> {
        self.shape().at(index)
    }

    /// Whether the placement's device kind is CUDA.
    pub fn is_cuda(&self) -> bool {
        self.parallel_desc().device_kind() == DeviceKind::Cuda
    }

    pub fn is_lazy(&self) -> bool {
        self.impl_.is_lazy()
    }

    pub fn requires_grad(&self) -> bool {
        self.impl_.attrs().requires_grad
    }

    pub fn is_leaf(&self) -> bool {
        self.impl_.attrs().is_leaf
    }

    pub fn retain_grad(&self) -> bool {
        self.impl_.attrs().retain_grad
    }

    pub fn storage(&self) -> Option<&Storage> {
        self.impl_.storage()
    }

    pub(crate) fn storage_mut(&mut self) -> Option<&mut Storage> {
        self.impl_.storage_mut()
    }
}

/// Tensor whose backing variant has been fixed by determination.
#[derive(Debug)]
pub enum DeterminedTensor {
    Mirrored(MirroredTensor),
    Consistent(ConsistentTensor),
}

impl DeterminedTensor {
    pub fn shape(&self) -> &Arc<Shape> {
        match self {
            DeterminedTensor::Mirrored(t) => t.shape(),
            DeterminedTensor::Consistent(t) => t.shape(),
        }
    }

    pub fn dtype(&self) -> DType {
        match self {
            DeterminedTensor::Mirrored(t) => t.dtype(),
            DeterminedTensor::Consistent(t) => t.dtype(),
        }
    }

    pub fn ndim(&self) -> usize {
        match self {
            DeterminedTensor::Mirrored(t) => t.ndim(),
            DeterminedTensor::Consistent(t) => t.ndim(),
        }
    }

    pub fn nelement(&self) -> usize {
        match self {
            DeterminedTensor::Mirrored(t) => t.nelement(),
            DeterminedTensor::Consistent(t) => t.nelement(),
        }
    }

    pub fn dim(&self, index: usize) -> Result<usize> {
        match self {
            DeterminedTensor::Mirrored(t) => t.dim(index),
            DeterminedTensor::Consistent(t) => t.dim(index),
        }
    }

    pub fn is_cuda(&self) -> bool {
        match self {
            DeterminedTensor::Mirrored(t) => t.is_cuda(),
            DeterminedTensor::Consistent(t) => t.is_cuda(),
        }
    }

    pub fn is_lazy(&self) -> bool {
        match self {
            DeterminedTensor::Mirrored(t) => t.is_lazy(),
            DeterminedTensor::Consistent(t) => t.is_lazy(),
        }
    }

    pub fn requires_grad(&self) -> bool {
        match self {
            DeterminedTensor::Mirrored(t) => t.requires_grad(),
            DeterminedTensor::Consistent(t) => t.requires_grad(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        match self {
            DeterminedTensor::Mirrored(t) => t.is_leaf(),
            DeterminedTensor::Consistent(t) => t.is_leaf(),
        }
    }

    pub fn retain_grad(&self) -> bool {
        match self {
            DeterminedTensor::Mirrored(t) => t.retain_grad(),
            DeterminedTensor::Consistent(t) => t.retain_grad(),
        }
    }

    pub fn storage(&self) -> Option<&Storage> {
        match self {
            DeterminedTensor::Mirrored(t) => t.storage(),
            DeterminedTensor::Consistent(t) => t.storage(),
        }
    }

    pub(crate) fn storage_mut(&mut self) -> Option<&mut Storage> {
        match self {
            DeterminedTensor::Mirrored(t) => t.storage_mut(),
            DeterminedTensor::Consistent(t) => t.storage_mut(),
        }
    }

    pub fn as_mirrored(&self) -> Option<&MirroredTensor> {
        match self {
            DeterminedTensor::Mirrored(t) => Some(t),
            DeterminedTensor::Consistent(_) => None,
        }
    }

    pub fn as_consistent(&self) -> Option<&ConsistentTensor> {
        match self {
            DeterminedTensor::Mirrored(_) => None,
            DeterminedTensor::Consistent(t) => Some(t),
        }
    }

    fn autograd(&self) -> &AutogradMeta {
        match self {
            DeterminedTensor::Mirrored(t) => &t.autograd,
            DeterminedTensor::Consistent(t) => &t.autograd,
        }
    }

    /// Node of the autograd graph that produced this tensor, if any.
    pub fn grad_fn_node(&self) -> Option<Arc<FunctionNode>> {
        self.autograd().grad_fn_node()
    }

    pub fn set_grad_fn_node(&self, node: Arc<FunctionNode>) {
        self.autograd().set_grad_fn_node(node);
    }

    /// Accumulated gradient tensor, once the backward engine has produced one.
    pub fn acc_grad(&self) -> Option<Arc<DeterminedTensor>> {
        self.autograd().acc_grad()
    }

    pub fn set_acc_grad(&self, grad: Arc<DeterminedTensor>) {
        self.autograd().set_acc_grad(grad);
    }
}
