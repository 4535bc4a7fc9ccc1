//! The four concrete tensor impl variants: {lazy, eager} x {mirrored, consistent}.
//!
//! Each variant carries the same attribute set; mirrored variants add a
//! device, consistent variants add a distribution descriptor, and eager
//! variants exclusively own a [`Storage`] allocated at construction. Lazy
//! variants are metadata-only; their storage arrives later from an
//! execution engine.

use std::sync::Arc;

use super::device::Device;
use super::dtype::DType;
use super::placement::{Distribute, ParallelDesc};
use super::shape::Shape;
use super::storage::Storage;

/// Attributes common to every impl variant, fixed at construction.
#[derive(Debug, Clone)]
pub(crate) struct TensorAttrs {
    pub(crate) shape: Arc<Shape>,
    pub(crate) dtype: DType,
    pub(crate) requires_grad: bool,
    pub(crate) is_leaf: bool,
    pub(crate) retain_grad: bool,
}

#[derive(Debug)]
pub(crate) struct LazyMirroredTensorImpl {
    pub(crate) attrs: TensorAttrs,
    pub(crate) device: Arc<Device>,
}

#[derive(Debug)]
pub(crate) struct EagerMirroredTensorImpl {
    pub(crate) attrs: TensorAttrs,
    pub(crate) device: Arc<Device>,
    pub(crate) storage: Storage,
}

impl EagerMirroredTensorImpl {
    fn new(attrs: TensorAttrs, device: Arc<Device>) -> Self {
        let storage = Storage::allocate(attrs.dtype, attrs.shape.num_elements());
        EagerMirroredTensorImpl {
            attrs,
            device,
            storage,
        }
    }
}

#[derive(Debug)]
pub(crate) struct LazyConsistentTensorImpl {
    pub(crate) attrs: TensorAttrs,
    pub(crate) distribute: Arc<Distribute>,
    pub(crate) parallel_desc: Arc<ParallelDesc>,
}

#[derive(Debug)]
pub(crate) struct EagerConsistentTensorImpl {
    pub(crate) attrs: TensorAttrs,
    pub(crate) distribute: Arc<Distribute>,
    pub(crate) parallel_desc: Arc<ParallelDesc>,
    pub(crate) storage: Storage,
}

impl EagerConsistentTensorImpl {
    fn new(attrs: TensorAttrs, distribute: Arc<Distribute>, parallel_desc: Arc<ParallelDesc>) -> Self {
        let storage = Storage::allocate(attrs.dtype, attrs.shape.num_elements());
        EagerConsistentTensorImpl {
            attrs,
            distribute,
            parallel_desc,
            storage,
        }
    }
}

/// Backing impl for a mirrored (single-device) tensor.
#[derive(Debug)]
pub(crate) enum MirroredTensorImpl {
    Lazy(LazyMirroredTensorImpl),
    Eager(EagerMirroredTensorImpl),
}

impl MirroredTensorImpl {
    /// Selects the lazy or eager variant purely on `is_lazy`.
    pub(crate) fn new(attrs: TensorAttrs, device: Arc<Device>, is_lazy: bool) -> Self {
        if is_lazy {
            MirroredTensorImpl::Lazy(LazyMirroredTensorImpl { attrs, device })
        } else {
            MirroredTensorImpl::Eager(EagerMirroredTensorImpl::new(attrs, device))
        }
    }

    pub(crate) fn attrs(&self) -> &TensorAttrs {
        match self {
            MirroredTensorImpl::Lazy(inner) => &inner.attrs,
            MirroredTensorImpl::Eager(inner) => &inner.attrs,
        }
    }

    pub(crate) fn device(&self) -> &Arc<Device> {
        match self {
            MirroredTensorImpl::Lazy(inner) => &inner.device,
            MirroredTensorImpl::Eager(inner) => &inner.device,
        }
    }

    pub(crate) fn is_lazy(&self) -> bool {
        matches!(self, MirroredTensorImpl::Lazy(_))
    }

    pub(crate) fn storage(&self) -> Option<&Storage> {
        match self {
            MirroredTensorImpl::Lazy(_) => None,
            MirroredTensorImpl::Eager(inner) => Some(&inner.storage),
        }
    }

    pub(crate) fn storage_mut(&mut self) -> Option<&mut Storage> {
        match self {
            MirroredTensorImpl::Lazy(_) => None,
            MirroredTensorImpl::Eager(inner) => Some(&mut inner.storage),
        }
    }
}

/// Backing impl for a consistent (multi-device) tensor.
#[derive(Debug)]
pub(crate) enum ConsistentTensorImpl {
    Lazy(LazyConsistentTensorImpl),
    Eager(EagerConsistentTensorImpl),
}

impl ConsistentTensorImpl {
    /// Selects the lazy or eager variant purely on `is_lazy`.
    pub(crate) fn new(
        attrs: TensorAttrs,
        distribute: Arc<Distribute>,
        parallel_desc: Arc<ParallelDesc>,
        is_lazy: bool,
    ) -> Self {
        if is_lazy {
            ConsistentTensorImpl::Lazy(LazyConsistentTensorImpl {
                attrs,
                distribute,
                parallel_desc,
            })
        } else {
            ConsistentTensorImpl::Eager(EagerConsistentTensorImpl::new(
                attrs,
                distribute,
                parallel_desc,
            ))
        }
    }

    pub(crate) fn attrs(&self) -> &TensorAttrs {
        match self {
            ConsistentTensorImpl::Lazy(inner) => &inner.attrs,
            ConsistentTensorImpl::Eager(inner) => &inner.attrs,
        }
    }

    pub(crate) fn distribute(&self) -> &Arc<Distribute> {
        match self {
            ConsistentTensorImpl::Lazy(inner) => &inner.distribute,
            ConsistentTensorImpl::Eager(inner) => &inner.distribute,
        }
    }

    pub(crate) fn parallel_desc(&self) -> &Arc<ParallelDesc> {
        match self {
            ConsistentTensorImpl::Lazy(inner) => &inner.parallel_desc,
            ConsistentTensorImpl::Eager(inner) => &inner.parallel_desc,
        }
    }

    pub(crate) fn is_lazy(&self) -> bool {
        matches!(self, ConsistentTensorImpl::Lazy(_))
    }

    pub(crate) fn storage(&self) -> Option<&Storage> {
        match self {
            ConsistentTensorImpl::Lazy(_) => None,
            ConsistentTensorImpl::Eager(inner) => Some(&inner.storage),
        }
    }

    pub(crate) fn storage_mut(&mut self) -> Option<&mut Storage> {
        match self {
            ConsistentTensorImpl::Lazy(_) => None,
            ConsistentTensorImpl::Eager(inner) => Some(&mut inner.storage),
        }
    }
}
