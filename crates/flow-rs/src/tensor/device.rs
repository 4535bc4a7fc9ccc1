//! Device placement descriptors for mirrored tensors.

use serde::{Deserialize, Serialize};

/// Canonical device kind used everywhere a placement decision is made.
///
/// Both mirrored tensors and parallel descriptors test against this enum;
/// device kinds are never compared through strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceKind {
    Cpu,
    Cuda,
}

/// Identifies a single placement (kind + index) for mirrored tensors.
///
/// Devices are immutable; tensors share them behind `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Device {
    kind: DeviceKind,
    index: usize,
}

impl Device {
    pub fn new(kind: DeviceKind, index: usize) -> Self {
        Device { kind, index }
    }

    /// Shorthand for the CPU device at ordinal zero.
    pub fn cpu() -> Self {
        Device::new(DeviceKind::Cpu, 0)
    }

    /// Shorthand for a CUDA device at the given ordinal.
    pub fn cuda(index: usize) -> Self {
        Device::new(DeviceKind::Cuda, index)
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether the device is a CUDA placement.
    pub fn is_cuda(&self) -> bool {
        self.kind == DeviceKind::Cuda
    }
}
