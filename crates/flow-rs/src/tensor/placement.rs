//! Distribution descriptors for consistent (multi-device) tensors.

use serde::{Deserialize, Serialize};

use super::device::DeviceKind;

/// Describes how a consistent tensor's data is partitioned across its
/// process set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Distribute {
    /// Every rank holds the full tensor.
    Broadcast,
    /// The tensor is split along `axis`, one slice per rank.
    Split { axis: usize },
    /// Every rank holds a partial term; the logical value is their sum.
    PartialSum,
}

/// Names the process set a consistent tensor lives on and the device kind
/// each rank uses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParallelDesc {
    device_kind: DeviceKind,
    ranks: Vec<u64>,
}

impl ParallelDesc {
    pub fn new(device_kind: DeviceKind, ranks: Vec<u64>) -> Self {
        ParallelDesc { device_kind, ranks }
    }

    pub fn device_kind(&self) -> DeviceKind {
        self.device_kind
    }

    pub fn ranks(&self) -> &[u64] {
        &self.ranks
    }

    /// Number of ranks participating in the placement.
    pub fn parallel_num(&self) -> usize {
        self.ranks.len()
    }
}
