//! Minimal autograd metadata surface consumed by the facade accessors.
//!
//! The full backward engine is an external collaborator; determined tensors
//! only hold the graph node that produced them and the accumulated gradient
//! once one exists.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::tensor::DeterminedTensor;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Node of the autograd graph that produced a tensor.
#[derive(Debug)]
pub struct FunctionNode {
    id: u64,
    name: String,
}

impl FunctionNode {
    pub fn new(name: impl Into<String>) -> Self {
        FunctionNode {
            id: NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Gradient metadata attached to every determined tensor.
#[derive(Debug, Default)]
pub(crate) struct AutogradMeta {
    grad_fn_node: Mutex<Option<Arc<FunctionNode>>>,
    acc_grad: Mutex<Option<Arc<DeterminedTensor>>>,
}

impl AutogradMeta {
    pub(crate) fn grad_fn_node(&self) -> Option<Arc<FunctionNode>> {
        self.grad_fn_node.lock().unwrap().clone()
    }

    pub(crate) fn set_grad_fn_node(&self, node: Arc<FunctionNode>) {
        *self.grad_fn_node.lock().unwrap() = Some(node);
    }

    pub(crate) fn acc_grad(&self) -> Option<Arc<DeterminedTensor>> {
        self.acc_grad.lock().unwrap().clone()
    }

    pub(crate) fn set_acc_grad(&self, grad: Arc<DeterminedTensor>) {
        *self.acc_grad.lock().unwrap() = Some(grad);
    }
}
