//! User-facing tensor handle that determines its backing transparently.

use std::sync::{Arc, Mutex};

use crate::autograd::FunctionNode;
use crate::error::Result;

use super::determined::DeterminedTensor;
use super::undetermined::UndeterminedTensor;

#[derive(Debug)]
enum FacadeState {
    Undetermined(UndeterminedTensor),
    Determined(Arc<DeterminedTensor>),
}

/// Forwards every query through determination.
///
/// The first successful accessor call replaces the wrapped undetermined
/// tensor with its determined form under the facade's mutex; concurrent
/// first accesses serialize on that lock, so the underlying impl is
/// constructed exactly once and the losing callers reuse the winner's
/// result. A facade never reverts to undetermined.
#[derive(Debug)]
pub struct FacadeTensor {
    state: Mutex<FacadeState>,
}

impl FacadeTensor {
    pub fn new(tensor: UndeterminedTensor) -> Self {
        FacadeTensor {
            state: Mutex::new(FacadeState::Undetermined(tensor)),
        }
    }

    /// Wraps an already-determined tensor, e.g. one produced by a fill op.
    pub fn from_determined(tensor: DeterminedTensor) -> Self {
        FacadeTensor {
            state: Mutex::new(FacadeState::Determined(Arc::new(tensor))),
        }
    }

    /// Whether determination has already happened, without triggering it.
    pub fn is_determined(&self) -> bool {
        matches!(*self.state.lock().unwrap(), FacadeState::Determined(_))
    }

    /// Returns the determined tensor, resolving the placeholder on first call.
    ///
    /// A validation failure (missing shape, dtype, or placement) leaves the
    /// facade untouched, so repeated calls report the same error.
    pub fn determine(&self) -> Result<Arc<DeterminedTensor>> {
        let mut state = self.state.lock().unwrap();
        if let FacadeState::Determined(tensor) = &*state {
            return Ok(Arc::clone(tensor));
        }

        let FacadeState::Undetermined(undetermined) = std::mem::replace(
            &mut *state,
            FacadeState::Undetermined(UndeterminedTensor::new()),
        ) else {
            unreachable!("state checked above while holding the lock");
        };

        if let Err(err) = undetermined.validate() {
            *state = FacadeState::Undetermined(undetermined);
            return Err(err);
        }

        let determined = Arc::new(undetermined.determine_and_destroy()?);
        *state = FacadeState::Determined(Arc::clone(&determined));
        Ok(determined)
    }

    pub fn ndim(&self) -> Result<usize> {
        Ok(self.determine()?.ndim())
    }

    pub fn is_cuda(&self) -> Result<bool> {
        Ok(self.determine()?.is_cuda())
    }

    pub fn nelement(&self) -> Result<usize> {
        Ok(self.determine()?.nelement())
    }

    pub fn dim(&self, index: usize) -> Result<usize> {
        self.determine()?.dim(index)
    }

    pub fn grad_fn_node(&self) -> Result<Option<Arc<FunctionNode>>> {
        Ok(self.determine()?.grad_fn_node())
    }

    pub fn acc_grad(&self) -> Result<Option<Arc<DeterminedTensor>>> {
        Ok(self.determine()?.acc_grad())
    }
}
