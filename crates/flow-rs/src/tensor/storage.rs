//! Storage buffers owned by eager tensor impls, with allocation accounting.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Error, Result};

use super::dtype::DType;

static NEXT_STORAGE_ID: AtomicU64 = AtomicU64::new(1);
static STORAGE_ALLOCATIONS: AtomicU64 = AtomicU64::new(0);

/// Returns the number of storages allocated so far in this process.
///
/// Tests use deltas of this counter to prove that determination constructs
/// an eager impl exactly once.
pub fn allocation_count() -> u64 {
    STORAGE_ALLOCATIONS.load(Ordering::SeqCst)
}

/// Concrete byte buffer backing an eager tensor impl.
///
/// Allocated when the impl is constructed and released when the impl is
/// dropped; the impl is the exclusive owner.
#[derive(Debug)]
pub struct Storage {
    id: u64,
    dtype: DType,
    data: Vec<u8>,
}

impl Storage {
    pub(crate) fn allocate(dtype: DType, nelement: usize) -> Self {
        STORAGE_ALLOCATIONS.fetch_add(1, Ordering::SeqCst);
        Storage {
            id: NEXT_STORAGE_ID.fetch_add(1, Ordering::Relaxed),
            dtype,
            data: vec![0u8; dtype.size_in_bytes() * nelement],
        }
    }

    /// Stable identity of the buffer, fresh per allocation.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn len_bytes(&self) -> usize {
        self.data.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Fills every element with `value` cast to the storage dtype.
    pub(crate) fn fill_with_f64(&mut self, value: f64) {
        match self.dtype {
            DType::F32 => fill_pattern(&mut self.data, (value as f32).to_le_bytes()),
            DType::F64 => fill_pattern(&mut self.data, value.to_le_bytes()),
            DType::I32 => fill_pattern(&mut self.data, (value as i32).to_le_bytes()),
            DType::I64 => fill_pattern(&mut self.data, (value as i64).to_le_bytes()),
        }
    }

    /// Fills every element with `value` cast to the storage dtype.
    pub(crate) fn fill_with_i64(&mut self, value: i64) {
        match self.dtype {
            DType::F32 => fill_pattern(&mut self.data, (value as f32).to_le_bytes()),
            DType::F64 => fill_pattern(&mut self.data, (value as f64).to_le_bytes()),
            DType::I32 => fill_pattern(&mut self.data, (value as i32).to_le_bytes()),
            DType::I64 => fill_pattern(&mut self.data, value.to_le_bytes()),
        }
    }

    /// Fills the buffer element-wise from `draw`, one call per element.
    ///
    /// Only floating-point dtypes have a uniform fill; integer dtypes fail
    /// with an unimplemented error.
    pub(crate) fn fill_uniform(&mut self, mut draw: impl FnMut() -> f64) -> Result<()> {
        match self.dtype {
            DType::F32 => {
                for chunk in self.data.chunks_exact_mut(4) {
                    chunk.copy_from_slice(&(draw() as f32).to_le_bytes());
                }
            }
            DType::F64 => {
                for chunk in self.data.chunks_exact_mut(8) {
                    chunk.copy_from_slice(&draw().to_le_bytes());
                }
            }
            DType::I32 | DType::I64 => {
                return Err(Error::Unimplemented(format!(
                    "uniform fill is not implemented for dtype {:?}",
                    self.dtype
                )));
            }
        }
        Ok(())
    }
}

fn fill_pattern<const N: usize>(data: &mut [u8], pattern: [u8; N]) {
    for chunk in data.chunks_exact_mut(N) {
        chunk.copy_from_slice(&pattern);
    }
}
