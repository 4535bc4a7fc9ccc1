//! Constant and generator-driven fills over freshly determined tensors.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::rng::Generator;
use crate::tensor::{DType, Device, DeterminedTensor, FacadeTensor, Shape, UndeterminedTensor};

/// Scalar operand for a constant fill. Exactly one of the int or float
/// arms must be configured; `Unset` is the unreachable default case.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstantOperand {
    Int(i64),
    Float(f64),
    Unset,
}

fn make_eager_mirrored(
    shape: Arc<Shape>,
    dtype: DType,
    device: Arc<Device>,
) -> Result<DeterminedTensor> {
    UndeterminedTensor::new()
        .with_shape(shape)
        .with_dtype(dtype)
        .with_device(device)
        .with_is_lazy(false)
        .determine_and_destroy()
}

/// Creates an eager mirrored tensor with every element set to `operand`,
/// cast to `dtype`.
///
/// The storage is written exactly once, at construction.
pub fn constant_full(
    shape: Arc<Shape>,
    dtype: DType,
    device: Arc<Device>,
    operand: ConstantOperand,
) -> Result<FacadeTensor> {
    // Reject a missing operand before allocating anything.
    if operand == ConstantOperand::Unset {
        return Err(Error::Unimplemented(
            "constant fill requires an int or float operand".to_string(),
        ));
    }

    let mut determined = make_eager_mirrored(shape, dtype, device)?;
    if let Some(storage) = determined.storage_mut() {
        match operand {
            ConstantOperand::Int(value) => storage.fill_with_i64(value),
            ConstantOperand::Float(value) => storage.fill_with_f64(value),
            ConstantOperand::Unset => unreachable!("rejected above"),
        }
    }
    Ok(FacadeTensor::from_determined(determined))
}

/// Creates an eager mirrored tensor filled with uniform draws in `[0, 1)`
/// from `generator`, resolved against the tensor's device kind.
///
/// Only floating-point dtypes are supported.
pub fn uniform_full(
    shape: Arc<Shape>,
    dtype: DType,
    device: Arc<Device>,
    generator: &Generator,
) -> Result<FacadeTensor> {
    if !dtype.is_floating_point() {
        return Err(Error::Unimplemented(format!(
            "uniform fill is not implemented for dtype {dtype:?}"
        )));
    }

    let device_generator = generator.resolve_device(device.kind())?;
    let mut determined = make_eager_mirrored(shape, dtype, device)?;
    if let Some(storage) = determined.storage_mut() {
        storage.fill_uniform(|| device_generator.uniform_f64())?;
    }
    Ok(FacadeTensor::from_determined(determined))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::make_device_generator;
    use crate::tensor::DeviceKind;

    fn cpu() -> Arc<Device> {
        Arc::new(Device::cpu())
    }

    #[test]
    fn int_operand_fills_every_element() {
        let tensor = constant_full(
            Arc::new(Shape::new([2, 2])),
            DType::I32,
            cpu(),
            ConstantOperand::Int(7),
        )
        .unwrap();
        let determined = tensor.determine().unwrap();
        let storage = determined.storage().expect("constant fill is eager");
        let values: Vec<i32> = storage
            .as_bytes()
            .chunks_exact(4)
            .map(|chunk| i32::from_le_bytes(chunk.try_into().unwrap()))
            .collect();
        assert_eq!(values, vec![7; 4]);
    }

    #[test]
    fn float_operand_casts_to_dtype() {
        let tensor = constant_full(
            Arc::new(Shape::new([3])),
            DType::F32,
            cpu(),
            ConstantOperand::Float(1.5),
        )
        .unwrap();
        let determined = tensor.determine().unwrap();
        let storage = determined.storage().unwrap();
        let values: Vec<f32> = storage
            .as_bytes()
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes(chunk.try_into().unwrap()))
            .collect();
        assert_eq!(values, vec![1.5; 3]);
    }

    #[test]
    fn unset_operand_is_unimplemented() {
        let err = constant_full(
            Arc::new(Shape::new([1])),
            DType::F32,
            cpu(),
            ConstantOperand::Unset,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Unimplemented(_)));
    }

    #[test]
    fn uniform_fill_draws_into_unit_interval() {
        let generator = make_device_generator(DeviceKind::Cpu, 11);
        let tensor = uniform_full(Arc::new(Shape::new([8])), DType::F64, cpu(), &generator).unwrap();
        let determined = tensor.determine().unwrap();
        let storage = determined.storage().unwrap();
        for chunk in storage.as_bytes().chunks_exact(8) {
            let value = f64::from_le_bytes(chunk.try_into().unwrap());
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn uniform_fill_rejects_integer_dtypes() {
        let generator = make_device_generator(DeviceKind::Cpu, 11);
        let err =
            uniform_full(Arc::new(Shape::new([2])), DType::I64, cpu(), &generator).unwrap_err();
        assert!(matches!(err, Error::Unimplemented(_)));
    }

    #[test]
    fn uniform_fill_rejects_mismatched_device_generator() {
        let generator = make_device_generator(DeviceKind::Cuda, 3);
        let err =
            uniform_full(Arc::new(Shape::new([2])), DType::F32, cpu(), &generator).unwrap_err();
        assert!(matches!(err, Error::Value(_)));
    }
}
