//! Facade contract: determination is triggered transparently, happens at
//! most once per facade, and failures leave the facade untouched.

use std::sync::{Arc, Barrier, Mutex};
use std::thread;

use anyhow::Result;
use flow_rs::autograd::FunctionNode;
use flow_rs::error::Error;
use flow_rs::tensor::storage;
use flow_rs::{DType, Device, FacadeTensor, Shape, UndeterminedTensor};

// Allocation-count assertions share the process-wide storage counter, so
// every allocating test in this binary serializes on this guard.
static ALLOC_GUARD: Mutex<()> = Mutex::new(());

fn eager_cpu_facade(shape: Shape) -> FacadeTensor {
    FacadeTensor::new(
        UndeterminedTensor::new()
            .with_shape(Arc::new(shape))
            .with_dtype(DType::F32)
            .with_device(Arc::new(Device::cpu()))
            .with_is_lazy(false),
    )
}

#[test]
fn repeated_accessors_construct_the_impl_once() -> Result<()> {
    let _guard = ALLOC_GUARD.lock().unwrap();
    let facade = eager_cpu_facade(Shape::new([2, 4]));
    assert!(!facade.is_determined());

    let before = storage::allocation_count();
    assert_eq!(facade.ndim()?, 2);
    assert!(facade.is_determined());
    assert_eq!(facade.nelement()?, 8);
    assert_eq!(facade.dim(1)?, 4);
    assert!(!facade.is_cuda()?);
    assert_eq!(storage::allocation_count() - before, 1);

    // The cached determined tensor is reused, not rebuilt.
    let first = facade.determine()?;
    let second = facade.determine()?;
    assert!(Arc::ptr_eq(&first, &second));
    let storage_id = first.storage().expect("eager impl owns storage").id();
    assert_eq!(second.storage().unwrap().id(), storage_id);
    Ok(())
}

#[test]
fn concurrent_first_access_determines_exactly_once() -> Result<()> {
    let _guard = ALLOC_GUARD.lock().unwrap();
    let facade = Arc::new(eager_cpu_facade(Shape::new([16, 16])));
    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));

    let before = storage::allocation_count();
    let mut handles = Vec::new();
    for _ in 0..threads {
        let facade = Arc::clone(&facade);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            let determined = facade.determine().expect("determination succeeds");
            (facade.nelement().expect("nelement succeeds"), determined)
        }));
    }

    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("worker thread panicked"))
        .collect();

    assert_eq!(storage::allocation_count() - before, 1);
    let (_, winner) = &results[0];
    for (nelement, determined) in &results {
        assert_eq!(*nelement, 256);
        assert!(Arc::ptr_eq(determined, winner));
    }
    Ok(())
}

#[test]
fn failed_determination_leaves_the_facade_undetermined() {
    let _guard = ALLOC_GUARD.lock().unwrap();
    let facade = FacadeTensor::new(
        UndeterminedTensor::new()
            .with_shape(Arc::new(Shape::new([2])))
            .with_dtype(DType::F32),
    );

    let before = storage::allocation_count();
    let expected = Error::Value("device is not determined".to_string());
    assert_eq!(facade.ndim().unwrap_err(), expected);
    // The error repeats deterministically without consuming the placeholder.
    assert_eq!(facade.nelement().unwrap_err(), expected);
    assert!(!facade.is_determined());
    assert_eq!(storage::allocation_count() - before, 0);
}

#[test]
fn grad_metadata_flows_through_the_facade() -> Result<()> {
    let _guard = ALLOC_GUARD.lock().unwrap();
    let facade = eager_cpu_facade(Shape::new([3]));
    assert!(facade.grad_fn_node()?.is_none());
    assert!(facade.acc_grad()?.is_none());

    let determined = facade.determine()?;
    determined.set_grad_fn_node(Arc::new(FunctionNode::new("add_backward")));

    let node = facade.grad_fn_node()?.expect("node was just attached");
    assert_eq!(node.name(), "add_backward");

    let grad = eager_cpu_facade(Shape::new([3])).determine()?;
    determined.set_acc_grad(grad);
    assert!(facade.acc_grad()?.is_some());
    Ok(())
}

#[test]
fn from_determined_starts_determined() -> Result<()> {
    let _guard = ALLOC_GUARD.lock().unwrap();
    let determined = UndeterminedTensor::new()
        .with_shape(Arc::new(Shape::new([2])))
        .with_dtype(DType::I32)
        .with_device(Arc::new(Device::cpu()))
        .with_is_lazy(true)
        .determine_and_destroy()?;
    let facade = FacadeTensor::from_determined(determined);
    assert!(facade.is_determined());
    assert_eq!(facade.nelement()?, 2);
    Ok(())
}
