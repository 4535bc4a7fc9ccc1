//! Generator subsystem contract: seeding, device dispatch, and the
//! process-wide defaults derived from the auto generator.

use anyhow::Result;
use flow_rs::error::Error;
use flow_rs::rng::{
    default_auto_generator, default_cpu_generator, default_cuda_generator,
    default_device_generator, make_auto_generator, make_device_generator, make_generator,
    make_generator_with_seed, manual_seed,
};
use flow_rs::DeviceKind;

const SEED_BOUND: u64 = 1 << 53;

#[test]
fn explicit_seed_becomes_the_current_seed() -> Result<()> {
    let generator = make_generator_with_seed("cpu", 42)?;
    assert_eq!(generator.current_seed(), 42);
    Ok(())
}

#[test]
fn seed_draws_fresh_53_bit_values() -> Result<()> {
    let generator = make_generator_with_seed("cpu", 0)?;

    let first = generator.seed();
    assert!(first < SEED_BOUND);
    assert_eq!(generator.current_seed(), first);

    let second = generator.seed();
    assert!(second < SEED_BOUND);
    assert_eq!(generator.current_seed(), second);
    assert_ne!(first, second, "two hardware draws colliding is negligible");
    Ok(())
}

#[test]
fn unknown_device_name_is_unimplemented_and_names_the_choices() {
    let err = make_generator("tpu").unwrap_err();
    assert!(matches!(err, Error::Unimplemented(_)));
    let message = err.to_string();
    for choice in ["cpu", "gpu", "auto"] {
        assert!(message.contains(choice), "message must name {choice:?}");
    }
}

#[test]
fn device_names_are_exact_matches() -> Result<()> {
    assert!(make_generator("CPU").is_err());
    assert!(make_generator(" cpu").is_err());
    let cuda = make_generator_with_seed("cuda", 7)?;
    let gpu = make_generator_with_seed("gpu", 7)?;
    assert_eq!(cuda.current_seed(), gpu.current_seed());
    Ok(())
}

#[test]
fn equal_seeds_replay_equal_draws() -> Result<()> {
    let a = make_device_generator(DeviceKind::Cpu, 1234);
    let b = make_device_generator(DeviceKind::Cpu, 1234);
    let draws_a: Vec<f64> = (0..4).map(|_| a.uniform_f64().unwrap()).collect();
    let draws_b: Vec<f64> = (0..4).map(|_| b.uniform_f64().unwrap()).collect();
    assert_eq!(draws_a, draws_b);

    // Reseeding rewinds the stream.
    a.set_current_seed(1234);
    let replay: Vec<f64> = (0..4).map(|_| a.uniform_f64().unwrap()).collect();
    assert_eq!(replay, draws_a);
    Ok(())
}

#[test]
fn auto_generator_seeds_children_and_reseeds_them() -> Result<()> {
    let auto = make_auto_generator(7);
    let cpu = auto.device_generator(DeviceKind::Cpu)?;
    assert_eq!(cpu.current_seed(), 7);

    // The child is cached, not recreated.
    let cpu_again = auto.device_generator(DeviceKind::Cpu)?;
    cpu.set_current_seed(21);
    assert_eq!(cpu_again.current_seed(), 21);

    // Reseeding the auto generator reaches every existing child; children
    // created afterwards inherit the new seed.
    auto.set_current_seed(99);
    assert_eq!(cpu.current_seed(), 99);
    let cuda = auto.device_generator(DeviceKind::Cuda)?;
    assert_eq!(cuda.current_seed(), 99);
    Ok(())
}

#[test]
fn device_generator_rejects_foreign_kinds() {
    let cpu = make_device_generator(DeviceKind::Cpu, 5);
    assert!(cpu.device_generator(DeviceKind::Cpu).is_ok());
    let err = cpu.device_generator(DeviceKind::Cuda).unwrap_err();
    assert!(matches!(err, Error::Value(_)));
}

#[test]
fn auto_generators_hold_no_draw_state() {
    let auto = make_auto_generator(3);
    assert!(auto.uniform_f64().is_err());
    assert!(auto
        .device_generator(DeviceKind::Cpu)
        .unwrap()
        .uniform_f64()
        .is_ok());
}

// The default generators are process-wide singletons, so every assertion
// about them lives in this single test to avoid cross-test interference.
#[test]
fn default_generators_are_views_over_the_auto_default() {
    let auto = default_auto_generator();
    let cpu = default_cpu_generator();
    let cuda = default_cuda_generator();

    // Reseeding the auto default reaches both derived defaults.
    manual_seed(4242);
    assert_eq!(auto.current_seed(), 4242);
    assert_eq!(cpu.current_seed(), 4242);
    assert_eq!(cuda.current_seed(), 4242);

    // Reseeding the CPU slice through the auto default is observable
    // through the CPU default, and leaves the CUDA slice alone.
    auto.device_generator(DeviceKind::Cpu)
        .expect("auto dispatch cannot fail")
        .set_current_seed(777);
    assert_eq!(cpu.current_seed(), 777);
    assert_eq!(cuda.current_seed(), 4242);

    assert_eq!(
        default_device_generator(DeviceKind::Cpu).current_seed(),
        777
    );
    assert_eq!(
        default_device_generator(DeviceKind::Cuda).current_seed(),
        4242
    );
}
