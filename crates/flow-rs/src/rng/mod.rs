//! Per-device random generator state, factories, and process-wide defaults.
//!
//! Generators feed reproducible stochastic initialization of eager tensors.
//! An auto generator dispatches to lazily-created per-device sub-generators;
//! the process defaults for CPU and CUDA are views over the default auto
//! generator's per-device slices, not independently seeded state.

mod impls;

use std::sync::Arc;

use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{Error, Result};
use crate::tensor::DeviceKind;

use impls::{AutoGeneratorImpl, DeviceGeneratorImpl};

const SEED_MASK_53_BITS: u64 = (1 << 53) - 1;

/// Draws a fresh non-deterministic seed from the OS, masked to 53 bits so
/// the value is exactly representable in a double-precision significand.
pub(crate) fn non_deterministic_seed() -> u64 {
    let hi = u64::from(OsRng.next_u32());
    let lo = u64::from(OsRng.next_u32());
    ((hi << 32) + lo) & SEED_MASK_53_BITS
}

#[derive(Debug, Clone)]
enum GeneratorRef {
    Auto(Arc<AutoGeneratorImpl>),
    Device(Arc<DeviceGeneratorImpl>),
}

/// Stateful pseudo-random source keyed by device and seed.
///
/// Cloning a generator shares its state; two clones observe the same seed
/// and draw from the same stream.
#[derive(Debug, Clone)]
pub struct Generator {
    impl_: GeneratorRef,
}

impl Generator {
    fn auto(impl_: Arc<AutoGeneratorImpl>) -> Self {
        Generator {
            impl_: GeneratorRef::Auto(impl_),
        }
    }

    fn device(impl_: Arc<DeviceGeneratorImpl>) -> Self {
        Generator {
            impl_: GeneratorRef::Device(impl_),
        }
    }

    /// Active seed of the underlying impl.
    pub fn current_seed(&self) -> u64 {
        match &self.impl_ {
            GeneratorRef::Auto(g) => g.current_seed(),
            GeneratorRef::Device(g) => g.current_seed(),
        }
    }

    /// Reseeds deterministically; on an auto generator every existing
    /// per-device child is reseeded as well.
    pub fn set_current_seed(&self, seed: u64) {
        match &self.impl_ {
            GeneratorRef::Auto(g) => g.set_current_seed(seed),
            GeneratorRef::Device(g) => g.set_current_seed(seed),
        }
    }

    /// Draws a fresh non-deterministic 53-bit seed, installs it as the
    /// current seed, and returns it.
    pub fn seed(&self) -> u64 {
        let seed = non_deterministic_seed();
        self.set_current_seed(seed);
        seed
    }

    /// Resolves the generator for `kind`.
    ///
    /// On an auto generator this returns (creating if needed) the per-device
    /// child; on a device generator it returns the generator itself when the
    /// kind matches and fails otherwise.
    pub fn device_generator(&self, kind: DeviceKind) -> Result<Generator> {
        Ok(Generator::device(self.resolve_device(kind)?))
    }

    pub(crate) fn resolve_device(&self, kind: DeviceKind) -> Result<Arc<DeviceGeneratorImpl>> {
        match &self.impl_ {
            GeneratorRef::Auto(g) => Ok(g.device_generator(kind)),
            GeneratorRef::Device(g) if g.kind() == kind => Ok(Arc::clone(g)),
            GeneratorRef::Device(g) => Err(Error::Value(format!(
                "generator is bound to {:?} and cannot produce {:?} state",
                g.kind(),
                kind
            ))),
        }
    }

    /// Draws a uniform value in `[0, 1)` from a device generator.
    ///
    /// Auto generators hold no draw state of their own; resolve a device
    /// generator first.
    pub fn uniform_f64(&self) -> Result<f64> {
        match &self.impl_ {
            GeneratorRef::Device(g) => Ok(g.uniform_f64()),
            GeneratorRef::Auto(_) => Err(Error::Value(
                "auto generator has no draw state; resolve a device generator first".to_string(),
            )),
        }
    }
}

/// Builds an auto generator with the given seed.
pub fn make_auto_generator(seed: u64) -> Generator {
    Generator::auto(Arc::new(AutoGeneratorImpl::new(seed)))
}

/// Builds a generator for a specific device kind with the given seed.
pub fn make_device_generator(kind: DeviceKind, seed: u64) -> Generator {
    Generator::device(Arc::new(DeviceGeneratorImpl::new(kind, seed)))
}

/// Builds a generator for a device name, seeded non-deterministically.
pub fn make_generator(device: &str) -> Result<Generator> {
    make_generator_with_seed(device, non_deterministic_seed())
}

/// Builds a generator for a device name with an explicit seed.
///
/// Device names are case-sensitive exact matches; anything other than
/// "cpu", "cuda"/"gpu", or "auto" is rejected.
pub fn make_generator_with_seed(device: &str, seed: u64) -> Result<Generator> {
    match device {
        "cpu" => Ok(make_device_generator(DeviceKind::Cpu, seed)),
        "cuda" | "gpu" => Ok(make_device_generator(DeviceKind::Cuda, seed)),
        "auto" => Ok(make_auto_generator(seed)),
        other => Err(Error::Unimplemented(format!(
            "invalid device {other} for making generator, please make sure the device is one of \
             \"cpu\", \"gpu\" and \"auto\""
        ))),
    }
}

static DEFAULT_AUTO_GENERATOR: Lazy<Generator> =
    Lazy::new(|| make_auto_generator(non_deterministic_seed()));

static DEFAULT_CPU_GENERATOR: Lazy<Generator> = Lazy::new(|| {
    Generator::device(default_auto_generator_impl().device_generator(DeviceKind::Cpu))
});

static DEFAULT_CUDA_GENERATOR: Lazy<Generator> = Lazy::new(|| {
    Generator::device(default_auto_generator_impl().device_generator(DeviceKind::Cuda))
});

fn default_auto_generator_impl() -> Arc<AutoGeneratorImpl> {
    match &DEFAULT_AUTO_GENERATOR.impl_ {
        GeneratorRef::Auto(g) => Arc::clone(g),
        GeneratorRef::Device(_) => unreachable!("default auto generator is always auto"),
    }
}

/// Process-wide default auto generator, initialized on first access and
/// alive until process exit.
pub fn default_auto_generator() -> Generator {
    DEFAULT_AUTO_GENERATOR.clone()
}

/// Process-wide default CPU generator: a view over the default auto
/// generator's CPU slice.
pub fn default_cpu_generator() -> Generator {
    DEFAULT_CPU_GENERATOR.clone()
}

/// Process-wide default CUDA generator: a view over the default auto
/// generator's CUDA slice.
pub fn default_cuda_generator() -> Generator {
    DEFAULT_CUDA_GENERATOR.clone()
}

/// Default generator for a device kind.
pub fn default_device_generator(kind: DeviceKind) -> Generator {
    match kind {
        DeviceKind::Cpu => default_cpu_generator(),
        DeviceKind::Cuda => default_cuda_generator(),
    }
}

/// Seeds the default auto generator, and through it every default
/// per-device generator already created.
pub fn manual_seed(seed: u64) {
    default_auto_generator().set_current_seed(seed);
}
