//! Seed/state objects behind the public [`Generator`](super::Generator) handle.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::tensor::DeviceKind;

#[derive(Debug)]
struct DeviceGeneratorState {
    seed: u64,
    rng: StdRng,
}

/// Random state for one device kind. Seed mutation and draws serialize on
/// the state mutex.
#[derive(Debug)]
pub(crate) struct DeviceGeneratorImpl {
    kind: DeviceKind,
    state: Mutex<DeviceGeneratorState>,
}

impl DeviceGeneratorImpl {
    pub(crate) fn new(kind: DeviceKind, seed: u64) -> Self {
        DeviceGeneratorImpl {
            kind,
            state: Mutex::new(DeviceGeneratorState {
                seed,
                rng: StdRng::seed_from_u64(seed),
            }),
        }
    }

    pub(crate) fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub(crate) fn current_seed(&self) -> u64 {
        self.state.lock().unwrap().seed
    }

    /// Reseeds deterministically: the same seed replays the same draws.
    pub(crate) fn set_current_seed(&self, seed: u64) {
        let mut state = self.state.lock().unwrap();
        state.seed = seed;
        state.rng = StdRng::seed_from_u64(seed);
    }

    /// Draws a uniform value in `[0, 1)`.
    pub(crate) fn uniform_f64(&self) -> f64 {
        self.state.lock().unwrap().rng.gen::<f64>()
    }
}

#[derive(Debug)]
struct AutoState {
    seed: u64,
    children: HashMap<DeviceKind, Arc<DeviceGeneratorImpl>>,
}

/// Dispatcher that lazily creates one sub-generator per device kind.
///
/// Children inherit the auto seed at creation time; reseeding the auto
/// generator reseeds every child that already exists.
#[derive(Debug)]
pub(crate) struct AutoGeneratorImpl {
    state: Mutex<AutoState>,
}

impl AutoGeneratorImpl {
    pub(crate) fn new(seed: u64) -> Self {
        AutoGeneratorImpl {
            state: Mutex::new(AutoState {
                seed,
                children: HashMap::new(),
            }),
        }
    }

    pub(crate) fn current_seed(&self) -> u64 {
        self.state.lock().unwrap().seed
    }

    pub(crate) fn set_current_seed(&self, seed: u64) {
        let mut state = self.state.lock().unwrap();
        state.seed = seed;
        for child in state.children.values() {
            child.set_current_seed(seed);
        }
    }

    /// Returns the per-device child, creating it on first request.
    pub(crate) fn device_generator(&self, kind: DeviceKind) -> Arc<DeviceGeneratorImpl> {
        let mut state = self.state.lock().unwrap();
        let seed = state.seed;
        Arc::clone(
            state
                .children
                .entry(kind)
                .or_insert_with(|| Arc::new(DeviceGeneratorImpl::new(kind, seed))),
        )
    }
}
