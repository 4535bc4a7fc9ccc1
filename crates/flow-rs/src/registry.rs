//! Explicit functor registry assembled at startup.
//!
//! Registries are plain objects built from an explicit entry list; nothing
//! registers itself through static-initialization side effects.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::tensor::FacadeTensor;

/// Boxed functor signature: tensors in, tensor out.
pub type FunctorFn = dyn Fn(&[&FacadeTensor]) -> Result<FacadeTensor> + Send + Sync;

/// Named functor stored in a registry.
#[derive(Clone)]
pub struct PackedFunctor {
    name: String,
    func: Arc<FunctorFn>,
}

// The boxed functor has no useful Debug form, so only the name is shown.
impl fmt::Debug for PackedFunctor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackedFunctor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl PackedFunctor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[&FacadeTensor]) -> Result<FacadeTensor> {
        (self.func)(args)
    }
}

/// Lookup table from functor names to implementations.
#[derive(Default)]
pub struct FunctorRegistry {
    functors: HashMap<String, PackedFunctor>,
}

impl FunctorRegistry {
    pub fn new() -> Self {
        FunctorRegistry::default()
    }

    /// Builds a registry from an explicit list of entries.
    pub fn with_entries(
        entries: impl IntoIterator<Item = (&'static str, Arc<FunctorFn>)>,
    ) -> Self {
        let mut registry = FunctorRegistry::new();
        for (name, func) in entries {
            registry.add_functor(name, func);
        }
        registry
    }

    /// Registers a functor under `name`, replacing any previous entry.
    pub fn add_functor(&mut self, name: impl Into<String>, func: Arc<FunctorFn>) {
        let name = name.into();
        self.functors.insert(
            name.clone(),
            PackedFunctor { name, func },
        );
    }

    /// Looks up a functor, failing with a value error for unknown names.
    pub fn find(&self, name: &str) -> Result<&PackedFunctor> {
        self.functors
            .get(name)
            .ok_or_else(|| Error::Value(format!("no functor registered under name {name:?}")))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{FunctorFn, FunctorRegistry};
    use crate::error::Error;
    use crate::ops::{constant_full, ConstantOperand};
    use crate::tensor::{DType, Device, Shape};

    fn ones_like() -> Arc<FunctorFn> {
        Arc::new(|args: &[&crate::tensor::FacadeTensor]| {
            let determined = args[0].determine()?;
            constant_full(
                Arc::clone(determined.shape()),
                determined.dtype(),
                Arc::new(Device::cpu()),
                ConstantOperand::Int(1),
            )
        })
    }

    #[test]
    fn registered_functor_round_trips_through_find() {
        let registry = FunctorRegistry::with_entries([("ones_like", ones_like())]);
        let input = constant_full(
            Arc::new(Shape::new([2, 3])),
            DType::I32,
            Arc::new(Device::cpu()),
            ConstantOperand::Int(9),
        )
        .unwrap();

        let functor = registry.find("ones_like").unwrap();
        assert_eq!(functor.name(), "ones_like");
        let output = functor.call(&[&input]).unwrap();
        assert_eq!(output.nelement().unwrap(), 6);
    }

    #[test]
    fn packed_functor_debug_shows_the_name() {
        let registry = FunctorRegistry::with_entries([("ones_like", ones_like())]);
        let rendered = format!("{:?}", registry.find("ones_like"));
        assert!(rendered.contains("ones_like"));
    }

    #[test]
    fn unknown_name_is_a_value_error() {
        let registry = FunctorRegistry::new();
        let err = registry.find("missing_op").unwrap_err();
        assert!(matches!(err, Error::Value(_)));
    }
}
