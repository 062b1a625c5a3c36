//! Generation routines keyed by step name.
//!
//! The [`GeneratorRegistry`] holds the work each custom step performs when the
//! host arrives at it. It is filled while the splice set is being assembled and
//! only read afterwards.

use std::sync::Arc;

use indexmap::IndexMap;
use thiserror::Error;

use crate::graph::StepGraph;

/// Failure reported by a generation routine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct GenerationError {
    message: String,
}

impl GenerationError {
    /// Creates an error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for GenerationError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for GenerationError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Work performed when the host arrives at a custom step.
///
/// Implemented for any `Fn() -> Result<(), GenerationError>` closure;
/// [`GeneratorRegistry::register`] takes closures directly.
pub trait Generator: Send + Sync + 'static {
    /// Runs the generation routine to completion.
    ///
    /// # Errors
    ///
    /// Returns a [`GenerationError`] if generation fails.
    fn generate(&self) -> Result<(), GenerationError>;
}

impl<F> Generator for F
where
    F: Fn() -> Result<(), GenerationError> + Send + Sync + 'static,
{
    fn generate(&self) -> Result<(), GenerationError> {
        self()
    }
}

/// A declared custom step with no registered generator.
///
/// Reported by [`GeneratorRegistry::validate`]; not fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no generator registered for step '{step}'")]
pub struct MissingGenerator {
    /// The step name.
    pub step: String,
}

/// Result of checking a [`StepGraph`] against a [`GeneratorRegistry`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Custom steps with a generator, in registration order.
    pub covered: Vec<String>,
    /// Custom steps without one, in registration order.
    pub missing: Vec<MissingGenerator>,
}

impl ValidationReport {
    /// Returns true if every custom step has a generator.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Registry of generation routines.
#[derive(Clone, Default)]
pub struct GeneratorRegistry {
    generators: IndexMap<String, Arc<dyn Generator>>,
}

impl core::fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GeneratorRegistry")
            .field("generators", &self.names())
            .finish()
    }
}

impl GeneratorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            generators: IndexMap::new(),
        }
    }

    /// Registers a closure as the generator for `name`, replacing any
    /// earlier one.
    pub fn register<F>(&mut self, name: impl Into<String>, generator: F) -> &mut Self
    where
        F: Fn() -> Result<(), GenerationError> + Send + Sync + 'static,
    {
        self.register_generator(name, generator)
    }

    /// Registers the generator for `name`, replacing any earlier one.
    pub fn register_generator(
        &mut self,
        name: impl Into<String>,
        generator: impl Generator,
    ) -> &mut Self {
        let name = name.into();
        if self
            .generators
            .insert(name.clone(), Arc::new(generator))
            .is_some()
        {
            tracing::warn!(step = %name, "generator replaced by a later registration");
        }
        self
    }

    /// Returns the generator for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Generator> {
        self.generators.get(name).map(AsRef::as_ref)
    }

    /// Returns whether a generator is registered for `name`.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.generators.contains_key(name)
    }

    /// Returns the registered names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.generators.keys().map(String::as_str).collect()
    }

    /// Returns the number of registered generators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Partitions the custom steps of `graph` by generator coverage.
    ///
    /// Missing generators are logged as a single warning.
    #[must_use]
    pub fn validate(&self, graph: &StepGraph) -> ValidationReport {
        let mut report = ValidationReport::default();
        for custom in graph.customs() {
            let name = custom.step().name();
            if self.has(name) {
                report.covered.push(name.to_string());
            } else {
                report.missing.push(MissingGenerator {
                    step: name.to_string(),
                });
            }
        }

        if !report.is_complete() {
            let names: Vec<&str> = report.missing.iter().map(|m| m.step.as_str()).collect();
            tracing::warn!(steps = %names.join(", "), "generators not found");
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn last_registration_wins() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut registry = GeneratorRegistry::new();
        registry.register("X", || Err(GenerationError::new("stale")));
        let counter = Arc::clone(&hits);
        registry.register("X", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("X").map(|generator| generator.generate()), Some(Ok(())));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unknown_step_has_no_generator() {
        let mut registry = GeneratorRegistry::new();
        registry.register("X", || Err("out of memory".into()));
        assert!(registry.get("Y").is_none());
        assert!(!registry.has("Y"));
        let err = registry.get("X").unwrap().generate().unwrap_err();
        assert_eq!(err.message(), "out of memory");
    }

    #[test]
    fn trait_objects_register_like_closures() {
        struct Noop;
        impl Generator for Noop {
            fn generate(&self) -> Result<(), GenerationError> {
                Ok(())
            }
        }

        let mut registry = GeneratorRegistry::new();
        registry.register_generator("A", Noop).register("B", || Ok(()));
        assert_eq!(registry.names(), ["A", "B"]);
    }
}
