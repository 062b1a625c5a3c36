//! Error types for step registration and lookup.

use thiserror::Error;

/// Errors raised while building or querying a [`StepGraph`](crate::StepGraph).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    /// A step name resolves to neither a custom nor a native step.
    #[error("step '{name}' is not defined")]
    Lookup {
        /// The unresolved name.
        name: String,
    },

    /// A step name is already taken by a native or custom step.
    #[error("step '{name}' is already defined")]
    DuplicateStep {
        /// The duplicate name.
        name: String,
    },

    /// Another custom step is already spliced after the same target.
    #[error("cannot splice '{step}' after '{after}': '{existing}' is already spliced there")]
    ForkedSplice {
        /// The rejected step.
        step: String,
        /// The shared `after` target.
        after: String,
        /// The step already occupying that position.
        existing: String,
    },

    /// Declarations reference each other without reaching a native step.
    #[error("custom steps form a cycle: {}", steps.join(", "))]
    Cycle {
        /// The declarations that could not be ordered.
        steps: Vec<String>,
    },

    /// The step's ordinal would not fit the host's 32-bit state value.
    #[error("no ordinal left for step '{step}'")]
    OrdinalOverflow {
        /// The step that could not be numbered.
        step: String,
    },

    /// The host enumeration has no steps.
    #[error("native step list is empty")]
    EmptyNativeSteps,

    /// Walking the after-chain exceeded the number of custom steps.
    #[error("resolving the resume target of '{step}' exceeded depth {limit}")]
    ResolutionDepthExceeded {
        /// The step being resolved.
        step: String,
        /// The depth limit.
        limit: usize,
    },
}

impl StepError {
    /// Creates a [`Lookup`](Self::Lookup).
    pub fn lookup(name: impl Into<String>) -> Self {
        Self::Lookup { name: name.into() }
    }

    /// Creates a [`DuplicateStep`](Self::DuplicateStep).
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateStep { name: name.into() }
    }
}
