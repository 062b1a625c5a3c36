//! Error types for the controller and the injector.

use statesplice_bridge::BridgeError;
use statesplice_core::ConfigError;
use statesplice_graph::{GenerationError, StepError};
use thiserror::Error;

/// Errors raised by a pre-tick or post-tick hook.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// A generation routine failed. The host still points at `step`.
    #[error("generation failed for step '{step}': {source}")]
    Generation {
        /// The custom step whose routine failed.
        step: String,
        /// The routine's error.
        #[source]
        source: GenerationError,
    },

    /// A host field could not be read or written.
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// A resume target could not be resolved.
    #[error(transparent)]
    Steps(#[from] StepError),
}

/// Errors raised while starting an [`Injector`](crate::Injector).
#[derive(Debug, Error)]
pub enum InjectorError {
    /// The injector already started a controller.
    #[error("injector already started")]
    DuplicateInit,

    /// The splice declarations do not form a valid graph.
    #[error(transparent)]
    Steps(#[from] StepError),

    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
