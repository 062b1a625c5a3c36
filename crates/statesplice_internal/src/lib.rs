//! # Statesplice Internal Library
//!
//! Re-exports the statesplice crates for convenience.

/// Typed host field access.
pub use statesplice_bridge;

/// Configuration and tracing setup.
pub use statesplice_core;

/// Step model and generator registry.
pub use statesplice_graph;

/// Interception controller and injector.
pub use statesplice_controller;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use statesplice_bridge::{
        Blittable, BridgeError, HostBridge, HostLayout, RawBridge, RawInstance,
    };
    pub use statesplice_controller::hooks::schedule::{OnGeneration, OnInjection, OnResume};
    pub use statesplice_controller::hooks::{HooksAPI, Phase, SpliceEvent};
    pub use statesplice_controller::{
        ControllerError, Declarations, Injector, InjectorError, InterceptionController,
        PostTickOutcome, PreTickOutcome, SpliceSet,
    };
    pub use statesplice_core::{HostFields, SpliceConfig, TracingSetup};
    pub use statesplice_graph::{
        GenerationError, Generator, GeneratorRegistry, HostEnum, NativeSteps, StepError,
        StepGraph,
    };
}
