//! Step data model and generator registry for statesplice.
//!
//! A host runs a fixed, linear sequence of steps identified by ordinal. This
//! crate models that sequence together with the custom steps spliced into it:
//!
//! - [`NativeSteps`] - The host's own enumeration (ordinal = index)
//! - [`StepGraph`] - Native steps plus registered [`CustomStep`]s
//! - [`StepGraphBuilder`] - Builds a graph from declarations in any order
//! - [`GeneratorRegistry`] - Generation routines keyed by step name
//!
//! The graph owns every step. Only the resume target of a custom step changes
//! after construction, and it sits behind a lock so a built graph can be shared
//! through an `Arc`.
//!
//! # Example
//!
//! ```
//! use statesplice_graph::{GeneratorRegistry, NativeSteps, StepGraph};
//!
//! let mut graph = StepGraph::new(NativeSteps::new(["Setup", "Terrain", "Finish"]).unwrap());
//! graph.register("Rivers", "Terrain").unwrap();
//!
//! let mut generators = GeneratorRegistry::new();
//! generators.register("Rivers", || Ok(()));
//!
//! assert!(generators.validate(&graph).is_complete());
//! ```

mod builder;
mod error;
mod graph;
mod native;
mod registry;
mod step;

pub use builder::StepGraphBuilder;
pub use error::StepError;
pub use graph::StepGraph;
pub use native::{HostEnum, NativeSteps};
pub use registry::{
    GenerationError, Generator, GeneratorRegistry, MissingGenerator, ValidationReport,
};
pub use step::{CustomStep, Ordinal, Step};
