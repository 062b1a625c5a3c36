//! Configuration and logging setup for statesplice.
//!
//! - [`SpliceConfig`] - JSON startup configuration and the textual step list
//! - [`HostFields`] - Names of the host fields the controller touches
//! - [`TracingSetup`] - Installs the `tracing` subscriber

pub mod config;
pub mod tracing_setup;

pub use config::{ConfigError, HostFields, SpliceConfig, SpliceEntry, parse_step_list};
pub use tracing_setup::{TracingFormat, TracingSetup};
