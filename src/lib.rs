//! Splice custom steps into a host's fixed, tick-driven state machine.
//!

pub use statesplice_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use statesplice_internal::prelude::*;
}
