//! Events delivered to splice observers.

use core::fmt;
use core::time::Duration;

use statesplice_graph::{GenerationError, Step};

use super::schedule::Phase;

/// Unified event enum for all splice hooks.
///
/// All observers receive `&SpliceEvent` and match on the variants they care
/// about.
#[derive(Debug, Clone, PartialEq)]
pub enum SpliceEvent {
    /// The host was redirected into a custom step.
    Injected {
        /// The custom step the host now points at.
        step: Step,
        /// The step the host had just transitioned to.
        after: Step,
        /// Where the host will resume once the detour completes.
        resume: Step,
    },

    /// A generation routine is about to run.
    GenerationStart {
        /// The custom step being generated.
        step: Step,
    },

    /// A generation routine finished successfully.
    GenerationComplete {
        /// The custom step that was generated.
        step: Step,
        /// How long the routine ran.
        duration: Duration,
    },

    /// A generation routine returned an error.
    GenerationFailed {
        /// The custom step being generated.
        step: Step,
        /// The routine's error.
        error: GenerationError,
    },

    /// The host arrived at a custom step with no generator.
    MissingGenerator {
        /// The custom step.
        step: Step,
    },

    /// The host was sent back to its resume target.
    Resumed {
        /// The custom step the detour started at.
        step: Step,
        /// The step the host now points at.
        resume: Step,
        /// The host cursor after compensation.
        cursor: i32,
    },
}

impl SpliceEvent {
    /// Returns the phase observers subscribe to for this event.
    #[must_use]
    pub fn phase(&self) -> Phase {
        match self {
            SpliceEvent::Injected { .. } => Phase::Injection,
            SpliceEvent::GenerationStart { .. }
            | SpliceEvent::GenerationComplete { .. }
            | SpliceEvent::GenerationFailed { .. }
            | SpliceEvent::MissingGenerator { .. } => Phase::Generation,
            SpliceEvent::Resumed { .. } => Phase::Resume,
        }
    }

    /// Returns the custom step the event concerns.
    #[must_use]
    pub fn step(&self) -> &Step {
        match self {
            SpliceEvent::Injected { step, .. }
            | SpliceEvent::GenerationStart { step }
            | SpliceEvent::GenerationComplete { step, .. }
            | SpliceEvent::GenerationFailed { step, .. }
            | SpliceEvent::MissingGenerator { step }
            | SpliceEvent::Resumed { step, .. } => step,
        }
    }
}

impl fmt::Display for SpliceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpliceEvent::Injected {
                step,
                after,
                resume,
            } => write!(f, "Injected({step} after {after}, resume: {resume})"),
            SpliceEvent::GenerationStart { step } => write!(f, "GenerationStart({step})"),
            SpliceEvent::GenerationComplete { step, duration } => {
                write!(f, "GenerationComplete({step}, duration: {duration:?})")
            }
            SpliceEvent::GenerationFailed { step, error } => {
                write!(f, "GenerationFailed({step}, error: {error})")
            }
            SpliceEvent::MissingGenerator { step } => write!(f, "MissingGenerator({step})"),
            SpliceEvent::Resumed {
                step,
                resume,
                cursor,
            } => write!(f, "Resumed({step} -> {resume}, cursor: {cursor})"),
        }
    }
}
