//! Observer registration and delivery.
//!
//! An observer subscribes to one or more phases by marker type:
//!
//! ```
//! use statesplice_controller::hooks::HooksAPI;
//! use statesplice_controller::hooks::events::SpliceEvent;
//! use statesplice_controller::hooks::schedule::{OnInjection, OnResume};
//!
//! let hooks = HooksAPI::new();
//! hooks
//!     .register_observer::<(OnInjection, OnResume), _>("tracker", |event: &SpliceEvent| {
//!         tracing::info!(%event, "detour");
//!     })
//!     .unwrap();
//! ```

use core::fmt;

use parking_lot::RwLock;
use thiserror::Error;

use super::events::SpliceEvent;
use super::schedule::{IntoPhaseSet, PhaseSet};

/// Errors raised while registering an observer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookRegistrationError {
    /// An observer with this name is already registered.
    #[error("observer '{name}' is already registered")]
    DuplicateName {
        /// The duplicate observer name.
        name: String,
    },

    /// The observer subscribes to no phase and would never run.
    #[error("observer '{name}' subscribes to no phase")]
    NoPhases {
        /// The observer name.
        name: String,
    },
}

struct Observer {
    name: String,
    phases: PhaseSet,
    handler: Box<dyn Fn(&SpliceEvent) + Send + Sync>,
}

/// Named splice observers, each subscribed to a [`PhaseSet`].
///
/// Registration and delivery both go through an internal [`RwLock`], so the
/// API can be shared between the injector and the controllers it starts.
#[derive(Default)]
pub struct HooksAPI {
    observers: RwLock<Vec<Observer>>,
}

impl fmt::Debug for HooksAPI {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let observers = self.observers.read();
        f.debug_map()
            .entries(observers.iter().map(|observer| (&observer.name, observer.phases)))
            .finish()
    }
}

impl HooksAPI {
    /// Creates an API with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `name` for the phases named by `S`.
    ///
    /// # Errors
    ///
    /// - [`HookRegistrationError::DuplicateName`] if `name` is taken
    /// - [`HookRegistrationError::NoPhases`] if `S` names no phase
    pub fn register_observer<S, F>(
        &self,
        name: impl Into<String>,
        handler: F,
    ) -> Result<&Self, HookRegistrationError>
    where
        S: IntoPhaseSet,
        F: Fn(&SpliceEvent) + Send + Sync + 'static,
    {
        let name = name.into();
        let phases = S::phase_set();
        if phases.is_empty() {
            return Err(HookRegistrationError::NoPhases { name });
        }

        let mut observers = self.observers.write();
        if observers.iter().any(|observer| observer.name == name) {
            return Err(HookRegistrationError::DuplicateName { name });
        }
        tracing::debug!(observer = %name, ?phases, "registered splice observer");
        observers.push(Observer {
            name,
            phases,
            handler: Box::new(handler),
        });
        Ok(self)
    }

    /// Delivers `event` to every observer subscribed to its phase, in
    /// registration order.
    pub fn invoke(&self, event: &SpliceEvent) {
        let phase = event.phase();
        let observers = self.observers.read();
        for observer in observers.iter().filter(|observer| observer.phases.contains(phase)) {
            (observer.handler)(event);
        }
    }

    /// Names of the observers subscribed to the phase of `event`, in
    /// delivery order.
    #[must_use]
    pub fn subscribers(&self, event: &SpliceEvent) -> Vec<String> {
        let phase = event.phase();
        self.observers
            .read()
            .iter()
            .filter(|observer| observer.phases.contains(phase))
            .map(|observer| observer.name.clone())
            .collect()
    }
}
