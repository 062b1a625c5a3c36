//! Diagnostics hooks for splice activity.
//!
//! The controller reports every injection, generation and resume as a
//! [`SpliceEvent`]. Each event is logged through `tracing` and then delivered
//! to the observers subscribed to its [`Phase`](schedule::Phase).
//!
//! - **Phases** ([`schedule`]): the markers [`OnInjection`](schedule::OnInjection),
//!   [`OnGeneration`](schedule::OnGeneration) and [`OnResume`](schedule::OnResume)
//! - **Events** ([`events`]): the `SpliceEvent` enum
//! - **API** ([`api`]): registration and invocation
//!
//! Observers execute in registration order, synchronously, on the thread that
//! drives the host tick.

pub mod api;
pub mod events;
pub mod schedule;

pub use api::{HookRegistrationError, HooksAPI};
pub use events::SpliceEvent;
pub use schedule::{Phase, PhaseSet};
