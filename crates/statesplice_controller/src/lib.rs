//! Interception controller for statesplice.
//!
//! The controller hooks the host's tick update on both sides and steers the
//! host through custom steps without the host noticing:
//!
//! - [`Injector`] - Startup context; collects splices and starts a controller
//! - [`InterceptionController`] - The pre-tick and post-tick phases
//! - [`HostSnapshot`] - Host fields read at the start of a phase, and the guard
//! - [`hooks`] - Observers for injection, generation and resume events
//!
//! # Example
//!
//! ```
//! use statesplice_bridge::{HostLayout, RawBridge, RawInstance};
//! use statesplice_controller::{Injector, PostTickOutcome, PreTickOutcome};
//! use statesplice_graph::NativeSteps;
//!
//! #[repr(C)]
//! struct Loader {
//!     cursor: i32,
//!     state: i32,
//!     generate: bool,
//!     busy: bool,
//!     done: bool,
//! }
//!
//! let layout = HostLayout::new()
//!     .with_field::<i32>("loadCursor", core::mem::offset_of!(Loader, cursor))
//!     .with_field::<i32>("loadState", core::mem::offset_of!(Loader, state))
//!     .with_field::<bool>("generateNew", core::mem::offset_of!(Loader, generate))
//!     .with_field::<bool>("loadingOperationActive", core::mem::offset_of!(Loader, busy))
//!     .with_field::<bool>("subOperationDone", core::mem::offset_of!(Loader, done));
//!
//! let mut injector = Injector::new(NativeSteps::new(["Setup", "Terrain", "Finish"]).unwrap());
//! injector
//!     .register("Rivers", "Setup")
//!     .generator("Rivers", || Ok(()));
//! let controller = injector.start(RawBridge::new(layout)).unwrap();
//!
//! let mut loader = Loader { cursor: 1, state: 0, generate: true, busy: false, done: false };
//! // SAFETY: the layout above mirrors `Loader` field for field.
//! let mut instance = unsafe { RawInstance::from_mut(&mut loader) };
//!
//! // The host has just moved to `Setup`; the controller redirects it to `Rivers`.
//! let post = controller.post_tick(&mut instance).unwrap();
//! assert!(matches!(post, PostTickOutcome::Injected { .. }));
//!
//! // Next tick: `Rivers` is generated and the host resumes from `Setup`.
//! let pre = controller.pre_tick(&mut instance).unwrap();
//! assert!(matches!(pre, PreTickOutcome::Detoured { .. }));
//! drop(instance);
//! assert_eq!((loader.state, loader.cursor), (0, 0));
//! ```

pub mod hooks;

mod controller;
mod error;
mod host;
mod injector;

pub use controller::{InterceptionController, PostTickOutcome, PreTickOutcome, TickOutcome};
pub use error::{ControllerError, InjectorError};
pub use host::{GuardSkip, HostSnapshot};
pub use injector::{Declarations, Injector, SpliceSet};
