//! Typed field access to an opaque host instance.
//!
//! `statesplice_bridge` is the only crate in statesplice that touches host
//! memory. Everything above it (the step graph, the generator registry and the
//! interception controller) talks to the host exclusively through the
//! [`HostBridge`] trait and never depends on the host's binary layout.
//!
//! # Core Concepts
//!
//! - [`Blittable`] - Fixed-layout value types that may cross the bridge
//! - [`HostLayout`] - Name-to-offset table, with the alternate-name rule
//! - [`RawBridge`] / [`RawInstance`] - The raw-memory implementation
//!
//! # Example
//!
//! ```
//! use statesplice_bridge::{HostBridge, HostLayout, RawBridge, RawInstance};
//!
//! #[repr(C)]
//! struct Loader {
//!     load_cursor: i32,
//!     load_state: i32,
//! }
//!
//! let layout = HostLayout::new()
//!     .with_field::<i32>("loadCursor", core::mem::offset_of!(Loader, load_cursor))
//!     .with_field::<i32>("NativeFieldInfoPtr_loadState", core::mem::offset_of!(Loader, load_state));
//! let bridge = RawBridge::new(layout);
//!
//! let mut loader = Loader { load_cursor: 3, load_state: 7 };
//! // SAFETY: the layout above mirrors `Loader` field for field.
//! let mut instance = unsafe { RawInstance::from_mut(&mut loader) };
//!
//! bridge.set(&mut instance, "loadState", 11_i32).unwrap();
//! assert_eq!(bridge.get::<i32>(&instance, "loadState").unwrap(), 11);
//! assert_eq!(bridge.get::<i32>(&instance, "loadCursor").unwrap(), 3);
//! ```

mod blittable;
mod error;
mod layout;
mod raw;

pub use blittable::Blittable;
pub use error::BridgeError;
pub use layout::{DEFAULT_ALTERNATE_PREFIX, FieldSlot, HostLayout};
pub use raw::{RawBridge, RawInstance};

/// Typed get/set access to named fields of a host instance.
///
/// Implementations decide how a field name maps onto the instance. The
/// controller is generic over this trait, so tests can substitute a bridge
/// over an ordinary Rust struct.
pub trait HostBridge {
    /// The host instance type, possibly borrowing host memory.
    type Instance<'i>;

    /// Reads `field` as a `T`.
    ///
    /// # Errors
    ///
    /// Returns a [`BridgeError`] if the field cannot be resolved or does not
    /// hold a `T`.
    fn get<T: Blittable>(&self, instance: &Self::Instance<'_>, field: &str) -> Result<T, BridgeError>;

    /// Writes `value` into `field`.
    ///
    /// # Errors
    ///
    /// Returns a [`BridgeError`] if the field cannot be resolved or does not
    /// hold a `T`.
    fn set<T: Blittable>(
        &self,
        instance: &mut Self::Instance<'_>,
        field: &str,
        value: T,
    ) -> Result<(), BridgeError>;
}
