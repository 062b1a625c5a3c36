//! Field layout tables for opaque host instances.
//!
//! The host's binary layout is never inferred. A [`HostLayout`] is built from
//! known offsets, typically `core::mem::offset_of!` on a `#[repr(C)]` mirror
//! of the host type, or offsets recovered from the host's interop metadata.
//!
//! # Naming
//!
//! Interop layers commonly expose a field twice: under its plain name and
//! under a generated alias carrying a fixed prefix (for example
//! `NativeFieldInfoPtr_loadState`). [`HostLayout::resolve`] tries the plain name
//! first and the prefixed alias second.

use hashbrown::HashMap;

use crate::blittable::Blittable;
use crate::error::BridgeError;

/// Prefix used by the host's interop layer for generated field aliases.
pub const DEFAULT_ALTERNATE_PREFIX: &str = "NativeFieldInfoPtr_";

/// Location and width of one field inside a host instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSlot {
    /// Byte offset from the instance base.
    pub offset: usize,
    /// Width in bytes.
    pub size: usize,
}

impl FieldSlot {
    /// Creates a slot for a field of type `T` at `offset`.
    #[must_use]
    pub fn of<T: Blittable>(offset: usize) -> Self {
        Self {
            offset,
            size: T::SIZE,
        }
    }

    /// Returns the offset one past the last byte of the field, or `None` if
    /// it does not fit in `usize`.
    #[must_use]
    pub fn end(&self) -> Option<usize> {
        self.offset.checked_add(self.size)
    }
}

/// Name-to-slot table describing a host type.
///
/// # Example
///
/// ```
/// use statesplice_bridge::{FieldSlot, HostLayout};
///
/// #[repr(C)]
/// struct Loader {
///     load_cursor: i32,
///     load_state: i32,
/// }
///
/// let layout = HostLayout::new()
///     .with_field::<i32>("loadCursor", core::mem::offset_of!(Loader, load_cursor))
///     .with_field::<i32>("loadState", core::mem::offset_of!(Loader, load_state));
///
/// assert_eq!(layout.resolve("loadState").unwrap(), FieldSlot::of::<i32>(4));
/// ```
#[derive(Debug, Clone)]
pub struct HostLayout {
    fields: HashMap<String, FieldSlot>,
    alternate_prefix: String,
}

impl Default for HostLayout {
    fn default() -> Self {
        Self {
            fields: HashMap::new(),
            alternate_prefix: DEFAULT_ALTERNATE_PREFIX.to_string(),
        }
    }
}

impl HostLayout {
    /// Creates an empty layout using [`DEFAULT_ALTERNATE_PREFIX`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the prefix used for alternate field names.
    #[must_use]
    pub fn with_alternate_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.alternate_prefix = prefix.into();
        self
    }

    /// Adds a field of type `T` at `offset` and returns self for chaining.
    #[must_use]
    pub fn with_field<T: Blittable>(mut self, name: impl Into<String>, offset: usize) -> Self {
        self.insert(name, FieldSlot::of::<T>(offset));
        self
    }

    /// Adds or replaces a field slot.
    pub fn insert(&mut self, name: impl Into<String>, slot: FieldSlot) {
        self.fields.insert(name.into(), slot);
    }

    /// Returns the alternate-name prefix.
    #[must_use]
    pub fn alternate_prefix(&self) -> &str {
        &self.alternate_prefix
    }

    /// Returns the alternate name tried for `field`.
    #[must_use]
    pub fn alternate_name(&self, field: &str) -> String {
        format!("{}{}", self.alternate_prefix, field)
    }

    /// Resolves a field name to its slot.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::FieldNotFound`] if neither the direct name nor the
    /// alternate name is present.
    pub fn resolve(&self, field: &str) -> Result<FieldSlot, BridgeError> {
        if let Some(slot) = self.fields.get(field) {
            return Ok(*slot);
        }
        let alternate = self.alternate_name(field);
        match self.fields.get(&alternate) {
            Some(slot) => {
                tracing::trace!(field, alternate = %alternate, "resolved field via alternate name");
                Ok(*slot)
            }
            None => Err(BridgeError::field_not_found(field, alternate)),
        }
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the layout has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the smallest instance size that contains every field.
    ///
    /// `None` if some field ends beyond `usize::MAX`.
    #[must_use]
    pub fn extent(&self) -> Option<usize> {
        self.fields
            .values()
            .try_fold(0, |extent, slot| slot.end().map(|end| extent.max(end)))
    }
}
