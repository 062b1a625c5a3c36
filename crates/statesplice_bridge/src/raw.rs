//! Raw-memory implementation of [`HostBridge`].
//!
//! This module is the only place in statesplice that dereferences host
//! memory. Every access is checked against the layout slot width and the
//! instance size before any pointer arithmetic happens.

use core::marker::PhantomData;
use core::ptr::NonNull;

use crate::blittable::Blittable;
use crate::error::BridgeError;
use crate::layout::{FieldSlot, HostLayout};
use crate::HostBridge;

/// A borrowed view of a host instance's memory.
///
/// Holds a base pointer and the number of bytes that may be read and written
/// from it. The lifetime ties the view to the borrow it was created from.
#[derive(Debug)]
pub struct RawInstance<'a> {
    base: NonNull<u8>,
    size: usize,
    _marker: PhantomData<&'a mut [u8]>,
}

impl<'a> RawInstance<'a> {
    /// Creates a view over a plain byte buffer.
    #[must_use]
    pub fn from_bytes(bytes: &'a mut [u8]) -> Self {
        Self {
            base: NonNull::from(&mut *bytes).cast::<u8>(),
            size: bytes.len(),
            _marker: PhantomData,
        }
    }

    /// Creates a view over a typed host value.
    ///
    /// # Safety
    ///
    /// Every field written through this view must be described by a layout
    /// whose offsets and widths match fields of `T` of the same type, so that
    /// each write leaves `T` holding a valid value.
    #[must_use]
    pub unsafe fn from_mut<T>(value: &'a mut T) -> Self {
        Self {
            base: NonNull::from(value).cast::<u8>(),
            size: core::mem::size_of::<T>(),
            _marker: PhantomData,
        }
    }

    /// Creates a view from a raw pointer handed over by the host.
    ///
    /// Returns `None` for a null pointer.
    ///
    /// # Safety
    ///
    /// `base` must be valid for reads and writes of `size` bytes for `'a`, and
    /// no other reference may access that memory while the view is alive.
    #[must_use]
    pub unsafe fn from_raw_parts(base: *mut u8, size: usize) -> Option<Self> {
        NonNull::new(base).map(|base| Self {
            base,
            size,
            _marker: PhantomData,
        })
    }

    /// Returns the number of addressable bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    fn check(&self, field: &str, slot: FieldSlot) -> Result<(), BridgeError> {
        if slot.end().is_none_or(|end| end > self.size) {
            return Err(BridgeError::OutOfBounds {
                field: field.to_string(),
                offset: slot.offset,
                size: slot.size,
                instance_size: self.size,
            });
        }
        Ok(())
    }
}

/// [`HostBridge`] that reads and writes fields at layout offsets.
#[derive(Debug, Clone, Default)]
pub struct RawBridge {
    layout: HostLayout,
}

impl RawBridge {
    /// Creates a bridge for the given layout.
    #[must_use]
    pub fn new(layout: HostLayout) -> Self {
        Self { layout }
    }

    /// Returns the layout.
    #[must_use]
    pub fn layout(&self) -> &HostLayout {
        &self.layout
    }

    fn slot_for<T: Blittable>(&self, field: &str) -> Result<FieldSlot, BridgeError> {
        let slot = self.layout.resolve(field)?;
        if slot.size != T::SIZE {
            return Err(BridgeError::SizeMismatch {
                field: field.to_string(),
                expected: slot.size,
                actual: T::SIZE,
            });
        }
        Ok(slot)
    }
}

impl HostBridge for RawBridge {
    type Instance<'i> = RawInstance<'i>;

    fn get<T: Blittable>(&self, instance: &RawInstance<'_>, field: &str) -> Result<T, BridgeError> {
        let slot = self.slot_for::<T>(field)?;
        instance.check(field, slot)?;

        let mut buffer = vec![0u8; slot.size];
        // SAFETY: `check` guarantees `offset + size` does not overflow and is at
        // most `instance.size`, and the instance constructors guarantee `base`
        // is valid for `size` bytes. The local buffer is a fresh allocation, so
        // the ranges cannot overlap.
        unsafe {
            core::ptr::copy_nonoverlapping(
                instance.base.as_ptr().add(slot.offset),
                buffer.as_mut_ptr(),
                slot.size,
            );
        }
        Ok(T::decode(&buffer))
    }

    fn set<T: Blittable>(
        &self,
        instance: &mut RawInstance<'_>,
        field: &str,
        value: T,
    ) -> Result<(), BridgeError> {
        let slot = self.slot_for::<T>(field)?;
        instance.check(field, slot)?;

        let mut buffer = vec![0u8; slot.size];
        value.encode(&mut buffer);
        // SAFETY: same bounds argument as `get`; `&mut RawInstance` gives this
        // call exclusive access to the instance memory for its duration.
        unsafe {
            core::ptr::copy_nonoverlapping(
                buffer.as_ptr(),
                instance.base.as_ptr().add(slot.offset),
                slot.size,
            );
        }
        Ok(())
    }
}
