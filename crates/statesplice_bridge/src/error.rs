//! Error types for host field access.

use thiserror::Error;

/// Errors raised while resolving or accessing a host field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// Neither the direct name nor the alternate interop name resolved.
    #[error("field '{field}' not found (also tried '{alternate}')")]
    FieldNotFound {
        /// The requested field name.
        field: String,
        /// The alternate name that was tried after the direct one.
        alternate: String,
    },

    /// The requested value type does not match the field's width.
    #[error("field '{field}' is {expected} bytes wide, requested type is {actual} bytes")]
    SizeMismatch {
        /// The field name.
        field: String,
        /// Width recorded in the layout.
        expected: usize,
        /// Width of the requested type.
        actual: usize,
    },

    /// The field lies outside the instance's memory.
    #[error("field '{field}' at offset {offset} (+{size}) exceeds instance size {instance_size}")]
    OutOfBounds {
        /// The field name.
        field: String,
        /// Byte offset of the field.
        offset: usize,
        /// Width of the field.
        size: usize,
        /// Size of the instance in bytes.
        instance_size: usize,
    },
}

impl BridgeError {
    /// Creates a [`FieldNotFound`](Self::FieldNotFound).
    pub fn field_not_found(field: impl Into<String>, alternate: impl Into<String>) -> Self {
        Self::FieldNotFound {
            field: field.into(),
            alternate: alternate.into(),
        }
    }
}
