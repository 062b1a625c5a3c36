//! Host state as seen by the controller, and the guard evaluated on it.

use core::fmt;

use statesplice_bridge::{BridgeError, HostBridge};
use statesplice_core::HostFields;
use statesplice_graph::Ordinal;

/// The host fields read at the start of each phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostSnapshot {
    /// Progress counter.
    pub cursor: i32,
    /// Current state ordinal.
    pub current: Ordinal,
    /// Whether generation is enabled.
    pub generate_enabled: bool,
    /// Whether a long-running sub-operation is active.
    pub busy: bool,
    /// Whether that sub-operation has finished.
    pub sub_operation_done: bool,
}

impl HostSnapshot {
    /// Reads every guarded field through `bridge`.
    ///
    /// # Errors
    ///
    /// Returns the first [`BridgeError`] encountered.
    pub fn read<B: HostBridge>(
        bridge: &B,
        instance: &B::Instance<'_>,
        fields: &HostFields,
    ) -> Result<Self, BridgeError> {
        Ok(Self {
            cursor: bridge.get::<i32>(instance, &fields.cursor)?,
            current: Ordinal::new(bridge.get::<i32>(instance, &fields.current)?),
            generate_enabled: bridge.get::<bool>(instance, &fields.generate_enabled)?,
            busy: bridge.get::<bool>(instance, &fields.busy)?,
            sub_operation_done: bridge.get::<bool>(instance, &fields.sub_operation_done)?,
        })
    }

    /// Checks whether a phase may act on this snapshot.
    ///
    /// # Errors
    ///
    /// Returns the first guard that fails.
    pub fn guard(&self, total_steps: usize) -> Result<(), GuardSkip> {
        if !self.generate_enabled {
            return Err(GuardSkip::GenerationDisabled);
        }
        if self.busy && !self.sub_operation_done {
            return Err(GuardSkip::SubOperationActive);
        }
        let in_range = usize::try_from(self.cursor).is_ok_and(|cursor| cursor < total_steps);
        if !in_range {
            return Err(GuardSkip::CursorOutOfRange {
                cursor: self.cursor,
                total: total_steps,
            });
        }
        Ok(())
    }
}

/// Why a phase passed through without acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardSkip {
    /// The host's generation flag is off.
    GenerationDisabled,
    /// A long-running host sub-operation is active and unfinished.
    SubOperationActive,
    /// The host cursor lies outside `0..total`.
    CursorOutOfRange {
        /// The host cursor.
        cursor: i32,
        /// Native plus custom step count.
        total: usize,
    },
}

impl fmt::Display for GuardSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardSkip::GenerationDisabled => write!(f, "generation disabled"),
            GuardSkip::SubOperationActive => write!(f, "sub-operation in progress"),
            GuardSkip::CursorOutOfRange { cursor, total } => {
                write!(f, "cursor {cursor} outside 0..{total}")
            }
        }
    }
}
