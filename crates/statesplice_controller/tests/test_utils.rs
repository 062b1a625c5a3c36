//! Shared test utilities for `statesplice_controller` integration tests.
//!
//! Provides an in-memory host with a linear step sequence and a bridge over
//! it. Import via `mod test_utils;` in test files.

#![allow(
    dead_code,
    missing_docs,
    reason = "shared test utilities, not all items used in every test binary"
)]

use statesplice_bridge::{Blittable, BridgeError, DEFAULT_ALTERNATE_PREFIX, HostBridge};
use statesplice_controller::{ControllerError, InterceptionController, TickOutcome};
use statesplice_core::HostFields;
use statesplice_graph::NativeSteps;
use std::sync::{Arc, Mutex};

// ═══════════════════════════════════════════════════════════════════════════════
// FAKE HOST
// ═══════════════════════════════════════════════════════════════════════════════

/// The host's own steps, in ordinal order.
pub const NATIVE: [&str; 3] = ["A", "B", "C"];

pub fn native_steps() -> NativeSteps {
    NativeSteps::new(NATIVE).expect("native steps are valid")
}

/// Ordered record of steps that actually ran, shared by host and generators.
#[derive(Clone, Default)]
pub struct VisitLog {
    visits: Arc<Mutex<Vec<String>>>,
}

impl VisitLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, step: impl Into<String>) {
        self.visits.lock().unwrap().push(step.into());
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }
}

/// A host that advances one native step per update.
///
/// It starts before its first step, so the first update moves it to `A`.
pub struct FakeHost {
    pub cursor: i32,
    pub current: i32,
    pub generate_enabled: bool,
    pub busy: bool,
    pub sub_operation_done: bool,
    pub log: VisitLog,
}

impl FakeHost {
    pub fn new(log: VisitLog) -> Self {
        Self {
            cursor: 0,
            current: -1,
            generate_enabled: true,
            busy: false,
            sub_operation_done: false,
            log,
        }
    }

    /// True once the host has arrived at its last native step.
    pub fn finished(&self) -> bool {
        self.current == NATIVE.len() as i32 - 1
    }
}

/// The host's tick update: move to the next step and run it.
pub fn advance(host: &mut FakeHost) {
    host.current += 1;
    host.cursor += 1;

    let name = usize::try_from(host.current)
        .ok()
        .and_then(|index| NATIVE.get(index))
        .map_or_else(|| format!("?{}", host.current), ToString::to_string);
    host.log.push(name);
}

// ═══════════════════════════════════════════════════════════════════════════════
// FAKE BRIDGE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy)]
enum Slot {
    Cursor,
    Current,
    GenerateEnabled,
    Busy,
    SubOperationDone,
}

impl Slot {
    fn width(self) -> usize {
        match self {
            Slot::Cursor | Slot::Current => 4,
            Slot::GenerateEnabled | Slot::Busy | Slot::SubOperationDone => 1,
        }
    }
}

/// Bridge over [`FakeHost`], with field names taken from a [`HostFields`].
pub struct FakeBridge {
    names: HostFields,
}

impl FakeBridge {
    pub fn new(names: HostFields) -> Self {
        Self { names }
    }

    fn resolve(&self, field: &str) -> Result<Slot, BridgeError> {
        let direct = field.strip_prefix(DEFAULT_ALTERNATE_PREFIX).unwrap_or(field);
        let names = &self.names;
        let slot = if direct == names.cursor {
            Slot::Cursor
        } else if direct == names.current {
            Slot::Current
        } else if direct == names.generate_enabled {
            Slot::GenerateEnabled
        } else if direct == names.busy {
            Slot::Busy
        } else if direct == names.sub_operation_done {
            Slot::SubOperationDone
        } else {
            return Err(BridgeError::field_not_found(
                field,
                format!("{DEFAULT_ALTERNATE_PREFIX}{field}"),
            ));
        };
        Ok(slot)
    }

    fn checked<T: Blittable>(&self, field: &str) -> Result<Slot, BridgeError> {
        let slot = self.resolve(field)?;
        if slot.width() != T::SIZE {
            return Err(BridgeError::SizeMismatch {
                field: field.to_string(),
                expected: slot.width(),
                actual: T::SIZE,
            });
        }
        Ok(slot)
    }
}

impl HostBridge for FakeBridge {
    type Instance<'i> = FakeHost;

    fn get<T: Blittable>(&self, host: &FakeHost, field: &str) -> Result<T, BridgeError> {
        let bytes = match self.checked::<T>(field)? {
            Slot::Cursor => host.cursor.to_ne_bytes().to_vec(),
            Slot::Current => host.current.to_ne_bytes().to_vec(),
            Slot::GenerateEnabled => vec![u8::from(host.generate_enabled)],
            Slot::Busy => vec![u8::from(host.busy)],
            Slot::SubOperationDone => vec![u8::from(host.sub_operation_done)],
        };
        Ok(T::decode(&bytes))
    }

    fn set<T: Blittable>(
        &self,
        host: &mut FakeHost,
        field: &str,
        value: T,
    ) -> Result<(), BridgeError> {
        let slot = self.checked::<T>(field)?;
        let mut bytes = vec![0u8; T::SIZE];
        value.encode(&mut bytes);
        match slot {
            Slot::Cursor => host.cursor = i32::decode(&bytes),
            Slot::Current => host.current = i32::decode(&bytes),
            Slot::GenerateEnabled => host.generate_enabled = bool::decode(&bytes),
            Slot::Busy => host.busy = bool::decode(&bytes),
            Slot::SubOperationDone => host.sub_operation_done = bool::decode(&bytes),
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DRIVING
// ═══════════════════════════════════════════════════════════════════════════════

/// Upper bound on ticks so a broken controller cannot hang a test.
pub const MAX_TICKS: usize = 64;

/// Ticks the host until it finishes, returning every tick outcome.
///
/// Also checks after each tick that the cursor never exceeds the total step
/// count.
pub fn run_to_completion(
    controller: &InterceptionController<FakeBridge>,
    host: &mut FakeHost,
) -> Result<Vec<TickOutcome>, ControllerError> {
    let total = controller.graph().total_steps() as i32;
    let mut outcomes = Vec::new();
    for _ in 0..MAX_TICKS {
        outcomes.push(controller.tick(host, advance)?);
        assert!(host.cursor <= total, "cursor {} exceeds {total}", host.cursor);
        if host.finished() {
            return Ok(outcomes);
        }
    }
    panic!("host did not finish within {MAX_TICKS} ticks");
}

/// A generator that records its step in `log`.
pub fn recording(
    log: &VisitLog,
    step: &'static str,
) -> impl Fn() -> Result<(), statesplice_graph::GenerationError> + Send + Sync + 'static {
    let log = log.clone();
    move || {
        log.push(step);
        Ok(())
    }
}
