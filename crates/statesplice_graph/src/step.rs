//! Steps, ordinals and splice records.

use core::fmt;

use parking_lot::RwLock;

/// Position of a step in the combined native and custom sequence.
///
/// The host stores its current state as a 32-bit integer, so ordinals use the
/// same representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ordinal(i32);

impl Ordinal {
    /// Wraps a raw host value.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Returns the raw host value.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Returns the ordinal as a zero-based index, or `None` if negative.
    #[must_use]
    pub fn index(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }

    /// Converts a zero-based index, or `None` if it does not fit the host's
    /// 32-bit state value.
    #[must_use]
    pub fn try_from_index(index: usize) -> Option<Self> {
        i32::try_from(index).ok().map(Self)
    }
}

impl From<i32> for Ordinal {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Ordinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named position in the host's state sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Step {
    name: String,
    ordinal: Ordinal,
}

impl Step {
    /// Creates a step.
    #[must_use]
    pub fn new(name: impl Into<String>, ordinal: Ordinal) -> Self {
        Self {
            name: name.into(),
            ordinal,
        }
    }

    /// Returns the step name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the step ordinal.
    #[must_use]
    pub fn ordinal(&self) -> Ordinal {
        self.ordinal
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.ordinal)
    }
}

/// A step spliced into the host sequence after another step.
///
/// `step` and `after` are fixed at registration. `original`, the step the host
/// resumes at once `step` has run, starts out equal to `after` and is rewritten
/// by [`StepGraph::resolve_original`](crate::StepGraph::resolve_original).
#[derive(Debug)]
pub struct CustomStep {
    step: Step,
    after: Step,
    original: RwLock<Step>,
}

impl CustomStep {
    pub(crate) fn new(step: Step, after: Step) -> Self {
        let original = RwLock::new(after.clone());
        Self {
            step,
            after,
            original,
        }
    }

    /// Returns the injected step.
    #[must_use]
    pub fn step(&self) -> &Step {
        &self.step
    }

    /// Returns the step this one is spliced after.
    #[must_use]
    pub fn after(&self) -> &Step {
        &self.after
    }

    /// Returns the current resume target.
    #[must_use]
    pub fn original(&self) -> Step {
        self.original.read().clone()
    }

    pub(crate) fn set_original(&self, original: Step) {
        *self.original.write() = original;
    }
}

impl fmt::Display for CustomStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step '{}' after '{}'", self.step.name, self.after.name)
    }
}
