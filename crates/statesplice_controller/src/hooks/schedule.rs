//! Which splice events an observer hears about.
//!
//! Every [`SpliceEvent`](super::SpliceEvent) belongs to one [`Phase`]. An
//! observer subscribes to a [`PhaseSet`], usually spelled as a marker type or
//! a tuple of markers:
//!
//! ```
//! use statesplice_controller::hooks::schedule::{IntoPhaseSet, OnInjection, OnResume, Phase};
//!
//! let phases = <(OnInjection, OnResume)>::phase_set();
//! assert!(phases.contains(Phase::Resume));
//! assert!(!phases.contains(Phase::Generation));
//! ```

use core::fmt;
use variadics_please::all_tuples;

/// The part of a detour an event reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The post-tick hook redirected the host into a custom step.
    Injection,
    /// The pre-tick hook ran, skipped or failed a generation routine.
    Generation,
    /// The pre-tick hook sent the host back to its resume target.
    Resume,
}

impl Phase {
    const fn bit(self) -> u8 {
        match self {
            Phase::Injection => 0b001,
            Phase::Generation => 0b010,
            Phase::Resume => 0b100,
        }
    }

    /// Lowercase name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Phase::Injection => "injection",
            Phase::Generation => "generation",
            Phase::Resume => "resume",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of [`Phase`]s.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct PhaseSet(u8);

impl PhaseSet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Every phase.
    pub const ALL: Self = Self(0b111);

    /// Returns the set extended by `phase`.
    #[must_use]
    pub const fn with(self, phase: Phase) -> Self {
        Self(self.0 | phase.bit())
    }

    /// Whether `phase` is in the set.
    #[must_use]
    pub const fn contains(self, phase: Phase) -> bool {
        self.0 & phase.bit() != 0
    }

    /// Whether the set has no phases.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<Phase> for PhaseSet {
    fn from(phase: Phase) -> Self {
        Self::EMPTY.with(phase)
    }
}

impl fmt::Debug for PhaseSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phases = [Phase::Injection, Phase::Generation, Phase::Resume];
        f.debug_set()
            .entries(phases.into_iter().filter(|&phase| self.contains(phase)))
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Markers
// ─────────────────────────────────────────────────────────────────────────────

/// A marker type standing for one [`Phase`].
pub trait PhaseMarker: 'static {
    /// The phase this marker selects.
    const PHASE: Phase;
}

/// Types that name a set of phases: a single marker or a tuple of markers.
pub trait IntoPhaseSet {
    /// Returns the phases named by `Self`.
    fn phase_set() -> PhaseSet;
}

impl<M: PhaseMarker> IntoPhaseSet for M {
    fn phase_set() -> PhaseSet {
        PhaseSet::from(M::PHASE)
    }
}

macro_rules! impl_into_phase_set_for_tuple {
    ($($M:ident),*) => {
        impl<$($M: PhaseMarker),*> IntoPhaseSet for ($($M,)*) {
            fn phase_set() -> PhaseSet {
                PhaseSet::EMPTY$(.with($M::PHASE))*
            }
        }
    };
}

all_tuples!(impl_into_phase_set_for_tuple, 2, 3, M);

/// Selects [`Phase::Injection`].
///
/// Event data: [`SpliceEvent::Injected`](super::SpliceEvent::Injected)
pub struct OnInjection;
impl PhaseMarker for OnInjection {
    const PHASE: Phase = Phase::Injection;
}

/// Selects [`Phase::Generation`].
///
/// Event data: [`SpliceEvent::GenerationStart`](super::SpliceEvent::GenerationStart),
/// [`GenerationComplete`](super::SpliceEvent::GenerationComplete),
/// [`GenerationFailed`](super::SpliceEvent::GenerationFailed) and
/// [`MissingGenerator`](super::SpliceEvent::MissingGenerator)
pub struct OnGeneration;
impl PhaseMarker for OnGeneration {
    const PHASE: Phase = Phase::Generation;
}

/// Selects [`Phase::Resume`].
///
/// Event data: [`SpliceEvent::Resumed`](super::SpliceEvent::Resumed)
pub struct OnResume;
impl PhaseMarker for OnResume {
    const PHASE: Phase = Phase::Resume;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_marker_selects_one_phase() {
        let phases = OnGeneration::phase_set();
        assert!(phases.contains(Phase::Generation));
        assert!(!phases.contains(Phase::Injection));
        assert!(!phases.contains(Phase::Resume));
    }

    #[test]
    fn all_markers_cover_every_phase() {
        assert_eq!(
            <(OnInjection, OnGeneration, OnResume)>::phase_set(),
            PhaseSet::ALL
        );
        assert!(PhaseSet::EMPTY.is_empty());
    }

    #[test]
    fn debug_lists_member_phases() {
        let phases = <(OnResume, OnInjection)>::phase_set();
        assert_eq!(format!("{phases:?}"), "{Injection, Resume}");
    }
}
