//! The host's fixed step enumeration.

use indexmap::IndexSet;

use crate::error::StepError;
use crate::step::{Ordinal, Step};

/// A host enumeration whose variant names are known at compile time.
///
/// Variants must be listed in ordinal order, starting at zero.
///
/// # Example
///
/// ```
/// use statesplice_graph::{HostEnum, NativeSteps};
///
/// enum LoadState {
///     Setup,
///     Terrain,
///     Finish,
/// }
///
/// impl HostEnum for LoadState {
///     const VARIANTS: &'static [&'static str] = &["Setup", "Terrain", "Finish"];
/// }
///
/// let native = NativeSteps::from_enum::<LoadState>().unwrap();
/// assert_eq!(native.len(), 3);
/// ```
pub trait HostEnum {
    /// Variant names in ordinal order.
    const VARIANTS: &'static [&'static str];
}

/// Ordered, unique native step names; a name's index is its ordinal.
#[derive(Debug, Clone)]
pub struct NativeSteps {
    names: IndexSet<String>,
}

impl NativeSteps {
    /// Creates the enumeration from names in ordinal order.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::EmptyNativeSteps`] for an empty list and
    /// [`StepError::DuplicateStep`] if a name repeats.
    pub fn new<I, S>(names: I) -> Result<Self, StepError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = IndexSet::new();
        for name in names {
            let name = name.into();
            if set.contains(&name) {
                return Err(StepError::duplicate(name));
            }
            if Ordinal::try_from_index(set.len()).is_none() {
                return Err(StepError::OrdinalOverflow { step: name });
            }
            set.insert(name);
        }
        if set.is_empty() {
            return Err(StepError::EmptyNativeSteps);
        }
        Ok(Self { names: set })
    }

    /// Creates the enumeration from a [`HostEnum`].
    ///
    /// # Errors
    ///
    /// See [`NativeSteps::new`].
    pub fn from_enum<E: HostEnum>() -> Result<Self, StepError> {
        Self::new(E::VARIANTS.iter().copied())
    }

    /// Returns the number of native steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false; construction rejects an empty enumeration.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns the step with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Step> {
        self.names
            .get_index_of(name)
            .and_then(Ordinal::try_from_index)
            .map(|ordinal| Step::new(name, ordinal))
    }

    /// Returns the step at the given ordinal.
    #[must_use]
    pub fn by_ordinal(&self, ordinal: Ordinal) -> Option<Step> {
        let index = ordinal.index()?;
        self.names
            .get_index(index)
            .map(|name| Step::new(name.as_str(), ordinal))
    }

    /// Returns true if `ordinal` falls inside the native range.
    #[must_use]
    pub fn contains_ordinal(&self, ordinal: Ordinal) -> bool {
        ordinal.index().is_some_and(|index| index < self.names.len())
    }

    /// Iterates over the native steps in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = Step> + '_ {
        self.names
            .iter()
            .enumerate()
            .filter_map(|(index, name)| {
                Ordinal::try_from_index(index).map(|ordinal| Step::new(name.as_str(), ordinal))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_follow_declaration_order() {
        let native = NativeSteps::new(["A", "B", "C"]).unwrap();
        assert_eq!(native.get("C").unwrap().ordinal(), Ordinal::new(2));
        assert_eq!(native.by_ordinal(Ordinal::new(1)).unwrap().name(), "B");
        assert!(native.by_ordinal(Ordinal::new(3)).is_none());
        assert!(native.by_ordinal(Ordinal::new(-1)).is_none());
    }

    #[test]
    fn empty_is_rejected() {
        let err = NativeSteps::new(Vec::<String>::new()).unwrap_err();
        assert_eq!(err, StepError::EmptyNativeSteps);
    }

    #[test]
    fn repeated_name_is_rejected() {
        let err = NativeSteps::new(["A", "B", "A"]).unwrap_err();
        assert_eq!(err, StepError::duplicate("A"));
    }
}
