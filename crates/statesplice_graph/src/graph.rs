//! The splice graph: native steps plus custom steps spliced after them.
//!
//! Custom steps are registered strictly in dependency order. Each registration
//! appends a step with the next free ordinal (`native_count + k`), so ordinals
//! are never reused. The `after` relation is kept fork-free: a step can have at
//! most one custom step spliced directly after it, which makes every splice a
//! single chain hanging off a native step.

use hashbrown::HashMap;
use indexmap::IndexMap;

use crate::error::StepError;
use crate::native::NativeSteps;
use crate::step::{CustomStep, Ordinal, Step};

/// Native and custom steps with their splice relationships.
///
/// # Example
///
/// ```
/// use statesplice_graph::{NativeSteps, Ordinal, StepGraph};
///
/// let mut graph = StepGraph::new(NativeSteps::new(["A", "B", "C"]).unwrap());
/// graph.register("X", "A").unwrap();
/// graph.register("Y", "X").unwrap();
///
/// assert_eq!(graph.ordinal_of("Y").unwrap(), Ordinal::new(4));
/// assert_eq!(graph.total_steps(), 5);
/// assert_eq!(graph.resolve_original("Y").unwrap().name(), "A");
/// ```
#[derive(Debug)]
pub struct StepGraph {
    native: NativeSteps,
    /// Custom steps in registration order; index `k` holds ordinal `native + k`.
    custom: IndexMap<String, CustomStep>,
    /// `after` ordinal to index in `custom`.
    after_index: HashMap<Ordinal, usize>,
}

impl StepGraph {
    /// Creates a graph with no custom steps.
    #[must_use]
    pub fn new(native: NativeSteps) -> Self {
        Self {
            native,
            custom: IndexMap::new(),
            after_index: HashMap::new(),
        }
    }

    /// Registers `step_name` spliced after `after_name`.
    ///
    /// `after_name` is looked up among already registered custom steps first,
    /// then among native steps.
    ///
    /// # Errors
    ///
    /// - [`StepError::DuplicateStep`] if `step_name` is already defined
    /// - [`StepError::Lookup`] if `after_name` is not defined yet
    /// - [`StepError::ForkedSplice`] if another custom step is already spliced
    ///   after `after_name`
    /// - [`StepError::OrdinalOverflow`] if the next ordinal does not fit in an
    ///   `i32`
    pub fn register(
        &mut self,
        step_name: impl Into<String>,
        after_name: &str,
    ) -> Result<&CustomStep, StepError> {
        let step_name = step_name.into();
        if self.contains(&step_name) {
            return Err(StepError::duplicate(step_name));
        }

        let after = self.step(after_name).ok_or_else(|| StepError::lookup(after_name))?;

        if let Some(&index) = self.after_index.get(&after.ordinal()) {
            let existing = self.custom[index].step().name().to_string();
            return Err(StepError::ForkedSplice {
                step: step_name,
                after: after_name.to_string(),
                existing,
            });
        }

        let index = self.custom.len();
        let Some(ordinal) = self
            .native
            .len()
            .checked_add(index)
            .and_then(Ordinal::try_from_index)
        else {
            return Err(StepError::OrdinalOverflow { step: step_name });
        };
        let step = Step::new(step_name.clone(), ordinal);
        tracing::info!(
            step = %step.name(),
            ordinal = step.ordinal().get(),
            after = %after.name(),
            "registered custom step"
        );

        self.after_index.insert(after.ordinal(), index);
        self.custom.insert(step_name, CustomStep::new(step, after));
        Ok(&self.custom[index])
    }

    /// Returns the ordinal of a step, checking custom steps before native ones.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Lookup`] if no step has this name.
    pub fn ordinal_of(&self, name: &str) -> Result<Ordinal, StepError> {
        self.step(name)
            .map(|step| step.ordinal())
            .ok_or_else(|| StepError::lookup(name))
    }

    /// Returns the step with the given name, custom steps first.
    #[must_use]
    pub fn step(&self, name: &str) -> Option<Step> {
        self.custom
            .get(name)
            .map(|custom| custom.step().clone())
            .or_else(|| self.native.get(name))
    }

    /// Returns true if a native or custom step has this name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.custom.contains_key(name) || self.native.get(name).is_some()
    }

    /// Returns the custom step with the given name.
    #[must_use]
    pub fn custom(&self, name: &str) -> Option<&CustomStep> {
        self.custom.get(name)
    }

    /// Returns the custom step whose own ordinal is `ordinal`.
    #[must_use]
    pub fn custom_by_ordinal(&self, ordinal: Ordinal) -> Option<&CustomStep> {
        let index = ordinal.index()?.checked_sub(self.native.len())?;
        self.custom.get_index(index).map(|(_, custom)| custom)
    }

    /// Returns the custom step spliced directly after `ordinal`.
    #[must_use]
    pub fn custom_after(&self, ordinal: Ordinal) -> Option<&CustomStep> {
        self.after_index
            .get(&ordinal)
            .and_then(|&index| self.custom.get_index(index))
            .map(|(_, custom)| custom)
    }

    /// Returns the custom step at `ordinal` followed by every custom step
    /// chained behind it, in chain order.
    ///
    /// Empty if `ordinal` is not a custom step.
    #[must_use]
    pub fn chain_from(&self, ordinal: Ordinal) -> Vec<&CustomStep> {
        let Some(first) = self.custom_by_ordinal(ordinal) else {
            return Vec::new();
        };

        let mut chain = vec![first];
        let mut tail = first;
        while chain.len() < self.custom.len() {
            let Some(next) = self.custom_after(tail.step().ordinal()) else {
                break;
            };
            chain.push(next);
            tail = next;
        }
        chain
    }

    /// Resolves and stores the resume target of a custom step.
    ///
    /// A step spliced after a native step resumes at that step. A step spliced
    /// after another custom step inherits that step's resume target, which is
    /// found by walking the after-chain up to its native root. The walk is
    /// bounded by the number of custom steps.
    ///
    /// # Errors
    ///
    /// - [`StepError::Lookup`] if `name` is not a custom step
    /// - [`StepError::ResolutionDepthExceeded`] if the walk does not reach a
    ///   native step within the bound
    pub fn resolve_original(&self, name: &str) -> Result<Step, StepError> {
        let start = self.custom(name).ok_or_else(|| StepError::lookup(name))?;
        let limit = self.custom.len();

        let mut current = start;
        let mut depth = 0;
        let resolved = loop {
            let after = current.after();
            if self.native.get(after.name()).is_some() {
                break after.clone();
            }
            depth += 1;
            if depth > limit {
                return Err(StepError::ResolutionDepthExceeded {
                    step: name.to_string(),
                    limit,
                });
            }
            current = self
                .custom(after.name())
                .ok_or_else(|| StepError::lookup(after.name()))?;
        };

        if start.original() != resolved {
            tracing::trace!(step = %name, original = %resolved, "resume target updated");
        }
        start.set_original(resolved.clone());
        Ok(resolved)
    }

    /// Returns the native enumeration.
    #[must_use]
    pub fn native(&self) -> &NativeSteps {
        &self.native
    }

    /// Iterates over custom steps in registration order.
    pub fn customs(&self) -> impl Iterator<Item = &CustomStep> {
        self.custom.values()
    }

    /// Returns the number of native steps.
    #[must_use]
    pub fn native_count(&self) -> usize {
        self.native.len()
    }

    /// Returns the number of custom steps.
    #[must_use]
    pub fn custom_count(&self) -> usize {
        self.custom.len()
    }

    /// Returns the number of native plus custom steps.
    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.native.len() + self.custom.len()
    }

    /// Describes each custom step in registration order.
    #[must_use]
    pub fn load_order(&self) -> Vec<String> {
        self.custom.values().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> StepGraph {
        StepGraph::new(NativeSteps::new(["A", "B", "C"]).unwrap())
    }

    #[test]
    fn custom_lookup_precedes_native() {
        let mut graph = abc();
        graph.register("X", "A").unwrap();
        assert_eq!(graph.ordinal_of("X").unwrap(), Ordinal::new(3));
        assert_eq!(graph.ordinal_of("B").unwrap(), Ordinal::new(1));
        assert_eq!(graph.ordinal_of("Z").unwrap_err(), StepError::lookup("Z"));
    }

    #[test]
    fn custom_by_ordinal_ignores_native_range() {
        let mut graph = abc();
        graph.register("X", "A").unwrap();
        assert!(graph.custom_by_ordinal(Ordinal::new(0)).is_none());
        assert!(graph.custom_by_ordinal(Ordinal::new(-3)).is_none());
        assert_eq!(graph.custom_by_ordinal(Ordinal::new(3)).unwrap().step().name(), "X");
        assert!(graph.custom_by_ordinal(Ordinal::new(4)).is_none());
    }

    #[test]
    fn chain_from_follows_after_links() {
        let mut graph = abc();
        graph.register("X", "A").unwrap();
        graph.register("Z", "C").unwrap();
        graph.register("Y", "X").unwrap();

        let chain: Vec<_> = graph
            .chain_from(Ordinal::new(3))
            .iter()
            .map(|custom| custom.step().name().to_string())
            .collect();
        assert_eq!(chain, ["X", "Y"]);
        assert!(graph.chain_from(Ordinal::new(1)).is_empty());
    }

    #[test]
    fn load_order_lists_registration_order() {
        let mut graph = abc();
        graph.register("X", "A").unwrap();
        graph.register("Y", "X").unwrap();
        assert_eq!(graph.load_order(), ["Step 'X' after 'A'", "Step 'Y' after 'X'"]);
    }

    #[test]
    fn resolution_is_bounded_on_cyclic_links() {
        // `register` cannot produce this shape; build it by hand.
        let mut graph = abc();
        let x = Step::new("X", Ordinal::new(3));
        let y = Step::new("Y", Ordinal::new(4));
        graph
            .custom
            .insert("X".to_string(), CustomStep::new(x.clone(), y.clone()));
        graph.custom.insert("Y".to_string(), CustomStep::new(y, x));

        let err = graph.resolve_original("X").unwrap_err();
        assert_eq!(
            err,
            StepError::ResolutionDepthExceeded {
                step: "X".to_string(),
                limit: 2,
            }
        );
    }
}
