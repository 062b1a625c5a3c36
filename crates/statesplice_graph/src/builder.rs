//! Two-pass construction of a [`StepGraph`] from unordered declarations.
//!
//! Declarations may arrive in any order. [`StepGraphBuilder::build`] first
//! checks that every `after` target is either already defined or declared, then
//! registers declarations whose target is already defined, earliest declared
//! first, until none remain.

use hashbrown::HashSet;

use crate::error::StepError;
use crate::graph::StepGraph;
use crate::native::NativeSteps;

#[derive(Debug, Clone)]
struct Declaration {
    step: String,
    after: String,
}

/// Collects splice declarations and builds a [`StepGraph`] from them.
///
/// # Example
///
/// ```
/// use statesplice_graph::{NativeSteps, StepGraphBuilder};
///
/// let mut builder = StepGraphBuilder::new(NativeSteps::new(["A", "B"]).unwrap());
/// builder.declare("Y", "X").declare("X", "A");
///
/// let graph = builder.build().unwrap();
/// assert_eq!(graph.load_order(), ["Step 'X' after 'A'", "Step 'Y' after 'X'"]);
/// ```
#[derive(Debug)]
pub struct StepGraphBuilder {
    graph: StepGraph,
    declarations: Vec<Declaration>,
}

impl StepGraphBuilder {
    /// Creates a builder over the given native steps.
    #[must_use]
    pub fn new(native: NativeSteps) -> Self {
        Self::from_graph(StepGraph::new(native))
    }

    /// Creates a builder that adds declarations to an existing graph.
    ///
    /// Steps already in `graph` keep their ordinals and may be used as targets.
    #[must_use]
    pub fn from_graph(graph: StepGraph) -> Self {
        Self {
            graph,
            declarations: Vec::new(),
        }
    }

    /// Declares `step` spliced after `after`.
    pub fn declare(&mut self, step: impl Into<String>, after: impl Into<String>) -> &mut Self {
        self.declarations.push(Declaration {
            step: step.into(),
            after: after.into(),
        });
        self
    }

    /// Returns the number of declarations collected so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Returns true if nothing has been declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Orders the declarations and registers them.
    ///
    /// # Errors
    ///
    /// - [`StepError::Lookup`] if a target is neither defined nor declared
    /// - [`StepError::Cycle`] if some declarations only reach each other
    /// - any error [`StepGraph::register`] raises
    pub fn build(self) -> Result<StepGraph, StepError> {
        {
            let declared: HashSet<&str> =
                self.declarations.iter().map(|d| d.step.as_str()).collect();
            for declaration in &self.declarations {
                let target = declaration.after.as_str();
                if !declared.contains(target) && !self.graph.contains(target) {
                    return Err(StepError::lookup(target));
                }
            }
        }

        let mut graph = self.graph;
        let mut pending = self.declarations;
        while !pending.is_empty() {
            let Some(position) = pending
                .iter()
                .position(|declaration| graph.contains(&declaration.after))
            else {
                return Err(StepError::Cycle {
                    steps: pending.into_iter().map(|declaration| declaration.step).collect(),
                });
            };

            let declaration = pending.remove(position);
            graph.register(declaration.step, &declaration.after)?;
        }

        tracing::debug!(custom = graph.custom_count(), "step graph built");
        Ok(graph)
    }
}
