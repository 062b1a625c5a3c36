//! Startup context that assembles a controller.
//!
//! An [`Injector`] collects splices from three sources and builds them into one
//! [`StepGraph`]:
//!
//! - explicit [`Injector::register`] calls and the configured step list, which
//!   are registered strictly in the order given
//! - [`SpliceSet`]s, whose declarations may arrive in any order and are
//!   resolved with a [`StepGraphBuilder`]
//!
//! [`Injector::start`] builds the graph, checks it against the registered
//! generators and hands out the controller. Nothing is published unless every
//! step resolves.

use std::sync::Arc;

use statesplice_bridge::HostBridge;
use statesplice_core::{HostFields, SpliceConfig, SpliceEntry};
use statesplice_graph::{
    GenerationError, GeneratorRegistry, NativeSteps, StepGraph, StepGraphBuilder,
    ValidationReport,
};

use crate::controller::InterceptionController;
use crate::error::InjectorError;
use crate::hooks::HooksAPI;

/// A group of splice declarations, typically one per feature.
///
/// Implemented for any `Fn(&mut Declarations)` closure.
///
/// # Example
///
/// ```
/// use statesplice_controller::{Declarations, SpliceSet};
///
/// struct Waterways;
///
/// impl SpliceSet for Waterways {
///     fn declare(&self, declarations: &mut Declarations) {
///         declarations
///             .custom_step("Bridges", "Rivers")
///             .custom_step("Rivers", "Terrain")
///             .generator("Rivers", || Ok(()))
///             .generator("Bridges", || Ok(()));
///     }
/// }
/// ```
pub trait SpliceSet: Send + Sync + 'static {
    /// Adds this set's custom steps and generators.
    fn declare(&self, declarations: &mut Declarations);
}

impl<F> SpliceSet for F
where
    F: Fn(&mut Declarations) + Send + Sync + 'static,
{
    fn declare(&self, declarations: &mut Declarations) {
        self(declarations);
    }
}

/// Collector passed to [`SpliceSet::declare`].
#[derive(Debug)]
pub struct Declarations {
    builder: StepGraphBuilder,
    generators: GeneratorRegistry,
}

impl Declarations {
    /// Declares `step` spliced after `after`. Order does not matter.
    pub fn custom_step(&mut self, step: impl Into<String>, after: impl Into<String>) -> &mut Self {
        self.builder.declare(step, after);
        self
    }

    /// Registers the generator for `step`.
    pub fn generator<F>(&mut self, step: impl Into<String>, generator: F) -> &mut Self
    where
        F: Fn() -> Result<(), GenerationError> + Send + Sync + 'static,
    {
        self.generators.register(step, generator);
        self
    }
}

/// Explicit startup context; replaces any process-wide state.
///
/// # Example
///
/// ```
/// use statesplice_bridge::{HostLayout, RawBridge};
/// use statesplice_controller::Injector;
/// use statesplice_graph::NativeSteps;
///
/// let mut injector = Injector::new(NativeSteps::new(["Setup", "Terrain", "Finish"]).unwrap());
/// injector
///     .register("Rivers", "Terrain")
///     .generator("Rivers", || Ok(()));
///
/// let controller = injector.start(RawBridge::new(HostLayout::new())).unwrap();
/// assert_eq!(controller.graph().total_steps(), 4);
/// assert!(injector.start(RawBridge::new(HostLayout::new())).is_err());
/// ```
pub struct Injector {
    native: NativeSteps,
    ordered: Vec<SpliceEntry>,
    sets: Vec<Box<dyn SpliceSet>>,
    generators: GeneratorRegistry,
    fields: HostFields,
    hooks: Arc<HooksAPI>,
    report: Option<ValidationReport>,
}

impl core::fmt::Debug for Injector {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Injector")
            .field("native", &self.native)
            .field("ordered", &self.ordered)
            .field("sets", &self.sets.len())
            .field("generators", &self.generators)
            .field("started", &self.is_started())
            .finish_non_exhaustive()
    }
}

impl Injector {
    /// Creates an injector for a host with the given native steps.
    #[must_use]
    pub fn new(native: NativeSteps) -> Self {
        Self {
            native,
            ordered: Vec::new(),
            sets: Vec::new(),
            generators: GeneratorRegistry::new(),
            fields: HostFields::default(),
            hooks: Arc::new(HooksAPI::new()),
            report: None,
        }
    }

    /// Creates an injector and applies `config`.
    ///
    /// # Errors
    ///
    /// See [`Injector::configure`].
    pub fn from_config(native: NativeSteps, config: &SpliceConfig) -> Result<Self, InjectorError> {
        let mut injector = Self::new(native);
        injector.configure(config)?;
        Ok(injector)
    }

    /// Appends the configured step list and adopts the configured host fields.
    ///
    /// # Errors
    ///
    /// Returns [`InjectorError::Config`] if the step list is empty or
    /// malformed.
    pub fn configure(&mut self, config: &SpliceConfig) -> Result<&mut Self, InjectorError> {
        let entries = config.splices()?;
        tracing::debug!(entries = entries.len(), "configured step list");
        self.ordered.extend(entries);
        self.fields = config.host_fields.clone();
        Ok(self)
    }

    /// Registers `step` spliced after `after`.
    ///
    /// `after` must be native or registered by an earlier call.
    pub fn register(&mut self, step: impl Into<String>, after: impl Into<String>) -> &mut Self {
        self.ordered.push(SpliceEntry {
            step: step.into(),
            after: after.into(),
        });
        self
    }

    /// Registers the generator for `step`.
    pub fn generator<F>(&mut self, step: impl Into<String>, generator: F) -> &mut Self
    where
        F: Fn() -> Result<(), GenerationError> + Send + Sync + 'static,
    {
        self.generators.register(step, generator);
        self
    }

    /// Adds a declaration set.
    pub fn add_splice_set(&mut self, set: impl SpliceSet) -> &mut Self {
        self.sets.push(Box::new(set));
        self
    }

    /// Sets the host field names.
    pub fn with_host_fields(&mut self, fields: HostFields) -> &mut Self {
        self.fields = fields;
        self
    }

    /// Returns the observer registry shared with started controllers.
    #[must_use]
    pub fn hooks(&self) -> &HooksAPI {
        &self.hooks
    }

    /// Returns true once a controller has been started.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.report.is_some()
    }

    /// Returns the generator coverage found by [`start`](Self::start).
    #[must_use]
    pub fn validation(&self) -> Option<&ValidationReport> {
        self.report.as_ref()
    }

    /// Builds the step graph and returns the controller.
    ///
    /// Missing generators are reported through [`validation`](Self::validation)
    /// and a warning; they do not fail startup.
    ///
    /// # Errors
    ///
    /// - [`InjectorError::DuplicateInit`] if a controller was already started
    /// - [`InjectorError::Steps`] if the splices do not form a valid graph; the
    ///   injector may be fixed and started again
    pub fn start<B: HostBridge>(
        &mut self,
        bridge: B,
    ) -> Result<InterceptionController<B>, InjectorError> {
        if self.is_started() {
            return Err(InjectorError::DuplicateInit);
        }

        let mut graph = StepGraph::new(self.native.clone());
        for entry in &self.ordered {
            graph.register(entry.step.clone(), &entry.after)?;
        }

        let mut declarations = Declarations {
            builder: StepGraphBuilder::from_graph(graph),
            generators: self.generators.clone(),
        };
        for set in &self.sets {
            set.declare(&mut declarations);
        }
        let Declarations {
            builder,
            generators,
        } = declarations;
        let graph = builder.build()?;

        let report = generators.validate(&graph);
        for line in graph.load_order() {
            tracing::info!("{line}");
        }
        tracing::info!(
            native = graph.native_count(),
            custom = graph.custom_count(),
            missing = report.missing.len(),
            "injector started"
        );
        self.report = Some(report);

        Ok(InterceptionController::new(Arc::new(graph), Arc::new(generators), bridge)
            .with_host_fields(self.fields.clone())
            .with_hooks(Arc::clone(&self.hooks)))
    }
}
