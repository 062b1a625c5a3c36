//! The two-phase interception protocol.
//!
//! The host advances through its own step enumeration one tick at a time. To
//! splice a custom step `X` between `A` and `B`, the controller rewrites the
//! host's current-state value at two points around each tick:
//!
//! - **Post-tick**: if the host has just moved to `A` and `X` is spliced after
//!   `A`, the current state is rewritten to `X`'s ordinal. A host that spends
//!   several ticks on `A` is only redirected on the tick it arrived.
//! - **Pre-tick** (next tick): the host is at `X`. The generators of `X` and of
//!   every custom step chained behind it run, the current state is rewritten to
//!   `X`'s resume target `A`, and the cursor is decremented once so the host's
//!   own counting ignores the detour. The host then advances from `A` to `B`.
//!
//! Both phases are no-ops unless the guard in [`HostSnapshot::guard`] passes.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use statesplice_bridge::HostBridge;
use statesplice_core::HostFields;
use statesplice_graph::{GeneratorRegistry, Ordinal, Step, StepGraph};

use crate::error::ControllerError;
use crate::hooks::{HooksAPI, SpliceEvent};
use crate::host::{GuardSkip, HostSnapshot};

/// Result of [`InterceptionController::pre_tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreTickOutcome {
    /// A guard failed; nothing was written.
    Skipped(GuardSkip),
    /// The host is not at a custom step.
    Idle,
    /// The host was at a custom step and has been sent to its resume target.
    Detoured {
        /// Steps whose generator ran, in chain order.
        generated: Vec<String>,
        /// The step the host now points at.
        resumed_at: Step,
        /// The host cursor after compensation.
        cursor: i32,
    },
}

/// Result of [`InterceptionController::post_tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostTickOutcome {
    /// A guard failed; nothing was written.
    Skipped(GuardSkip),
    /// No custom step is spliced after the host's current step.
    Idle,
    /// The host is still on the step it started the tick from.
    Unchanged,
    /// The host now points at a custom step.
    Injected {
        /// The custom step.
        step: Step,
        /// Where the host will resume after it.
        resume: Step,
    },
}

/// Both outcomes of one [`InterceptionController::tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    /// Outcome of the pre-tick hook.
    pub pre: PreTickOutcome,
    /// Outcome of the post-tick hook.
    pub post: PostTickOutcome,
}

/// Drives custom steps through a host's tick loop.
///
/// The controller shares its [`StepGraph`] and [`GeneratorRegistry`] through
/// `Arc`s and serialises its two phases with an internal lock, so one
/// controller per host instance can be driven from any thread.
///
/// Between the two phases the lock holds the ordinal the host starts its
/// update from, so the post-tick phase can tell a transition from a host that
/// stayed put.
pub struct InterceptionController<B> {
    graph: Arc<StepGraph>,
    generators: Arc<GeneratorRegistry>,
    bridge: B,
    fields: HostFields,
    hooks: Arc<HooksAPI>,
    entered: Mutex<Option<Ordinal>>,
}

impl<B> core::fmt::Debug for InterceptionController<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InterceptionController")
            .field("graph", &self.graph)
            .field("generators", &self.generators)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl<B: HostBridge> InterceptionController<B> {
    /// Creates a controller with default host field names and no observers.
    #[must_use]
    pub fn new(graph: Arc<StepGraph>, generators: Arc<GeneratorRegistry>, bridge: B) -> Self {
        Self {
            graph,
            generators,
            bridge,
            fields: HostFields::default(),
            hooks: Arc::new(HooksAPI::new()),
            entered: Mutex::new(None),
        }
    }

    /// Sets the host field names.
    #[must_use]
    pub fn with_host_fields(mut self, fields: HostFields) -> Self {
        self.fields = fields;
        self
    }

    /// Sets the observer registry.
    #[must_use]
    pub fn with_hooks(mut self, hooks: Arc<HooksAPI>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Returns the step graph.
    #[must_use]
    pub fn graph(&self) -> &StepGraph {
        &self.graph
    }

    /// Returns the generator registry.
    #[must_use]
    pub fn generators(&self) -> &GeneratorRegistry {
        &self.generators
    }

    /// Returns the bridge.
    #[must_use]
    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    /// Returns the host field names.
    #[must_use]
    pub fn host_fields(&self) -> &HostFields {
        &self.fields
    }

    /// Returns the observer registry.
    #[must_use]
    pub fn hooks(&self) -> &HooksAPI {
        &self.hooks
    }

    /// Reads the guarded host fields.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Bridge`] if a field cannot be read.
    pub fn snapshot(&self, instance: &B::Instance<'_>) -> Result<HostSnapshot, ControllerError> {
        Ok(HostSnapshot::read(&self.bridge, instance, &self.fields)?)
    }

    /// Runs before the host computes its next state.
    ///
    /// If the host is at a custom step, runs the generators of that step and
    /// of the steps chained behind it, then rewrites the current state to the
    /// resume target and decrements the cursor by one.
    ///
    /// # Errors
    ///
    /// - [`ControllerError::Generation`] if a generator fails; the host is left
    ///   pointing at the custom step and generators later in the chain do not
    ///   run
    /// - [`ControllerError::Bridge`] if a host field cannot be accessed
    pub fn pre_tick(&self, instance: &mut B::Instance<'_>) -> Result<PreTickOutcome, ControllerError> {
        let mut entered = self.entered.lock();
        *entered = None;

        let snapshot = self.snapshot(instance)?;
        *entered = Some(snapshot.current);
        if let Err(skip) = snapshot.guard(self.graph.total_steps()) {
            tracing::trace!(%skip, "pre-tick skipped");
            return Ok(PreTickOutcome::Skipped(skip));
        }

        let chain = self.graph.chain_from(snapshot.current);
        let (Some(arrived), Some(tail)) = (chain.first(), chain.last()) else {
            return Ok(PreTickOutcome::Idle);
        };

        let mut generated = Vec::new();
        for custom in &chain {
            if self.generate(custom.step())? {
                generated.push(custom.step().name().to_string());
            }
        }

        let resume = tail.original();
        let cursor = snapshot.cursor - 1;
        self.bridge
            .set(instance, &self.fields.current, resume.ordinal().get())?;
        self.bridge.set(instance, &self.fields.cursor, cursor)?;
        *entered = Some(resume.ordinal());

        tracing::debug!(
            step = %arrived.step(),
            resume = %resume,
            cursor,
            "resumed host after custom step"
        );
        self.emit(&SpliceEvent::Resumed {
            step: arrived.step().clone(),
            resume: resume.clone(),
            cursor,
        });

        Ok(PreTickOutcome::Detoured {
            generated,
            resumed_at: resume,
            cursor,
        })
    }

    /// Runs after the host has computed its next state.
    ///
    /// If the host moved to a new step during its update and a custom step is
    /// spliced after that step, resolves the resume targets of the custom
    /// step's chain and rewrites the current state to the custom step.
    ///
    /// The starting step is the one seen by the preceding
    /// [`pre_tick`](Self::pre_tick). Without one, the host counts as having
    /// moved.
    ///
    /// # Errors
    ///
    /// - [`ControllerError::Bridge`] if a host field cannot be accessed
    /// - [`ControllerError::Steps`] if a resume target cannot be resolved
    pub fn post_tick(
        &self,
        instance: &mut B::Instance<'_>,
    ) -> Result<PostTickOutcome, ControllerError> {
        let entered = self.entered.lock().take();

        let snapshot = self.snapshot(instance)?;
        if let Err(skip) = snapshot.guard(self.graph.total_steps()) {
            tracing::trace!(%skip, "post-tick skipped");
            return Ok(PostTickOutcome::Skipped(skip));
        }
        if entered == Some(snapshot.current) {
            return Ok(PostTickOutcome::Unchanged);
        }

        let Some(custom) = self.graph.custom_after(snapshot.current) else {
            return Ok(PostTickOutcome::Idle);
        };

        for chained in self.graph.chain_from(custom.step().ordinal()) {
            self.graph.resolve_original(chained.step().name())?;
        }
        let resume = custom.original();

        self.bridge
            .set(instance, &self.fields.current, custom.step().ordinal().get())?;

        tracing::info!(
            step = %custom.step(),
            after = %custom.after(),
            resume = %resume,
            "injected custom step"
        );
        self.emit(&SpliceEvent::Injected {
            step: custom.step().clone(),
            after: custom.after().clone(),
            resume: resume.clone(),
        });

        Ok(PostTickOutcome::Injected {
            step: custom.step().clone(),
            resume,
        })
    }

    /// Runs the pre-tick hook, the host's own update, then the post-tick hook.
    ///
    /// # Errors
    ///
    /// Propagates the first hook error. A pre-tick failure skips the update.
    pub fn tick<'i, F>(
        &self,
        instance: &mut B::Instance<'i>,
        update: F,
    ) -> Result<TickOutcome, ControllerError>
    where
        F: FnOnce(&mut B::Instance<'i>),
    {
        let pre = self.pre_tick(instance)?;
        update(&mut *instance);
        let post = self.post_tick(instance)?;
        Ok(TickOutcome { pre, post })
    }

    /// Runs the generator for `step`. Returns false if none is registered.
    fn generate(&self, step: &Step) -> Result<bool, ControllerError> {
        let Some(generator) = self.generators.get(step.name()) else {
            tracing::error!(step = %step, "no generator registered");
            self.emit(&SpliceEvent::MissingGenerator { step: step.clone() });
            return Ok(false);
        };

        self.emit(&SpliceEvent::GenerationStart { step: step.clone() });
        let started = Instant::now();
        match generator.generate() {
            Ok(()) => {
                let duration = started.elapsed();
                tracing::info!(step = %step, ?duration, "generated custom step");
                self.emit(&SpliceEvent::GenerationComplete {
                    step: step.clone(),
                    duration,
                });
                Ok(true)
            }
            Err(error) => {
                tracing::error!(step = %step, %error, "generation failed");
                self.emit(&SpliceEvent::GenerationFailed {
                    step: step.clone(),
                    error: error.clone(),
                });
                Err(ControllerError::Generation {
                    step: step.name().to_string(),
                    source: error,
                })
            }
        }
    }

    fn emit(&self, event: &SpliceEvent) {
        tracing::trace!(phase = %event.phase(), %event, "splice event");
        self.hooks.invoke(event);
    }
}
