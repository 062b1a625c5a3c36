//! Tracing subscriber configuration.
//!
//! Every statesplice crate logs through `tracing` macros and never installs a
//! subscriber itself. [`TracingSetup`] is the one place that does, usually once
//! at startup before the injector is started.
//!
//! The filter has one base level plus optional per-crate levels, so a noisy
//! controller can be traced without flooding the log with graph validation:
//!
//! ```
//! use statesplice_core::{TracingFormat, TracingSetup};
//! use tracing::Level;
//!
//! TracingSetup::new()
//!     .with_level(Level::INFO)
//!     .with_format(TracingFormat::Compact)
//!     .with_target("statesplice_controller", Level::TRACE)
//!     .install();
//! ```

use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TracingFormat {
    /// Human-readable colored output (default).
    #[default]
    Pretty,
    /// Compact single-line output.
    Compact,
    /// JSON structured output for log aggregation.
    Json,
}

fn directive_level(level: Level) -> String {
    level.as_str().to_ascii_lowercase()
}

type FmtLayer = Box<dyn Layer<Registry> + Send + Sync>;

impl TracingFormat {
    fn layer(self) -> FmtLayer {
        let layer = fmt::layer().with_target(true);
        match self {
            TracingFormat::Pretty => layer.pretty().boxed(),
            TracingFormat::Compact => layer.compact().boxed(),
            TracingFormat::Json => layer.json().boxed(),
        }
    }
}

/// Builder for the global `tracing` subscriber.
#[derive(Debug, Clone)]
pub struct TracingSetup {
    level: Level,
    format: TracingFormat,
    targets: Vec<(String, Level)>,
}

impl Default for TracingSetup {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: TracingFormat::Pretty,
            targets: Vec::new(),
        }
    }
}

impl TracingSetup {
    /// Creates a setup with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the level for targets without their own level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the level for one target, typically a statesplice crate name.
    ///
    /// A later call for the same target replaces the earlier level.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>, level: Level) -> Self {
        let target = target.into();
        self.targets.retain(|(existing, _)| *existing != target);
        self.targets.push((target, level));
        self
    }

    /// Returns the base level.
    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Returns the configured format.
    #[must_use]
    pub fn format(&self) -> TracingFormat {
        self.format
    }

    /// Returns the per-target levels, in the order they were set.
    #[must_use]
    pub fn targets(&self) -> &[(String, Level)] {
        &self.targets
    }

    /// Builds the filter: the base level plus one directive per target.
    ///
    /// Targets that do not form a valid directive are skipped.
    #[must_use]
    pub fn filter(&self) -> EnvFilter {
        let directives = std::iter::once(directive_level(self.level))
            .chain(
                self.targets
                    .iter()
                    .map(|(target, level)| format!("{target}={}", directive_level(*level))),
            )
            .collect::<Vec<_>>()
            .join(",");
        EnvFilter::builder().parse_lossy(directives)
    }

    /// Installs the global subscriber.
    ///
    /// Returns `false` if a subscriber was already installed; that subscriber
    /// stays in place.
    pub fn install(&self) -> bool {
        let installed = tracing_subscriber::registry()
            .with(self.format.layer())
            .with(self.filter())
            .try_init()
            .is_ok();
        if installed {
            tracing::info!(
                level = %self.level,
                format = ?self.format,
                targets = self.targets.len(),
                "tracing installed"
            );
        }
        installed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_info_pretty() {
        let setup = TracingSetup::default();
        assert_eq!(setup.level(), Level::INFO);
        assert_eq!(setup.format(), TracingFormat::Pretty);
        assert!(setup.targets().is_empty());
        assert_eq!(setup.filter().to_string().to_lowercase(), "info");
    }

    #[test]
    fn target_levels_join_the_filter() {
        let setup = TracingSetup::new()
            .with_level(Level::WARN)
            .with_target("statesplice_controller", Level::TRACE)
            .with_target("statesplice_graph", Level::DEBUG);
        let filter = setup.filter().to_string().to_lowercase();
        assert!(filter.contains("statesplice_controller=trace"), "{filter}");
        assert!(filter.contains("statesplice_graph=debug"), "{filter}");
        assert!(filter.contains("warn"), "{filter}");
    }

    #[test]
    fn repeated_target_keeps_last_level() {
        let setup = TracingSetup::new()
            .with_target("statesplice_graph", Level::DEBUG)
            .with_target("statesplice_graph", Level::ERROR);
        assert_eq!(
            setup.targets(),
            [("statesplice_graph".to_string(), Level::ERROR)]
        );
    }

    #[test]
    fn second_install_keeps_the_first_subscriber() {
        TracingSetup::new().with_format(TracingFormat::Compact).install();
        assert!(!TracingSetup::new().with_format(TracingFormat::Json).install());
    }

    #[test]
    fn format_names_are_lowercase() {
        let format: TracingFormat = serde_json::from_str("\"compact\"").unwrap();
        assert_eq!(format, TracingFormat::Compact);
    }
}
