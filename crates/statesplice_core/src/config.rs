//! Startup configuration.
//!
//! A [`SpliceConfig`] carries the splice list in its textual form
//! (`"stepName:afterStepName, ..."`), the names of the host fields the
//! controller reads and writes, and logging settings. It is usually loaded from
//! a JSON file next to the host:
//!
//! ```json
//! {
//!     "steps": "Rivers:Terrain, Bridges:Rivers",
//!     "host_fields": { "current": "NativeFieldInfoPtr_loadState" },
//!     "log_level": "info",
//!     "log_targets": { "statesplice_controller": "trace" },
//!     "log_format": "compact"
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use statesplice_bridge::HostLayout;
use thiserror::Error;
use tracing::Level;

use crate::tracing_setup::{TracingFormat, TracingSetup};

/// Errors raised while loading or interpreting configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The step list has no entries.
    #[error("no custom steps configured")]
    Empty,

    /// A step list entry is not of the form `step:after`.
    #[error("malformed step entry '{entry}', expected 'step:after'")]
    MalformedEntry {
        /// The offending entry, trimmed.
        entry: String,
    },

    /// The log level is not a `tracing` level name.
    #[error("unknown log level '{value}'")]
    LogLevel {
        /// The configured value.
        value: String,
    },

    /// The configuration is not valid JSON for [`SpliceConfig`].
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        /// The file path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// One `step:after` pair from the step list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpliceEntry {
    /// The custom step name.
    pub step: String,
    /// The step it is spliced after.
    pub after: String,
}

/// Parses a comma-separated `step:after` list.
///
/// Whitespace around names is trimmed and empty entries are skipped. The
/// entries are returned in the order written.
///
/// # Errors
///
/// - [`ConfigError::Empty`] if no entries remain
/// - [`ConfigError::MalformedEntry`] if an entry does not contain exactly one
///   `:` or has an empty side
///
/// # Example
///
/// ```
/// use statesplice_core::parse_step_list;
///
/// let entries = parse_step_list(" Rivers : Terrain ,, Bridges:Rivers ").unwrap();
/// assert_eq!(entries[0].step, "Rivers");
/// assert_eq!(entries[1].after, "Rivers");
/// ```
pub fn parse_step_list(text: &str) -> Result<Vec<SpliceEntry>, ConfigError> {
    let mut entries = Vec::new();
    for raw in text.split(',') {
        let entry = raw.trim();
        if entry.is_empty() {
            continue;
        }

        let malformed = || ConfigError::MalformedEntry {
            entry: entry.to_string(),
        };
        let (step, after) = entry.split_once(':').ok_or_else(malformed)?;
        let (step, after) = (step.trim(), after.trim());
        if step.is_empty() || after.is_empty() || after.contains(':') {
            return Err(malformed());
        }

        entries.push(SpliceEntry {
            step: step.to_string(),
            after: after.to_string(),
        });
    }

    if entries.is_empty() {
        return Err(ConfigError::Empty);
    }
    Ok(entries)
}

/// Names of the host fields the controller accesses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostFields {
    /// Progress counter (`i32`).
    pub cursor: String,
    /// Current state ordinal (`i32`).
    pub current: String,
    /// Generation enabled flag (`bool`).
    pub generate_enabled: String,
    /// Long-running sub-operation active flag (`bool`).
    pub busy: String,
    /// Long-running sub-operation finished flag (`bool`).
    pub sub_operation_done: String,
}

impl Default for HostFields {
    fn default() -> Self {
        Self {
            cursor: "loadCursor".to_string(),
            current: "loadState".to_string(),
            generate_enabled: "generateNew".to_string(),
            busy: "loadingOperationActive".to_string(),
            sub_operation_done: "subOperationDone".to_string(),
        }
    }
}

/// Startup configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpliceConfig {
    /// Comma-separated `step:after` list in dependency order.
    #[serde(default)]
    pub steps: String,
    /// Host field names; unspecified fields keep their defaults.
    #[serde(default)]
    pub host_fields: HostFields,
    /// Prefix of the host interop layer's alternate field names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_prefix: Option<String>,
    /// Maximum log level (`trace` through `error`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    /// Per-target log levels, keyed by target (usually a crate name).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub log_targets: BTreeMap<String, String>,
    /// Log output format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_format: Option<TracingFormat>,
}

impl SpliceConfig {
    /// Creates a configuration with only a step list.
    #[must_use]
    pub fn with_steps(steps: impl Into<String>) -> Self {
        Self {
            steps: steps.into(),
            ..Self::default()
        }
    }

    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for invalid JSON or unknown keys.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Json`] if it does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Self::from_json(&text)
    }

    /// Parses the step list.
    ///
    /// # Errors
    ///
    /// See [`parse_step_list`].
    pub fn splices(&self) -> Result<Vec<SpliceEntry>, ConfigError> {
        parse_step_list(&self.steps)
    }

    /// Applies the configured alternate-name prefix, if any, to `layout`.
    #[must_use]
    pub fn apply_layout(&self, layout: HostLayout) -> HostLayout {
        match &self.alternate_prefix {
            Some(prefix) => layout.with_alternate_prefix(prefix.clone()),
            None => layout,
        }
    }

    /// Builds the tracing setup described by the logging settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::LogLevel`] for an unknown level name.
    pub fn tracing_setup(&self) -> Result<TracingSetup, ConfigError> {
        let mut setup = TracingSetup::new();
        if let Some(value) = &self.log_level {
            setup = setup.with_level(parse_level(value)?);
        }
        for (target, value) in &self.log_targets {
            setup = setup.with_target(target.clone(), parse_level(value)?);
        }
        if let Some(format) = self.log_format {
            setup = setup.with_format(format);
        }
        Ok(setup)
    }
}

fn parse_level(value: &str) -> Result<Level, ConfigError> {
    value.parse::<Level>().map_err(|_| ConfigError::LogLevel {
        value: value.to_string(),
    })
}
