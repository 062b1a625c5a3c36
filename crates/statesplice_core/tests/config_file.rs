//! Tests for loading configuration from disk.

use statesplice_core::{ConfigError, SpliceConfig, TracingFormat};
use tempfile::tempdir;

#[test]
fn load_reads_json_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("statesplice.json");
    std::fs::write(
        &path,
        r#"{
            "steps": "Rivers:Terrain, Bridges:Rivers",
            "alternate_prefix": "m_",
            "log_format": "json"
        }"#,
    )
    .unwrap();

    let config = SpliceConfig::load(&path).unwrap();
    let entries = config.splices().unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].step, "Bridges");
    assert_eq!(config.alternate_prefix.as_deref(), Some("m_"));
    assert_eq!(config.log_format, Some(TracingFormat::Json));
    assert_eq!(config.host_fields.busy, "loadingOperationActive");
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.json");

    let err = SpliceConfig::load(&path).unwrap_err();
    assert!(matches!(&err, ConfigError::Io { path: p, .. } if *p == path));
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn absent_step_list_is_empty() {
    let config = SpliceConfig::from_json("{}").unwrap();
    assert!(matches!(config.splices(), Err(ConfigError::Empty)));
}
