//! Tests for loading canvas settings and visible-flow bookkeeping.
use pipeviz::canvas::{DEFAULT_FIT_PADDING, DEFAULT_GRAPH_ID};
use pipeviz::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_default_settings() {
    let settings = CanvasSettings::default();
    assert_eq!(settings.layout, LayoutType::DagreHorizontal);
    assert_eq!(settings.graph_id, DEFAULT_GRAPH_ID);
    assert_eq!(settings.fit_padding, DEFAULT_FIT_PADDING);
}

#[test]
fn test_partial_settings_fill_defaults() {
    let settings = CanvasSettings::from_json(r#"{ "layout": "DagreVertical" }"#).unwrap();
    assert_eq!(settings.layout, LayoutType::DagreVertical);
    assert_eq!(settings.graph_id, "g1");
    assert_eq!(settings.fit_padding, 80);
}

#[test]
fn test_settings_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, r#"{{ "graphId": "canvas", "fitPadding": 20 }}"#).unwrap();

    let settings = CanvasSettings::from_file(file.path()).unwrap();
    assert_eq!(settings.graph_id, "canvas");
    assert_eq!(settings.fit_padding, 20);
    assert_eq!(settings.layout, LayoutType::DagreHorizontal);
}

#[test]
fn test_settings_errors() {
    assert!(matches!(
        CanvasSettings::from_json("{ not json"),
        Err(SettingsError::Parse(_))
    ));
    assert!(matches!(
        CanvasSettings::from_json(r#"{ "layout": "Circular" }"#),
        Err(SettingsError::Parse(_))
    ));

    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    let err = CanvasSettings::from_file(&missing).unwrap_err();
    assert!(matches!(err, SettingsError::Io { .. }));
    assert!(err.to_string().contains("missing.json"));
}

#[test]
fn test_visible_flows_bookkeeping() {
    let mut flows = VisibleFlows::from_ids(["a", "b"]);
    assert!(flows.is_visible("a"));
    assert!(!flows.is_visible("unknown"));

    assert!(!flows.toggle("a"));
    assert!(flows.toggle("a"));

    flows.hide_all();
    assert!(flows.all_hidden());

    flows.sync(["b", "c"]);
    assert_eq!(flows.len(), 2);
    assert!(!flows.is_visible("b"));
    assert!(flows.is_visible("c"));
    assert!(!flows.is_visible("a"));
}
