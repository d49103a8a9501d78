#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

fn fields(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// LogSinkManager tests

#[test]
fn LogSinkManager___new___default_level_is_info() {
    let manager = LogSinkManager::new();

    assert_eq!(manager.level(), LogLevel::Info);
    assert!(!manager.has_sink());
}

#[test_case(LogLevel::Debug, LogLevel::Debug, true)]
#[test_case(LogLevel::Debug, LogLevel::Trace, false)]
#[test_case(LogLevel::Warn, LogLevel::Info, false)]
#[test_case(LogLevel::Warn, LogLevel::Error, true)]
#[test_case(LogLevel::Off, LogLevel::Error, false)]
fn LogSinkManager___is_enabled___compares_against_level(
    configured: LogLevel,
    event: LogLevel,
    expected: bool,
) {
    let manager = LogSinkManager::new();
    manager.set_level(configured);

    assert_eq!(manager.is_enabled(event), expected);
}

#[test]
fn LogSinkManager___log_with_sink___forwards_template_and_fields() {
    let manager = LogSinkManager::new();
    let sink = Arc::new(MemorySink::new());
    manager.set_sink(sink.clone());

    manager.log(
        LogLevel::Warn,
        "jrtest_service::workspace",
        "Could not read workspace",
        &fields(&[("workspace_id", "1015024")]),
    );

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].template, "Could not read workspace");
    assert_eq!(records[0].fields["workspace_id"], "1015024");
}

#[test]
fn LogSinkManager___log_below_level___dropped() {
    let manager = LogSinkManager::new();
    let sink = Arc::new(MemorySink::new());
    manager.set_sink(sink.clone());

    manager.log(LogLevel::Debug, "t", "noise", &BTreeMap::new());

    assert!(sink.records().is_empty());
}

#[test]
fn LogSinkManager___clear_sink___stops_forwarding() {
    let manager = LogSinkManager::new();
    let sink = Arc::new(MemorySink::new());
    manager.set_sink(sink.clone());
    manager.clear_sink();

    manager.log(LogLevel::Error, "t", "lost", &BTreeMap::new());

    assert!(sink.records().is_empty());
    assert!(!manager.has_sink());
}

#[test]
fn LogSinkManager___global___same_instance() {
    let a = LogSinkManager::global() as *const _;
    let b = LogSinkManager::global() as *const _;

    assert_eq!(a, b);
}

// MemorySink tests

#[test]
fn MemorySink___with_template___filters_records() {
    let sink = MemorySink::new();
    sink.log(LogLevel::Info, "t", "a", &BTreeMap::new());
    sink.log(LogLevel::Info, "t", "b", &BTreeMap::new());

    let matched = sink.with_template("b");

    assert_eq!(matched.len(), 1);
    sink.clear();
    assert!(sink.records().is_empty());
}
