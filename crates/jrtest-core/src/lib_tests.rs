#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

// LogLevel ordering

#[test]
fn LogLevel___ordering___ascends_by_severity() {
    assert!(LogLevel::Trace < LogLevel::Debug);
    assert!(LogLevel::Debug < LogLevel::Info);
    assert!(LogLevel::Info < LogLevel::Warn);
    assert!(LogLevel::Warn < LogLevel::Error);
    assert!(LogLevel::Error < LogLevel::Off);
}

// LogLevel::from_u8

#[test_case(0, LogLevel::Trace)]
#[test_case(2, LogLevel::Info)]
#[test_case(4, LogLevel::Error)]
#[test_case(5, LogLevel::Off)]
#[test_case(100, LogLevel::Off)]
fn LogLevel___from_u8___maps_value(value: u8, expected: LogLevel) {
    assert_eq!(LogLevel::from_u8(value), expected);
}

// LogLevel::parse

#[test_case("debug", Some(LogLevel::Debug))]
#[test_case("  INFO ", Some(LogLevel::Info))]
#[test_case("warning", Some(LogLevel::Warn))]
#[test_case("none", Some(LogLevel::Off))]
#[test_case("verbose", None)]
#[test_case("", None)]
fn LogLevel___parse___accepts_config_strings(value: &str, expected: Option<LogLevel>) {
    assert_eq!(LogLevel::parse(value), expected);
}

#[test]
fn LogLevel___display___shows_uppercase() {
    assert_eq!(LogLevel::Trace.to_string(), "TRACE");
    assert_eq!(LogLevel::Warn.to_string(), "WARN");
}
