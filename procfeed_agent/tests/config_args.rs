//! Flag parsing: long, short, and `=` forms, defaults, and rejection of bad
//! values.

use std::time::Duration;

use procfeed_agent::config::{parse_args, DEFAULT_AMQP, DEFAULT_QUEUE};

fn args(list: &[&str]) -> Vec<String> {
    std::iter::once("procfeed_agent")
        .chain(list.iter().copied())
        .map(String::from)
        .collect()
}

#[test]
fn defaults_when_nothing_given() {
    let cfg = parse_args(args(&[])).expect("defaults parse");
    assert_eq!(cfg.amqp, DEFAULT_AMQP);
    assert_eq!(cfg.queue, DEFAULT_QUEUE);
    assert_eq!(cfg.interval, Duration::from_secs(3));
    assert_eq!(cfg.cpu_window, Duration::from_millis(500));
    assert_eq!(cfg.net_window, Duration::from_millis(200));
    assert!(cfg.platform.is_none());
    assert!(!cfg.json);
    assert_eq!(cfg.buffer, 0);
}

#[test]
fn long_short_and_assign_forms() {
    let cfg = parse_args(args(&["--amqp", "amqp://broker:5672/%2f", "-q", "other"]))
        .expect("long/short parse");
    assert_eq!(cfg.amqp, "amqp://broker:5672/%2f");
    assert_eq!(cfg.queue, "other");

    let cfg = parse_args(args(&["--queue=q2", "--interval=1.5"])).expect("assign parse");
    assert_eq!(cfg.queue, "q2");
    assert_eq!(cfg.interval, Duration::from_secs_f64(1.5));

    let cfg = parse_args(args(&["-i", "10", "-P", "osx"])).expect("short parse");
    assert_eq!(cfg.interval, Duration::from_secs(10));
    assert_eq!(cfg.platform.as_deref(), Some("osx"));
}

#[test]
fn json_and_buffer_flags() {
    let cfg = parse_args(args(&["--json", "--buffer", "5"])).expect("flags parse");
    assert!(cfg.json);
    assert_eq!(cfg.buffer, 5);

    let cfg = parse_args(args(&["--buffer=16"])).expect("assign parse");
    assert_eq!(cfg.buffer, 16);
}

#[test]
fn bad_values_are_rejected() {
    assert!(parse_args(args(&["--interval", "soon"])).is_err());
    assert!(parse_args(args(&["--interval", "0"])).is_err());
    assert!(parse_args(args(&["--interval", "-2"])).is_err());
    assert!(parse_args(args(&["--buffer", "many"])).is_err());
    assert!(parse_args(args(&["--frobnicate"])).is_err());
}

#[test]
fn help_returns_usage() {
    let err = parse_args(args(&["--help"])).unwrap_err();
    assert!(err.contains("Usage:"));
    assert!(err.contains("--amqp") && err.contains("--queue") && err.contains("--interval"));
}
