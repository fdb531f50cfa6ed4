//! Integration tests for the declargs binary: exit codes, streams and JSON output.

use std::path::PathBuf;
use std::process::{Command, Output};

const FILETREE_SPEC: &str = r#"{
    "description": "Iterate recursively over a directory and print its files.",
    "options": [
        {"name": "follow-symlink", "help": "Follow symbolic links for directories.",
         "value_type": "bool", "default": "false"},
        {"name": "full-path", "short": "f", "help": "Print full path."},
        {"name": "max-depth", "short": "L", "help": "How much the iteration can be nested.",
         "value_type": "int", "int_bounds": {"between": [1, 50]}, "default": "5"}
    ],
    "positionals": [
        {"name": "root", "help": "Root directory to be iterated over.", "default": "."}
    ]
}"#;

fn declargs_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_declargs"))
}

fn run(subcommand: &str, extra: &[&str]) -> Output {
    Command::new(declargs_bin())
        .args([subcommand, "--spec", FILETREE_SPEC, "--name", "filetree"])
        .args(extra)
        .env_remove("DECLARGS_LOG")
        .output()
        .expect("failed to run declargs")
}

fn parse_with(flags: &[&str], args: &[&str]) -> Output {
    let mut extra: Vec<&str> = flags.to_vec();
    extra.push("--");
    extra.extend_from_slice(args);
    run("parse", &extra)
}

fn parse(args: &[&str]) -> Output {
    parse_with(&[], args)
}

#[test]
fn test_parse_prints_json_results() {
    let output = parse(&["-f", "-L7", "/tmp"]);
    assert!(
        output.status.success(),
        "parse failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["options"]["full-path"]["specified"], true);
    assert_eq!(parsed["options"]["full-path"]["raw"], "");
    assert_eq!(parsed["options"]["max-depth"]["value"], 7);
    assert_eq!(parsed["options"]["follow-symlink"]["value"], false);
    assert_eq!(parsed["positionals"]["root"]["raw"], "/tmp");
    assert!(parsed["extra"].as_array().unwrap().is_empty());
}

#[test]
fn test_parse_error_exits_with_failure() {
    let output = parse(&["--max-depth", "0"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(
        stderr,
        "ERROR!\n\
         USAGE: filetree [--follow-symlink ...] [--full-path|-f] [--max-depth|-L ...] [--] [root] \n\
         Invalid value for option '--max-depth', '0' is out of range. (min value: 1, max value: 50)\n\
         Type 'filetree --help' for more information.\n"
    );
}

#[test]
fn test_parse_help_exits_with_success() {
    let output = parse(&["--help"]);
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Iterate recursively over a directory and print its files.\n"));
    assert!(stdout.contains("  Positional Arguments:\n"));
    assert!(stdout.contains("    [--full-path|-f]          Print full path.\n"));
}

#[test]
fn test_parse_attribution_exits_with_success() {
    let output = parse(&["--declargs"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("Copyright (c)"));
}

#[test]
fn test_grouped_value_option_is_rejected() {
    let output = parse(&["-fL", "7"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains(
        "-L requires a value, so it cannot be used in group, but you entered: -fL"
    ));
}

#[test]
fn test_too_many_positionals() {
    let output = parse(&["a", "b"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr)
        .contains("Only 1 positional arguments are accepted, but you gave 'b'"));
}

#[test]
fn test_extra_values_collected() {
    let output = parse_with(&["--extra"], &["a", "b", "c"]);
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["positionals"]["root"]["raw"], "a");
    assert_eq!(parsed["extra"], serde_json::json!(["b", "c"]));
}

#[test]
fn test_help_subcommand_matches_help_flag() {
    let from_subcommand = run("help", &[]);
    let from_flag = parse(&["-h"]);
    assert!(from_subcommand.status.success());
    assert_eq!(from_subcommand.stdout, from_flag.stdout);
}

#[test]
fn test_usage_subcommand() {
    let output = run("usage", &[]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "USAGE: filetree [--follow-symlink ...] [--full-path|-f] [--max-depth|-L ...] [--] [root] \n"
    );
}

#[test]
fn test_invalid_spec_is_reported() {
    let output = Command::new(declargs_bin())
        .args(["parse", "--spec", "{not json", "--"])
        .output()
        .expect("failed to run declargs");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to parse argument table"));
}
