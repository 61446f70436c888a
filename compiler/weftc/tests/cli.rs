// Test code uses unwrap/expect for clarity - panics provide good test failure messages
#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end tests for the command handlers behind `weftc`.
//!
//! Each test writes documents into a temporary directory and drives a
//! command with in-memory `out`/`err` buffers.

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use weftc::commands::{
    check_file, parse_file, parse_run_options, run_file, CliError, RunOptions,
};

fn write(dir: &Path, name: &str, src: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, src).unwrap();
    path
}

fn text(buf: &[u8]) -> String {
    String::from_utf8(buf.to_vec()).unwrap()
}

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}

#[test]
fn parse_prints_tree_as_json() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "hello.wft",
        r#"<component name="Hello"><set name="x" value="1"/></component>"#,
    );
    let (mut out, mut err) = (Vec::new(), Vec::new());

    assert!(parse_file(&path, &mut out, &mut err).unwrap());

    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["type"], "component");
    assert_eq!(json["name"], "Hello");
    assert_eq!(json["children"][0]["type"], "set");
    assert!(err.is_empty());
}

#[test]
fn parse_reports_malformed_markup() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "bad.wft", "<component><set></component>");
    let (mut out, mut err) = (Vec::new(), Vec::new());

    let result = parse_file(&path, &mut out, &mut err);
    assert!(matches!(result, Err(CliError::Parse { .. })));
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = TempDir::new().unwrap();
    let (mut out, mut err) = (Vec::new(), Vec::new());

    let result = check_file(&dir.path().join("nope.wft"), &mut out, &mut err);
    assert!(matches!(result, Err(CliError::Read { .. })));
}

#[test]
fn check_accepts_valid_document() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "ok.wft",
        r#"<component name="Ok"><return value="1"/></component>"#,
    );
    let (mut out, mut err) = (Vec::new(), Vec::new());

    assert!(check_file(&path, &mut out, &mut err).unwrap());
    assert_eq!(text(&out), format!("OK: {} (component)\n", path.display()));
}

#[test]
fn check_fails_on_missing_required_attribute() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "broken.wft",
        r#"<component name="Broken"><set value="1"/></component>"#,
    );
    let (mut out, mut err) = (Vec::new(), Vec::new());

    assert!(!check_file(&path, &mut out, &mut err).unwrap());
    let err = text(&err);
    assert!(err.contains("<set>"), "{err}");
    assert!(err.contains("1 validation error(s)"), "{err}");
    assert!(out.is_empty());
}

#[test]
fn run_renders_components_and_prints_value() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "components/badge.wft",
        r#"<component name="Badge"><param name="label"/><b>{label}</b></component>"#,
    );
    let page = write(
        dir.path(),
        "page.wft",
        r#"<component name="Page"><Badge label="{user}"/><return value="{user}"/></component>"#,
    );
    let options = RunOptions {
        components: Some(dir.path().join("components")),
        session: vec![("user".to_string(), "Ada".to_string())],
    };
    let (mut out, mut err) = (Vec::new(), Vec::new());

    assert!(run_file(&page, &options, &mut out, &mut err).unwrap());
    assert_eq!(text(&out), "<b>Ada</b>\n=> \"Ada\"\n");
    assert!(err.is_empty());
}

#[test]
fn run_reads_data_relative_to_document() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "cfg.json", r#"{"port": 8080}"#);
    let page = write(
        dir.path(),
        "page.wft",
        r#"<component name="Cfg"><data name="cfg" path="cfg.json"/><return value="{cfg.port}"/></component>"#,
    );
    let (mut out, mut err) = (Vec::new(), Vec::new());

    assert!(run_file(&page, &RunOptions::default(), &mut out, &mut err).unwrap());
    assert_eq!(text(&out), "=> 8080\n");
}

#[test]
fn run_reports_evaluation_errors() {
    let dir = TempDir::new().unwrap();
    let page = write(
        dir.path(),
        "page.wft",
        r#"<component name="Page"><return value="{missing}"/></component>"#,
    );
    let (mut out, mut err) = (Vec::new(), Vec::new());

    assert!(!run_file(&page, &RunOptions::default(), &mut out, &mut err).unwrap());
    let err = text(&err);
    assert!(err.starts_with("error: "), "{err}");
    assert!(err.contains("missing"), "{err}");
}

#[test]
fn run_options_accept_both_flag_forms() {
    let (file, options) = parse_run_options(&args(&[
        "--session",
        "user=Ada",
        "page.wft",
        "--components=ui",
        "--session=theme=dark",
    ]))
    .unwrap();

    assert_eq!(file, PathBuf::from("page.wft"));
    assert_eq!(
        options,
        RunOptions {
            components: Some(PathBuf::from("ui")),
            session: vec![
                ("user".to_string(), "Ada".to_string()),
                ("theme".to_string(), "dark".to_string()),
            ],
        }
    );
}

#[test]
fn run_options_usage_errors() {
    for bad in [
        &["--components"][..],
        &["page.wft", "--session", "novalue"],
        &["page.wft", "--verbose"],
        &["a.wft", "b.wft"],
        &[],
    ] {
        let result = parse_run_options(&args(bad));
        assert!(
            matches!(result, Err(CliError::Usage(_))),
            "expected usage error for {bad:?}"
        );
    }
}
