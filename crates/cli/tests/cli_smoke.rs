//! CLI integration tests for ainedit.
//!
//! These exercise the shipped binary end to end against the bundled image
//! backend: mode selection, queue ordering across repeated flags, and the
//! no-partial-output guarantee.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the ainedit binary.
fn ainedit() -> Command {
  cargo_bin_cmd!("ainedit")
}

/// Write a fixture file under `dir` and return its path.
fn fixture(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
  let path = dir.path().join(name);
  fs::write(&path, content).unwrap();
  path
}

fn read_image(path: &Path) -> serde_json::Value {
  serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
}

// =============================================================================
// Help & version
// =============================================================================

#[test]
fn help_flag_works() {
  ainedit()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_works() {
  ainedit().arg("--version").assert().success();
}

// =============================================================================
// Direct edit
// =============================================================================

#[test]
fn creates_a_fresh_container_with_the_negotiated_version() {
  let dir = TempDir::new().unwrap();
  let out = dir.path().join("out.ain");

  ainedit()
    .args(["--ain-version", "9.2", "--silent", "-o"])
    .arg(&out)
    .assert()
    .success();

  let image = read_image(&out);
  assert_eq!(image["version"]["major"], 9);
  assert_eq!(image["version"]["minor"], 2);
  assert_eq!(image["encoding"], "CP932");
}

#[test]
fn applies_queued_inputs_in_command_line_order() {
  let dir = TempDir::new().unwrap();
  let code = fixture(&dir, "a.jam", b"CODE");
  let decls = fixture(&dir, "b.json", br#"{"title": "demo"}"#);
  let text_a = fixture(&dir, "a.txt", b"s[1] = \"first\"\ns[2] = \"kept\"\n");
  let text_b = fixture(&dir, "b.txt", b"s[1] = \"second\"\n");
  let out = dir.path().join("out.ain");

  ainedit()
    .arg("--code")
    .arg(&code)
    .arg("--json")
    .arg(&decls)
    .arg("--text")
    .arg(&text_a)
    .arg("--text")
    .arg(&text_b)
    .arg("-o")
    .arg(&out)
    .assert()
    .success();

  let image = read_image(&out);
  assert_eq!(image["declarations"]["title"], "demo");
  assert_eq!(image["code"][0]["data"], serde_json::to_value(b"CODE".to_vec()).unwrap());
  // Overlapping text entries: the later input wins.
  assert_eq!(image["strings"]["1"], "second");
  assert_eq!(image["strings"]["2"], "kept");
}

#[test]
fn loads_an_existing_container_and_ignores_version_for_loading() {
  let dir = TempDir::new().unwrap();
  let text = fixture(&dir, "t.txt", b"s[0] = \"hello\"\n");
  let first = dir.path().join("first.ain");
  let second = dir.path().join("second.ain");

  ainedit()
    .args(["--ain-version", "9"])
    .arg("-o")
    .arg(&first)
    .assert()
    .success();

  ainedit()
    .args(["--ain-version", "12"])
    .arg("--text")
    .arg(&text)
    .arg("-o")
    .arg(&second)
    .arg(&first)
    .assert()
    .success();

  let image = read_image(&second);
  // Loaded, not recreated: the container keeps its own version.
  assert_eq!(image["version"]["major"], 9);
  assert_eq!(image["strings"]["0"], "hello");
}

#[test]
fn failing_step_writes_no_output() {
  let dir = TempDir::new().unwrap();
  let code = fixture(&dir, "a.jam", b"CODE");
  let bad = fixture(&dir, "bad.json", b"not json");
  let out = dir.path().join("out.ain");

  ainedit()
    .arg("--code")
    .arg(&code)
    .arg("--json")
    .arg(&bad)
    .arg("-o")
    .arg(&out)
    .assert()
    .failure()
    .stderr(predicate::str::contains("bad.json"));

  assert!(!out.exists());
}

// =============================================================================
// Mode selection
// =============================================================================

#[test]
fn transcode_ignores_queued_inputs_with_a_warning() {
  let dir = TempDir::new().unwrap();
  let text = fixture(&dir, "t.txt", b"s[0] = \"ignored\"\n");
  let out = dir.path().join("out.ain");

  ainedit()
    .args(["--transcode", "UTF-8"])
    .arg("--text")
    .arg(&text)
    .arg("-o")
    .arg(&out)
    .assert()
    .success()
    .stderr(predicate::str::contains("ignored in --transcode mode"));

  let image = read_image(&out);
  assert_eq!(image["encoding"], "UTF-8");
  assert_eq!(image["strings"], serde_json::json!({}));
}

#[test]
fn project_mode_takes_precedence_over_everything() {
  let dir = TempDir::new().unwrap();
  let text = fixture(&dir, "t.txt", b"s[0] = \"ignored\"\n");
  let project = fixture(&dir, "game.pje", b"");

  // The bundled backend has no project toolchain, so the run fails, but it
  // must fail on the project path after warning about the discarded queue.
  ainedit()
    .arg("--project")
    .arg(&project)
    .args(["--transcode", "UTF-8"])
    .arg("--text")
    .arg(&text)
    .assert()
    .failure()
    .stderr(predicate::str::contains("ignored in --project mode"))
    .stderr(predicate::str::contains("project toolchain"));
}

#[test]
fn rejects_a_second_positional_argument() {
  ainedit()
    .args(["one.ain", "two.ain"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("unexpected argument"));
}

// =============================================================================
// Version negotiation
// =============================================================================

#[test]
fn rejects_overlong_version_segments() {
  ainedit()
    .args(["--ain-version", "123"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid ain version"));

  ainedit()
    .args(["--ain-version", "1.100"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid ain version"));
}

#[test]
fn rejects_unsupported_major_versions() {
  ainedit()
    .args(["--ain-version", "3"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("4-14 supported"));

  ainedit()
    .args(["--ain-version", "15"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("4-14 supported"));
}

#[test]
fn silent_suppresses_informational_output() {
  let dir = TempDir::new().unwrap();
  let out = dir.path().join("out.ain");

  ainedit()
    .arg("--silent")
    .arg("-o")
    .arg(&out)
    .assert()
    .success()
    .stdout(predicate::str::is_empty());

  assert!(out.exists());
}
