//! Integration tests for the `tl` CLI.
//!
//! Each test creates a temp list directory, runs `tl` as a subprocess,
//! and verifies stdout and/or file contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use pretty_assertions::assert_eq;
use serde_json::Value;

/// Get the path to the built `tl` binary.
fn tl_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("tl");
    path
}

const STORE: &str = r#"{
  "theme": "dark",
  "todos": [
    { "id": 1, "text": "buy milk", "completed": false },
    { "id": 2, "text": "walk dog", "completed": true },
    { "id": 5, "text": "read book", "completed": false }
  ]
}"#;

/// Create a list with three tasks (one completed) and one foreign key.
fn create_test_list(root: &Path) {
    let list_dir = root.join(".tasklist");
    fs::create_dir_all(&list_dir).unwrap();
    fs::write(
        list_dir.join("config.toml"),
        "[store]\nfile = \"store.json\"\nkey = \"todos\"\n\n[view]\nfilter = \"all\"\n",
    )
    .unwrap();
    fs::write(list_dir.join("store.json"), STORE).unwrap();
}

fn store_json(root: &Path) -> Value {
    let text = fs::read_to_string(root.join(".tasklist/store.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn stored_ids(root: &Path) -> Vec<u64> {
    store_json(root)["todos"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_u64().unwrap())
        .collect()
}

/// Run `tl` with the given args in the given directory, returning (stdout, stderr, success).
fn run_tl(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(tl_bin())
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run tl");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `tl` expecting success, return stdout.
fn run_tl_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_tl(dir, args);
    if !success {
        panic!(
            "tl {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

#[test]
fn test_init_creates_list() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_tl_ok(tmp.path(), &["init"]);
    assert!(out.contains("Initialized task list"));
    assert!(tmp.path().join(".tasklist/config.toml").is_file());

    let out = run_tl_ok(tmp.path(), &["list"]);
    assert_eq!(out, "No tasks\n0 items left\n");
}

#[test]
fn test_init_twice_fails_without_force() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_tl_ok(tmp.path(), &["init"]);
    let (_, stderr, success) = run_tl(tmp.path(), &["init"]);
    assert!(!success);
    assert!(stderr.contains("already exists"));
    run_tl_ok(tmp.path(), &["init", "--force"]);
}

#[test]
fn test_outside_a_list_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_tl(tmp.path(), &["list"]);
    // A list in an enclosing directory would be found instead
    if !success {
        assert!(stderr.contains("no task list found"));
    }
}

#[test]
fn test_project_dir_flag() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    let elsewhere = tempfile::TempDir::new().unwrap();
    let dir = tmp.path().to_str().unwrap();
    let out = run_tl_ok(elsewhere.path(), &["-C", dir, "count"]);
    assert_eq!(out, "2 items left\n");
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

#[test]
fn test_list_all() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    let out = run_tl_ok(tmp.path(), &["list"]);
    assert_eq!(
        out,
        "[ ] 1 buy milk\n[x] 2 walk dog\n[ ] 5 read book\n2 items left\n"
    );
}

#[test]
fn test_list_filters() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    let out = run_tl_ok(tmp.path(), &["list", "--filter", "active"]);
    assert_eq!(out, "[ ] 1 buy milk\n[ ] 5 read book\n2 items left\n");

    let out = run_tl_ok(tmp.path(), &["list", "--filter", "completed"]);
    assert_eq!(out, "[x] 2 walk dog\n2 items left\n");
}

#[test]
fn test_list_does_not_write_store() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    run_tl_ok(tmp.path(), &["list"]);
    run_tl_ok(tmp.path(), &["count"]);
    let text = fs::read_to_string(tmp.path().join(".tasklist/store.json")).unwrap();
    assert_eq!(text, STORE);
}

#[test]
fn test_list_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    let out = run_tl_ok(tmp.path(), &["--json", "list", "--filter", "active"]);
    let view: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(view["mode"], "active");
    assert_eq!(view["remaining"], 2);
    assert_eq!(view["total"], 3);
    let texts: Vec<&str> = view["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["buy milk", "read book"]);
}

#[test]
fn test_count_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    let out = run_tl_ok(tmp.path(), &["count", "--json"]);
    let count: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(count["remaining"], 2);
    assert_eq!(count["total"], 3);
    assert_eq!(count["label"], "2 items left");
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

#[test]
fn test_add_appends_with_next_id() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    let out = run_tl_ok(tmp.path(), &["add", "  call", "mom  "]);
    assert_eq!(out.trim(), "6");

    let store = store_json(tmp.path());
    assert_eq!(stored_ids(tmp.path()), vec![1, 2, 5, 6]);
    assert_eq!(store["todos"][3]["text"], "call mom");
    assert_eq!(store["todos"][3]["completed"], false);
    // Keys the list does not own survive the save
    assert_eq!(store["theme"], "dark");
}

#[test]
fn test_add_blank_text_is_ignored() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    let (stdout, stderr, success) = run_tl(tmp.path(), &["add", "   "]);
    assert!(success);
    assert!(stdout.is_empty());
    assert!(stderr.contains("task text is empty"));
    assert_eq!(stored_ids(tmp.path()), vec![1, 2, 5]);
}

#[test]
fn test_toggle() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    let out = run_tl_ok(tmp.path(), &["toggle", "1"]);
    assert_eq!(out, "[x] 1 buy milk\n");
    assert_eq!(run_tl_ok(tmp.path(), &["count"]), "1 item left\n");

    run_tl_ok(tmp.path(), &["toggle", "1"]);
    assert_eq!(run_tl_ok(tmp.path(), &["count"]), "2 items left\n");
}

#[test]
fn test_toggle_unknown_id() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    let (_, stderr, success) = run_tl(tmp.path(), &["toggle", "42"]);
    assert!(success);
    assert!(stderr.contains("task not found: 42"));
}

#[test]
fn test_edit_replaces_text() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    let out = run_tl_ok(tmp.path(), &["edit", "5", "read", "two", "books"]);
    assert_eq!(out, "[ ] 5 read two books\n");
    assert_eq!(store_json(tmp.path())["todos"][2]["text"], "read two books");
}

#[test]
fn test_edit_to_empty_deletes() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    let out = run_tl_ok(tmp.path(), &["edit", "2"]);
    assert_eq!(out, "Deleted 2\n");
    assert_eq!(stored_ids(tmp.path()), vec![1, 5]);
}

#[test]
fn test_rm() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    run_tl_ok(tmp.path(), &["rm", "1"]);
    assert_eq!(stored_ids(tmp.path()), vec![2, 5]);

    // Ids are never reused
    assert_eq!(run_tl_ok(tmp.path(), &["add", "again"]).trim(), "6");
}

#[test]
fn test_clear_completed() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    let out = run_tl_ok(tmp.path(), &["--json", "clear"]);
    let removed: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(removed["removed"], 1);
    assert_eq!(stored_ids(tmp.path()), vec![1, 5]);

    let (_, stderr, success) = run_tl(tmp.path(), &["clear"]);
    assert!(success);
    assert!(stderr.contains("no completed tasks"));
}

#[test]
fn test_mv_before_and_after() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    run_tl_ok(tmp.path(), &["mv", "5", "--before", "1"]);
    assert_eq!(stored_ids(tmp.path()), vec![5, 1, 2]);

    run_tl_ok(tmp.path(), &["mv", "5", "--after", "2"]);
    assert_eq!(stored_ids(tmp.path()), vec![1, 2, 5]);

    let out = run_tl_ok(tmp.path(), &["mv", "1", "--after", "2"]);
    assert_eq!(
        out,
        "[x] 2 walk dog\n[ ] 1 buy milk\n[ ] 5 read book\n2 items left\n"
    );
}

#[test]
fn test_mv_onto_itself_is_ignored() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    let (stdout, stderr, success) = run_tl(tmp.path(), &["mv", "2", "--before", "2"]);
    assert!(success);
    assert!(stdout.is_empty());
    assert!(stderr.contains("relative to itself"));
    assert_eq!(stored_ids(tmp.path()), vec![1, 2, 5]);
}

#[test]
fn test_filter_sets_list_default() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    run_tl_ok(tmp.path(), &["filter", "completed"]);

    let config = fs::read_to_string(tmp.path().join(".tasklist/config.toml")).unwrap();
    assert!(config.contains("filter = \"completed\""));
    assert!(config.contains("key = \"todos\""));

    let out = run_tl_ok(tmp.path(), &["list"]);
    assert_eq!(out, "[x] 2 walk dog\n2 items left\n");
}

// ---------------------------------------------------------------------------
// Recovery
// ---------------------------------------------------------------------------

#[test]
fn test_corrupt_store_starts_empty_and_is_logged() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    fs::write(tmp.path().join(".tasklist/store.json"), "{ not json").unwrap();

    let (stdout, stderr, success) = run_tl(tmp.path(), &["list"]);
    assert!(success);
    assert_eq!(stdout, "No tasks\n0 items left\n");
    assert!(stderr.contains("could not load tasks"));

    let log = run_tl_ok(tmp.path(), &["recovery"]);
    assert!(log.contains("unreadable store"));
    assert!(log.contains("{ not json"));
}

#[test]
fn test_recovery_empty() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    assert_eq!(run_tl_ok(tmp.path(), &["recovery"]), "Recovery log is empty\n");
}
