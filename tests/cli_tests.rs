//! End-to-end CLI tests using `assert_cmd`.
//!
//! These tests invoke the compiled binary against the bundled snapshot and
//! temporary files. None of them need network access.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::{TempDir, tempdir};

/// Each test gets its own config directory so a developer's real config
/// never leaks in.
fn cmd(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("gilligan-universe").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path());
    cmd.env_remove("RUST_LOG");
    cmd
}

fn bundled_snapshot() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/gilligan-universe.json")
}

// ─── Help / version ─────────────────────────────────────────────────────

#[test]
fn test_help_shows_commands() {
    let home = tempdir().unwrap();
    cmd(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("update"))
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("query"))
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("profile"))
        .stdout(predicate::str::contains("stats"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn test_version_shows_name() {
    let home = tempdir().unwrap();
    cmd(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gilligan-universe"));
}

#[test]
fn test_update_help_lists_overrides() {
    let home = tempdir().unwrap();
    cmd(&home)
        .args(["update", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--api-url"))
        .stdout(predicate::str::contains("--output"))
        .stdout(predicate::str::contains("--max-pages"));
}

#[test]
fn test_query_requires_text() {
    let home = tempdir().unwrap();
    cmd(&home)
        .arg("query")
        .assert()
        .failure()
        .stderr(predicate::str::contains("QUERY"));
}

// ─── Query ──────────────────────────────────────────────────────────────

#[test]
fn test_query_creator_works() {
    let home = tempdir().unwrap();
    cmd(&home)
        .args(["query", "What has Vince Gilligan made?", "--data"])
        .arg(bundled_snapshot())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Vince Gilligan has created 4 major shows: Breaking Bad, Better Call Saul, Pluribus, El Camino.",
        ));
}

#[test]
fn test_query_json_output() {
    let home = tempdir().unwrap();
    let output = cmd(&home)
        .args(["query", "Who is the cinematographer?", "--json", "--data"])
        .arg(bundled_snapshot())
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        value["highlightNodes"],
        serde_json::json!(["marshall-adams", "better-call-saul", "pluribus"])
    );
    assert_eq!(value["relatedLinks"][0]["type"], "crew");
}

#[test]
fn test_query_without_snapshot_fails() {
    let home = tempdir().unwrap();
    let missing = home.path().join("missing.json");
    cmd(&home)
        .args(["query", "hello", "--data"])
        .arg(&missing)
        .assert()
        .failure()
        .stderr(predicate::str::contains("gilligan-universe update"));
}

// ─── Stats / profile ────────────────────────────────────────────────────

#[test]
fn test_stats_on_bundled_snapshot() {
    let home = tempdir().unwrap();
    cmd(&home)
        .args(["stats", "--data"])
        .arg(bundled_snapshot())
        .assert()
        .success()
        .stdout(predicate::str::contains("The Gilligan Universe"))
        .stdout(predicate::str::contains("Connected components"))
        .stdout(predicate::str::contains("TV Series"));
}

#[test]
fn test_profile_renders_dossier() {
    let home = tempdir().unwrap();
    cmd(&home)
        .args(["profile", "rhea-seehorn"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Actor Dossier"))
        .stdout(predicate::str::contains("Carol Sturka"))
        .stdout(predicate::str::contains("Golden Globe Win"));
}

#[test]
fn test_profile_lists_ids() {
    let home = tempdir().unwrap();
    cmd(&home)
        .arg("profile")
        .assert()
        .success()
        .stdout(predicate::str::contains("vince-gilligan"))
        .stdout(predicate::str::contains("rhea-seehorn"));
}

#[test]
fn test_profile_unknown_id_is_not_an_error() {
    let home = tempdir().unwrap();
    cmd(&home)
        .args(["profile", "breaking-bad"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No dossier"));
}

// ─── Chat ───────────────────────────────────────────────────────────────

#[test]
fn test_chat_answers_and_follows_links() {
    let home = tempdir().unwrap();
    cmd(&home)
        .args(["chat", "--data"])
        .arg(bundled_snapshot())
        .write_stdin("Who is the cinematographer?\n:1\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Albuquerque Noir"))
        .stdout(predicate::str::contains("Focusing on Marshall Adams and its 2 connections."));
}

// ─── Init / update ──────────────────────────────────────────────────────

#[test]
fn test_init_writes_config_once() {
    let home = tempdir().unwrap();
    cmd(&home)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration"));

    let config_path = home.path().join("gilligan-universe/config.toml");
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[api]"));
    assert!(content.contains("max_pages = 100"));

    cmd(&home)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_update_with_unreachable_api_writes_empty_snapshot() {
    let home = tempdir().unwrap();
    let output = home.path().join("out/graph.json");
    cmd(&home)
        .args(["update", "--api-url", "http://127.0.0.1:9", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Fetched 0 entities"));

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(value["metadata"]["entity_count"], 0);
    assert_eq!(value["nodes"], serde_json::json!([]));
}
