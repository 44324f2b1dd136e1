//! CLI smoke tests against a throwaway HOME and store

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn resonance(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("resonance").unwrap();
    cmd.current_dir(home)
        .env("HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("RESONANCE_MEMORY_PATH")
        .env_remove("RESONANCE_LOCALE")
        .env_remove("RESONANCE_DEBUG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn init_refuses_to_overwrite() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("memory.jsonl");

    resonance(dir.path())
        .arg("--store")
        .arg(&store)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized store"));
    assert!(store.exists());
    assert!(dir.path().join(".resonance").join("config.toml").exists());

    resonance(dir.path())
        .arg("--store")
        .arg(&store)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    resonance(dir.path())
        .arg("--store")
        .arg(&store)
        .args(["init", "--force"])
        .assert()
        .success();
}

#[test]
fn add_search_and_stats() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("graph.jsonl");

    resonance(dir.path())
        .arg("--store")
        .arg(&store)
        .args([
            "add",
            "Dave_Shell",
            "--type",
            "user_preference",
            "--observation",
            "Dave uses ZSH for all command line work",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created entity").and(predicate::str::contains("preference")));

    resonance(dir.path())
        .arg("--store")
        .arg(&store)
        .args(["search", "zsh", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Dave_Shell\""));

    resonance(dir.path())
        .arg("--store")
        .arg(&store)
        .args(["stats", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"preferredShell\": \"zsh\""));
}

#[test]
fn observe_unknown_entity_fails() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("graph.jsonl");

    resonance(dir.path())
        .arg("--store")
        .arg(&store)
        .args(["observe", "Ghost", "boo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Entity with name Ghost not found"));

    // a failed call never creates the store
    assert!(!store.exists());
}

#[test]
fn relate_show_and_forget() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("graph.jsonl");
    let run = |args: &[&str]| {
        resonance(dir.path())
            .arg("--store")
            .arg(&store)
            .args(args)
            .assert()
    };

    run(&["add", "Laptop", "--type", "device"]).success();
    run(&["add", "Desk", "--type", "furniture"]).success();
    run(&["relate", "Laptop", "sits_on", "Desk"])
        .success()
        .stdout(predicate::str::contains("Created relation"));

    run(&["show", "Laptop", "Desk"])
        .success()
        .stdout(predicate::str::contains("-[sits_on]->"));

    run(&["forget", "Laptop"])
        .success()
        .stdout(predicate::str::contains("Removed 1 relation(s)"));

    run(&["show", "Laptop"])
        .failure()
        .stderr(predicate::str::contains("No entities found"));
}

#[test]
fn config_set_and_get() {
    let dir = tempdir().unwrap();

    resonance(dir.path())
        .args(["config", "bootstrap.locale", "de"])
        .assert()
        .success();

    resonance(dir.path())
        .args(["config", "bootstrap.locale"])
        .assert()
        .success()
        .stdout(predicate::str::diff("de\n"));

    resonance(dir.path())
        .args(["config", "core.gc_auto", "true"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}
