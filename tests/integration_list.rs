use predicates::prelude::*;
use serde_json::json;

mod common;
use common::TestEnvironment;

/// Test listing with no registry file
#[test]
fn test_list_without_registry() {
    let env = TestEnvironment::new().unwrap();

    env.mcm_command()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No servers registered."));
}

/// Test json output with no registry file
#[test]
fn test_list_json_empty() {
    let env = TestEnvironment::new().unwrap();

    env.mcm_command()
        .args(["list", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::diff("[]\n"));
}

/// Test listing a populated registry
#[test]
fn test_list_registered_servers() {
    let env = TestEnvironment::with_registry(json!([
        {"name": "lobby", "fork": "paper", "version": "1.16.4-416", "path": "/srv/lobby"},
        {"name": "modded", "fork": "forge", "version": "1.16.4-35.1.4", "path": "/srv/modded"}
    ]))
    .unwrap();

    env.mcm_command()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("lobby"))
        .stdout(predicate::str::contains("1.16.4-416"))
        .stdout(predicate::str::contains("/srv/modded"))
        .stdout(predicate::str::contains("Total: 2 servers"));
}

/// Records with a fork this build does not know still list
#[test]
fn test_list_keeps_unknown_fork() {
    let env = TestEnvironment::with_registry(json!([
        {"name": "legacy", "fork": "spigot", "version": "1.8.8", "path": "/srv/legacy"}
    ]))
    .unwrap();

    let output = env.mcm_command().args(["list", "--format", "json"]).output().unwrap();
    assert!(output.status.success());

    let listed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listed[0]["fork"], "spigot");
}

/// Test a corrupt registry file
#[test]
fn test_list_corrupt_registry() {
    let env = TestEnvironment::new().unwrap();
    std::fs::write(env.registry_path(), "{not json").unwrap();

    env.mcm_command()
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}
