use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn tally_cmd(data_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tally"));
    cmd.arg("--data-dir")
        .arg(data_dir)
        .env_remove("TALLY_HOME")
        .env_remove("TALLY_FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

fn tally(data_dir: &Path, args: &[&str]) -> assert_cmd::assert::Assert {
    tally_cmd(data_dir).args(args).assert()
}

#[test]
fn warehouse_increase_persists_between_runs() {
    let data = TempDir::new().expect("data dir");
    tally(data.path(), &["warehouse", "seed"]).success();
    assert!(data.path().join("electronics.json").exists());
    assert!(data.path().join("groceries.json").exists());

    tally(data.path(), &["warehouse", "increase", "electronics", "1", "5"])
        .success()
        .stdout(contains("Increased electronics #1 (Laptop) to 15"));

    tally(data.path(), &["warehouse", "list", "--section", "electronics"])
        .success()
        .stdout(contains("Laptop").and(contains("15")).and(contains("Rice").not()));
}

#[test]
fn unknown_id_fails_with_not_found() {
    let data = TempDir::new().expect("data dir");
    tally(data.path(), &["warehouse", "seed"]).success();
    tally(data.path(), &["warehouse", "increase", "electronics", "99", "5"])
        .failure()
        .stderr(contains("electronic item with id 99 not found"));
}

#[test]
fn negative_quantity_is_rejected_and_file_unchanged() {
    let data = TempDir::new().expect("data dir");
    tally(data.path(), &["warehouse", "seed"]).success();
    let before = fs::read(data.path().join("electronics.json")).expect("read");

    tally(data.path(), &["warehouse", "set", "electronics", "1", "-5"])
        .failure()
        .stderr(contains("quantity cannot be negative"));

    let after = fs::read(data.path().join("electronics.json")).expect("read");
    assert_eq!(before, after);
}

#[test]
fn second_seed_reports_duplicate() {
    let data = TempDir::new().expect("data dir");
    tally(data.path(), &["warehouse", "seed"]).success();
    tally(data.path(), &["warehouse", "seed"])
        .failure()
        .stderr(contains("already exists"));
}

#[test]
fn first_run_lists_nothing() {
    let data = TempDir::new().expect("data dir");
    tally(data.path(), &["inventory", "list"])
        .success()
        .stdout(contains("Inventory is empty."));
}

#[test]
fn corrupt_document_is_reported() {
    let data = TempDir::new().expect("data dir");
    fs::write(data.path().join("inventory.json"), "{ not json").expect("write");
    tally(data.path(), &["inventory", "list"])
        .failure()
        .stderr(contains("failed to load inventory"));
}

#[test]
fn inventory_update_and_delete() {
    let data = TempDir::new().expect("data dir");
    tally(data.path(), &["inventory", "add", "1", "Bolts", "100"]).success();
    tally(data.path(), &["inventory", "update", "1", "Hex bolts", "80"])
        .success()
        .stdout(contains("Updated #1 (Hex bolts) x80"));
    tally(data.path(), &["inventory", "delete", "1"]).success();
    tally(data.path(), &["inventory", "delete", "1"])
        .failure()
        .stderr(contains("not found"));
}

#[test]
fn health_history_is_newest_first() {
    let data = TempDir::new().expect("data dir");
    tally(data.path(), &["health", "seed"]).success();
    tally(data.path(), &["health", "prescribe", "6", "1", "Insulin"]).success();

    let output = tally_cmd(data.path())
        .args(["health", "history", "1", "--json"])
        .output()
        .expect("run tally");
    assert!(output.status.success());
    let history: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let ids: Vec<u64> = history
        .as_array()
        .expect("array")
        .iter()
        .map(|p| p["id"].as_u64().expect("id"))
        .collect();
    assert_eq!(ids, vec![6, 2, 1]);
}

#[test]
fn prescription_for_missing_patient_fails() {
    let data = TempDir::new().expect("data dir");
    tally(data.path(), &["health", "prescribe", "1", "42", "Aspirin"])
        .failure()
        .stderr(contains("patient with id 42 not found"));
    assert!(!data.path().join("prescriptions.json").exists());
}

#[test]
fn finance_yaml_round_trip_and_overdraft() {
    let data = TempDir::new().expect("data dir");
    tally(data.path(), &["--format", "yaml", "finance", "seed"]).success();
    assert!(data.path().join("transactions.yaml").exists());
    assert!(data.path().join("account.yaml").exists());

    tally(
        data.path(),
        &["--format", "yaml", "finance", "record", "4", "20.50", "Groceries", "--channel", "mobile"],
    )
    .success()
    .stdout(contains("balance 129.50"));

    tally(data.path(), &["--format", "yaml", "finance", "record", "5", "1000", "Rent"])
        .failure()
        .stderr(contains("insufficient funds"));

    tally(data.path(), &["--format", "yaml", "finance", "account"])
        .success()
        .stdout(contains("ACC123456").and(contains("129.50")));
}

#[test]
fn format_can_come_from_environment() {
    let data = TempDir::new().expect("data dir");
    tally_cmd(data.path())
        .env("TALLY_FORMAT", "yaml")
        .args(["inventory", "add", "1", "Nuts", "3"])
        .assert()
        .success();
    assert!(data.path().join("inventory.yaml").exists());
    assert!(!data.path().join("inventory.json").exists());
}
