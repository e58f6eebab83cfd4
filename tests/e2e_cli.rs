//! E2E tests for the `dayflags` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn dayflags(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dayflags").expect("binary built");
    cmd.current_dir(dir.path())
        .env_remove("DAYFLAGS_DB")
        .env_remove("DAYFLAGS_DIR")
        .env_remove("RUST_LOG");
    cmd
}

fn json_output(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("run dayflags");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON")
}

#[test]
fn e2e_init_creates_store_in_data_dir() {
    let dir = TempDir::new().unwrap();
    dayflags(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));
    assert!(dir.path().join(".dayflags").join("alarm.db").exists());
}

#[test]
fn e2e_add_then_duplicate() {
    let dir = TempDir::new().unwrap();
    dayflags(&dir)
        .args(["add", "holiday", "2024-12-25"])
        .assert()
        .success()
        .stdout("content://dayflags/holiday/1\n");

    dayflags(&dir)
        .args(["add", "holiday", "2024-12-25", "--state", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already present"));

    let rows = json_output(dayflags(&dir).args(["--json", "list", "holiday"]));
    assert_eq!(
        rows,
        serde_json::json!([{"id": 1, "date": "2024-12-25", "state": 1}])
    );
}

#[test]
fn e2e_add_rejects_bad_dates() {
    let dir = TempDir::new().unwrap();
    dayflags(&dir)
        .args(["add", "workday", "2024-13-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid date"));
}

#[test]
fn e2e_get_and_list_filters() {
    let dir = TempDir::new().unwrap();
    for (date, state) in [("2024-10-12", "1"), ("2024-10-13", "0")] {
        dayflags(&dir)
            .args(["add", "workday", date, "--state", state])
            .assert()
            .success();
    }

    let flag = json_output(dayflags(&dir).args(["--json", "get", "workday", "2024-10-13"]));
    assert_eq!(flag["state"], 0);

    let missing = json_output(dayflags(&dir).args(["--json", "get", "holiday", "2024-10-13"]));
    assert!(missing.is_null());

    let rows = json_output(dayflags(&dir).args([
        "--json",
        "list",
        "workday",
        "--where",
        "state = ?",
        "--arg",
        "1",
        "--columns",
        "date",
    ]));
    assert_eq!(rows, serde_json::json!([{"date": "2024-10-12"}]));

    dayflags(&dir)
        .args(["list", "workday", "--columns", "password"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown column"));
}

#[test]
fn e2e_type_resolution() {
    let dir = TempDir::new().unwrap();
    dayflags(&dir)
        .args(["type", "content://dayflags/holiday"])
        .assert()
        .success()
        .stdout("item/holiday\n");
    dayflags(&dir)
        .args(["type", "content://dayflags/workday/7"])
        .assert()
        .success()
        .stdout("item/workday\n");
    dayflags(&dir)
        .args(["type", "content://dayflags/alarm"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown URL"));

    assert!(
        !dir.path().join(".dayflags").exists(),
        "type must not create the data directory"
    );
}

#[test]
fn e2e_update_and_delete_report_zero() {
    let dir = TempDir::new().unwrap();
    dayflags(&dir)
        .args(["add", "holiday", "2024-01-01"])
        .assert()
        .success();

    let update = json_output(dayflags(&dir).args(["--json", "update", "holiday", "2024-01-01"]));
    assert_eq!(update["rows_affected"], 0);
    dayflags(&dir)
        .args(["delete", "holiday"])
        .assert()
        .success()
        .stdout("0 rows affected\n");

    let rows = json_output(dayflags(&dir).args(["--json", "list", "holiday"]));
    assert_eq!(rows.as_array().map(Vec::len), Some(1));
}

#[test]
fn e2e_db_flag_and_config_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("custom.yaml");
    std::fs::write(&config, "authority: com.example.alarm\n").unwrap();
    let db = dir.path().join("elsewhere").join("flags.db");

    dayflags(&dir)
        .arg("--db")
        .arg(&db)
        .arg("--config")
        .arg(&config)
        .args(["add", "holiday", "2024-05-01"])
        .assert()
        .success()
        .stdout("content://com.example.alarm/holiday/1\n");
    assert!(db.exists());
}

#[test]
fn e2e_in_memory_database() {
    let dir = TempDir::new().unwrap();
    dayflags(&dir)
        .args(["--db", ":memory:", "add", "holiday", "2024-12-25"])
        .assert()
        .success()
        .stdout("content://dayflags/holiday/1\n");

    let rows = json_output(dayflags(&dir).args(["--db", ":memory:", "--json", "list", "holiday"]));
    assert_eq!(rows, serde_json::json!([]));
    assert!(!dir.path().join(":memory:").exists());
}
