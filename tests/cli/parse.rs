use crate::helpers::cli::CliTestHelper;
use predicates::prelude::*;

#[test]
fn test_parse_prints_grouped_clauses() {
    let helper = CliTestHelper::new();

    helper
        .command()
        .args([
            "parse",
            "SELECT ON SCHEMA SALES",
            "INSERT ON SCHEMA SALES",
            "CATALOG READ",
            "DELETE ON ORDERS",
            "--default-schema",
            "APP",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("INSERT, SELECT ON SCHEMA SALES"))
        .stdout(predicate::str::contains("DELETE ON APP.ORDERS"))
        .stdout(predicate::str::contains("CATALOG READ"));
}

#[test]
fn test_parse_rejects_unknown_privilege() {
    let helper = CliTestHelper::new();

    helper
        .command()
        .args(["parse", "CATALOG READ", "DROP ON CLIENTSIDE ENCRYPTION COLUMN KEY K"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot parse privilege clause"));
}

#[test]
fn test_parse_requires_a_clause() {
    let helper = CliTestHelper::new();
    helper.command().arg("parse").assert().failure();
}

#[test]
fn test_parse_json_output() {
    let helper = CliTestHelper::new();

    let output = helper
        .command()
        .args(["parse", "USAGE ON CLIENTSIDE ENCRYPTION COLUMN KEY CEK1", "--format", "json"])
        .output()
        .expect("failed to run grantsync");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["privileges"][0]["privilege_type"], "column_key");
    assert_eq!(json["privileges"][0]["identifier"], "CEK1");
    assert_eq!(
        json["grouped"][0],
        "USAGE ON CLIENTSIDE ENCRYPTION COLUMN KEY CEK1"
    );
}
