use crate::helpers::cli::CliTestHelper;
use predicates::prelude::*;

#[test]
fn test_plan_without_database_url_fails() {
    let helper = CliTestHelper::new();

    helper
        .command()
        .arg("plan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No database URL configured"));
}

#[test]
fn test_invalid_config_yaml_error() {
    let helper = CliTestHelper::new();
    helper.write_config("principals: [unbalanced");

    helper
        .command()
        .arg("plan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_unknown_policy_flag_is_rejected() {
    let helper = CliTestHelper::new();

    helper
        .command()
        .args(["apply", "--dry-run", "--policy", "loose"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown management policy"));
}
