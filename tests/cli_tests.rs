mod common;

use assert_cmd::Command;
use common::{fake_sheets_api, rsc, temp_home, temp_state_db, write_config};
use serde_json::{Value, json};
use predicates::prelude::*;
use predicates::str::contains;
use rsheetcrud::auth::store::{SqliteTokenStore, TokenStore};
use rsheetcrud::auth::token::AccessToken;
use std::fs;
use std::path::Path;

const ENV_VARS: [&str; 5] = [
    "RSHEETCRUD_SPREADSHEET_ID",
    "RSHEETCRUD_SHEET_NAME",
    "RSHEETCRUD_API_KEY",
    "RSHEETCRUD_CLIENT_ID",
    "RSHEETCRUD_CLIENT_SECRET",
];

/// Command isolated from the user's config and environment.
fn isolated(name: &str) -> Command {
    in_home(&temp_home(name))
}

fn in_home(home: &Path) -> Command {
    let mut cmd = rsc();
    cmd.env("HOME", home);
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_init_in_test_mode() {
    let db = temp_state_db("cli_init");

    isolated("cli_init")
        .args(["--state", &db, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("State database initialized"));

    assert!(fs::metadata(&db).is_ok());
}

#[test]
fn test_init_writes_config_file() {
    let home = temp_home("cli_init_conf");
    let db = temp_state_db("cli_init_conf");

    in_home(&home)
        .args(["--state", &db, "init"])
        .assert()
        .success();

    let conf = fs::read_to_string(home.join(".rsheetcrud").join("rsheetcrud.conf")).unwrap();
    assert!(conf.contains("sheet_name: Sheet1"));
    assert!(conf.contains("spreadsheet_id"));
}

#[test]
fn test_add_reports_every_missing_field() {
    let db = temp_state_db("cli_add_invalid");

    isolated("cli_add_invalid")
        .args([
            "--state", &db, "add", "--company", "", "--l1", "Alice", "--location", " ",
        ])
        .assert()
        .failure()
        .stderr(contains("Company is required"))
        .stderr(contains("Location is required"))
        .stderr(contains("Please fill in all required fields"))
        .stderr(contains("L1 is required").not());

    isolated("cli_add_invalid")
        .args(["--state", &db, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("add_error"))
        .stdout(contains("Company is required"));
}

#[test]
fn test_add_rejects_unknown_mode() {
    let db = temp_state_db("cli_add_mode");

    isolated("cli_add_mode")
        .args([
            "--state", &db, "add", "--company", "Acme", "--l1", "Alice", "--location",
            "Pune", "--mode", "sometimes",
        ])
        .assert()
        .failure()
        .stderr(contains("Invalid work mode"));
}

#[test]
fn test_status_login_state_follows_stored_token() {
    let db = temp_state_db("cli_status");

    isolated("cli_status")
        .args(["--state", &db, "status"])
        .assert()
        .success()
        .stdout(contains("Not authenticated"))
        .stdout(contains("(not set)"));

    SqliteTokenStore::open(&db)
        .unwrap()
        .save(&AccessToken::new("stored-token"))
        .unwrap();

    isolated("cli_status")
        .args(["--state", &db, "status"])
        .assert()
        .success()
        .stdout(contains("Authenticated"))
        .stdout(contains("Not authenticated").not());

    isolated("cli_status")
        .args(["--state", &db, "login"])
        .assert()
        .success()
        .stdout(contains("Using existing authorization"));

    isolated("cli_status")
        .args(["--state", &db, "logout"])
        .assert()
        .success()
        .stdout(contains("Logged out"));

    isolated("cli_status")
        .args(["--state", &db, "status"])
        .assert()
        .success()
        .stdout(contains("Not authenticated"));
}

#[test]
fn test_login_without_client_id_fails() {
    let db = temp_state_db("cli_login");

    isolated("cli_login")
        .args(["--state", &db, "login"])
        .assert()
        .failure()
        .stderr(contains("Authorization failed"))
        .stderr(contains("client_id is not set"));
}

#[test]
fn test_list_failure_is_friendly_and_journaled() {
    let db = temp_state_db("cli_list");

    isolated("cli_list")
        .args(["--state", &db, "list"])
        .assert()
        .failure()
        .stderr(contains(
            "Failed to fetch records. Please check your Google Sheets configuration.",
        ));

    isolated("cli_list")
        .args(["--state", &db, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("list_error"))
        .stdout(contains("spreadsheet_id is not set"));
}

#[test]
fn test_show_header_row_is_rejected() {
    let db = temp_state_db("cli_show");

    isolated("cli_show")
        .env("RSHEETCRUD_SPREADSHEET_ID", "sheet-under-test")
        .args(["--state", &db, "show", "1"])
        .assert()
        .failure()
        .stderr(contains("Failed to fetch record"))
        .stderr(contains("Invalid row position: 1"));
}

#[test]
fn test_config_print_masks_secrets() {
    let home = temp_home("cli_config");
    let db = temp_state_db("cli_config");
    write_config(
        &home,
        "spreadsheet_id: abc123\napi_key: AIza-very-secret\nclient_id: my-client\nclient_secret: shh-secret\n",
    );

    in_home(&home)
        .args(["--state", &db, "config", "--print"])
        .assert()
        .success()
        .stdout(contains("spreadsheet_id: abc123"))
        .stdout(contains("client_id: my-client"))
        .stdout(contains("********"))
        .stdout(contains("very-secret").not())
        .stdout(contains("shh-secret").not());
}

#[test]
fn test_env_overrides_reach_status() {
    let db = temp_state_db("cli_env");

    isolated("cli_env")
        .env("RSHEETCRUD_SPREADSHEET_ID", "env-sheet-id")
        .env("RSHEETCRUD_SHEET_NAME", "Leads")
        .args(["--state", &db, "status"])
        .assert()
        .success()
        .stdout(contains("env-sheet-id"))
        .stdout(contains("Leads"));
}

#[test]
fn test_log_lists_init_entry() {
    let db = temp_state_db("cli_log_empty");

    isolated("cli_log_empty")
        .args(["--state", &db, "--test", "init"])
        .assert()
        .success();

    isolated("cli_log_empty")
        .args(["--state", &db, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("init"));
}

#[test]
fn test_list_json_on_fresh_state_is_pure_json() {
    let home = temp_home("cli_list_json");
    let db = temp_state_db("cli_list_json");
    let api = fake_sheets_api(json!({
        "range": "Sheet1!A2:I1000",
        "majorDimension": "ROWS",
        "values": [
            ["1", "Acme", "Alice", "", "", "MR-1", "Pune", "Remote", "first"],
            ["2", "Globex", "Gus"]
        ]
    }));
    write_config(
        &home,
        &format!("spreadsheet_id: sheet-under-test\napi_base_url: {api}\n"),
    );

    let out = in_home(&home)
        .args(["--state", &db, "list", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let parsed: Value = serde_json::from_slice(&out).expect("stdout is JSON");
    let records = parsed.as_array().expect("array of records");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["rowPosition"], 2);
    assert_eq!(records[0]["company"], "Acme");
    assert_eq!(records[1]["rowPosition"], 3);
    assert_eq!(records[1]["serialNumber"], "2");
    assert_eq!(records[1]["location"], "");
}

#[test]
fn test_show_json_on_fresh_state_is_pure_json() {
    let home = temp_home("cli_show_json");
    let db = temp_state_db("cli_show_json");
    let api = fake_sheets_api(json!({
        "range": "Sheet1!A4:I4",
        "majorDimension": "ROWS",
        "values": [["3", "Initech", "Ian", "", "", "", "Austin", "On-site"]]
    }));
    write_config(
        &home,
        &format!("spreadsheet_id: sheet-under-test\napi_base_url: {api}\n"),
    );

    let out = in_home(&home)
        .args(["--state", &db, "show", "4", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let record: Value = serde_json::from_slice(&out).expect("stdout is JSON");
    assert_eq!(record["rowPosition"], 4);
    assert_eq!(record["company"], "Initech");
    assert_eq!(record["mode"], "On-site");
    assert_eq!(record["details"], "");
}
