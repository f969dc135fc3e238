mod support;

use predicates::str::contains;
use serde_json::Value;

use support::TestEnv;

fn parse_json(stdout: &[u8]) -> Value {
    serde_json::from_slice(stdout).expect("json output")
}

#[test]
fn add_emits_versioned_envelope() {
    let env = TestEnv::new();
    let output = env
        .cmd()
        .args(["add", "Buy milk", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value = parse_json(&output);
    assert_eq!(value["schema_version"], "taskman.v1");
    assert_eq!(value["command"], "add");
    assert_eq!(value["status"], "success");
    assert_eq!(value["data"]["title"], "Buy milk");
    assert_eq!(value["data"]["completed"], false);
    assert_eq!(value["data"]["priority"], "medium");
    assert_eq!(value["data"]["category"], "other");
}

#[test]
fn tasks_persist_with_camel_case_keys() {
    let env = TestEnv::new();
    env.add_task("Buy milk");

    let raw = std::fs::read_to_string(env.tasks_file()).expect("tasks slot");
    assert!(raw.contains("\"createdAt\""));
    assert!(raw.contains("\"completed\""));
    assert!(!raw.contains("\"created_at\""));
}

#[test]
fn list_shows_newest_first() {
    let env = TestEnv::new();
    env.add_task("first");
    env.add_task("second");

    let output = env
        .cmd()
        .args(["list", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value = parse_json(&output);
    let tasks = value["data"]["tasks"].as_array().expect("tasks array");
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0]["title"], "second");
    assert_eq!(tasks[1]["title"], "first");
    assert_eq!(value["data"]["total"], 2);
    assert_eq!(value["data"]["completed"], 0);
}

#[test]
fn blank_title_is_a_user_error() {
    let env = TestEnv::new();
    env.cmd()
        .args(["add", "   "])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("title cannot be empty"));

    assert!(!env.tasks_file().exists());
}

#[test]
fn unknown_priority_is_a_user_error() {
    let env = TestEnv::new();
    env.cmd()
        .args(["add", "Buy milk", "--priority", "urgent"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("unknown priority"));
}

#[test]
fn bad_deadline_is_a_user_error() {
    let env = TestEnv::new();
    env.cmd()
        .args(["add", "Buy milk", "--deadline", "next week"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("invalid deadline"));
}

#[test]
fn toggle_accepts_unique_id_prefix() {
    let env = TestEnv::new();
    let id = env.add_task("Buy milk");

    let output = env
        .cmd()
        .args(["toggle", &id[..8], "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value = parse_json(&output);
    assert_eq!(value["data"]["completed"], true);
    assert_eq!(value["data"]["id"], id.as_str());
}

#[test]
fn unknown_id_exits_with_user_error() {
    let env = TestEnv::new();
    env.add_task("Buy milk");

    env.cmd()
        .args(["toggle", "zzzzzzzz"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Task not found"));
}

#[test]
fn remove_without_yes_fails_when_not_interactive() {
    let env = TestEnv::new();
    let id = env.add_task("Buy milk");

    env.cmd()
        .args(["rm", &id])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("--yes"));

    // nothing was deleted
    let output = env
        .cmd()
        .args(["list", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(parse_json(&output)["data"]["total"], 1);
}

#[test]
fn remove_with_yes_deletes_the_task() {
    let env = TestEnv::new();
    let id = env.add_task("Buy milk");

    env.cmd().args(["rm", &id, "--yes"]).assert().success();

    let output = env
        .cmd()
        .args(["list", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(parse_json(&output)["data"]["total"], 0);
}

#[test]
fn edit_updates_fields_and_keeps_identity() {
    let env = TestEnv::new();
    let id = env.add_task("Buy milk");

    let output = env
        .cmd()
        .args([
            "edit",
            &id,
            "--title",
            "Buy oat milk",
            "--priority",
            "high",
            "--deadline",
            "2030-01-01",
            "--json",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value = parse_json(&output);
    assert_eq!(value["data"]["id"], id.as_str());
    assert_eq!(value["data"]["title"], "Buy oat milk");
    assert_eq!(value["data"]["priority"], "high");
    assert_eq!(value["data"]["deadline"], "2030-01-01");
}

#[test]
fn status_filter_and_search_compose() {
    let env = TestEnv::new();
    env.add_task("Buy milk");
    let bread = env.add_task("Buy bread");
    env.add_task("Call Bob");
    env.cmd().args(["toggle", &bread]).assert().success();

    let output = env
        .cmd()
        .args(["list", "--status", "active", "--search", "buy", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value = parse_json(&output);
    let tasks = value["data"]["tasks"].as_array().expect("tasks array");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Buy milk");
}

#[test]
fn invalid_status_filter_is_rejected() {
    let env = TestEnv::new();
    env.cmd()
        .args(["list", "--status", "done"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("unknown status filter"));
}

#[test]
fn clear_completed_removes_only_completed() {
    let env = TestEnv::new();
    env.add_task("Buy milk");
    let bob = env.add_task("Call Bob");
    env.cmd().args(["toggle", &bob]).assert().success();

    let output = env
        .cmd()
        .args(["clear-completed", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value = parse_json(&output);
    assert_eq!(value["data"]["removed"], 1);
    assert_eq!(value["data"]["remaining"], 1);

    let output = env
        .cmd()
        .args(["list", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let tasks = parse_json(&output)["data"]["tasks"].clone();
    assert_eq!(tasks[0]["title"], "Buy milk");
}

#[test]
fn stats_counts_collection_state() {
    let env = TestEnv::new();
    env.add_task("a");
    let b = env.add_task("b");
    env.cmd().args(["toggle", &b]).assert().success();

    let output = env
        .cmd()
        .args(["stats", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value = parse_json(&output);
    assert_eq!(value["data"]["total"], 2);
    assert_eq!(value["data"]["active"], 1);
    assert_eq!(value["data"]["completed"], 1);
}

#[test]
fn malformed_tasks_file_recovers_to_empty() {
    let env = TestEnv::new();
    std::fs::create_dir_all(env.data_dir()).expect("data dir");
    std::fs::write(env.tasks_file(), "{definitely not json").expect("write slot");

    let output = env
        .cmd()
        .args(["list", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(parse_json(&output)["data"]["total"], 0);

    // adding afterwards replaces the malformed slot
    env.add_task("fresh start");
    let raw = std::fs::read_to_string(env.tasks_file()).expect("tasks slot");
    serde_json::from_str::<Value>(&raw).expect("slot is valid json again");
}

#[test]
fn human_list_shows_table_and_progress() {
    let env = TestEnv::new();
    env.add_task("Buy milk");

    env.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("Buy milk"))
        .stdout(contains("Completed: 0 / 1 (0%)"));
}

#[test]
fn quiet_suppresses_human_output() {
    let env = TestEnv::new();
    env.cmd()
        .args(["add", "Buy milk", "--quiet"])
        .assert()
        .success()
        .stdout(predicates::str::is_empty());
}

#[test]
fn error_envelope_is_json_when_requested() {
    let env = TestEnv::new();
    let output = env
        .cmd()
        .args(["toggle", "missing", "--json"])
        .assert()
        .failure()
        .code(2)
        .get_output()
        .stdout
        .clone();

    let value = parse_json(&output);
    assert_eq!(value["schema_version"], "taskman.v1");
    assert_eq!(value["status"], "error");
    assert_eq!(value["error"]["kind"], "user_error");
    assert_eq!(value["error"]["code"], 2);
}
