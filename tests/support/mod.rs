use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.dir.path().join("task-manager-tasks.json")
    }

    pub fn theme_file(&self) -> PathBuf {
        self.dir.path().join("theme")
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("taskman").expect("binary");
        cmd.env("TASKMAN_DATA_DIR", self.dir.path());
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Add a task through the CLI and return its id.
    pub fn add_task(&self, title: &str) -> String {
        let output = self
            .cmd()
            .args(["add", title, "--json"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let value: Value = serde_json::from_slice(&output).expect("add json");
        value["data"]["id"].as_str().expect("task id").to_string()
    }
}
