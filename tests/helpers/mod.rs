#![allow(dead_code)]

use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Helper to write an allowlist file
pub fn write_allowlist(dir: &Path, entries: &[&str]) -> PathBuf {
    let path = dir.join("safe");
    fs::write(&path, entries.join("\n")).expect("Failed to write allowlist");
    path
}

/// Helper to write a config that keeps every file inside `dir`
pub fn write_config(dir: &Path, extra: &str) -> PathBuf {
    let path = dir.join("config.toml");
    let contents = format!(
        "{}\n[allowlist]\npath = {:?}\n\n[audit]\npath = {:?}\n",
        extra,
        dir.join("safe").display().to_string(),
        dir.join("decisions.log").display().to_string(),
    );
    fs::write(&path, contents).expect("Failed to write config");
    path
}

/// Build a hook request for the shell tool
pub fn bash_request(command: &str) -> String {
    serde_json::json!({
        "tool_name": "Bash",
        "tool_input": { "command": command }
    })
    .to_string()
}

/// Build a hook request for a file tool
pub fn file_request(tool: &str, file_path: &str) -> String {
    serde_json::json!({
        "tool_name": tool,
        "tool_input": { "file_path": file_path }
    })
    .to_string()
}

/// Output of one hook process
pub struct HookRun {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl HookRun {
    pub fn json(&self) -> Value {
        serde_json::from_str(self.stdout.trim()).expect("hook stdout is not JSON")
    }

    pub fn decision(&self) -> String {
        self.json()["hookSpecificOutput"]["permissionDecision"]
            .as_str()
            .expect("missing permissionDecision")
            .to_string()
    }

    pub fn reason(&self) -> Option<String> {
        self.json()["hookSpecificOutput"]["permissionDecisionReason"]
            .as_str()
            .map(str::to_string)
    }
}

/// Run the hook binary with HOME pointed at `home`
pub fn run_hook(home: &Path, config: Option<&Path>, stdin: &str) -> HookRun {
    let mut command = Command::new(env!("CARGO_BIN_EXE_hookgate"));
    command
        .env("HOME", home)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    match config {
        Some(path) => command.env("HOOKGATE_CONFIG", path),
        None => command.env_remove("HOOKGATE_CONFIG"),
    };

    let mut child = command.spawn().expect("Failed to spawn hookgate");
    child
        .stdin
        .take()
        .expect("stdin not piped")
        .write_all(stdin.as_bytes())
        .expect("Failed to write stdin");

    let output = child.wait_with_output().expect("Failed to wait for hookgate");

    HookRun {
        status: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}
