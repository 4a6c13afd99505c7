use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use chrono::Utc;
use regex::Regex;

use crate::hook::Evaluation;

const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024; // 10MB

/// Longest command or path recorded per entry
const MAX_SUBJECT_LEN: usize = 2048;

/// `NAME=value` assignments, quoted or bare, at the start of a shell word
static ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(^|[\s;&|(])([A-Za-z_][A-Za-z0-9_]*)=(?:'[^']*'|"[^"]*"|[^\s;&|)]*)"#).unwrap()
});

/// Append-only record of every gate decision and fail-open fault
///
/// Stdout belongs to the hook protocol, so this file is the only place
/// decisions and internal faults are visible after the fact.
/// Commands are recorded with `NAME=value` assignment values masked, so
/// `export TOKEN=...` does not land in the log. Other arguments are kept
/// verbatim, including secrets passed as plain arguments or flags.
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    /// Create an AuditLogger with a custom log path
    pub fn with_path<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let log_path = path.as_ref().to_path_buf();

        // Ensure directory exists
        if let Some(parent) = log_path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(Self { log_path })
    }

    /// Log the outcome of one invocation
    pub fn log_evaluation(
        &self,
        tool: &str,
        subject: &str,
        evaluation: &Evaluation,
    ) -> std::io::Result<()> {
        let decision = evaluation.verdict.decision().as_str().to_uppercase();
        let mut entry = format!("[{}:{}]", decision, evaluation.rule.as_str());

        if let Some(reason) = evaluation.verdict.reason() {
            entry.push_str(&format!(" reason=\"{}\"", single_line(reason)));
        }
        if let Some(fault) = &evaluation.fault {
            entry.push_str(&format!(" fault=\"{}\"", single_line(fault)));
        }
        let subject = redact_assignments(subject);
        entry.push_str(&format!(" input=\"{}\"", single_line(truncate(&subject))));

        self.append(tool, &entry)
    }

    /// Log a problem that made the gate fall back to defaults
    pub fn log_fault(&self, message: &str) -> std::io::Result<()> {
        self.append("-", &format!("[FAULT] {}", single_line(message)))
    }

    fn append(&self, tool: &str, entry: &str) -> std::io::Result<()> {
        // Check and rotate log if needed
        self.rotate_if_needed()?;

        let timestamp = Utc::now().to_rfc3339();
        let user = std::env::var("USER").unwrap_or_else(|_| "unknown".to_string());

        let log_entry = format!("[{}] [{}] [{}] {}\n", timestamp, user, tool, entry);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;

        file.write_all(log_entry.as_bytes())?;
        file.flush()?;

        Ok(())
    }

    /// Rotate log file if it exceeds MAX_LOG_SIZE
    fn rotate_if_needed(&self) -> std::io::Result<()> {
        if !self.log_path.exists() {
            return Ok(());
        }

        let metadata = fs::metadata(&self.log_path)?;
        if metadata.len() > MAX_LOG_SIZE {
            // Rotate: decisions.log -> decisions.log.1
            let backup_path = self.log_path.with_extension("log.1");
            fs::rename(&self.log_path, backup_path)?;
        }

        Ok(())
    }

    /// Get the path to the log file
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

fn single_line(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace('"', "\\\"")
}

fn redact_assignments(text: &str) -> String {
    ASSIGNMENT.replace_all(text, "${1}${2}=***").into_owned()
}

fn truncate(text: &str) -> &str {
    match text.char_indices().nth(MAX_SUBJECT_LEN) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
