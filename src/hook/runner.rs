use std::io;
use std::panic::{self, AssertUnwindSafe};

use crate::audit::AuditLogger;
use crate::config::{Allowlist, Config};
use crate::error::AppError;
use crate::hook::engine::{DecisionEngine, Evaluation};
use crate::hook::input::ToolInvocation;
use crate::hook::verdict::HookResponse;

/// One request/response cycle of the hook, with fail-open error handling
///
/// FAIL-OPEN: malformed input and panics inside the checks end in an ordinary
/// allow. An unreadable config or allowlist falls back to built-in defaults.
/// The only trace of such a fault is the audit log.
pub struct HookRunner {
    engine: DecisionEngine,
    audit: Option<AuditLogger>,
}

impl HookRunner {
    pub fn new(engine: DecisionEngine, audit: Option<AuditLogger>) -> Self {
        Self { engine, audit }
    }

    /// Build from the config file, allowlist and audit log on disk. Never fails.
    pub fn from_environment() -> Self {
        match Config::load() {
            Ok(config) => Self::from_config(&config),
            Err(e) => {
                let runner = Self::from_config(&Config::default_config());
                runner.record_fault(&AppError::from(e));
                runner
            }
        }
    }

    /// Build from an already loaded config, falling back to the built-in
    /// allowlist when the configured one cannot be read
    pub fn from_config(config: &Config) -> Self {
        let mut faults: Vec<AppError> = Vec::new();

        let allowlist = match config.allowlist_path() {
            Ok(path) => {
                let (allowlist, error) = Allowlist::load_or_builtin(&path);
                if let Some(e) = error.filter(|e| !e.is_missing()) {
                    faults.push(e.into());
                }
                allowlist
            }
            Err(e) => {
                faults.push(e.into());
                Allowlist::builtin()
            }
        };

        let audit = if config.audit.enabled {
            config
                .audit_log_path()
                .map_err(AppError::from)
                .and_then(|path| AuditLogger::with_path(path).map_err(AppError::from))
                .ok()
        } else {
            None
        };

        let runner = Self::new(DecisionEngine::new(config, allowlist), audit);
        for fault in &faults {
            runner.record_fault(fault);
        }
        runner
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    /// Parse, evaluate and audit one raw hook request
    pub fn evaluate_input(&self, input: &str) -> Evaluation {
        let (tool, subject, evaluation) = match ToolInvocation::from_json(input) {
            Ok(invocation) => {
                let evaluation =
                    panic::catch_unwind(AssertUnwindSafe(|| self.engine.evaluate(&invocation)))
                        .unwrap_or_else(|_| Evaluation::fail_open("internal fault during evaluation"));
                (
                    invocation.tool.to_string(),
                    invocation.subject().to_string(),
                    evaluation,
                )
            }
            Err(e) => (
                "-".to_string(),
                String::new(),
                Evaluation::fail_open(AppError::from(e).to_string()),
            ),
        };

        if let Some(audit) = &self.audit {
            let _ = audit.log_evaluation(&tool, &subject, &evaluation);
        }

        evaluation
    }

    /// Answer one raw hook request
    pub fn handle(&self, input: &str) -> HookResponse {
        self.evaluate_input(input).response()
    }

    /// Answer when stdin itself could not be read
    pub fn handle_read_error(&self, error: io::Error) -> HookResponse {
        let evaluation = Evaluation::fail_open(AppError::from(error).to_string());
        if let Some(audit) = &self.audit {
            let _ = audit.log_evaluation("-", "", &evaluation);
        }
        evaluation.response()
    }

    fn record_fault(&self, fault: &AppError) {
        if let Some(audit) = &self.audit {
            let _ = audit.log_fault(&fault.to_string());
        }
    }
}
