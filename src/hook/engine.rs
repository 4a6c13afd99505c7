use crate::config::{Allowlist, Config, PipePolicy, PolicyConfig};
use crate::hook::input::{ToolInput, ToolInvocation};
use crate::hook::verdict::{HookResponse, Verdict};
use crate::security::search_tools::SEARCH_TOOLS_MESSAGE;
use crate::security::{
    find_unsafe_command, has_unquoted_pipe, is_dangerous_delete, uses_raw_search_tool,
    CommandClass, SensitiveFileRule, UnsafeCommand,
};

pub const DANGEROUS_DELETE_REASON: &str = "Dangerous rm command detected and prevented. \
     Recursive or forced deletion of broad targets (/, ~, $HOME, .., ., wildcards) is blocked; \
     delete specific paths without -r/-f instead.";

pub const RAW_SEARCH_REASON: &str =
    "Raw grep/find is disabled in Bash. Use rg, fd, or the built-in Grep and Glob tools.";

/// Which check decided the verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    SensitiveFile,
    DestructiveDelete,
    UnsafePipeline,
    RawSearchTool,
    NotShell,
    NoMatch,
    /// Input or evaluation failed; the gate allowed the call
    FailOpen,
}

impl Rule {
    pub fn as_str(self) -> &'static str {
        match self {
            Rule::SensitiveFile => "sensitive-file",
            Rule::DestructiveDelete => "destructive-delete",
            Rule::UnsafePipeline => "unsafe-pipeline",
            Rule::RawSearchTool => "raw-search-tool",
            Rule::NotShell => "not-shell",
            Rule::NoMatch => "no-match",
            Rule::FailOpen => "fail-open",
        }
    }
}

/// A verdict plus what produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub verdict: Verdict,
    pub rule: Rule,
    pub system_message: Option<String>,
    /// Why the gate failed open, when it did
    pub fault: Option<String>,
}

impl Evaluation {
    fn new(verdict: Verdict, rule: Rule) -> Self {
        Self {
            verdict,
            rule,
            system_message: None,
            fault: None,
        }
    }

    pub fn allow(rule: Rule) -> Self {
        Self::new(Verdict::Allow, rule)
    }

    pub fn deny(rule: Rule, reason: impl Into<String>) -> Self {
        Self::new(Verdict::Deny(reason.into()), rule)
    }

    pub fn ask(rule: Rule, reason: impl Into<String>) -> Self {
        Self::new(Verdict::Ask(reason.into()), rule)
    }

    /// Allow because something went wrong. The fault only reaches the audit log.
    pub fn fail_open(fault: impl Into<String>) -> Self {
        Self {
            fault: Some(fault.into()),
            ..Self::allow(Rule::FailOpen)
        }
    }

    pub fn with_system_message(mut self, message: impl Into<String>) -> Self {
        self.system_message = Some(message.into());
        self
    }

    pub fn response(&self) -> HookResponse {
        let response = HookResponse::new(&self.verdict);
        match &self.system_message {
            Some(message) => response.with_system_message(message.as_str()),
            None => response,
        }
    }
}

/// Composes the security checks into one verdict per tool invocation
///
/// Checks run in priority order and the first match wins:
/// 1. sensitive file access → deny
/// 2. not a shell command → allow
/// 3. destructive `rm` → deny
/// 4. unquoted pipe with a dangerous or unlisted command → ask or deny per [`PipePolicy`]
/// 5. raw `grep`/`find`, when enforcement is on → deny
/// 6. otherwise → allow
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    allowlist: Allowlist,
    policy: PolicyConfig,
    sensitive: SensitiveFileRule,
}

impl DecisionEngine {
    pub fn new(config: &Config, allowlist: Allowlist) -> Self {
        Self {
            allowlist,
            policy: config.policy.clone(),
            sensitive: SensitiveFileRule::from_config(&config.sensitive),
        }
    }

    pub fn allowlist(&self) -> &Allowlist {
        &self.allowlist
    }

    /// Decide one invocation. Pure: the same invocation always yields the same evaluation.
    pub fn evaluate(&self, invocation: &ToolInvocation) -> Evaluation {
        if self.sensitive.is_sensitive_file_access(invocation) {
            return Evaluation::deny(Rule::SensitiveFile, self.sensitive_reason());
        }

        let ToolInput::Shell { command } = &invocation.input else {
            return Evaluation::allow(Rule::NotShell);
        };

        if is_dangerous_delete(command) {
            return Evaluation::deny(Rule::DestructiveDelete, DANGEROUS_DELETE_REASON);
        }

        if has_unquoted_pipe(command) {
            if let Some(offender) = find_unsafe_command(command, &self.allowlist) {
                return self.unsafe_pipeline(&offender);
            }
        }

        if self.policy.enforce_search_tools && uses_raw_search_tool(command) {
            return Evaluation::deny(Rule::RawSearchTool, RAW_SEARCH_REASON)
                .with_system_message(SEARCH_TOOLS_MESSAGE);
        }

        Evaluation::allow(Rule::NoMatch)
    }

    fn sensitive_reason(&self) -> String {
        format!(
            "Access to {} files containing sensitive data is prohibited. Use {} for template files instead.",
            self.sensitive.marker(),
            self.sensitive.template_hint()
        )
    }

    fn unsafe_pipeline(&self, offender: &UnsafeCommand) -> Evaluation {
        let detail = match offender.class {
            CommandClass::Dangerous => format!(
                "Piped command '{}' can execute arbitrary code or destroy data and is never allowed in a pipeline.",
                offender.name
            ),
            _ => format!(
                "Piped command '{}' is not in the safe allowlist. Add it to the allowlist file if it is safe to pipe.",
                offender.name
            ),
        };

        match self.policy.pipe_policy {
            PipePolicy::Ask => Evaluation::ask(
                Rule::UnsafePipeline,
                format!("{} Would you like to proceed?", detail),
            ),
            PipePolicy::Deny => Evaluation::deny(Rule::UnsafePipeline, detail),
        }
    }
}
