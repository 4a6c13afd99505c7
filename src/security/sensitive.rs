use crate::config::SensitiveConfig;
use crate::hook::input::{ToolInput, ToolInvocation};

/// Substring that marks a secret-bearing file
pub const DEFAULT_MARKER: &str = ".env";

/// Template variants that are safe to read and write
pub const DEFAULT_EXEMPT_SUFFIXES: &[&str] = &[".env.sample", ".env.example", ".env.template"];

/// Detects tool access to files that hold secrets, such as `.env`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensitiveFileRule {
    marker: String,
    exempt_suffixes: Vec<String>,
}

impl SensitiveFileRule {
    pub fn new(marker: impl Into<String>, exempt_suffixes: Vec<String>) -> Self {
        Self {
            marker: marker.into(),
            exempt_suffixes,
        }
    }

    pub fn from_config(config: &SensitiveConfig) -> Self {
        Self::new(config.marker.clone(), config.exempt_suffixes.clone())
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// The template file name suggested in deny messages
    pub fn template_hint(&self) -> &str {
        self.exempt_suffixes
            .first()
            .map(String::as_str)
            .unwrap_or(self.marker.as_str())
    }

    /// A file path is sensitive when it contains the marker and is not a template
    pub fn matches_path(&self, path: &str) -> bool {
        !self.marker.is_empty()
            && path.contains(&self.marker)
            && !self
                .exempt_suffixes
                .iter()
                .any(|suffix| path.ends_with(suffix.as_str()))
    }

    /// A shell command is sensitive when any word-terminated occurrence of
    /// the marker is not the start of a template name.
    ///
    /// This covers bare paths (`source .env`, `./config/.env`) as well as
    /// `cat .env`, `echo x > .env`, `touch .env`, `cp .env a` and `mv .env b`.
    /// `.envrc` does not match.
    pub fn matches_command(&self, command: &str) -> bool {
        if self.marker.is_empty() {
            return false;
        }

        command.match_indices(self.marker.as_str()).any(|(start, _)| {
            let end = start + self.marker.len();
            let occurrence = &command[start..];

            self.ends_at_word_boundary(command, end)
                && !self
                    .exempt_suffixes
                    .iter()
                    .any(|suffix| occurrence.starts_with(suffix.as_str()))
        })
    }

    /// Flag direct file-tool access or shell access to a sensitive file
    pub fn is_sensitive_file_access(&self, invocation: &ToolInvocation) -> bool {
        match &invocation.input {
            ToolInput::File { file_path } => self.matches_path(file_path),
            ToolInput::Shell { command } => self.matches_command(command),
            ToolInput::Other => false,
        }
    }

    fn ends_at_word_boundary(&self, command: &str, end: usize) -> bool {
        let marker_ends_in_word = self.marker.chars().last().is_some_and(is_word_char);
        let next_is_word = command[end..].chars().next().is_some_and(is_word_char);

        !(marker_ends_in_word && next_is_word)
    }
}

impl Default for SensitiveFileRule {
    fn default() -> Self {
        Self::from_config(&SensitiveConfig::default())
    }
}

/// Check an invocation against the default `.env` rule
pub fn is_sensitive_file_access(invocation: &ToolInvocation) -> bool {
    SensitiveFileRule::default().is_sensitive_file_access(invocation)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
