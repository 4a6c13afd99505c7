use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Empty hook input")]
    Empty,

    #[error("Malformed hook input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Hook input is missing field: {0}")]
    MissingField(&'static str),
}

/// The tool a hook request is about
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Read,
    Edit,
    MultiEdit,
    Write,
    Bash,
    /// Any tool the gate has no specific checks for
    Other(String),
}

impl ToolKind {
    pub fn as_str(&self) -> &str {
        match self {
            ToolKind::Read => "Read",
            ToolKind::Edit => "Edit",
            ToolKind::MultiEdit => "MultiEdit",
            ToolKind::Write => "Write",
            ToolKind::Bash => "Bash",
            ToolKind::Other(name) => name.as_str(),
        }
    }

    /// Tools whose input names a single file via `file_path`
    pub fn is_file_tool(&self) -> bool {
        matches!(
            self,
            ToolKind::Read | ToolKind::Edit | ToolKind::MultiEdit | ToolKind::Write
        )
    }

    pub fn is_shell(&self) -> bool {
        matches!(self, ToolKind::Bash)
    }
}

impl From<&str> for ToolKind {
    fn from(name: &str) -> Self {
        match name {
            "Read" => ToolKind::Read,
            "Edit" => ToolKind::Edit,
            "MultiEdit" => ToolKind::MultiEdit,
            "Write" => ToolKind::Write,
            "Bash" => ToolKind::Bash,
            other => ToolKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tool parameters the gate inspects, shaped by tool kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolInput {
    File { file_path: String },
    Shell { command: String },
    Other,
}

/// One proposed tool call, as received from the hook caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub tool: ToolKind,
    pub input: ToolInput,
}

#[derive(Debug, Deserialize)]
struct RawInvocation {
    tool_name: Option<String>,
    #[serde(default)]
    tool_input: Option<Map<String, Value>>,
}

impl ToolInvocation {
    /// Parse the JSON object a PreToolUse hook receives on stdin
    ///
    /// Unknown fields are ignored. File tools must carry `file_path` and the
    /// shell tool must carry `command`.
    pub fn from_json(input: &str) -> Result<Self, InputError> {
        if input.trim().is_empty() {
            return Err(InputError::Empty);
        }

        let raw: RawInvocation = serde_json::from_str(input)?;
        let name = raw.tool_name.ok_or(InputError::MissingField("tool_name"))?;
        let tool = ToolKind::from(name.as_str());
        let params = raw.tool_input.unwrap_or_default();

        let input = if tool.is_file_tool() {
            ToolInput::File {
                file_path: string_field(&params, "file_path")?,
            }
        } else if tool.is_shell() {
            ToolInput::Shell {
                command: string_field(&params, "command")?,
            }
        } else {
            ToolInput::Other
        };

        Ok(Self { tool, input })
    }

    pub fn bash(command: impl Into<String>) -> Self {
        Self {
            tool: ToolKind::Bash,
            input: ToolInput::Shell {
                command: command.into(),
            },
        }
    }

    pub fn file(tool: ToolKind, file_path: impl Into<String>) -> Self {
        Self {
            tool,
            input: ToolInput::File {
                file_path: file_path.into(),
            },
        }
    }

    pub fn other(name: &str) -> Self {
        Self {
            tool: ToolKind::from(name),
            input: ToolInput::Other,
        }
    }

    /// The command or path under inspection, for logging
    pub fn subject(&self) -> &str {
        match &self.input {
            ToolInput::File { file_path } => file_path.as_str(),
            ToolInput::Shell { command } => command.as_str(),
            ToolInput::Other => "",
        }
    }
}

fn string_field(params: &Map<String, Value>, field: &'static str) -> Result<String, InputError> {
    params
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(InputError::MissingField(field))
}
