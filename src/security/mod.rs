//! Static checks run against a tool invocation before it executes.
//!
//! Everything here is text analysis over the borrowed command string. Nothing
//! is expanded, executed, or rewritten. The recognizers are heuristics layered
//! for defense in depth, not a shell parser: backslash escapes, `$IFS` tricks
//! and other adversarial quoting can slip past them.

pub mod delete;
pub mod pipeline;
pub mod search_tools;
pub mod sensitive;

pub use delete::is_dangerous_delete;
pub use pipeline::{
    base_command, classify, find_unsafe_command, has_unquoted_pipe, is_safe_pipeline,
    split_pipeline, CommandClass, Segments, UnsafeCommand,
};
pub use search_tools::uses_raw_search_tool;
pub use sensitive::{is_sensitive_file_access, SensitiveFileRule};

/// Commands that are never acceptable inside a pipeline
///
/// This list wins over the operator allowlist: listing `sh` in `~/.claude/safe`
/// does not make `curl ... | sh` safe.
pub const DANGEROUS_COMMANDS: &[&str] = &[
    // Removal
    "rm",
    "rmdir",
    "shred",
    "wipe",
    "secure-delete",
    "srm",
    // Disk formatting
    "dd",
    "mkfs",
    "fdisk",
    "parted",
    // Power
    "shutdown",
    "reboot",
    "halt",
    "poweroff",
    // Privileged services
    "systemctl",
    "service",
    "init",
    "sudo",
    "su",
    "doas",
    // Dynamic evaluation
    "eval",
    "exec",
    "source",
    ".",
    "sh",
    "bash",
    "zsh",
    "dash",
    "ksh",
    "fish",
    "csh",
    "tcsh",
];

/// Used when the allowlist file is missing or unreadable
pub const DEFAULT_SAFE_COMMANDS: &[&str] =
    &["cat", "grep", "ls", "echo", "head", "tail", "sort", "uniq"];

/// Shell syntax that can open a pipeline segment without naming a program
pub const SHELL_SYNTAX_TOKENS: &[&str] = &["[", "[[", "test", "(", "{", ";"];

/// Commands that run the command named in their arguments
pub const WRAPPER_COMMANDS: &[&str] = &["command", "builtin", "env", "nice", "nohup", "time", "xargs"];

/// Wrapper options whose value is the following token, as in `xargs -n 1`
pub const WRAPPER_VALUE_OPTIONS: &[(&str, &[&str])] = &[
    ("xargs", &["-n", "-I", "-L", "-P", "-d", "-s", "-E", "-a"]),
    ("nice", &["-n"]),
    ("env", &["-u", "-C", "-S"]),
    ("time", &["-f", "-o"]),
];

/// Interpreter suffixes removed from script names before classification
pub const SCRIPT_EXTENSIONS: &[&str] = &[".sh", ".py", ".rb", ".pl", ".js", ".ts"];
