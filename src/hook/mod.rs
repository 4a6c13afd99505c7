//! PreToolUse hook protocol: parse the request, decide, answer.

pub mod engine;
pub mod input;
pub mod runner;
pub mod verdict;

pub use engine::{DecisionEngine, Evaluation, Rule};
pub use input::{InputError, ToolInput, ToolInvocation, ToolKind};
pub use runner::HookRunner;
pub use verdict::{HookResponse, PermissionDecision, Verdict, FAIL_OPEN_RESPONSE};
