pub mod audit;
pub mod config;
pub mod error;
pub mod hook;
pub mod security;

// Re-export commonly used types for convenience
pub use config::{Allowlist, Config};
pub use error::{AppError, AppResult};
pub use hook::{DecisionEngine, Evaluation, HookResponse, HookRunner, ToolInvocation, Verdict};
