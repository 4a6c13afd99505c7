pub mod allowlist;
pub mod settings;

pub use allowlist::{Allowlist, AllowlistError};
pub use settings::{AuditConfig, AllowlistConfig, Config, ConfigError, PipePolicy, PolicyConfig, SensitiveConfig};
