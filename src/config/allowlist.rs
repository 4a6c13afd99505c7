use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::security::DEFAULT_SAFE_COMMANDS;

#[derive(Debug, Error)]
pub enum AllowlistError {
    #[error("Failed to read allowlist {}: {source}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl AllowlistError {
    /// True when the file simply does not exist, which is not worth reporting
    pub fn is_missing(&self) -> bool {
        match self {
            AllowlistError::ReadError { source, .. } => source.kind() == io::ErrorKind::NotFound,
        }
    }
}

/// Operator-maintained set of base commands that may appear in a pipeline
///
/// Entries are lowercased on load and lookups are lowercased too, so `Grep`
/// in the file and `GREP` on the command line both match `grep`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allowlist {
    commands: HashSet<String>,
}

impl Allowlist {
    /// Load the allowlist from a file
    pub fn load(path: &Path) -> Result<Self, AllowlistError> {
        let contents = fs::read_to_string(path).map_err(|source| AllowlistError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self::parse(&contents))
    }

    /// Load the allowlist, falling back to the built-in set on any failure
    ///
    /// The error is handed back so the caller can record it.
    pub fn load_or_builtin(path: &Path) -> (Self, Option<AllowlistError>) {
        match Self::load(path) {
            Ok(allowlist) => (allowlist, None),
            Err(e) => (Self::builtin(), Some(e)),
        }
    }

    /// Parse allowlist contents: one name per line, `#` comments and blanks ignored
    pub fn parse(contents: &str) -> Self {
        contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect()
    }

    /// The minimal set used when no allowlist file can be read
    pub fn builtin() -> Self {
        DEFAULT_SAFE_COMMANDS.iter().copied().collect()
    }

    pub fn contains(&self, command: &str) -> bool {
        self.commands.contains(&command.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for Allowlist {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let commands = iter
            .into_iter()
            .map(|name| name.as_ref().trim().to_lowercase())
            .filter(|name| !name.is_empty())
            .collect();

        Self { commands }
    }
}
