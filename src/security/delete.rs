use std::sync::LazyLock;

use regex::Regex;

/// `rm` with both a recursive and a force flag, in any spelling or order
static RECURSIVE_FORCE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Clustered short flags, other letters allowed in between: -rf, -fr, -rvf
        r"\brm\s+.*-[a-z]*r[a-z]*f",
        r"\brm\s+.*-[a-z]*f[a-z]*r",
        // Long flags
        r"\brm\s+--recursive\s+--force",
        r"\brm\s+--force\s+--recursive",
        // Long recursive before a force flag of either form
        r"\brm\s+.*--recursive\s+.*-f",
        // Split short flags with arguments in between
        r"\brm\s+-r\s+.*-f",
        r"\brm\s+-f\s+.*-r",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static RECURSIVE_FLAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\brm\s+.*-[a-z]*r").unwrap());

/// Targets that make any recursive removal catastrophic
static DANGEROUS_TARGETS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"/",           // root
        r"/\*",         // root wildcard
        r"~",           // home shorthand
        r"~/",          // home path
        r"\$\{?home\b", // $HOME, ${HOME}
        r"\.\.",        // parent directory
        r"\*",          // any wildcard
        r"\.",          // current directory
        r"\.\s*$",      // current directory as the final token
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Detect recursive and/or forced `rm` invocations that could destroy data.
///
/// The command is lowercased and its whitespace collapsed first, so `-Rf`,
/// `-fR` and `rm    -r -f` all match. Matching is deliberately broad: once a
/// recursive flag is present, any path separator, wildcard, tilde or dot in
/// the command counts as a dangerous target.
pub fn is_dangerous_delete(command: &str) -> bool {
    let normalized = command
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if RECURSIVE_FORCE_PATTERNS
        .iter()
        .any(|pattern| pattern.is_match(&normalized))
    {
        return true;
    }

    RECURSIVE_FLAG.is_match(&normalized)
        && DANGEROUS_TARGETS
            .iter()
            .any(|target| target.is_match(&normalized))
}
