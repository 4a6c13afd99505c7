use std::sync::LazyLock;

use regex::Regex;

/// Shown to the agent when a raw `grep`/`find` is refused
pub const SEARCH_TOOLS_MESSAGE: &str = "\
**[enforce-search-tools]**
Do not use raw `grep` or `find` in Bash.

- **Text search** → use the **Grep** tool (ripgrep-backed, correct permissions)
- **File search** → use the **Glob** tool (fast pattern matching)
- **Bash text search** → `rg` (ripgrep) is always available
- **Bash file search** → `fd` (fd-find) is always available
";

/// `grep`/`find` in command position: at the start of a line, after a pipe,
/// chain operator or subshell opener, behind optional `NAME=value` assignments
/// and `command`/`env`/`sudo`/`xargs` wrappers. `git grep` and `--grep=` are
/// not in command position.
static RAW_SEARCH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)(?:^|[|;&\n]|\$\(|`)\s*(?:\S+=\S*\s+)*(?:(?:command|env|sudo|xargs)\s+)*(?:grep|find)\b",
    )
    .unwrap()
});

static HEREDOC_OPENER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<<-?\s*['"]?(\w+)['"]?"#).unwrap());

static SINGLE_QUOTED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"'[^']*'").unwrap());

/// Whether the command runs `grep` or `find` directly
pub fn uses_raw_search_tool(command: &str) -> bool {
    RAW_SEARCH.is_match(&strip_literals(command))
}

/// Blank out heredoc bodies and single-quoted strings, so a commit message
/// that mentions grep does not count as running it.
fn strip_literals(command: &str) -> String {
    let without_heredocs = strip_heredocs(command);
    SINGLE_QUOTED
        .replace_all(&without_heredocs, "''")
        .into_owned()
}

fn strip_heredocs(command: &str) -> String {
    let mut out = String::with_capacity(command.len());
    let mut rest = command;

    while let Some(caps) = HEREDOC_OPENER.captures(rest) {
        let Some(opener) = caps.get(0) else { break };
        let delimiter = &caps[1];

        // `<<<` is a here-string, not a heredoc
        if rest[..opener.start()].ends_with('<') {
            out.push_str(&rest[..opener.end()]);
            rest = &rest[opener.end()..];
            continue;
        }

        out.push_str(&rest[..opener.start()]);

        // The rest of the opener line is still live shell text
        let after = &rest[opener.end()..];
        let (line_tail, body) = match after.find('\n') {
            Some(newline) => (&after[..newline], &after[newline + 1..]),
            None => (after, ""),
        };
        out.push_str(line_tail);
        out.push('\n');

        let mut consumed = 0;
        let mut terminated = false;
        for line in body.split_inclusive('\n') {
            consumed += line.len();
            if line.trim() == delimiter {
                terminated = true;
                break;
            }
        }

        rest = if terminated { &body[consumed..] } else { "" };
    }

    out.push_str(rest);
    out
}
