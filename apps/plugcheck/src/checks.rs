//! Content heuristics shared by the category rules.
//!
//! These checks look at field values or the markdown body and never at the
//! category itself; `rules` decides which ones apply and at what severity.

use regex::Regex;
use serde_yaml::Value;
use std::sync::LazyLock;

/// Placeholder commands use to receive user input.
pub const ARGUMENTS_PLACEHOLDER: &str = "$ARGUMENTS";

/// Agents allowed to hold direct access to an external integration.
pub const WRAPPER_AGENTS: &[&str] = &[
    "focus-linear",
    "life-notion",
    "life-calendar",
    "life-kroger",
    "life-instacart",
    "company-sprint",
];

static RE_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9-]*$").unwrap());

static RE_TABLE_ROUTING: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\|\s*(Keyword|Trigger|Command|Input|First Word)\s*\|\s*(Action|Agent|Route)",
        r"(?i)\|\s*\w+\s*\|\s*(code-reviewer|engineer|architect)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static RE_HARDCODED_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(/Users/|/home/|~/\.claude/plugins/)").unwrap());

/// Integration tool patterns and the agent that should own them.
static RESTRICTED_INTEGRATIONS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)mcp__.*linear", "Linear MCP - delegate to focus-linear agent"),
        (r"(?i)mcp__.*notion", "Notion MCP - delegate to life-notion agent"),
        (r"(?i)mcp__.*calendar", "Calendar MCP - delegate to life-calendar agent"),
        (r"(?i)mcp__.*kroger", "Kroger MCP - delegate to life-kroger agent"),
    ]
    .into_iter()
    .map(|(p, msg)| (Regex::new(p).unwrap(), msg))
    .collect()
});

/// True when `value` is a string in lowercase-hyphenated form.
pub fn is_lowercase_hyphenated(value: &Value) -> bool {
    value.as_str().is_some_and(|s| RE_NAME.is_match(s))
}

/// Detect a markdown table used as a keyword → action dispatch table.
pub fn has_table_routing(content: &str) -> bool {
    RE_TABLE_ROUTING.iter().any(|re| re.is_match(content))
}

/// 1-based line numbers containing hardcoded user or install paths.
/// Lines that are comments (`#` or `//`) are ignored.
pub fn hardcoded_path_lines(content: &str) -> Vec<usize> {
    content
        .split('\n')
        .enumerate()
        .filter(|(_, line)| RE_HARDCODED_PATH.is_match(line))
        .filter(|(_, line)| {
            let t = line.trim();
            !t.starts_with('#') && !t.starts_with("//")
        })
        .map(|(i, _)| i + 1)
        .collect()
}

/// Return the delegation hint when a non-wrapper agent declares a
/// restricted integration tool.
pub fn restricted_integration(tools: &str, agent_name: &str) -> Option<&'static str> {
    if tools.is_empty() || WRAPPER_AGENTS.contains(&agent_name) {
        return None;
    }
    RESTRICTED_INTEGRATIONS
        .iter()
        .find(|(re, _)| re.is_match(tools))
        .map(|(_, msg)| *msg)
}
