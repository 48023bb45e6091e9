//! Frontmatter extraction for markdown documents.
//!
//! A document carries frontmatter when its first line starts with `---` and a
//! later line is exactly `---` (surrounding whitespace ignored). The enclosed
//! text is parsed with `serde_yaml`; only a mapping counts as frontmatter.
//!
//! When YAML parsing fails (typically an unquoted colon inside a free-text
//! description), a flat line-oriented fallback records top-level
//! `key: value` pairs as strings. It never attempts nested structures:
//! - an empty value is recorded as `true`
//! - a value starting with `[` or `-` is recorded as its raw text

use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::sync::LazyLock;
use tracing::trace;

pub const DELIMITER: &str = "---";

static RE_FLAT_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([a-z][a-z0-9-]*)\s*:\s*(.*)$").unwrap());

#[derive(Debug, Clone, PartialEq)]
/// Result of splitting a document into frontmatter and body.
pub struct Extracted {
    pub frontmatter: Option<Mapping>,
    /// 1-based line of the closing delimiter, 0 when no block was found.
    pub end_line: usize,
    pub body: String,
}

impl Extracted {
    fn absent(content: &str) -> Self {
        Self {
            frontmatter: None,
            end_line: 0,
            body: content.to_string(),
        }
    }
}

/// Split `content` into parsed frontmatter, block end line, and body.
pub fn extract(content: &str) -> Extracted {
    if !content.starts_with(DELIMITER) {
        return Extracted::absent(content);
    }
    let lines: Vec<&str> = content.split('\n').collect();
    let close = match lines
        .iter()
        .skip(1)
        .position(|l| l.trim() == DELIMITER)
    {
        Some(pos) => pos + 1,
        None => return Extracted::absent(content),
    };

    let block = &lines[1..close];
    let body = lines[close + 1..].join("\n");
    let frontmatter = parse_yaml(&block.join("\n")).or_else(|| {
        trace!("frontmatter is not a YAML mapping; using flat fallback");
        parse_flat(block)
    });
    Extracted {
        frontmatter,
        end_line: close + 1,
        body,
    }
}

fn parse_yaml(text: &str) -> Option<Mapping> {
    match serde_yaml::from_str::<Value>(text) {
        Ok(Value::Mapping(map)) => Some(map),
        _ => None,
    }
}

/// Best-effort flat parse of `key: value` lines. Indented lines never match.
fn parse_flat(lines: &[&str]) -> Option<Mapping> {
    let mut map = Mapping::new();
    for line in lines {
        let Some(caps) = RE_FLAT_ENTRY.captures(line) else {
            continue;
        };
        let key = caps[1].to_lowercase();
        let raw = caps[2].trim();
        let value = if raw.is_empty() {
            Value::Bool(true)
        } else {
            Value::String(raw.to_string())
        };
        map.insert(Value::String(key), value);
    }
    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

/// Render a mapping key the way it is reported in issues.
pub fn key_label(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => display_value(other),
    }
}

/// Render a value for inclusion in an issue message.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get<'a>(map: &'a Mapping, key: &str) -> Option<&'a Value> {
        map.get(key)
    }

    #[test]
    fn test_extract_valid_frontmatter() {
        let content = "---\nname: my-agent\ndescription: A test\ncolor: blue\n---\n\nBody here";
        let ex = extract(content);
        let fm = ex.frontmatter.unwrap();
        assert_eq!(get(&fm, "name").and_then(Value::as_str), Some("my-agent"));
        assert_eq!(get(&fm, "description").and_then(Value::as_str), Some("A test"));
        assert_eq!(get(&fm, "color").and_then(Value::as_str), Some("blue"));
        assert_eq!(ex.end_line, 5);
        assert!(ex.body.contains("Body here"));
    }

    #[test]
    fn test_extract_no_frontmatter() {
        let content = "Just some markdown\nwithout frontmatter";
        let ex = extract(content);
        assert!(ex.frontmatter.is_none());
        assert_eq!(ex.end_line, 0);
        assert_eq!(ex.body, content);
    }

    #[test]
    fn test_extract_unclosed_frontmatter() {
        let content = "---\nname: my-agent\ndescription: A test\n";
        let ex = extract(content);
        assert!(ex.frontmatter.is_none());
        assert_eq!(ex.end_line, 0);
        assert_eq!(ex.body, content);
    }

    #[test]
    fn test_extract_fallback_on_unquoted_colons() {
        let content = "---\nname: my-agent\ndescription: Context: this has colons: everywhere\ncolor: blue\n---\n\nBody";
        let ex = extract(content);
        let fm = ex.frontmatter.unwrap();
        assert_eq!(get(&fm, "name").and_then(Value::as_str), Some("my-agent"));
        assert_eq!(get(&fm, "color").and_then(Value::as_str), Some("blue"));
        assert_eq!(
            get(&fm, "description").and_then(Value::as_str),
            Some("Context: this has colons: everywhere")
        );
        assert_eq!(ex.body, "\nBody");
    }

    #[test]
    fn test_fallback_records_sentinels_for_lists_and_empty_values() {
        let content = "---\nname: a: b\nskills:\n  - one\ntools: [Read, Write]\n---\n";
        let fm = extract(content).frontmatter.unwrap();
        assert_eq!(get(&fm, "skills"), Some(&Value::Bool(true)));
        assert_eq!(
            get(&fm, "tools").and_then(Value::as_str),
            Some("[Read, Write]")
        );
        // indented list items are never promoted to keys
        assert!(get(&fm, "- one").is_none());
        assert_eq!(fm.len(), 3);
    }

    #[test]
    fn test_non_mapping_block_is_absent() {
        let ex = extract("---\n- just\n- a list\n---\nbody");
        assert!(ex.frontmatter.is_none());
        assert_eq!(ex.end_line, 4);
        assert_eq!(ex.body, "body");
    }

    #[test]
    fn test_empty_block_is_absent() {
        let ex = extract("---\n---\nbody");
        assert!(ex.frontmatter.is_none());
    }

    #[test]
    fn test_yaml_keeps_insertion_order() {
        let fm = extract("---\nzeta: 1\nalpha: 2\nmid: 3\n---\n")
            .frontmatter
            .unwrap();
        let keys: Vec<String> = fm.keys().map(key_label).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }
}
