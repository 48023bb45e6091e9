//! Category rule sets for agent, command, and skill frontmatter.
//!
//! | Check | Agent | Command | Skill |
//! |---|---|---|---|
//! | wrong tool field | error | error | error |
//! | missing required field | error | error | error |
//! | name format | error | - | error |
//! | color enum | error | - | - |
//! | skill name matches directory | - | - | error |
//! | `skills` / `metadata.capabilities` absent | warning | - | - |
//! | no tool field at all | - | warning | - |
//! | `$ARGUMENTS` in body | - | warning when absent | error when present |
//! | table-based routing | - | warning | - |
//! | restricted integration tools | warning | - | - |
//! | hardcoded paths in body (first 3) | warning | - | - |
//! | description shorter than 20 chars | - | - | warning |
//! | unrecognized field | warning | warning | warning |
//!
//! All issues are reported on line 1 except hardcoded paths, which carry the
//! body line they were found on.

use crate::checks;
use crate::frontmatter::{display_value, key_label};
use crate::models::{Findings, ValidationIssue};
use regex::Regex;
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::sync::LazyLock;

/// Named colors accepted for agents.
pub const VALID_COLORS: &[&str] = &[
    "blue", "green", "yellow", "red", "orange", "purple", "cyan", "pink",
];

/// Fields that belong under the `metadata:` block.
pub const METADATA_FIELDS: &[&str] = &["capabilities", "license"];

const AGENT_REQUIRED: &[&str] = &["name", "description", "color", "tools"];
const COMMAND_REQUIRED: &[&str] = &["description"];
const SKILL_REQUIRED: &[&str] = &["name", "description"];

const AGENT_FIELDS: &[&str] = &[
    "name",
    "description",
    "color",
    "tools",
    "skills",
    "context",
    "hooks",
    "model",
    "metadata",
];
const COMMAND_FIELDS: &[&str] = &[
    "name",
    "description",
    "allowed-tools",
    "argument-hint",
    "skills",
    "metadata",
];
const SKILL_FIELDS: &[&str] = &[
    "name",
    "description",
    "allowed-tools",
    "context",
    "agent",
    "user-invocable",
    "metadata",
];

const MIN_SKILL_DESCRIPTION: usize = 20;
const MAX_PATH_WARNINGS: usize = 3;

static RE_AGENT_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"plugins/[^/]+/agents/[^/]+\.md$").unwrap());
static RE_COMMAND_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"plugins/[^/]+/commands/[^/]+\.md$").unwrap());
static RE_SKILL_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"plugins/[^/]+/skills/([^/]+)/SKILL\.md$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
/// Declared role of a document, each with its own field schema.
pub enum Category {
    Agent,
    Command,
    Skill,
}

impl Category {
    /// Determine the category from a file path, if it is validatable.
    pub fn from_path(path: &str) -> Option<Self> {
        let normalized = path.replace('\\', "/");
        if RE_AGENT_PATH.is_match(&normalized) {
            Some(Category::Agent)
        } else if RE_COMMAND_PATH.is_match(&normalized) {
            Some(Category::Command)
        } else if RE_SKILL_PATH.is_match(&normalized) {
            Some(Category::Skill)
        } else {
            None
        }
    }

    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            Category::Agent => AGENT_REQUIRED,
            Category::Command => COMMAND_REQUIRED,
            Category::Skill => SKILL_REQUIRED,
        }
    }

    pub fn known_fields(self) -> &'static [&'static str] {
        match self {
            Category::Agent => AGENT_FIELDS,
            Category::Command => COMMAND_FIELDS,
            Category::Skill => SKILL_FIELDS,
        }
    }

    /// The tool field this category must use.
    pub fn tool_field(self) -> &'static str {
        match self {
            Category::Agent => "tools",
            Category::Command | Category::Skill => "allowed-tools",
        }
    }

    /// The tool field this category must not use in place of `tool_field`.
    pub fn prohibited_tool_field(self) -> &'static str {
        match self {
            Category::Agent => "allowed-tools",
            Category::Command | Category::Skill => "tools",
        }
    }

    fn plural(self) -> &'static str {
        match self {
            Category::Agent => "Agents",
            Category::Command => "Commands",
            Category::Skill => "Skills",
        }
    }

    /// Apply this category's rule set to parsed frontmatter and body.
    pub fn validate(self, fm: &Mapping, file: &str, body: &str) -> Findings {
        let mut ctx = RuleContext {
            fm,
            file,
            out: Findings::default(),
        };
        ctx.check_tool_field(self);
        ctx.check_required(self);
        match self {
            Category::Agent => ctx.agent_rules(body),
            Category::Command => ctx.command_rules(body),
            Category::Skill => ctx.skill_rules(body),
        }
        ctx.check_unknown_fields(self);
        ctx.out
    }
}

struct RuleContext<'a> {
    fm: &'a Mapping,
    file: &'a str,
    out: Findings,
}

impl<'a> RuleContext<'a> {
    fn error(&mut self, field: Option<&str>, message: String) {
        self.out
            .errors
            .push(ValidationIssue::error(self.file, 1, message, field));
    }

    fn warn(&mut self, line: usize, field: Option<&str>, message: String) {
        self.out
            .warnings
            .push(ValidationIssue::warning(self.file, line, message, field));
    }

    fn has(&self, key: &str) -> bool {
        self.fm.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.fm.get(key)
    }

    fn check_tool_field(&mut self, cat: Category) {
        let wrong = cat.prohibited_tool_field();
        let right = cat.tool_field();
        if self.has(wrong) && !self.has(right) {
            self.error(
                Some(wrong),
                format!("{} must use '{}', not '{}'", cat.plural(), right, wrong),
            );
        }
    }

    fn check_required(&mut self, cat: Category) {
        for field in cat.required_fields() {
            if !self.has(field) {
                self.error(Some(*field), format!("Missing required field '{}'", field));
            }
        }
    }

    fn check_name_format(&mut self) {
        if let Some(name) = self.get("name") {
            if !checks::is_lowercase_hyphenated(name) {
                let got = display_value(name);
                self.error(
                    Some("name"),
                    format!("Field 'name' must be lowercase-hyphenated (got: {})", got),
                );
            }
        }
    }

    fn agent_rules(&mut self, body: &str) {
        if !self.has("skills") {
            self.warn(
                1,
                Some("skills"),
                "Missing recommended field 'skills' - agents should have skills for discoverability"
                    .to_string(),
            );
        }
        let has_capabilities = self
            .get("metadata")
            .and_then(Value::as_mapping)
            .is_some_and(|m| m.contains_key("capabilities"));
        if !has_capabilities {
            self.warn(
                1,
                Some("metadata.capabilities"),
                "Missing 'metadata.capabilities' - agents should have capabilities for discoverability"
                    .to_string(),
            );
        }

        self.check_name_format();

        if let Some(color) = self.get("color") {
            let valid = color.as_str().is_some_and(|c| VALID_COLORS.contains(&c));
            if !valid {
                let mut sorted = VALID_COLORS.to_vec();
                sorted.sort_unstable();
                let got = display_value(color);
                self.error(
                    Some("color"),
                    format!("Invalid color '{}'. Valid: {}", got, sorted.join(", ")),
                );
            }
        }

        let agent_name = self.get("name").and_then(Value::as_str).unwrap_or("");
        if let Some(tools) = self.get("tools").and_then(Value::as_str) {
            if let Some(hint) = checks::restricted_integration(tools, agent_name) {
                self.warn(
                    1,
                    Some("tools"),
                    format!("Non-wrapper agent has MCP tools: {}", hint),
                );
            }
        }

        for line in checks::hardcoded_path_lines(body)
            .into_iter()
            .take(MAX_PATH_WARNINGS)
        {
            self.warn(
                line,
                None,
                "Use ${CLAUDE_PLUGIN_ROOT} instead of absolute paths".to_string(),
            );
        }
    }

    fn command_rules(&mut self, body: &str) {
        if !self.has("tools") && !self.has("allowed-tools") {
            self.warn(
                1,
                Some("tools"),
                "Missing 'tools' field - commands typically need tools to execute".to_string(),
            );
        }
        if !body.contains(checks::ARGUMENTS_PLACEHOLDER) {
            self.warn(
                1,
                None,
                format!(
                    "Command missing {} placeholder - commands should include user input",
                    checks::ARGUMENTS_PLACEHOLDER
                ),
            );
        }
        if checks::has_table_routing(body) {
            self.warn(
                1,
                None,
                "Table-based routing detected - use natural language bullet points instead"
                    .to_string(),
            );
        }
    }

    fn skill_rules(&mut self, body: &str) {
        self.check_name_format();

        if let Some(name) = self.get("name") {
            let normalized = self.file.replace('\\', "/");
            if let Some(caps) = RE_SKILL_PATH.captures(&normalized) {
                let dir = &caps[1];
                if name.as_str() != Some(dir) {
                    let got = display_value(name);
                    self.error(
                        Some("name"),
                        format!("Skill name '{}' must match directory name '{}'", got, dir),
                    );
                }
            }
        }

        if let Some(Value::String(desc)) = self.get("description") {
            let len = desc.chars().count();
            if len > 0 && len < MIN_SKILL_DESCRIPTION {
                self.warn(
                    1,
                    Some("description"),
                    "Description too short - should explain WHAT the skill provides AND WHEN to use it"
                        .to_string(),
                );
            }
        }

        if body.contains(checks::ARGUMENTS_PLACEHOLDER) {
            self.error(
                None,
                format!(
                    "Skills cannot use {} - they receive no user input. Use commands or agents instead.",
                    checks::ARGUMENTS_PLACEHOLDER
                ),
            );
        }
    }

    fn check_unknown_fields(&mut self, cat: Category) {
        let known = cat.known_fields();
        let fm = self.fm;
        for key in fm.keys() {
            let field = key_label(key);
            if METADATA_FIELDS.contains(&field.as_str()) {
                self.warn(
                    1,
                    Some(field.as_str()),
                    format!("Field '{}' should be under 'metadata:' block", field),
                );
            } else if !known.contains(&field.as_str()) {
                self.warn(
                    1,
                    Some(field.as_str()),
                    format!("Non-standard field '{}' - wrap in 'metadata:' block", field),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontmatter::extract;

    const AGENT_PATH: &str = "plugins/p/agents/a.md";
    const COMMAND_PATH: &str = "plugins/p/commands/c.md";
    const SKILL_PATH: &str = "plugins/p/skills/test-skill/SKILL.md";

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn document(fields: &[(&str, &str)], body: &str) -> String {
        let mut lines = vec!["---".to_string()];
        for (k, v) in fields {
            lines.push(format!("{}: {}", k, v));
        }
        lines.push("---".to_string());
        lines.push(String::new());
        lines.push(body.to_string());
        lines.join("\n")
    }

    fn agent_doc(extra: &[(&str, &str)]) -> String {
        let mut fields = vec![
            ("name", "test-agent"),
            ("description", "A test agent"),
            ("color", "blue"),
            ("tools", "Read, Write, Edit"),
        ];
        for (k, v) in extra {
            if let Some(slot) = fields.iter_mut().find(|(f, _)| f == k) {
                slot.1 = v;
            } else {
                fields.push((k, v));
            }
        }
        document(&fields, "# Agent body")
    }

    fn run(cat: Category, content: &str, path: &str) -> Findings {
        let ex = extract(content);
        cat.validate(&ex.frontmatter.unwrap(), path, &ex.body)
    }

    fn fields(issues: &[ValidationIssue]) -> Vec<&str> {
        issues.iter().filter_map(|i| i.field.as_deref()).collect()
    }

    #[test]
    fn test_category_from_path() {
        assert_eq!(Category::from_path("plugins/foo/agents/bar.md"), Some(Category::Agent));
        assert_eq!(Category::from_path("plugins/foo/commands/bar.md"), Some(Category::Command));
        assert_eq!(Category::from_path("plugins/foo/skills/bar/SKILL.md"), Some(Category::Skill));
        assert_eq!(
            Category::from_path(r"C:\repo\plugins\foo\agents\bar.md"),
            Some(Category::Agent)
        );
        assert_eq!(Category::from_path("plugins/foo/other/bar.md"), None);
        assert_eq!(Category::from_path("plugins/foo/skills/bar/references/x.md"), None);
    }

    #[test]
    fn test_valid_agent() {
        let doc = agent_doc(&[("skills", "test-skill"), ("metadata", "capabilities: [testing]")]);
        let out = run(Category::Agent, &doc, AGENT_PATH);
        assert!(out.errors.is_empty());
    }

    #[test]
    fn test_fully_valid_agent_has_no_warnings() {
        let fm = mapping(
            "name: test-agent\ndescription: A test agent\ncolor: green\ntools: Read\nskills: [a]\nmetadata:\n  capabilities: [x]\n",
        );
        let out = Category::Agent.validate(&fm, AGENT_PATH, "# body");
        assert!(out.errors.is_empty());
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_agent_missing_required_fields() {
        let out = Category::Agent.validate(&Mapping::new(), AGENT_PATH, "");
        assert_eq!(fields(&out.errors), vec!["name", "description", "color", "tools"]);
    }

    #[test]
    fn test_each_missing_required_field_yields_one_error() {
        for cat in [Category::Agent, Category::Command, Category::Skill] {
            for omitted in cat.required_fields() {
                let mut fm = mapping(
                    "name: test-skill\ndescription: A test skill that does useful things\ncolor: blue\n",
                );
                fm.insert(
                    Value::String(cat.tool_field().into()),
                    Value::String("Read".into()),
                );
                fm.remove(*omitted);
                let out = cat.validate(&fm, SKILL_PATH, "$ARGUMENTS");
                let hits: Vec<_> = out
                    .errors
                    .iter()
                    .filter(|e| e.field.as_deref() == Some(*omitted))
                    .collect();
                if cat == Category::Skill {
                    // skill bodies must not use the placeholder
                    assert_eq!(out.errors.len(), 2, "{:?} {}", cat, omitted);
                } else {
                    assert_eq!(out.errors.len(), 1, "{:?} {}", cat, omitted);
                }
                assert_eq!(hits.len(), 1);
            }
        }
    }

    #[test]
    fn test_agent_invalid_color() {
        let out = run(Category::Agent, &agent_doc(&[("color", "rainbow")]), AGENT_PATH);
        let err = out.errors.iter().find(|e| e.field.as_deref() == Some("color")).unwrap();
        assert!(err.message.contains("rainbow"));
        assert!(err.message.contains("blue, cyan, green"));
    }

    #[test]
    fn test_agent_invalid_name_format() {
        let out = run(Category::Agent, &agent_doc(&[("name", "My Agent")]), AGENT_PATH);
        let err = out.errors.iter().find(|e| e.field.as_deref() == Some("name")).unwrap();
        assert!(err.message.contains("My Agent"));
    }

    #[test]
    fn test_agent_allowed_tools_instead_of_tools() {
        let fm = mapping("name: test-agent\ndescription: Test\ncolor: blue\nallowed-tools: Read, Write\n");
        let out = Category::Agent.validate(&fm, AGENT_PATH, "");
        assert!(fields(&out.errors).contains(&"allowed-tools"));
        assert!(out.errors.iter().any(|e| e.message.contains("must use 'tools'")));
    }

    #[test]
    fn test_agent_recommended_field_warnings() {
        let out = run(Category::Agent, &agent_doc(&[]), AGENT_PATH);
        let warned = fields(&out.warnings);
        assert!(warned.contains(&"skills"));
        assert!(warned.contains(&"metadata.capabilities"));
    }

    #[test]
    fn test_agent_non_standard_and_metadata_fields() {
        let fm = mapping(
            "name: test-agent\ndescription: Test\ncolor: blue\ntools: Read\nfoobar: baz\ncapabilities: [testing]\n",
        );
        let out = Category::Agent.validate(&fm, AGENT_PATH, "");
        let foobar = out.warnings.iter().find(|w| w.field.as_deref() == Some("foobar")).unwrap();
        assert!(foobar.message.starts_with("Non-standard field"));
        let caps = out
            .warnings
            .iter()
            .find(|w| w.field.as_deref() == Some("capabilities"))
            .unwrap();
        assert!(caps.message.contains("should be under 'metadata:'"));
    }

    #[test]
    fn test_unknown_fields_follow_document_order() {
        let fm = mapping("zzz: 1\nname: a\naaa: 2\nlicense: MIT\n");
        let out = Category::Command.validate(&fm, COMMAND_PATH, "$ARGUMENTS");
        let tail: Vec<_> = out
            .warnings
            .iter()
            .filter_map(|w| w.field.as_deref())
            .filter(|f| ["zzz", "aaa", "license"].contains(f))
            .collect();
        assert_eq!(tail, vec!["zzz", "aaa", "license"]);
    }

    #[test]
    fn test_agent_restricted_integration_warning() {
        let doc = agent_doc(&[("tools", "Read, mcp__linear__get_issues")]);
        let out = run(Category::Agent, &doc, AGENT_PATH);
        assert!(out.warnings.iter().any(|w| w.message.contains("Non-wrapper agent")));

        let doc = agent_doc(&[("name", "focus-linear"), ("tools", "mcp__linear__get_issues")]);
        let out = run(Category::Agent, &doc, AGENT_PATH);
        assert!(!out.warnings.iter().any(|w| w.message.contains("Non-wrapper agent")));
    }

    #[test]
    fn test_agent_hardcoded_paths_capped_at_three() {
        let fm = mapping("name: test-agent\ndescription: T\ncolor: blue\ntools: Read\n");
        let body = "/Users/a\n# /Users/b\n/home/c\n/home/d\n/home/e";
        let out = Category::Agent.validate(&fm, AGENT_PATH, body);
        let lines: Vec<usize> = out
            .warnings
            .iter()
            .filter(|w| w.message.contains("CLAUDE_PLUGIN_ROOT"))
            .map(|w| w.line)
            .collect();
        assert_eq!(lines, vec![1, 3, 4]);
    }

    #[test]
    fn test_valid_command() {
        let doc = document(
            &[("description", "A test command"), ("allowed-tools", "Read, Write")],
            "Run with $ARGUMENTS",
        );
        let out = run(Category::Command, &doc, COMMAND_PATH);
        assert!(out.errors.is_empty());
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_command_missing_description() {
        let fm = mapping("allowed-tools: Read\n");
        let out = Category::Command.validate(&fm, COMMAND_PATH, "$ARGUMENTS here");
        assert_eq!(fields(&out.errors), vec!["description"]);
    }

    #[test]
    fn test_command_tools_instead_of_allowed_tools() {
        let fm = mapping("description: Test command\ntools: Read, Write\n");
        let out = Category::Command.validate(&fm, COMMAND_PATH, "$ARGUMENTS");
        assert_eq!(fields(&out.errors), vec!["tools"]);
        // the wrong tool field is reported as non-standard too
        assert!(fields(&out.warnings).contains(&"tools"));
    }

    #[test]
    fn test_command_without_any_tool_field() {
        let fm = mapping("description: Test command\n");
        let out = Category::Command.validate(&fm, COMMAND_PATH, "$ARGUMENTS");
        assert!(out.errors.is_empty());
        assert!(out
            .warnings
            .iter()
            .any(|w| w.message.starts_with("Missing 'tools' field")));
    }

    #[test]
    fn test_command_missing_arguments_warning() {
        let doc = document(
            &[("description", "Test command"), ("allowed-tools", "Read")],
            "No args placeholder",
        );
        let out = run(Category::Command, &doc, COMMAND_PATH);
        assert!(out.warnings.iter().any(|w| w.message.contains("$ARGUMENTS")));
    }

    #[test]
    fn test_command_table_routing_warning() {
        let fm = mapping("description: Test\nallowed-tools: Read\n");
        let body = "\n| Keyword | Action |\n| review | code-reviewer |\n$ARGUMENTS";
        let out = Category::Command.validate(&fm, COMMAND_PATH, body);
        assert!(out
            .warnings
            .iter()
            .any(|w| w.message.to_lowercase().contains("routing")));
    }

    #[test]
    fn test_valid_skill() {
        let doc = document(
            &[
                ("name", "test-skill"),
                ("description", "A test skill that does useful things for testing"),
            ],
            "# Skill body",
        );
        let out = run(Category::Skill, &doc, SKILL_PATH);
        assert!(out.errors.is_empty());
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_skill_missing_required_fields() {
        let out = Category::Skill.validate(&Mapping::new(), SKILL_PATH, "");
        assert_eq!(fields(&out.errors), vec!["name", "description"]);
    }

    #[test]
    fn test_skill_invalid_name() {
        let fm = mapping("name: My Skill\ndescription: A test skill that does useful things\n");
        let out = Category::Skill.validate(&fm, "plugins/p/skills/my-skill/SKILL.md", "");
        assert!(fields(&out.errors).contains(&"name"));
    }

    #[test]
    fn test_skill_name_mismatch() {
        let fm = mapping("name: other-skill\ndescription: A test skill that does useful things\n");
        let out = Category::Skill.validate(&fm, SKILL_PATH, "");
        assert_eq!(out.errors.len(), 1);
        assert!(out.errors[0].message.to_lowercase().contains("match"));
    }

    #[test]
    fn test_skill_tools_instead_of_allowed_tools() {
        let fm = mapping("name: test-skill\ndescription: A test skill that does useful things\ntools: Read\n");
        let out = Category::Skill.validate(&fm, SKILL_PATH, "");
        assert!(out.errors.iter().any(|e| e.message == "Skills must use 'allowed-tools', not 'tools'"));
    }

    #[test]
    fn test_skill_arguments_in_body() {
        let doc = "---\nname: test-skill\ndescription: A test skill that does useful things\n---\n\nUse $ARGUMENTS here";
        let out = run(Category::Skill, doc, SKILL_PATH);
        assert!(out.errors.iter().any(|e| e.message.contains("$ARGUMENTS")));
        assert!(!out.warnings.iter().any(|w| w.message.contains("$ARGUMENTS")));
    }

    #[test]
    fn test_skill_short_description() {
        let fm = mapping("name: test-skill\ndescription: Short\n");
        let out = Category::Skill.validate(&fm, SKILL_PATH, "");
        assert!(out
            .warnings
            .iter()
            .any(|w| w.message.to_lowercase().contains("short")));
    }

    #[test]
    fn test_fallback_sentinels_against_rules() {
        // `skills:` followed by a block list breaks nothing in YAML, so force
        // the fallback with an unquoted colon in the description.
        let doc = "---\nname: test-agent\ndescription: Context: colons\ncolor: blue\ntools: Read\nskills:\n  - one\nmetadata:\n  capabilities: [x]\n---\nbody";
        let out = run(Category::Agent, doc, AGENT_PATH);
        assert!(out.errors.is_empty());
        // `skills` recorded as the `true` sentinel still counts as present
        assert!(!fields(&out.warnings).contains(&"skills"));
        // nested metadata is invisible to the flat parser
        assert!(fields(&out.warnings).contains(&"metadata.capabilities"));
    }

    #[test]
    fn test_fallback_list_tools_still_checked() {
        let doc = "---\nname: my-agent\ndescription: Context: colons\ncolor: blue\ntools: [mcp__linear__list]\n---\n";
        let out = run(Category::Agent, doc, AGENT_PATH);
        // the raw marker text is still a string, so the pattern applies
        assert!(out.warnings.iter().any(|w| w.message.contains("Linear MCP")));
    }
}
