//! Manifest schema and integrity report types.

use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
/// Top-level marketplace manifest.
pub struct Manifest {
    #[serde(default)]
    pub plugins: Vec<PluginEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
/// One plugin entry with its declared file and directory references.
///
/// Fields are read leniently so one mistyped entry does not hide the rest
/// of the manifest: scalars are taken as their text, `null` means absent,
/// and non-string list items are dropped.
pub struct PluginEntry {
    #[serde(default = "unknown_plugin", deserialize_with = "lenient::name")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub source: String,
    #[serde(default, deserialize_with = "lenient::list")]
    pub agents: Vec<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub commands: Vec<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub hooks: Option<String>,
}

fn unknown_plugin() -> String {
    "unknown".to_string()
}

mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use tracing::warn;

    fn as_text(value: Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => {
                warn!(value = %other, "non-string manifest value");
                Some(other.to_string())
            }
        }
    }

    pub fn name<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(as_text(Value::deserialize(d)?).unwrap_or_else(super::unknown_plugin))
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(as_text(Value::deserialize(d)?).unwrap_or_default())
    }

    pub fn optional_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(as_text(Value::deserialize(d)?))
    }

    pub fn list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    other => {
                        warn!(value = %other, "dropping non-string manifest reference");
                        None
                    }
                })
                .collect(),
            Value::String(s) => vec![s],
            Value::Null => Vec::new(),
            other => {
                warn!(value = %other, "expected a list of references");
                Vec::new()
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
/// Kind of reference an integrity error is about.
pub enum FileType {
    Source,
    Agent,
    Command,
    Skill,
    Hook,
}

impl FileType {
    pub fn as_str(self) -> &'static str {
        match self {
            FileType::Source => "source",
            FileType::Agent => "agent",
            FileType::Command => "command",
            FileType::Skill => "skill",
            FileType::Hook => "hook",
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Mismatch between a declared reference and the filesystem.
pub struct IntegrityError {
    pub plugin_name: String,
    pub file_type: FileType,
    pub declared_path: String,
    pub expected_path: String,
    /// Error code (`missing_file`, `missing_skill_md`, ...) or the resolver
    /// message for rejected references.
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Integrity results for one plugin entry.
pub struct PluginReport {
    pub plugin_name: String,
    pub plugin_source: String,
    pub errors: Vec<IntegrityError>,
    pub agents_checked: usize,
    pub commands_checked: usize,
    pub skills_checked: usize,
    pub hooks_checked: usize,
}

impl PluginReport {
    pub fn new(name: &str, source: &str) -> Self {
        Self {
            plugin_name: name.to_string(),
            plugin_source: source.to_string(),
            ..Default::default()
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn total_checked(&self) -> usize {
        self.agents_checked + self.commands_checked + self.skills_checked + self.hooks_checked
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Integrity results for a whole manifest.
pub struct ManifestReport {
    pub manifest_path: String,
    pub plugin_results: Vec<PluginReport>,
    pub manifest_errors: Vec<String>,
}

impl ManifestReport {
    pub fn new(manifest_path: impl Into<String>) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            ..Default::default()
        }
    }

    pub fn is_valid(&self) -> bool {
        self.manifest_errors.is_empty() && self.plugin_results.iter().all(PluginReport::is_valid)
    }

    pub fn total_errors(&self) -> usize {
        self.manifest_errors.len()
            + self
                .plugin_results
                .iter()
                .map(|r| r.errors.len())
                .sum::<usize>()
    }

    pub fn total_checked(&self) -> usize {
        self.plugin_results.iter().map(PluginReport::total_checked).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_entry_defaults() {
        let entry: PluginEntry = serde_json::from_str(r#"{"source": "./plugins/p"}"#).unwrap();
        assert_eq!(entry.name, "unknown");
        assert!(entry.agents.is_empty());
        assert!(entry.hooks.is_none());
    }

    #[test]
    fn test_mistyped_entry_fields_are_tolerated() {
        let manifest: Manifest = serde_json::from_str(
            r#"{"plugins": [
                {"name": 42, "source": "./plugins/a", "agents": null, "skills": ["s", 7]},
                {"name": null, "source": "./plugins/b", "commands": "commands/run.md", "hooks": null}
            ]}"#,
        )
        .unwrap();
        let [a, b] = &manifest.plugins[..] else {
            panic!("expected two entries");
        };
        assert_eq!(a.name, "42");
        assert!(a.agents.is_empty());
        assert_eq!(a.skills, vec!["s"]);
        assert_eq!(b.name, "unknown");
        assert_eq!(b.commands, vec!["commands/run.md"]);
        assert!(b.hooks.is_none());
    }

    #[test]
    fn test_report_validity() {
        let mut report = ManifestReport::new("test.json");
        report
            .plugin_results
            .push(PluginReport::new("p", "./plugins/p"));
        assert!(report.is_valid());
        assert_eq!(report.total_errors(), 0);

        report.manifest_errors.push("Something is wrong".into());
        assert!(!report.is_valid());
        assert_eq!(report.total_errors(), 1);
    }
}
