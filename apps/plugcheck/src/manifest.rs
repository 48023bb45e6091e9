//! Manifest-to-filesystem integrity checks.
//!
//! Each plugin entry's `source` is resolved against the base directory first.
//! A rejected or missing source short-circuits the entry with a single error.
//! Otherwise every declared agent, command, skill, and hook reference is
//! resolved against the plugin directory and checked on disk.
//!
//! Manifest-level failures (missing file, unreadable, malformed, no plugins)
//! are reported in `manifest_errors` and stop before any plugin is checked.

use crate::models::manifest::{
    FileType, IntegrityError, Manifest, ManifestReport, PluginEntry, PluginReport,
};
use crate::paths::{self, PathError};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Default manifest location relative to the repository root.
pub const DEFAULT_MANIFEST: &str = ".claude-plugin/marketplace.json";

/// Marker file every skill directory must contain.
pub const SKILL_MARKER: &str = "SKILL.md";

/// `manifest_path` reported when the root manifest does not exist.
pub const NOT_FOUND: &str = "not found";

const INVALID_PATH: &str = "(invalid path)";

#[derive(Debug, Error)]
/// Failure to load a manifest document.
pub enum ManifestLoadError {
    #[error("Manifest not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Error reading manifest: {0}")]
    Read(#[from] std::io::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("No plugins found in manifest")]
    NoPlugins,
}

/// Read and parse a manifest. YAML is used for `.yaml`/`.yml` files, JSON
/// otherwise. A manifest without plugin entries is an error.
pub fn load_manifest(path: &Path) -> Result<Manifest, ManifestLoadError> {
    if !path.exists() {
        return Err(ManifestLoadError::NotFound(path.to_path_buf()));
    }
    let data = fs::read_to_string(path)?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let manifest: Manifest = if is_yaml {
        serde_yaml::from_str(&data)?
    } else {
        serde_json::from_str(&data)?
    };
    if manifest.plugins.is_empty() {
        return Err(ManifestLoadError::NoPlugins);
    }
    Ok(manifest)
}

/// Validate every path declared in the manifest at `manifest_path`.
///
/// `base_dir` defaults to the manifest's parent directory.
pub fn validate_manifest_paths(manifest_path: &Path, base_dir: Option<&Path>) -> ManifestReport {
    let mut report = ManifestReport::new(manifest_path.to_string_lossy());
    let manifest = match load_manifest(manifest_path) {
        Ok(m) => m,
        Err(e) => {
            warn!(manifest = %manifest_path.display(), error = %e, "manifest not usable");
            report.manifest_errors.push(e.to_string());
            return report;
        }
    };
    let base = match base_dir {
        Some(b) => b.to_path_buf(),
        None => manifest_dir(manifest_path),
    };
    debug!(
        plugins = manifest.plugins.len(),
        base = %base.display(),
        "validating manifest entries"
    );
    report.plugin_results = manifest
        .plugins
        .par_iter()
        .map(|p| validate_plugin(p, &base))
        .collect();
    report
}

/// Directory holding `manifest_path`; a bare file name lives in `.`.
pub fn manifest_dir(manifest_path: &Path) -> PathBuf {
    manifest_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Validate the repository's root manifest, resolving sources against the
/// repository root. A missing manifest yields `manifest_path = "not found"`.
pub fn validate_root_manifest(repo_root: &Path, manifest_rel: &str) -> ManifestReport {
    let manifest_path = repo_root.join(manifest_rel);
    if !manifest_path.exists() {
        let mut report = ManifestReport::new(NOT_FOUND);
        report.manifest_errors.push(format!(
            "Marketplace manifest not found at {}",
            manifest_path.display()
        ));
        return report;
    }
    validate_manifest_paths(&manifest_path, Some(repo_root))
}

/// Validate a single plugin entry's declared paths.
pub fn validate_plugin(plugin: &PluginEntry, base_dir: &Path) -> PluginReport {
    let name = plugin.name.as_str();
    let source = plugin.source.as_str();
    let mut report = PluginReport::new(name, source);

    let plugin_dir = match paths::resolve(source, base_dir) {
        Ok(dir) => dir,
        Err(e) => {
            report.errors.push(IntegrityError {
                plugin_name: name.to_string(),
                file_type: FileType::Source,
                declared_path: source.to_string(),
                expected_path: e.placeholder().to_string(),
                error: e.code().to_string(),
            });
            return report;
        }
    };
    if !plugin_dir.exists() {
        report.errors.push(IntegrityError {
            plugin_name: name.to_string(),
            file_type: FileType::Source,
            declared_path: source.to_string(),
            expected_path: plugin_dir.to_string_lossy().to_string(),
            error: "missing_directory".into(),
        });
        return report;
    }

    let mut check = EntryChecker {
        name,
        dir: &plugin_dir,
        errors: &mut report.errors,
    };
    for agent in &plugin.agents {
        check.file(FileType::Agent, agent);
    }
    for command in &plugin.commands {
        check.file(FileType::Command, command);
    }
    for skill in &plugin.skills {
        check.skill(skill);
    }
    let hooks = plugin.hooks.as_deref().filter(|h| !h.is_empty());
    if let Some(h) = hooks {
        check.file(FileType::Hook, h);
    }

    report.agents_checked = plugin.agents.len();
    report.commands_checked = plugin.commands.len();
    report.skills_checked = plugin.skills.len();
    report.hooks_checked = usize::from(hooks.is_some());
    report
}

struct EntryChecker<'a> {
    name: &'a str,
    dir: &'a Path,
    errors: &'a mut Vec<IntegrityError>,
}

impl EntryChecker<'_> {
    fn push(&mut self, file_type: FileType, declared: &str, expected: String, error: String) {
        self.errors.push(IntegrityError {
            plugin_name: self.name.to_string(),
            file_type,
            declared_path: declared.to_string(),
            expected_path: expected,
            error,
        });
    }

    fn rejected(&mut self, file_type: FileType, declared: &str, err: PathError) {
        self.push(file_type, declared, INVALID_PATH.into(), err.to_string());
    }

    fn file(&mut self, file_type: FileType, declared: &str) {
        match paths::resolve(declared, self.dir) {
            Err(e) => self.rejected(file_type, declared, e),
            Ok(full) if !full.exists() => self.push(
                file_type,
                declared,
                full.to_string_lossy().to_string(),
                "missing_file".into(),
            ),
            Ok(_) => {}
        }
    }

    fn skill(&mut self, declared: &str) {
        let dir = match paths::resolve(declared, self.dir) {
            Ok(d) => d,
            Err(e) => return self.rejected(FileType::Skill, declared, e),
        };
        let shown = dir.to_string_lossy().to_string();
        if !dir.exists() {
            self.push(FileType::Skill, declared, shown, "missing_skill_dir".into());
        } else if !dir.is_dir() {
            self.push(FileType::Skill, declared, shown, "not_a_directory".into());
        } else {
            let marker = dir.join(SKILL_MARKER);
            if !marker.exists() {
                self.push(
                    FileType::Skill,
                    declared,
                    marker.to_string_lossy().to_string(),
                    "missing_skill_md".into(),
                );
            }
        }
    }
}
