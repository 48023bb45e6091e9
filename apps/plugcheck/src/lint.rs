//! Frontmatter lint runner.
//!
//! Discovers plugin documents (or takes the files changed in git), validates
//! each one against its category rules, and aggregates a
//! `FrontmatterReport`. Files are validated in parallel; the report keeps the
//! input order.

use crate::frontmatter;
use crate::models::{Findings, FrontmatterReport, ValidationIssue};
use crate::rules::Category;
use glob::glob;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, trace, warn};

/// Directory holding plugins, relative to the repository root.
pub const PLUGINS_DIR: &str = "plugins";

/// Per-plugin document locations, relative to each plugin directory.
const DOCUMENT_PATTERNS: &[&str] = &["agents/*.md", "commands/*.md", "skills/*/SKILL.md"];

/// Find all validatable documents under `plugins_dir`, plugin by plugin.
pub fn find_plugin_files(plugins_dir: &Path) -> Vec<PathBuf> {
    let mut plugins: Vec<PathBuf> = match fs::read_dir(plugins_dir) {
        Ok(entries) => entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect(),
        Err(e) => {
            warn!(dir = %plugins_dir.display(), error = %e, "cannot list plugins");
            return Vec::new();
        }
    };
    plugins.sort();

    let mut files = Vec::new();
    for plugin in plugins {
        let escaped = glob::Pattern::escape(&plugin.to_string_lossy());
        for pat in DOCUMENT_PATTERNS {
            let pattern = format!("{}/{}", escaped, pat);
            let Ok(paths) = glob(&pattern) else {
                continue;
            };
            files.extend(paths.flatten().filter(|p| p.is_file()));
        }
    }
    debug!(count = files.len(), "discovered plugin documents");
    files
}

/// Markdown files under `plugins/` changed relative to `base_ref`.
///
/// Falls back to uncommitted changes against `HEAD` when the range diff
/// fails. Only files that still exist are returned.
pub fn changed_files(repo_root: &Path, base_ref: &str) -> Vec<PathBuf> {
    let range = format!("{}...HEAD", base_ref);
    let names = git_diff_names(repo_root, &range)
        .or_else(|| git_diff_names(repo_root, "HEAD"))
        .unwrap_or_default();
    let prefix = format!("{}/", PLUGINS_DIR);
    names
        .iter()
        .filter(|f| f.ends_with(".md") && f.starts_with(&prefix))
        .map(|f| repo_root.join(f))
        .filter(|p| p.exists())
        .collect()
}

fn git_diff_names(repo_root: &Path, rev: &str) -> Option<Vec<String>> {
    let out = Command::new("git")
        .args(["diff", "--name-only", "--diff-filter=ACMR", rev])
        .current_dir(repo_root)
        .output()
        .ok()?;
    if !out.status.success() {
        debug!(rev, "git diff failed");
        return None;
    }
    let text = String::from_utf8_lossy(&out.stdout);
    Some(
        text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// Validate one document's text. Paths that are not agent, command, or
/// skill documents produce no findings.
pub fn validate_document(file: &str, content: &str) -> Findings {
    let Some(category) = Category::from_path(file) else {
        trace!(file, "not a validatable document");
        return Findings::default();
    };
    let extracted = frontmatter::extract(content);
    match extracted.frontmatter {
        Some(fm) => category.validate(&fm, file, &extracted.body),
        None => Findings {
            errors: vec![ValidationIssue::error(
                file,
                1,
                "Missing or invalid YAML frontmatter",
                None,
            )],
            warnings: Vec::new(),
        },
    }
}

/// Read and validate a single file. Unreadable files yield one error.
pub fn validate_file(path: &Path) -> Findings {
    let file = path.to_string_lossy();
    if Category::from_path(&file).is_none() {
        return Findings::default();
    }
    match fs::read_to_string(path) {
        Ok(content) => validate_document(&file, &content),
        Err(e) => Findings {
            errors: vec![ValidationIssue::error(
                &file,
                1,
                format!("Cannot read file: {}", e),
                None,
            )],
            warnings: Vec::new(),
        },
    }
}

/// Validate all `files` and aggregate the findings in input order.
pub fn run_frontmatter(files: &[PathBuf]) -> FrontmatterReport {
    let per_file: Vec<Findings> = files
        .par_iter()
        .map(|path| {
            let found = validate_file(path);
            trace!(
                file = %path.display(),
                errors = found.errors.len(),
                warnings = found.warnings.len(),
                "validated"
            );
            found
        })
        .collect();

    let mut all = Findings::default();
    for f in per_file {
        all.extend(f);
    }
    FrontmatterReport {
        errors: all.errors,
        warnings: all.warnings,
        files_checked: files.len(),
    }
}
