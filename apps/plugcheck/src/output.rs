//! Output rendering for frontmatter and manifest reports.
//!
//! Supports `human` (default) and `json` outputs. Text and JSON are composed
//! by pure functions so they can be tested without capturing stdout.

use crate::models::manifest::{ManifestReport, PluginReport};
use crate::models::{FrontmatterReport, ValidationIssue};
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;
use std::collections::BTreeMap;

const RULE_WIDE: usize = 50;
const RULE_NARROW: usize = 30;

fn print_json(value: &JsonVal) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("{} {}", crate::utils::error_prefix(), e),
    }
}

/// Print a frontmatter report in the requested format.
pub fn print_frontmatter(res: &FrontmatterReport, output: &str, show_warnings: bool) {
    match output {
        "json" => print_json(&compose_frontmatter_json(res)),
        _ => println!(
            "{}",
            format_frontmatter_text(res, show_warnings, crate::utils::use_colors(output))
        ),
    }
}

/// Report an empty file set: an empty valid document in JSON mode, a short
/// notice otherwise.
pub fn print_nothing_to_validate(output: &str) {
    match output {
        "json" => print_json(&compose_frontmatter_json(&FrontmatterReport::default())),
        _ => println!("No files to validate"),
    }
}

/// Compose the document printed when a command cannot run at all.
pub fn compose_error_json(message: &str) -> JsonVal {
    json!({
        "error": message,
        "is_valid": false,
    })
}

/// Print a fatal error to stdout as JSON, or to stderr with a prefix.
pub fn print_error(message: &str, output: &str) {
    match output {
        "json" => print_json(&compose_error_json(message)),
        _ => eprintln!("{} {}", crate::utils::error_prefix(), message),
    }
}

/// Compose the frontmatter JSON document.
pub fn compose_frontmatter_json(res: &FrontmatterReport) -> JsonVal {
    json!({
        "is_valid": res.is_valid(),
        "files_checked": res.files_checked,
        "error_count": res.errors.len(),
        "warning_count": res.warnings.len(),
        "errors": res.errors,
        "warnings": res.warnings,
    })
}

/// Compose human-readable frontmatter output: a headline, then errors and
/// warnings grouped by file (sorted by path).
pub fn format_frontmatter_text(res: &FrontmatterReport, show_warnings: bool, color: bool) -> String {
    let mut lines: Vec<String> = Vec::new();
    let headline = if res.is_valid() && res.warnings.is_empty() {
        format!("✓ All {} files valid", res.files_checked)
    } else if res.is_valid() {
        format!(
            "✓ {} files valid with {} warning(s)",
            res.files_checked,
            res.warnings.len()
        )
    } else {
        format!(
            "✗ Found {} error(s) in {} files",
            res.errors.len(),
            res.files_checked
        )
    };
    lines.push(match (color, res.is_valid()) {
        (true, true) => headline.green().bold().to_string(),
        (true, false) => headline.red().bold().to_string(),
        (false, _) => headline,
    });

    if !res.errors.is_empty() {
        let title = if color {
            "ERRORS:".red().bold().to_string()
        } else {
            "ERRORS:".to_string()
        };
        push_grouped(&mut lines, &title, &res.errors, color);
    }
    if show_warnings && !res.warnings.is_empty() {
        let title = if color {
            "WARNINGS:".yellow().bold().to_string()
        } else {
            "WARNINGS:".to_string()
        };
        push_grouped(&mut lines, &title, &res.warnings, color);
    }
    lines.join("\n")
}

fn push_grouped(lines: &mut Vec<String>, title: &str, issues: &[ValidationIssue], color: bool) {
    lines.push(String::new());
    lines.push(title.to_string());
    let mut by_file: BTreeMap<&str, Vec<&ValidationIssue>> = BTreeMap::new();
    for is in issues {
        by_file.entry(is.file.as_str()).or_default().push(is);
    }
    for (file, file_issues) in by_file {
        let shown = crate::utils::rel_to_wd(std::path::Path::new(file));
        if color {
            lines.push(format!("  {}:", shown.bold()));
        } else {
            lines.push(format!("  {}:", shown));
        }
        for is in file_issues {
            let field_info = is
                .field
                .as_ref()
                .map(|f| format!(" [{}]", f))
                .unwrap_or_default();
            lines.push(format!("    Line {}{}: {}", is.line, field_info, is.message));
        }
        lines.push(String::new());
    }
}

/// Print a manifest report, followed by fix suggestions when requested.
pub fn print_manifest(res: &ManifestReport, output: &str, fix: bool) {
    match output {
        "json" => print_json(&compose_manifest_json(res)),
        _ => {
            let color = crate::utils::use_colors(output);
            println!("{}", format_manifest_text(res, color));
            if fix && !res.is_valid() {
                println!();
                println!("{}", format_fix_suggestions(res));
            }
        }
    }
}

fn compose_plugin_json(r: &PluginReport) -> JsonVal {
    json!({
        "plugin_name": r.plugin_name,
        "plugin_source": r.plugin_source,
        "is_valid": r.is_valid(),
        "errors": r.errors,
        "agents_checked": r.agents_checked,
        "commands_checked": r.commands_checked,
        "skills_checked": r.skills_checked,
        "hooks_checked": r.hooks_checked,
        "total_checked": r.total_checked(),
    })
}

/// Compose the manifest JSON document.
pub fn compose_manifest_json(res: &ManifestReport) -> JsonVal {
    let plugins: Vec<JsonVal> = res.plugin_results.iter().map(compose_plugin_json).collect();
    json!({
        "manifest_path": res.manifest_path,
        "is_valid": res.is_valid(),
        "total_errors": res.total_errors(),
        "total_checked": res.total_checked(),
        "manifest_errors": res.manifest_errors,
        "plugin_results": plugins,
    })
}

/// Compose human-readable manifest output.
pub fn format_manifest_text(res: &ManifestReport, color: bool) -> String {
    let mut lines: Vec<String> = Vec::new();
    let banner = "=".repeat(RULE_WIDE);
    lines.push(banner.clone());
    lines.push(if color {
        "MANIFEST VALIDATION".bold().to_string()
    } else {
        "MANIFEST VALIDATION".to_string()
    });
    lines.push(banner);
    lines.push(format!("Manifest: {}", res.manifest_path));
    lines.push(format!("Total items checked: {}", res.total_checked()));
    lines.push(String::new());

    if !res.manifest_errors.is_empty() {
        lines.push("Manifest Errors:".to_string());
        for e in &res.manifest_errors {
            lines.push(format!("  {} {}", fail_mark(color), e));
        }
        lines.push(String::new());
    }

    let (valid, invalid): (Vec<&PluginReport>, Vec<&PluginReport>) =
        res.plugin_results.iter().partition(|r| r.is_valid());

    if !invalid.is_empty() {
        lines.push("Plugins with Errors:".to_string());
        for pr in invalid {
            lines.push(format!(
                "  {} {} ({} errors)",
                fail_mark(color),
                pr.plugin_name,
                pr.errors.len()
            ));
            for ie in &pr.errors {
                lines.push(format!("    - {}: {}", ie.file_type, ie.declared_path));
                lines.push(format!("      Error: {}", ie.error));
                lines.push(format!("      Expected: {}", ie.expected_path));
            }
        }
        lines.push(String::new());
    }

    if !valid.is_empty() {
        lines.push("Valid Plugins:".to_string());
        for pr in valid {
            lines.push(format!(
                "  {} {} ({} items)",
                pass_mark(color),
                pr.plugin_name,
                pr.total_checked()
            ));
        }
        lines.push(String::new());
    }

    lines.push("-".repeat(RULE_WIDE));
    if res.is_valid() {
        lines.push(format!(
            "{} All manifest paths validated successfully",
            pass_mark(color)
        ));
    } else {
        lines.push(format!(
            "{} Found {} errors",
            fail_mark(color),
            res.total_errors()
        ));
    }
    lines.push(String::new());
    lines.join("\n")
}

fn pass_mark(color: bool) -> String {
    if color {
        "+".green().bold().to_string()
    } else {
        "+".to_string()
    }
}

fn fail_mark(color: bool) -> String {
    if color {
        "x".red().bold().to_string()
    } else {
        "x".to_string()
    }
}

/// Human-readable suggestions for fixing integrity errors. Nothing is
/// executed; commands are printed for review.
pub fn format_fix_suggestions(res: &ManifestReport) -> String {
    if res.is_valid() {
        return "No fixes needed - all paths are valid.".to_string();
    }
    let mut lines: Vec<String> = vec![
        "=".repeat(RULE_WIDE),
        "FIX SUGGESTIONS".to_string(),
        "=".repeat(RULE_WIDE),
        String::new(),
        "These are suggestions only. Review before applying.".to_string(),
        String::new(),
    ];

    for pr in res.plugin_results.iter().filter(|r| !r.is_valid()) {
        lines.push(format!("Plugin: {}", pr.plugin_name));
        lines.push("-".repeat(RULE_NARROW));
        for e in &pr.errors {
            match e.error.as_str() {
                "missing_file" => {
                    lines.push(format!("  Option 1: Create missing {}", e.file_type));
                    lines.push(format!("    touch {}", e.expected_path));
                    lines.push(String::new());
                    lines.push("  Option 2: Remove from manifest".to_string());
                    lines.push(format!(
                        "    Remove '{}' from {}s array",
                        e.declared_path, e.file_type
                    ));
                    lines.push(String::new());
                }
                "missing_skill_dir" => {
                    lines.push("  Option 1: Create skill directory".to_string());
                    lines.push(format!("    mkdir -p {}", e.expected_path));
                    lines.push(format!(
                        "    touch {}/{}",
                        e.expected_path,
                        crate::manifest::SKILL_MARKER
                    ));
                    lines.push(String::new());
                    lines.push("  Option 2: Remove from manifest".to_string());
                    lines.push(format!("    Remove '{}' from skills array", e.declared_path));
                    lines.push(String::new());
                }
                "missing_skill_md" => {
                    lines.push("  Create SKILL.md:".to_string());
                    lines.push(format!("    touch {}", e.expected_path));
                    lines.push(String::new());
                }
                "missing_directory" => {
                    lines.push("  Plugin source directory missing:".to_string());
                    lines.push(format!("    mkdir -p {}", e.expected_path));
                    lines.push(String::new());
                }
                _ => {}
            }
        }
    }
    lines.join("\n")
}
