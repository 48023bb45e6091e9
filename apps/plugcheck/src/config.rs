//! Configuration discovery and effective settings resolution.
//!
//! plugcheck reads `plugcheck.toml|yaml|yml` from the repository root (or
//! closest ancestor) and merges it with CLI flags to produce an `Effective`
//! config.
//! Defaults:
//! - `output`: `human`
//! - `frontmatter.strict`: false
//! - `frontmatter.warnings`: true
//! - `frontmatter.base_ref`: `origin/main`
//! - `manifest.path`: `.claude-plugin/marketplace.json`
//! - `manifest.fix`: false
//!
//! Overrides precedence: CLI > config file > defaults. `manifest.path` has
//! no CLI override; `--path` names a different manifest with its own base.

use crate::manifest::DEFAULT_MANIFEST;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_BASE_REF: &str = "origin/main";

const CONFIG_FILES: &[&str] = &["plugcheck.toml", "plugcheck.yaml", "plugcheck.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Frontmatter section under `[frontmatter]`.
pub struct FrontmatterCfg {
    pub strict: Option<bool>,
    /// Show warnings in human output.
    pub warnings: Option<bool>,
    pub base_ref: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Manifest section under `[manifest]`.
pub struct ManifestCfg {
    pub path: Option<String>,
    pub fix: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `plugcheck.toml|yaml`.
pub struct PlugcheckConfig {
    pub output: Option<String>,
    #[serde(default)]
    pub frontmatter: Option<FrontmatterCfg>,
    #[serde(default)]
    pub manifest: Option<ManifestCfg>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub output: String,
    pub strict: bool,
    pub show_warnings: bool,
    pub base_ref: String,
    pub manifest: String,
    pub fix: bool,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `plugcheck.toml|yaml|yml` or a `.git` entry is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_FILES.iter().any(|f| cur.join(f).exists()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `PlugcheckConfig` from the first config file present under `root`.
///
/// An unparsable file is reported and treated as absent.
pub fn load_config(root: &Path) -> Option<PlugcheckConfig> {
    for name in CONFIG_FILES {
        let p = root.join(name);
        if !p.exists() {
            continue;
        }
        let s = fs::read_to_string(&p).ok()?;
        let parsed = if name.ends_with(".toml") {
            toml::from_str::<PlugcheckConfig>(&s).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str::<PlugcheckConfig>(&s).map_err(|e| e.to_string())
        };
        return match parsed {
            Ok(cfg) => {
                debug!(file = %p.display(), "loaded config");
                Some(cfg)
            }
            Err(e) => {
                warn!(file = %p.display(), error = %e, "ignoring invalid config");
                None
            }
        };
    }
    None
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_repo_root: Option<&str>,
    cli_output: Option<&str>,
    cli_strict: Option<bool>,
    cli_warnings: Option<bool>,
    cli_base_ref: Option<&str>,
    cli_fix: Option<bool>,
) -> Effective {
    let start = PathBuf::from(cli_repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let cfg = load_config(&repo_root).unwrap_or_default();
    let fm = cfg.frontmatter.unwrap_or_default();
    let mf = cfg.manifest.unwrap_or_default();

    let output = cli_output
        .map(str::to_string)
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());
    let strict = cli_strict.or(fm.strict).unwrap_or(false);
    let show_warnings = cli_warnings.or(fm.warnings).unwrap_or(true);
    let base_ref = cli_base_ref
        .map(str::to_string)
        .or(fm.base_ref)
        .unwrap_or_else(|| DEFAULT_BASE_REF.to_string());
    let manifest = mf.path.unwrap_or_else(|| DEFAULT_MANIFEST.to_string());
    let fix = cli_fix.or(mf.fix).unwrap_or(false);

    Effective {
        repo_root,
        output,
        strict,
        show_warnings,
        base_ref,
        manifest,
        fix,
    }
}
