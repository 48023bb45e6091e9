//! plugcheck core library.
//!
//! This crate exposes programmatic APIs for validating plugin documents
//! (agents, commands, skills) and the path integrity of plugin manifests.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `frontmatter`: Frontmatter extraction with a flat fallback parser.
//! - `rules`: Category detection and per-category field rules.
//! - `checks`: Content heuristics (routing tables, hardcoded paths, MCP tools).
//! - `lint`: Document discovery and the frontmatter validation run.
//! - `paths`: Safe resolution of declared relative paths.
//! - `manifest`: Manifest loading and filesystem integrity checks.
//! - `models`: Issue and report structs shared by both validators.
//! - `output`: Human/JSON printers.
//! - `utils`: Supporting helpers.
pub mod checks;
pub mod cli;
pub mod config;
pub mod frontmatter;
pub mod lint;
pub mod manifest;
pub mod models;
pub mod output;
pub mod paths;
pub mod rules;
pub mod utils;
