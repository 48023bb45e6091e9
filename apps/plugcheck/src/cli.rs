//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "plugcheck",
    version,
    about = "Plugin frontmatter and manifest validator",
    long_about = "plugcheck validates YAML frontmatter of plugin agents, commands, and skills, and checks that every path declared in the marketplace manifest exists on disk.\n\nConfiguration precedence: CLI > plugcheck.toml > defaults.",
    after_help = "Examples:\n  plugcheck frontmatter\n  plugcheck frontmatter --changed --strict\n  plugcheck manifest --fix\n  plugcheck manifest --path plugins/p/.claude-plugin/plugin.json --json",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current plugcheck version.")]
    Version,
    /// Validate plugin document frontmatter
    #[command(
        about = "Validate frontmatter",
        long_about = "Validate YAML frontmatter of agents, commands, and skills under plugins/. Errors fail the run; warnings fail it only with --strict.",
        after_help = "Examples:\n  plugcheck frontmatter\n  plugcheck frontmatter --changed --base-ref origin/develop\n  plugcheck frontmatter --json"
    )]
    Frontmatter {
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Shorthand for --output json")]
        json: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Only validate plugin documents changed relative to the base ref")]
        changed: bool,
        #[arg(long, help = "Git ref to diff against with --changed (default: origin/main)")]
        base_ref: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Treat warnings as errors")]
        strict: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Hide warnings in human output")]
        no_warnings: bool,
        #[arg(short, long, action = clap::ArgAction::SetTrue, help = "Print nothing; report through the exit code only")]
        quiet: bool,
    },
    /// Validate manifest path integrity
    #[command(
        about = "Validate manifest paths",
        long_about = "Check that every source, agent, command, skill, and hooks path declared in a manifest exists on disk and stays inside its base directory.",
        after_help = "Examples:\n  plugcheck manifest\n  plugcheck manifest --fix\n  plugcheck manifest --path plugins/p/.claude-plugin/plugin.json"
    )]
    Manifest {
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Shorthand for --output json")]
        json: bool,
        #[arg(long, help = "Manifest to validate; paths resolve against its directory (default: .claude-plugin/marketplace.json under the repo root)")]
        path: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Print fix suggestions for failures")]
        fix: bool,
        #[arg(short, long, action = clap::ArgAction::SetTrue, help = "Print nothing; report through the exit code only")]
        quiet: bool,
    },
}

/// Resolve `--json` / `--output` into one optional output override.
pub fn output_override(json: bool, output: Option<String>) -> Option<String> {
    if json {
        Some("json".to_string())
    } else {
        output
    }
}

/// Boolean switches only override config when they are set.
pub fn flag(set: bool) -> Option<bool> {
    set.then_some(true)
}
