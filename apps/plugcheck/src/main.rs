//! plugcheck CLI binary entry point.
//! Delegates to the library for validation and prints results.

use clap::Parser;
use plugcheck::cli::{self, Cli, Commands};
use plugcheck::utils::{info_prefix, note_prefix};
use plugcheck::{config, lint, manifest, output};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "PLUGCHECK_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Frontmatter {
            repo_root,
            output,
            json,
            changed,
            base_ref,
            strict,
            no_warnings,
            quiet,
        } => {
            let out = cli::output_override(json, output);
            let eff = config::resolve_effective(
                repo_root.as_deref(),
                out.as_deref(),
                cli::flag(strict),
                no_warnings.then_some(false),
                base_ref.as_deref(),
                None,
            );
            let human = eff.output != "json" && !quiet;
            if human && config::load_config(&eff.repo_root).is_none() {
                eprintln!("{} No plugcheck.toml found; using defaults.", note_prefix());
            }

            let files = if changed {
                let files = lint::changed_files(&eff.repo_root, &eff.base_ref);
                if human {
                    eprintln!(
                        "{} Checking {} changed file(s) against {}",
                        info_prefix(),
                        files.len(),
                        eff.base_ref
                    );
                }
                files
            } else {
                let plugins_dir = eff.repo_root.join(lint::PLUGINS_DIR);
                if !plugins_dir.is_dir() {
                    if !quiet {
                        let msg = format!("Plugins directory not found: {}", plugins_dir.display());
                        output::print_error(&msg, &eff.output);
                    }
                    std::process::exit(2);
                }
                lint::find_plugin_files(&plugins_dir)
            };

            if files.is_empty() {
                if !quiet {
                    output::print_nothing_to_validate(&eff.output);
                }
                std::process::exit(2);
            }

            let mut report = lint::run_frontmatter(&files);
            if eff.strict {
                report = report.into_strict();
            }
            if !quiet {
                output::print_frontmatter(&report, &eff.output, eff.show_warnings);
            }
            if !report.is_valid() {
                std::process::exit(1);
            }
        }
        Commands::Manifest {
            repo_root,
            output,
            json,
            path,
            fix,
            quiet,
        } => {
            let out = cli::output_override(json, output);
            let eff = config::resolve_effective(
                repo_root.as_deref(),
                out.as_deref(),
                None,
                None,
                None,
                cli::flag(fix),
            );

            let report = match path {
                Some(p) => {
                    let given = PathBuf::from(&p);
                    if !given.exists() {
                        if !quiet {
                            output::print_error(&format!("Manifest not found: {}", p), &eff.output);
                        }
                        std::process::exit(2);
                    }
                    let manifest_path = std::path::absolute(&given).unwrap_or(given);
                    manifest::validate_manifest_paths(&manifest_path, None)
                }
                None => {
                    let report = manifest::validate_root_manifest(&eff.repo_root, &eff.manifest);
                    if report.manifest_path == manifest::NOT_FOUND {
                        if !quiet {
                            for e in &report.manifest_errors {
                                output::print_error(e, &eff.output);
                            }
                        }
                        std::process::exit(2);
                    }
                    report
                }
            };

            if !quiet {
                output::print_manifest(&report, &eff.output, eff.fix);
            }
            if !report.is_valid() {
                std::process::exit(1);
            }
        }
    }
}
