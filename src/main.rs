//! xunit-runner - Sequential xUnit Console Runner Orchestration
//!
//! A CLI tool that runs a list of xUnit test assemblies through the xUnit
//! console runner, one process at a time, relays their output live and
//! totals the statistics trailer of every run.
//!
//! ## Features
//!
//! - One runner process per assembly, never two at once
//! - Live stdout/stderr relay
//! - Per-assembly statistics parsed from the runner's trailer line
//! - Grand total across all assemblies
//! - Layered configuration (defaults, config file, environment, CLI)
//! - Table, JSON and summary output; batch reports saved as JSON or YAML
//!
//! ## Usage
//!
//! ```bash
//! # Run two assemblies with the default runner
//! xunit-runner run Core.Tests.dll Web.Tests.dll
//!
//! # Use a specific runner and a trait filter
//! xunit-runner run --xunit tools/xunit.console.clr4.exe --trait "Category=Fast" Core.Tests.dll
//!
//! # Targets and options from a config file
//! xunit-runner --config xunit-runner.yaml run
//!
//! # Show the effective options
//! xunit-runner config show
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

mod cli;
mod config;
mod executor;
mod models;
mod output;
mod utils;

use cli::Args;
use config::{ConfigFile, EnvConfig};
use executor::{ProcessInvoker, Sequencer};
use models::resolve_targets;
use output::{save_report, OutputFormat, ResultFormatter};
use utils::{init_logger, LogLevel};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let env = EnvConfig::load();
    let verbose = args.verbose || env.verbose.unwrap_or(false);

    let level = LogLevel::from_str(&args.log_level)
        .ok_or_else(|| anyhow::anyhow!("Unknown log level: {}", args.log_level))?
        .with_verbose(verbose);
    init_logger(level);

    match args.command {
        cli::Command::Run(run_args) => {
            run_batch(run_args, args.config.as_deref(), &env, verbose).await?;
        }
        cli::Command::Config(config_args) => {
            manage_config(config_args, args.config.as_deref(), &env)?;
        }
    }

    Ok(())
}

/// Load the config file from `--config`, `XUNIT_RUNNER_CONFIG` or the standard locations
fn load_config_file(path: Option<&Path>, env: &EnvConfig) -> Result<ConfigFile> {
    let explicit = path
        .map(Path::to_path_buf)
        .or_else(|| env.config_file.as_ref().map(PathBuf::from));

    match explicit {
        Some(path) => ConfigFile::load(&path),
        None => ConfigFile::load_default(),
    }
}

async fn run_batch(
    args: cli::RunArgs,
    config_path: Option<&Path>,
    env: &EnvConfig,
    verbose: bool,
) -> Result<()> {
    let format = OutputFormat::from_str(&args.format)
        .ok_or_else(|| anyhow::anyhow!("Unknown output format: {}", args.format))?;

    let file = load_config_file(config_path, env)?;
    let options = file
        .options
        .merge(&env.overrides)
        .merge(&args.overrides());
    debug!(
        "Using options: {}",
        serde_json::to_string_pretty(&options).context("Failed to serialize options")?
    );
    let config = options.resolve().with_verbose(verbose);

    let declared: Vec<PathBuf> = if args.targets.is_empty() {
        file.targets.iter().map(PathBuf::from).collect()
    } else {
        args.targets.clone()
    };
    if declared.is_empty() {
        warn!("No test assemblies given; pass paths or list `targets` in the config file");
    }

    let (targets, missing) = resolve_targets(declared);
    let invoker = ProcessInvoker::from_config(&config);
    let report = Sequencer::new(config, invoker).run(targets, missing).await;

    let mut formatter = ResultFormatter::new(format);
    if args.no_color {
        formatter = formatter.no_color();
    }
    println!("{}", formatter.format_report(&report));

    if let Some(path) = &args.output {
        save_report(&report, path)?;
    }

    Ok(())
}

fn manage_config(args: cli::ConfigArgs, config_path: Option<&Path>, env: &EnvConfig) -> Result<()> {
    match args.action {
        cli::ConfigAction::Show => {
            let file = load_config_file(config_path, env)?;
            let options = file.options.merge(&env.overrides);

            println!("Options:");
            println!(
                "{}",
                serde_yaml::to_string(&options).context("Failed to serialize options")?
            );
            println!("Resolved:");
            println!(
                "{}",
                serde_yaml::to_string(&options.resolve()).context("Failed to serialize config")?
            );
            if !file.targets.is_empty() {
                println!("Targets:");
                for target in &file.targets {
                    println!("  - {target}");
                }
            }
            if env.has_any() {
                println!("\n(includes XUNIT_RUNNER_* environment overrides)");
            }
        }
        cli::ConfigAction::Init { path, force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }

            ConfigFile::default().save(&path)?;
            println!("Wrote default configuration to {}", path.display());
        }
        cli::ConfigAction::Env => {
            config::print_env_help();
        }
    }

    Ok(())
}
