//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::OptionOverrides;

/// Sequential xUnit console runner for multiple test assemblies
#[derive(Parser, Debug)]
#[command(name = "xunit-runner")]
#[command(version = "0.1.0")]
#[command(about = "Run xUnit test assemblies one at a time and total their results")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output (debug logs, always relay runner output)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Configuration file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run test assemblies
    Run(RunArgs),

    /// Inspect or create configuration
    Config(ConfigArgs),
}

/// Arguments for run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Test assemblies to run (defaults to the config file's targets)
    pub targets: Vec<PathBuf>,

    /// Console runner executable
    #[arg(long = "xunit", value_name = "PATH")]
    pub xunit: Option<String>,

    /// Relay runner stdout (true/false)
    #[arg(long, value_name = "BOOL")]
    pub stdout: Option<bool>,

    /// Relay runner stderr (true/false)
    #[arg(long, value_name = "BOOL")]
    pub stderr: Option<bool>,

    /// Pass /silent when "true"
    #[arg(long, value_name = "VALUE")]
    pub silent: Option<String>,

    /// Pass /teamcity when "true"
    #[arg(long, value_name = "VALUE")]
    pub teamcity: Option<String>,

    /// Only run tests with this trait, e.g. "Category=Fast"
    #[arg(long = "trait", value_name = "EXPR")]
    pub trait_filter: Option<String>,

    /// Skip tests with this trait
    #[arg(long, value_name = "EXPR")]
    pub notrait: Option<String>,

    /// Pass /noshadow when non-empty
    #[arg(long, value_name = "VALUE")]
    pub noshadow: Option<String>,

    /// XML report path forwarded to the runner
    #[arg(long, value_name = "PATH")]
    pub xml: Option<String>,

    /// HTML report path forwarded to the runner
    #[arg(long, value_name = "PATH")]
    pub html: Option<String>,

    /// NUnit-format report path forwarded to the runner
    #[arg(long, value_name = "PATH")]
    pub nunit: Option<String>,

    /// Output format (table, json, json-pretty, summary)
    #[arg(short, long, default_value = "table")]
    pub format: String,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Save the batch report to file (.json or .yaml)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl RunArgs {
    /// Options given on the command line, highest precedence layer
    pub fn overrides(&self) -> OptionOverrides {
        OptionOverrides {
            stdout: self.stdout,
            stderr: self.stderr,
            xunit: self.xunit.clone(),
            silent: self.silent.clone(),
            teamcity: self.teamcity.clone(),
            trait_filter: self.trait_filter.clone(),
            notrait: self.notrait.clone(),
            noshadow: self.noshadow.clone(),
            xml: self.xml.clone(),
            html: self.html.clone(),
            nunit: self.nunit.clone(),
        }
    }
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective options after all overrides
    Show,

    /// Write a default configuration file
    Init {
        /// Output path
        #[arg(default_value = "xunit-runner.yaml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// List supported environment variables
    Env,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_args_parsing() {
        let args = Args::parse_from([
            "xunit-runner",
            "run",
            "A.Tests.dll",
            "B.Tests.dll",
            "--xunit",
            "tools/xunit.console.exe",
            "--trait",
            "Category=Fast",
            "--stdout",
            "false",
        ]);
        match args.command {
            Command::Run(run_args) => {
                assert_eq!(run_args.targets.len(), 2);
                let overrides = run_args.overrides();
                assert_eq!(overrides.xunit.as_deref(), Some("tools/xunit.console.exe"));
                assert_eq!(overrides.trait_filter.as_deref(), Some("Category=Fast"));
                assert_eq!(overrides.stdout, Some(false));
                assert_eq!(overrides.silent, None);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let args = Args::parse_from(["xunit-runner", "config", "show", "--verbose"]);
        assert!(args.verbose);
        assert_eq!(args.log_level, "info");
        assert!(matches!(
            args.command,
            Command::Config(ConfigArgs {
                action: ConfigAction::Show
            })
        ));
    }

    #[test]
    fn test_config_init_default_path() {
        let args = Args::parse_from(["xunit-runner", "config", "init"]);
        match args.command {
            Command::Config(ConfigArgs {
                action: ConfigAction::Init { path, force },
            }) => {
                assert_eq!(path, PathBuf::from("xunit-runner.yaml"));
                assert!(!force);
            }
            _ => panic!("Expected config init"),
        }
    }
}
