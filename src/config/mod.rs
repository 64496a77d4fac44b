//! Configuration module
//!
//! Handles the runner options, their layered overrides and the resolved
//! configuration handed to the executor.

mod env;
mod file;

pub use env::{print_env_help, EnvConfig};
pub use file::ConfigFile;
pub(crate) use file::is_yaml_file;

use serde::{Deserialize, Serialize};

/// Default console runner executable
pub const DEFAULT_EXECUTABLE: &str = "xunit.console.exe";

/// Raw runner options as they appear in config files
///
/// Switch values stay string-typed so existing configurations keep working;
/// they are normalized by [`RunnerOptions::resolve`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerOptions {
    /// Relay child stdout to the console
    pub stdout: bool,

    /// Relay child stderr to the console
    pub stderr: bool,

    /// Console runner executable
    #[serde(rename = "xUnit")]
    pub xunit: String,

    /// `/silent` when exactly "true"
    pub silent: String,

    /// `/teamcity` when exactly "true"
    pub teamcity: String,

    /// Trait include filter
    #[serde(rename = "trait")]
    pub trait_filter: String,

    /// Trait exclude filter
    pub notrait: String,

    /// `/noshadow` when non-empty
    pub noshadow: String,

    /// XML report path
    pub xml: String,

    /// HTML report path
    pub html: String,

    /// NUnit-format report path
    pub nunit: String,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            stdout: true,
            stderr: true,
            xunit: DEFAULT_EXECUTABLE.to_string(),
            silent: "true".to_string(),
            teamcity: "false".to_string(),
            trait_filter: String::new(),
            notrait: String::new(),
            noshadow: String::new(),
            xml: String::new(),
            html: String::new(),
            nunit: String::new(),
        }
    }
}

impl RunnerOptions {
    /// Apply a layer of overrides on top of these options
    pub fn merge(mut self, overrides: &OptionOverrides) -> Self {
        fn set<T: Clone>(slot: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *slot = v.clone();
            }
        }

        set(&mut self.stdout, &overrides.stdout);
        set(&mut self.stderr, &overrides.stderr);
        set(&mut self.xunit, &overrides.xunit);
        set(&mut self.silent, &overrides.silent);
        set(&mut self.teamcity, &overrides.teamcity);
        set(&mut self.trait_filter, &overrides.trait_filter);
        set(&mut self.notrait, &overrides.notrait);
        set(&mut self.noshadow, &overrides.noshadow);
        set(&mut self.xml, &overrides.xml);
        set(&mut self.html, &overrides.html);
        set(&mut self.nunit, &overrides.nunit);
        self
    }

    /// Normalize string switches into a typed configuration.
    ///
    /// `silent` and `teamcity` activate only on the exact string "true";
    /// `noshadow` activates on any non-empty value.
    pub fn resolve(&self) -> RunnerConfig {
        RunnerConfig {
            relay_stdout: self.stdout,
            relay_stderr: self.stderr,
            executable: self.xunit.clone(),
            switches: RunnerSwitches {
                silent: self.silent == "true",
                teamcity: self.teamcity == "true",
                trait_filter: non_empty(&self.trait_filter),
                notrait: non_empty(&self.notrait),
                noshadow: !self.noshadow.is_empty(),
                xml: non_empty(&self.xml),
                html: non_empty(&self.html),
                nunit: non_empty(&self.nunit),
            },
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// One layer of optional option overrides (environment or CLI)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OptionOverrides {
    pub stdout: Option<bool>,
    pub stderr: Option<bool>,
    pub xunit: Option<String>,
    pub silent: Option<String>,
    pub teamcity: Option<String>,
    pub trait_filter: Option<String>,
    pub notrait: Option<String>,
    pub noshadow: Option<String>,
    pub xml: Option<String>,
    pub html: Option<String>,
    pub nunit: Option<String>,
}

/// Resolved, read-only configuration for a batch
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunnerConfig {
    pub relay_stdout: bool,
    pub relay_stderr: bool,
    pub executable: String,
    pub switches: RunnerSwitches,
}

impl RunnerConfig {
    /// Force both relays on, as `--verbose` does
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        if verbose {
            self.relay_stdout = true;
            self.relay_stderr = true;
        }
        self
    }
}

/// Switches forwarded to the console runner
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunnerSwitches {
    pub silent: bool,
    pub teamcity: bool,
    pub trait_filter: Option<String>,
    pub notrait: Option<String>,
    pub noshadow: bool,
    pub xml: Option<String>,
    pub html: Option<String>,
    pub nunit: Option<String>,
}
