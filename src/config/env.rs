//! Environment variable configuration
//!
//! Provides environment variable overrides for runner options.

use std::env;

use super::OptionOverrides;

/// Environment variable prefix
const ENV_PREFIX: &str = "XUNIT_RUNNER";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Option overrides from XUNIT_RUNNER_<OPTION>
    pub overrides: OptionOverrides,
    /// Config file from XUNIT_RUNNER_CONFIG
    pub config_file: Option<String>,
    /// Verbose from XUNIT_RUNNER_VERBOSE
    pub verbose: Option<bool>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            overrides: OptionOverrides {
                stdout: get_env_bool("STDOUT"),
                stderr: get_env_bool("STDERR"),
                xunit: get_env("XUNIT"),
                silent: get_env("SILENT"),
                teamcity: get_env("TEAMCITY"),
                trait_filter: get_env("TRAIT"),
                notrait: get_env("NOTRAIT"),
                noshadow: get_env("NOSHADOW"),
                xml: get_env("XML"),
                html: get_env("HTML"),
                nunit: get_env("NUNIT"),
            },
            config_file: get_env("CONFIG"),
            verbose: get_env_bool("VERBOSE"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.overrides != OptionOverrides::default()
            || self.config_file.is_some()
            || self.verbose.is_some()
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}

/// Print all XUNIT_RUNNER environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_XUNIT      Console runner executable");
    println!("  {ENV_PREFIX}_STDOUT     Relay runner stdout (true/false)");
    println!("  {ENV_PREFIX}_STDERR     Relay runner stderr (true/false)");
    println!("  {ENV_PREFIX}_SILENT     Pass /silent when \"true\"");
    println!("  {ENV_PREFIX}_TEAMCITY   Pass /teamcity when \"true\"");
    println!("  {ENV_PREFIX}_TRAIT      Trait include filter");
    println!("  {ENV_PREFIX}_NOTRAIT    Trait exclude filter");
    println!("  {ENV_PREFIX}_NOSHADOW   Pass /noshadow when non-empty");
    println!("  {ENV_PREFIX}_XML        XML report path");
    println!("  {ENV_PREFIX}_HTML       HTML report path");
    println!("  {ENV_PREFIX}_NUNIT      NUnit-format report path");
    println!("  {ENV_PREFIX}_CONFIG     Path to configuration file");
    println!("  {ENV_PREFIX}_VERBOSE    Enable verbose output (true/false)");
    println!();
    println!("Example:");
    println!("  export {ENV_PREFIX}_XUNIT=tools/xunit/xunit.console.clr4.exe");
    println!("  export {ENV_PREFIX}_TEAMCITY=true");
    println!("  xunit-runner run bin/Release/*.Tests.dll");
}
