//! Console runner command lines
//!
//! Builds the command line for a single test assembly.

use crate::config::RunnerConfig;
use crate::models::Target;

/// Build `<executable> <target> <switches>` for one target.
///
/// Switches are appended in a fixed order so the same configuration always
/// yields the same string. Trait filters are wrapped in double quotes;
/// nothing else is quoted or escaped, so paths containing spaces must be
/// quoted by the caller.
pub fn build_command_line(target: &Target, config: &RunnerConfig) -> String {
    let switches = &config.switches;
    let mut parts = vec![
        config.executable.clone(),
        target.path().display().to_string(),
    ];

    if switches.silent {
        parts.push("/silent".to_string());
    }
    if switches.teamcity {
        parts.push("/teamcity".to_string());
    }
    if let Some(filter) = &switches.trait_filter {
        parts.push(format!("/trait \"{filter}\""));
    }
    if let Some(filter) = &switches.notrait {
        parts.push(format!("/notrait \"{filter}\""));
    }
    if switches.noshadow {
        parts.push("/noshadow".to_string());
    }
    if let Some(path) = &switches.xml {
        parts.push(format!("/xml {path}"));
    }
    if let Some(path) = &switches.html {
        parts.push(format!("/html {path}"));
    }
    if let Some(path) = &switches.nunit {
        parts.push(format!("/nunit {path}"));
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunnerOptions;
    use tempfile::NamedTempFile;

    fn target() -> (NamedTempFile, Target) {
        let file = NamedTempFile::new().unwrap();
        let (mut targets, _) = crate::models::resolve_targets([file.path().to_path_buf()]);
        (file, targets.remove(0))
    }

    #[test]
    fn test_default_options() {
        let (file, target) = target();
        let command = build_command_line(&target, &RunnerOptions::default().resolve());
        assert_eq!(
            command,
            format!("xunit.console.exe {} /silent", file.path().display())
        );
    }

    #[test]
    fn test_silent_requires_exact_true() {
        let (_file, target) = target();
        for (value, expected) in [("true", true), ("True", false), ("1", false), ("", false)] {
            let options = RunnerOptions {
                silent: value.to_string(),
                ..Default::default()
            };
            let command = build_command_line(&target, &options.resolve());
            assert_eq!(command.contains("/silent"), expected, "silent = {value:?}");
        }
    }

    #[test]
    fn test_all_switches_in_order() {
        let (file, target) = target();
        let options = RunnerOptions {
            xunit: "runner".to_string(),
            silent: "true".to_string(),
            teamcity: "true".to_string(),
            trait_filter: "Category=Fast".to_string(),
            notrait: "Category=Slow".to_string(),
            noshadow: "yes".to_string(),
            xml: "out.xml".to_string(),
            html: "out.html".to_string(),
            nunit: "out.nunit.xml".to_string(),
            ..Default::default()
        };

        let command = build_command_line(&target, &options.resolve());
        assert_eq!(
            command,
            format!(
                "runner {} /silent /teamcity /trait \"Category=Fast\" /notrait \"Category=Slow\" \
                 /noshadow /xml out.xml /html out.html /nunit out.nunit.xml",
                file.path().display()
            )
        );
    }

    #[test]
    fn test_empty_values_emit_nothing() {
        let (file, target) = target();
        let options = RunnerOptions {
            silent: "false".to_string(),
            ..Default::default()
        };
        let command = build_command_line(&target, &options.resolve());
        assert_eq!(command, format!("xunit.console.exe {}", file.path().display()));
    }

    #[test]
    fn test_idempotent() {
        let (_file, target) = target();
        let config = RunnerOptions {
            teamcity: "true".to_string(),
            xml: "a.xml".to_string(),
            ..Default::default()
        }
        .resolve();

        assert_eq!(
            build_command_line(&target, &config),
            build_command_line(&target, &config)
        );
    }
}
