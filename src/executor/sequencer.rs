//! Sequential batch execution
//!
//! Drives every target through the console runner one at a time.

use chrono::Utc;
use std::collections::VecDeque;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use super::command::build_command_line;
use super::extractor::extract_stats;
use super::invoker::{Invoke, InvokeError};
use crate::config::RunnerConfig;
use crate::models::{BatchReport, MissingTarget, Target, TargetOutcome, TargetResult};

/// Runs a queue of targets with a single worker.
///
/// A target's command is built only after the previous invocation has
/// fully completed, so at most one runner process is alive at a time.
pub struct Sequencer<I> {
    config: RunnerConfig,
    invoker: I,
}

impl<I: Invoke> Sequencer<I> {
    pub fn new(config: RunnerConfig, invoker: I) -> Self {
        Self { config, invoker }
    }

    /// Run every target in order and aggregate the results.
    ///
    /// Individual failures are recorded per target; the batch always
    /// runs to completion.
    pub async fn run(&self, targets: Vec<Target>, missing: Vec<MissingTarget>) -> BatchReport {
        let started_at = Utc::now();
        let start = Instant::now();
        let total = targets.len();
        let mut queue: VecDeque<Target> = targets.into();
        let mut results = Vec::with_capacity(total);

        info!("Running {} test assemblies", total);

        while let Some(target) = queue.pop_front() {
            info!("[{}/{}] {}", results.len() + 1, total, target);
            let result = self.run_target(target).await;
            info!("  {}", result);
            results.push(result);
        }

        let report = BatchReport::new(started_at, results, missing);
        info!(
            "Batch completed in {}ms - {} assemblies, {} errors, {} missing",
            start.elapsed().as_millis(),
            report.results.len(),
            report.errors().len(),
            report.missing.len()
        );
        report
    }

    /// Build, invoke and extract one target
    async fn run_target(&self, target: Target) -> TargetResult {
        let start = Instant::now();
        let command = build_command_line(&target, &self.config);
        debug!("Using command: {}", command);

        let (exit_code, outcome) = match self.invoker.invoke(&command).await {
            Ok(invocation) => {
                if !invocation.success() {
                    warn!(
                        "{} exited with code {:?}",
                        target, invocation.exit_code
                    );
                }

                let outcome = match extract_stats(&invocation.stdout_chunks) {
                    Ok(Some(record)) => TargetOutcome::Stats(record),
                    Ok(None) => {
                        debug!("No trailer line found for {}", target);
                        TargetOutcome::TrailerNotFound
                    }
                    Err(e) => {
                        warn!("{}: {}", target, e);
                        TargetOutcome::TrailerMalformed {
                            message: e.to_string(),
                        }
                    }
                };
                (invocation.exit_code, outcome)
            }
            Err(e) => {
                error!("{}: {}", target, e);
                let message = e.to_string();
                let outcome = match e {
                    InvokeError::Spawn { .. } => TargetOutcome::SpawnFailed { message },
                    InvokeError::Stream { .. } | InvokeError::Wait { .. } => {
                        TargetOutcome::InvokeFailed { message }
                    }
                };
                (None, outcome)
            }
        };

        TargetResult {
            target,
            command,
            exit_code,
            duration_ms: start.elapsed().as_millis() as u64,
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunnerOptions;
    use crate::executor::invoker::Invocation;
    use crate::models::{resolve_targets, StatRecord};
    use futures::future::BoxFuture;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tempfile::TempDir;

    /// Records concurrency and call order, answering with canned output
    #[derive(Default)]
    struct FakeInvoker {
        active: AtomicUsize,
        max_active: AtomicUsize,
        commands: Mutex<Vec<String>>,
        responses: Mutex<VecDeque<Result<Invocation, String>>>,
    }

    impl FakeInvoker {
        fn with_responses(responses: Vec<Result<Invocation, String>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                ..Default::default()
            }
        }
    }

    impl Invoke for Arc<FakeInvoker> {
        fn invoke<'a>(
            &'a self,
            command: &'a str,
        ) -> BoxFuture<'a, Result<Invocation, InvokeError>> {
            Box::pin(async move {
                let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
                self.max_active.fetch_max(now, Ordering::SeqCst);
                self.commands.lock().unwrap().push(command.to_string());

                tokio::time::sleep(Duration::from_millis(20)).await;

                let response = self.responses.lock().unwrap().pop_front();
                self.active.fetch_sub(1, Ordering::SeqCst);

                match response {
                    Some(Ok(invocation)) => Ok(invocation),
                    Some(Err(message)) if message.starts_with("wait:") => Err(InvokeError::Wait {
                        command: command.to_string(),
                        source: std::io::Error::new(std::io::ErrorKind::Other, message),
                    }),
                    Some(Err(message)) => Err(InvokeError::Spawn {
                        command: command.to_string(),
                        source: std::io::Error::new(std::io::ErrorKind::NotFound, message),
                    }),
                    None => Ok(Invocation::default()),
                }
            })
        }
    }

    fn trailer(line: &str, exit_code: i32) -> Result<Invocation, String> {
        Ok(Invocation {
            stdout_chunks: vec!["Starting tests\n".to_string(), format!("{line}\n")],
            exit_code: Some(exit_code),
        })
    }

    fn make_targets(dir: &TempDir, names: &[&str]) -> Vec<Target> {
        let paths: Vec<_> = names
            .iter()
            .map(|name| {
                let path = dir.path().join(name);
                std::fs::write(&path, b"").unwrap();
                path
            })
            .collect();
        resolve_targets(paths).0
    }

    fn quiet_config() -> RunnerConfig {
        RunnerOptions {
            stdout: false,
            stderr: false,
            ..Default::default()
        }
        .resolve()
    }

    #[tokio::test]
    async fn test_never_overlaps_invocations() {
        let dir = tempfile::tempdir().unwrap();
        let targets = make_targets(&dir, &["a.dll", "b.dll", "c.dll"]);
        let invoker = Arc::new(FakeInvoker::default());
        let sequencer = Sequencer::new(quiet_config(), invoker.clone());

        let report = sequencer.run(targets.clone(), Vec::new()).await;

        assert_eq!(invoker.max_active.load(Ordering::SeqCst), 1);
        assert_eq!(report.results.len(), 3);
        let commands = invoker.commands.lock().unwrap();
        for (command, target) in commands.iter().zip(&targets) {
            assert!(command.contains(&target.to_string()));
        }
    }

    #[tokio::test]
    async fn test_aggregates_records() {
        let dir = tempfile::tempdir().unwrap();
        let targets = make_targets(&dir, &["a.dll", "b.dll"]);
        let invoker = Arc::new(FakeInvoker::with_responses(vec![
            trailer("5 total, 1 failed, 0 skipped, took 2.0 seconds", 1),
            trailer("3 total, 0 failed, 1 skipped, took 1.5 seconds", 0),
        ]));

        let report = Sequencer::new(quiet_config(), invoker)
            .run(targets, Vec::new())
            .await;

        assert_eq!(report.aggregate.total, 8);
        assert_eq!(report.aggregate.failed, 1);
        assert_eq!(report.aggregate.skipped, 1);
        assert_eq!(report.aggregate.time, 3.5);
        assert_eq!(report.results[0].exit_code, Some(1));
    }

    #[tokio::test]
    async fn test_failures_do_not_abort_batch() {
        let dir = tempfile::tempdir().unwrap();
        let targets = make_targets(&dir, &["a.dll", "b.dll", "c.dll", "d.dll"]);
        let invoker = Arc::new(FakeInvoker::with_responses(vec![
            Err("runner not found".to_string()),
            trailer("no summary here", 0),
            trailer("4 total, oops", 0),
            trailer("2 total, 0 failed, 0 skipped, took 0.5 seconds", 0),
        ]));

        let report = Sequencer::new(quiet_config(), invoker)
            .run(targets, Vec::new())
            .await;

        let outcomes: Vec<_> = report.results.iter().map(|r| r.outcome.label()).collect();
        assert_eq!(outcomes, ["SPAWN FAILED", "NO TRAILER", "MALFORMED", "OK"]);
        assert_eq!(report.results[0].exit_code, None);
        assert_eq!(report.errors().len(), 2);
        assert_eq!(
            report.aggregate,
            crate::models::AggregateResult::from_records(&[StatRecord::new(2, 0, 0, 0.5)])
        );
    }

    #[tokio::test]
    async fn test_lost_process_is_not_a_spawn_failure() {
        let dir = tempfile::tempdir().unwrap();
        let targets = make_targets(&dir, &["a.dll", "b.dll"]);
        let invoker = Arc::new(FakeInvoker::with_responses(vec![
            Err("wait: child status lost".to_string()),
            Err("runner not found".to_string()),
        ]));

        let report = Sequencer::new(quiet_config(), invoker)
            .run(targets, Vec::new())
            .await;

        let outcomes: Vec<_> = report.results.iter().map(|r| r.outcome.label()).collect();
        assert_eq!(outcomes, ["INVOKE FAILED", "SPAWN FAILED"]);
        assert_eq!(report.errors().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_target_is_reported_not_run() {
        let dir = tempfile::tempdir().unwrap();
        let valid = dir.path().join("valid.dll");
        std::fs::write(&valid, b"").unwrap();
        let (targets, missing) =
            resolve_targets([dir.path().join("missing.dll"), valid.clone()]);

        let invoker = Arc::new(FakeInvoker::with_responses(vec![trailer(
            "12 total, 3 failed, 1 skipped, took 4.5 seconds",
            1,
        )]));
        let report = Sequencer::new(quiet_config(), invoker.clone())
            .run(targets, missing)
            .await;

        assert_eq!(invoker.commands.lock().unwrap().len(), 1);
        assert_eq!(report.missing.len(), 1);
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.aggregate.total, 12);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_runs_real_processes_in_order() {
        use crate::executor::ProcessInvoker;

        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("calls.log");
        let runner = dir.path().join("fake-xunit.sh");
        std::fs::write(
            &runner,
            format!(
                "#!/bin/sh\necho \"start $1\" >> {log}\nsleep 0.1\necho \"end $1\" >> {log}\n\
                 echo \"Running $1\"\necho \"2 total, 1 failed, 0 skipped, took 0.25 seconds\"\nexit 1\n",
                log = log.display()
            ),
        )
        .unwrap();

        let targets = make_targets(&dir, &["one.dll", "two.dll"]);
        let config = RunnerOptions {
            stdout: false,
            stderr: false,
            xunit: format!("sh {}", runner.display()),
            silent: "false".to_string(),
            ..Default::default()
        }
        .resolve();

        let invoker = ProcessInvoker::from_config(&config);
        let report = Sequencer::new(config, invoker)
            .run(targets.clone(), Vec::new())
            .await;

        assert_eq!(report.aggregate.total, 4);
        assert_eq!(report.aggregate.failed, 2);
        assert_eq!(report.aggregate.time, 0.5);

        let calls = std::fs::read_to_string(&log).unwrap();
        let expected = format!(
            "start {a}\nend {a}\nstart {b}\nend {b}\n",
            a = targets[0],
            b = targets[1]
        );
        assert_eq!(calls, expected);
    }
}
