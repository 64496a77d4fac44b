//! Process invocation
//!
//! Runs one console runner command, relays its output live and captures
//! stdout for trailer extraction.

use futures::future::BoxFuture;
use std::io;
use std::process::Stdio;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::process::{Child, Command};
use tracing::debug;

use crate::config::RunnerConfig;

const READ_BUFFER_SIZE: usize = 8 * 1024;

/// Failure to run a command at all
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("failed reading output of `{command}`: {source}")]
    Stream {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("failed waiting for `{command}`: {source}")]
    Wait {
        command: String,
        #[source]
        source: io::Error,
    },
}

/// Captured result of one finished invocation
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Invocation {
    /// Stdout chunks in arrival order
    pub stdout_chunks: Vec<String>,
    /// `None` when terminated by a signal
    pub exit_code: Option<i32>,
}

impl Invocation {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Something that can run a command line to completion
pub trait Invoke {
    /// Resolves only once stdout has closed and the process has exited
    fn invoke<'a>(&'a self, command: &'a str) -> BoxFuture<'a, Result<Invocation, InvokeError>>;
}

/// Runs commands through the platform shell
#[derive(Clone, Debug)]
pub struct ProcessInvoker {
    shell: String,
    shell_flag: String,
    relay_stdout: bool,
    relay_stderr: bool,
}

impl ProcessInvoker {
    pub fn new(relay_stdout: bool, relay_stderr: bool) -> Self {
        let (shell, shell_flag) = if cfg!(windows) {
            ("cmd", "/C")
        } else {
            ("sh", "-c")
        };
        Self {
            shell: shell.to_string(),
            shell_flag: shell_flag.to_string(),
            relay_stdout,
            relay_stderr,
        }
    }

    pub fn from_config(config: &RunnerConfig) -> Self {
        Self::new(config.relay_stdout, config.relay_stderr)
    }

    #[cfg(test)]
    fn with_shell(mut self, shell: impl Into<String>, flag: impl Into<String>) -> Self {
        self.shell = shell.into();
        self.shell_flag = flag.into();
        self
    }

    fn spawn(&self, command: &str) -> io::Result<Child> {
        Command::new(&self.shell)
            .arg(&self.shell_flag)
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
    }

    async fn run(&self, command: &str) -> Result<Invocation, InvokeError> {
        let mut child = self.spawn(command).map_err(|source| InvokeError::Spawn {
            command: command.to_string(),
            source,
        })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let pid = child.id();

        let stdout_done = async {
            let chunks = match stdout {
                Some(stdout) => capture(stdout, tokio::io::stdout(), self.relay_stdout).await,
                None => Ok(Vec::new()),
            };
            debug!("pid {:?}: stdout closed", pid);
            chunks
        };
        let stderr_done = async {
            match stderr {
                Some(stderr) => relay(stderr, tokio::io::stderr(), self.relay_stderr).await,
                None => Ok(()),
            }
        };
        let exited = async {
            let status = child.wait().await;
            debug!("pid {:?}: process exited", pid);
            status
        };

        // Both stdout end-of-stream and process exit must be observed.
        let (chunks, stderr_result, status) = tokio::join!(stdout_done, stderr_done, exited);

        let stream_error = |source: io::Error| InvokeError::Stream {
            command: command.to_string(),
            source,
        };
        let stdout_chunks = chunks.map_err(stream_error)?;
        stderr_result.map_err(stream_error)?;
        let status = status.map_err(|source| InvokeError::Wait {
            command: command.to_string(),
            source,
        })?;

        Ok(Invocation {
            stdout_chunks,
            exit_code: status.code(),
        })
    }
}

impl Invoke for ProcessInvoker {
    fn invoke<'a>(&'a self, command: &'a str) -> BoxFuture<'a, Result<Invocation, InvokeError>> {
        Box::pin(self.run(command))
    }
}

/// Read `source` to its end, collecting chunks and optionally mirroring them
async fn capture<R, W>(mut source: R, mut console: W, mut mirror: bool) -> io::Result<Vec<String>>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut chunks = Vec::new();
    let mut buf = vec![0u8; READ_BUFFER_SIZE];

    loop {
        let n = source.read(&mut buf).await?;
        if n == 0 {
            break;
        }

        if mirror {
            mirror = mirror_chunk(&mut console, &buf[..n]).await;
        }

        chunks.push(String::from_utf8_lossy(&buf[..n]).into_owned());
    }

    Ok(chunks)
}

/// Drain `source` to its end, mirroring it to `console` while that works
async fn relay<R, W>(mut source: R, mut console: W, mut mirror: bool) -> io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = vec![0u8; READ_BUFFER_SIZE];

    loop {
        let n = source.read(&mut buf).await?;
        if n == 0 {
            return Ok(());
        }

        if mirror {
            mirror = mirror_chunk(&mut console, &buf[..n]).await;
        }
    }
}

/// Write one chunk to the console; `false` once the console stops accepting output
async fn mirror_chunk<W: AsyncWrite + Unpin>(console: &mut W, chunk: &[u8]) -> bool {
    let written = match console.write_all(chunk).await {
        Ok(()) => console.flush().await,
        Err(e) => Err(e),
    };
    match written {
        Ok(()) => true,
        Err(e) => {
            debug!("Console relay stopped: {}", e);
            false
        }
    }
}
