//! Output retrieval through the infrastructure tool's CLI
//!
//! Runs `<binary> output -no-color -json` inside the configuration
//! directory. Only the `output` subcommand is ever invoked, so the applied
//! state is inspected and never modified.
//!
//! Single keys are picked out of the full outputs document rather than
//! requested with `output -json <key>`. The single-key form prints the bare
//! value and drops the `sensitive` flag, which would leave secrets
//! unredacted.
//!
//! # Timeout Behavior
//!
//! Every invocation is bounded by a timeout. A command that exceeds it is
//! killed and reported as [`OutputError::Timeout`]; it is not retried.

use std::collections::BTreeMap;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use wait_timeout::ChildExt;

use super::error::OutputError;
use super::source::OutputSource;
use super::value::{parse_outputs_document, OutputValue};

/// Default tool executable
pub const DEFAULT_BINARY: &str = "terraform";

/// Default timeout for a single `output` invocation (2 minutes)
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeout for collecting output from child process pipes
const OUTPUT_COLLECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum captured size per stream (10MB)
const MAX_OUTPUT_SIZE: usize = 10 * 1024 * 1024;

/// Printed by older tool versions, with a non-zero exit, when state holds no outputs
const NO_OUTPUTS_MARKER: &str = "No outputs found";

/// Arguments of the one command this backend runs
const OUTPUT_ARGS: [&str; 3] = ["output", "-no-color", "-json"];

/// Captured result of one tool invocation
#[derive(Debug)]
struct ToolOutput {
    status: ExitStatus,
    stdout: String,
    stderr: String,
}

/// Reads outputs by invoking the tool binary
#[derive(Debug, Clone)]
pub struct TerraformCli {
    binary: String,
    dir: PathBuf,
    timeout: Duration,
}

impl TerraformCli {
    /// CLI reader for `dir` using the default binary and timeout
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            binary: DEFAULT_BINARY.to_string(),
            dir: dir.into(),
            timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn command_line(&self, args: &[&str]) -> String {
        format!("{} {}", self.binary, args.join(" "))
    }

    /// Run the tool with `args` and capture its output.
    fn run(&self, args: &[&str]) -> Result<ToolOutput, OutputError> {
        let command_line = self.command_line(args);
        let program = which::which(&self.binary).map_err(|_| OutputError::BinaryNotFound {
            binary: self.binary.clone(),
        })?;

        tracing::debug!(command = %command_line, dir = %self.dir.display(), "running tool");

        let mut child = Command::new(&program)
            .args(args)
            .current_dir(&self.dir)
            .env("TF_IN_AUTOMATION", "1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| OutputError::Spawn {
                command: command_line.clone(),
                source,
            })?;

        // Drain both pipes while waiting; a full pipe buffer would otherwise
        // block the child forever.
        let stdout_rx = drain(child.stdout.take());
        let stderr_rx = drain(child.stderr.take());

        let wait_result = child
            .wait_timeout(self.timeout)
            .map_err(|source| OutputError::Spawn {
                command: command_line.clone(),
                source,
            })?;

        let Some(status) = wait_result else {
            kill_child_process(&mut child);
            tracing::warn!(command = %command_line, timeout_secs = self.timeout.as_secs(), "tool timed out");
            return Err(OutputError::Timeout {
                command: command_line,
                timeout: self.timeout,
            });
        };

        let stdout = stdout_rx
            .recv_timeout(OUTPUT_COLLECTION_TIMEOUT)
            .unwrap_or_else(|_| "[output collection timed out]".to_string());
        let stderr = stderr_rx
            .recv_timeout(OUTPUT_COLLECTION_TIMEOUT)
            .unwrap_or_else(|_| "[output collection timed out]".to_string());

        Ok(ToolOutput {
            status,
            stdout,
            stderr,
        })
    }

    fn command_error(&self, args: &[&str], output: &ToolOutput) -> OutputError {
        OutputError::Command {
            command: self.command_line(args),
            exit_code: output.status.code(),
            stderr: output.stderr.trim().to_string(),
        }
    }
}

impl OutputSource for TerraformCli {
    fn describe(&self) -> String {
        format!("{} @ {}", self.binary, self.dir.display())
    }

    fn fetch(&self, key: &str) -> Result<Option<OutputValue>, OutputError> {
        let value = self.list()?.remove(key);
        if value.is_none() {
            tracing::debug!(key, "output not found in state");
        }
        Ok(value)
    }

    fn list(&self) -> Result<BTreeMap<String, OutputValue>, OutputError> {
        let output = self.run(&OUTPUT_ARGS)?;

        if output.status.success() {
            return parse_outputs_document(&output.stdout);
        }
        if reports_no_outputs(&output.stderr) {
            tracing::debug!(dir = %self.dir.display(), "state holds no outputs");
            return Ok(BTreeMap::new());
        }
        Err(self.command_error(&OUTPUT_ARGS, &output))
    }
}

/// Whether a failed `output` call only means the state has no outputs yet.
///
/// Any other failure, including ones whose message says something else was
/// "not found", is a command error.
fn reports_no_outputs(stderr: &str) -> bool {
    stderr
        .lines()
        .any(|line| line.trim_end().ends_with(NO_OUTPUTS_MARKER))
}

/// Read a child pipe on a background thread
fn drain<R: Read + Send + 'static>(stream: Option<R>) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    match stream {
        Some(stream) => {
            thread::spawn(move || {
                let _ = tx.send(read_stream_to_string(stream));
            });
        }
        None => {
            let _ = tx.send(String::new());
        }
    }
    rx
}

/// Capture one pipe of the `output` command as text.
///
/// The outputs document is kept up to MAX_OUTPUT_SIZE. Anything beyond that
/// is consumed into a sink so the tool can finish writing and exit before
/// its timeout.
fn read_stream_to_string<R: Read>(mut stream: R) -> String {
    let mut buf = Vec::new();
    let read = stream
        .by_ref()
        .take(MAX_OUTPUT_SIZE as u64 + 1)
        .read_to_end(&mut buf);
    if read.is_err() && buf.is_empty() {
        return "[error reading output]".to_string();
    }

    if buf.len() > MAX_OUTPUT_SIZE {
        buf.truncate(MAX_OUTPUT_SIZE);
        let _ = io::copy(&mut stream, &mut io::sink());
        buf.extend_from_slice(b"\n[output truncated at 10MB]");
    }

    String::from_utf8_lossy(&buf).into_owned()
}

fn kill_child_process(child: &mut Child) {
    // The process may already have exited.
    let _ = child.kill();
    let _ = child.wait();
}
