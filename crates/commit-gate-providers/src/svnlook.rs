// crates/commit-gate-providers/src/svnlook.rs
// ============================================================================
// Module: Svnlook Transaction Introspector
// Description: Transaction introspection backed by the `svnlook` binary.
// Purpose: Read changed paths, log, author, and file content of a transaction.
// Dependencies: commit-gate-core, serde
// ============================================================================

//! ## Overview
//! [`Svnlook`] runs `svnlook <subcommand> -t <txn> <repos> [path]` for every
//! read. Metadata reads are bounded by configured byte limits and must decode
//! as UTF-8; anything else fails closed. File content is returned as a
//! streaming [`SvnlookContent`] so large files are hashed without buffering.
//! A non-zero exit of `svnlook cat` surfaces as a read error once the stream
//! reaches end of file. Standard error is drained on a separate thread while
//! standard output is read, so a chatty `svnlook` cannot stall on a full pipe.
//! Security posture: process output is untrusted and size limited.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::process::Child;
use std::process::ChildStderr;
use std::process::ChildStdout;
use std::process::Command;
use std::process::ExitStatus;
use std::process::Stdio;
use std::thread;
use std::thread::JoinHandle;

use commit_gate_core::IntrospectionError;
use commit_gate_core::Repository;
use commit_gate_core::TransactionId;
use commit_gate_core::TransactionIntrospector;
use serde::Deserialize;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum bytes of an author name.
const MAX_AUTHOR_BYTES: usize = 4 * 1024;

/// Maximum bytes of `svnlook` diagnostics kept for error messages.
const MAX_STDERR_BYTES: usize = 16 * 1024;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the `svnlook` introspector.
///
/// # Invariants
/// - `max_listing_bytes` bounds `svnlook changed` output.
/// - `max_message_bytes` bounds `svnlook log` output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SvnlookConfig {
    /// Path or name of the `svnlook` binary.
    pub binary: PathBuf,
    /// Maximum bytes accepted from `svnlook changed`.
    pub max_listing_bytes: usize,
    /// Maximum bytes accepted from `svnlook log`.
    pub max_message_bytes: usize,
}

impl Default for SvnlookConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("svnlook"),
            max_listing_bytes: 8 * 1024 * 1024,
            max_message_bytes: 1024 * 1024,
        }
    }
}

// ============================================================================
// SECTION: Introspector
// ============================================================================

/// Transaction introspector that shells out to `svnlook`.
#[derive(Debug, Clone, Default)]
pub struct Svnlook {
    /// Binary location and output limits.
    config: SvnlookConfig,
}

impl Svnlook {
    /// Creates an introspector with the given configuration.
    #[must_use]
    pub const fn new(config: SvnlookConfig) -> Self {
        Self {
            config,
        }
    }

    /// Returns the introspector configuration.
    #[must_use]
    pub const fn config(&self) -> &SvnlookConfig {
        &self.config
    }

    /// Builds an `svnlook` command for one transaction.
    fn command(
        &self,
        subcommand: &str,
        repository: &Repository,
        transaction: &TransactionId,
    ) -> Command {
        let mut command = Command::new(&self.config.binary);
        command
            .arg(subcommand)
            .arg("-t")
            .arg(transaction.as_str())
            .arg(repository.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }

    /// Runs a metadata subcommand and returns its bounded UTF-8 output.
    fn run(
        &self,
        subcommand: &str,
        repository: &Repository,
        transaction: &TransactionId,
        max_bytes: usize,
    ) -> Result<String, IntrospectionError> {
        let mut child = self
            .command(subcommand, repository, transaction)
            .spawn()
            .map_err(|err| spawn_error(&self.config.binary, &err))?;
        let mut stderr = StderrDrain::spawn(child.stderr.take());
        let stdout = read_limited(child.stdout.take(), max_bytes);
        let stdout = match stdout {
            Ok(bytes) => bytes,
            Err(err) => {
                release(&mut child);
                return Err(IntrospectionError::InvalidOutput(format!(
                    "svnlook {subcommand}: {err}"
                )));
            }
        };
        let status = child
            .wait()
            .map_err(|err| IntrospectionError::Failed(format!("svnlook {subcommand}: {err}")))?;
        if !status.success() {
            let stderr = stderr.collect();
            return Err(IntrospectionError::Failed(exit_message(subcommand, status, &stderr)));
        }
        String::from_utf8(stdout).map_err(|_| {
            IntrospectionError::InvalidOutput(format!("svnlook {subcommand}: output is not UTF-8"))
        })
    }
}

impl TransactionIntrospector for Svnlook {
    fn changed_path_lines(
        &self,
        repository: &Repository,
        transaction: &TransactionId,
    ) -> Result<Vec<String>, IntrospectionError> {
        let output =
            self.run("changed", repository, transaction, self.config.max_listing_bytes)?;
        Ok(output.lines().map(str::to_string).collect())
    }

    fn commit_message(
        &self,
        repository: &Repository,
        transaction: &TransactionId,
    ) -> Result<String, IntrospectionError> {
        let output = self.run("log", repository, transaction, self.config.max_message_bytes)?;
        Ok(output.trim_end_matches(['\r', '\n']).to_string())
    }

    fn author(
        &self,
        repository: &Repository,
        transaction: &TransactionId,
    ) -> Result<String, IntrospectionError> {
        let output = self.run("author", repository, transaction, MAX_AUTHOR_BYTES)?;
        Ok(output.trim().to_string())
    }

    fn file_content<'a>(
        &'a self,
        repository: &Repository,
        transaction: &TransactionId,
        path: &str,
    ) -> Result<Box<dyn Read + 'a>, IntrospectionError> {
        let mut command = self.command("cat", repository, transaction);
        command.arg("--").arg(path);
        let mut child = command.spawn().map_err(|err| spawn_error(&self.config.binary, &err))?;
        let stderr = StderrDrain::spawn(child.stderr.take());
        let Some(stdout) = child.stdout.take() else {
            release(&mut child);
            return Err(IntrospectionError::Failed("svnlook cat: stdout unavailable".to_string()));
        };
        Ok(Box::new(SvnlookContent {
            child,
            stdout,
            stderr,
            path: path.to_string(),
            finished: false,
        }))
    }
}

// ============================================================================
// SECTION: Content Stream
// ============================================================================

/// Streaming output of `svnlook cat`.
///
/// # Invariants
/// - The child process is reaped on EOF or when the stream is dropped.
pub struct SvnlookContent {
    /// Running `svnlook cat` process.
    child: Child,
    /// Process standard output.
    stdout: ChildStdout,
    /// Background reader of the process standard error.
    stderr: StderrDrain,
    /// Repository-relative path being read.
    path: String,
    /// True once the process exit status has been collected.
    finished: bool,
}

impl Read for SvnlookContent {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.finished {
            return Ok(0);
        }
        let read = self.stdout.read(buf)?;
        if read > 0 || buf.is_empty() {
            return Ok(read);
        }
        let status = self.child.wait()?;
        self.finished = true;
        if status.success() {
            Ok(0)
        } else {
            let stderr = self.stderr.collect();
            Err(io::Error::other(format!(
                "{} ({})",
                exit_message("cat", status, &stderr),
                self.path
            )))
        }
    }
}

impl Drop for SvnlookContent {
    fn drop(&mut self) {
        if !self.finished {
            release(&mut self.child);
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads a pipe to EOF, failing when it exceeds `max_bytes`.
fn read_limited(pipe: Option<ChildStdout>, max_bytes: usize) -> io::Result<Vec<u8>> {
    let pipe = pipe.ok_or_else(|| io::Error::other("stdout unavailable"))?;
    let max_bytes_u64 = u64::try_from(max_bytes)
        .map_err(|_| io::Error::other("output size limit exceeds u64"))?;
    let mut buf = Vec::new();
    pipe.take(max_bytes_u64.saturating_add(1)).read_to_end(&mut buf)?;
    if buf.len() > max_bytes {
        return Err(io::Error::other(format!("output exceeds {max_bytes} bytes")));
    }
    Ok(buf)
}

/// Background reader that keeps a child's stderr pipe drained.
///
/// # Invariants
/// - The pipe is read to EOF; only the first [`MAX_STDERR_BYTES`] are kept.
struct StderrDrain {
    /// Reader thread; `None` once collected or when no pipe was available.
    handle: Option<JoinHandle<String>>,
}

impl StderrDrain {
    /// Starts draining `pipe`. A thread that cannot be started leaves the
    /// pipe closed, so `svnlook` sees a broken pipe instead of blocking.
    fn spawn(pipe: Option<ChildStderr>) -> Self {
        let handle = pipe.and_then(|pipe| {
            thread::Builder::new()
                .name("svnlook-stderr".to_string())
                .spawn(move || read_stderr(pipe))
                .ok()
        });
        Self {
            handle,
        }
    }

    /// Waits for the reader and returns the collected diagnostics.
    fn collect(&mut self) -> String {
        self.handle.take().and_then(|handle| handle.join().ok()).unwrap_or_default()
    }
}

/// Reads a stderr pipe to EOF, keeping bounded diagnostics.
fn read_stderr(mut pipe: ChildStderr) -> String {
    let mut buf = Vec::new();
    let limit = u64::try_from(MAX_STDERR_BYTES).unwrap_or(u64::MAX);
    let _ = pipe.by_ref().take(limit).read_to_end(&mut buf);
    let _ = io::copy(&mut pipe, &mut io::sink());
    String::from_utf8_lossy(&buf).trim().to_string()
}

/// Kills and reaps a child process, ignoring failures.
fn release(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Formats a non-zero exit.
fn exit_message(subcommand: &str, status: ExitStatus, stderr: &str) -> String {
    if stderr.is_empty() {
        format!("svnlook {subcommand} exited with {status}")
    } else {
        format!("svnlook {subcommand} exited with {status}: {stderr}")
    }
}

/// Maps a spawn failure.
fn spawn_error(binary: &Path, err: &io::Error) -> IntrospectionError {
    IntrospectionError::Spawn(format!("cannot run {}: {err}", binary.display()))
}
