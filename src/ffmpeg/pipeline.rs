//! FFmpeg child process management.
//!
//! Spawns FFmpeg tools with a raw-video pipe on stdin or stdout, drains their
//! stderr into the log, and makes sure the process is gone when the
//! [`Pipeline`] is dropped.

use std::io::{self, BufRead, BufReader};
use std::process::{Child, ChildStdin, ChildStdout, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Errors that can occur during pipeline operations
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Executable not found on PATH
    #[error(
        "{0} not found. Please install FFmpeg (https://ffmpeg.org/download.html) \
         or set its path in the [tools] section of the config file"
    )]
    NotFound(String),

    #[error("Failed to spawn {program}: {source}")]
    SpawnFailed {
        program: String,
        source: io::Error,
    },

    /// Process exited with non-zero status
    #[error("{program} exited with code {exit_code:?}\n{stderr}")]
    ProcessFailed {
        program: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Which end of the child carries raw video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipeMode {
    /// We read frames from the child's stdout
    Read,
    /// We write frames to the child's stdin
    Write,
}

/// A running FFmpeg tool process.
pub struct Pipeline {
    program: String,
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: Option<ChildStdout>,
    /// Handle for the stderr reader thread
    stderr_thread: Option<JoinHandle<Vec<String>>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("program", &self.program)
            .field("pid", &self.child.id())
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Spawn `program` with `args`, piping raw video in the given direction.
    pub fn spawn(program: &str, args: &[String], mode: PipeMode) -> Result<Self, PipelineError> {
        log::debug!("Spawning {} {}", program, args.join(" "));

        let mut cmd = Command::new(program);
        cmd.args(args).stderr(Stdio::piped());
        own_process_group(&mut cmd);
        match mode {
            PipeMode::Read => cmd.stdin(Stdio::null()).stdout(Stdio::piped()),
            PipeMode::Write => cmd.stdin(Stdio::piped()).stdout(Stdio::null()),
        };

        let mut child = cmd.spawn().map_err(|e| spawn_error(program, e))?;

        let stderr_thread = child.stderr.take().map(|stderr| {
            let tag = program.to_string();
            thread::spawn(move || {
                let reader = BufReader::new(stderr);
                let mut lines = Vec::new();
                for line in reader.lines() {
                    match line {
                        Ok(l) => {
                            log::debug!("[{}] {}", tag, l);
                            lines.push(l);
                        }
                        Err(_) => break,
                    }
                }
                lines
            })
        });

        Ok(Pipeline {
            program: program.to_string(),
            stdin: child.stdin.take(),
            stdout: child.stdout.take(),
            child,
            stderr_thread,
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// The child's stdin, present in [`PipeMode::Write`] until closed.
    pub fn stdin(&mut self) -> Option<&mut ChildStdin> {
        self.stdin.as_mut()
    }

    /// The child's stdout, present in [`PipeMode::Read`].
    pub fn stdout(&mut self) -> Option<&mut ChildStdout> {
        self.stdout.as_mut()
    }

    /// Check if the process is still running.
    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    /// Wait for the process to complete and return the exit status.
    pub fn wait(&mut self) -> Result<ExitStatus, PipelineError> {
        self.child.wait().map_err(PipelineError::Io)
    }

    /// Close stdin, wait for exit, and fail if the process did not succeed.
    ///
    /// This is how an encoder gets to finalize its output file.
    pub fn finish(&mut self) -> Result<(), PipelineError> {
        self.stdin = None;
        let status = self.wait()?;
        if status.success() {
            return Ok(());
        }
        Err(PipelineError::ProcessFailed {
            program: self.program.clone(),
            exit_code: status.code(),
            stderr: self.take_stderr_output().join("\n"),
        })
    }

    /// Stop the process early.
    ///
    /// Drops both pipes, sends SIGINT and waits up to two seconds before
    /// killing it.
    pub fn shutdown(&mut self) -> Result<ExitStatus, PipelineError> {
        self.stdin = None;
        self.stdout = None;

        if let Ok(Some(status)) = self.child.try_wait() {
            return Ok(status);
        }

        #[cfg(unix)]
        {
            // SAFETY: plain signal delivery to our own child's pid
            unsafe {
                libc::kill(self.child.id() as i32, libc::SIGINT);
            }
        }

        #[cfg(not(unix))]
        {
            let _ = self.child.kill();
        }

        let start = Instant::now();
        let timeout = Duration::from_secs(2);

        loop {
            match self.child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) => {
                    if start.elapsed() > timeout {
                        let _ = self.child.kill();
                        return self.child.wait().map_err(PipelineError::Io);
                    }
                    thread::sleep(Duration::from_millis(20));
                }
                Err(e) => return Err(PipelineError::Io(e)),
            }
        }
    }

    /// Get the collected stderr output after the process has finished.
    pub fn take_stderr_output(&mut self) -> Vec<String> {
        self.stderr_thread
            .take()
            .and_then(|h| h.join().ok())
            .unwrap_or_default()
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        if self.is_running() {
            let _ = self.shutdown();
        }
    }
}

/// Start children in their own process group.
///
/// A terminal Ctrl+C then reaches only this process, which stops its loop and
/// finalizes the children itself (`shutdown` signals them directly).
fn own_process_group(cmd: &mut Command) {
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }
    #[cfg(not(unix))]
    let _ = cmd;
}

fn spawn_error(program: &str, e: io::Error) -> PipelineError {
    if e.kind() == io::ErrorKind::NotFound {
        PipelineError::NotFound(program.to_string())
    } else {
        PipelineError::SpawnFailed {
            program: program.to_string(),
            source: e,
        }
    }
}

/// Run `program` to completion and return its stdout.
///
/// Non-zero exit is a [`PipelineError::ProcessFailed`] carrying stderr.
pub fn run_to_output(program: &str, args: &[String]) -> Result<Vec<u8>, PipelineError> {
    log::debug!("Running {} {}", program, args.join(" "));

    let mut cmd = Command::new(program);
    cmd.args(args).stdin(Stdio::null());
    own_process_group(&mut cmd);
    let output = cmd.output().map_err(|e| spawn_error(program, e))?;

    if !output.status.success() {
        return Err(PipelineError::ProcessFailed {
            program: program.to_string(),
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(output.stdout)
}
