//! Channel to an optional external resolver child process.
//!
//! The child is spawned lazily on the first request and never restarted.
//! Requests and responses are newline-delimited JSON, one line each way. A
//! single lock spans write+flush+readline; two in-flight requests would
//! interleave on the pipe and corrupt the framing.

use crate::error::FatalError;
use heaps_js::FileKey;
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::Mutex;

pub struct ExternalResolver {
  program: PathBuf,
  channel: OnceCell<Mutex<Channel>>,
}

struct Channel {
  stdin: ChildStdin,
  stdout: BufReader<ChildStdout>,
  // Held so the process handle outlives the pipes.
  _child: Child,
}

impl ExternalResolver {
  pub fn new(program: PathBuf) -> ExternalResolver {
    ExternalResolver {
      program,
      channel: OnceCell::new(),
    }
  }

  /// Ask the resolver about `reference` imported from `importer`.
  ///
  /// `Ok(None)` covers every answer that defers to built-in resolution: an
  /// explicit no-opinion, a reported failure (result discarded), and an
  /// unresolved result. Transport errors and malformed shapes are fatal.
  pub fn resolve(&self, reference: &str, importer: &FileKey) -> Result<Option<String>, FatalError> {
    let channel = self.channel.get_or_try_init(|| self.spawn())?;
    let mut channel = channel.lock().unwrap();
    channel.round_trip(reference, importer)
  }

  fn spawn(&self) -> Result<Mutex<Channel>, FatalError> {
    tracing::debug!(program = %self.program.display(), "spawning external module resolver");
    // The parent ends of both pipes are close-on-exec as created, so they do
    // not leak into unrelated forks.
    let mut child = Command::new(&self.program)
      .stdin(Stdio::piped())
      .stdout(Stdio::piped())
      .spawn()
      .map_err(|err| FatalError::ExternalResolver(format!("failed to spawn: {err}")))?;
    let stdin = child
      .stdin
      .take()
      .ok_or_else(|| FatalError::ExternalResolver("resolver stdin unavailable".to_string()))?;
    let stdout = child
      .stdout
      .take()
      .ok_or_else(|| FatalError::ExternalResolver("resolver stdout unavailable".to_string()))?;
    Ok(Mutex::new(Channel {
      stdin,
      stdout: BufReader::new(stdout),
      _child: child,
    }))
  }
}

impl Channel {
  fn round_trip(&mut self, reference: &str, importer: &FileKey) -> Result<Option<String>, FatalError> {
    let request = serde_json::to_string(&(reference, importer.to_string()))
      .map_err(|err| FatalError::ExternalResolver(err.to_string()))?;
    let io_err = |err: std::io::Error| FatalError::ExternalResolver(err.to_string());
    self.stdin.write_all(request.as_bytes()).map_err(io_err)?;
    self.stdin.write_all(b"\n").map_err(io_err)?;
    self.stdin.flush().map_err(io_err)?;

    let mut line = String::new();
    let read = self.stdout.read_line(&mut line).map_err(io_err)?;
    if read == 0 {
      return Err(FatalError::ExternalResolver(
        "resolver closed its output".to_string(),
      ));
    }

    let value: Value =
      serde_json::from_str(line.trim_end()).map_err(|_| FatalError::InvalidResolution)?;
    match value {
      Value::Null => Ok(None),
      Value::Array(items) if items.len() == 2 => {
        let mut items = items.into_iter();
        let error = items.next().unwrap_or(Value::Null);
        let resolution = items.next().unwrap_or(Value::Null);
        if !error.is_null() {
          return Ok(None);
        }
        match resolution {
          Value::Null => Ok(None),
          Value::String(path) => Ok(Some(path)),
          _ => Err(FatalError::InvalidResolution),
        }
      }
      _ => Err(FatalError::InvalidResolution),
    }
  }
}

impl std::fmt::Debug for ExternalResolver {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ExternalResolver")
      .field("program", &self.program)
      .field("started", &self.channel.get().is_some())
      .finish()
  }
}
