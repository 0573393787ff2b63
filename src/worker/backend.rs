//! Parser backends
//!
//! A backend is whatever actually turns SevenMark text into a serialized
//! tree. It runs on the worker thread only, so it needs `Send` but not `Sync`.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Pure `text → serialized tree` function with a one-time setup step
pub trait ParseBackend: Send + 'static {
    /// Load the parser module. Called once, before any `parse`.
    fn init(&mut self, module: &str) -> Result<(), String>;

    /// Parse `text` into a serialized forest
    fn parse(&mut self, text: &str) -> Result<String, String>;
}

/// Runs an external parser executable.
///
/// The text is written to the program's stdin and the serialized forest is
/// read from its stdout. A non-zero exit status is a parse error carrying
/// the program's stderr.
#[derive(Debug, Clone, Default)]
pub struct CommandBackend {
    args: Vec<String>,
    program: Option<PathBuf>,
}

impl CommandBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extra arguments passed on every invocation
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    fn run(&self, program: &Path, input: &str) -> Result<String, String> {
        let mut child = Command::new(program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| format!("Failed to start {}: {}", program.display(), e))?;

        // Feed stdin from a separate thread so a chatty parser cannot
        // deadlock against a full stdout pipe.
        let writer = child.stdin.take().map(|mut stdin| {
            let input = input.to_string();
            std::thread::spawn(move || stdin.write_all(input.as_bytes()))
        });

        let output = child
            .wait_with_output()
            .map_err(|e| format!("Failed to read parser output: {}", e))?;

        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::debug!("Parser closed stdin early: {}", e),
                Err(_) => tracing::warn!("Parser stdin writer panicked"),
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(if stderr.is_empty() {
                format!("Parser exited with {}", output.status)
            } else {
                stderr
            });
        }

        String::from_utf8(output.stdout).map_err(|e| format!("Parser output is not UTF-8: {}", e))
    }
}

impl ParseBackend for CommandBackend {
    fn init(&mut self, module: &str) -> Result<(), String> {
        let program = PathBuf::from(module);
        // Probe once with empty input so a broken install fails here, not
        // on the first keystroke.
        self.run(&program, "")?;
        tracing::info!("Parser backend ready: {}", program.display());
        self.program = Some(program);
        Ok(())
    }

    fn parse(&mut self, text: &str) -> Result<String, String> {
        let program = self
            .program
            .as_ref()
            .ok_or_else(|| "parser not initialized".to_string())?;
        self.run(program, text)
    }
}
