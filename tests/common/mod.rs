//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use sevenmark_highlight::worker::ParseBackend;

/// Generous upper bound for anything a test waits on
pub const WAIT: Duration = Duration::from_secs(5);

/// The sample document in `samples/document.json`
pub const SAMPLE_TREE: &str = include_str!("../../samples/document.json");

/// A serialized `location` object
pub fn loc(start_line: u32, start_column: u32, end_line: u32, end_column: u32) -> Value {
    json!({
        "start_line": start_line,
        "start_column": start_column,
        "end_line": end_line,
        "end_column": end_column,
    })
}

/// A one-line `Bold` forest spanning `len` columns
pub fn bold_tree(len: u32) -> String {
    json!([{ "Bold": { "location": loc(1, 1, 1, 1 + len), "content": [] } }]).to_string()
}

/// Answers from a fixed text → result table and counts parse calls.
///
/// Unknown text parses to an empty forest.
#[derive(Clone, Default)]
pub struct ScriptedBackend {
    results: HashMap<String, Result<String, String>>,
    init_error: Option<String>,
    init_delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_result(mut self, text: &str, result: &str) -> Self {
        self.results.insert(text.to_string(), Ok(result.to_string()));
        self
    }

    pub fn with_error(mut self, text: &str, error: &str) -> Self {
        self.results.insert(text.to_string(), Err(error.to_string()));
        self
    }

    pub fn failing_init(mut self, error: &str) -> Self {
        self.init_error = Some(error.to_string());
        self
    }

    pub fn slow_init(mut self, delay: Duration) -> Self {
        self.init_delay = delay;
        self
    }

    /// Shared parse call counter; stays valid after the backend moves to the worker
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl ParseBackend for ScriptedBackend {
    fn init(&mut self, _module: &str) -> Result<(), String> {
        std::thread::sleep(self.init_delay);
        match &self.init_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn parse(&mut self, text: &str) -> Result<String, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.results
            .get(text)
            .cloned()
            .unwrap_or_else(|| Ok("[]".to_string()))
    }
}

/// Blocks every parse until the test releases it.
///
/// Each parse first announces its text on `started`, then waits for one
/// message on the release channel and returns `["<text>"]`.
pub struct GatedBackend {
    started: Sender<String>,
    release: Receiver<()>,
}

/// Test-side ends of a [`GatedBackend`]
pub struct Gate {
    pub started: Receiver<String>,
    release: Sender<()>,
}

impl Gate {
    /// Wait until the worker is inside `parse`, returning the text
    pub fn next_started(&self) -> String {
        self.started.recv_timeout(WAIT).expect("parse should start")
    }

    /// Let one parse finish
    pub fn release(&self) {
        self.release.send(()).expect("worker should be alive");
    }
}

pub fn gated_backend() -> (GatedBackend, Gate) {
    let (started_tx, started_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    (
        GatedBackend {
            started: started_tx,
            release: release_rx,
        },
        Gate {
            started: started_rx,
            release: release_tx,
        },
    )
}

impl ParseBackend for GatedBackend {
    fn init(&mut self, _module: &str) -> Result<(), String> {
        Ok(())
    }

    fn parse(&mut self, text: &str) -> Result<String, String> {
        let _ = self.started.send(text.to_string());
        self.release
            .recv()
            .map_err(|_| "gate dropped".to_string())?;
        Ok(json!([text]).to_string())
    }
}
