//! The parse worker loop
//!
//! Owns the backend and answers requests in order. Parse requests that are
//! already replaced by a newer queued one are dropped without running, which
//! is as far as cancellation goes: a parse that has started always finishes.

use std::collections::VecDeque;
use std::io;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use super::backend::ParseBackend;
use super::protocol::{WorkerRequest, WorkerResponse};

pub const WORKER_THREAD_NAME: &str = "sevenmark-parse";

/// Spawn the worker thread
pub fn spawn_worker<B: ParseBackend>(
    backend: B,
    requests: Receiver<WorkerRequest>,
    responses: Sender<WorkerResponse>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(WORKER_THREAD_NAME.to_string())
        .spawn(move || run_worker(backend, requests, responses))
}

fn run_worker<B: ParseBackend>(
    mut backend: B,
    requests: Receiver<WorkerRequest>,
    responses: Sender<WorkerResponse>,
) {
    tracing::debug!("Parse worker started");
    let mut initialized = false;
    let mut backlog: VecDeque<WorkerRequest> = VecDeque::new();

    loop {
        let request = match backlog.pop_front() {
            Some(request) => request,
            None => match requests.recv() {
                Ok(request) => request,
                Err(_) => break,
            },
        };
        backlog.extend(requests.try_iter());

        let response = match request {
            WorkerRequest::Init { wasm_url } => match backend.init(&wasm_url) {
                Ok(()) => {
                    initialized = true;
                    WorkerResponse::Initialized
                }
                Err(error) => {
                    tracing::error!("Parser initialization failed: {}", error);
                    WorkerResponse::Error {
                        request_id: None,
                        error,
                    }
                }
            },
            WorkerRequest::Parse { text, request_id } => {
                let replaced = backlog
                    .iter()
                    .any(|queued| matches!(queued, WorkerRequest::Parse { .. }));
                if replaced {
                    tracing::trace!("Skipping parse {}: newer request queued", request_id);
                    continue;
                }
                if !initialized {
                    WorkerResponse::Error {
                        request_id: Some(request_id),
                        error: "parser not initialized".to_string(),
                    }
                } else {
                    tracing::debug!("Parsing request {} ({} bytes)", request_id, text.len());
                    match backend.parse(&text) {
                        Ok(result) => WorkerResponse::Parsed { request_id, result },
                        Err(error) => WorkerResponse::Error {
                            request_id: Some(request_id),
                            error,
                        },
                    }
                }
            }
            WorkerRequest::Shutdown => break,
        };

        if responses.send(response).is_err() {
            break;
        }
    }

    tracing::debug!("Parse worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    /// Echoes the input wrapped in brackets; can be told to fail
    struct EchoBackend {
        fail_init: bool,
    }

    impl ParseBackend for EchoBackend {
        fn init(&mut self, _module: &str) -> Result<(), String> {
            if self.fail_init {
                Err("no module".to_string())
            } else {
                Ok(())
            }
        }

        fn parse(&mut self, text: &str) -> Result<String, String> {
            if text == "bad" {
                Err("unexpected token".to_string())
            } else {
                Ok(format!("[{}]", text))
            }
        }
    }

    fn start(fail_init: bool) -> (Sender<WorkerRequest>, Receiver<WorkerResponse>, JoinHandle<()>) {
        let (req_tx, req_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let handle = spawn_worker(EchoBackend { fail_init }, req_rx, resp_tx).unwrap();
        (req_tx, resp_rx, handle)
    }

    fn next(rx: &Receiver<WorkerResponse>) -> WorkerResponse {
        rx.recv_timeout(Duration::from_secs(5)).expect("worker response")
    }

    #[test]
    fn test_init_then_parse() {
        let (tx, rx, handle) = start(false);
        tx.send(WorkerRequest::Init {
            wasm_url: "mod".to_string(),
        })
        .unwrap();
        assert_eq!(next(&rx), WorkerResponse::Initialized);

        tx.send(WorkerRequest::Parse {
            text: "1".to_string(),
            request_id: 1,
        })
        .unwrap();
        assert_eq!(
            next(&rx),
            WorkerResponse::Parsed {
                request_id: 1,
                result: "[1]".to_string()
            }
        );

        tx.send(WorkerRequest::Shutdown).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn test_parse_before_init_is_an_error() {
        let (tx, rx, _handle) = start(false);
        tx.send(WorkerRequest::Parse {
            text: "1".to_string(),
            request_id: 9,
        })
        .unwrap();
        assert_eq!(
            next(&rx),
            WorkerResponse::Error {
                request_id: Some(9),
                error: "parser not initialized".to_string()
            }
        );
    }

    #[test]
    fn test_init_failure_has_no_request_id() {
        let (tx, rx, _handle) = start(true);
        tx.send(WorkerRequest::Init {
            wasm_url: "mod".to_string(),
        })
        .unwrap();
        assert!(matches!(
            next(&rx),
            WorkerResponse::Error {
                request_id: None,
                ..
            }
        ));
    }

    #[test]
    fn test_backend_error_is_forwarded() {
        let (tx, rx, _handle) = start(false);
        tx.send(WorkerRequest::Init {
            wasm_url: "mod".to_string(),
        })
        .unwrap();
        next(&rx);
        tx.send(WorkerRequest::Parse {
            text: "bad".to_string(),
            request_id: 2,
        })
        .unwrap();
        assert_eq!(
            next(&rx),
            WorkerResponse::Error {
                request_id: Some(2),
                error: "unexpected token".to_string()
            }
        );
    }

    #[test]
    fn test_worker_stops_when_client_hangs_up() {
        let (tx, _rx, handle) = start(false);
        drop(tx);
        handle.join().unwrap();
    }
}
