//! Parse request manager
//!
//! Owns the only channel to the worker. Every request gets a fresh id and
//! becomes the *current* request; whatever was current before is rejected
//! as superseded on the spot. A completion is honored only if its id is
//! still current when it arrives, so results can never go backwards even if
//! the backend finishes out of order.
//!
//! ```text
//! parse(text) ──► Parse{id} ──► worker thread ──► Parsed{id} ──► dispatcher
//!      │                                                            │
//!      └── PendingParse ◄─────────── reply (if id still current) ◄──┘
//! ```

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use super::backend::ParseBackend;
use super::error::ParseError;
use super::protocol::{RequestId, WorkerRequest, WorkerResponse};
use super::thread::spawn_worker;

/// How long a parse call waits for the backend to finish initializing
pub const DEFAULT_INIT_TIMEOUT: Duration = Duration::from_millis(3000);

type Reply = Sender<Result<String, ParseError>>;

/// Lifecycle of the backend as seen by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientState {
    /// No worker was started
    Uninitialized,
    /// `init` sent, waiting for `initialized`
    Initializing,
    Ready,
    /// The backend reported an initialization error
    Failed(String),
    ShutDown,
}

struct Inner {
    state: ClientState,
    next_id: RequestId,
    current: Option<RequestId>,
    pending: HashMap<RequestId, Reply>,
}

impl Inner {
    fn complete(&mut self, request_id: RequestId, result: Result<String, ParseError>) {
        if self.current != Some(request_id) {
            tracing::trace!("Discarding stale completion for request {}", request_id);
            self.pending.remove(&request_id);
            return;
        }

        self.current = None;
        if let Some(reply) = self.pending.remove(&request_id) {
            if reply.send(result).is_err() {
                tracing::trace!("Request {} was abandoned by its caller", request_id);
            }
        }
    }

    fn reject_all(&mut self, error: ParseError) {
        self.current = None;
        for (_, reply) in self.pending.drain() {
            let _ = reply.send(Err(error.clone()));
        }
    }
}

struct Shared {
    inner: Mutex<Inner>,
    ready: Condvar,
}

impl Shared {
    fn new(state: ClientState) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state,
                next_id: 0,
                current: None,
                pending: HashMap::new(),
            }),
            ready: Condvar::new(),
        }
    }

    fn handle(&self, response: WorkerResponse) {
        let mut inner = self.inner.lock();
        match response {
            WorkerResponse::Initialized => {
                if inner.state == ClientState::Initializing {
                    tracing::info!("Parser initialized");
                    inner.state = ClientState::Ready;
                    self.ready.notify_all();
                }
            }
            WorkerResponse::Parsed { request_id, result } => {
                tracing::debug!("Request {} parsed ({} bytes)", request_id, result.len());
                inner.complete(request_id, Ok(result));
            }
            WorkerResponse::Error {
                request_id: Some(request_id),
                error,
            } => {
                tracing::debug!("Request {} failed: {}", request_id, error);
                inner.complete(request_id, Err(ParseError::Backend(error)));
            }
            WorkerResponse::Error {
                request_id: None,
                error,
            } => {
                if inner.state == ClientState::Initializing {
                    inner.state = ClientState::Failed(error);
                    self.ready.notify_all();
                } else {
                    tracing::warn!("Parse worker error: {}", error);
                }
            }
        }
    }
}

fn dispatch(shared: &Shared, responses: Receiver<WorkerResponse>) {
    for response in responses.iter() {
        shared.handle(response);
    }

    let mut inner = shared.inner.lock();
    if inner.state != ClientState::ShutDown {
        tracing::warn!("Parse worker exited unexpectedly");
        inner.state = ClientState::ShutDown;
    }
    inner.reject_all(ParseError::ChannelUnavailable);
    shared.ready.notify_all();
}

/// Handle to an in-flight parse request.
///
/// The outcome is delivered exactly once; dropping the handle abandons the
/// request without affecting the client.
#[derive(Debug)]
pub struct PendingParse {
    id: RequestId,
    reply: Receiver<Result<String, ParseError>>,
}

impl PendingParse {
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Non-blocking check; `None` while the request is still running
    pub fn try_result(&self) -> Option<Result<String, ParseError>> {
        match self.reply.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(ParseError::ChannelUnavailable)),
        }
    }

    /// Block until the request settles
    pub fn wait(self) -> Result<String, ParseError> {
        self.reply
            .recv()
            .unwrap_or(Err(ParseError::ChannelUnavailable))
    }

    /// Block for at most `timeout`; `None` if the request is still running
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Result<String, ParseError>> {
        match self.reply.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(ParseError::ChannelUnavailable)),
        }
    }
}

/// Client side of the parse worker
pub struct ParseClient {
    requests: Option<Sender<WorkerRequest>>,
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
    dispatcher: Option<JoinHandle<()>>,
    init_timeout: Duration,
}

impl ParseClient {
    /// Start a worker around `backend` and ask it to load `module`.
    ///
    /// Never fails: if the threads cannot be started the client comes up
    /// without a channel and every parse is rejected.
    pub fn spawn<B: ParseBackend>(
        backend: B,
        module: impl Into<String>,
        init_timeout: Duration,
    ) -> Self {
        let (request_tx, request_rx) = mpsc::channel();
        let (response_tx, response_rx) = mpsc::channel();

        let worker = match spawn_worker(backend, request_rx, response_tx) {
            Ok(handle) => handle,
            Err(e) => {
                tracing::error!("Failed to start parse worker: {}", e);
                return Self::disconnected(init_timeout);
            }
        };

        let shared = Arc::new(Shared::new(ClientState::Initializing));
        let dispatcher = {
            let shared = Arc::clone(&shared);
            thread::Builder::new()
                .name("sevenmark-dispatch".to_string())
                .spawn(move || dispatch(&shared, response_rx))
        };
        let dispatcher = match dispatcher {
            Ok(handle) => handle,
            Err(e) => {
                // Dropping `request_tx` stops the worker
                tracing::error!("Failed to start parse dispatcher: {}", e);
                return Self::disconnected(init_timeout);
            }
        };

        let module = module.into();
        tracing::debug!("Initializing parser backend with {}", module);
        if request_tx
            .send(WorkerRequest::Init { wasm_url: module })
            .is_err()
        {
            tracing::error!("Parse worker hung up before initialization");
            return Self::disconnected(init_timeout);
        }

        Self {
            requests: Some(request_tx),
            shared,
            worker: Some(worker),
            dispatcher: Some(dispatcher),
            init_timeout,
        }
    }

    /// A client with no worker behind it
    pub fn disconnected(init_timeout: Duration) -> Self {
        Self {
            requests: None,
            shared: Arc::new(Shared::new(ClientState::Uninitialized)),
            worker: None,
            dispatcher: None,
            init_timeout,
        }
    }

    pub fn state(&self) -> ClientState {
        self.shared.inner.lock().state.clone()
    }

    /// Id of the request whose result would currently be honored
    pub fn current_request(&self) -> Option<RequestId> {
        self.shared.inner.lock().current
    }

    /// Number of requests still waiting for an answer
    pub fn pending_count(&self) -> usize {
        self.shared.inner.lock().pending.len()
    }

    /// Submit `text` for parsing.
    ///
    /// Waits for backend initialization if it is still in progress, up to
    /// the configured timeout. Any request that is still pending is
    /// rejected with [`ParseError::Superseded`].
    pub fn parse(&self, text: &str) -> Result<PendingParse, ParseError> {
        let Some(requests) = &self.requests else {
            return Err(ParseError::ChannelUnavailable);
        };

        let mut inner = self.shared.inner.lock();
        if inner.state == ClientState::Initializing {
            tracing::debug!("Waiting for parser initialization");
            self.shared.ready.wait_while_for(
                &mut inner,
                |inner| inner.state == ClientState::Initializing,
                self.init_timeout,
            );
        }

        match &inner.state {
            ClientState::Ready => {}
            ClientState::Initializing => return Err(ParseError::InitializationTimeout),
            ClientState::Failed(error) => {
                return Err(ParseError::InitializationFailed(error.clone()))
            }
            ClientState::Uninitialized | ClientState::ShutDown => {
                return Err(ParseError::ChannelUnavailable)
            }
        }

        if let Some(previous) = inner.current.take() {
            if let Some(reply) = inner.pending.remove(&previous) {
                tracing::debug!("Request {} superseded", previous);
                let _ = reply.send(Err(ParseError::Superseded {
                    request_id: previous,
                }));
            }
        }

        inner.next_id += 1;
        let id = inner.next_id;
        let (reply_tx, reply_rx) = mpsc::channel();
        inner.pending.insert(id, reply_tx);
        inner.current = Some(id);

        let request = WorkerRequest::Parse {
            text: text.to_string(),
            request_id: id,
        };
        if requests.send(request).is_err() {
            inner.pending.remove(&id);
            inner.current = None;
            return Err(ParseError::ChannelUnavailable);
        }

        Ok(PendingParse {
            id,
            reply: reply_rx,
        })
    }

    /// Stop the worker and reject everything still pending.
    ///
    /// A parse already running on the worker is not interrupted; its result
    /// is dropped when it arrives.
    pub fn shutdown(&mut self) {
        let Some(requests) = self.requests.take() else {
            return;
        };

        {
            let mut inner = self.shared.inner.lock();
            inner.state = ClientState::ShutDown;
            inner.current = None;
            inner.pending.clear();
            self.shared.ready.notify_all();
        }

        let _ = requests.send(WorkerRequest::Shutdown);
        drop(requests);

        for handle in [self.worker.take(), self.dispatcher.take()]
            .into_iter()
            .flatten()
        {
            if handle.is_finished() {
                let _ = handle.join();
            }
        }
        tracing::debug!("Parse client shut down");
    }
}

impl Drop for ParseClient {
    fn drop(&mut self) {
        self.shutdown();
    }
}
