//! Background parsing
//!
//! Parsing runs on a dedicated worker thread behind a message channel so the
//! caller never blocks on the parser itself. [`ParseClient`] numbers every
//! request and guarantees that only the newest one is ever answered.

mod backend;
mod client;
mod error;
mod protocol;
mod thread;

pub use backend::{CommandBackend, ParseBackend};
pub use client::{ClientState, ParseClient, PendingParse, DEFAULT_INIT_TIMEOUT};
pub use error::ParseError;
pub use protocol::{RequestId, WorkerRequest, WorkerResponse};
pub use thread::{spawn_worker, WORKER_THREAD_NAME};
