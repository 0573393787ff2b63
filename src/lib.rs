//! SevenMark highlighting
//!
//! Turns SevenMark documents into editor decorations. Parsing runs on a
//! background worker; the resulting tree is mapped to highlight ranges with
//! style classes and hover text.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod provider;
pub mod syntax;
pub mod tracing;
pub mod worker;

// Re-export commonly used types
pub use config::HighlightConfig;
pub use provider::DecorationProvider;
pub use syntax::{Decoration, Location, StyleTable};
pub use worker::{ParseClient, ParseError};
