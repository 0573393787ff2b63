//! Text → decorations, with a single-entry result cache
//!
//! Sits between the editor and the [`ParseClient`]: the editor hands over
//! the whole document on every change and gets decorations back, either
//! straight from the cache or later through [`DecorationProvider::poll`].

use crate::syntax::{decorate_json, Decoration, Node, StyleTable};
use crate::worker::{ParseClient, ParseError, PendingParse};

/// The last text that parsed and mapped successfully
#[derive(Debug, Clone)]
struct Cached {
    text: String,
    decorations: Vec<Decoration>,
}

#[derive(Debug)]
struct InFlight {
    text: String,
    pending: PendingParse,
}

pub struct DecorationProvider {
    client: ParseClient,
    styles: StyleTable,
    cache: Option<Cached>,
    in_flight: Option<InFlight>,
    reported_unavailable: bool,
}

impl DecorationProvider {
    pub fn new(client: ParseClient, styles: StyleTable) -> Self {
        Self {
            client,
            styles,
            cache: None,
            in_flight: None,
            reported_unavailable: false,
        }
    }

    pub fn styles(&self) -> &StyleTable {
        &self.styles
    }

    pub fn client(&self) -> &ParseClient {
        &self.client
    }

    /// Whether `text` would be answered from the cache
    pub fn is_cached(&self, text: &str) -> bool {
        self.cache.as_ref().is_some_and(|cached| cached.text == text)
    }

    /// Whether a parse is outstanding
    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Report a new document text.
    ///
    /// Returns the decorations right away when the text matches the last
    /// successful parse, or an empty set when no parse could be issued.
    /// Otherwise a parse is started and `None` is returned; its result
    /// arrives through [`poll`](Self::poll).
    pub fn update(&mut self, text: &str) -> Option<Vec<Decoration>> {
        if let Some(cached) = self.cache.as_ref().filter(|cached| cached.text == text) {
            tracing::trace!("Decoration cache hit ({} bytes)", text.len());
            self.in_flight = None;
            return Some(cached.decorations.clone());
        }

        if self
            .in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.text == text)
        {
            return None;
        }

        self.cache = None;
        match self.client.parse(text) {
            Ok(pending) => {
                tracing::debug!("Issued parse request {}", pending.id());
                self.in_flight = Some(InFlight {
                    text: text.to_string(),
                    pending,
                });
                None
            }
            Err(e) => {
                self.in_flight = None;
                self.report(&e);
                Some(Vec::new())
            }
        }
    }

    /// Non-blocking check for the outstanding parse
    pub fn poll(&mut self) -> Option<Vec<Decoration>> {
        let result = self.in_flight.as_ref()?.pending.try_result()?;
        let in_flight = self.in_flight.take()?;
        self.settle(in_flight.text, result)
    }

    /// Decorations for `text`, blocking until the parse settles
    pub fn request_decorations(&mut self, text: &str) -> Vec<Decoration> {
        if let Some(decorations) = self.update(text) {
            return decorations;
        }

        let Some(in_flight) = self.in_flight.take() else {
            return Vec::new();
        };
        let result = in_flight.pending.wait();
        self.settle(in_flight.text, result).unwrap_or_default()
    }

    /// Parse `text` and return the typed tree, bypassing the cache
    pub fn request_tree(&mut self, text: &str) -> Result<Node, ParseError> {
        self.in_flight = None;
        let json = self.client.parse(text)?.wait()?;
        Node::from_json(&json).map_err(|e| ParseError::MalformedResult(e.to_string()))
    }

    /// Stop the worker and forget everything
    pub fn shutdown(&mut self) {
        self.client.shutdown();
        self.cache = None;
        self.in_flight = None;
    }

    fn settle(
        &mut self,
        text: String,
        result: Result<String, ParseError>,
    ) -> Option<Vec<Decoration>> {
        match result {
            Ok(json) => match decorate_json(&json, &self.styles) {
                Ok(decorations) => {
                    tracing::debug!("Mapped {} decorations", decorations.len());
                    self.cache = Some(Cached {
                        text,
                        decorations: decorations.clone(),
                    });
                    Some(decorations)
                }
                Err(e) => {
                    self.report(&ParseError::MalformedResult(e.to_string()));
                    Some(Vec::new())
                }
            },
            Err(e) if e.is_superseded() => {
                tracing::trace!("{}", e);
                None
            }
            Err(e) => {
                self.report(&e);
                Some(Vec::new())
            }
        }
    }

    fn report(&mut self, error: &ParseError) {
        if !error.is_unavailable() {
            tracing::debug!("No highlighting for this revision: {}", error);
        } else if self.reported_unavailable {
            tracing::debug!("Highlighting unavailable: {}", error);
        } else {
            tracing::warn!("Highlighting unavailable: {}", error);
            self.reported_unavailable = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::DEFAULT_INIT_TIMEOUT;

    #[test]
    fn test_disconnected_client_yields_empty_set() {
        let client = ParseClient::disconnected(DEFAULT_INIT_TIMEOUT);
        let mut provider = DecorationProvider::new(client, StyleTable::default());
        assert_eq!(provider.update("'''x'''"), Some(Vec::new()));
        assert!(!provider.is_pending());
        assert!(!provider.is_cached("'''x'''"));
        assert!(provider.reported_unavailable);
    }

    #[test]
    fn test_poll_without_request() {
        let client = ParseClient::disconnected(DEFAULT_INIT_TIMEOUT);
        let mut provider = DecorationProvider::new(client, StyleTable::default());
        assert_eq!(provider.poll(), None);
    }

    #[test]
    fn test_request_tree_reports_unavailable() {
        let client = ParseClient::disconnected(DEFAULT_INIT_TIMEOUT);
        let mut provider = DecorationProvider::new(client, StyleTable::default());
        assert_eq!(
            provider.request_tree("x").unwrap_err(),
            ParseError::ChannelUnavailable
        );
    }
}
