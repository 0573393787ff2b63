//! Style classes and block markers per node kind
//!
//! The tables are data, not code: every entry can be overridden from the
//! user config, and kinds without an entry fall back to
//! `<namespace>-<lowercased kind>`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::kinds::ElementKind;
use super::tree::Element;

pub const DEFAULT_NAMESPACE: &str = "sevenmark";

/// Kind name → space-separated class suffixes. `{level}` expands to the
/// heading level.
const DEFAULT_CLASSES: &[(&str, &str)] = &[
    ("Header", "header header-{level}"),
    ("BoldItalic", "bold italic"),
    ("CodeElement", "code"),
    ("LiteralElement", "literal"),
    ("FoldElement", "fold"),
    ("TableElement", "table"),
    ("BlockQuoteElement", "quote"),
    ("StyledElement", "styled"),
];

/// Kinds highlighted only at their opening and closing markers
const DEFAULT_MARKERS: &[(&str, &str, &str)] = &[
    ("FoldElement", "{{{#fold", "}}}"),
    ("TableElement", "{{{#table", "}}}"),
    ("ListElement", "{{{#list", "}}}"),
    ("BlockQuoteElement", "{{{#quote", "}}}"),
    ("StyledElement", "{{{", "}}}"),
    ("Include", "{{{", "}}}"),
    ("IncludeElement", "{{{#include", "}}}"),
    ("CategoryElement", "[[Category:", "]]"),
    ("RedirectElement", "#REDIRECT", ""),
    ("IfElement", "{{{#if", "}}}"),
    ("DefineElement", "{{{#define", "}}}"),
];

/// Literal opening/closing text of a block construct
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerPair {
    pub start: String,
    #[serde(default)]
    pub end: String,
}

impl MarkerPair {
    pub fn new(start: &str, end: &str) -> Self {
        Self {
            start: start.to_string(),
            end: end.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyleTable {
    namespace: String,
    classes: HashMap<String, String>,
    markers: HashMap<String, MarkerPair>,
}

impl Default for StyleTable {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            classes: DEFAULT_CLASSES
                .iter()
                .map(|(kind, classes)| (kind.to_string(), classes.to_string()))
                .collect(),
            markers: DEFAULT_MARKERS
                .iter()
                .map(|(kind, start, end)| (kind.to_string(), MarkerPair::new(start, end)))
                .collect(),
        }
    }
}

impl StyleTable {
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn set_class(&mut self, kind: impl Into<String>, classes: impl Into<String>) {
        self.classes.insert(kind.into(), classes.into());
    }

    pub fn set_markers(&mut self, kind: impl Into<String>, markers: MarkerPair) {
        self.markers.insert(kind.into(), markers);
    }

    /// Marker pair for a marker-highlighted kind, `None` for full-range kinds
    pub fn markers(&self, kind: &ElementKind) -> Option<&MarkerPair> {
        self.markers.get(kind.name())
    }

    /// Full class list for an element
    pub fn class_for(&self, element: &Element) -> String {
        let name = element.kind.name();
        match self.classes.get(name) {
            Some(template) if template.contains("{level}") => {
                self.class(&template.replace("{level}", &element.level().to_string()))
            }
            Some(template) => self.class(template),
            None => self.class(&name.to_lowercase()),
        }
    }

    /// Prefix each space-separated suffix with the namespace
    pub fn class(&self, suffixes: &str) -> String {
        suffixes
            .split_whitespace()
            .map(|suffix| format!("{}-{}", self.namespace, suffix))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
