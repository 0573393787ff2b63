//! Source spans and decorations
//!
//! Locations come straight from the parser output and are 1-indexed on both
//! axes. The end position is exclusive.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A span in the source text (1-indexed lines and columns, exclusive end)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl Location {
    pub fn new(start_line: u32, start_column: u32, end_line: u32, end_column: u32) -> Self {
        Self {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    /// Read a location out of a serialized `location` field.
    ///
    /// Returns `None` for anything that does not deserialize or whose end
    /// lies before its start.
    pub fn from_value(value: &Value) -> Option<Self> {
        let location = Self::deserialize(value).ok()?;
        location.is_ordered().then_some(location)
    }

    /// Start must not come after end
    pub fn is_ordered(&self) -> bool {
        self.start_line < self.end_line
            || (self.start_line == self.end_line && self.start_column <= self.end_column)
    }

    /// Number of lines touched by this span
    pub fn line_count(&self) -> u32 {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    /// The first `len` columns of the start line
    pub fn prefix(&self, len: usize) -> Self {
        let len = u32::try_from(len).unwrap_or(u32::MAX);
        Self {
            start_line: self.start_line,
            start_column: self.start_column,
            end_line: self.start_line,
            end_column: self.start_column.saturating_add(len),
        }
    }

    /// The last `len` columns of the end line.
    ///
    /// A zero length collapses to the point at the end position.
    pub fn suffix(&self, len: usize) -> Self {
        let len = u32::try_from(len).unwrap_or(u32::MAX);
        Self {
            start_line: self.end_line,
            start_column: self.end_column.saturating_sub(len).max(1),
            end_line: self.end_line,
            end_column: self.end_column,
        }
    }
}

/// A highlight instruction for the host editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decoration {
    pub range: Location,
    /// Space-separated class list
    pub class_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover_message: Option<String>,
}

impl Decoration {
    pub fn new(range: Location, class_name: impl Into<String>, hover: impl Into<String>) -> Self {
        Self {
            range,
            class_name: class_name.into(),
            hover_message: Some(hover.into()),
        }
    }

    /// Convert into the inline-decoration shape editors consume
    pub fn to_inline(&self) -> InlineDecoration {
        InlineDecoration {
            range: self.range,
            options: InlineOptions {
                inline_class_name: self.class_name.clone(),
                hover_message: self.hover_message.clone().map(|value| HoverMessage { value }),
            },
        }
    }
}

/// `{range, options: {inlineClassName, hoverMessage: {value}}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineDecoration {
    pub range: Location,
    pub options: InlineOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineOptions {
    pub inline_class_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover_message: Option<HoverMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoverMessage {
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_location_from_value() {
        let value = json!({"start_line": 1, "start_column": 2, "end_line": 3, "end_column": 4});
        assert_eq!(Location::from_value(&value), Some(Location::new(1, 2, 3, 4)));
    }

    #[test]
    fn test_location_rejects_missing_fields() {
        let value = json!({"start_line": 1, "start_column": 2});
        assert_eq!(Location::from_value(&value), None);
        assert_eq!(Location::from_value(&json!("1:2")), None);
    }

    #[test]
    fn test_location_rejects_reversed_span() {
        let same_line = json!({"start_line": 2, "start_column": 9, "end_line": 2, "end_column": 3});
        let prior_line = json!({"start_line": 4, "start_column": 1, "end_line": 3, "end_column": 8});
        assert_eq!(Location::from_value(&same_line), None);
        assert_eq!(Location::from_value(&prior_line), None);
    }

    #[test]
    fn test_prefix_and_suffix() {
        let loc = Location::new(1, 1, 3, 4);
        assert_eq!(loc.prefix(8), Location::new(1, 1, 1, 9));
        assert_eq!(loc.suffix(3), Location::new(3, 1, 3, 4));
    }

    #[test]
    fn test_empty_suffix_is_a_point() {
        let loc = Location::new(5, 1, 5, 20);
        assert_eq!(loc.suffix(0), Location::new(5, 20, 5, 20));
    }

    #[test]
    fn test_decoration_serializes_camel_case() {
        let dec = Decoration::new(Location::new(1, 1, 1, 5), "sevenmark-bold", "Bold");
        let value = serde_json::to_value(&dec).unwrap();
        assert_eq!(value["className"], "sevenmark-bold");
        assert_eq!(value["hoverMessage"], "Bold");
        assert_eq!(value["range"]["end_column"], 5);
    }

    #[test]
    fn test_to_inline() {
        let dec = Decoration::new(Location::new(2, 3, 2, 7), "sevenmark-code", "CodeElement");
        let inline = serde_json::to_value(dec.to_inline()).unwrap();
        assert_eq!(inline["options"]["inlineClassName"], "sevenmark-code");
        assert_eq!(inline["options"]["hoverMessage"]["value"], "CodeElement");

        let bare = Decoration {
            hover_message: None,
            ..dec
        };
        let inline = serde_json::to_value(bare.to_inline()).unwrap();
        assert!(inline["options"].get("hoverMessage").is_none());
    }
}
