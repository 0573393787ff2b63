//! Typed view of the serialized parse forest
//!
//! The parser hands back JSON where every construct is a single-key mapping
//! `{"Kind": payload}`. That shape is converted once, here, into [`Node`] so
//! the mapper never has to guess what a mapping means.

use serde_json::{Map, Value};

use super::expr::Expr;
use super::kinds::{is_kind_name, ElementKind, ExprKind};
use super::location::Location;

/// One value of the parse forest
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A tagged markup construct
    Element(Box<Element>),
    /// An expression construct; ignored by the general walk
    Expr(Box<Expr>),
    /// An untagged mapping
    Object(Object),
    /// An ordered sequence
    Seq(Vec<Node>),
    /// String, number, boolean or null
    Scalar(Value),
}

impl Node {
    /// Parse a serialized forest
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from_value(value))
    }

    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => Node::Seq(items.into_iter().map(Node::from_value).collect()),
            Value::Object(map) if single_kind(&map) => match map.into_iter().next() {
                Some((kind, payload)) => Self::from_tagged(&kind, payload),
                None => Node::Object(Object::default()),
            },
            Value::Object(map) => Node::Object(Object::from_map(map)),
            scalar => Node::Scalar(scalar),
        }
    }

    fn from_tagged(kind: &str, payload: Value) -> Self {
        match ExprKind::from_name(kind) {
            Some(expr_kind) if expr_kind.is_skipped_by_general_walk() => {
                Node::Expr(Box::new(Expr::from_tagged(expr_kind, payload)))
            }
            _ => Node::Element(Box::new(Element::new(ElementKind::from_name(kind), payload))),
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Node::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Node::Scalar(value) => Some(value),
            _ => None,
        }
    }
}

/// Exactly one key, and that key names a kind
pub(crate) fn single_kind(map: &Map<String, Value>) -> bool {
    map.len() == 1 && map.keys().all(|key| is_kind_name(key))
}

/// A tagged construct and its payload
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub kind: ElementKind,
    pub payload: Node,
}

impl Element {
    pub fn new(kind: ElementKind, payload: Value) -> Self {
        let payload = match payload {
            Value::Object(map) if !single_kind(&map) => {
                Node::Object(Object::from_payload(map, kind.is_conditional()))
            }
            other => Node::from_value(other),
        };
        Self { kind, payload }
    }

    pub fn location(&self) -> Option<Location> {
        self.payload.as_object().and_then(|object| object.location)
    }

    pub fn field(&self, name: &str) -> Option<&Node> {
        self.payload.as_object().and_then(|object| object.get(name))
    }

    /// Heading level; missing or zero counts as 1
    pub fn level(&self) -> u64 {
        self.field("level")
            .and_then(Node::as_scalar)
            .and_then(Value::as_u64)
            .filter(|level| *level != 0)
            .unwrap_or(1)
    }

    /// The expression guarding an `IfElement` / `Conditional`
    pub fn condition(&self) -> Option<&Expr> {
        if !self.kind.is_conditional() {
            return None;
        }
        match self.field("condition") {
            Some(Node::Expr(expr)) => Some(expr),
            _ => None,
        }
    }
}

/// An untagged mapping.
///
/// The `location` field is lifted out so it is never walked as a node.
/// Other fields keep their serialized order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    pub location: Option<Location>,
    pub fields: Vec<(String, Node)>,
}

impl Object {
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self::from_payload(map, false)
    }

    fn from_payload(map: Map<String, Value>, conditional: bool) -> Self {
        let mut object = Object::default();
        for (key, value) in map {
            let node = match key.as_str() {
                "location" => {
                    object.location = Location::from_value(&value);
                    continue;
                }
                "condition" if conditional => Node::Expr(Box::new(Expr::from_value(value))),
                // Parameter maps are keyed by name, never by kind
                "parameters" => match value {
                    Value::Object(params) => Node::Object(Object::from_map(params)),
                    other => Node::from_value(other),
                },
                _ => Node::from_value(value),
            };
            object.fields.push((key, node));
        }
        object
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, node)| node)
    }

    /// A string field, if present
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Node::as_scalar).and_then(Value::as_str)
    }
}
