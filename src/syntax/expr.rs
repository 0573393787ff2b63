//! Condition expressions
//!
//! Expressions only appear in the `condition` of `IfElement` and
//! `Conditional`. Shapes that do not match the expected payload degrade to
//! missing operands or [`Expr::Unknown`] rather than failing.

use serde_json::{Map, Value};

use super::kinds::ExprKind;
use super::location::Location;
use super::tree::{single_kind, Node};

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Or(Binary),
    And(Binary),
    Not(Unary),
    Comparison(Binary),
    Group(Group),
    FunctionCall(Call),
    String(Literal),
    Number(Literal),
    Bool(Literal),
    Null(Option<Location>),
    /// Ordinary markup embedded in an expression
    Element(Node),
    Unknown,
}

/// An operator token such as `||` or `>=`
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    pub kind: String,
    pub location: Option<Location>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    pub operator: Option<Operator>,
    pub left: Option<Box<Expr>>,
    pub right: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unary {
    pub operator: Option<Operator>,
    pub inner: Option<Box<Expr>>,
}

/// A parenthesized expression; the location covers both parentheses
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub location: Option<Location>,
    pub inner: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub name: String,
    pub location: Option<Location>,
    pub arguments: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: Value,
    pub location: Option<Location>,
}

impl Expr {
    /// Convert a value found in expression position
    pub fn from_value(value: Value) -> Self {
        let Value::Object(map) = value else {
            return Expr::Unknown;
        };
        if !single_kind(&map) {
            return Expr::Unknown;
        }
        match map.into_iter().next() {
            Some((name, payload)) => match ExprKind::from_name(&name) {
                Some(kind) => Self::from_tagged(kind, payload),
                None => Expr::Unknown,
            },
            None => Expr::Unknown,
        }
    }

    pub fn from_tagged(kind: ExprKind, payload: Value) -> Self {
        if kind == ExprKind::Element {
            return Expr::Element(Node::from_value(payload));
        }

        let Value::Object(mut fields) = payload else {
            return Expr::Unknown;
        };
        let location = fields.get("location").and_then(Location::from_value);

        match kind {
            ExprKind::Or => Expr::Or(Binary::from_fields(&mut fields)),
            ExprKind::And => Expr::And(Binary::from_fields(&mut fields)),
            ExprKind::Comparison => Expr::Comparison(Binary::from_fields(&mut fields)),
            ExprKind::Not => Expr::Not(Unary {
                operator: operator(&fields),
                inner: operand(&mut fields, "inner"),
            }),
            ExprKind::Group => Expr::Group(Group {
                location,
                inner: operand(&mut fields, "inner"),
            }),
            ExprKind::FunctionCall => Expr::FunctionCall(Call {
                name: fields.get("name").map(display_value).unwrap_or_default(),
                location,
                arguments: match fields.remove("arguments") {
                    Some(Value::Array(args)) => args.into_iter().map(Expr::from_value).collect(),
                    _ => Vec::new(),
                },
            }),
            ExprKind::StringLiteral => Expr::String(Literal::new(&mut fields, location)),
            ExprKind::NumberLiteral => Expr::Number(Literal::new(&mut fields, location)),
            ExprKind::BoolLiteral => Expr::Bool(Literal::new(&mut fields, location)),
            ExprKind::Null => Expr::Null(location),
            ExprKind::Element => Expr::Unknown,
        }
    }
}

impl Binary {
    fn from_fields(fields: &mut Map<String, Value>) -> Self {
        Self {
            operator: operator(fields),
            left: operand(fields, "left"),
            right: operand(fields, "right"),
        }
    }
}

impl Literal {
    fn new(fields: &mut Map<String, Value>, location: Option<Location>) -> Self {
        Self {
            value: fields.remove("value").unwrap_or(Value::Null),
            location,
        }
    }
}

fn operator(fields: &Map<String, Value>) -> Option<Operator> {
    let op = fields.get("operator")?.as_object()?;
    Some(Operator {
        kind: op.get("kind").map(display_value).unwrap_or_default(),
        location: op.get("location").and_then(Location::from_value),
    })
}

fn operand(fields: &mut Map<String, Value>, name: &str) -> Option<Box<Expr>> {
    fields.remove(name).map(|value| Box::new(Expr::from_value(value)))
}

/// Render a scalar the way it reads in hover text
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn loc(col: u32, end: u32) -> Value {
        json!({"start_line": 1, "start_column": col, "end_line": 1, "end_column": end})
    }

    #[test]
    fn test_comparison_shape() {
        let expr = Expr::from_value(json!({"Comparison": {
            "operator": {"kind": ">", "location": loc(5, 6)},
            "left": {"NumberLiteral": {"value": 3, "location": loc(1, 2)}},
            "right": {"NumberLiteral": {"value": 1, "location": loc(7, 8)}}
        }}));

        let Expr::Comparison(binary) = expr else {
            panic!("Expected comparison");
        };
        let op = binary.operator.unwrap();
        assert_eq!(op.kind, ">");
        assert_eq!(op.location, Some(Location::new(1, 5, 1, 6)));
        assert!(matches!(binary.left.as_deref(), Some(Expr::Number(_))));
        assert!(matches!(binary.right.as_deref(), Some(Expr::Number(_))));
    }

    #[test]
    fn test_function_call_arguments_keep_order() {
        let expr = Expr::from_value(json!({"FunctionCall": {
            "name": "len",
            "location": loc(1, 10),
            "arguments": [
                {"StringLiteral": {"value": "a", "location": loc(5, 8)}},
                {"Null": {"location": loc(9, 10)}}
            ]
        }}));

        let Expr::FunctionCall(call) = expr else {
            panic!("Expected call");
        };
        assert_eq!(call.name, "len");
        assert!(matches!(call.arguments[0], Expr::String(_)));
        assert!(matches!(call.arguments[1], Expr::Null(Some(_))));
    }

    #[test]
    fn test_missing_operands_are_none() {
        let expr = Expr::from_value(json!({"Not": {}}));
        assert_eq!(
            expr,
            Expr::Not(Unary {
                operator: None,
                inner: None
            })
        );
    }

    #[test]
    fn test_unknown_shapes() {
        assert_eq!(Expr::from_value(json!("x")), Expr::Unknown);
        assert_eq!(Expr::from_value(json!({"Bold": {}})), Expr::Unknown);
        assert_eq!(Expr::from_value(json!({"Or": 3})), Expr::Unknown);
        assert_eq!(Expr::from_value(json!({"Or": {}, "And": {}})), Expr::Unknown);
    }

    #[test]
    fn test_element_escape_wraps_markup() {
        let expr = Expr::from_value(json!({"Element": {"Variable": {"location": loc(1, 4)}}}));
        assert!(matches!(expr, Expr::Element(Node::Element(_))));
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!("abc")), "abc");
        assert_eq!(display_value(&json!(2.5)), "2.5");
        assert_eq!(display_value(&json!(true)), "true");
    }
}
