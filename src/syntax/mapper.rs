//! Tree → decoration mapping
//!
//! Depth-first, pre-order walk over the parse forest. Block constructs are
//! highlighted at their markers, everything else across its full span.
//! Expressions are only visited from the condition of a conditional
//! construct, so no expression is ever decorated twice.

use super::expr::{display_value, Binary, Expr, Operator};
use super::location::{Decoration, Location};
use super::styles::StyleTable;
use super::tree::{Element, Node, Object};

/// Map a parse forest to decorations, in traversal order
pub fn map_decorations(root: &Node, styles: &StyleTable) -> Vec<Decoration> {
    let mut mapper = Mapper::new(styles);
    mapper.visit(root);
    mapper.finish()
}

/// Parse a serialized forest and map it
pub fn decorate_json(
    json: &str,
    styles: &StyleTable,
) -> Result<Vec<Decoration>, serde_json::Error> {
    let root = Node::from_json(json)?;
    Ok(map_decorations(&root, styles))
}

struct Mapper<'a> {
    styles: &'a StyleTable,
    decorations: Vec<Decoration>,
}

impl<'a> Mapper<'a> {
    fn new(styles: &'a StyleTable) -> Self {
        Self {
            styles,
            decorations: Vec::new(),
        }
    }

    fn finish(self) -> Vec<Decoration> {
        self.decorations
    }

    fn push(&mut self, range: Location, class_name: String, hover: String) {
        self.decorations.push(Decoration::new(range, class_name, hover));
    }

    fn visit(&mut self, node: &Node) {
        match node {
            Node::Seq(items) => {
                for item in items {
                    self.visit(item);
                }
            }
            Node::Element(element) => self.visit_element(element),
            Node::Object(object) => self.visit_object(object),
            // Expressions are reached through `visit_expr` only
            Node::Expr(_) | Node::Scalar(_) => {}
        }
    }

    fn visit_element(&mut self, element: &Element) {
        if let Some(location) = element.location() {
            if !element.kind.is_invisible() {
                self.decorate_element(element, location);
            }
        }

        if let Some(condition) = element.condition() {
            self.visit_expr(condition);
        }

        self.visit(&element.payload);
    }

    fn decorate_element(&mut self, element: &Element, location: Location) {
        let class_name = self.styles.class_for(element);
        let kind = element.kind.name();

        match self.styles.markers(&element.kind) {
            Some(markers) => {
                let start = location.prefix(markers.start.chars().count());
                let end = location.suffix(markers.end.chars().count());
                self.push(start, class_name.clone(), format!("{} start", kind));
                self.push(end, class_name, format!("{} end", kind));
            }
            None => self.push(location, class_name, kind.to_string()),
        }
    }

    fn visit_object(&mut self, object: &Object) {
        for (key, value) in &object.fields {
            match (key.as_str(), value) {
                ("parameters", Node::Object(params)) => self.visit_parameters(params),
                _ => self.visit(value),
            }
        }
    }

    fn visit_parameters(&mut self, params: &Object) {
        for (name, param) in &params.fields {
            if let Some(location) = param.as_object().and_then(|p| p.location) {
                let label = param
                    .as_object()
                    .and_then(|p| p.get_str("key"))
                    .unwrap_or(name.as_str());
                let suffixes = format!("parameter parameter-{}", name.to_lowercase());
                let class_name = self.styles.class(&suffixes);
                self.push(location, class_name, format!("Parameter: {}", label));
            }
            self.visit(param);
        }
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Or(binary) | Expr::And(binary) => {
                self.operator(binary.operator.as_ref(), "expr-logical", "Logical");
                self.visit_operands(binary);
            }
            Expr::Comparison(binary) => {
                self.operator(binary.operator.as_ref(), "expr-operator", "Operator");
                self.visit_operands(binary);
            }
            Expr::Not(unary) => {
                self.operator(unary.operator.as_ref(), "expr-not", "Logical");
                if let Some(inner) = &unary.inner {
                    self.visit_expr(inner);
                }
            }
            Expr::Group(group) => {
                if let Some(location) = group.location {
                    let class_name = self.styles.class("expr-group");
                    self.push(location.prefix(1), class_name.clone(), "Group (".to_string());
                    self.push(location.suffix(1), class_name, "Group )".to_string());
                }
                if let Some(inner) = &group.inner {
                    self.visit_expr(inner);
                }
            }
            Expr::FunctionCall(call) => {
                if let Some(location) = call.location {
                    let class_name = self.styles.class("expr-function");
                    self.push(location, class_name, format!("Function: {}", call.name));
                }
                for argument in &call.arguments {
                    self.visit_expr(argument);
                }
            }
            Expr::String(literal) => {
                if let Some(location) = literal.location {
                    let hover = format!("String: \"{}\"", display_value(&literal.value));
                    self.push(location, self.styles.class("expr-string"), hover);
                }
            }
            Expr::Number(literal) => {
                if let Some(location) = literal.location {
                    let hover = format!("Number: {}", display_value(&literal.value));
                    self.push(location, self.styles.class("expr-number"), hover);
                }
            }
            Expr::Bool(literal) => {
                if let Some(location) = literal.location {
                    let hover = format!("Boolean: {}", display_value(&literal.value));
                    self.push(location, self.styles.class("expr-bool"), hover);
                }
            }
            Expr::Null(location) => {
                if let Some(location) = *location {
                    self.push(location, self.styles.class("expr-null"), "Null".to_string());
                }
            }
            Expr::Element(node) => self.visit(node),
            Expr::Unknown => {}
        }
    }

    fn operator(&mut self, operator: Option<&Operator>, class: &str, label: &str) {
        let Some(operator) = operator else {
            return;
        };
        if let Some(location) = operator.location {
            let hover = format!("{}: {}", label, operator.kind);
            self.push(location, self.styles.class(class), hover);
        }
    }

    fn visit_operands(&mut self, binary: &Binary) {
        if let Some(left) = &binary.left {
            self.visit_expr(left);
        }
        if let Some(right) = &binary.right {
            self.visit_expr(right);
        }
    }
}
