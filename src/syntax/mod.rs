//! SevenMark syntax highlighting
//!
//! Turns the parser's serialized tree into editor decorations.
//!
//! ## Architecture
//!
//! ```text
//! serialized forest (JSON) → Node::from_json → typed Node tree
//!                          → map_decorations → Vec<Decoration>
//!                          → folding_ranges  → Vec<FoldingRange>
//! ```
//!
//! Parsing itself happens on the worker thread (see [`crate::worker`]).

mod expr;
mod folding;
mod kinds;
mod location;
mod mapper;
mod styles;
mod tree;

pub use expr::{display_value, Binary, Call, Expr, Group, Literal, Operator, Unary};
pub use folding::{folding_ranges, FoldingKind, FoldingRange};
pub use kinds::{is_kind_name, ElementKind, ExprKind};
pub use location::{Decoration, HoverMessage, InlineDecoration, InlineOptions, Location};
pub use mapper::{decorate_json, map_decorations};
pub use styles::{MarkerPair, StyleTable, DEFAULT_NAMESPACE};
pub use tree::{Element, Node, Object};
