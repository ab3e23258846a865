//! Markdown abstract syntax tree.
//!
//! Parsers produce a list of [`Node`]s: text, style nodes (carrying an ordered set of
//! [`TextStyle`] tags) and opaque grammar-specific nodes. [`flatten`] normalizes the list before
//! it reaches the renderer chain.

pub mod flatten;
pub mod nodes;

pub use flatten::flatten;
pub use nodes::{Node, OtherNode, StyleKind, StyleNode, TextStyle};
