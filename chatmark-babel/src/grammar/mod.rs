//! Rule-based markdown parsing
//!
//!     The renderer chain only consumes the generic AST ([`crate::ast::Node`]); how that AST is
//!     produced is behind the [`Parser`] trait so hosts can bring their own grammar engine.
//!
//!     The contract is `parse(source, mode, rules) -> Vec<Node>`:
//!         - `rules` is an ordered list of matchers tried at each scan position; the first rule
//!           that matches wins, so rule order is priority order.
//!         - `mode` is an opaque token rules may consult. [`ParseMode::Quote`] is used when the
//!           renderer re-parses the inner content of a block quote, which stops quote rules from
//!           nesting.
//!         - a rule may ask for a sub-span of its match to be parsed recursively; the result
//!           becomes the children of the rule's node.
//!
//!     [`RuleParser`] is the bundled engine and [`discord`] the bundled chat markdown grammar.

pub mod discord;
pub mod engine;

pub use engine::RuleParser;

use crate::ast::Node;
use crate::error::TranscodeError;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// Distinguishes top-level parsing from parsing inside a block quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    #[default]
    Default,
    Quote,
}

/// What a rule sees when it is asked to match
#[derive(Debug, Clone, Copy)]
pub struct ParseState<'a> {
    pub mode: ParseMode,
    /// Source consumed by the previous match, or by the enclosing match for the first node of a
    /// nested span; `None` at the very start of the input
    pub previous: Option<&'a str>,
}

impl ParseState<'_> {
    /// Whether the scan position is at the beginning of a line
    pub fn at_line_start(&self) -> bool {
        self.previous.map_or(true, |prev| prev.ends_with('\n'))
    }
}

/// Span of a match to be parsed into the node's children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerSpan {
    /// Byte range relative to the start of the match
    pub range: Range<usize>,
    pub mode: ParseMode,
}

/// A successful rule application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    /// Bytes consumed from the scan position; always greater than zero
    pub length: usize,
    pub node: Node,
    pub inner: Option<InnerSpan>,
}

impl RuleMatch {
    pub fn leaf(length: usize, node: Node) -> Self {
        Self {
            length,
            node,
            inner: None,
        }
    }

    pub fn nested(length: usize, node: Node, range: Range<usize>, mode: ParseMode) -> Self {
        Self {
            length,
            node,
            inner: Some(InnerSpan { range, mode }),
        }
    }
}

/// A single grammar rule
pub trait Rule: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Try to match at the start of `source`
    fn apply(&self, source: &str, state: &ParseState<'_>) -> Option<RuleMatch>;
}

/// Ordered rule list, highest priority first
pub type RuleSet = Vec<Arc<dyn Rule>>;

/// A markdown parser producing the generic AST
pub trait Parser: Send + Sync + fmt::Debug {
    fn parse(
        &self,
        source: &str,
        mode: ParseMode,
        rules: &[Arc<dyn Rule>],
        debug: bool,
    ) -> Result<Vec<Node>, TranscodeError>;
}
