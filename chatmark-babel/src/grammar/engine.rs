//! The bundled rule engine.
//!
//! Scans left to right; at each position the rules are tried in order and the first match
//! produces a node. Nested spans are parsed recursively with the mode the rule asked for, up to
//! `max_depth` levels.

use super::{ParseMode, ParseState, Parser, Rule};
use crate::ast::Node;
use crate::error::TranscodeError;
use crate::DEFAULT_MAX_DEPTH;
use std::sync::Arc;
use tracing::{debug, warn};

/// First-match-wins rule parser
#[derive(Debug, Clone, Copy)]
pub struct RuleParser {
    max_depth: usize,
}

impl RuleParser {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    fn parse_span<'s>(
        &self,
        source: &'s str,
        mode: ParseMode,
        enclosing: Option<&'s str>,
        rules: &[Arc<dyn Rule>],
        debug: bool,
        depth: usize,
    ) -> Result<Vec<Node>, TranscodeError> {
        if depth > self.max_depth {
            warn!(limit = self.max_depth, "markdown nesting limit reached while parsing");
            return Err(TranscodeError::NestingTooDeep {
                limit: self.max_depth,
            });
        }

        let mut nodes = Vec::new();
        let mut previous = enclosing;
        let mut offset = 0;

        while offset < source.len() {
            let rest = &source[offset..];
            let state = ParseState { mode, previous };

            let (rule, matched) = rules
                .iter()
                .find_map(|rule| rule.apply(rest, &state).map(|m| (rule, m)))
                .filter(|(_, m)| m.length > 0 && m.length <= rest.len())
                .ok_or_else(|| {
                    let snippet: String = rest.chars().take(16).collect();
                    TranscodeError::Parse(format!("no rule matches at byte {offset}: {snippet:?}"))
                })?;

            let captured = &rest[..matched.length];
            if debug {
                debug!(rule = rule.name(), depth, ?mode, captured, "rule matched");
            }

            let mut node = matched.node;
            if let Some(inner) = matched.inner {
                let span = captured.get(inner.range.clone()).ok_or_else(|| {
                    TranscodeError::Parse(format!(
                        "rule '{}' returned an inner span outside its match",
                        rule.name()
                    ))
                })?;
                let children =
                    self.parse_span(span, inner.mode, Some(captured), rules, debug, depth + 1)?;
                if let Some(slot) = node.children_mut() {
                    slot.extend(children);
                }
            }

            nodes.push(node);
            previous = Some(captured);
            offset += matched.length;
        }

        Ok(nodes)
    }
}

impl Default for RuleParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for RuleParser {
    fn parse(
        &self,
        source: &str,
        mode: ParseMode,
        rules: &[Arc<dyn Rule>],
        debug: bool,
    ) -> Result<Vec<Node>, TranscodeError> {
        self.parse_span(source, mode, None, rules, debug, 0)
    }
}
