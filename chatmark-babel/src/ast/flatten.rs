//! Merges adjacent text nodes in a parsed markdown tree.
//!
//! # The High-Level Concept
//!
//! Grammars split text at every character that could start a construct, so `a*b` comes out of
//! the parser as three text nodes. Later stages only care about style boundaries, so runs of
//! sibling text nodes are collapsed into one before rendering.
//!
//! # The Algorithm
//!
//! 1. Walk the sibling list in order, holding a pending text buffer
//! 2. A text node is appended to the pending buffer
//! 3. Any other node (or any node with children) flushes the buffer first, then is kept as is;
//!    its children are flattened recursively
//! 4. The buffer is flushed at the end
//!
//! Relative order is preserved and the pass is idempotent.

use crate::ast::nodes::Node;

/// Flattens a list of sibling nodes, recursing into every child list
pub fn flatten(nodes: Vec<Node>) -> Vec<Node> {
    let mut flattened = Vec::with_capacity(nodes.len());
    let mut pending: Option<String> = None;

    for mut node in nodes {
        match node {
            Node::Text(text) => match pending.as_mut() {
                Some(buffer) => buffer.push_str(&text),
                None => pending = Some(text),
            },
            _ => {
                if let Some(buffer) = pending.take() {
                    flattened.push(Node::Text(buffer));
                }
                let children = node.take_children();
                if let Some(slot) = node.children_mut() {
                    *slot = flatten(children);
                }
                flattened.push(node);
            }
        }
    }

    if let Some(buffer) = pending {
        flattened.push(Node::Text(buffer));
    }
    flattened
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::nodes::{StyleKind, TextStyle};

    fn bold(children: Vec<Node>) -> Node {
        Node::styled(TextStyle::new(StyleKind::Bold), children)
    }

    #[test]
    fn test_merges_adjacent_text() {
        let nodes = vec![Node::text("a"), Node::text("*"), Node::text("b")];
        assert_eq!(flatten(nodes), vec![Node::text("a*b")]);
    }

    #[test]
    fn test_style_node_breaks_runs() {
        let nodes = vec![
            Node::text("a"),
            Node::text("b"),
            bold(vec![Node::text("c")]),
            Node::text("d"),
            Node::text("e"),
        ];
        assert_eq!(
            flatten(nodes),
            vec![
                Node::text("ab"),
                bold(vec![Node::text("c")]),
                Node::text("de"),
            ]
        );
    }

    #[test]
    fn test_childless_style_node_breaks_runs() {
        let mention = Node::styled(
            TextStyle::new(StyleKind::MentionUser).with_extra("id", "1"),
            vec![],
        );
        let nodes = vec![Node::text("a"), mention.clone(), Node::text("b")];
        assert_eq!(
            flatten(nodes),
            vec![Node::text("a"), mention, Node::text("b")]
        );
    }

    #[test]
    fn test_recurses_into_children() {
        let nodes = vec![bold(vec![
            Node::text("x"),
            Node::text("y"),
            bold(vec![Node::text("1"), Node::text("2")]),
        ])];
        assert_eq!(
            flatten(nodes),
            vec![bold(vec![Node::text("xy"), bold(vec![Node::text("12")])])]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(flatten(vec![]).is_empty());
    }
}
