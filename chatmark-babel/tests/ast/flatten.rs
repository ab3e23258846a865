//! Flattening pass tests over parsed messages and random trees

use chatmark_babel::ast::{flatten, Node, StyleKind, TextStyle};
use chatmark_babel::grammar::{discord, ParseMode, Parser, RuleParser};
use proptest::prelude::*;

fn parse_raw(source: &str) -> Vec<Node> {
    RuleParser::new()
        .parse(source, ParseMode::Default, &discord::all_rules(true), false)
        .unwrap()
}

#[test]
fn test_parsed_fragments_are_merged() {
    let raw = parse_raw("a*b (c) **d!?**");
    assert!(raw.len() > 3, "the grammar splits at special characters");
    let flat = flatten(raw);
    assert_eq!(flat.len(), 2);
    assert_eq!(flat[0], Node::text("a*b (c) "));
    assert_eq!(flat[1].children(), &[Node::text("d!?")]);
}

fn arb_nodes() -> impl Strategy<Value = Vec<Node>> {
    let leaf = "[a-c]{0,2}".prop_map(Node::text);
    let node = leaf.prop_recursive(3, 24, 4, |inner| {
        prop::collection::vec(inner, 0..4)
            .prop_map(|children| Node::styled(TextStyle::new(StyleKind::Bold), children))
    });
    prop::collection::vec(node, 0..6)
}

fn has_adjacent_text(nodes: &[Node]) -> bool {
    nodes
        .windows(2)
        .any(|pair| matches!((&pair[0], &pair[1]), (Node::Text(_), Node::Text(_))))
        || nodes.iter().any(|node| has_adjacent_text(node.children()))
}

fn text_of(nodes: &[Node]) -> String {
    nodes
        .iter()
        .map(|node| match node {
            Node::Text(text) => text.clone(),
            other => text_of(other.children()),
        })
        .collect()
}

proptest! {
    #[test]
    fn flatten_is_idempotent(nodes in arb_nodes()) {
        let once = flatten(nodes);
        prop_assert_eq!(flatten(once.clone()), once);
    }

    #[test]
    fn flatten_leaves_no_adjacent_text(nodes in arb_nodes()) {
        prop_assert!(!has_adjacent_text(&flatten(nodes)));
    }

    #[test]
    fn flatten_preserves_text_order(nodes in arb_nodes()) {
        let expected = text_of(&nodes);
        prop_assert_eq!(text_of(&flatten(nodes)), expected);
    }
}
