//! Export tests for the markdown format (styled tree → markdown)
//!
//! Concrete scenarios first, then property tests for the run invariants over random trees.

use chatmark_babel::formats::markdown::{collect_runs, strip_legacy_formatting, RUN_SEPARATOR};
use chatmark_babel::text::{ClickEvent, Component, StyledText};
use chatmark_babel::{MarkdownSerializer, SerializerOptions};
use proptest::prelude::*;

fn to_markdown(tree: &Component) -> String {
    MarkdownSerializer::default().serialize(tree).unwrap()
}

#[test]
fn test_plain_text_node() {
    assert_eq!(to_markdown(&Component::text("Hello")), "Hello");
}

#[test]
fn test_bold_parent_italic_child() {
    let tree = Component::text("Hi")
        .bold()
        .with_child(Component::text("there").italic());
    assert_eq!(to_markdown(&tree), "**Hi**\u{200B}_there_");
}

#[test]
fn test_bold_siblings_merge_into_one_run() {
    let tree = Component::empty()
        .with_child(Component::text("A").bold())
        .with_child(Component::text("B").bold());
    assert_eq!(to_markdown(&tree), "**AB**");
}

#[test]
fn test_unescaped_star_is_escaped() {
    assert_eq!(to_markdown(&Component::text("5 * 3")), r"5 \* 3");
}

#[test]
fn test_mixed_message() {
    let tree = Component::text("Welcome ")
        .with_child(Component::text("Steve").bold().underlined())
        .with_child(Component::text(", type "))
        .with_child(
            Component::text("/help")
                .italic()
                .on_click(ClickEvent::SuggestCommand("/help".to_string())),
        )
        .with_child(Component::text(" for ~~nothing~~"));
    insta::assert_snapshot!(
        to_markdown(&tree).replace(RUN_SEPARATOR, "·"),
        @r"Welcome ·**__Steve__**·, type ·_/help_· for \~\~nothing\~\~"
    );
}

#[test]
fn test_embedded_link_keeps_decorations() {
    let tree = Component::text("docs")
        .bold()
        .on_click(ClickEvent::OpenUrl("https://example.org/docs".to_string()));
    let options = SerializerOptions::defaults().with_embed_links(true);
    let markdown = MarkdownSerializer::new(options).serialize(&tree).unwrap();
    assert_eq!(markdown, "**[docs](https://example.org/docs)**");
}

fn arb_tree() -> impl Strategy<Value = Component> {
    let leaf = (
        "([a-z]|§[0-9a-fk-or]){0,3}",
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(text, bold, italic, underlined, strikethrough)| {
            let mut node = if text.is_empty() {
                Component::empty()
            } else {
                Component::text(text)
            };
            node.style.bold = bold;
            node.style.italic = italic;
            node.style.underlined = underlined;
            node.style.strikethrough = strikethrough;
            node
        });
    leaf.prop_recursive(4, 32, 4, |inner| {
        (inner.clone(), prop::collection::vec(inner, 0..4)).prop_map(|(mut parent, children)| {
            parent.extra = children;
            parent
        })
    })
}

proptest! {
    #[test]
    fn adjacent_runs_never_share_formatting(tree in arb_tree()) {
        let runs = collect_runs(&tree, &SerializerOptions::defaults()).unwrap();
        for pair in runs.windows(2) {
            prop_assert!(!pair[0].formatting_matches(&pair[1]));
        }
    }

    #[test]
    fn empty_runs_are_never_collected(tree in arb_tree()) {
        let runs = collect_runs(&tree, &SerializerOptions::defaults()).unwrap();
        prop_assert!(runs.iter().all(|run| !run.content.is_empty()));
    }

    #[test]
    fn one_separator_between_runs(tree in arb_tree()) {
        let runs = collect_runs(&tree, &SerializerOptions::defaults()).unwrap();
        let markdown = to_markdown(&tree);
        let separator = RUN_SEPARATOR.to_string();
        prop_assert!(!markdown.starts_with(&separator));
        prop_assert!(!markdown.ends_with(&separator));
        prop_assert!(!markdown.contains(&separator.repeat(2)));
        prop_assert_eq!(markdown.matches(&separator).count(), runs.len().saturating_sub(1));
    }

    #[test]
    fn visible_text_survives(tree in arb_tree()) {
        let runs = collect_runs(&tree, &SerializerOptions::defaults()).unwrap();
        let joined: String = runs.iter().map(|run| run.content.as_str()).collect();
        prop_assert_eq!(joined, strip_legacy_formatting(&tree.plain_text()));
    }
}
