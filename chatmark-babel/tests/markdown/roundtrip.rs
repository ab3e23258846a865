//! Markdown → tree → markdown
//!
//! Decorations survive the trip because every rendered text node carries the decorations of the
//! markdown around it.

use chatmark_babel::text::Component;
use chatmark_babel::{MarkdownSerializer, TreeSerializer};

fn roundtrip(markdown: &str) -> String {
    let tree: Component = TreeSerializer::default().parse(markdown).unwrap();
    MarkdownSerializer::default().serialize(&tree).unwrap()
}

#[test]
fn test_bold_then_plain() {
    assert_eq!(roundtrip("**a** b"), "**a**\u{200B} b");
}

#[test]
fn test_nested_decorations() {
    assert_eq!(roundtrip("**a _b_**"), "**a **\u{200B}**_b_**");
}

#[test]
fn test_plain_text_is_unchanged() {
    assert_eq!(roundtrip("just words"), "just words");
}

#[test]
fn test_strike_and_underline() {
    assert_eq!(roundtrip("~~gone~~ __here__"), "~~gone~~\u{200B} \u{200B}__here__");
}
