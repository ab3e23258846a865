//! Escape mode tests (markdown → escaped markdown)
//!
//! The escaped message must show every construct literally, and escaping it again must not add
//! a second layer of backslashes.

use chatmark_babel::formats::markdown::escape_markdown;
use chatmark_babel::{RenderOptions, TreeSerializer};

fn escape(markdown: &str) -> String {
    TreeSerializer::<chatmark_babel::Component>::default()
        .escape_markdown(markdown)
        .unwrap()
}

#[test]
fn test_escape_message() {
    insta::assert_snapshot!(
        escape("**hey** ||look|| at `this` and ~~that~~"),
        @r"\*\*hey\*\* \|\|look\|\| at \`this\` and \~\~that\~\~"
    );
}

#[test]
fn test_escape_code_block() {
    assert_eq!(
        escape("```rust\nlet x = 1;\n```"),
        "\\`\\`\\`rust\nlet x = 1;\n\\`\\`\\`"
    );
}

#[test]
fn test_escape_emoji_mention() {
    assert_eq!(escape("<a:wave:12>"), r"\<a:wave:12>");
}

#[test]
fn test_escaping_twice_changes_nothing() {
    let once = escape("**a** _b_ `c` ~~d~~ ||e||");
    assert_eq!(escape(&once), once);
}

#[test]
fn test_escape_with_debug_options() {
    let options = RenderOptions::<String>::escape_defaults().with_debug(true);
    let escaped = TreeSerializer::<chatmark_babel::Component>::default()
        .escape_markdown_with("__u__", &options)
        .unwrap();
    assert_eq!(escaped, r"\_\_u\_\_");
}

#[test]
fn test_string_escape_matches_for_plain_runs() {
    assert_eq!(escape("a*b"), escape_markdown("a*b"));
}
