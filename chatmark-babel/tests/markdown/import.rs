//! Import tests for the markdown format (markdown → styled tree)
//!
//! Structure is checked through treeviz snapshots; the scenarios that matter on their own are
//! asserted directly as well.

use chatmark_babel::ast::Node;
use chatmark_babel::formats::treeviz::tree_to_treeviz;
use chatmark_babel::render::{NodeRenderer, RenderContext};
use chatmark_babel::text::{Color, Component, StyledText};
use chatmark_babel::{RenderOptions, TranscodeError, TreeSerializer};
use insta::assert_snapshot;
use std::sync::Arc;

fn md_to_tree(markdown: &str) -> Component {
    TreeSerializer::<Component>::default()
        .parse(markdown)
        .expect("should render markdown")
}

#[test]
fn test_bold_and_escaped_pipes() {
    let tree = md_to_tree(r"**bold** and \|escaped\|");
    assert_eq!(tree.plain_text(), "bold and |escaped|");
    assert_snapshot!(tree_to_treeviz(&tree), @r###"
    └─ ∅ (empty)
      ├─ ∅ (empty) {bold}
      │ └─ ◦ "bold" {bold}
      └─ ◦ " and |escaped|"
    "###);
}

#[test]
fn test_spoiler_is_masked() {
    let tree = md_to_tree("||secret||");
    assert_eq!(tree.plain_text(), "▌".repeat(6));
    let mask = &tree.extra[0].extra[0];
    assert_eq!(mask.style.color, Some(Color::DarkGray));
    assert_eq!(mask.hover_text().map(|h| h.plain_text()).as_deref(), Some("secret"));
}

#[test]
fn test_spoiler_hover_keeps_markdown_styles() {
    let tree = md_to_tree("||**loud**||");
    let hover = tree.extra[0].extra[0].hover_text().expect("spoiler has hover text");
    assert_eq!(hover.plain_text(), "loud");
    assert!(hover.extra[0].style.bold);
}

#[test]
fn test_quote_block() {
    let tree = md_to_tree(">>> first\nsecond");
    assert_eq!(tree.plain_text(), "| first\n| second");
}

#[test]
fn test_nested_styles() {
    let tree = md_to_tree("**bold _both_**");
    assert_snapshot!(tree_to_treeviz(&tree), @r###"
    └─ ∅ (empty)
      └─ ∅ (empty) {bold}
        ├─ ◦ "bold " {bold}
        └─ ∅ (empty) {bold, italic}
          └─ ◦ "both" {bold, italic}
    "###);
}

#[test]
fn test_code_block() {
    let tree = md_to_tree("```rust\nfn main() {}\n```");
    let code = &tree.extra[0];
    assert_eq!(code.style.color, Some(Color::DarkGray));
    assert_eq!(code.plain_text(), "fn main() {}");
}

#[test]
fn test_mentions_become_tokens() {
    let tree = md_to_tree("hi <@10>, see <#20> <@&30> <a:party:40>");
    assert_eq!(tree.plain_text(), "hi <@10>, see <#20> <@&30> :party:");
}

/// Renders user mentions as `@name` from a lookup table, leaving everything else to the default
struct UserNames;

impl NodeRenderer<Component> for UserNames {
    fn name(&self) -> &str {
        "user-names"
    }

    fn render(
        &self,
        render_to: &Component,
        node: &mut Node,
        _ctx: &RenderContext<'_, Component>,
    ) -> Result<Option<Component>, TranscodeError> {
        let Node::Style(style) = node else {
            return Ok(None);
        };
        let Some(id) = style
            .styles()
            .iter()
            .find(|tag| tag.kind == chatmark_babel::ast::StyleKind::MentionUser)
            .and_then(|tag| tag.extra("id"))
        else {
            return Ok(None);
        };
        let name = if id == "1" { "alex" } else { "unknown" };
        let mut output = render_to.clone();
        output.append(Component::text(format!("@{name}")).colored(Color::Aqua));
        Ok(Some(output))
    }
}

#[test]
fn test_custom_renderer_takes_priority() {
    let options = RenderOptions::<Component>::defaults()
        .add_renderer(Arc::new(UserNames))
        .unwrap();
    let tree = TreeSerializer::<Component>::default()
        .parse_with("ping <@1> **now**", &options)
        .unwrap();
    assert_eq!(tree.plain_text(), "ping @alex now");
    assert!(tree.extra[3].style.bold);
}

#[test]
fn test_nesting_limit_covers_spoiler_reparse() {
    let options = RenderOptions::<Component>::defaults().with_max_depth(1);
    let serializer = TreeSerializer::<Component>::default();
    assert!(serializer.parse_with("**a**", &options).is_ok());
    assert_eq!(
        serializer.parse_with("**a _b_**", &options),
        Err(TranscodeError::NestingTooDeep { limit: 1 })
    );
    assert_eq!(
        serializer.parse_with("||**a**||", &options),
        Err(TranscodeError::NestingTooDeep { limit: 1 })
    );
}
