//! Treeviz formatter for markdown ASTs and styled text trees
//!
//! Treeviz is a visual representation of a tree, one node per line, with the nesting drawn by
//! box connectors.
//!
//! So the format is :
//! <prefix><connector> <icon><space><label> (text truncated to 30 characters)
//!
//! Example, for `**hi** > there`:
//!
//!   ⧉ Message (2 nodes)
//!   ├─ 𝐁 bold
//!   │ └─ ◦ "hi"
//!   └─ ◦ " > there"
//!
//! Style nodes list every tag they carry, with the tag's extra data in brackets. Styled tree
//! nodes show their content followed by their decorations, color and click action; hover text is
//! drawn as an extra child marked with ↳.

use super::icons::get_icon;
use crate::ast::{Node, TextStyle};
use crate::text::{Content, Decoration, StyledText};

const LABEL_WIDTH: usize = 30;

fn quoted(text: &str) -> String {
    let escaped = text.replace('\n', "\\n");
    let mut label: String = escaped.chars().take(LABEL_WIDTH).collect();
    if escaped.chars().count() > LABEL_WIDTH {
        label.push('…');
    }
    format!("\"{label}\"")
}

fn connectors(prefix: &str, index: usize, count: usize) -> (String, String) {
    let is_last = index + 1 == count;
    let line = format!("{prefix}{}", if is_last { "└─" } else { "├─" });
    let child_prefix = format!("{prefix}{}", if is_last { "  " } else { "│ " });
    (line, child_prefix)
}

fn style_label(style: &TextStyle) -> String {
    if style.extra.is_empty() {
        return style.kind.name().to_string();
    }
    let extras: Vec<String> = style
        .extra
        .iter()
        .map(|(key, value)| format!("{key}={}", quoted(value)))
        .collect();
    format!("{}[{}]", style.kind.name(), extras.join(", "))
}

fn format_node(node: &Node, prefix: &str, index: usize, count: usize, output: &mut String) {
    let (line, child_prefix) = connectors(prefix, index, count);
    let (icon, label) = match node {
        Node::Text(text) => (get_icon("text"), quoted(text)),
        Node::Style(style) => {
            let first = style.styles().first().map(|s| s.kind.name()).unwrap_or("style");
            let labels: Vec<String> = style.styles().iter().map(style_label).collect();
            (get_icon(first), labels.join(" + "))
        }
        Node::Other(other) => (get_icon(&other.kind), other.kind.clone()),
    };
    output.push_str(&format!("{line} {icon} {label}\n"));

    let children = node.children();
    for (i, child) in children.iter().enumerate() {
        format_node(child, &child_prefix, i, children.len(), output);
    }
}

/// Draws a parsed markdown message
pub fn ast_to_treeviz(nodes: &[Node]) -> String {
    let mut output = format!("{} Message ({} nodes)\n", get_icon("message"), nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        format_node(node, "", i, nodes.len(), &mut output);
    }
    output
}

fn content_label(content: &Content) -> (&'static str, String) {
    match content {
        Content::Empty => ("empty", String::from("(empty)")),
        Content::Literal(text) => ("literal", quoted(text)),
        Content::Keybind(name) => ("keybind", format!("keybind {name}")),
        Content::Translatable(translation) => ("translatable", format!("translate {}", translation.key)),
        Content::Score { name, objective } => ("score", format!("score {name}/{objective}")),
        Content::Selector(pattern) => ("selector", format!("selector {pattern}")),
        Content::Nbt(path) => ("nbt", format!("nbt {path}")),
    }
}

fn attributes<T: StyledText>(node: &T) -> Vec<String> {
    let mut attrs: Vec<String> = [
        (Decoration::Bold, "bold"),
        (Decoration::Italic, "italic"),
        (Decoration::Underlined, "underlined"),
        (Decoration::Strikethrough, "strikethrough"),
    ]
    .into_iter()
    .filter(|(decoration, _)| node.decoration(*decoration))
    .map(|(_, name)| name.to_string())
    .collect();
    if let Some(color) = node.color() {
        attrs.push(format!("{color:?}"));
    }
    if let Some(event) = node.click_event() {
        attrs.push(format!("click={event:?}"));
    }
    attrs
}

fn format_styled<T: StyledText>(
    node: &T,
    icon_override: Option<&'static str>,
    prefix: &str,
    index: usize,
    count: usize,
    output: &mut String,
) {
    let (line, child_prefix) = connectors(prefix, index, count);
    let (kind, mut label) = content_label(node.content());
    let attrs = attributes(node);
    if !attrs.is_empty() {
        label = format!("{label} {{{}}}", attrs.join(", "));
    }
    let icon = icon_override.unwrap_or_else(|| get_icon(kind));
    output.push_str(&format!("{line} {icon} {label}\n"));

    let hover = node.hover_text();
    let total = node.children().len() + usize::from(hover.is_some());
    if let Some(hover) = hover {
        format_styled(hover, Some(get_icon("hover")), &child_prefix, 0, total, output);
    }
    let offset = usize::from(hover.is_some());
    for (i, child) in node.children().iter().enumerate() {
        format_styled(child, None, &child_prefix, i + offset, total, output);
    }
}

/// Draws a styled text tree
pub fn tree_to_treeviz<T: StyledText>(tree: &T) -> String {
    let mut output = String::new();
    format_styled(tree, None, "", 0, 1, &mut output);
    output
}
