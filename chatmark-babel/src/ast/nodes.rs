//! Core data structures for the markdown AST.

use std::collections::BTreeMap;

/// Formatting directives a markdown grammar can attach to a style node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKind {
    Strikethrough,
    Underline,
    Italics,
    Bold,
    CodeString,
    CodeBlock,
    Quote,
    Spoiler,
    MentionEmoji,
    MentionChannel,
    MentionUser,
    MentionRole,
}

impl StyleKind {
    pub fn name(&self) -> &'static str {
        match self {
            StyleKind::Strikethrough => "strikethrough",
            StyleKind::Underline => "underline",
            StyleKind::Italics => "italics",
            StyleKind::Bold => "bold",
            StyleKind::CodeString => "code_string",
            StyleKind::CodeBlock => "code_block",
            StyleKind::Quote => "quote",
            StyleKind::Spoiler => "spoiler",
            StyleKind::MentionEmoji => "mention_emoji",
            StyleKind::MentionChannel => "mention_channel",
            StyleKind::MentionUser => "mention_user",
            StyleKind::MentionRole => "mention_role",
        }
    }
}

/// A style tag: a kind plus auxiliary key/value data (mention ids, raw quote content, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextStyle {
    pub kind: StyleKind,
    pub extra: BTreeMap<String, String>,
}

impl TextStyle {
    pub fn new(kind: StyleKind) -> Self {
        Self {
            kind,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extra.get(key).map(String::as_str)
    }
}

/// A node that applies one or more style tags to its children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleNode {
    styles: Vec<TextStyle>,
    pub children: Vec<Node>,
}

impl StyleNode {
    pub fn new(styles: Vec<TextStyle>, children: Vec<Node>) -> Self {
        let mut node = Self {
            styles: Vec::with_capacity(styles.len()),
            children,
        };
        for style in styles {
            node.add_style(style);
        }
        node
    }

    /// Styles in insertion order
    pub fn styles(&self) -> &[TextStyle] {
        &self.styles
    }

    /// Adds a style unless an equal one is already present
    pub fn add_style(&mut self, style: TextStyle) {
        if !self.styles.contains(&style) {
            self.styles.push(style);
        }
    }

    /// Removes every style of the given kind
    pub fn remove_kind(&mut self, kind: StyleKind) {
        self.styles.retain(|style| style.kind != kind);
    }

    pub fn has_kind(&self, kind: StyleKind) -> bool {
        self.styles.iter().any(|style| style.kind == kind)
    }
}

/// Grammar-specific node the transcoder forwards to renderers untouched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherNode {
    pub kind: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<Node>,
}

/// A node of the parsed markdown tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Style(StyleNode),
    Other(OtherNode),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn styled(style: TextStyle, children: Vec<Node>) -> Self {
        Node::Style(StyleNode::new(vec![style], children))
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Text(_) => &[],
            Node::Style(node) => &node.children,
            Node::Other(node) => &node.children,
        }
    }

    /// Mutable children; `None` for text nodes, which cannot hold any
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Text(_) => None,
            Node::Style(node) => Some(&mut node.children),
            Node::Other(node) => Some(&mut node.children),
        }
    }

    /// Detaches and returns the children, leaving the node childless
    pub fn take_children(&mut self) -> Vec<Node> {
        self.children_mut().map(std::mem::take).unwrap_or_default()
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_set_ignores_duplicates() {
        let node = StyleNode::new(
            vec![
                TextStyle::new(StyleKind::Bold),
                TextStyle::new(StyleKind::Italics),
                TextStyle::new(StyleKind::Bold),
            ],
            vec![],
        );
        let kinds: Vec<_> = node.styles().iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![StyleKind::Bold, StyleKind::Italics]);
    }

    #[test]
    fn test_remove_kind() {
        let mut node = StyleNode::new(
            vec![
                TextStyle::new(StyleKind::CodeString),
                TextStyle::new(StyleKind::Bold),
            ],
            vec![],
        );
        node.remove_kind(StyleKind::CodeString);
        assert!(!node.has_kind(StyleKind::CodeString));
        assert!(node.has_kind(StyleKind::Bold));
    }

    #[test]
    fn test_text_nodes_have_no_children() {
        let mut node = Node::text("x");
        assert!(node.children().is_empty());
        assert!(node.children_mut().is_none());
        assert!(node.take_children().is_empty());
    }
}
