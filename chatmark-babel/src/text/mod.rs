//! Styled text trees
//!
//!     The transcoder never touches a concrete host text type directly. Everything it needs from a
//!     styled tree goes through the [`StyledText`] capability trait: creating nodes, appending
//!     children, reading and writing inline decorations, colors, click and hover metadata, and the
//!     node's content kind.
//!
//!     [`Component`] is the bundled adapter, a chat component value that (de)serializes to JSON so
//!     the CLI and tests have a concrete tree to work with. Hosts with their own text types
//!     implement [`StyledText`] for them and get both pipelines for free.
//!
//!     Style inheritance is a display-time concern of the host: a child is drawn with its parent's
//!     style unless it overrides it. The serializer does not inherit flags (each node is judged by
//!     its own style), while the renderer relies on inheritance by appending children under styled
//!     parents.

pub mod component;

pub use component::{Component, Style};

use serde::{Deserialize, Serialize};

/// Inline decorations that map onto markdown syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decoration {
    Bold,
    Italic,
    Underlined,
    Strikethrough,
}

/// The named chat colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
}

/// Action performed when a node is clicked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickEvent {
    OpenUrl(String),
    RunCommand(String),
    SuggestCommand(String),
    CopyToClipboard(String),
}

impl ClickEvent {
    /// The target URL when this is an "open URL" action
    pub fn url(&self) -> Option<&str> {
        match self {
            ClickEvent::OpenUrl(url) => Some(url),
            _ => None,
        }
    }
}

/// A key the host translates into a display string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

/// What a node displays, before any children
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Content {
    /// No text of its own; only style and children
    #[default]
    Empty,
    Literal(String),
    /// Display text comes from the host's key bindings
    Keybind(String),
    /// Display text comes from the host's localization
    Translatable(Translation),
    Score {
        name: String,
        objective: String,
    },
    Selector(String),
    /// Host data lookups; the transcoder has no text for these
    Nbt(String),
}

impl Content {
    /// The literal string, if this content carries one directly
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Content::Literal(text) => Some(text),
            _ => None,
        }
    }
}

/// Capabilities the transcoder needs from a host styled-text tree.
///
/// Implementors get [`crate::render::RenderTarget`] through a blanket impl, so any styled text
/// type can be the output of the markdown renderer and the input of the markdown serializer.
pub trait StyledText: Clone + Default + Send + Sync + 'static {
    /// A node displaying `text` with no style of its own
    fn literal(text: impl Into<String>) -> Self;

    /// An empty node carrying a copy of `other`'s style but none of its content or children
    fn with_style_of(other: &Self) -> Self;

    fn content(&self) -> &Content;

    fn set_content(&mut self, content: Content);

    fn children(&self) -> &[Self];

    fn children_mut(&mut self) -> &mut Vec<Self>;

    fn append(&mut self, child: Self) {
        self.children_mut().push(child);
    }

    fn decoration(&self, decoration: Decoration) -> bool;

    fn set_decoration(&mut self, decoration: Decoration, enabled: bool);

    fn color(&self) -> Option<Color>;

    fn set_color(&mut self, color: Color);

    fn click_event(&self) -> Option<&ClickEvent>;

    fn set_click_event(&mut self, event: ClickEvent);

    fn hover_text(&self) -> Option<&Self>;

    fn set_hover_text(&mut self, text: Self);

    /// Literal text of this node and all descendants, in display order
    fn plain_text(&self) -> String {
        let mut out = String::new();
        collect_plain_text(self, &mut out);
        out
    }
}

fn collect_plain_text<T: StyledText>(node: &T, out: &mut String) {
    if let Some(text) = node.content().as_literal() {
        out.push_str(text);
    }
    for child in node.children() {
        collect_plain_text(child, out);
    }
}
