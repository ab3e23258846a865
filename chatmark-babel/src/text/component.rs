//! The bundled chat component adapter.
//!
//! A `Component` is a node with content, a style and an ordered list of children (`extra`),
//! serialized to JSON like:
//!
//! ```text
//! {"content":{"literal":"Hi"},"bold":true,"extra":[{"content":{"literal":"there"},"italic":true}]}
//! ```

use super::{ClickEvent, Color, Content, Decoration, StyledText, Translation};
use serde::{Deserialize, Serialize};

/// Style attributes of a single component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Style {
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub underlined: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub strikethrough: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub click_event: Option<ClickEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover_text: Option<Box<Component>>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A chat text component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Component {
    #[serde(default)]
    pub content: Content,
    #[serde(flatten)]
    pub style: Style,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<Component>,
}

impl Component {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: Content::Literal(text.into()),
            ..Self::default()
        }
    }

    pub fn keybind(name: impl Into<String>) -> Self {
        Self {
            content: Content::Keybind(name.into()),
            ..Self::default()
        }
    }

    pub fn translatable(key: impl Into<String>) -> Self {
        Self {
            content: Content::Translatable(Translation {
                key: key.into(),
                fallback: None,
            }),
            ..Self::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.style.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.style.italic = true;
        self
    }

    pub fn underlined(mut self) -> Self {
        self.style.underlined = true;
        self
    }

    pub fn strikethrough(mut self) -> Self {
        self.style.strikethrough = true;
        self
    }

    pub fn colored(mut self, color: Color) -> Self {
        self.style.color = Some(color);
        self
    }

    pub fn on_click(mut self, event: ClickEvent) -> Self {
        self.style.click_event = Some(event);
        self
    }

    /// Builder-style [`StyledText::append`]
    pub fn with_child(mut self, child: Component) -> Self {
        self.extra.push(child);
        self
    }
}

impl StyledText for Component {
    fn literal(text: impl Into<String>) -> Self {
        Component::text(text)
    }

    fn with_style_of(other: &Self) -> Self {
        Self {
            content: Content::Empty,
            style: other.style.clone(),
            extra: Vec::new(),
        }
    }

    fn content(&self) -> &Content {
        &self.content
    }

    fn set_content(&mut self, content: Content) {
        self.content = content;
    }

    fn children(&self) -> &[Self] {
        &self.extra
    }

    fn children_mut(&mut self) -> &mut Vec<Self> {
        &mut self.extra
    }

    fn decoration(&self, decoration: Decoration) -> bool {
        match decoration {
            Decoration::Bold => self.style.bold,
            Decoration::Italic => self.style.italic,
            Decoration::Underlined => self.style.underlined,
            Decoration::Strikethrough => self.style.strikethrough,
        }
    }

    fn set_decoration(&mut self, decoration: Decoration, enabled: bool) {
        match decoration {
            Decoration::Bold => self.style.bold = enabled,
            Decoration::Italic => self.style.italic = enabled,
            Decoration::Underlined => self.style.underlined = enabled,
            Decoration::Strikethrough => self.style.strikethrough = enabled,
        }
    }

    fn color(&self) -> Option<Color> {
        self.style.color
    }

    fn set_color(&mut self, color: Color) {
        self.style.color = Some(color);
    }

    fn click_event(&self) -> Option<&ClickEvent> {
        self.style.click_event.as_ref()
    }

    fn set_click_event(&mut self, event: ClickEvent) {
        self.style.click_event = Some(event);
    }

    fn hover_text(&self) -> Option<&Self> {
        self.style.hover_text.as_deref()
    }

    fn set_hover_text(&mut self, text: Self) {
        self.style.hover_text = Some(Box::new(text));
    }
}
