//! Built-in renderer for escape mode.
//!
//! Re-emits a parsed message with every markdown construct backslash-escaped, so the chat
//! client shows the syntax literally. Opening markers are written in the render phase and
//! closing markers after the children, innermost first.

use super::{NodeRenderer, RenderContext};
use crate::ast::{Node, StyleKind, TextStyle};
use crate::error::TranscodeError;
use crate::formats::markdown::escape::escape_markdown;
use crate::grammar::ParseMode;

pub const ESCAPING_RENDERER_NAME: &str = "escaping";

/// The fallback renderer of escape mode
#[derive(Debug, Clone, Copy, Default)]
pub struct EscapingRenderer;

impl EscapingRenderer {
    fn opening(style: &TextStyle, ctx: &RenderContext<'_, String>) -> Result<String, TranscodeError> {
        let marker = match style.kind {
            StyleKind::Bold => r"\*\*".to_string(),
            StyleKind::Italics => r"\_".to_string(),
            StyleKind::Underline => r"\_\_".to_string(),
            StyleKind::Strikethrough => r"\~\~".to_string(),
            StyleKind::CodeString => r"\`".to_string(),
            StyleKind::CodeBlock => {
                let language = style.extra("language").unwrap_or_default();
                format!("{}{language}\n", r"\`\`\`")
            }
            StyleKind::Quote => {
                let content = style.extra("content").unwrap_or_default();
                format!(r"\> {}", ctx.render_source(content, ParseMode::Quote)?)
            }
            StyleKind::Spoiler => {
                let content = style.extra("content").unwrap_or_default();
                format!(r"\|\|{}\|\|", ctx.render_source(content, ParseMode::Default)?)
            }
            StyleKind::MentionEmoji => {
                let animated = if style.extra("animated") == Some("true") { "a" } else { "" };
                format!(
                    r"\<{animated}:{}:{}>",
                    style.extra("name").unwrap_or_default(),
                    style.extra("id").unwrap_or_default()
                )
            }
            StyleKind::MentionChannel => format!(r"\<#{}>", style.extra("id").unwrap_or_default()),
            StyleKind::MentionUser => format!(r"\<@{}>", style.extra("id").unwrap_or_default()),
            StyleKind::MentionRole => format!(r"\<@&{}>", style.extra("id").unwrap_or_default()),
        };
        Ok(marker)
    }

    fn closing(style: &TextStyle) -> &'static str {
        match style.kind {
            StyleKind::Bold => r"\*\*",
            StyleKind::Italics => r"\_",
            StyleKind::Underline => r"\_\_",
            StyleKind::Strikethrough => r"\~\~",
            StyleKind::CodeString => r"\`",
            StyleKind::CodeBlock => "\n\\`\\`\\`",
            _ => "",
        }
    }
}

impl NodeRenderer<String> for EscapingRenderer {
    fn name(&self) -> &str {
        ESCAPING_RENDERER_NAME
    }

    fn is_builtin_default(&self) -> bool {
        true
    }

    fn render(
        &self,
        render_to: &String,
        node: &mut Node,
        ctx: &RenderContext<'_, String>,
    ) -> Result<Option<String>, TranscodeError> {
        let output = match node {
            Node::Text(text) => escape_markdown(text),
            Node::Style(style) => {
                let mut output = render_to.clone();
                for tag in style.styles() {
                    output.push_str(&Self::opening(tag, ctx)?);
                }
                output
            }
            Node::Other(_) => render_to.clone(),
        };
        Ok(Some(output))
    }

    fn render_after_children(
        &self,
        rendered: &String,
        node: &Node,
        _ctx: &RenderContext<'_, String>,
    ) -> Result<Option<String>, TranscodeError> {
        let Node::Style(style) = node else {
            return Ok(None);
        };
        let mut output = rendered.clone();
        for tag in style.styles().iter().rev() {
            output.push_str(Self::closing(tag));
        }
        Ok(Some(output))
    }
}
