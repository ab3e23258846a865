//! Built-in renderer for styled-text trees.
//!
//! Maps the canonical style tags onto [`StyledText`] operations. Code spans are shown in dark
//! gray, quotes get a bold dark gray `| ` bar in front of every line, spoilers are masked with
//! `▌` glyphs and reveal their content on hover, mentions become their chat tokens.

use super::{NodeRenderer, RenderContext};
use crate::ast::{Node, StyleKind, StyleNode, TextStyle};
use crate::error::TranscodeError;
use crate::grammar::ParseMode;
use crate::text::{Color, Content, Decoration, StyledText};
use std::marker::PhantomData;

pub const DEFAULT_RENDERER_NAME: &str = "default";

const QUOTE_PREFIX: &str = "| ";
const SPOILER_GLYPH: &str = "▌";

/// The fallback renderer of tree mode; handles every node
pub struct DefaultTreeRenderer<T> {
    _target: PhantomData<fn() -> T>,
}

impl<T: StyledText> DefaultTreeRenderer<T> {
    pub fn new() -> Self {
        Self {
            _target: PhantomData,
        }
    }

    fn render_style(
        &self,
        render_to: &T,
        node: &mut StyleNode,
        ctx: &RenderContext<'_, T>,
    ) -> Result<T, TranscodeError> {
        let mut output = render_to.clone();
        let styles: Vec<TextStyle> = node.styles().to_vec();
        let mut quoted = None;

        for style in &styles {
            match style.kind {
                StyleKind::Bold => output.set_decoration(Decoration::Bold, true),
                StyleKind::Italics => output.set_decoration(Decoration::Italic, true),
                StyleKind::Underline => output.set_decoration(Decoration::Underlined, true),
                StyleKind::Strikethrough => output.set_decoration(Decoration::Strikethrough, true),
                StyleKind::CodeString | StyleKind::CodeBlock => {
                    output.set_color(Color::DarkGray);
                    node.remove_kind(style.kind);
                }
                StyleKind::Quote => {
                    let content = style.extra("content").unwrap_or_default();
                    quoted = Some(ctx.render_source(content, ParseMode::Quote)?);
                }
                StyleKind::Spoiler => {
                    let content = style.extra("content").unwrap_or_default();
                    let revealed = ctx.render_source(content, ParseMode::Default)?;
                    output.append(spoiler_mask(revealed));
                }
                StyleKind::MentionEmoji => {
                    let name = style.extra("name").unwrap_or_default();
                    let emoji = styled_literal(&output, format!(":{name}:"));
                    output.append(emoji);
                }
                StyleKind::MentionChannel => {
                    let token = mention(&output, style, "<#");
                    output.append(token);
                }
                StyleKind::MentionUser => {
                    let token = mention(&output, style, "<@");
                    output.append(token);
                }
                StyleKind::MentionRole => {
                    let token = mention(&output, style, "<@&");
                    output.append(token);
                }
            }
        }

        if let Some(inner) = quoted {
            output.append(inner);
            let mut wrapper = T::default();
            wrapper.append(quote_prefix());
            wrapper.append(output);
            output = wrapper;
        }
        Ok(output)
    }
}

impl<T: StyledText> Default for DefaultTreeRenderer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: StyledText> NodeRenderer<T> for DefaultTreeRenderer<T> {
    fn name(&self) -> &str {
        DEFAULT_RENDERER_NAME
    }

    fn is_builtin_default(&self) -> bool {
        true
    }

    fn render(
        &self,
        render_to: &T,
        node: &mut Node,
        ctx: &RenderContext<'_, T>,
    ) -> Result<Option<T>, TranscodeError> {
        let output = match node {
            Node::Text(text) => styled_literal(render_to, text.as_str()),
            Node::Style(style) => self.render_style(render_to, style, ctx)?,
            Node::Other(_) => render_to.clone(),
        };
        Ok(Some(output))
    }

    fn render_after_children(
        &self,
        rendered: &T,
        node: &Node,
        _ctx: &RenderContext<'_, T>,
    ) -> Result<Option<T>, TranscodeError> {
        match node {
            Node::Style(style) if style.has_kind(StyleKind::Quote) => {
                let mut output = rendered.clone();
                let mut line_ended = false;
                prefix_continuation_lines(&mut output, &mut line_ended);
                Ok(Some(output))
            }
            _ => Ok(None),
        }
    }
}

/// Text carrying the decorations of `base`, so the node holding the text holds its style too
fn styled_literal<T: StyledText>(base: &T, text: impl Into<String>) -> T {
    let mut node = T::with_style_of(base);
    node.set_content(Content::Literal(text.into()));
    node
}

fn mention<T: StyledText>(base: &T, style: &TextStyle, open: &str) -> T {
    let id = style.extra("id").unwrap_or_default();
    styled_literal(base, format!("{open}{id}>"))
}

fn quote_prefix<T: StyledText>() -> T {
    let mut prefix = T::literal(QUOTE_PREFIX);
    prefix.set_decoration(Decoration::Bold, true);
    prefix.set_color(Color::DarkGray);
    prefix
}

fn spoiler_mask<T: StyledText>(revealed: T) -> T {
    let width = revealed.plain_text().chars().count();
    let mut mask = T::literal(SPOILER_GLYPH.repeat(width));
    mask.set_color(Color::DarkGray);
    mask.set_hover_text(revealed);
    mask
}

/// Puts the quote bar in front of every line that starts after a newline, walking the tree in
/// display order. `line_ended` carries "the last text seen ended a line" across nodes.
fn prefix_continuation_lines<T: StyledText>(node: &mut T, line_ended: &mut bool) {
    let literal = node.content().as_literal().map(str::to_owned);
    let mut pieces = Vec::new();

    if let Some(text) = literal.filter(|text| text.contains('\n') || (*line_ended && !text.is_empty())) {
        for line in text.split_inclusive('\n') {
            if *line_ended {
                pieces.push(quote_prefix());
            }
            pieces.push(styled_literal(node, line));
            *line_ended = line.ends_with('\n');
        }
        node.set_content(Content::Empty);
    } else if let Some(text) = node.content().as_literal() {
        if !text.is_empty() {
            *line_ended = text.ends_with('\n');
        }
    }

    for child in node.children_mut().iter_mut() {
        prefix_continuation_lines(child, line_ended);
    }

    if !pieces.is_empty() {
        let children = std::mem::take(node.children_mut());
        pieces.extend(children);
        *node.children_mut() = pieces;
    }
}
