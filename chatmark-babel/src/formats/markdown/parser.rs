//! Chat markdown → styled tree, and markdown escaping.
//!
//! Both entry points parse the message with the options' parser and rules, flatten the AST and
//! run it through the renderer chain. They differ only in the accumulator: a styled tree, or a
//! `String` that re-emits the message with its syntax escaped.

use crate::error::TranscodeError;
use crate::options::RenderOptions;
use crate::render::render_markdown;
use crate::text::{Component, StyledText};

/// Parses `markdown` and renders it into a styled tree
pub fn parse<T: StyledText>(markdown: &str, options: &RenderOptions<T>) -> Result<T, TranscodeError> {
    render_markdown(markdown, options)
}

/// Escapes all markdown in a whole message so the chat client displays it literally
pub fn escape(markdown: &str, options: &RenderOptions<String>) -> Result<String, TranscodeError> {
    render_markdown(markdown, options)
}

/// Markdown → tree serializer holding its default options for both modes
#[derive(Debug, Clone)]
pub struct TreeSerializer<T = Component> {
    default_options: RenderOptions<T>,
    escape_options: RenderOptions<String>,
}

impl<T: StyledText> TreeSerializer<T> {
    pub fn new(default_options: RenderOptions<T>, escape_options: RenderOptions<String>) -> Self {
        Self {
            default_options,
            escape_options,
        }
    }

    pub fn default_options(&self) -> &RenderOptions<T> {
        &self.default_options
    }

    pub fn escape_options(&self) -> &RenderOptions<String> {
        &self.escape_options
    }

    pub fn parse(&self, markdown: &str) -> Result<T, TranscodeError> {
        parse(markdown, &self.default_options)
    }

    pub fn parse_with(&self, markdown: &str, options: &RenderOptions<T>) -> Result<T, TranscodeError> {
        parse(markdown, options)
    }

    /// Escapes a whole message; escaping a fragment may misread syntax that spans the cut
    pub fn escape_markdown(&self, markdown: &str) -> Result<String, TranscodeError> {
        escape(markdown, &self.escape_options)
    }

    pub fn escape_markdown_with(
        &self,
        markdown: &str,
        options: &RenderOptions<String>,
    ) -> Result<String, TranscodeError> {
        escape(markdown, options)
    }
}

impl<T: StyledText> Default for TreeSerializer<T> {
    fn default() -> Self {
        Self::new(RenderOptions::defaults(), RenderOptions::escape_defaults())
    }
}
