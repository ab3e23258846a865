//! Styled tree → chat markdown
//!
//!     The tree is walked depth-first, pre-order. Each node becomes a [`StyleRun`]: its resolved
//!     content, with legacy `§x` codes stripped, plus its own four decoration flags. A run that
//!     formats like the previous one is merged into it, and a run with no content is dropped, so
//!     the final sequence never holds two neighbours with the same flags.
//!
//!     Each run is then written as opening markers (`**`, `~~`, `_`, `__`), the escaped content and
//!     the closing markers in reverse. Runs are joined with a zero width space so that two runs
//!     the chat client would otherwise read as one (`**a**` `**b**` → `**a****b**`) stay apart.
//!
//!     Flags are not inherited: a child is judged by its own style only. Colors, hover text and
//!     other attributes have no markdown form and are lost.

use super::escape::{escape_markdown, strip_legacy_formatting};
use crate::error::TranscodeError;
use crate::options::SerializerOptions;
use crate::text::{ClickEvent, Content, Decoration, StyledText};
use tracing::warn;

/// Inserted between adjacent runs
pub const RUN_SEPARATOR: char = '\u{200B}';

/// A contiguous span of text sharing one combination of decorations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleRun {
    pub content: String,
    pub bold: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub italic: bool,
}

impl StyleRun {
    /// Whether both runs carry the same decorations, whatever their content
    pub fn formatting_matches(&self, other: &StyleRun) -> bool {
        self.bold == other.bold
            && self.strikethrough == other.strikethrough
            && self.underline == other.underline
            && self.italic == other.italic
    }

    fn markers(&self) -> Vec<&'static str> {
        [
            (self.bold, "**"),
            (self.strikethrough, "~~"),
            (self.italic, "_"),
            (self.underline, "__"),
        ]
        .into_iter()
        .filter_map(|(enabled, marker)| enabled.then_some(marker))
        .collect()
    }

    /// The run as markdown: markers around the (optionally escaped) content
    fn to_markdown(&self, options: &SerializerOptions) -> String {
        let content = if options.escape_markdown() {
            escape_markdown(&self.content)
        } else {
            self.content.clone()
        };

        let markers = self.markers();
        let mut out = String::with_capacity(content.len() + 12);
        markers.iter().for_each(|marker| out.push_str(marker));
        out.push_str(&content);
        markers.iter().rev().for_each(|marker| out.push_str(marker));
        out
    }
}

/// Flattens a styled tree into merged runs
pub fn collect_runs<T: StyledText>(
    tree: &T,
    options: &SerializerOptions,
) -> Result<Vec<StyleRun>, TranscodeError> {
    let mut runs = Vec::new();
    walk(tree, options, &mut runs, 0)?;
    Ok(runs)
}

fn walk<T: StyledText>(
    node: &T,
    options: &SerializerOptions,
    runs: &mut Vec<StyleRun>,
    depth: usize,
) -> Result<(), TranscodeError> {
    if depth > options.max_depth() {
        warn!(limit = options.max_depth(), "styled tree nesting limit reached while serializing");
        return Err(TranscodeError::NestingTooDeep {
            limit: options.max_depth(),
        });
    }

    let run = StyleRun {
        content: resolve_content(node, options)?,
        bold: node.decoration(Decoration::Bold),
        strikethrough: node.decoration(Decoration::Strikethrough),
        underline: node.decoration(Decoration::Underlined),
        italic: node.decoration(Decoration::Italic),
    };

    if !run.content.is_empty() {
        match runs.last_mut() {
            Some(last) if last.formatting_matches(&run) => last.content.push_str(&run.content),
            _ => runs.push(run),
        }
    }

    for child in node.children() {
        walk(child, options, runs, depth + 1)?;
    }
    Ok(())
}

fn resolve_content<T: StyledText>(
    node: &T,
    options: &SerializerOptions,
) -> Result<String, TranscodeError> {
    let content = match node.content() {
        Content::Literal(text) => text.clone(),
        Content::Keybind(name) => {
            let provider = options
                .keybind_provider()
                .ok_or_else(|| TranscodeError::MissingProvider("keybind".to_string()))?;
            provider(name)
        }
        Content::Translatable(translation) => {
            let provider = options
                .translation_provider()
                .ok_or_else(|| TranscodeError::MissingProvider("translatable".to_string()))?;
            provider(translation)
        }
        Content::Score { objective, .. } => objective.clone(),
        Content::Selector(pattern) => pattern.clone(),
        Content::Empty | Content::Nbt(_) => String::new(),
    };
    let content = strip_legacy_formatting(&content);

    if options.embed_links() && !content.is_empty() {
        if let Some(url) = node.click_event().and_then(ClickEvent::url) {
            return Ok(format!("[{content}]({url})"));
        }
    }
    Ok(content)
}

/// Serializes a styled tree into chat markdown
pub fn serialize<T: StyledText>(
    tree: &T,
    options: &SerializerOptions,
) -> Result<String, TranscodeError> {
    let runs = collect_runs(tree, options)?;
    let pieces: Vec<String> = runs.iter().map(|run| run.to_markdown(options)).collect();
    Ok(pieces.join(&RUN_SEPARATOR.to_string()))
}

/// Tree → markdown serializer holding its default options
#[derive(Debug, Clone, Default)]
pub struct MarkdownSerializer {
    default_options: SerializerOptions,
}

impl MarkdownSerializer {
    pub fn new(default_options: SerializerOptions) -> Self {
        Self { default_options }
    }

    pub fn default_options(&self) -> &SerializerOptions {
        &self.default_options
    }

    pub fn serialize<T: StyledText>(&self, tree: &T) -> Result<String, TranscodeError> {
        serialize(tree, &self.default_options)
    }

    pub fn serialize_with<T: StyledText>(
        &self,
        tree: &T,
        options: &SerializerOptions,
    ) -> Result<String, TranscodeError> {
        serialize(tree, options)
    }
}
