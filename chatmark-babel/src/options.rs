//! Immutable options for both pipelines.
//!
//! Every `with_*` method returns a new value and leaves the receiver untouched, so one options
//! value can be shared across threads and calls. Renderer registration is checked when the
//! renderer is added, not when a message is rendered.

use crate::error::TranscodeError;
use crate::grammar::{discord, Parser, Rule, RuleParser, RuleSet};
use crate::render::{NodeRenderer, RenderTarget};
use crate::text::Translation;
use crate::DEFAULT_MAX_DEPTH;
use std::fmt;
use std::sync::Arc;

/// Resolves a keybind name to its display text
pub type KeybindProvider = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Resolves a translatable node to its display text
pub type TranslationProvider = Arc<dyn Fn(&Translation) -> String + Send + Sync>;

/// Options for the styled tree → markdown direction
#[derive(Clone)]
pub struct SerializerOptions {
    embed_links: bool,
    escape_markdown: bool,
    keybind_provider: Option<KeybindProvider>,
    translation_provider: Option<TranslationProvider>,
    max_depth: usize,
}

impl SerializerOptions {
    pub fn new(
        embed_links: bool,
        escape_markdown: bool,
        keybind_provider: Option<KeybindProvider>,
        translation_provider: Option<TranslationProvider>,
    ) -> Self {
        Self {
            embed_links,
            escape_markdown,
            keybind_provider,
            translation_provider,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Links not embedded, markdown escaped, keybinds shown by name, translations shown by their
    /// fallback text or else their key
    pub fn defaults() -> Self {
        Self::new(
            false,
            true,
            Some(Arc::new(|name: &str| name.to_string())),
            Some(Arc::new(|translation: &Translation| {
                translation
                    .fallback
                    .clone()
                    .unwrap_or_else(|| translation.key.clone())
            })),
        )
    }

    pub fn embed_links(&self) -> bool {
        self.embed_links
    }

    pub fn escape_markdown(&self) -> bool {
        self.escape_markdown
    }

    pub fn keybind_provider(&self) -> Option<&KeybindProvider> {
        self.keybind_provider.as_ref()
    }

    pub fn translation_provider(&self) -> Option<&TranslationProvider> {
        self.translation_provider.as_ref()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn with_embed_links(&self, embed_links: bool) -> Self {
        Self {
            embed_links,
            ..self.clone()
        }
    }

    pub fn with_escape_markdown(&self, escape_markdown: bool) -> Self {
        Self {
            escape_markdown,
            ..self.clone()
        }
    }

    pub fn with_keybind_provider(&self, provider: Option<KeybindProvider>) -> Self {
        Self {
            keybind_provider: provider,
            ..self.clone()
        }
    }

    pub fn with_translation_provider(&self, provider: Option<TranslationProvider>) -> Self {
        Self {
            translation_provider: provider,
            ..self.clone()
        }
    }

    pub fn with_max_depth(&self, max_depth: usize) -> Self {
        Self {
            max_depth,
            ..self.clone()
        }
    }
}

impl Default for SerializerOptions {
    fn default() -> Self {
        Self::defaults()
    }
}

impl fmt::Debug for SerializerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializerOptions")
            .field("embed_links", &self.embed_links)
            .field("escape_markdown", &self.escape_markdown)
            .field("keybind_provider", &self.keybind_provider.is_some())
            .field("translation_provider", &self.translation_provider.is_some())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

/// Options for the markdown → styled tree (or escaped string) direction
pub struct RenderOptions<O> {
    parser: Arc<dyn Parser>,
    rules: RuleSet,
    renderers: Vec<Arc<dyn NodeRenderer<O>>>,
    debug: bool,
    max_depth: usize,
}

// Manual impl: a derive would require `O: Clone`
impl<O> Clone for RenderOptions<O> {
    fn clone(&self) -> Self {
        Self {
            parser: Arc::clone(&self.parser),
            rules: self.rules.clone(),
            renderers: self.renderers.clone(),
            debug: self.debug,
            max_depth: self.max_depth,
        }
    }
}

impl<O: RenderTarget> RenderOptions<O> {
    pub fn new(parser: Arc<dyn Parser>, rules: RuleSet, debug: bool) -> Self {
        Self {
            parser,
            rules,
            renderers: Vec::new(),
            debug,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// The bundled parser with the full chat grammar and no extra renderers
    pub fn defaults() -> Self {
        Self::new(Arc::new(RuleParser::new()), discord::all_rules(true), false)
    }

    pub fn parser(&self) -> &Arc<dyn Parser> {
        &self.parser
    }

    pub fn rules(&self) -> &[Arc<dyn Rule>] {
        &self.rules
    }

    pub fn renderers(&self) -> &[Arc<dyn NodeRenderer<O>>] {
        &self.renderers
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn with_parser(&self, parser: Arc<dyn Parser>) -> Self {
        Self {
            parser,
            ..self.clone()
        }
    }

    pub fn with_rules(&self, rules: RuleSet) -> Self {
        Self {
            rules,
            ..self.clone()
        }
    }

    pub fn with_debug(&self, debug: bool) -> Self {
        Self {
            debug,
            ..self.clone()
        }
    }

    /// Limit for markdown nesting in the renderer chain. The bundled parser carries its own
    /// limit; see [`RuleParser::with_max_depth`].
    pub fn with_max_depth(&self, max_depth: usize) -> Self {
        Self {
            max_depth,
            ..self.clone()
        }
    }

    /// Appends a renderer; it runs after the ones already registered
    pub fn add_renderer(&self, renderer: Arc<dyn NodeRenderer<O>>) -> Result<Self, TranscodeError> {
        let index = self.renderers.len();
        self.insert_renderer(index, renderer)
    }

    /// Inserts a renderer at `index`, clamped to the end of the chain
    pub fn insert_renderer(
        &self,
        index: usize,
        renderer: Arc<dyn NodeRenderer<O>>,
    ) -> Result<Self, TranscodeError> {
        if renderer.is_builtin_default() {
            return Err(TranscodeError::ReservedRenderer(renderer.name().to_string()));
        }
        if self.position_of(&renderer).is_some() {
            return Err(TranscodeError::DuplicateRenderer(renderer.name().to_string()));
        }
        let mut renderers = self.renderers.clone();
        renderers.insert(index.min(renderers.len()), renderer);
        Ok(Self {
            renderers,
            ..self.clone()
        })
    }

    /// Removes a previously registered renderer instance
    pub fn remove_renderer(&self, renderer: &Arc<dyn NodeRenderer<O>>) -> Result<Self, TranscodeError> {
        let index = self
            .position_of(renderer)
            .ok_or_else(|| TranscodeError::RendererNotRegistered(renderer.name().to_string()))?;
        let mut renderers = self.renderers.clone();
        renderers.remove(index);
        Ok(Self {
            renderers,
            ..self.clone()
        })
    }

    fn position_of(&self, renderer: &Arc<dyn NodeRenderer<O>>) -> Option<usize> {
        let target = Arc::as_ptr(renderer) as *const ();
        self.renderers
            .iter()
            .position(|registered| Arc::as_ptr(registered) as *const () == target)
    }
}

impl RenderOptions<String> {
    /// The bundled parser with the escape-mode rule order
    pub fn escape_defaults() -> Self {
        Self::new(Arc::new(RuleParser::new()), discord::escape_rules(), false)
    }
}

impl<O: RenderTarget> Default for RenderOptions<O> {
    fn default() -> Self {
        Self::defaults()
    }
}

impl<O> fmt::Debug for RenderOptions<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let renderers: Vec<&str> = self.renderers.iter().map(|r| r.name()).collect();
        f.debug_struct("RenderOptions")
            .field("parser", &self.parser)
            .field("rules", &self.rules.len())
            .field("renderers", &renderers)
            .field("debug", &self.debug)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}
