//! The renderer chain (Markdown → Tree)
//!
//!     Every AST node goes through the same two-phase dispatch:
//!
//!     1. **Render.** The configured renderers are asked in order. A renderer that handles the
//!        node returns `Some(result)`; `None` passes the node on. When nobody handles it, the
//!        target's built-in default renderer does, and it always produces a result.
//!     2. **Children.** Each child is rendered the same way, starting from a value derived from
//!        the node's result (for trees: an empty node with the same style), and appended to it.
//!     3. **After children.** The renderer that handled the node gets a second look at the
//!        fully-appended result through [`NodeRenderer::render_after_children`]. A returned value
//!        replaces the result; `None` keeps it.
//!
//!     The accumulator type is the only thing that differs between output modes: styled trees
//!     (any [`StyledText`]) and escaped markdown strings (`String`) share this driver through
//!     the [`RenderTarget`] trait.
//!
//!     Quote and spoiler contents are re-parsed and rendered through
//!     [`RenderContext::render_source`], a re-entrant call into the same pipeline with a
//!     different parse mode.

pub mod escaping;
pub mod tree;

pub use escaping::EscapingRenderer;
pub use tree::DefaultTreeRenderer;

use crate::ast::{flatten, Node};
use crate::error::TranscodeError;
use crate::grammar::ParseMode;
use crate::options::RenderOptions;
use crate::text::StyledText;
use std::sync::Arc;
use tracing::{trace, warn};

/// A value the renderer chain can accumulate into
pub trait RenderTarget: Clone + Default + Send + Sync + 'static {
    /// The starting value for a child rendered under `parent`
    fn derive_from(parent: &Self) -> Self;

    /// Appends a rendered child
    fn push_rendered(&mut self, child: Self);

    /// The built-in renderer that handles whatever the configured renderers pass on
    fn fallback_renderer() -> Arc<dyn NodeRenderer<Self>>;
}

impl RenderTarget for String {
    fn derive_from(_parent: &Self) -> Self {
        String::new()
    }

    fn push_rendered(&mut self, child: Self) {
        self.push_str(&child);
    }

    fn fallback_renderer() -> Arc<dyn NodeRenderer<Self>> {
        Arc::new(EscapingRenderer)
    }
}

impl<T: StyledText> RenderTarget for T {
    fn derive_from(parent: &Self) -> Self {
        T::with_style_of(parent)
    }

    fn push_rendered(&mut self, child: Self) {
        StyledText::append(self, child);
    }

    fn fallback_renderer() -> Arc<dyn NodeRenderer<Self>> {
        Arc::new(DefaultTreeRenderer::<T>::new())
    }
}

/// A pluggable step of the renderer chain
pub trait NodeRenderer<O>: Send + Sync {
    /// Identifies the renderer in errors and logs
    fn name(&self) -> &str;

    /// Renders `node` starting from `render_to`, or returns `None` to pass
    fn render(
        &self,
        render_to: &O,
        node: &mut Node,
        ctx: &RenderContext<'_, O>,
    ) -> Result<Option<O>, TranscodeError>;

    /// True only for the built-in fallbacks, which can never be registered explicitly
    fn is_builtin_default(&self) -> bool {
        false
    }

    /// Post-processes the result once all children have been appended
    fn render_after_children(
        &self,
        _rendered: &O,
        _node: &Node,
        _ctx: &RenderContext<'_, O>,
    ) -> Result<Option<O>, TranscodeError> {
        Ok(None)
    }
}

/// What a renderer can reach while rendering one node
pub struct RenderContext<'a, O> {
    options: &'a RenderOptions<O>,
    fallback: &'a Arc<dyn NodeRenderer<O>>,
    base: O,
    depth: usize,
}

impl<'a, O: RenderTarget> RenderContext<'a, O> {
    pub fn options(&self) -> &RenderOptions<O> {
        self.options
    }

    /// Nesting depth of the node being rendered
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Renders another node (and its children) as if it were a child of the current node
    pub fn render_with_children(&self, node: &mut Node) -> Result<O, TranscodeError> {
        render_node(node, &self.base, self.options, self.fallback, self.depth + 1)
    }

    /// Parses `source` in `mode` and renders every resulting node under the current node
    pub fn render_source(&self, source: &str, mode: ParseMode) -> Result<O, TranscodeError> {
        let mut output = O::default();
        for mut node in parse_source(source, mode, self.options)? {
            output.push_rendered(self.render_with_children(&mut node)?);
        }
        Ok(output)
    }
}

/// Parses and flattens `source` with the options' parser and rules
pub fn parse_source<O: RenderTarget>(
    source: &str,
    mode: ParseMode,
    options: &RenderOptions<O>,
) -> Result<Vec<Node>, TranscodeError> {
    let nodes = options
        .parser()
        .parse(source, mode, options.rules(), options.debug())?;
    Ok(flatten(nodes))
}

/// Parses a whole message and renders it into a fresh accumulator
pub fn render_markdown<O: RenderTarget>(
    source: &str,
    options: &RenderOptions<O>,
) -> Result<O, TranscodeError> {
    let nodes = parse_source(source, ParseMode::Default, options)?;
    render_nodes(nodes, options)
}

/// Renders already-parsed top-level nodes
pub fn render_nodes<O: RenderTarget>(
    nodes: Vec<Node>,
    options: &RenderOptions<O>,
) -> Result<O, TranscodeError> {
    let fallback = O::fallback_renderer();
    let root = O::default();
    let mut output = O::default();
    for mut node in nodes {
        output.push_rendered(render_node(&mut node, &root, options, &fallback, 0)?);
    }
    Ok(output)
}

fn render_node<O: RenderTarget>(
    node: &mut Node,
    parent: &O,
    options: &RenderOptions<O>,
    fallback: &Arc<dyn NodeRenderer<O>>,
    depth: usize,
) -> Result<O, TranscodeError> {
    if depth > options.max_depth() {
        warn!(limit = options.max_depth(), "markdown nesting limit reached while rendering");
        return Err(TranscodeError::NestingTooDeep {
            limit: options.max_depth(),
        });
    }

    let seed = O::derive_from(parent);
    let ctx = RenderContext {
        options,
        fallback,
        base: seed.clone(),
        depth,
    };

    let mut handled = None;
    for renderer in options.renderers() {
        if let Some(output) = renderer.render(&seed, node, &ctx)? {
            handled = Some((renderer, output));
            break;
        }
    }
    let (renderer, mut output) = match handled {
        Some(found) => found,
        None => {
            let output = fallback.render(&seed, node, &ctx)?.unwrap_or_else(|| seed.clone());
            (fallback, output)
        }
    };
    trace!(renderer = renderer.name(), depth, "rendered node");

    if let Some(children) = node.children_mut() {
        for child in children.iter_mut() {
            let rendered = render_node(child, &output, options, fallback, depth + 1)?;
            output.push_rendered(rendered);
        }
    }

    if let Some(replaced) = renderer.render_after_children(&output, node, &ctx)? {
        output = replaced;
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{StyleKind, TextStyle};
    use crate::text::Component;

    /// Upper-cases text nodes, passes everything else
    struct Shout;

    impl NodeRenderer<Component> for Shout {
        fn name(&self) -> &str {
            "shout"
        }

        fn render(
            &self,
            _render_to: &Component,
            node: &mut Node,
            _ctx: &RenderContext<'_, Component>,
        ) -> Result<Option<Component>, TranscodeError> {
            Ok(node.as_text().map(|text| Component::text(text.to_uppercase())))
        }
    }

    /// Counts how many children the node ended up with
    struct CountChildren;

    impl NodeRenderer<String> for CountChildren {
        fn name(&self) -> &str {
            "count-children"
        }

        fn render(
            &self,
            render_to: &String,
            node: &mut Node,
            _ctx: &RenderContext<'_, String>,
        ) -> Result<Option<String>, TranscodeError> {
            Ok(matches!(node, Node::Style(_)).then(|| render_to.clone()))
        }

        fn render_after_children(
            &self,
            rendered: &String,
            node: &Node,
            _ctx: &RenderContext<'_, String>,
        ) -> Result<Option<String>, TranscodeError> {
            Ok(Some(format!("{rendered}[{}]", node.children().len())))
        }
    }

    #[test]
    fn test_configured_renderer_runs_before_default() {
        let options = RenderOptions::<Component>::defaults()
            .add_renderer(Arc::new(Shout))
            .unwrap();
        let output = render_markdown("**hi** there", &options).unwrap();
        assert_eq!(output.plain_text(), "HI THERE");
        assert!(output.extra[0].style.bold, "style nodes still reach the default renderer");
    }

    #[test]
    fn test_after_children_sees_appended_children() {
        let options = RenderOptions::<String>::escape_defaults()
            .add_renderer(Arc::new(CountChildren))
            .unwrap();
        let output = render_markdown("**a _b_**", &options).unwrap();
        assert_eq!(output, "a b[1][2]");
    }

    #[test]
    fn test_fallback_handles_every_node() {
        let nodes = vec![
            Node::text("x"),
            Node::styled(TextStyle::new(StyleKind::Bold), vec![Node::text("y")]),
            Node::Other(crate::ast::OtherNode {
                kind: "selector".to_string(),
                attributes: Default::default(),
                children: vec![Node::text("z")],
            }),
        ];
        let output = render_nodes(nodes, &RenderOptions::<Component>::defaults()).unwrap();
        assert_eq!(output.plain_text(), "xyz");
    }

    #[test]
    fn test_render_depth_limit() {
        let mut node = Node::text("leaf");
        for _ in 0..10 {
            node = Node::styled(TextStyle::new(StyleKind::Bold), vec![node]);
        }
        let options = RenderOptions::<Component>::defaults().with_max_depth(4);
        assert_eq!(
            render_nodes(vec![node], &options),
            Err(TranscodeError::NestingTooDeep { limit: 4 })
        );
    }
}
