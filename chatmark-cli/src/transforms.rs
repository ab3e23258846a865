//! CLI-specific transforms
//!
//! This module defines all the transforms available to `chatmark inspect`.
//! Each transform is a stage + format combination (e.g., "ast-treeviz", "tree-json").
//!
//! ## Transform Pipeline
//!
//! Reading a chat message goes through two stages:
//!
//! 1. **Parsing** - Markdown → AST (rule engine + flattening)
//!    - `ast-treeviz`: Tree visualization with Unicode icons
//!    - `ast-debug`: Rust debug dump of the nodes
//!
//! 2. **Rendering** - AST → styled tree (renderer chain)
//!    - `tree-treeviz`: Tree visualization of the styled tree
//!    - `tree-json`: JSON representation of the styled tree
//!    - `tree-plain`: Visible text only
//!    - `tree-markdown`: The styled tree serialized back to markdown
//!
//! `escaped` runs the escape-mode chain instead and prints the message with all markdown
//! syntax neutralized.
//!
//! All transforms honor the loaded configuration: the renderer section drives parsing and
//! rendering, the serializer section drives `tree-markdown`.

use chatmark_babel::formats::{ast_to_treeviz, tree_to_treeviz};
use chatmark_babel::grammar::ParseMode;
use chatmark_babel::render::parse_source;
use chatmark_babel::text::StyledText;
use chatmark_babel::{Component, MarkdownSerializer, RenderOptions, SerializerOptions, TreeSerializer};
use chatmark_config::ChatmarkConfig;

/// All available transform combinations
pub const AVAILABLE_TRANSFORMS: &[&str] = &[
    "ast-treeviz",
    "ast-debug",
    "tree-treeviz",
    "tree-json",
    "tree-plain",
    "tree-markdown",
    "escaped",
];

/// Transform used when `inspect` is given none
pub const DEFAULT_TRANSFORM: &str = "ast-treeviz";

/// Builds the tree serializer described by the configuration
pub fn tree_serializer(config: &ChatmarkConfig) -> TreeSerializer<Component> {
    TreeSerializer::new(
        config.renderer.apply(&RenderOptions::<Component>::defaults()),
        config.renderer.apply(&RenderOptions::<String>::escape_defaults()),
    )
}

/// Builds the markdown serializer described by the configuration
pub fn markdown_serializer(config: &ChatmarkConfig) -> MarkdownSerializer {
    MarkdownSerializer::new(SerializerOptions::from(&config.serializer))
}

/// Execute a named transform on a markdown message
///
/// # Examples
///
/// ```ignore
/// let config = chatmark_config::load_defaults()?;
/// let output = execute_transform("**hi**", "ast-treeviz", &config)?;
/// ```
pub fn execute_transform(
    source: &str,
    transform_name: &str,
    config: &ChatmarkConfig,
) -> Result<String, String> {
    let serializer = tree_serializer(config);

    match transform_name {
        "ast-treeviz" => {
            let nodes = parse_source(source, ParseMode::Default, serializer.default_options())
                .map_err(|e| format!("Transform failed: {e}"))?;
            Ok(ast_to_treeviz(&nodes))
        }
        "ast-debug" => {
            let nodes = parse_source(source, ParseMode::Default, serializer.default_options())
                .map_err(|e| format!("Transform failed: {e}"))?;
            Ok(format!("{nodes:#?}\n"))
        }
        "tree-treeviz" => {
            let tree = serializer
                .parse(source)
                .map_err(|e| format!("Transform failed: {e}"))?;
            Ok(tree_to_treeviz(&tree))
        }
        "tree-json" => {
            let tree = serializer
                .parse(source)
                .map_err(|e| format!("Transform failed: {e}"))?;
            let json = serde_json::to_string_pretty(&tree)
                .map_err(|e| format!("JSON serialization failed: {e}"))?;
            Ok(format!("{json}\n"))
        }
        "tree-plain" => {
            let tree = serializer
                .parse(source)
                .map_err(|e| format!("Transform failed: {e}"))?;
            Ok(format!("{}\n", tree.plain_text()))
        }
        "tree-markdown" => {
            let tree = serializer
                .parse(source)
                .map_err(|e| format!("Transform failed: {e}"))?;
            let markdown = markdown_serializer(config)
                .serialize(&tree)
                .map_err(|e| format!("Serialization failed: {e}"))?;
            Ok(format!("{markdown}\n"))
        }
        "escaped" => {
            let escaped = serializer
                .escape_markdown(source)
                .map_err(|e| format!("Transform failed: {e}"))?;
            Ok(format!("{escaped}\n"))
        }
        _ => Err(format!("Unknown transform: {transform_name}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> ChatmarkConfig {
        chatmark_config::load_defaults().unwrap()
    }

    #[test]
    fn test_every_listed_transform_runs() {
        let config = defaults();
        for transform in AVAILABLE_TRANSFORMS {
            let output = execute_transform("**hi** _there_", transform, &config);
            assert!(output.is_ok(), "{transform} failed: {output:?}");
        }
    }

    #[test]
    fn test_ast_treeviz_lists_top_level_nodes() {
        let output = execute_transform("**hi** there", "ast-treeviz", &defaults()).unwrap();
        assert!(output.starts_with("⧉ Message (2 nodes)"));
    }

    #[test]
    fn test_tree_plain() {
        let output = execute_transform("**a** ||b||", "tree-plain", &defaults()).unwrap();
        assert_eq!(output, "a ▌\n");
    }

    #[test]
    fn test_escaped() {
        let output = execute_transform("**a**", "escaped", &defaults()).unwrap();
        assert_eq!(output, "\\*\\*a\\*\\*\n");
    }

    #[test]
    fn test_tree_markdown_goes_back_to_markdown() {
        let output = execute_transform("**a** b", "tree-markdown", &defaults()).unwrap();
        assert_eq!(output, "**a**\u{200B} b\n");
    }

    #[test]
    fn test_unknown_transform() {
        let err = execute_transform("a", "token-json", &defaults()).unwrap_err();
        assert!(err.contains("Unknown transform"));
    }

    #[test]
    fn test_depth_limit_from_config_applies() {
        let mut config = defaults();
        config.renderer.max_depth = 1;
        let err = execute_transform("**a _b_**", "tree-plain", &config).unwrap_err();
        assert!(err.starts_with("Transform failed"));
    }
}
