//! Shared icon mapping for tree visualization
//!
//! One icon per node kind, for both the markdown AST and styled text trees, so the two views
//! read alike.

/// Get the Unicode icon for a node kind
///
/// AST kinds use the style kind names (`bold`, `quote`, ...); styled tree nodes use their
/// content kind (`literal`, `keybind`, ...).
pub fn get_icon(node_type: &str) -> &'static str {
    match node_type {
        "message" => "⧉",
        "text" | "literal" => "◦",
        "bold" => "𝐁",
        "italics" => "𝐼",
        "underline" => "_",
        "strikethrough" => "≠",
        "code_string" | "code_block" => "ƒ",
        "quote" => "❝",
        "spoiler" => "▌",
        "mention_emoji" => ":",
        "mention_channel" => "#",
        "mention_user" => "@",
        "mention_role" => "&",
        "empty" => "∅",
        "keybind" => "⌨",
        "translatable" => "⊕",
        "score" => "№",
        "selector" => "⋯",
        "nbt" => "𝒱",
        "hover" => "↳",
        _ => "○",
    }
}
