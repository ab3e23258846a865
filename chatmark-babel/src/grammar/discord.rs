//! Chat markdown grammar
//!
//! Rules for the chat platform's markdown dialect:
//!
//! | Rule           | Syntax                         | Node                                         |
//! |----------------|--------------------------------|----------------------------------------------|
//! | escape         | `\*`                           | text `*`                                     |
//! | newline        | `\n`                           | text `\n`                                    |
//! | bold           | `**x**`                        | BOLD, children parsed                        |
//! | underline      | `__x__`                        | UNDERLINE, children parsed                   |
//! | italics        | `_x_` or `*x*`                 | ITALICS, children parsed                     |
//! | strikethrough  | `~~x~~`                        | STRIKETHROUGH, children parsed               |
//! | spoiler        | `\|\|x\|\|`                    | SPOILER, `content` = `x`                     |
//! | code block     | ```` ```lang\nx``` ````        | CODE_BLOCK, `language`, child text `x`       |
//! | code string    | `` `x` `` or ``` ``x`` ```     | CODE_STRING, child text `x`                  |
//! | quote          | `> x` or `>>> x`               | QUOTE, `content` = `x`                       |
//! | mentions       | `<:name:id>` `<#id>` `<@id>` `<@&id>` | MENTION_*, `name` / `id`             |
//! | text           | anything else                  | text                                         |
//!
//! Quotes only start at the beginning of a line and never inside another quote. Spoiler and
//! quote contents are kept raw; the renderer re-parses them.
//!
//! The delimiter rules need lookahead ("closing `**` not followed by another `*`"), which the
//! `regex` crate does not offer, so they scan by hand. Patterns without lookaround use `regex`.

use super::{ParseMode, ParseState, Rule, RuleMatch, RuleSet};
use crate::ast::{Node, StyleKind, TextStyle};
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;
use std::sync::Arc;

static ESCAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\\([^0-9A-Za-z\s])").unwrap());
static NEWLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:\n *)*\n").unwrap());
static CODE_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:([^\s`]+)\n)?\n*(.+?)\n*```").unwrap());
static CODE_STRING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^``([^`]+)``|^`([^`]+)`").unwrap());
static BLOCK_QUOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)^ *>>> (.*)").unwrap());
static LINE_QUOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ *> ([^\n]*\n?)").unwrap());
static EMOJI_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<(a?):([a-zA-Z0-9_]+):([0-9]+)>").unwrap());
static CHANNEL_MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<#([0-9]+)>").unwrap());
static ROLE_MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<@&([0-9]+)>").unwrap());
static USER_MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<@!?([0-9]+)>").unwrap());

/// Every rule of the dialect, style rules first
pub fn all_rules(include_text: bool) -> RuleSet {
    let mut rules = style_rules();
    rules.extend(markdown_rules());
    if include_text {
        rules.push(text_rule());
    }
    rules
}

/// Rules used when a message is only being escaped
pub fn escape_rules() -> RuleSet {
    let mut rules = markdown_rules();
    rules.extend(style_rules());
    rules.push(text_rule());
    rules
}

/// Escapes, newlines and the four inline emphasis styles
pub fn markdown_rules() -> RuleSet {
    vec![
        Arc::new(EscapeRule),
        Arc::new(NewlineRule),
        Arc::new(BoldRule),
        Arc::new(UnderlineRule),
        Arc::new(ItalicsRule),
        Arc::new(StrikethroughRule),
    ]
}

/// Chat-specific constructs: quotes, spoilers, code and mentions
pub fn style_rules() -> RuleSet {
    vec![
        Arc::new(QuoteRule),
        Arc::new(SpoilerRule),
        Arc::new(CodeBlockRule),
        Arc::new(CodeStringRule),
        Arc::new(EmojiMentionRule),
        Arc::new(ChannelMentionRule),
        Arc::new(RoleMentionRule),
        Arc::new(UserMentionRule),
    ]
}

/// The catch-all text rule; always last
pub fn text_rule() -> Arc<dyn Rule> {
    Arc::new(TextRule)
}

/// Finds `open inner close` at the start of `source` with a non-empty inner part, taking the
/// first `close` that is not directly followed by `forbidden`. Returns the inner end offset and
/// the total match length.
fn delimited(
    source: &str,
    open: &str,
    close: &str,
    forbidden: Option<char>,
) -> Option<(usize, usize)> {
    let body = source.strip_prefix(open)?;
    let mut from = 0;
    while let Some(found) = body.get(from..)?.find(close) {
        let at = from + found;
        let after = &body[at + close.len()..];
        if at > 0 && forbidden.map_or(true, |c| !after.starts_with(c)) {
            return Some((open.len() + at, open.len() + at + close.len()));
        }
        from = at + 1;
    }
    None
}

/// A style node whose children are parsed from `inner`
fn style_match(kind: StyleKind, inner: Range<usize>, length: usize) -> RuleMatch {
    RuleMatch::nested(
        length,
        Node::styled(TextStyle::new(kind), Vec::new()),
        inner,
        ParseMode::Default,
    )
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[derive(Debug)]
struct EscapeRule;

impl Rule for EscapeRule {
    fn name(&self) -> &str {
        "escape"
    }

    fn apply(&self, source: &str, _state: &ParseState<'_>) -> Option<RuleMatch> {
        let caps = ESCAPE.captures(source)?;
        let whole = caps.get(0)?;
        Some(RuleMatch::leaf(whole.end(), Node::text(&caps[1])))
    }
}

#[derive(Debug)]
struct NewlineRule;

impl Rule for NewlineRule {
    fn name(&self) -> &str {
        "newline"
    }

    fn apply(&self, source: &str, _state: &ParseState<'_>) -> Option<RuleMatch> {
        let whole = NEWLINE.find(source)?;
        Some(RuleMatch::leaf(whole.end(), Node::text("\n")))
    }
}

#[derive(Debug)]
struct BoldRule;

impl Rule for BoldRule {
    fn name(&self) -> &str {
        "bold"
    }

    fn apply(&self, source: &str, _state: &ParseState<'_>) -> Option<RuleMatch> {
        let (inner_end, length) = delimited(source, "**", "**", Some('*'))?;
        Some(style_match(StyleKind::Bold, 2..inner_end, length))
    }
}

#[derive(Debug)]
struct UnderlineRule;

impl Rule for UnderlineRule {
    fn name(&self) -> &str {
        "underline"
    }

    fn apply(&self, source: &str, _state: &ParseState<'_>) -> Option<RuleMatch> {
        let (inner_end, length) = delimited(source, "__", "__", Some('_'))?;
        Some(style_match(StyleKind::Underline, 2..inner_end, length))
    }
}

#[derive(Debug)]
struct ItalicsRule;

impl ItalicsRule {
    /// `_x_`: the closing underscore must end a word; `__` and escapes may appear inside
    fn underscore(body: &str) -> Option<usize> {
        let mut i = 0;
        let mut parts = 0;
        loop {
            let rest = &body[i..];
            if parts > 0 && rest.starts_with('_') {
                let next = rest[1..].chars().next();
                if !next.is_some_and(is_word_char) {
                    return Some(i);
                }
            }
            if rest.starts_with("__") {
                i += 2;
            } else if let Some(escaped) = rest.strip_prefix('\\') {
                i += 1 + escaped.chars().next()?.len_utf8();
            } else {
                let c = rest.chars().next()?;
                if c == '_' {
                    return None;
                }
                i += c.len_utf8();
            }
            parts += 1;
        }
    }

    /// `*x*`: must not start with whitespace, closing star must not be doubled
    fn star(body: &str) -> Option<usize> {
        if body.chars().next().map_or(true, char::is_whitespace) {
            return None;
        }
        let mut i = 0;
        let mut parts = 0;
        loop {
            let rest = &body[i..];
            if parts > 0 && rest.starts_with('*') && !rest[1..].starts_with('*') {
                return Some(i);
            }
            if rest.starts_with("**") {
                i += 2;
            } else {
                let c = rest.chars().next()?;
                if c.is_whitespace() {
                    let trimmed = rest.trim_start();
                    i += rest.len() - trimmed.len();
                    if trimmed.starts_with("**") {
                        i += 2;
                    } else {
                        let next = trimmed.chars().next()?;
                        if next == '*' {
                            return None;
                        }
                        i += next.len_utf8();
                    }
                } else if c == '*' {
                    return None;
                } else {
                    i += c.len_utf8();
                }
            }
            parts += 1;
        }
    }
}

impl Rule for ItalicsRule {
    fn name(&self) -> &str {
        "italics"
    }

    fn apply(&self, source: &str, _state: &ParseState<'_>) -> Option<RuleMatch> {
        let inner_len = if let Some(body) = source.strip_prefix('_') {
            Self::underscore(body)?
        } else if let Some(body) = source.strip_prefix('*') {
            Self::star(body)?
        } else {
            return None;
        };
        Some(style_match(StyleKind::Italics, 1..1 + inner_len, inner_len + 2))
    }
}

#[derive(Debug)]
struct StrikethroughRule;

impl Rule for StrikethroughRule {
    fn name(&self) -> &str {
        "strikethrough"
    }

    fn apply(&self, source: &str, _state: &ParseState<'_>) -> Option<RuleMatch> {
        let body = source.strip_prefix("~~")?;
        if body.chars().next().map_or(true, char::is_whitespace) {
            return None;
        }
        let mut from = 0;
        while let Some(found) = body.get(from..)?.find("~~") {
            let at = from + found;
            if at > 0 && !body[..at].ends_with(char::is_whitespace) {
                return Some(style_match(StyleKind::Strikethrough, 2..2 + at, at + 4));
            }
            from = at + 1;
        }
        None
    }
}

#[derive(Debug)]
struct SpoilerRule;

impl Rule for SpoilerRule {
    fn name(&self) -> &str {
        "spoiler"
    }

    fn apply(&self, source: &str, _state: &ParseState<'_>) -> Option<RuleMatch> {
        let (inner_end, length) = delimited(source, "||", "||", None)?;
        let style = TextStyle::new(StyleKind::Spoiler).with_extra("content", &source[2..inner_end]);
        Some(RuleMatch::leaf(length, Node::styled(style, Vec::new())))
    }
}

#[derive(Debug)]
struct CodeBlockRule;

impl Rule for CodeBlockRule {
    fn name(&self) -> &str {
        "code_block"
    }

    fn apply(&self, source: &str, _state: &ParseState<'_>) -> Option<RuleMatch> {
        let caps = CODE_BLOCK.captures(source)?;
        let whole = caps.get(0)?;
        let mut style = TextStyle::new(StyleKind::CodeBlock);
        if let Some(language) = caps.get(1) {
            style = style.with_extra("language", language.as_str());
        }
        let code = Node::text(&caps[2]);
        Some(RuleMatch::leaf(whole.end(), Node::styled(style, vec![code])))
    }
}

#[derive(Debug)]
struct CodeStringRule;

impl Rule for CodeStringRule {
    fn name(&self) -> &str {
        "code_string"
    }

    fn apply(&self, source: &str, _state: &ParseState<'_>) -> Option<RuleMatch> {
        let caps = CODE_STRING.captures(source)?;
        let whole = caps.get(0)?;
        let code = caps.get(1).or_else(|| caps.get(2))?;
        Some(RuleMatch::leaf(
            whole.end(),
            Node::styled(
                TextStyle::new(StyleKind::CodeString),
                vec![Node::text(code.as_str())],
            ),
        ))
    }
}

#[derive(Debug)]
struct QuoteRule;

impl Rule for QuoteRule {
    fn name(&self) -> &str {
        "quote"
    }

    fn apply(&self, source: &str, state: &ParseState<'_>) -> Option<RuleMatch> {
        if state.mode == ParseMode::Quote || !state.at_line_start() {
            return None;
        }
        let caps = BLOCK_QUOTE
            .captures(source)
            .or_else(|| LINE_QUOTE.captures(source))?;
        let whole = caps.get(0)?;
        let style = TextStyle::new(StyleKind::Quote).with_extra("content", &caps[1]);
        Some(RuleMatch::leaf(whole.end(), Node::styled(style, Vec::new())))
    }
}

#[derive(Debug)]
struct EmojiMentionRule;

impl Rule for EmojiMentionRule {
    fn name(&self) -> &str {
        "mention_emoji"
    }

    fn apply(&self, source: &str, _state: &ParseState<'_>) -> Option<RuleMatch> {
        let caps = EMOJI_MENTION.captures(source)?;
        let whole = caps.get(0)?;
        let style = TextStyle::new(StyleKind::MentionEmoji)
            .with_extra("animated", (!caps[1].is_empty()).to_string())
            .with_extra("name", &caps[2])
            .with_extra("id", &caps[3]);
        Some(RuleMatch::leaf(whole.end(), Node::styled(style, Vec::new())))
    }
}

/// Generates a rule for a `<prefix id>` mention
macro_rules! id_mention_rule {
    ($rule:ident, $name:literal, $pattern:ident, $kind:expr) => {
        #[derive(Debug)]
        struct $rule;

        impl Rule for $rule {
            fn name(&self) -> &str {
                $name
            }

            fn apply(&self, source: &str, _state: &ParseState<'_>) -> Option<RuleMatch> {
                let caps = $pattern.captures(source)?;
                let whole = caps.get(0)?;
                let style = TextStyle::new($kind).with_extra("id", &caps[1]);
                Some(RuleMatch::leaf(whole.end(), Node::styled(style, Vec::new())))
            }
        }
    };
}

id_mention_rule!(ChannelMentionRule, "mention_channel", CHANNEL_MENTION, StyleKind::MentionChannel);
id_mention_rule!(RoleMentionRule, "mention_role", ROLE_MENTION, StyleKind::MentionRole);
id_mention_rule!(UserMentionRule, "mention_user", USER_MENTION, StyleKind::MentionUser);

#[derive(Debug)]
struct TextRule;

impl TextRule {
    /// Characters that may continue a text run
    fn is_plain(c: char) -> bool {
        c.is_ascii_alphanumeric()
            || (c.is_whitespace() && c != '\n')
            || ('\u{00c0}'..='\u{ffff}').contains(&c)
            || c == '-'
    }

    /// A text run stops in front of anything that could start another construct
    fn stops_at(rest: &str) -> bool {
        let Some(c) = rest.chars().next() else {
            return true;
        };
        if !Self::is_plain(c) {
            return true;
        }
        let spaces = rest.len() - rest.trim_start_matches(' ').len();
        if spaces >= 2 && rest[spaces..].starts_with('\n') {
            return true;
        }
        // `word:x` may be the start of a URL or an emoji name
        let word = rest.len() - rest.trim_start_matches(is_word_char).len();
        if word > 0 {
            let mut after = rest[word..].chars();
            if after.next() == Some(':') && after.next().is_some_and(|c| !c.is_whitespace()) {
                return true;
            }
        }
        false
    }
}

impl Rule for TextRule {
    fn name(&self) -> &str {
        "text"
    }

    fn apply(&self, source: &str, _state: &ParseState<'_>) -> Option<RuleMatch> {
        let mut chars = source.char_indices();
        chars.next()?;
        let end = chars
            .map(|(i, _)| i)
            .find(|&i| Self::stops_at(&source[i..]))
            .unwrap_or(source.len());
        Some(RuleMatch::leaf(end, Node::text(&source[..end])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::flatten;
    use crate::grammar::{Parser, RuleParser};

    fn parse(source: &str) -> Vec<Node> {
        flatten(
            RuleParser::new()
                .parse(source, ParseMode::Default, &all_rules(true), false)
                .unwrap(),
        )
    }

    fn styled(kind: StyleKind, children: Vec<Node>) -> Node {
        Node::styled(TextStyle::new(kind), children)
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(parse("Hello world"), vec![Node::text("Hello world")]);
    }

    #[test]
    fn test_bold_and_escapes() {
        assert_eq!(
            parse(r"**bold** and \|escaped\|"),
            vec![
                styled(StyleKind::Bold, vec![Node::text("bold")]),
                Node::text(" and |escaped|"),
            ]
        );
    }

    #[test]
    fn test_bold_closing_not_followed_by_star() {
        assert_eq!(
            parse("**a***"),
            vec![styled(StyleKind::Bold, vec![Node::text("a*")])]
        );
    }

    #[test]
    fn test_underline_before_italics() {
        assert_eq!(
            parse("__u__ _i_ *s*"),
            vec![
                styled(StyleKind::Underline, vec![Node::text("u")]),
                Node::text(" "),
                styled(StyleKind::Italics, vec![Node::text("i")]),
                Node::text(" "),
                styled(StyleKind::Italics, vec![Node::text("s")]),
            ]
        );
    }

    #[test]
    fn test_underscore_inside_word_is_not_italics() {
        assert_eq!(parse("snake_case_name"), vec![Node::text("snake_case_name")]);
    }

    #[test]
    fn test_star_italics_needs_non_space_start() {
        assert_eq!(parse("* not italic*"), vec![Node::text("* not italic*")]);
    }

    #[test]
    fn test_strikethrough() {
        assert_eq!(
            parse("~~gone~~"),
            vec![styled(StyleKind::Strikethrough, vec![Node::text("gone")])]
        );
        assert_eq!(parse("~~ gone~~"), vec![Node::text("~~ gone~~")]);
    }

    #[test]
    fn test_nested_styles() {
        assert_eq!(
            parse("**bold _both_**"),
            vec![styled(
                StyleKind::Bold,
                vec![
                    Node::text("bold "),
                    styled(StyleKind::Italics, vec![Node::text("both")]),
                ]
            )]
        );
    }

    #[test]
    fn test_spoiler_keeps_raw_content() {
        let expected = Node::styled(
            TextStyle::new(StyleKind::Spoiler).with_extra("content", "**secret**"),
            vec![],
        );
        assert_eq!(parse("||**secret**||"), vec![expected]);
    }

    #[test]
    fn test_code_string_is_literal() {
        assert_eq!(
            parse("`**not bold**`"),
            vec![styled(StyleKind::CodeString, vec![Node::text("**not bold**")])]
        );
        assert_eq!(
            parse("``double``"),
            vec![styled(StyleKind::CodeString, vec![Node::text("double")])]
        );
    }

    #[test]
    fn test_code_block_language() {
        let expected = Node::styled(
            TextStyle::new(StyleKind::CodeBlock).with_extra("language", "rust"),
            vec![Node::text("let x = 1;")],
        );
        assert_eq!(parse("```rust\nlet x = 1;\n```"), vec![expected]);
    }

    #[test]
    fn test_quote_only_at_line_start() {
        let quote = Node::styled(
            TextStyle::new(StyleKind::Quote).with_extra("content", "quoted\n"),
            vec![],
        );
        assert_eq!(
            parse("> quoted\nplain > not"),
            vec![quote, Node::text("plain > not")]
        );
    }

    #[test]
    fn test_multiline_quote_takes_rest() {
        let quote = Node::styled(
            TextStyle::new(StyleKind::Quote).with_extra("content", "one\ntwo"),
            vec![],
        );
        assert_eq!(parse(">>> one\ntwo"), vec![quote]);
    }

    #[test]
    fn test_no_quote_in_quote_mode() {
        let nodes = flatten(
            RuleParser::new()
                .parse("> x", ParseMode::Quote, &all_rules(true), false)
                .unwrap(),
        );
        assert_eq!(nodes, vec![Node::text("> x")]);
    }

    #[test]
    fn test_mentions() {
        let nodes = parse("<@1> <@!2> <@&3> <#4> <a:wave:5>");
        let kinds: Vec<_> = nodes
            .iter()
            .filter_map(|node| match node {
                Node::Style(style) => Some(style.styles()[0].clone()),
                _ => None,
            })
            .collect();
        assert_eq!(kinds.len(), 5);
        assert_eq!(kinds[0].kind, StyleKind::MentionUser);
        assert_eq!(kinds[0].extra("id"), Some("1"));
        assert_eq!(kinds[1].extra("id"), Some("2"));
        assert_eq!(kinds[2].kind, StyleKind::MentionRole);
        assert_eq!(kinds[3].kind, StyleKind::MentionChannel);
        assert_eq!(kinds[4].kind, StyleKind::MentionEmoji);
        assert_eq!(kinds[4].extra("name"), Some("wave"));
        assert_eq!(kinds[4].extra("animated"), Some("true"));
    }

    #[test]
    fn test_text_rule_splits_before_specials() {
        let nodes = RuleParser::new()
            .parse("ab*cd", ParseMode::Default, &[text_rule()], false)
            .unwrap();
        assert_eq!(
            nodes,
            vec![Node::text("ab"), Node::text("*cd")],
            "a run stops in front of a special character but may start with one"
        );
    }
}
