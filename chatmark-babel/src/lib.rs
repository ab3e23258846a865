//! Transcoding between styled chat text and chat markdown
//!
//!     This crate converts in both directions between a styled text tree (nodes with inline
//!     decorations, color, click and hover metadata, and children) and the markdown dialect of a
//!     chat platform (`**bold**`, `_italic_`, `__underline__`, `~~strike~~`, `` `code` ``,
//!     `||spoiler||`, `> quote`, and `<@user>`-style mentions).
//!
//!     TLDR:
//!         - Tree → markdown: [`MarkdownSerializer`] (or [`formats::markdown::serializer::serialize`]).
//!         - Markdown → tree: [`TreeSerializer::parse`]; escaping a message: [`TreeSerializer::escape_markdown`].
//!         - Hosts plug their own text type in through [`text::StyledText`]; [`Component`] is the
//!           bundled one.
//!
//!     This is a pure lib, that is, it powers chatmark-cli but is shell agnostic: no code here
//!     prints, reads env vars or touches files. Diagnostics go through `tracing`.
//!
//!     The file structure :
//!     .
//!     ├── error.rs                # TranscodeError
//!     ├── options.rs              # SerializerOptions, RenderOptions
//!     ├── text                    # StyledText capability trait + Component adapter
//!     ├── ast                     # Markdown AST and the flattening pass
//!     ├── grammar                 # Parser/Rule contracts, rule engine, chat grammar
//!     ├── render                  # Renderer chain, tree and escaping renderers
//!     ├── formats
//!     │   ├── markdown
//!     │   │   ├── escape.rs       # escaping and legacy code stripping
//!     │   │   ├── parser.rs       # markdown → tree
//!     │   │   ├── serializer.rs   # tree → markdown
//!     │   │   └── mod.rs
//!     │   ├── treeviz             # tree drawings for inspection and snapshots
//!     │   └── icons.rs
//!     └── lib.rs
//!
//! Testing
//!     tests
//!     ├── lib.rs
//!     ├── markdown
//!     │   ├── export.rs           # tree → markdown scenarios and invariants
//!     │   ├── import.rs           # markdown → tree scenarios
//!     │   └── escape.rs           # escape mode
//!     └── ast
//!         └── flatten.rs
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include these
//!     in the mod.
//!
//! Core Algorithms
//!
//!     Tree → markdown computes runs of text sharing one set of decorations, merges neighbours
//!     with equal decorations and writes each run between its markers, separated by a zero width
//!     space (see ./formats/markdown/serializer.rs).
//!
//!     Markdown → tree parses with an ordered rule list (first match wins), merges adjacent text
//!     nodes (./ast/flatten.rs) and hands every node to a chain of renderers that ends in a
//!     built-in fallback (./render/mod.rs). The same chain renders into an escaped `String`,
//!     which is how [`TreeSerializer::escape_markdown`] works.
//!
//!     Every recursion (tree walk, parser spans, renderer descent and the quote/spoiler
//!     re-parses) is bounded by a depth limit, [`DEFAULT_MAX_DEPTH`] unless configured, and fails
//!     with [`TranscodeError::NestingTooDeep`] past it.

pub mod ast;
pub mod error;
pub mod formats;
pub mod grammar;
pub mod options;
pub mod render;
pub mod text;

pub use error::TranscodeError;
pub use formats::markdown::{MarkdownSerializer, TreeSerializer};
pub use options::{KeybindProvider, RenderOptions, SerializerOptions, TranslationProvider};
pub use text::Component;

/// Nesting limit used when the options do not set one
pub const DEFAULT_MAX_DEPTH: usize = 64;
