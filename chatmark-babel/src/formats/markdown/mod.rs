//! Chat markdown format
//!
//! Bidirectional conversion between styled text trees and the chat platform's markdown dialect.
//!
//! # Element Mapping Table
//!
//! | Tree                    | Markdown                 | Export notes                      | Import notes                          |
//! |-------------------------|--------------------------|-----------------------------------|---------------------------------------|
//! | bold                    | `**x**`                  | Direct                            | Direct                                |
//! | italic                  | `_x_`                    | Uses `_`                          | Parses `_x_` and `*x*`                |
//! | underlined              | `__x__`                  | Direct                            | Direct                                |
//! | strikethrough           | `~~x~~`                  | Direct                            | Direct                                |
//! | dark gray text          | `` `x` `` / code block   | Color lost                        | Code → dark gray                      |
//! | hover + `▌` mask        | `\|\|x\|\|`              | Not exported                      | Spoiler → masked, content on hover    |
//! | `\| ` prefixed lines    | `> x`, `>>> x`           | Not exported                      | Quote → bold dark gray bar per line   |
//! | open URL click action   | `[x](url)`               | Only with `embed_links`           | Not parsed                            |
//! | literal token           | `<@id>` `<#id>` `:name:` | Plain text                        | Mentions → literal tokens             |
//!
//! # Lossy Conversions
//!
//! - Colors, hover text and click actions other than "open URL" have no markdown form.
//! - Flags are exported per node. A child does not inherit its parent's flags, mirroring how the
//!   runs are computed rather than how the client draws the tree.
//! - Spoilers and quotes come back as visual approximations, not as markdown constructs.

pub mod escape;
pub mod parser;
pub mod serializer;

pub use escape::{escape_markdown, strip_legacy_formatting};
pub use parser::TreeSerializer;
pub use serializer::{collect_runs, MarkdownSerializer, StyleRun, RUN_SEPARATOR};
