//! Error types for transcoding operations

use std::fmt;

/// Errors that can occur while transcoding between styled text and markdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscodeError {
    /// The same renderer instance was registered twice in one options value
    DuplicateRenderer(String),
    /// The reserved default renderer was registered explicitly
    ReservedRenderer(String),
    /// A renderer was removed that was never registered
    RendererNotRegistered(String),
    /// A node needs an external text provider that the options do not carry
    MissingProvider(String),
    /// Input nesting exceeded the configured depth limit
    NestingTooDeep { limit: usize },
    /// The parser could not make progress on its input
    Parse(String),
}

impl fmt::Display for TranscodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscodeError::DuplicateRenderer(name) => {
                write!(f, "Renderer '{name}' is already registered in these options")
            }
            TranscodeError::ReservedRenderer(name) => {
                write!(f, "Renderer '{name}' is the built-in default and cannot be added")
            }
            TranscodeError::RendererNotRegistered(name) => {
                write!(f, "Renderer '{name}' is not registered in these options")
            }
            TranscodeError::MissingProvider(kind) => {
                write!(f, "No text provider configured for {kind} content")
            }
            TranscodeError::NestingTooDeep { limit } => {
                write!(f, "Nesting too deep: exceeded the limit of {limit} levels")
            }
            TranscodeError::Parse(msg) => write!(f, "Parse error: {msg}"),
        }
    }
}

impl std::error::Error for TranscodeError {}
