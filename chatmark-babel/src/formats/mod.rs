//! Format implementations
//!
//! This module contains the conversions between styled text trees and their text
//! representations: chat markdown in both directions, and treeviz for inspection.

pub mod icons;
pub mod markdown;
pub mod treeviz;

pub use markdown::{MarkdownSerializer, TreeSerializer};
pub use treeviz::{ast_to_treeviz, tree_to_treeviz};
