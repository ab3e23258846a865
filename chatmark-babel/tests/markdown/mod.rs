//! Markdown format tests
//!
//! Tests for styled tree ↔ chat markdown conversion and escape mode.

mod escape;
mod export;
mod import;
mod roundtrip;
