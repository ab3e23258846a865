//! AST tests

mod flatten;
