//! Parsley: parser combinators with a concrete-parse-tree runtime.
//!
//! A grammar is assembled by registering parser values in a [`GrammarArena`];
//! [`GrammarArena::parse`] interprets a top parser against an input string and
//! returns either a [`CptNode`] tree or the deepest [`ParseError`] seen during
//! backtracking. A parsed tree can be walked with [`visit_nodes`], printed
//! with [`cpt_to_string`], or lowered to a user-defined AST with [`ast_build`].
//!
//! # Example
//!
//! ```
//! use parsley_core::GrammarArena;
//!
//! let mut arena = GrammarArena::new();
//! let digits = arena.integer(Some("number"));
//! let minus = arena.char(Some("minus"), b'-');
//! let expr = arena.chainl1(Some("expr"), digits, minus);
//!
//! let cpt = arena.parse(expr, "1-2-3").expect("valid input");
//! assert_eq!(cpt.text(), "1-2-3");
//! ```

pub mod arena;
pub mod ast;
pub mod cpt;
pub mod engine;
pub mod error;
pub mod parser;
pub mod printer;
pub mod visitor;

#[cfg(test)]
mod arena_tests;
#[cfg(test)]
mod ast_tests;
#[cfg(test)]
mod printer_tests;

pub use arena::{GrammarArena, ParserId};
pub use ast::{BuildStack, HookRegistry, ast_build, parse_and_build};
pub use cpt::CptNode;
pub use error::{AstError, BuildError, ParseError};
pub use parser::{Parser, ParserKind};
pub use printer::cpt_to_string;
pub use visitor::{CptVisitor, visit_nodes};

/// Result type for parse operations.
pub type ParseResult<'s> = std::result::Result<CptNode<'s>, ParseError>;
