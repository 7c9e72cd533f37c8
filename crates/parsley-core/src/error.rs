//! Error types for parsing and AST building.

/// A parse failure: where it happened, what was expected, what was found.
///
/// The engine keeps one of these per session as the "furthest error" and
/// returns it from a failed top-level parse; it points at the deepest,
/// most informative failure seen across backtracking.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at column {col} (expected '{expected}', found '{found}')")]
pub struct ParseError {
    /// Short description of the failure.
    pub message: String,
    /// Byte offset into the input where the failure occurred.
    pub offset: usize,
    /// Distance from the input start, 0-indexed.
    pub col: usize,
    /// What the failing parser expected.
    pub expected: String,
    /// Snippet of what was actually found (capped at a few characters).
    pub found: String,
}

/// Errors raised by the AST builder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AstError {
    /// The stack had no placeholder for the node being exited.
    #[error("AST stack underflow: placeholder not found")]
    StackUnderflow,

    /// More than one user node was left after the root was exited.
    #[error("AST stack not empty after build: {0} nodes remain")]
    MultipleRoots(usize),

    /// A CPT node carried an action tag outside the registry's bound.
    #[error("action tag {0} out of registry range")]
    InvalidAction(usize),

    /// Error signalled by a user action callback.
    #[error("{0}")]
    Action(String),
}

impl AstError {
    /// Shorthand for signalling a failure from an action callback.
    pub fn action(message: impl Into<String>) -> Self {
        AstError::Action(message.into())
    }
}

/// Combined error for the parse-and-build convenience entry point.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("parse failed: {0}")]
    Parse(#[from] ParseError),

    #[error("AST build failed: {0}")]
    Ast(#[from] AstError),
}
