//! Parsley compiler: the grammar-definition-language front end.
//!
//! A grammar file is a sequence of rules:
//!
//! ```text
//! // a comma-separated list of signed numbers
//! list  = delimited(value, ',') @on_list ;
//! value = lexeme(int)           @on_value ;
//! ```
//!
//! The pipeline: the GDL source is parsed with the library's own
//! combinators (`grammar`), the resulting CPT is lowered to a [`Grammar`]
//! through the AST-builder action registry (`build`), and the grammar is
//! either instantiated into a [`parsley_core::GrammarArena`] at runtime
//! ([`Grammar::build_into`]) or emitted as a self-contained Rust module
//! ([`generate`]).

pub mod ast;
pub mod codegen;
pub mod diagnostics;
pub mod grammar;

mod build;

#[cfg(test)]
mod compile_tests;
#[cfg(test)]
mod diagnostics_tests;

use indexmap::IndexMap;
use parsley_core::{AstError, ParseError, ast_build};

pub use ast::{Expr, Grammar, Rule, Terminal};
pub use diagnostics::DiagnosticPrinter;

/// Errors from compiling a grammar definition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("{0}")]
    Syntax(#[from] ParseError),

    #[error("malformed grammar: {0}")]
    Build(#[from] AstError),

    #[error("duplicate rule `{name}`")]
    DuplicateRule { name: String, offset: usize },

    #[error("rule `{rule}` references undefined rule `{name}`")]
    UndefinedRule {
        rule: String,
        name: String,
        offset: usize,
    },
}

impl CompileError {
    /// Byte offset the error points at, when it has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            CompileError::Syntax(err) => Some(err.offset),
            CompileError::Build(_) => None,
            CompileError::DuplicateRule { offset, .. } => Some(*offset),
            CompileError::UndefinedRule { offset, .. } => Some(*offset),
        }
    }
}

/// Parse and validate a grammar definition.
///
/// The first rule is the grammar's entry point. Duplicate rule names and
/// references to rules that are never defined are rejected here, not at
/// instantiation time.
pub fn compile(source: &str) -> Result<Grammar, CompileError> {
    let gdl = grammar::gdl_grammar();
    let cpt = gdl.arena.parse(gdl.top, source)?;

    let mut registry = build::registry();
    let root = ast_build(&cpt, &mut registry)?;
    let rules = match root {
        Some(build::GdlNode::Grammar(rules)) => rules,
        _ => return Err(AstError::action("grammar did not produce a rule list").into()),
    };

    let mut table: IndexMap<String, Rule> = IndexMap::with_capacity(rules.len());
    for rule in rules {
        if table.contains_key(&rule.name) {
            return Err(CompileError::DuplicateRule {
                name: rule.name,
                offset: rule.offset,
            });
        }
        table.insert(rule.name.clone(), rule);
    }

    for rule in table.values() {
        let mut undefined = None;
        rule.expr.for_each_ref(&mut |name| {
            if undefined.is_none() && !table.contains_key(name) {
                undefined = Some(name.to_owned());
            }
        });
        if let Some(name) = undefined {
            return Err(CompileError::UndefinedRule {
                rule: rule.name.clone(),
                name,
                offset: rule.offset,
            });
        }
    }

    Ok(Grammar { rules: table })
}

/// Compile `source` and emit the Rust module that reconstructs it through
/// the public arena API.
pub fn generate(source: &str) -> Result<String, CompileError> {
    let grammar = compile(source)?;
    Ok(codegen::generate_module(&grammar))
}
