//! The grammar-definition AST and its runtime instantiation.

use indexmap::IndexMap;
use parsley_core::{GrammarArena, ParserId};

use crate::CompileError;

/// A parsed, validated grammar definition. Rules keep declaration order;
/// the first rule is the entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    pub rules: IndexMap<String, Rule>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub name: String,
    pub expr: Expr,
    /// `@name` semantic-action annotation, if present.
    pub action: Option<String>,
    /// Byte offset of the rule in the grammar source, for diagnostics.
    pub offset: usize,
}

/// Argument-less terminal keywords of the surface language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    Digit,
    Alpha,
    Alphanum,
    HexDigit,
    Space,
    AnyChar,
    Int,
    Double,
    Succeed,
    Eoi,
}

impl Terminal {
    pub const ALL: [Terminal; 10] = [
        Terminal::Digit,
        Terminal::Alpha,
        Terminal::Alphanum,
        Terminal::HexDigit,
        Terminal::Space,
        Terminal::AnyChar,
        Terminal::Int,
        Terminal::Double,
        Terminal::Succeed,
        Terminal::Eoi,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Terminal::Digit => "digit",
            Terminal::Alpha => "alpha",
            Terminal::Alphanum => "alphanum",
            Terminal::HexDigit => "hex_digit",
            Terminal::Space => "space",
            Terminal::AnyChar => "any_char",
            Terminal::Int => "int",
            Terminal::Double => "double",
            Terminal::Succeed => "succeed",
            Terminal::Eoi => "eoi",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Terminal> {
        Terminal::ALL.into_iter().find(|t| t.keyword() == keyword)
    }
}

/// One grammar expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    CharLit(u8),
    StrLit(String),
    Range(u8, u8),
    OneOf(String),
    NoneOf(String),
    Fail(String),
    Terminal(Terminal),
    RuleRef(String),
    Seq(Vec<Expr>),
    Choice(Vec<Expr>),
    Optional(Box<Expr>),
    Many(Box<Expr>),
    Plus(Box<Expr>),
    Count(usize, Box<Expr>),
    Between(Box<Expr>, Box<Expr>, Box<Expr>),
    Delimited(Box<Expr>, Box<Expr>),
    Lookahead(Box<Expr>),
    Not(Box<Expr>),
    Lexeme(Box<Expr>),
    Skip(Box<Expr>),
    Passthru(Box<Expr>),
    Chainl1(Box<Expr>, Box<Expr>),
    Chainr1(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Apply `f` to every rule reference in this expression tree.
    pub fn for_each_ref(&self, f: &mut impl FnMut(&str)) {
        match self {
            Expr::RuleRef(name) => f(name),
            Expr::Seq(items) | Expr::Choice(items) => {
                for item in items {
                    item.for_each_ref(f);
                }
            }
            Expr::Optional(inner)
            | Expr::Many(inner)
            | Expr::Plus(inner)
            | Expr::Count(_, inner)
            | Expr::Lookahead(inner)
            | Expr::Not(inner)
            | Expr::Lexeme(inner)
            | Expr::Skip(inner)
            | Expr::Passthru(inner) => inner.for_each_ref(f),
            Expr::Between(a, b, c) => {
                a.for_each_ref(f);
                b.for_each_ref(f);
                c.for_each_ref(f);
            }
            Expr::Delimited(a, b) | Expr::Chainl1(a, b) | Expr::Chainr1(a, b) => {
                a.for_each_ref(f);
                b.for_each_ref(f);
            }
            _ => {}
        }
    }
}

impl Grammar {
    /// Action names in first-use order, mapped to their tags.
    pub fn action_tags(&self) -> IndexMap<String, usize> {
        let mut tags = IndexMap::new();
        for rule in self.rules.values() {
            if let Some(action) = &rule.action {
                let next = tags.len();
                tags.entry(action.clone()).or_insert(next);
            }
        }
        tags
    }

    /// Instantiate the grammar into `arena` and return the entry-point
    /// parser (the first rule). Every rule becomes a named placeholder
    /// first, so mutual recursion needs no ordering.
    pub fn build_into(&self, arena: &mut GrammarArena) -> Result<ParserId, CompileError> {
        let tags = self.action_tags();
        let mut refs: IndexMap<&str, ParserId> = IndexMap::with_capacity(self.rules.len());
        for name in self.rules.keys() {
            refs.insert(name, arena.placeholder(Some(name)));
        }

        for rule in self.rules.values() {
            let body = build_expr(&rule.expr, Some(&rule.name), rule, arena, &refs)?;
            if let Some(action) = &rule.action {
                arena.set_action(body, tags[action.as_str()]);
            }
            arena.define(refs[rule.name.as_str()], body);
        }

        let (_, first) = refs.first().expect("validated grammars have rules");
        Ok(*first)
    }
}

fn build_expr(
    expr: &Expr,
    name: Option<&str>,
    rule: &Rule,
    arena: &mut GrammarArena,
    refs: &IndexMap<&str, ParserId>,
) -> Result<ParserId, CompileError> {
    let id = match expr {
        Expr::CharLit(c) => arena.char(name, *c),
        Expr::StrLit(s) => arena.string(name, s),
        Expr::Range(lo, hi) => arena.char_range(name, *lo, *hi),
        Expr::OneOf(set) => arena.one_of(name, set),
        Expr::NoneOf(set) => arena.none_of(name, set),
        Expr::Fail(message) => arena.fail(name, message),
        Expr::Terminal(terminal) => match terminal {
            Terminal::Digit => arena.digit(name),
            Terminal::Alpha => arena.alpha(name),
            Terminal::Alphanum => arena.alphanum(name),
            Terminal::HexDigit => arena.hex_digit(name),
            Terminal::Space => arena.space(name),
            Terminal::AnyChar => arena.any_char(name),
            Terminal::Int => arena.integer(name),
            Terminal::Double => arena.double(name),
            Terminal::Succeed => arena.succeed(name),
            Terminal::Eoi => arena.eoi(name),
        },
        Expr::RuleRef(target) => {
            let Some(&id) = refs.get(target.as_str()) else {
                return Err(CompileError::UndefinedRule {
                    rule: rule.name.clone(),
                    name: target.clone(),
                    offset: rule.offset,
                });
            };
            // A bare reference under its own name gets a transparent
            // wrapper so the rule name survives in the CPT.
            match name {
                Some(_) => arena.passthru(name, id),
                None => id,
            }
        }
        Expr::Seq(items) => {
            let children = build_all(items, rule, arena, refs)?;
            arena.and(name, &children)
        }
        Expr::Choice(items) => {
            let children = build_all(items, rule, arena, refs)?;
            arena.or(name, &children)
        }
        Expr::Optional(inner) => {
            let inner = build_expr(inner, None, rule, arena, refs)?;
            arena.optional(name, inner)
        }
        Expr::Many(inner) => {
            let inner = build_expr(inner, None, rule, arena, refs)?;
            arena.many(name, inner)
        }
        Expr::Plus(inner) => {
            let inner = build_expr(inner, None, rule, arena, refs)?;
            arena.plus(name, inner)
        }
        Expr::Count(n, inner) => {
            let inner = build_expr(inner, None, rule, arena, refs)?;
            arena.count(name, *n, inner)
        }
        Expr::Between(open, inner, close) => {
            let open = build_expr(open, None, rule, arena, refs)?;
            let inner = build_expr(inner, None, rule, arena, refs)?;
            let close = build_expr(close, None, rule, arena, refs)?;
            arena.between(name, open, inner, close)
        }
        Expr::Delimited(item, delimiter) => {
            let item = build_expr(item, None, rule, arena, refs)?;
            let delimiter = build_expr(delimiter, None, rule, arena, refs)?;
            arena.delimited(name, item, Some(delimiter))
        }
        Expr::Lookahead(inner) => {
            let inner = build_expr(inner, None, rule, arena, refs)?;
            arena.lookahead(name, inner)
        }
        Expr::Not(inner) => {
            let inner = build_expr(inner, None, rule, arena, refs)?;
            arena.not(name, inner)
        }
        Expr::Lexeme(inner) => {
            let inner = build_expr(inner, None, rule, arena, refs)?;
            arena.lexeme(name, inner)
        }
        Expr::Skip(inner) => {
            let inner = build_expr(inner, None, rule, arena, refs)?;
            arena.skip(name, inner)
        }
        Expr::Passthru(inner) => {
            let inner = build_expr(inner, None, rule, arena, refs)?;
            arena.passthru(name, inner)
        }
        Expr::Chainl1(item, op) => {
            let item = build_expr(item, None, rule, arena, refs)?;
            let op = build_expr(op, None, rule, arena, refs)?;
            arena.chainl1(name, item, op)
        }
        Expr::Chainr1(item, op) => {
            let item = build_expr(item, None, rule, arena, refs)?;
            let op = build_expr(op, None, rule, arena, refs)?;
            arena.chainr1(name, item, op)
        }
    };
    Ok(id)
}

fn build_all(
    items: &[Expr],
    rule: &Rule,
    arena: &mut GrammarArena,
    refs: &IndexMap<&str, ParserId>,
) -> Result<Vec<ParserId>, CompileError> {
    items
        .iter()
        .map(|item| build_expr(item, None, rule, arena, refs))
        .collect()
}
