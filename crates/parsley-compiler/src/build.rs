//! Lowering the GDL concrete parse tree to a [`Grammar`].
//!
//! Every interesting node in the bootstrap grammar carries one of the
//! action tags below; the registry's callbacks assemble [`GdlNode`]s
//! bottom-up on the builder stack. Untagged structural nodes flatten away,
//! so each callback sees exactly the children it cares about.

use parsley_core::{AstError, CptNode, HookRegistry};

use crate::ast::{Expr, Rule, Terminal};

pub(crate) mod actions {
    pub const IDENT: usize = 0;
    pub const STRING: usize = 1;
    pub const CHAR: usize = 2;
    pub const RAW_CHAR: usize = 3;
    pub const NUMBER: usize = 4;
    pub const KEYWORD: usize = 5;
    pub const RANGE: usize = 6;
    pub const TERMINAL: usize = 7;
    pub const FAIL_CALL: usize = 8;
    pub const ONE_OF_CALL: usize = 9;
    pub const NONE_OF_CALL: usize = 10;
    pub const COUNT_CALL: usize = 11;
    pub const BETWEEN_CALL: usize = 12;
    pub const DELIMITED_CALL: usize = 13;
    pub const LOOKAHEAD_CALL: usize = 14;
    pub const NOT_CALL: usize = 15;
    pub const LEXEME_CALL: usize = 16;
    pub const SKIP_CALL: usize = 17;
    pub const PASSTHRU_CALL: usize = 18;
    pub const CHAINL1_CALL: usize = 19;
    pub const CHAINR1_CALL: usize = 20;
    pub const REP_OP: usize = 21;
    pub const FACTOR: usize = 22;
    pub const SEQ: usize = 23;
    pub const ALT: usize = 24;
    pub const ACTION: usize = 25;
    pub const RULE: usize = 26;
    pub const PROGRAM: usize = 27;

    pub const TAG_COUNT: usize = 28;
}

/// Intermediate values on the AST builder stack.
#[derive(Debug)]
pub(crate) enum GdlNode {
    Ident(String),
    Str(String),
    Char(u8),
    Number(usize),
    Keyword(String),
    RepOp(u8),
    Action(String),
    Expr(Expr),
    Rule(Rule),
    Grammar(Vec<Rule>),
}

pub(crate) fn registry() -> HookRegistry<'static, GdlNode> {
    let mut r: HookRegistry<'static, GdlNode> = HookRegistry::new(actions::TAG_COUNT);

    r.set_action(actions::IDENT, |stack, node, _| {
        stack.push(GdlNode::Ident(node.semantic_text().to_owned()));
        Ok(())
    });

    r.set_action(actions::STRING, |stack, node, _| {
        let quoted = node.semantic_text();
        let body = &quoted[1..quoted.len() - 1];
        stack.push(GdlNode::Str(decode_escapes(body)));
        Ok(())
    });

    r.set_action(actions::CHAR, |stack, node, _| {
        let quoted = node.semantic_text();
        let body = &quoted[1..quoted.len() - 1];
        stack.push(GdlNode::Char(decode_char(body, node)?));
        Ok(())
    });

    r.set_action(actions::RAW_CHAR, |stack, node, _| {
        stack.push(GdlNode::Char(decode_char(node.semantic_text(), node)?));
        Ok(())
    });

    r.set_action(actions::NUMBER, |stack, node, _| {
        let value = node
            .semantic_text()
            .parse()
            .map_err(|_| shape_error(node, "repetition count out of range"))?;
        stack.push(GdlNode::Number(value));
        Ok(())
    });

    r.set_action(actions::KEYWORD, |stack, node, _| {
        stack.push(GdlNode::Keyword(node.semantic_text().to_owned()));
        Ok(())
    });

    r.set_action(actions::RANGE, |stack, node, children| {
        match take2(children, node)? {
            (GdlNode::Char(lo), GdlNode::Char(hi)) => {
                stack.push(GdlNode::Expr(Expr::Range(lo, hi)));
                Ok(())
            }
            _ => Err(shape_error(node, "range bounds must be characters")),
        }
    });

    r.set_action(actions::TERMINAL, |stack, node, children| {
        let expr = match take1(children, node)? {
            GdlNode::Str(s) => Expr::StrLit(s),
            GdlNode::Char(c) => Expr::CharLit(c),
            GdlNode::Ident(name) => Expr::RuleRef(name),
            GdlNode::Keyword(kw) => Expr::Terminal(
                Terminal::from_keyword(&kw)
                    .ok_or_else(|| shape_error(node, "unknown terminal keyword"))?,
            ),
            GdlNode::Expr(e) => e,
            _ => return Err(shape_error(node, "malformed terminal")),
        };
        stack.push(GdlNode::Expr(expr));
        Ok(())
    });

    r.set_action(actions::FAIL_CALL, |stack, node, children| {
        match take1(children, node)? {
            GdlNode::Str(message) => {
                stack.push(GdlNode::Expr(Expr::Fail(message)));
                Ok(())
            }
            _ => Err(shape_error(node, "fail() takes a string message")),
        }
    });

    r.set_action(actions::ONE_OF_CALL, |stack, node, children| {
        match take1(children, node)? {
            GdlNode::Str(set) => {
                stack.push(GdlNode::Expr(Expr::OneOf(set)));
                Ok(())
            }
            _ => Err(shape_error(node, "oneof() takes a string set")),
        }
    });

    r.set_action(actions::NONE_OF_CALL, |stack, node, children| {
        match take1(children, node)? {
            GdlNode::Str(set) => {
                stack.push(GdlNode::Expr(Expr::NoneOf(set)));
                Ok(())
            }
            _ => Err(shape_error(node, "noneof() takes a string set")),
        }
    });

    r.set_action(actions::COUNT_CALL, |stack, node, children| {
        match take2(children, node)? {
            (GdlNode::Number(n), GdlNode::Expr(e)) => {
                stack.push(GdlNode::Expr(Expr::Count(n, Box::new(e))));
                Ok(())
            }
            _ => Err(shape_error(node, "count() takes a number and an expression")),
        }
    });

    r.set_action(actions::BETWEEN_CALL, |stack, node, children| {
        match take3(children, node)? {
            (GdlNode::Expr(open), GdlNode::Expr(inner), GdlNode::Expr(close)) => {
                stack.push(GdlNode::Expr(Expr::Between(
                    Box::new(open),
                    Box::new(inner),
                    Box::new(close),
                )));
                Ok(())
            }
            _ => Err(shape_error(node, "between() takes three expressions")),
        }
    });

    r.set_action(actions::DELIMITED_CALL, |stack, node, children| {
        match take2(children, node)? {
            (GdlNode::Expr(item), GdlNode::Expr(delim)) => {
                stack.push(GdlNode::Expr(Expr::Delimited(
                    Box::new(item),
                    Box::new(delim),
                )));
                Ok(())
            }
            _ => Err(shape_error(node, "delimited() takes two expressions")),
        }
    });

    r.set_action(actions::LOOKAHEAD_CALL, unary_call(Expr::Lookahead));
    r.set_action(actions::NOT_CALL, unary_call(Expr::Not));
    r.set_action(actions::LEXEME_CALL, unary_call(Expr::Lexeme));
    r.set_action(actions::SKIP_CALL, unary_call(Expr::Skip));
    r.set_action(actions::PASSTHRU_CALL, unary_call(Expr::Passthru));

    r.set_action(actions::CHAINL1_CALL, chain_call(Expr::Chainl1));
    r.set_action(actions::CHAINR1_CALL, chain_call(Expr::Chainr1));

    r.set_action(actions::REP_OP, |stack, node, _| {
        stack.push(GdlNode::RepOp(node.semantic_text().as_bytes()[0]));
        Ok(())
    });

    r.set_action(actions::FACTOR, |stack, node, mut children| {
        let op = match children.last() {
            Some(GdlNode::RepOp(_)) => match children.pop() {
                Some(GdlNode::RepOp(op)) => Some(op),
                _ => unreachable!("checked above"),
            },
            _ => None,
        };
        let expr = match take1(children, node)? {
            GdlNode::Expr(e) => e,
            _ => return Err(shape_error(node, "malformed expression factor")),
        };
        let expr = match op {
            Some(b'*') => Expr::Many(Box::new(expr)),
            Some(b'+') => Expr::Plus(Box::new(expr)),
            Some(b'?') => Expr::Optional(Box::new(expr)),
            Some(_) => return Err(shape_error(node, "unknown repetition operator")),
            None => expr,
        };
        stack.push(GdlNode::Expr(expr));
        Ok(())
    });

    r.set_action(actions::SEQ, group(Expr::Seq));
    r.set_action(actions::ALT, group(Expr::Choice));

    r.set_action(actions::ACTION, |stack, node, children| {
        match take1(children, node)? {
            GdlNode::Ident(name) => {
                stack.push(GdlNode::Action(name));
                Ok(())
            }
            _ => Err(shape_error(node, "@action needs an identifier")),
        }
    });

    r.set_action(actions::RULE, |stack, node, mut children| {
        let action = match children.last() {
            Some(GdlNode::Action(_)) => match children.pop() {
                Some(GdlNode::Action(name)) => Some(name),
                _ => unreachable!("checked above"),
            },
            _ => None,
        };
        match take2(children, node)? {
            (GdlNode::Ident(name), GdlNode::Expr(expr)) => {
                stack.push(GdlNode::Rule(Rule {
                    name,
                    expr,
                    action,
                    offset: node.offset(),
                }));
                Ok(())
            }
            _ => Err(shape_error(node, "malformed rule definition")),
        }
    });

    r.set_action(actions::PROGRAM, |stack, node, children| {
        let mut rules = Vec::with_capacity(children.len());
        for child in children {
            match child {
                GdlNode::Rule(rule) => rules.push(rule),
                _ => return Err(shape_error(node, "grammar may only contain rules")),
            }
        }
        stack.push(GdlNode::Grammar(rules));
        Ok(())
    });

    r
}

type Stack = parsley_core::BuildStack<GdlNode>;

fn unary_call(
    wrap: fn(Box<Expr>) -> Expr,
) -> impl FnMut(&mut Stack, &CptNode<'_>, Vec<GdlNode>) -> Result<(), AstError> {
    move |stack: &mut Stack, node: &CptNode<'_>, children: Vec<GdlNode>| {
        match take1(children, node)? {
            GdlNode::Expr(inner) => {
                stack.push(GdlNode::Expr(wrap(Box::new(inner))));
                Ok(())
            }
            _ => Err(shape_error(node, "combinator call takes one expression")),
        }
    }
}

fn chain_call(
    wrap: fn(Box<Expr>, Box<Expr>) -> Expr,
) -> impl FnMut(&mut Stack, &CptNode<'_>, Vec<GdlNode>) -> Result<(), AstError> {
    move |stack: &mut Stack, node: &CptNode<'_>, children: Vec<GdlNode>| {
        match take2(children, node)? {
            (GdlNode::Expr(item), GdlNode::Expr(op)) => {
                stack.push(GdlNode::Expr(wrap(Box::new(item), Box::new(op))));
                Ok(())
            }
            _ => Err(shape_error(node, "chain call takes two expressions")),
        }
    }
}

fn group(
    wrap: fn(Vec<Expr>) -> Expr,
) -> impl FnMut(&mut Stack, &CptNode<'_>, Vec<GdlNode>) -> Result<(), AstError> {
    move |stack: &mut Stack, node: &CptNode<'_>, children: Vec<GdlNode>| {
        let mut items = Vec::with_capacity(children.len());
        for child in children {
            match child {
                GdlNode::Expr(e) => items.push(e),
                _ => return Err(shape_error(node, "expected an expression")),
            }
        }
        let expr = match items.len() {
            0 => return Err(shape_error(node, "empty expression")),
            1 => items.pop().expect("one item"),
            _ => wrap(items),
        };
        stack.push(GdlNode::Expr(expr));
        Ok(())
    }
}

fn shape_error(node: &CptNode<'_>, message: &str) -> AstError {
    AstError::action(format!(
        "{message} (in <{}> at line {}, column {})",
        node.name(),
        node.line() + 1,
        node.col() + 1
    ))
}

fn take1(children: Vec<GdlNode>, node: &CptNode<'_>) -> Result<GdlNode, AstError> {
    let mut it = children.into_iter();
    match (it.next(), it.next()) {
        (Some(only), None) => Ok(only),
        _ => Err(shape_error(node, "expected exactly one child value")),
    }
}

fn take2(children: Vec<GdlNode>, node: &CptNode<'_>) -> Result<(GdlNode, GdlNode), AstError> {
    let mut it = children.into_iter();
    match (it.next(), it.next(), it.next()) {
        (Some(a), Some(b), None) => Ok((a, b)),
        _ => Err(shape_error(node, "expected exactly two child values")),
    }
}

fn take3(
    children: Vec<GdlNode>,
    node: &CptNode<'_>,
) -> Result<(GdlNode, GdlNode, GdlNode), AstError> {
    let mut it = children.into_iter();
    match (it.next(), it.next(), it.next(), it.next()) {
        (Some(a), Some(b), Some(c), None) => Ok((a, b, c)),
        _ => Err(shape_error(node, "expected exactly three child values")),
    }
}

/// Decode the escape sequences the literal grammar admits (`\n`, `\t`,
/// `\r`, `\\`, `\'`, `\"`); an unknown escape keeps the escaped character.
fn decode_escapes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn decode_char(raw: &str, node: &CptNode<'_>) -> Result<u8, AstError> {
    let decoded = decode_escapes(raw);
    let mut bytes = decoded.bytes();
    match (bytes.next(), bytes.next()) {
        (Some(b), None) => Ok(b),
        _ => Err(shape_error(node, "character literal must be one byte")),
    }
}
