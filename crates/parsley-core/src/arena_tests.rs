use crate::arena::GrammarArena;
use crate::parser::ParserKind;

#[test]
fn display_name_falls_back_to_variant_tag() {
    let mut arena = GrammarArena::new();
    let named = arena.digit(Some("first"));
    let anonymous = arena.digit(None);

    assert_eq!(arena.get(named).display_name(), "first");
    assert_eq!(arena.get(anonymous).display_name(), "digit");
}

#[test]
fn expected_str_prefers_override() {
    let mut arena = GrammarArena::new();
    let p = arena.char(Some("open-paren"), b'(');
    assert_eq!(arena.get(p).expected_str(), "(");

    arena.set_expected(p, "opening parenthesis");
    assert_eq!(arena.get(p).expected_str(), "opening parenthesis");
}

#[test]
fn define_fills_placeholder_in_place() {
    let mut arena = GrammarArena::new();
    let fwd = arena.placeholder(Some("rule"));
    assert_eq!(*arena.get(fwd).kind(), ParserKind::Unset);

    let body = arena.digit(Some("rule"));
    arena.set_action(body, 3);
    arena.define(fwd, body);

    assert_eq!(*arena.get(fwd).kind(), ParserKind::Digit);
    assert_eq!(arena.get(fwd).action(), Some(3));
    assert_eq!(arena.get(fwd).name(), Some("rule"));
}

#[test]
fn undefined_placeholder_is_a_parse_error() {
    let mut arena = GrammarArena::new();
    let fwd = arena.placeholder(Some("missing"));

    let err = arena.parse(fwd, "x").unwrap_err();
    assert_eq!(err.message, "Parser used before definition");
    assert_eq!(err.expected, "missing");
}

#[test]
fn recursive_grammar_via_placeholder() {
    // expr = factor ('+' factor)*, factor = digit | '(' expr ')'
    let mut arena = GrammarArena::new();
    let expr = arena.placeholder(Some("expr"));
    let lparen = arena.char(None, b'(');
    let rparen = arena.char(None, b')');
    let digit = arena.digit(Some("digit"));
    let grouped = arena.between(Some("grouped"), lparen, expr, rparen);
    let factor = arena.or(Some("factor"), &[digit, grouped]);
    let plus_op = arena.char(None, b'+');
    let expr_body = arena.chainl1(Some("expr"), factor, plus_op);
    arena.define(expr, expr_body);

    let cpt = arena.parse(expr, "(1+2)+3").unwrap();
    assert_eq!(cpt.text(), "(1+2)+3");

    assert!(arena.parse(expr, "(1+2").is_err());
}
