use indoc::indoc;
use parsley_core::{GrammarArena, HookRegistry, parse_and_build};

use crate::ast::{Expr, Terminal};
use crate::{CompileError, compile};

#[test]
fn compiles_a_single_terminal_rule() {
    let grammar = compile("value = int ;").unwrap();
    assert_eq!(grammar.rules.len(), 1);

    let rule = &grammar.rules["value"];
    assert_eq!(rule.expr, Expr::Terminal(Terminal::Int));
    assert_eq!(rule.action, None);
}

#[test]
fn postfix_operators_bind_to_the_factor() {
    let grammar = compile("word = alpha+ digit? ;").unwrap();
    assert_eq!(
        grammar.rules["word"].expr,
        Expr::Seq(vec![
            Expr::Plus(Box::new(Expr::Terminal(Terminal::Alpha))),
            Expr::Optional(Box::new(Expr::Terminal(Terminal::Digit))),
        ])
    );
}

#[test]
fn alternation_binds_looser_than_sequence() {
    let grammar = compile(r#"x = 'a' 'b' | 'c' ;"#).unwrap();
    assert_eq!(
        grammar.rules["x"].expr,
        Expr::Choice(vec![
            Expr::Seq(vec![Expr::CharLit(b'a'), Expr::CharLit(b'b')]),
            Expr::CharLit(b'c'),
        ])
    );
}

#[test]
fn grouping_overrides_precedence() {
    let grammar = compile(r#"x = ('a' | 'b') 'c' ;"#).unwrap();
    assert_eq!(
        grammar.rules["x"].expr,
        Expr::Seq(vec![
            Expr::Choice(vec![Expr::CharLit(b'a'), Expr::CharLit(b'b')]),
            Expr::CharLit(b'c'),
        ])
    );
}

#[test]
fn combinator_calls_and_actions() {
    let grammar = compile(r#"list = delimited(lexeme(int), ',') @on_list ;"#).unwrap();

    let rule = &grammar.rules["list"];
    assert_eq!(rule.action.as_deref(), Some("on_list"));
    assert_eq!(
        rule.expr,
        Expr::Delimited(
            Box::new(Expr::Lexeme(Box::new(Expr::Terminal(Terminal::Int)))),
            Box::new(Expr::CharLit(b',')),
        )
    );
}

#[test]
fn ranges_and_character_sets() {
    let grammar = compile(r#"ident = [a-z] oneof("+-")* noneof("ab") ;"#).unwrap();
    assert_eq!(
        grammar.rules["ident"].expr,
        Expr::Seq(vec![
            Expr::Range(b'a', b'z'),
            Expr::Many(Box::new(Expr::OneOf("+-".to_owned()))),
            Expr::NoneOf("ab".to_owned()),
        ])
    );
}

#[test]
fn literal_escapes_are_decoded() {
    let grammar = compile(r#"esc = "a\nb\\" '\'' '\t' ;"#).unwrap();
    assert_eq!(
        grammar.rules["esc"].expr,
        Expr::Seq(vec![
            Expr::StrLit("a\nb\\".to_owned()),
            Expr::CharLit(b'\''),
            Expr::CharLit(b'\t'),
        ])
    );
}

#[test]
fn count_and_fail_calls() {
    let grammar = compile(r#"x = count(3, hex_digit) | fail("no hex") ;"#).unwrap();
    assert_eq!(
        grammar.rules["x"].expr,
        Expr::Choice(vec![
            Expr::Count(3, Box::new(Expr::Terminal(Terminal::HexDigit))),
            Expr::Fail("no hex".to_owned()),
        ])
    );
}

#[test]
fn keywords_do_not_swallow_identifier_heads() {
    // "integer" starts with the keyword "int" but must parse as a
    // reference to the rule of that name.
    let grammar = compile(indoc! {r#"
        number  = integer ;
        integer = int ;
    "#})
    .unwrap();
    assert_eq!(
        grammar.rules["number"].expr,
        Expr::RuleRef("integer".to_owned())
    );
}

#[test]
fn comments_are_ignored() {
    let grammar = compile(indoc! {r#"
        // entry point
        x = 'a' ; // trailing note
        // done
    "#})
    .unwrap();
    assert_eq!(grammar.rules["x"].expr, Expr::CharLit(b'a'));
}

#[test]
fn duplicate_rules_are_rejected() {
    let err = compile("x = 'a' ;\nx = 'b' ;").unwrap_err();
    match err {
        CompileError::DuplicateRule { name, offset } => {
            assert_eq!(name, "x");
            assert!(offset >= 9, "offset {offset} should point at the second x");
        }
        other => panic!("expected DuplicateRule, got {other:?}"),
    }
}

#[test]
fn undefined_references_are_rejected() {
    let err = compile("x = missing ;").unwrap_err();
    match err {
        CompileError::UndefinedRule { rule, name, .. } => {
            assert_eq!(rule, "x");
            assert_eq!(name, "missing");
        }
        other => panic!("expected UndefinedRule, got {other:?}"),
    }
}

#[test]
fn syntax_errors_carry_a_position() {
    let err = compile("x = ;").unwrap_err();
    match err {
        CompileError::Syntax(parse) => assert_eq!(parse.offset, 4),
        other => panic!("expected Syntax, got {other:?}"),
    }
}

#[test]
fn compiled_grammar_parses_input_end_to_end() {
    let source = indoc! {r#"
        expr   = chainl1(term, lexeme('+'))   @on_add ;
        term   = chainl1(factor, lexeme('*')) @on_mul ;
        factor = value | between(lexeme('('), expr, lexeme(')')) ;
        value  = lexeme(int) @on_int ;
    "#};
    let grammar = compile(source).unwrap();

    let tags = grammar.action_tags();
    let mut arena = GrammarArena::new();
    let top = grammar.build_into(&mut arena).unwrap();

    let mut registry: HookRegistry<'_, i64> = HookRegistry::new(tags.len());
    registry.set_action(tags["on_int"], |stack, node, _| {
        let value = node
            .semantic_text()
            .parse()
            .map_err(|_| parsley_core::AstError::action("bad number"))?;
        stack.push(value);
        Ok(())
    });
    registry.set_action(tags["on_add"], |stack, _, children| {
        stack.push(children.iter().sum());
        Ok(())
    });
    registry.set_action(tags["on_mul"], |stack, _, children| {
        stack.push(children.iter().product());
        Ok(())
    });

    let value = parse_and_build(&arena, top, "1 + 2 * (3 + 4)", &mut registry)
        .unwrap()
        .unwrap();
    assert_eq!(value, 15);

    let err = arena.parse(top, "1 + ").unwrap_err();
    assert!(err.offset >= 3, "error should point past the operator");
}
