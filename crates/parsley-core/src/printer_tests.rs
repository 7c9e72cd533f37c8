use crate::arena::GrammarArena;
use crate::printer::cpt_to_string;

#[test]
fn prints_nested_nodes_with_indentation() {
    let mut arena = GrammarArena::new();
    let open = arena.char(None, b'(');
    let close = arena.char(None, b')');
    let a = arena.char(Some("a"), b'a');
    let between = arena.between(Some("parens"), open, a, close);

    let cpt = arena.parse(between, "(a)").unwrap();
    insta::assert_snapshot!(cpt_to_string(&cpt), @r"
    <between> (parens) '(a)' (len=3)
        <char> (a) 'a' (len=1)
    ");
}

#[test]
fn prints_semantic_span_when_trimmed() {
    let mut arena = GrammarArena::new();
    let hello = arena.string(None, "hello");
    let lex = arena.lexeme(Some("hello"), hello);

    let cpt = arena.parse(lex, "   hello   world").unwrap();
    insta::assert_snapshot!(cpt_to_string(&cpt), @r"
    <lexeme> (hello) '   hello   ' (len=11) 'hello' (len=5)
        <string> (string) 'hello' (len=5)
    ");
}

#[test]
fn prints_zero_length_nodes_without_content() {
    let mut arena = GrammarArena::new();
    let a = arena.char(None, b'a');
    let opt = arena.optional(Some("maybe"), a);

    let cpt = arena.parse(opt, "xyz").unwrap();
    insta::assert_snapshot!(cpt_to_string(&cpt), @"<optional> (maybe) (len=0)");
}

#[test]
fn prints_chain_structure() {
    let mut arena = GrammarArena::new();
    let int = arena.integer(Some("int"));
    let minus = arena.char(Some("minus"), b'-');
    let chain = arena.chainl1(Some("sub"), int, minus);

    let cpt = arena.parse(chain, "1-2-3").unwrap();
    insta::assert_snapshot!(cpt_to_string(&cpt), @r"
    <chainl1_combined> (sub) '1-2-3' (len=5)
        <chainl1_combined> (sub) '1-2' (len=3)
            <integer> (int) '1' (len=1)
            <char> (minus) '-' (len=1)
            <integer> (int) '2' (len=1)
        <char> (minus) '-' (len=1)
        <integer> (int) '3' (len=1)
    ");
}
