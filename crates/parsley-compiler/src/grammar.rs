//! The grammar definition language, bootstrapped with the library's own
//! combinators.
//!
//! Surface shape: a program is one or more rules
//! `Name = expression [@action] ;` with `//` comments and whitespace
//! insignificant between tokens. Expressions compose alternation (`|`),
//! juxtaposed sequences, postfix `?` `*` `+`, grouping parentheses,
//! literals (`'c'`, `"str"`, `[a-z]`), terminal keywords, and the
//! keyword-introduced combinator calls (`between(...)` and friends).

use parsley_core::{GrammarArena, ParserId};

use crate::build::actions;

pub struct GdlGrammar {
    pub arena: GrammarArena,
    pub top: ParserId,
}

/// Build the GDL grammar. The returned `top` recognizes a whole grammar
/// file (rules plus end of input).
pub fn gdl_grammar() -> GdlGrammar {
    let mut g = GrammarArena::new();

    // Expressions are recursive through grouping and combinator-call
    // arguments, so the expression rule starts as a forward reference.
    let expr = g.placeholder(Some("Expression"));

    // Raw single-character building blocks.
    let raw_alpha = g.alpha(None);
    let raw_digit = g.digit(None);
    let raw_underscore = g.char(None, b'_');
    let raw_alnum = g.alphanum(None);

    // Identifier: (alpha | '_') (alphanum | '_')*
    let ident_start = g.or(None, &[raw_alpha, raw_underscore]);
    let ident_cont = g.or(None, &[raw_alnum, raw_underscore]);
    let ident_rest = g.many(None, ident_cont);
    let ident_raw = g.and(None, &[ident_start, ident_rest]);
    let ident = g.lexeme(Some("Identifier"), ident_raw);
    g.set_action(ident, actions::IDENT);

    // Shared escape sequences for string and character literals.
    let esc_backslash = g.string(None, "\\\\");
    let esc_n = g.string(None, "\\n");
    let esc_t = g.string(None, "\\t");
    let esc_r = g.string(None, "\\r");

    // String literal: '"' (escape | plain)* '"'
    let dquote = g.char(None, b'"');
    let esc_dquote = g.string(None, "\\\"");
    let str_plain = g.none_of(None, "\"\\");
    let str_char = g.or(
        None,
        &[esc_dquote, esc_backslash, esc_n, esc_t, esc_r, str_plain],
    );
    let str_body = g.many(None, str_char);
    let string_raw = g.and(None, &[dquote, str_body, dquote]);
    let string_lit = g.lexeme(Some("StringLiteral"), string_raw);
    g.set_action(string_lit, actions::STRING);

    // Character literal: exactly one (possibly escaped) character.
    let squote = g.char(None, b'\'');
    let esc_squote = g.string(None, "\\'");
    let char_plain = g.none_of(None, "'\\");
    let char_body = g.or(
        None,
        &[esc_squote, esc_backslash, esc_n, esc_t, esc_r, char_plain],
    );
    let char_raw = g.and(None, &[squote, char_body, squote]);
    let char_lit = g.lexeme(Some("CharLiteral"), char_raw);
    g.set_action(char_lit, actions::CHAR);

    // Unquoted character inside a `[a-z]` range: escaped or non-structural.
    let backslash = g.char(None, b'\\');
    let any = g.any_char(None);
    let range_escape = g.and(None, &[backslash, any]);
    let range_plain = g.none_of(None, "[]\\-");
    let range_char_raw = g.or(None, &[range_escape, range_plain]);
    let range_char = g.lexeme(Some("RangeChar"), range_char_raw);
    g.set_action(range_char, actions::RAW_CHAR);

    // Number literal (count() repetition argument).
    let digits = g.plus(None, raw_digit);
    let number = g.lexeme(Some("NumberLiteral"), digits);
    g.set_action(number, actions::NUMBER);

    // Punctuation.
    let raw_lparen = g.char(None, b'(');
    let lparen = g.lexeme(None, raw_lparen);
    let raw_rparen = g.char(None, b')');
    let rparen = g.lexeme(None, raw_rparen);
    let raw_comma = g.char(None, b',');
    let comma = g.lexeme(None, raw_comma);
    let raw_equals = g.char(None, b'=');
    let equals = g.lexeme(None, raw_equals);
    let raw_semi = g.char(None, b';');
    let semi = g.lexeme(None, raw_semi);
    let raw_pipe = g.char(None, b'|');
    let pipe = g.lexeme(None, raw_pipe);
    let raw_at = g.char(None, b'@');
    let at = g.lexeme(None, raw_at);
    let raw_minus = g.char(None, b'-');
    let minus = g.lexeme(None, raw_minus);
    let raw_lbrack = g.char(None, b'[');
    let raw_rbrack = g.char(None, b']');

    // Keywords must not swallow the head of a longer identifier
    // ("int" in "integer_part"), so each one carries a guard.
    let kw_guard = g.not(None, ident_cont);

    let kw_digit_s = g.string(None, "digit");
    let kw_digit = g.and(None, &[kw_digit_s, kw_guard]);
    let kw_alpha_s = g.string(None, "alpha");
    let kw_alpha = g.and(None, &[kw_alpha_s, kw_guard]);
    let kw_alphanum_s = g.string(None, "alphanum");
    let kw_alphanum = g.and(None, &[kw_alphanum_s, kw_guard]);
    let kw_hex_s = g.string(None, "hex_digit");
    let kw_hex = g.and(None, &[kw_hex_s, kw_guard]);
    let kw_space_s = g.string(None, "space");
    let kw_space = g.and(None, &[kw_space_s, kw_guard]);
    let kw_any_char_s = g.string(None, "any_char");
    let kw_any_char = g.and(None, &[kw_any_char_s, kw_guard]);
    let kw_int_s = g.string(None, "int");
    let kw_int = g.and(None, &[kw_int_s, kw_guard]);
    let kw_double_s = g.string(None, "double");
    let kw_double = g.and(None, &[kw_double_s, kw_guard]);
    let kw_succeed_s = g.string(None, "succeed");
    let kw_succeed = g.and(None, &[kw_succeed_s, kw_guard]);
    let kw_eoi_s = g.string(None, "eoi");
    let kw_eoi = g.and(None, &[kw_eoi_s, kw_guard]);

    // Declaration order resolves prefixes: "alphanum" before "alpha".
    let terminal_kw_raw = g.or(
        None,
        &[
            kw_alphanum,
            kw_alpha,
            kw_digit,
            kw_hex,
            kw_space,
            kw_any_char,
            kw_int,
            kw_double,
            kw_succeed,
            kw_eoi,
        ],
    );
    let terminal_keyword = g.lexeme(Some("TerminalKeyword"), terminal_kw_raw);
    g.set_action(terminal_keyword, actions::KEYWORD);

    // Combinator-call heads.
    let kw_between_s = g.string(None, "between");
    let kw_between_g = g.and(None, &[kw_between_s, kw_guard]);
    let kw_between = g.lexeme(None, kw_between_g);
    let kw_delimited_s = g.string(None, "delimited");
    let kw_delimited_g = g.and(None, &[kw_delimited_s, kw_guard]);
    let kw_delimited = g.lexeme(None, kw_delimited_g);
    let kw_count_s = g.string(None, "count");
    let kw_count_g = g.and(None, &[kw_count_s, kw_guard]);
    let kw_count = g.lexeme(None, kw_count_g);
    let kw_lookahead_s = g.string(None, "lookahead");
    let kw_lookahead_g = g.and(None, &[kw_lookahead_s, kw_guard]);
    let kw_lookahead = g.lexeme(None, kw_lookahead_g);
    let kw_not_s = g.string(None, "not");
    let kw_not_g = g.and(None, &[kw_not_s, kw_guard]);
    let kw_not = g.lexeme(None, kw_not_g);
    let kw_lexeme_s = g.string(None, "lexeme");
    let kw_lexeme_g = g.and(None, &[kw_lexeme_s, kw_guard]);
    let kw_lexeme = g.lexeme(None, kw_lexeme_g);
    let kw_skip_s = g.string(None, "skip");
    let kw_skip_g = g.and(None, &[kw_skip_s, kw_guard]);
    let kw_skip = g.lexeme(None, kw_skip_g);
    let kw_passthru_s = g.string(None, "passthru");
    let kw_passthru_g = g.and(None, &[kw_passthru_s, kw_guard]);
    let kw_passthru = g.lexeme(None, kw_passthru_g);
    let kw_chainl1_s = g.string(None, "chainl1");
    let kw_chainl1_g = g.and(None, &[kw_chainl1_s, kw_guard]);
    let kw_chainl1 = g.lexeme(None, kw_chainl1_g);
    let kw_chainr1_s = g.string(None, "chainr1");
    let kw_chainr1_g = g.and(None, &[kw_chainr1_s, kw_guard]);
    let kw_chainr1 = g.lexeme(None, kw_chainr1_g);
    let kw_oneof_s = g.string(None, "oneof");
    let kw_oneof_g = g.and(None, &[kw_oneof_s, kw_guard]);
    let kw_oneof = g.lexeme(None, kw_oneof_g);
    let kw_noneof_s = g.string(None, "noneof");
    let kw_noneof_g = g.and(None, &[kw_noneof_s, kw_guard]);
    let kw_noneof = g.lexeme(None, kw_noneof_g);
    let kw_fail_s = g.string(None, "fail");
    let kw_fail_g = g.and(None, &[kw_fail_s, kw_guard]);
    let kw_fail = g.lexeme(None, kw_fail_g);

    // Every reserved word, for excluding keywords from identifiers.
    let keyword_union = g.or(
        None,
        &[
            terminal_kw_raw,
            kw_between_g,
            kw_delimited_g,
            kw_count_g,
            kw_lookahead_g,
            kw_not_g,
            kw_lexeme_g,
            kw_skip_g,
            kw_passthru_g,
            kw_chainl1_g,
            kw_chainr1_g,
            kw_oneof_g,
            kw_noneof_g,
            kw_fail_g,
        ],
    );
    let not_keyword = g.not(None, keyword_union);
    let actual_ident = g.and(None, &[not_keyword, ident]);

    // Combinator calls.
    let oneof_call = g.and(Some("OneofCall"), &[kw_oneof, lparen, string_lit, rparen]);
    g.set_action(oneof_call, actions::ONE_OF_CALL);

    let noneof_call = g.and(
        Some("NoneofCall"),
        &[kw_noneof, lparen, string_lit, rparen],
    );
    g.set_action(noneof_call, actions::NONE_OF_CALL);

    let fail_call = g.and(Some("FailCall"), &[kw_fail, lparen, string_lit, rparen]);
    g.set_action(fail_call, actions::FAIL_CALL);

    let count_call = g.and(
        Some("CountCall"),
        &[kw_count, lparen, number, comma, expr, rparen],
    );
    g.set_action(count_call, actions::COUNT_CALL);

    let between_call = g.and(
        Some("BetweenCall"),
        &[kw_between, lparen, expr, comma, expr, comma, expr, rparen],
    );
    g.set_action(between_call, actions::BETWEEN_CALL);

    let delimited_call = g.and(
        Some("DelimitedCall"),
        &[kw_delimited, lparen, expr, comma, expr, rparen],
    );
    g.set_action(delimited_call, actions::DELIMITED_CALL);

    let lookahead_call = g.and(
        Some("LookaheadCall"),
        &[kw_lookahead, lparen, expr, rparen],
    );
    g.set_action(lookahead_call, actions::LOOKAHEAD_CALL);

    let not_call = g.and(Some("NotCall"), &[kw_not, lparen, expr, rparen]);
    g.set_action(not_call, actions::NOT_CALL);

    let lexeme_call = g.and(Some("LexemeCall"), &[kw_lexeme, lparen, expr, rparen]);
    g.set_action(lexeme_call, actions::LEXEME_CALL);

    let skip_call = g.and(Some("SkipCall"), &[kw_skip, lparen, expr, rparen]);
    g.set_action(skip_call, actions::SKIP_CALL);

    let passthru_call = g.and(Some("PassthruCall"), &[kw_passthru, lparen, expr, rparen]);
    g.set_action(passthru_call, actions::PASSTHRU_CALL);

    let chainl1_call = g.and(
        Some("Chainl1Call"),
        &[kw_chainl1, lparen, expr, comma, expr, rparen],
    );
    g.set_action(chainl1_call, actions::CHAINL1_CALL);

    let chainr1_call = g.and(
        Some("Chainr1Call"),
        &[kw_chainr1, lparen, expr, comma, expr, rparen],
    );
    g.set_action(chainr1_call, actions::CHAINR1_CALL);

    let combinator_call = g.or(
        Some("CombinatorCall"),
        &[
            oneof_call,
            noneof_call,
            fail_call,
            count_call,
            between_call,
            delimited_call,
            lookahead_call,
            not_call,
            lexeme_call,
            skip_call,
            passthru_call,
            chainl1_call,
            chainr1_call,
        ],
    );

    // Character range: '[' char '-' char ']'
    let range_raw = g.and(
        None,
        &[raw_lbrack, range_char, minus, range_char, raw_rbrack],
    );
    let char_range = g.lexeme(Some("CharRange"), range_raw);
    g.set_action(char_range, actions::RANGE);

    // Terminal: literal, keyword, or rule reference.
    let terminal = g.or(
        Some("Terminal"),
        &[string_lit, char_lit, terminal_keyword, actual_ident],
    );
    g.set_action(terminal, actions::TERMINAL);

    let parenthesized = g.and(None, &[lparen, expr, rparen]);

    let primary = g.or(
        Some("PrimaryExpression"),
        &[combinator_call, char_range, terminal, parenthesized],
    );

    // Postfix repetition.
    let rep_raw = g.one_of(None, "*+?");
    let rep_op = g.lexeme(Some("Repetition"), rep_raw);
    g.set_action(rep_op, actions::REP_OP);
    let opt_rep = g.optional(None, rep_op);

    let factor = g.and(Some("Factor"), &[primary, opt_rep]);
    g.set_action(factor, actions::FACTOR);

    // Sequence by juxtaposition, then alternation.
    let term = g.plus(Some("Sequence"), factor);
    g.set_action(term, actions::SEQ);

    let alt_part = g.and(None, &[pipe, term]);
    let alt_rest = g.many(None, alt_part);
    let expr_body = g.and(Some("Expression"), &[term, alt_rest]);
    g.set_action(expr_body, actions::ALT);
    g.define(expr, expr_body);

    // Rule definition: identifier '=' expression [@action] ';'
    let semantic_action = g.and(Some("SemanticAction"), &[at, ident]);
    g.set_action(semantic_action, actions::ACTION);
    let opt_action = g.optional(None, semantic_action);

    let rule = g.and(
        Some("RuleDefinition"),
        &[ident, equals, expr, opt_action, semi],
    );
    g.set_action(rule, actions::RULE);

    let rules = g.plus(None, rule);
    let eoi = g.eoi(Some("EndOfInput"));
    let program = g.and(Some("Grammar"), &[rules, eoi]);
    g.set_action(program, actions::PROGRAM);

    GdlGrammar {
        arena: g,
        top: program,
    }
}
