//! Emits a Rust module that reconstructs a compiled grammar through the
//! public arena API: every rule becomes a named placeholder, rule bodies
//! are emitted bottom-up into numbered temporaries, and `@action`
//! annotations become constants in a generated `actions` module.

use std::fmt::Write;

use crate::ast::{Expr, Grammar, Terminal};

/// Render `grammar` as a self-contained Rust module.
pub fn generate_module(grammar: &Grammar) -> String {
    let tags = grammar.action_tags();

    let mut out = String::new();
    out.push_str(
        "//! Parser construction generated by the parsley grammar compiler.\n\
         //!\n\
         //! Edit the grammar definition and regenerate instead of editing\n\
         //! this file.\n\n\
         use parsley_core::{GrammarArena, ParserId};\n\n",
    );

    if !tags.is_empty() {
        out.push_str("/// Action tags for `@name` annotations, in first-use order.\n");
        out.push_str("pub mod actions {\n");
        for (name, tag) in &tags {
            writeln!(out, "    pub const {}: usize = {};", const_name(name), tag)
                .expect("string write");
        }
        out.push_str("}\n\n");
    }
    writeln!(
        out,
        "/// Registry bound covering every generated action tag.\n\
         pub const ACTION_COUNT: usize = {};\n",
        tags.len()
    )
    .expect("string write");

    out.push_str(
        "/// Build the grammar into `arena`; returns the entry-point parser.\n\
         pub fn build_grammar(arena: &mut GrammarArena) -> ParserId {\n",
    );

    let mut body = String::new();
    for name in grammar.rules.keys() {
        writeln!(
            body,
            "    let r_{name} = arena.placeholder(Some({:?}));",
            name
        )
        .expect("string write");
    }

    let mut generator = CodeGenerator {
        body,
        next_temp: 0,
    };
    for rule in grammar.rules.values() {
        generator.body.push('\n');
        let var = generator.gen_expr(&rule.expr, Some(&rule.name));
        if let Some(action) = &rule.action {
            writeln!(
                generator.body,
                "    arena.set_action({var}, actions::{});",
                const_name(action)
            )
            .expect("string write");
        }
        writeln!(generator.body, "    arena.define(r_{}, {var});", rule.name)
            .expect("string write");
    }

    out.push_str(&generator.body);
    let entry = grammar.rules.keys().next().expect("validated grammar");
    writeln!(out, "\n    r_{entry}\n}}").expect("string write");
    out
}

struct CodeGenerator {
    body: String,
    next_temp: usize,
}

impl CodeGenerator {
    fn temp(&mut self) -> String {
        let var = format!("p{}", self.next_temp);
        self.next_temp += 1;
        var
    }

    fn line(&mut self, var: &str, call: &str) {
        writeln!(self.body, "    let {var} = arena.{call};").expect("string write");
    }

    /// Emit construction code for `expr`; returns the variable holding it.
    /// `name` is set only for the top level of a rule body.
    fn gen_expr(&mut self, expr: &Expr, name: Option<&str>) -> String {
        if let Expr::RuleRef(target) = expr {
            return match name {
                // A bare reference under its own rule name keeps the name
                // visible in the CPT via a transparent wrapper.
                Some(_) => {
                    let var = self.temp();
                    let call = format!("passthru({}, r_{target})", name_lit(name));
                    self.line(&var, &call);
                    var
                }
                None => format!("r_{target}"),
            };
        }

        let call = match expr {
            Expr::CharLit(c) => format!("char({}, {})", name_lit(name), byte_lit(*c)),
            Expr::StrLit(s) => format!("string({}, {s:?})", name_lit(name)),
            Expr::Range(lo, hi) => format!(
                "char_range({}, {}, {})",
                name_lit(name),
                byte_lit(*lo),
                byte_lit(*hi)
            ),
            Expr::OneOf(set) => format!("one_of({}, {set:?})", name_lit(name)),
            Expr::NoneOf(set) => format!("none_of({}, {set:?})", name_lit(name)),
            Expr::Fail(message) => format!("fail({}, {message:?})", name_lit(name)),
            Expr::Terminal(terminal) => {
                let constructor = match terminal {
                    Terminal::Digit => "digit",
                    Terminal::Alpha => "alpha",
                    Terminal::Alphanum => "alphanum",
                    Terminal::HexDigit => "hex_digit",
                    Terminal::Space => "space",
                    Terminal::AnyChar => "any_char",
                    Terminal::Int => "integer",
                    Terminal::Double => "double",
                    Terminal::Succeed => "succeed",
                    Terminal::Eoi => "eoi",
                };
                format!("{constructor}({})", name_lit(name))
            }
            Expr::RuleRef(_) => unreachable!("handled above"),
            Expr::Seq(items) => {
                let children = self.gen_all(items);
                format!("and({}, &[{}])", name_lit(name), children.join(", "))
            }
            Expr::Choice(items) => {
                let children = self.gen_all(items);
                format!("or({}, &[{}])", name_lit(name), children.join(", "))
            }
            Expr::Optional(inner) => {
                let inner = self.gen_expr(inner, None);
                format!("optional({}, {inner})", name_lit(name))
            }
            Expr::Many(inner) => {
                let inner = self.gen_expr(inner, None);
                format!("many({}, {inner})", name_lit(name))
            }
            Expr::Plus(inner) => {
                let inner = self.gen_expr(inner, None);
                format!("plus({}, {inner})", name_lit(name))
            }
            Expr::Count(n, inner) => {
                let inner = self.gen_expr(inner, None);
                format!("count({}, {n}, {inner})", name_lit(name))
            }
            Expr::Between(open, inner, close) => {
                let open = self.gen_expr(open, None);
                let inner = self.gen_expr(inner, None);
                let close = self.gen_expr(close, None);
                format!("between({}, {open}, {inner}, {close})", name_lit(name))
            }
            Expr::Delimited(item, delimiter) => {
                let item = self.gen_expr(item, None);
                let delimiter = self.gen_expr(delimiter, None);
                format!("delimited({}, {item}, Some({delimiter}))", name_lit(name))
            }
            Expr::Lookahead(inner) => {
                let inner = self.gen_expr(inner, None);
                format!("lookahead({}, {inner})", name_lit(name))
            }
            Expr::Not(inner) => {
                let inner = self.gen_expr(inner, None);
                format!("not({}, {inner})", name_lit(name))
            }
            Expr::Lexeme(inner) => {
                let inner = self.gen_expr(inner, None);
                format!("lexeme({}, {inner})", name_lit(name))
            }
            Expr::Skip(inner) => {
                let inner = self.gen_expr(inner, None);
                format!("skip({}, {inner})", name_lit(name))
            }
            Expr::Passthru(inner) => {
                let inner = self.gen_expr(inner, None);
                format!("passthru({}, {inner})", name_lit(name))
            }
            Expr::Chainl1(item, op) => {
                let item = self.gen_expr(item, None);
                let op = self.gen_expr(op, None);
                format!("chainl1({}, {item}, {op})", name_lit(name))
            }
            Expr::Chainr1(item, op) => {
                let item = self.gen_expr(item, None);
                let op = self.gen_expr(op, None);
                format!("chainr1({}, {item}, {op})", name_lit(name))
            }
        };

        let var = self.temp();
        self.line(&var, &call);
        var
    }

    fn gen_all(&mut self, items: &[Expr]) -> Vec<String> {
        items.iter().map(|item| self.gen_expr(item, None)).collect()
    }
}

fn name_lit(name: Option<&str>) -> String {
    match name {
        Some(name) => format!("Some({name:?})"),
        None => "None".to_owned(),
    }
}

fn byte_lit(b: u8) -> String {
    match b {
        b'\'' => "b'\\''".to_owned(),
        b'\\' => "b'\\\\'".to_owned(),
        b'\n' => "b'\\n'".to_owned(),
        b'\t' => "b'\\t'".to_owned(),
        b'\r' => "b'\\r'".to_owned(),
        0x20..=0x7e => format!("b'{}'", b as char),
        _ => format!("{b:#04x}"),
    }
}

fn const_name(action: &str) -> String {
    action.to_ascii_uppercase()
}
