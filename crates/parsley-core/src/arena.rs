//! Grammar arena: bulk owner of every parser value in a grammar.
//!
//! Parsers reference each other by [`ParserId`], so a grammar forms a DAG
//! with the arena as sole owner. Recursive rules use the two-step
//! [`GrammarArena::placeholder`] / [`GrammarArena::define`]: the placeholder
//! keeps its identity, so parsers that captured its id before the definition
//! see the filled-in rule.

use crate::parser::{Parser, ParserKind};

/// Index handle into a [`GrammarArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParserId(pub(crate) u32);

/// Owns all parser values created for one grammar.
#[derive(Debug, Default)]
pub struct GrammarArena {
    parsers: Vec<Parser>,
}

impl GrammarArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }

    pub fn get(&self, id: ParserId) -> &Parser {
        &self.parsers[id.0 as usize]
    }

    fn add(&mut self, name: Option<&str>, kind: ParserKind) -> ParserId {
        let id = ParserId(self.parsers.len() as u32);
        self.parsers.push(Parser::new(name, kind));
        id
    }

    /// Pre-allocate a named parser to be filled in later with [`define`].
    ///
    /// Needed for recursive grammars: the placeholder id can be referenced
    /// by other parsers before the rule body exists. Parsing a placeholder
    /// that was never defined fails with a parse error.
    ///
    /// [`define`]: GrammarArena::define
    pub fn placeholder(&mut self, name: Option<&str>) -> ParserId {
        self.add(name, ParserKind::Unset)
    }

    /// Fill a placeholder with the fields of `definition` (a shallow copy:
    /// the kind's sub-parser ids are shared, not cloned). The placeholder
    /// keeps its identity for every parser already referencing it.
    pub fn define(&mut self, placeholder: ParserId, definition: ParserId) {
        let def = self.parsers[definition.0 as usize].clone();
        self.parsers[placeholder.0 as usize] = def;
    }

    /// Attach an action tag; the engine copies it into every CPT node this
    /// parser produces.
    pub fn set_action(&mut self, id: ParserId, action: usize) {
        self.parsers[id.0 as usize].action = Some(action);
    }

    /// Override the "expected" string used in error messages (defaults to
    /// a per-variant description, then the parser name).
    pub fn set_expected(&mut self, id: ParserId, expected: &str) {
        self.parsers[id.0 as usize].expected = Some(expected.to_owned());
    }

    // --- Terminal matchers ---

    pub fn char(&mut self, name: Option<&str>, c: u8) -> ParserId {
        self.add(name, ParserKind::Char(c))
    }

    pub fn string(&mut self, name: Option<&str>, s: &str) -> ParserId {
        self.add(name, ParserKind::Str(s.to_owned()))
    }

    /// Inclusive bytewise range `[lo..hi]`.
    pub fn char_range(&mut self, name: Option<&str>, lo: u8, hi: u8) -> ParserId {
        self.add(name, ParserKind::CharRange(lo, hi))
    }

    pub fn one_of(&mut self, name: Option<&str>, set: &str) -> ParserId {
        self.add(name, ParserKind::OneOf(set.to_owned()))
    }

    pub fn none_of(&mut self, name: Option<&str>, set: &str) -> ParserId {
        self.add(name, ParserKind::NoneOf(set.to_owned()))
    }

    pub fn digit(&mut self, name: Option<&str>) -> ParserId {
        self.add(name, ParserKind::Digit)
    }

    pub fn alpha(&mut self, name: Option<&str>) -> ParserId {
        self.add(name, ParserKind::Alpha)
    }

    pub fn alphanum(&mut self, name: Option<&str>) -> ParserId {
        self.add(name, ParserKind::Alphanum)
    }

    pub fn hex_digit(&mut self, name: Option<&str>) -> ParserId {
        self.add(name, ParserKind::HexDigit)
    }

    pub fn space(&mut self, name: Option<&str>) -> ParserId {
        self.add(name, ParserKind::Space)
    }

    pub fn any_char(&mut self, name: Option<&str>) -> ParserId {
        self.add(name, ParserKind::AnyChar)
    }

    /// Optional `-` followed by one or more digits, longest prefix.
    pub fn integer(&mut self, name: Option<&str>) -> ParserId {
        self.add(name, ParserKind::Integer)
    }

    /// Floating-point literal, longest valid prefix (optional sign, digit
    /// runs, at most one `.`, optional exponent).
    pub fn double(&mut self, name: Option<&str>) -> ParserId {
        self.add(name, ParserKind::Double)
    }

    /// Succeeds with zero length iff the cursor is at end of input.
    pub fn eoi(&mut self, name: Option<&str>) -> ParserId {
        self.add(name, ParserKind::Eoi)
    }

    /// Always succeeds, zero length.
    pub fn succeed(&mut self, name: Option<&str>) -> ParserId {
        self.add(name, ParserKind::Succeed)
    }

    /// Always fails with the given message.
    pub fn fail(&mut self, name: Option<&str>, message: &str) -> ParserId {
        self.add(name, ParserKind::Fail(message.to_owned()))
    }

    // --- Structural combinators ---

    /// Sequence: all children must match, left to right.
    pub fn and(&mut self, name: Option<&str>, children: &[ParserId]) -> ParserId {
        self.add(name, ParserKind::And(children.to_vec()))
    }

    /// Ordered choice: first matching child wins.
    pub fn or(&mut self, name: Option<&str>, children: &[ParserId]) -> ParserId {
        self.add(name, ParserKind::Or(children.to_vec()))
    }

    /// Zero or more repetitions; never fails.
    pub fn many(&mut self, name: Option<&str>, p: ParserId) -> ParserId {
        self.add(name, ParserKind::Many(p))
    }

    /// One or more repetitions.
    pub fn plus(&mut self, name: Option<&str>, p: ParserId) -> ParserId {
        self.add(name, ParserKind::Plus(p))
    }

    /// Exactly `n` repetitions; `n = 0` succeeds trivially.
    pub fn count(&mut self, name: Option<&str>, n: usize, p: ParserId) -> ParserId {
        self.add(name, ParserKind::Count(n, p))
    }

    /// Attempts `p`; never fails, consumes nothing when `p` does not match.
    pub fn optional(&mut self, name: Option<&str>, p: ParserId) -> ParserId {
        self.add(name, ParserKind::Optional(p))
    }

    /// Succeeds with zero length iff `p` matches here; cursor not advanced.
    pub fn lookahead(&mut self, name: Option<&str>, p: ParserId) -> ParserId {
        self.add(name, ParserKind::Lookahead(p))
    }

    /// Succeeds with zero length iff `p` fails here.
    pub fn not(&mut self, name: Option<&str>, p: ParserId) -> ParserId {
        self.add(name, ParserKind::Not(p))
    }

    /// `open inner close`; the node spans all three but keeps only `inner`
    /// as a child.
    pub fn between(
        &mut self,
        name: Option<&str>,
        open: ParserId,
        inner: ParserId,
        close: ParserId,
    ) -> ParserId {
        self.add(name, ParserKind::Between { open, inner, close })
    }

    /// `item (delimiter item)*`, at least one item; a trailing delimiter is
    /// a hard error. With `delimiter = None` this is one-or-more items.
    pub fn delimited(
        &mut self,
        name: Option<&str>,
        item: ParserId,
        delimiter: Option<ParserId>,
    ) -> ParserId {
        self.add(name, ParserKind::Delimited { item, delimiter })
    }

    /// Repeats `p`, discarding matches; produces one childless node covering
    /// the consumed span.
    pub fn skip(&mut self, name: Option<&str>, p: ParserId) -> ParserId {
        self.add(name, ParserKind::Skip(p))
    }

    /// Transparent wrapper: the child's result, re-stamped with this
    /// parser's name and action tag when they are set.
    pub fn passthru(&mut self, name: Option<&str>, p: ParserId) -> ParserId {
        self.add(name, ParserKind::Passthru(p))
    }

    /// Runs `p` with surrounding whitespace and `//` comments consumed; the
    /// node covers the trimmed outer span and records semantic offsets so
    /// the semantic content equals `p`'s match.
    pub fn lexeme(&mut self, name: Option<&str>, p: ParserId) -> ParserId {
        self.add(
            name,
            ParserKind::Lexeme {
                inner: p,
                comments: true,
            },
        )
    }

    /// `item (op item)*`, grouped left-associatively into
    /// `chainl1_combined` nodes with `[left, op, right]` children.
    pub fn chainl1(&mut self, name: Option<&str>, item: ParserId, op: ParserId) -> ParserId {
        self.add(name, ParserKind::Chainl1 { item, op })
    }

    /// `item (op item)*`, grouped right-associatively into
    /// `chainr1_combined` nodes with `[left, op, right]` children.
    pub fn chainr1(&mut self, name: Option<&str>, item: ParserId, op: ParserId) -> ParserId {
        self.add(name, ParserKind::Chainr1 { item, op })
    }
}

