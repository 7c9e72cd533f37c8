//! The backtracking parse engine.
//!
//! A single-threaded interpreter over [`ParserKind`], no memoization. The
//! engine owns the session state: the input, a line index, and the
//! furthest-error slot. Combinators that recover from failure (`or`,
//! `optional`, lookaheads, probes) snapshot the slot before the attempt and
//! restore it on the paths where the trial error must not leak into the
//! session diagnostic; committed failures propagate verbatim.

use crate::arena::{GrammarArena, ParserId};
use crate::cpt::{CptNode, LineIndex};
use crate::error::ParseError;
use crate::parser::{Parser, ParserKind};

/// Length cap for "found" snippets in error messages.
const FOUND_SNIPPET_LEN: usize = 10;

impl GrammarArena {
    /// Run `top` against `input` from the start.
    ///
    /// On failure the returned error is the deepest failure recorded during
    /// the whole session, which by construction is the most informative
    /// diagnostic for the caller to display.
    pub fn parse<'s>(&self, top: ParserId, input: &'s str) -> Result<CptNode<'s>, ParseError> {
        let mut engine = Engine {
            arena: self,
            input,
            lines: LineIndex::new(input),
            furthest: None,
        };
        match engine.eval(top, 0) {
            Ok(node) => Ok(node),
            Err(err) => match engine.furthest.take() {
                Some(furthest) if furthest.offset >= err.offset => Err(furthest),
                _ => Err(err),
            },
        }
    }
}

struct Engine<'g, 's> {
    arena: &'g GrammarArena,
    input: &'s str,
    lines: LineIndex,
    furthest: Option<ParseError>,
}

impl<'g, 's> Engine<'g, 's> {
    fn at_end(&self, pos: usize) -> bool {
        pos >= self.input.len()
    }

    fn byte(&self, pos: usize) -> u8 {
        self.input.as_bytes()[pos]
    }

    fn found_snippet(&self, pos: usize) -> String {
        if self.at_end(pos) {
            return "EOF".to_owned();
        }
        let rest = &self.input[pos..];
        match rest.char_indices().nth(FOUND_SNIPPET_LEN) {
            Some((end, _)) => rest[..end].to_owned(),
            None => rest.to_owned(),
        }
    }

    /// Build an error and offer it to the furthest-error slot. The update
    /// rule replaces the stored error iff the new position is not earlier,
    /// so ties go to the later-reported, more specific diagnostic.
    fn error(
        &mut self,
        pos: usize,
        message: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> ParseError {
        let err = ParseError {
            message: message.into(),
            offset: pos,
            col: pos,
            expected: expected.into(),
            found: found.into(),
        };
        if self
            .furthest
            .as_ref()
            .is_none_or(|stored| err.offset >= stored.offset)
        {
            self.furthest = Some(err.clone());
        }
        err
    }

    fn node(
        &self,
        parser: &Parser,
        tag: &'static str,
        start: usize,
        end: usize,
        children: Vec<CptNode<'s>>,
    ) -> CptNode<'s> {
        let (line, col) = self.lines.line_col(start);
        CptNode {
            tag,
            name: parser.display_name().to_owned(),
            offset: start,
            text: &self.input[start..end],
            semantic_start: 0,
            semantic_end: 0,
            line,
            col,
            action: parser.action,
            children,
        }
    }

    fn leaf(&self, parser: &Parser, tag: &'static str, start: usize, len: usize) -> CptNode<'s> {
        self.node(parser, tag, start, start + len, Vec::new())
    }

    /// Single-byte terminal matcher shared by `char`, ranges, sets, and
    /// the ASCII classes.
    fn match_byte(
        &mut self,
        parser: &'g Parser,
        tag: &'static str,
        pos: usize,
        pred: impl Fn(u8) -> bool,
        mismatch: &str,
    ) -> Result<CptNode<'s>, ParseError> {
        if self.at_end(pos) {
            let expected = parser.expected_str();
            return Err(self.error(pos, "Unexpected end of input", expected, "EOF"));
        }
        if pred(self.byte(pos)) {
            return Ok(self.leaf(parser, tag, pos, 1));
        }
        let expected = parser.expected_str();
        let found = (self.byte(pos) as char).to_string();
        Err(self.error(pos, mismatch, expected, found))
    }

    fn eval(&mut self, id: ParserId, pos: usize) -> Result<CptNode<'s>, ParseError> {
        let parser: &'g Parser = self.arena.get(id);
        match &parser.kind {
            ParserKind::Unset => {
                let expected = parser.expected_str();
                let found = self.found_snippet(pos);
                Err(self.error(pos, "Parser used before definition", expected, found))
            }

            ParserKind::Char(c) => {
                let c = *c;
                self.match_byte(parser, "char", pos, |b| b == c, "Unexpected character")
            }

            ParserKind::Str(s) => {
                if self.at_end(pos) {
                    let found = "EOF".to_owned();
                    return Err(self.error(pos, "Unexpected end of input", s.clone(), found));
                }
                if self.input[pos..].starts_with(s.as_str()) {
                    return Ok(self.leaf(parser, "string", pos, s.len()));
                }
                let message = if self.input.len() - pos < s.len() {
                    "Unexpected end of input"
                } else {
                    "Unexpected string"
                };
                let found = self.found_snippet(pos);
                Err(self.error(pos, message, s.clone(), found))
            }

            ParserKind::CharRange(lo, hi) => {
                let (lo, hi) = (*lo, *hi);
                self.match_byte(
                    parser,
                    "char_range",
                    pos,
                    |b| b >= lo && b <= hi,
                    "Unexpected character",
                )
            }

            ParserKind::OneOf(set) => {
                let set = set.clone();
                self.match_byte(
                    parser,
                    "one_of",
                    pos,
                    |b| set.as_bytes().contains(&b),
                    "Character not found in set",
                )
            }

            ParserKind::NoneOf(set) => {
                let set = set.clone();
                self.match_byte(
                    parser,
                    "none_of",
                    pos,
                    |b| !set.as_bytes().contains(&b),
                    "Character found in forbidden set",
                )
            }

            ParserKind::Digit => self.match_byte(
                parser,
                "digit",
                pos,
                |b| b.is_ascii_digit(),
                "Unexpected character",
            ),

            ParserKind::Alpha => self.match_byte(
                parser,
                "alpha",
                pos,
                |b| b.is_ascii_alphabetic(),
                "Unexpected character",
            ),

            ParserKind::Alphanum => self.match_byte(
                parser,
                "alphanum",
                pos,
                |b| b.is_ascii_alphanumeric(),
                "Unexpected character",
            ),

            ParserKind::HexDigit => self.match_byte(
                parser,
                "hex_digit",
                pos,
                |b| b.is_ascii_hexdigit(),
                "Unexpected character",
            ),

            ParserKind::Space => self.match_byte(
                parser,
                "space",
                pos,
                |b| b.is_ascii_whitespace(),
                "Unexpected character",
            ),

            ParserKind::AnyChar => {
                if self.at_end(pos) {
                    let expected = parser.expected_str();
                    return Err(self.error(pos, "Unexpected end of input", expected, "EOF"));
                }
                Ok(self.leaf(parser, "any_char", pos, 1))
            }

            ParserKind::Integer => {
                let bytes = self.input.as_bytes();
                let mut i = pos;
                if i < bytes.len() && bytes[i] == b'-' {
                    i += 1;
                }
                let digits_start = i;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
                if i == digits_start {
                    let found = self.found_snippet(pos);
                    return Err(self.error(pos, "Expected an integer", "integer", found));
                }
                Ok(self.leaf(parser, "integer", pos, i - pos))
            }

            ParserKind::Double => {
                let len = self.scan_double(pos);
                if len == 0 {
                    let found = self.found_snippet(pos);
                    return Err(self.error(pos, "Expected a double", "double", found));
                }
                Ok(self.leaf(parser, "double", pos, len))
            }

            ParserKind::Eoi => {
                if !self.at_end(pos) {
                    let found = self.found_snippet(pos);
                    return Err(self.error(pos, "End of input not found", "<end of input>", found));
                }
                Ok(self.leaf(parser, "eoi", pos, 0))
            }

            ParserKind::Succeed => Ok(self.leaf(parser, "succeed", pos, 0)),

            ParserKind::Fail(message) => {
                let message = message.clone();
                let expected = parser.display_name().to_owned();
                let found = self.found_snippet(pos);
                Err(self.error(pos, message, expected, found))
            }

            ParserKind::And(children) => {
                let mut cur = pos;
                let mut nodes = Vec::with_capacity(children.len());
                for &child in children {
                    let node = self.eval(child, cur)?;
                    cur += node.len();
                    nodes.push(node);
                }
                Ok(self.node(parser, "and", pos, cur, nodes))
            }

            ParserKind::Or(children) => {
                let snapshot = self.furthest.clone();
                for &child in children {
                    if let Ok(node) = self.eval(child, pos) {
                        let end = pos + node.len();
                        let wrapped = self.node(parser, "or", pos, end, vec![node]);
                        self.furthest = snapshot;
                        return Ok(wrapped);
                    }
                }
                // Every alternative failed; the newer, deeper error stays in
                // the session slot, but the reported expectation names all
                // the branches.
                let expected = children
                    .iter()
                    .map(|&c| self.arena.get(c).expected_str())
                    .collect::<Vec<_>>()
                    .join(" or ");
                let found = self.found_snippet(pos);
                Err(self.error(pos, "No alternative matched", expected, found))
            }

            ParserKind::Many(p) => {
                let p = *p;
                let mut cur = pos;
                let mut nodes = Vec::new();
                while let Ok(node) = self.eval(p, cur) {
                    let progressed = node.len() > 0;
                    cur += node.len();
                    nodes.push(node);
                    if !progressed {
                        break;
                    }
                }
                Ok(self.node(parser, "many", pos, cur, nodes))
            }

            ParserKind::Plus(p) => {
                let p = *p;
                let first = self.eval(p, pos)?;
                let mut cur = pos + first.len();
                let mut progressed = first.len() > 0;
                let mut nodes = vec![first];
                while progressed {
                    match self.eval(p, cur) {
                        Ok(node) => {
                            progressed = node.len() > 0;
                            cur += node.len();
                            nodes.push(node);
                        }
                        Err(_) => break,
                    }
                }
                Ok(self.node(parser, "plus", pos, cur, nodes))
            }

            ParserKind::Count(n, p) => {
                let (n, p) = (*n, *p);
                let mut cur = pos;
                let mut nodes = Vec::with_capacity(n);
                for _ in 0..n {
                    let node = self.eval(p, cur)?;
                    cur += node.len();
                    nodes.push(node);
                }
                Ok(self.node(parser, "count", pos, cur, nodes))
            }

            ParserKind::Optional(p) => {
                let p = *p;
                let snapshot = self.furthest.clone();
                match self.eval(p, pos) {
                    Ok(node) => {
                        let end = pos + node.len();
                        let wrapped = self.node(parser, "optional", pos, end, vec![node]);
                        self.furthest = snapshot;
                        Ok(wrapped)
                    }
                    Err(_) => {
                        self.furthest = snapshot;
                        Ok(self.leaf(parser, "optional", pos, 0))
                    }
                }
            }

            ParserKind::Lookahead(p) => {
                let p = *p;
                let snapshot = self.furthest.clone();
                let result = self.eval(p, pos);
                self.furthest = snapshot;
                result?;
                Ok(self.leaf(parser, "lookahead", pos, 0))
            }

            ParserKind::Not(p) => {
                let p = *p;
                let snapshot = self.furthest.clone();
                let result = self.eval(p, pos);
                self.furthest = snapshot;
                match result {
                    Err(_) => Ok(self.leaf(parser, "not", pos, 0)),
                    Ok(matched) => {
                        let expected = format!("not {}", self.arena.get(p).expected_str());
                        let mut found = matched.text().to_owned();
                        found.truncate(
                            found
                                .char_indices()
                                .nth(FOUND_SNIPPET_LEN)
                                .map_or(found.len(), |(i, _)| i),
                        );
                        Err(self.error(pos, "Parser unexpectedly matched", expected, found))
                    }
                }
            }

            ParserKind::Between { open, inner, close } => {
                let (open, inner, close) = (*open, *inner, *close);
                let snapshot = self.furthest.clone();
                let open_node = self.eval(open, pos)?;
                let mut cur = pos + open_node.len();
                let inner_node = self.eval(inner, cur)?;
                cur += inner_node.len();
                let close_node = self.eval(close, cur)?;
                cur += close_node.len();
                // Delimiters are consumed but not retained.
                let wrapped = self.node(parser, "between", pos, cur, vec![inner_node]);
                self.furthest = snapshot;
                Ok(wrapped)
            }

            ParserKind::Delimited { item, delimiter } => {
                let (item, delimiter) = (*item, *delimiter);
                let first = self.eval(item, pos)?;
                let mut cur = pos + first.len();
                let mut nodes = vec![first];
                loop {
                    let mut after_delim = cur;
                    if let Some(delim) = delimiter {
                        let snapshot = self.furthest.clone();
                        match self.eval(delim, cur) {
                            Ok(delim_node) => after_delim = cur + delim_node.len(),
                            Err(_) => {
                                self.furthest = snapshot;
                                break;
                            }
                        }
                    }
                    let snapshot = self.furthest.clone();
                    match self.eval(item, after_delim) {
                        Ok(node) => {
                            self.furthest = snapshot;
                            after_delim += node.len();
                            nodes.push(node);
                            cur = after_delim;
                        }
                        Err(_) if delimiter.is_some() => {
                            self.furthest = snapshot;
                            let expected = self.arena.get(item).expected_str();
                            let found = self.found_snippet(after_delim);
                            return Err(self.error(
                                after_delim,
                                "Unexpected trailing delimiter",
                                expected,
                                found,
                            ));
                        }
                        Err(_) => {
                            self.furthest = snapshot;
                            break;
                        }
                    }
                }
                Ok(self.node(parser, "delimited", pos, cur, nodes))
            }

            ParserKind::Skip(p) => {
                let p = *p;
                let mut cur = pos;
                loop {
                    let snapshot = self.furthest.clone();
                    match self.eval(p, cur) {
                        Ok(node) => {
                            if node.len() == 0 {
                                let expected = parser.display_name().to_owned();
                                let found = self.found_snippet(pos);
                                return Err(self.error(
                                    pos,
                                    "Infinite recursion detected",
                                    expected,
                                    found,
                                ));
                            }
                            cur += node.len();
                        }
                        Err(_) => {
                            self.furthest = snapshot;
                            break;
                        }
                    }
                }
                Ok(self.node(parser, "skip", pos, cur, Vec::new()))
            }

            ParserKind::Passthru(p) => {
                let p = *p;
                let mut node = self.eval(p, pos)?;
                if parser.name.is_some() {
                    node.name = parser.display_name().to_owned();
                }
                if parser.action.is_some() {
                    node.action = parser.action;
                }
                Ok(node)
            }

            ParserKind::Lexeme { inner, comments } => {
                let (inner, comments) = (*inner, *comments);
                let snapshot = self.furthest.clone();
                let leading = consume_trivia(self.input, pos, comments);
                let inner_node = self.eval(inner, pos + leading)?;
                let after_inner = pos + leading + inner_node.len();
                let trailing = consume_trivia(self.input, after_inner, comments);
                let end = after_inner + trailing;
                let mut wrapped = self.node(parser, "lexeme", pos, end, vec![inner_node]);
                wrapped.semantic_start = leading;
                wrapped.semantic_end = trailing;
                self.furthest = snapshot;
                Ok(wrapped)
            }

            ParserKind::Chainl1 { item, op } => {
                let (item, op) = (*item, *op);
                let snapshot = self.furthest.clone();
                let mut left = self.eval(item, pos)?;
                let mut cur = pos + left.len();
                loop {
                    let probe = self.furthest.clone();
                    let op_node = match self.eval(op, cur) {
                        Ok(node) => node,
                        Err(_) => {
                            self.furthest = probe;
                            break;
                        }
                    };
                    cur += op_node.len();
                    let right = self.eval(item, cur)?;
                    cur += right.len();
                    let start = left.offset();
                    left = self.node(
                        parser,
                        "chainl1_combined",
                        start,
                        cur,
                        vec![left, op_node, right],
                    );
                }
                self.furthest = snapshot;
                Ok(left)
            }

            ParserKind::Chainr1 { item, op } => {
                let (item, op) = (*item, *op);
                let snapshot = self.furthest.clone();
                let first = self.eval(item, pos)?;
                let mut cur = pos + first.len();
                let mut pairs = Vec::new();
                loop {
                    let probe = self.furthest.clone();
                    let op_node = match self.eval(op, cur) {
                        Ok(node) => node,
                        Err(_) => {
                            self.furthest = probe;
                            break;
                        }
                    };
                    cur += op_node.len();
                    let item_node = self.eval(item, cur)?;
                    cur += item_node.len();
                    pairs.push((op_node, item_node));
                }
                self.furthest = snapshot;
                if pairs.is_empty() {
                    return Ok(first);
                }
                // Fold from the right: the last item seeds the accumulated
                // right operand, each earlier (op, item) pair wraps it.
                let mut items = vec![first];
                let mut ops = Vec::with_capacity(pairs.len());
                for (op_node, item_node) in pairs {
                    ops.push(op_node);
                    items.push(item_node);
                }
                let mut right = items.pop().expect("at least two items");
                while let Some(op_node) = ops.pop() {
                    let left = items.pop().expect("item per operator");
                    let start = left.offset();
                    let end = right.offset() + right.len();
                    right = self.node(
                        parser,
                        "chainr1_combined",
                        start,
                        end,
                        vec![left, op_node, right],
                    );
                }
                Ok(right)
            }
        }
    }

    /// Longest valid floating-point prefix: optional sign, digit runs with
    /// at most one `.`, then an exponent only if it carries a digit. Returns
    /// 0 when no digit was consumed.
    fn scan_double(&self, pos: usize) -> usize {
        let bytes = self.input.as_bytes();
        let mut i = pos;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let mut has_digit = false;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            has_digit = true;
            i += 1;
        }
        if i < bytes.len() && bytes[i] == b'.' {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                has_digit = true;
                i += 1;
            }
        }
        if !has_digit {
            return 0;
        }
        if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
            let mut j = i + 1;
            if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
                j += 1;
            }
            let exponent_start = j;
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            // A dangling exponent marker is left unconsumed.
            if j > exponent_start {
                i = j;
            }
        }
        i - pos
    }
}

/// Bytes of whitespace (and `//` line comments, when enabled) starting at
/// `pos`. Iterates until no further progress.
fn consume_trivia(input: &str, pos: usize, comments: bool) -> usize {
    let bytes = input.as_bytes();
    let mut cur = pos;
    loop {
        let before = cur;
        while cur < bytes.len() && bytes[cur].is_ascii_whitespace() {
            cur += 1;
        }
        if comments && cur + 1 < bytes.len() && bytes[cur] == b'/' && bytes[cur + 1] == b'/' {
            cur += 2;
            while cur < bytes.len() && bytes[cur] != b'\n' {
                cur += 1;
            }
            if cur < bytes.len() {
                cur += 1;
            }
        }
        if cur == before {
            return cur - pos;
        }
    }
}

