//! Parser values: immutable descriptors of one grammar construct.

use crate::arena::ParserId;

/// The closed set of constructs the engine knows how to interpret.
///
/// Composite variants reference their sub-parsers by [`ParserId`]; a parser
/// value never owns another parser, the arena owns them all. This keeps the
/// grammar a DAG: recursion and sharing are both just repeated ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserKind {
    /// Placeholder created by [`crate::GrammarArena::placeholder`], not yet
    /// filled in by `define`. Interpreting one is a parse error.
    Unset,

    // Terminal matchers.
    Char(u8),
    Str(String),
    CharRange(u8, u8),
    OneOf(String),
    NoneOf(String),
    Digit,
    Alpha,
    Alphanum,
    HexDigit,
    Space,
    AnyChar,
    Integer,
    Double,
    Eoi,
    Succeed,
    Fail(String),

    // Structural combinators.
    And(Vec<ParserId>),
    Or(Vec<ParserId>),
    Many(ParserId),
    Plus(ParserId),
    Count(usize, ParserId),
    Optional(ParserId),
    Lookahead(ParserId),
    Not(ParserId),
    Between {
        open: ParserId,
        inner: ParserId,
        close: ParserId,
    },
    Delimited {
        item: ParserId,
        delimiter: Option<ParserId>,
    },
    Skip(ParserId),
    Passthru(ParserId),
    Lexeme {
        inner: ParserId,
        comments: bool,
    },
    Chainl1 {
        item: ParserId,
        op: ParserId,
    },
    Chainr1 {
        item: ParserId,
        op: ParserId,
    },
}

impl ParserKind {
    /// The CPT tag emitted for nodes produced by this variant.
    pub fn tag(&self) -> &'static str {
        match self {
            ParserKind::Unset => "unset",
            ParserKind::Char(_) => "char",
            ParserKind::Str(_) => "string",
            ParserKind::CharRange(..) => "char_range",
            ParserKind::OneOf(_) => "one_of",
            ParserKind::NoneOf(_) => "none_of",
            ParserKind::Digit => "digit",
            ParserKind::Alpha => "alpha",
            ParserKind::Alphanum => "alphanum",
            ParserKind::HexDigit => "hex_digit",
            ParserKind::Space => "space",
            ParserKind::AnyChar => "any_char",
            ParserKind::Integer => "integer",
            ParserKind::Double => "double",
            ParserKind::Eoi => "eoi",
            ParserKind::Succeed => "succeed",
            ParserKind::Fail(_) => "fail",
            ParserKind::And(_) => "and",
            ParserKind::Or(_) => "or",
            ParserKind::Many(_) => "many",
            ParserKind::Plus(_) => "plus",
            ParserKind::Count(..) => "count",
            ParserKind::Optional(_) => "optional",
            ParserKind::Lookahead(_) => "lookahead",
            ParserKind::Not(_) => "not",
            ParserKind::Between { .. } => "between",
            ParserKind::Delimited { .. } => "delimited",
            ParserKind::Skip(_) => "skip",
            ParserKind::Passthru(_) => "passthru",
            ParserKind::Lexeme { .. } => "lexeme",
            ParserKind::Chainl1 { .. } => "chainl1_combined",
            ParserKind::Chainr1 { .. } => "chainr1_combined",
        }
    }
}

/// A named, immutable descriptor of one grammar construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parser {
    pub(crate) name: Option<String>,
    pub(crate) expected: Option<String>,
    pub(crate) action: Option<usize>,
    pub(crate) kind: ParserKind,
}

impl Parser {
    pub(crate) fn new(name: Option<&str>, kind: ParserKind) -> Self {
        Self {
            name: name.map(str::to_owned),
            expected: None,
            action: None,
            kind,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn action(&self) -> Option<usize> {
        self.action
    }

    pub fn kind(&self) -> &ParserKind {
        &self.kind
    }

    /// Name used for CPT nodes and error synthesis: the user-assigned name,
    /// falling back to the variant tag for anonymous parsers.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.kind.tag())
    }

    /// The string reported as "expected" when this parser fails.
    pub fn expected_str(&self) -> String {
        if let Some(expected) = &self.expected {
            return expected.clone();
        }
        match &self.kind {
            ParserKind::Char(c) => (*c as char).to_string(),
            ParserKind::Str(s) => s.clone(),
            ParserKind::CharRange(lo, hi) => {
                format!("character in range [{}-{}]", *lo as char, *hi as char)
            }
            ParserKind::OneOf(set) => format!("character in set '{set}'"),
            ParserKind::NoneOf(set) => format!("character not in set '{set}'"),
            ParserKind::Digit => "digit".to_owned(),
            ParserKind::Alpha => "alpha".to_owned(),
            ParserKind::Alphanum => "alphanum".to_owned(),
            ParserKind::HexDigit => "hex_digit".to_owned(),
            ParserKind::Space => "whitespace".to_owned(),
            ParserKind::AnyChar => "any character".to_owned(),
            ParserKind::Integer => "integer".to_owned(),
            ParserKind::Double => "double".to_owned(),
            ParserKind::Eoi => "<end of input>".to_owned(),
            _ => self.display_name().to_owned(),
        }
    }
}
