//! Concrete parse tree produced by a successful parse.

/// One node of the concrete parse tree.
///
/// Nodes borrow their matched span from the input buffer, so the input must
/// outlive the tree; children are owned. `semantic_start`/`semantic_end`
/// trim bytes that belong to the node's outer span but not to its semantic
/// content (the `lexeme` combinator's surrounding whitespace).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CptNode<'s> {
    pub(crate) tag: &'static str,
    pub(crate) name: String,
    pub(crate) offset: usize,
    pub(crate) text: &'s str,
    pub(crate) semantic_start: usize,
    pub(crate) semantic_end: usize,
    pub(crate) line: u32,
    pub(crate) col: u32,
    pub(crate) action: Option<usize>,
    pub(crate) children: Vec<CptNode<'s>>,
}

impl<'s> CptNode<'s> {
    /// Short kind string of the parser variant that produced this node.
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    /// Grammar symbol name of the producing parser (the variant tag for
    /// anonymous parsers).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Byte offset of the matched span in the input.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The full matched span.
    pub fn text(&self) -> &'s str {
        self.text
    }

    /// Length of the matched span in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The matched span with leading/trailing trim offsets removed.
    pub fn semantic_text(&self) -> &'s str {
        &self.text[self.semantic_start..self.text.len() - self.semantic_end]
    }

    pub fn semantic_len(&self) -> usize {
        self.text.len() - self.semantic_start - self.semantic_end
    }

    /// 0-indexed line of the span start.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// 0-indexed column of the span start within its line.
    pub fn col(&self) -> u32 {
        self.col
    }

    /// Action tag copied from the producing parser, if any.
    pub fn action(&self) -> Option<usize> {
        self.action
    }

    pub fn children(&self) -> &[CptNode<'s>] {
        &self.children
    }
}

/// Offset-to-line/column lookup built once per parse.
#[derive(Debug)]
pub(crate) struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub(crate) fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { line_starts }
    }

    /// 0-indexed (line, column) of a byte offset.
    pub(crate) fn line_col(&self, offset: usize) -> (u32, u32) {
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let col = offset - self.line_starts[line];
        (line as u32, col as u32)
    }
}

