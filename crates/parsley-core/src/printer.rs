//! Diagnostic pretty-printer for concrete parse trees.

use std::fmt::Write;

use crate::cpt::CptNode;
use crate::visitor::{CptVisitor, visit_nodes};

struct CptPrinter {
    out: String,
    indent: usize,
}

impl CptVisitor for CptPrinter {
    fn enter_node(&mut self, node: &CptNode<'_>) {
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
        write!(self.out, "<{}> ({})", node.tag(), node.name()).expect("string write");
        if node.len() > 0 {
            write!(self.out, " '{}'", node.text()).expect("string write");
        }
        write!(self.out, " (len={})", node.len()).expect("string write");
        // The semantic span gets its own pair when trimming narrowed it.
        if node.semantic_len() != node.len() && node.semantic_len() > 0 {
            write!(
                self.out,
                " '{}' (len={})",
                node.semantic_text(),
                node.semantic_len()
            )
            .expect("string write");
        }
        self.out.push('\n');
        self.indent += 1;
    }

    fn exit_node(&mut self, _node: &CptNode<'_>) {
        self.indent -= 1;
    }
}

/// One line per node, four-space indent per depth:
/// `<tag> (name) 'content' (len=N)`, followed by the semantic span when it
/// differs from the full span.
pub fn cpt_to_string(root: &CptNode<'_>) -> String {
    let mut printer = CptPrinter {
        out: String::new(),
        indent: 0,
    };
    visit_nodes(root, &mut printer);
    printer.out
}

