//! Builder-pattern printer for rendering compile errors.

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};

use crate::CompileError;

/// Renders a [`CompileError`] for humans, with a source snippet when the
/// error carries a position and a source was supplied.
pub struct DiagnosticPrinter<'a> {
    error: &'a CompileError,
    source: Option<&'a str>,
    path: Option<&'a str>,
    colored: bool,
}

impl<'a> DiagnosticPrinter<'a> {
    pub fn new(error: &'a CompileError) -> Self {
        Self {
            error,
            source: None,
            path: None,
            colored: false,
        }
    }

    pub fn source(mut self, source: &'a str) -> Self {
        self.source = Some(source);
        self
    }

    pub fn path(mut self, path: &'a str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let title = self.error.to_string();
        let (Some(source), Some(offset)) = (self.source, self.error.offset()) else {
            return format!("error: {title}");
        };

        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        let mut snippet = Snippet::source(source).line_start(1).annotation(
            AnnotationKind::Primary
                .span(annotation_range(offset, source.len()))
                .label(&title),
        );
        if let Some(path) = self.path {
            snippet = snippet.path(path);
        }

        let report: Vec<Group> = vec![Level::ERROR.primary_title(&title).element(snippet)];
        renderer.render(&report).to_string()
    }
}

/// Zero-width positions widen to one character so the caret lands on
/// something visible.
fn annotation_range(offset: usize, limit: usize) -> std::ops::Range<usize> {
    let start = offset.min(limit.saturating_sub(1));
    start..(start + 1).min(limit)
}
