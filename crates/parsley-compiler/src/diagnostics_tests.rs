use crate::diagnostics::DiagnosticPrinter;
use crate::{CompileError, compile};

#[test]
fn renders_a_snippet_for_syntax_errors() {
    let source = "x = ;";
    let err = compile(source).unwrap_err();

    let rendered = DiagnosticPrinter::new(&err)
        .source(source)
        .path("broken.gdl")
        .render();

    assert!(rendered.contains("error"), "rendered: {rendered}");
    assert!(rendered.contains("broken.gdl"), "rendered: {rendered}");
    assert!(rendered.contains("x = ;"), "rendered: {rendered}");
}

#[test]
fn renders_plain_text_without_source() {
    let err = compile("x = missing ;").unwrap_err();
    let rendered = DiagnosticPrinter::new(&err).render();
    assert_eq!(
        rendered,
        "error: rule `x` references undefined rule `missing`"
    );
}

#[test]
fn duplicate_rule_points_at_the_redefinition() {
    let source = "x = 'a' ;\nx = 'b' ;\n";
    let err = compile(source).unwrap_err();
    assert!(matches!(err, CompileError::DuplicateRule { .. }));

    let rendered = DiagnosticPrinter::new(&err).source(source).render();
    assert!(rendered.contains("duplicate rule `x`"), "rendered: {rendered}");
}
