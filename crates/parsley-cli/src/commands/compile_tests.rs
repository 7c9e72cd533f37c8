use std::fs;

use crate::cli::{CompileParams, build_cli};
use crate::commands::compile::execute;

fn params_for(grammar: std::path::PathBuf, output_dir: std::path::PathBuf) -> CompileParams {
    CompileParams {
        grammar,
        output_dir,
        colored: false,
    }
}

#[test]
fn writes_generated_module_into_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let grammar_path = dir.path().join("calc.gdl");
    fs::write(&grammar_path, "value = lexeme(int) @on_value ;\n").unwrap();

    let out_dir = dir.path().join("generated");
    let output = params_for(grammar_path, out_dir.clone());
    let written = execute(&output).unwrap();

    assert_eq!(written, out_dir.join("calc_grammar.rs"));
    let code = fs::read_to_string(&written).unwrap();
    assert!(code.contains("pub fn build_grammar"));
    assert!(code.contains("pub const ON_VALUE: usize = 0;"));
}

#[test]
fn reports_bad_grammars_with_a_snippet() {
    let dir = tempfile::tempdir().unwrap();
    let grammar_path = dir.path().join("broken.gdl");
    fs::write(&grammar_path, "x = ;\n").unwrap();

    let params = params_for(grammar_path, dir.path().to_path_buf());
    let message = execute(&params).unwrap_err();
    assert!(message.contains("broken.gdl"), "message: {message}");
    assert!(message.contains("x = ;"), "message: {message}");
}

#[test]
fn reports_missing_input_files() {
    let dir = tempfile::tempdir().unwrap();
    let params = params_for(dir.path().join("nope.gdl"), dir.path().to_path_buf());

    let message = execute(&params).unwrap_err();
    assert!(message.contains("cannot read"), "message: {message}");
}

#[test]
fn accepts_both_output_dir_forms() {
    for argv in [
        vec!["parsley", "g.gdl", "--output-dir", "out"],
        vec!["parsley", "g.gdl", "--output-dir=out"],
    ] {
        let matches = build_cli().try_get_matches_from(argv).unwrap();
        let params = CompileParams::from_matches(&matches);
        assert_eq!(params.grammar, std::path::PathBuf::from("g.gdl"));
        assert_eq!(params.output_dir, std::path::PathBuf::from("out"));
    }
}

#[test]
fn output_dir_defaults_to_current_directory() {
    let matches = build_cli()
        .try_get_matches_from(["parsley", "g.gdl"])
        .unwrap();
    let params = CompileParams::from_matches(&matches);
    assert_eq!(params.output_dir, std::path::PathBuf::from("."));
}
