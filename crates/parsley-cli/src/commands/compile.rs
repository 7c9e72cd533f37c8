//! The compile command: grammar file in, generated Rust module out.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use parsley_compiler::DiagnosticPrinter;

use crate::cli::CompileParams;

pub fn run(params: &CompileParams) -> ExitCode {
    match execute(params) {
        Ok(output) => {
            println!("Wrote {}", output.display());
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

/// Compile the grammar and write `<stem>_grammar.rs` into the output
/// directory; returns the written path or a rendered diagnostic.
pub fn execute(params: &CompileParams) -> Result<PathBuf, String> {
    let source = fs::read_to_string(&params.grammar)
        .map_err(|err| format!("error: cannot read {}: {err}", params.grammar.display()))?;

    let code = parsley_compiler::generate(&source).map_err(|err| {
        DiagnosticPrinter::new(&err)
            .source(&source)
            .path(&params.grammar.display().to_string())
            .colored(params.colored)
            .render()
    })?;

    let stem = params
        .grammar
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("grammar");
    let output = params.output_dir.join(format!("{stem}_grammar.rs"));

    fs::create_dir_all(&params.output_dir)
        .map_err(|err| format!("error: cannot create {}: {err}", params.output_dir.display()))?;
    fs::write(&output, code)
        .map_err(|err| format!("error: cannot write {}: {err}", output.display()))?;

    Ok(output)
}
