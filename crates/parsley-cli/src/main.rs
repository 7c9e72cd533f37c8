mod cli;
mod commands;

use std::process::ExitCode;

use cli::CompileParams;

fn main() -> ExitCode {
    let matches = cli::build_cli().get_matches();
    let params = CompileParams::from_matches(&matches);
    commands::compile::run(&params)
}
