//! Argument definitions for the grammar compiler CLI.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Arg, ArgMatches, Command, value_parser};

pub fn build_cli() -> Command {
    Command::new("parsley")
        .about("Compiles grammar definition files into parser construction code")
        .arg(grammar_path_arg())
        .arg(output_dir_arg())
        .arg(color_arg())
}

/// Grammar definition file (positional).
fn grammar_path_arg() -> Arg {
    Arg::new("grammar")
        .value_name("GRAMMAR")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Grammar definition file")
}

/// Directory for the generated module (--output-dir).
fn output_dir_arg() -> Arg {
    Arg::new("output_dir")
        .long("output-dir")
        .value_name("DIR")
        .default_value(".")
        .value_parser(value_parser!(PathBuf))
        .help("Directory for the generated module")
}

/// Color output control (--color).
fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize diagnostics")
}

pub struct CompileParams {
    pub grammar: PathBuf,
    pub output_dir: PathBuf,
    pub colored: bool,
}

impl CompileParams {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let color = matches.get_one::<String>("color").expect("has default");
        Self {
            grammar: matches
                .get_one::<PathBuf>("grammar")
                .expect("required arg")
                .clone(),
            output_dir: matches
                .get_one::<PathBuf>("output_dir")
                .expect("has default")
                .clone(),
            colored: match color.as_str() {
                "always" => true,
                "never" => false,
                _ => std::io::stderr().is_terminal(),
            },
        }
    }
}
