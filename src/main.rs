use std::{fs, process::ExitCode};

use clap::{Arg, ArgAction, Command};
use lox::{
    display_report, errors::reporter::Diagnostics, init_tracing, Lox, Options, ReportStyle, Status,
};
use rustyline::{error::ReadlineError, Editor};

const EXIT_USAGE: u8 = 64;
const EXIT_DATA: u8 = 65;
const EXIT_SOFTWARE: u8 = 70;
const EXIT_IO: u8 = 74;

fn run_file(path: &str, options: Options) -> ExitCode {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Problem reading file {}: {}", path, error);
            return ExitCode::from(EXIT_IO);
        }
    };

    let mut lox = Lox::new(options);
    let mut diagnostics = Diagnostics::new(Some(path.to_string()));
    let status = lox.run(&source, &mut diagnostics);
    display_report(&diagnostics, &source, ReportStyle::Frame);

    match status {
        Status::Completed => ExitCode::SUCCESS,
        Status::StaticError => ExitCode::from(EXIT_DATA),
        Status::RuntimeError => ExitCode::from(EXIT_SOFTWARE),
    }
}

fn repl(options: Options) -> ExitCode {
    let mut rl = match Editor::<()>::new() {
        Ok(editor) => editor,
        Err(error) => {
            eprintln!("Error: {:?}", error);
            return ExitCode::from(EXIT_IO);
        }
    };
    let mut lox = Lox::new(options);
    let mut diagnostics = Diagnostics::default();

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                rl.add_history_entry(line.as_str());

                lox.run(&line, &mut diagnostics);
                display_report(&diagnostics, &line, ReportStyle::Line);
                diagnostics.clear();
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(error) => {
                eprintln!("Error: {:?}", error);
                return ExitCode::from(EXIT_IO);
            }
        }
    }

    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    init_tracing();

    let matches = Command::new("lox")
        .about("Tree-walking interpreter for the Lox language")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("script")
                .help("The script to run. Starts a REPL when omitted")
                .num_args(0..),
        )
        .arg(
            Arg::new("tokens")
                .long("tokens")
                .help("Print the token stream before parsing")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("ast")
                .long("ast")
                .help("Print the parsed program before evaluating it")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let options = Options {
        print_tokens: matches.get_flag("tokens"),
        print_ast: matches.get_flag("ast"),
    };

    let scripts: Vec<&String> = matches
        .get_many::<String>("script")
        .map(|scripts| scripts.collect())
        .unwrap_or_default();

    match scripts.as_slice() {
        [] => repl(options),
        [script] => run_file(script, options),
        _ => {
            eprintln!("Usage: lox [script]");
            ExitCode::from(EXIT_USAGE)
        }
    }
}
