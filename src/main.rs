// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! osbc - the Orange Soda bootstrap compiler
//!
//! Compiles one source file (or standard input) and writes the assembly
//! listing, or one of the intermediate forms selected with `--emit`.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use osbc_compiler::lexer::Lexer;
use owo_colors::OwoColorize;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "osbc",
    about = "Bootstrap compiler for the Orange Soda language",
    version,
    author = "Pegasus Heavy Industries"
)]
struct Cli {
    /// Source file to compile; standard input when omitted
    file: Option<PathBuf>,

    /// Write the output to this file instead of standard output
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// What to emit
    #[arg(long, value_enum, default_value_t = Emit::Asm)]
    emit: Emit,

    /// Enable debug logging on standard error
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// Assembly listing
    Asm,
    /// One line per token
    Tokens,
    /// The parsed program, printed as source
    Ast,
    /// The resolved symbol tables
    Symbols,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "osbc=debug,osbc_compiler=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let source = read_input(cli)?;
    let output = render(cli.emit, &source)?;

    match &cli.output {
        Some(path) => {
            debug!(path = %path.display(), bytes = output.len(), "writing output");
            std::fs::write(path, output)
                .with_context(|| format!("Unable to write '{}'", path.display()))?;
        }
        None => print!("{}", output),
    }

    Ok(())
}

fn read_input(cli: &Cli) -> anyhow::Result<String> {
    match &cli.file {
        Some(path) => Ok(osbc_compiler::read_source(path)?),
        None => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("Unable to read standard input")?;
            Ok(source)
        }
    }
}

fn render(emit: Emit, source: &str) -> Result<String, osbc_compiler::Error> {
    let output = match emit {
        Emit::Asm => osbc_compiler::compile(source)?.to_string(),
        Emit::Tokens => Lexer::new(source)
            .tokens()
            .into_iter()
            .map(|token| {
                let kind = token.kind.to_string();
                format!("{:>4}  {:<20} {}\n", token.line, kind, token.literal)
            })
            .collect(),
        Emit::Ast => osbc_compiler::parse(source)?.to_string(),
        Emit::Symbols => osbc_compiler::analyze(source)?.symbols.to_string(),
    };

    Ok(output)
}

fn report(err: &anyhow::Error) {
    let compile_error = err
        .downcast_ref::<osbc_compiler::Error>()
        .and_then(|err| err.line().map(|line| (line, err.message())));

    match compile_error {
        Some((line, message)) => {
            eprintln!("{} ({}): {}", "ERROR".red().bold(), line, message);
        }
        None => eprintln!("{}: {:#}", "Error".red().bold(), err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses() {
        let cli = Cli::parse_from([
            "osbc", "prog.os", "-o", "prog.asm", "--emit", "symbols", "-v",
        ]);
        assert_eq!(cli.file, Some(PathBuf::from("prog.os")));
        assert_eq!(cli.output, Some(PathBuf::from("prog.asm")));
        assert_eq!(cli.emit, Emit::Symbols);
        assert!(cli.verbose);

        let cli = Cli::parse_from(["osbc"]);
        assert_eq!(cli.file, None);
        assert_eq!(cli.emit, Emit::Asm);
    }

    #[test]
    fn test_render_asm() {
        let out = render(Emit::Asm, "function main() { _flush(); }").unwrap();
        assert_eq!(out, "main:\n  JSR _flush\n  RTS\n\n");
    }

    #[test]
    fn test_render_tokens_ends_with_eof() {
        let out = render(Emit::Tokens, "var x").unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("identifier"));
        assert!(lines[2].contains("end of file"));
    }

    #[test]
    fn test_render_error_keeps_line() {
        let err = render(Emit::Asm, "function main() {\n  x = 1;\n}").unwrap_err();
        assert_eq!(err.line(), Some(2));
    }
}
