//! Binary entry point for rag-chunker.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use clap::Parser;
use rag_chunker::cli::output::{OutputFormat, format_error};
use rag_chunker::cli::{Cli, Commands, execute};
use rag_chunker::logging;
use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_json);
    let format = OutputFormat::parse(&cli.format);

    match execute(&cli) {
        Ok(output) => {
            if !output.is_empty() {
                // Handle broken pipe gracefully (e.g., when piped to `head` or `jq`)
                if let Err(e) = write!(io::stdout(), "{output}")
                    && e.kind() != io::ErrorKind::BrokenPipe
                {
                    eprintln!("Error writing to stdout: {e}");
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) if e.is_broken_pipe() => {
            tracing::warn!(error = %e, "caller closed the output stream");
            ExitCode::FAILURE
        }
        Err(e) => {
            let error_output = format_error(&e, format);
            match (&cli.command, format) {
                // stdout is the protocol stream in serve mode
                (Commands::Serve, _) | (_, OutputFormat::Text) => {
                    eprintln!("Error: {error_output}");
                }
                (_, OutputFormat::Json | OutputFormat::Ndjson) => {
                    println!("{error_output}");
                }
            }
            ExitCode::FAILURE
        }
    }
}
