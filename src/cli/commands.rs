//! CLI command implementations.

use crate::chunking::create_chunker;
use crate::cli::output::{OutputFormat, format_chunks, format_strategies};
use crate::cli::parser::{Cli, Commands};
use crate::config::ChunkingConfig;
use crate::error::Result;
use crate::io::{read_all, read_file};
use crate::protocol::{Session, SessionSummary};
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Executes the CLI command.
///
/// `serve` streams on stdin/stdout and returns an empty string; the other
/// commands return their formatted output.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);

    match &cli.command {
        Commands::Serve => {
            let config = cli.chunking_config()?;
            cmd_serve(&config, io::stdin().lock(), io::stdout().lock())?;
            Ok(String::new())
        }
        Commands::Chunk { file } => {
            let config = cli.chunking_config()?;
            cmd_chunk(&config, file.as_deref(), format)
        }
        Commands::Strategies => Ok(format_strategies(format)),
    }
}

/// Runs a worker session over the given streams.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the session fails.
pub fn cmd_serve<R: BufRead, W: Write>(
    config: &ChunkingConfig,
    input: R,
    output: W,
) -> Result<SessionSummary> {
    let chunker = create_chunker(config)?;
    tracing::debug!(
        strategy = chunker.name(),
        chunk_size = config.chunk_size,
        token_counter = %config.token_counter,
        "starting worker session"
    );
    Session::new(chunker).run(input, output)
}

/// Chunks one document read from `file` (or stdin) and formats the result.
///
/// # Errors
///
/// Returns an error if reading, chunking or formatting fails.
pub fn cmd_chunk(
    config: &ChunkingConfig,
    file: Option<&Path>,
    format: OutputFormat,
) -> Result<String> {
    let text = match file {
        Some(path) => read_file(path)?,
        None => read_all(io::stdin().lock())?,
    };
    chunk_text(config, &text, format)
}

/// Chunks `text` and formats the result.
///
/// # Errors
///
/// Returns an error if chunking or formatting fails.
pub fn chunk_text(config: &ChunkingConfig, text: &str, format: OutputFormat) -> Result<String> {
    let chunker = create_chunker(config)?;
    let chunks = chunker.chunk(text)?;
    tracing::info!(
        strategy = chunker.name(),
        bytes = text.len(),
        chunks = chunks.len(),
        "document chunked"
    );
    format_chunks(&chunks, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ChunkRecord;
    use crate::protocol::Termination;
    use tempfile::NamedTempFile;

    #[test]
    fn test_cmd_serve_scenario() {
        let mut output = Vec::new();
        let summary = cmd_serve(
            &ChunkingConfig::default(),
            "hello\n<EOL>\n<EXIT>\n".as_bytes(),
            &mut output,
        )
        .unwrap();

        assert_eq!(summary.outcome, Termination::Exit);
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "<READY>\n{\"token_count\":5,\"text\":\"hello\"}\n<EOL>\n"
        );
    }

    #[test]
    fn test_cmd_serve_invalid_config_writes_nothing() {
        let mut output = Vec::new();
        let config = ChunkingConfig::default().strategy("nope");
        assert!(cmd_serve(&config, "".as_bytes(), &mut output).is_err());
        assert!(output.is_empty());
    }

    #[test]
    fn test_cmd_chunk_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "alpha\n\nbeta").unwrap();

        let output = cmd_chunk(
            &ChunkingConfig::default(),
            Some(file.path()),
            OutputFormat::Ndjson,
        )
        .unwrap();
        let records: Vec<ChunkRecord> = output
            .lines()
            .map(|l| ChunkRecord::from_json_line(l).unwrap())
            .collect();
        assert_eq!(records, vec![ChunkRecord::new(11, "alpha\n\nbeta")]);
    }

    #[test]
    fn test_cmd_chunk_missing_file() {
        let result = cmd_chunk(
            &ChunkingConfig::default(),
            Some(Path::new("/nonexistent/input.txt")),
            OutputFormat::Text,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_chunk_text_fixed_strategy() {
        let config = ChunkingConfig::default().strategy("fixed").chunk_size(4);
        let output = chunk_text(&config, "abcdefgh", OutputFormat::Json).unwrap();
        let records: Vec<ChunkRecord> = serde_json::from_str(&output).unwrap();
        assert_eq!(records.len(), 2);
    }
}
