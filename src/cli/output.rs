//! Output formatting for one-shot CLI commands.
//!
//! Supports text, JSON and newline-delimited JSON. The `serve` command does
//! not go through here: its output is the line protocol itself.

use crate::chunking::{TokenCounter, available_strategies};
use crate::core::ChunkRecord;
use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt::Write;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Pretty-printed JSON.
    Json,
    /// One JSON object per line.
    Ndjson,
}

impl OutputFormat {
    /// Parses format from string, defaulting to text.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "ndjson" | "jsonl" => Self::Ndjson,
            _ => Self::Text,
        }
    }
}

/// Formats the chunks of one document.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_chunks(chunks: &[ChunkRecord], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format_chunks_text(chunks)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(chunks)? + "\n"),
        OutputFormat::Ndjson => {
            let mut output = String::new();
            for chunk in chunks {
                output.push_str(&chunk.to_json_line()?);
                output.push('\n');
            }
            Ok(output)
        }
    }
}

fn format_chunks_text(chunks: &[ChunkRecord]) -> String {
    if chunks.is_empty() {
        return "No chunks produced.\n".to_string();
    }

    let total: usize = chunks.iter().map(|c| c.token_count).sum();
    let mut output = String::new();
    let _ = writeln!(output, "Chunks: {} ({total} tokens)", chunks.len());
    let _ = writeln!(output, "{:<6} {:<8} Preview", "Index", "Tokens");
    output.push_str(&"-".repeat(60));
    output.push('\n');

    for (index, chunk) in chunks.iter().enumerate() {
        let head = chunk.preview(40);
        let ellipsis = if head.len() < chunk.size() { "..." } else { "" };
        let preview = head.replace('\n', "\\n");
        let _ = writeln!(
            output,
            "{index:<6} {:<8} {preview}{ellipsis}",
            chunk.token_count
        );
    }
    output
}

/// Formats the strategy and token counter listing.
#[must_use]
pub fn format_strategies(format: OutputFormat) -> String {
    #[derive(Serialize)]
    struct Listing {
        strategies: Vec<Entry>,
        token_counters: Vec<&'static str>,
    }

    #[derive(Serialize)]
    struct Entry {
        name: &'static str,
        description: &'static str,
    }

    let listing = Listing {
        strategies: available_strategies()
            .iter()
            .map(|&(name, description)| Entry { name, description })
            .collect(),
        token_counters: TokenCounter::ALL.iter().map(|c| c.name()).collect(),
    };

    match format {
        OutputFormat::Text => {
            let mut output = String::from("Strategies:\n");
            for entry in &listing.strategies {
                let _ = writeln!(output, "  {:<10} {}", entry.name, entry.description);
            }
            let _ = writeln!(
                output,
                "Token counters: {}",
                listing.token_counters.join(", ")
            );
            output
        }
        OutputFormat::Json => format_json(&listing),
        OutputFormat::Ndjson => serde_json::to_string(&listing).unwrap_or_default() + "\n",
    }
}

/// Formats an error for display.
#[must_use]
pub fn format_error(err: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => err.to_string(),
        OutputFormat::Json | OutputFormat::Ndjson => {
            serde_json::json!({ "error": err.to_string() }).to_string()
        }
    }
}

fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string()) + "\n"
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("text", OutputFormat::Text ; "text")]
    #[test_case("JSON", OutputFormat::Json ; "json")]
    #[test_case("ndjson", OutputFormat::Ndjson ; "ndjson")]
    #[test_case("jsonl", OutputFormat::Ndjson ; "jsonl alias")]
    #[test_case("yaml", OutputFormat::Text ; "unknown falls back")]
    fn test_output_format_parse(input: &str, expected: OutputFormat) {
        assert_eq!(OutputFormat::parse(input), expected);
    }

    fn sample() -> Vec<ChunkRecord> {
        vec![ChunkRecord::new(2, "hello"), ChunkRecord::new(3, "a\nb")]
    }

    #[test]
    fn test_format_chunks_ndjson() {
        let output = format_chunks(&sample(), OutputFormat::Ndjson).unwrap();
        assert_eq!(
            output,
            "{\"token_count\":2,\"text\":\"hello\"}\n{\"token_count\":3,\"text\":\"a\\nb\"}\n"
        );
    }

    #[test]
    fn test_format_chunks_json() {
        let output = format_chunks(&sample(), OutputFormat::Json).unwrap();
        let parsed: Vec<ChunkRecord> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_format_chunks_text() {
        let output = format_chunks(&sample(), OutputFormat::Text).unwrap();
        assert!(output.starts_with("Chunks: 2 (5 tokens)"));
        assert!(output.contains("a\\nb"));
    }

    #[test]
    fn test_format_chunks_text_truncates_preview() {
        let chunks = vec![ChunkRecord::new(100, "x".repeat(100))];
        let output = format_chunks(&chunks, OutputFormat::Text).unwrap();
        assert!(output.contains(&format!("{}...", "x".repeat(40))));
    }

    #[test]
    fn test_format_chunks_empty() {
        let output = format_chunks(&[], OutputFormat::Text).unwrap();
        assert_eq!(output, "No chunks produced.\n");
        assert_eq!(format_chunks(&[], OutputFormat::Ndjson).unwrap(), "");
    }

    #[test]
    fn test_format_strategies() {
        let text = format_strategies(OutputFormat::Text);
        assert!(text.contains("recursive"));
        assert!(text.contains("fixed"));
        assert!(text.contains("character, word, estimate"));

        let json: serde_json::Value =
            serde_json::from_str(&format_strategies(OutputFormat::Json)).unwrap();
        assert_eq!(json["strategies"][0]["name"], "recursive");
    }

    #[test]
    fn test_format_error() {
        let err = Error::Config {
            message: "bad".to_string(),
        };
        assert_eq!(
            format_error(&err, OutputFormat::Text),
            "configuration error: bad"
        );
        let json: serde_json::Value =
            serde_json::from_str(&format_error(&err, OutputFormat::Json)).unwrap();
        assert_eq!(json["error"], "configuration error: bad");
    }
}
