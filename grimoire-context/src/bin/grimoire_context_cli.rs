use clap::Parser;
use grimoire_context::{ChunkConfig, DEFAULT_MAX_CHARS, DEFAULT_OVERLAP, chunk_text};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};

/// A CLI tool to split text files into overlapping windows as JSON output.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input text file. If not provided, reads from stdin.
    #[arg(short, long)]
    input: Option<String>,

    /// Maximum window width in characters.
    #[arg(short, long, default_value_t = DEFAULT_MAX_CHARS)]
    max_chars: usize,

    /// Overlap between consecutive windows in characters.
    #[arg(short, long, default_value_t = DEFAULT_OVERLAP)]
    overlap: usize,
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    let text = if let Some(input_path) = args.input {
        fs::read_to_string(input_path)?
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    };

    let config = ChunkConfig::new(args.max_chars, args.overlap);
    let chunks = chunk_text(&text, &config);

    #[derive(Serialize)]
    struct ChunkOutput {
        sequence: usize,
        chars: usize,
        text: String,
    }

    let output: Vec<ChunkOutput> = chunks
        .into_iter()
        .enumerate()
        .map(|(sequence, text)| ChunkOutput {
            sequence,
            chars: text.chars().count(),
            text,
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
