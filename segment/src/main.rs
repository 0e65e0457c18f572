use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use unicorn_core::{EncodingForm, Error, Text};
use unicorn_segment::{BoundaryKind, Segmenter, SegmenterConfig};

/// Print the boundary indices of a text, one per line.
///
/// Indices are in code units of the chosen encoding. Set RUST_LOG=trace to
/// see which rule decided each position.
#[derive(Parser)]
#[command(name = "unicorn-segment")]
struct Args {
    /// Text to segment (read from stdin when omitted)
    text: Option<String>,
    /// grapheme, word or sentence
    #[arg(long, default_value = "grapheme")]
    kind: BoundaryKind,
    /// Walk from the end of the text toward the start
    #[arg(long)]
    reverse: bool,
    /// Encoding the text is converted to before scanning: utf8, utf16, utf32 or scalar
    #[arg(long, default_value = "utf8")]
    encoding: EncodingForm,
    /// TOML file with enabled encoding forms and boundary kinds
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    let config = match &args.config {
        Some(path) => SegmenterConfig::load_toml(path)
            .map_err(|e| anyhow!("{e}"))
            .with_context(|| format!("loading {}", path.display()))?,
        None => SegmenterConfig::default(),
    };
    let segmenter = Segmenter::with_config(config);

    let input = match &args.text {
        Some(text) => text.clone().into_bytes(),
        None => {
            let mut bytes = Vec::new();
            std::io::stdin()
                .read_to_end(&mut bytes)
                .context("reading stdin")?;
            if bytes.last() == Some(&b'\n') {
                bytes.pop();
            }
            bytes
        }
    };

    // UTF-8 input is scanned as is, so malformed bytes reach the scanner.
    let utf16: Vec<u16>;
    let utf32: Vec<u32>;
    let text = match args.encoding {
        EncodingForm::Utf8 => Text::utf8(&input),
        form => {
            let s = match std::str::from_utf8(&input) {
                Ok(s) => s,
                Err(err) => {
                    println!("malformed character at {}", err.valid_up_to());
                    return Ok(ExitCode::from(1));
                }
            };
            match form {
                EncodingForm::Utf16 => {
                    utf16 = s.encode_utf16().collect();
                    Text::utf16(&utf16)
                }
                EncodingForm::Utf32 => {
                    utf32 = s.chars().map(u32::from).collect();
                    Text::utf32(&utf32)
                }
                _ => {
                    utf32 = s.chars().map(u32::from).collect();
                    Text::scalars(&utf32)
                }
            }
        }
    };

    match print_boundaries(&segmenter, args.kind, &text, args.reverse) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(Error::MalformedEncoding { index, .. }) => {
            println!("malformed character at {index}");
            Ok(ExitCode::from(1))
        }
        Err(err) => {
            eprintln!("error: {err}");
            Ok(ExitCode::from(2))
        }
    }
}

fn print_boundaries(
    segmenter: &Segmenter,
    kind: BoundaryKind,
    text: &Text<'_>,
    reverse: bool,
) -> unicorn_core::Result<()> {
    if reverse {
        let mut cursor = text.end();
        while let Some(boundary) = segmenter.previous_boundary(kind, text, cursor)? {
            println!("{boundary}");
            cursor = boundary;
        }
    } else {
        let mut cursor = 0;
        while let Some(boundary) = segmenter.next_boundary(kind, text, cursor)? {
            println!("{boundary}");
            cursor = boundary;
        }
    }
    Ok(())
}
