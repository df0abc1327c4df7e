use anyhow::{Context, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use blockmap::BitmapIndex;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

const BASE64_PREFIX: &str = "b64:";

/// Parse integer arguments. Each argument may hold a comma separated list.
pub fn parse_values(args: &[String]) -> Result<Vec<u32>> {
    let mut values = Vec::new();

    for arg in args {
        for item in arg.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let value = item
                .parse::<u32>()
                .with_context(|| format!("invalid value '{item}'"))?;
            values.push(value);
        }
    }

    Ok(values)
}

/// Read the encoded bytes named by `input`: either `b64:<text>` or a file path.
pub fn read_bytes(input: &str) -> Result<Vec<u8>> {
    if let Some(text) = input.strip_prefix(BASE64_PREFIX) {
        return STANDARD
            .decode(text.trim())
            .context("invalid base64 input");
    }

    fs::read(input).with_context(|| format!("failed to read {input}"))
}

/// Load and decode an index.
pub fn load(input: &str) -> Result<BitmapIndex> {
    let bytes = read_bytes(input)?;
    debug!("decoding {} bytes from {}", bytes.len(), display_name(input));

    BitmapIndex::decode(&bytes).with_context(|| format!("failed to decode {}", display_name(input)))
}

pub fn load_all(inputs: &[String]) -> Result<Vec<BitmapIndex>> {
    inputs.iter().map(|input| load(input)).collect()
}

/// Write an encoded result to `output`, or print it as base64 on stdout.
///
/// An index without members has no encoding and prints `(empty)`.
pub fn emit(index: &BitmapIndex, output: Option<&Path>, with_ext: bool) -> Result<()> {
    if index.is_empty() {
        println!("(empty)");
        return Ok(());
    }

    let bytes = if with_ext {
        index.to_bytes_with_ext()?
    } else {
        index.to_bytes()?
    };

    match output {
        Some(path) => {
            fs::write(path, &bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("wrote {} bytes to {}", bytes.len(), path.display());
        }
        None => println!("{}", STANDARD.encode(&bytes)),
    }

    Ok(())
}

fn display_name(input: &str) -> &str {
    if input.starts_with(BASE64_PREFIX) {
        "inline input"
    } else {
        input
    }
}
