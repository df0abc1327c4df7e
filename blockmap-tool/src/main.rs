//! blockmap - build, inspect and combine encoded bitmap indexes.
//!
//! Inputs name either a file holding encoded bytes or inline base64 text
//! prefixed with `b64:`. Results go to `--output` or to stdout as base64.

mod input;

use anyhow::{Context, Result};
use blockmap::{BitmapIndex, IndexView};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "blockmap")]
#[command(about = "Build, inspect and combine encoded bitmap indexes", long_about = None)]
struct Cli {
    /// Tracing log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an index from integer values
    Build {
        /// Values to index (comma separated lists are accepted)
        #[arg(value_name = "VALUES", required = true, num_args = 1..)]
        values: Vec<String>,

        /// Opaque payload appended after the index data
        #[arg(long, value_name = "TEXT")]
        ext: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Decode an index and print its contents
    Inspect {
        /// Encoded index (file path or b64:<text>)
        #[arg(value_name = "INPUT")]
        input: String,

        /// Print a JSON document instead of text
        #[arg(long)]
        json: bool,
    },
    /// Values present in both A and B
    And {
        a: String,
        b: String,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Values present in A or B
    Or {
        a: String,
        b: String,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Values present in A but not in B
    Not {
        a: String,
        b: String,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Values present in any input
    Union {
        #[arg(value_name = "INPUTS", required = true, num_args = 1..)]
        inputs: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Intersect A with each candidate in order and keep the first non-empty result
    AndFirst {
        a: String,

        #[arg(value_name = "CANDIDATES", required = true, num_args = 1..)]
        candidates: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Output file (defaults to base64 on stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Append the result's ext payload to the encoding
    #[arg(long)]
    with_ext: bool,
}

impl OutputArgs {
    fn emit(&self, index: &BitmapIndex) -> Result<()> {
        input::emit(index, self.output.as_deref(), self.with_ext)
    }
}

#[derive(Serialize)]
struct Summary {
    start: u32,
    end: u32,
    blocks: usize,
    len: u64,
    encoded_len: usize,
    ext_len: usize,
    /// Hex encoded
    ext: String,
    values: Vec<u32>,
}

impl Summary {
    fn new(view: &IndexView<'_>, encoded_len: usize) -> Self {
        Self {
            start: view.start(),
            end: view.end(),
            blocks: view.data().len(),
            len: view.len(),
            encoded_len,
            ext_len: view.ext().len(),
            ext: hex::encode(view.ext()),
            values: view.iter().collect(),
        }
    }
}

fn inspect(input: &str, json: bool) -> Result<()> {
    let bytes = input::read_bytes(input)?;
    let view = IndexView::parse(&bytes).with_context(|| format!("failed to decode {input}"))?;
    let summary = Summary::new(&view, bytes.len());

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Index:");
    println!("  Blocks: {}..={} ({} bytes)", summary.start, summary.end, summary.blocks);
    println!("  Values: {}", summary.len);
    println!("  Encoded size: {} bytes", summary.encoded_len);
    println!("  Ext: {} bytes", summary.ext_len);
    if summary.ext_len > 0 {
        println!("  Ext data: {}", summary.ext);
    }

    if summary.values.is_empty() {
        println!("(empty)");
    } else {
        let values: Vec<String> = summary.values.iter().map(u32::to_string).collect();
        println!("{}", values.join(","));
    }

    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Build { values, ext, output } => {
            let values = input::parse_values(&values)?;
            debug!("building index over {} values", values.len());

            let mut index = BitmapIndex::from_values(values);
            if let Some(ext) = ext {
                index.set_ext(ext.into_bytes());
            }
            output.emit(&index)
        }
        Commands::Inspect { input, json } => inspect(&input, json),
        Commands::And { a, b, output } => output.emit(&input::load(&a)?.and(&input::load(&b)?)),
        Commands::Or { a, b, output } => output.emit(&input::load(&a)?.or(&input::load(&b)?)),
        Commands::Not { a, b, output } => {
            output.emit(&input::load(&a)?.difference(&input::load(&b)?))
        }
        Commands::Union { inputs, output } => {
            let indexes = input::load_all(&inputs)?;
            output.emit(&BitmapIndex::union_all(&indexes))
        }
        Commands::AndFirst { a, candidates, output } => {
            let a = input::load(&a)?;
            let candidates = input::load_all(&candidates)?;
            output.emit(&a.and_first(&candidates))
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
