//! `doc-mutate` — apply an instruction batch to a JSON document.
//!
//! Usage:
//!   doc-mutate [--inverse] [--names] [--pretty] '<instructions-json>'
//!
//! The document is read from stdin. Set `RUST_LOG=debug` for batch traces on
//! stderr.

use std::io::{self, Read};

use anyhow::Context;
use clap::Parser;
use doc_mutate::cli::{run, CliOptions};

/// Apply path-addressed edits to a JSON document read from stdin
#[derive(Parser, Debug)]
#[command(name = "doc-mutate")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Instruction batch as a JSON array in compact form
    instructions: String,

    /// Print the inverse batch instead of the new document
    #[arg(long)]
    inverse: bool,

    /// Encode opcodes as names when printing instructions
    #[arg(long)]
    names: bool,

    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut doc = String::new();
    io::stdin()
        .read_to_string(&mut doc)
        .context("failed to read document from stdin")?;

    let options = CliOptions {
        inverse: args.inverse,
        names: args.names,
        pretty: args.pretty,
    };
    let out = run(doc.trim(), &args.instructions, &options)?;
    println!("{out}");
    Ok(())
}
