// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The `cindex` command line interface.
//!
//! Lists every function declaration and call in a group of C files,
//! and reports missing prototypes, name collisions between functions
//! and other named elements, scope problems, and the rest of the
//! defects the core pipeline detects.
//!
//! Input files must be run through a preprocessor first
//! (`cc -E file.c > file.i`); unexpanded directives earn a warning and
//! make the results unreliable.

use camino::Utf8PathBuf;
use clap::Parser;
use cindex_core::{DiagnosticSink, FunctionFinder, FunctionRecord, IndexError};
use tracing::debug;

mod report;

/// Index function declarations, prototypes and calls in preprocessed C
/// source, reporting name collisions and shadowing problems.
#[derive(Debug, Parser)]
#[command(name = "cindex")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Preprocessed C files to index, processed in order
    files: Vec<Utf8PathBuf>,
}

fn main() -> miette::Result<()> {
    // Initialize tracing only if RUST_LOG is explicitly set, to keep
    // stdout clean for the report.
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_writer(std::io::stderr)
            .try_init();
    }

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .build(),
        )
    }))?;

    let cli = Cli::parse();

    println!();
    if cli.files.is_empty() {
        println!("Must specify at least one file to process");
        return Ok(());
    }

    let mut records = Vec::new();
    for file in &cli.files {
        let sink = DiagnosticSink::new();
        let result = index_file(file.as_str(), &sink, &mut records);
        for diagnostic in sink.drain() {
            println!("WARNING: {diagnostic}");
        }
        if let Err(error) = result {
            println!("Processing file {file} stopped early due to error: {error}");
        }
    }

    report::print_report(&mut records);
    Ok(())
}

/// Indexes one file, appending its records in discovery order.
fn index_file(
    file_name: &str,
    sink: &DiagnosticSink,
    records: &mut Vec<FunctionRecord>,
) -> Result<(), IndexError> {
    debug!(file = file_name, "indexing");
    let mut finder = FunctionFinder::open(file_name, sink.clone())?;
    while let Some(record) = finder.next_function()? {
        records.push(record);
    }
    debug!(file = file_name, total = records.len(), "file complete");
    Ok(())
}
