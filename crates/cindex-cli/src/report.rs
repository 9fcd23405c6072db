// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The final tabular report.
//!
//! Records print in a fixed-width table, sorted by name, scope kind,
//! owning file, declaration-before-call, and location. Column widths
//! (and the historical `refrenced in` spelling) are part of the output
//! format consumers already parse, so they stay as they are.

use cindex_core::FunctionRecord;

/// The table header line.
pub const HEADER: &str =
    "Function name         scope               caller                source          line";

/// Formats one record as a table row, newline included.
#[must_use]
pub fn format_record(record: &FunctionRecord) -> String {
    let scope = if record.is_file_scope() {
        "file   "
    } else {
        "global "
    };
    let detail = if record.is_declaration() {
        format!("declared{:25}", "")
    } else if record.is_reference() {
        format!("refrenced in {:<20}", record.caller())
    } else {
        format!("called from  {:<20}", record.caller())
    };
    format!(
        "{:<20}  {}{}  {:<14}  {}\n",
        record.name(),
        scope,
        detail,
        record.location().file(),
        record.location().line()
    )
}

/// Sorts the records and prints the report to standard output.
pub fn print_report(records: &mut [FunctionRecord]) {
    if records.is_empty() {
        println!("No functions were found!");
        return;
    }
    records.sort();
    println!("{HEADER}");
    for record in records.iter() {
        print!("{}", format_record(record));
    }
}
