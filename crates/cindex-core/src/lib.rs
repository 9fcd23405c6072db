// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Indexing of function declarations, prototypes and calls in C source.
//!
//! The input must already be preprocessed (`cc -E`): macros expanded,
//! includes inlined, with `#` line directives pinning tokens to their
//! original source coordinates. Processing is a strictly linear,
//! single-threaded pull pipeline:
//!
//! 1. **File buffer** — bytes to processed lines: comments collapsed,
//!    line directives consumed, source and input coordinates tracked in
//!    parallel ([`source_analysis::FileBuffer`]).
//! 2. **Tokenizer** — processed lines to tokens, with unbounded
//!    lookahead layered on top ([`source_analysis::Tokenizer`],
//!    [`source_analysis::TokenStream`]).
//! 3. **Name tables** — identifiers classified against keyword, global
//!    and local tables; collisions and shadows detected
//!    ([`semantic_analysis::NameSpace`]).
//! 4. **Parser and hold** — statement-level parsing to function tokens;
//!    calls with undetermined scope held until their declaration or end
//!    of file ([`parse::Parser`], [`index::FunctionHold`]).
//!
//! [`FunctionFinder`] drives the stack and yields [`FunctionRecord`]s.
//! Defects found along the way — missing prototypes, name collisions,
//! shadowing, static prototypes without declarations — are reported to
//! a shared [`DiagnosticSink`]; only two conditions
//! ([`IndexError::NoSuchFile`], [`IndexError::DoubleRelease`]) are
//! fatal, and then only to the current file.
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use cindex_core::{DiagnosticSink, FunctionFinder};
//!
//! let source = "int f(void) { return 0; }\nint g(void) { return f(); }\n";
//! let sink = DiagnosticSink::new();
//! let mut finder = FunctionFinder::from_reader("example.c", Cursor::new(source), sink.clone());
//!
//! let mut names = Vec::new();
//! while let Some(record) = finder.next_function().unwrap() {
//!     names.push(record.name().to_string());
//! }
//! assert_eq!(names, ["f", "g", "f"]);
//! assert!(sink.is_empty());
//! ```

pub mod diagnostics;
pub mod error;
pub mod index;
pub mod parse;
pub mod semantic_analysis;
pub mod source_analysis;

pub use diagnostics::{Diagnostic, DiagnosticSink};
pub use error::IndexError;
pub use index::{FunctionFinder, FunctionRecord};
