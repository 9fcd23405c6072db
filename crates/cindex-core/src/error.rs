// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Fatal error types.
//!
//! Only two conditions abort processing, and both are fatal to the
//! current file only: the driver reports them and moves on to the next
//! input. Everything else the indexer finds wrong is a
//! [`Diagnostic`](crate::diagnostics::Diagnostic) and processing
//! continues.

// Spurious warnings from miette derive macro expansion
#![allow(unused_assignments)]

use ecow::EcoString;
use miette::Diagnostic;
use thiserror::Error;

/// A fatal per-file error.
#[derive(Debug, Error, Diagnostic)]
pub enum IndexError {
    /// The input file could not be opened.
    #[error("could not open file {name}: {source}")]
    #[diagnostic(code(cindex::no_such_file))]
    NoSuchFile {
        /// The file that was requested.
        name: EcoString,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A function token was held while releases were pending.
    ///
    /// Holding can only happen while processing parser output; if
    /// releases are queued, the caller should be draining those instead.
    /// Hitting this means the parser/hold handshake was violated.
    #[error("internal error, double release of held function tokens")]
    #[diagnostic(code(cindex::double_release))]
    DoubleRelease,
}

impl IndexError {
    /// Creates a [`IndexError::NoSuchFile`] for the given path.
    #[must_use]
    pub fn no_such_file(name: impl Into<EcoString>, source: std::io::Error) -> Self {
        Self::NoSuchFile {
            name: name.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_such_file_display_names_the_file() {
        let error = IndexError::no_such_file(
            "missing.c",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        let text = error.to_string();
        assert!(text.contains("could not open file missing.c"));
    }

    #[test]
    fn double_release_display() {
        assert_eq!(
            IndexError::DoubleRelease.to_string(),
            "internal error, double release of held function tokens"
        );
    }
}
