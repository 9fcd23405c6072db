// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Source location tracking.
//!
//! Every token, diagnostic and function record carries a [`FilePosition`]
//! naming the file and line it came from. Because the input has been run
//! through the C preprocessor, two coordinate systems exist in parallel:
//! the position in the preprocessor *output* being read, and the position
//! in the *original source* the preprocessor's line directives point back
//! to. Both are represented by this one type; the file buffer decides
//! which is which.

use std::fmt;

use ecow::EcoString;

/// A `(file, line)` coordinate.
///
/// Positions are totally ordered by file name first, then line number,
/// which is the order the final report wants.
///
/// # Examples
///
/// ```
/// use cindex_core::source_analysis::FilePosition;
///
/// let mut position = FilePosition::new("main.c", 3);
/// position.incr_line();
/// assert_eq!(position.line(), 4);
/// assert_eq!(position.to_string(), "line 4 of file main.c");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FilePosition {
    file: EcoString,
    line: u32,
}

impl FilePosition {
    /// Creates a position at the given line of the given file.
    #[must_use]
    pub fn new(file: impl Into<EcoString>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Moves to the next line.
    pub fn incr_line(&mut self) {
        self.line += 1;
    }

    /// Returns the file name.
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Returns the line number.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for FilePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} of file {}", self.line, self.file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_and_accessors() {
        let position = FilePosition::new("a.c", 7);
        assert_eq!(position.file(), "a.c");
        assert_eq!(position.line(), 7);
    }

    #[test]
    fn incr_line_advances() {
        let mut position = FilePosition::new("a.c", 0);
        position.incr_line();
        position.incr_line();
        assert_eq!(position.line(), 2);
    }

    #[test]
    fn ordered_by_file_then_line() {
        let a1 = FilePosition::new("a.c", 9);
        let a2 = FilePosition::new("a.c", 10);
        let b1 = FilePosition::new("b.c", 1);

        assert!(a1 < a2);
        assert!(a2 < b1);
        assert!(a1 < b1);
    }

    #[test]
    fn display_format() {
        let position = FilePosition::new("main.c", 42);
        assert_eq!(position.to_string(), "line 42 of file main.c");
    }

    #[test]
    fn default_is_empty() {
        let position = FilePosition::default();
        assert_eq!(position.file(), "");
        assert_eq!(position.line(), 0);
    }
}
