// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Low-level file access: the line-level stage of the pipeline.
//!
//! A [`FileBuffer`] reads physical lines and yields *processed lines*:
//! comments are collapsed to a single space, string literals are kept
//! verbatim including their quotes, and preprocessor line directives are
//! consumed and used to rebase the source coordinate. Most of the tool
//! cares where something appears in the *original source*, which after
//! preprocessing is not the same as its position in the input, so both
//! coordinates are tracked in parallel.
//!
//! The buffer is a one-line read-ahead: [`FileBuffer::next_line`] returns
//! the previously fetched line and pre-fetches the next, so
//! [`FileBuffer::eof`] is exact — true only once the file is exhausted
//! *and* the buffered line has been handed out.
//!
//! Text falls into four categories — comments, quoted strings,
//! preprocessor commands, and everything else — each signalled by an
//! opening and closing marker, so scanning is a small state machine. Any
//! category can span physical lines (a condition called wrap), with
//! handling that depends on the category.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::IndexError;
use crate::source_analysis::FilePosition;

/// The category of text currently being scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextState {
    Comment,
    Quote,
    Preproc,
    Other,
}

/// Reads a C file one processed line at a time.
pub struct FileBuffer {
    reader: Box<dyn BufRead>,
    /// Position of the most recently returned line in the original source.
    source_position: FilePosition,
    /// Position represented by the current buffer contents.
    buffer_position: FilePosition,
    /// Position in the preprocessor output actually being read.
    input_position: FilePosition,
    buffer: String,
    state: TextState,
    /// The previous physical line ended inside a multi-line construct.
    have_wrap: bool,
    file_eof: bool,
    sink: DiagnosticSink,
}

impl std::fmt::Debug for FileBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileBuffer")
            .field("source_position", &self.source_position)
            .field("input_position", &self.input_position)
            .field("buffer", &self.buffer)
            .field("state", &self.state)
            .field("have_wrap", &self.have_wrap)
            .field("file_eof", &self.file_eof)
            .finish_non_exhaustive()
    }
}

impl FileBuffer {
    /// Opens the named file for reading.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::NoSuchFile`] if the file cannot be opened.
    pub fn open(file_name: &str, sink: DiagnosticSink) -> Result<Self, IndexError> {
        let file = File::open(Path::new(file_name))
            .map_err(|source| IndexError::no_such_file(file_name, source))?;
        debug!(file = file_name, "opened input file");
        Ok(Self::from_reader(file_name, BufReader::new(file), sink))
    }

    /// Builds a buffer over an arbitrary reader, labelled `file_name` for
    /// position reporting.
    pub fn from_reader(
        file_name: &str,
        reader: impl BufRead + 'static,
        sink: DiagnosticSink,
    ) -> Self {
        let start = FilePosition::new(file_name, 0);
        let mut buffer = Self {
            reader: Box::new(reader),
            source_position: start.clone(),
            buffer_position: start.clone(),
            input_position: start,
            buffer: String::new(),
            state: TextState::Other,
            have_wrap: false,
            file_eof: false,
            sink,
        };
        // Load the first line; every read is a look-ahead.
        buffer.fetch_next_line();
        buffer
    }

    /// Returns the next processed line.
    ///
    /// Returns the buffered line and pre-fetches its successor, caching
    /// the position alongside so it matches the returned data.
    pub fn next_line(&mut self) -> String {
        let result = self.buffer.clone();
        self.source_position = self.buffer_position.clone();
        self.fetch_next_line();
        result
    }

    /// Returns `true` once the file is exhausted and the buffered line
    /// has been returned.
    #[must_use]
    pub fn eof(&self) -> bool {
        self.file_eof && self.buffer.is_empty()
    }

    /// Returns the source position of the most recently returned line.
    #[must_use]
    pub fn position(&self) -> &FilePosition {
        &self.source_position
    }

    /// Reads one physical line, stripping the terminator. Returns `None`
    /// at end of file.
    fn read_physical_line(&mut self) -> Option<String> {
        let mut raw = Vec::new();
        match self.reader.read_until(b'\n', &mut raw) {
            Ok(0) | Err(_) => {
                self.file_eof = true;
                None
            }
            Ok(_) => {
                if raw.last() == Some(&b'\n') {
                    raw.pop();
                }
                if raw.last() == Some(&b'\r') {
                    raw.pop();
                }
                Some(String::from_utf8_lossy(&raw).into_owned())
            }
        }
    }

    /// Refills the buffer with the next non-empty processed line.
    fn fetch_next_line(&mut self) {
        let mut next_state = TextState::Other;

        self.buffer.clear();
        while self.buffer.is_empty() && !self.file_eof {
            let Some(line) = self.read_physical_line() else {
                break;
            };
            self.buffer_position.incr_line();
            self.input_position.incr_line();

            let bytes = line.as_bytes();
            // A line whose first non-space is a hash is a preprocessor
            // command, unless a comment or literal carried over onto it.
            if self.state == TextState::Other {
                if let Some(first) = burn_spaces(bytes, 0) {
                    if bytes[first] == b'#' {
                        self.state = TextState::Preproc;
                        self.have_wrap = false;
                    }
                }
            }

            let mut cursor: Option<usize> = Some(0);
            while let Some(start) = cursor {
                match self.state {
                    TextState::Comment => {
                        // If the comment did not wrap, the scan must skip
                        // the opening marker first.
                        let from = if self.have_wrap { start } else { start + 2 };
                        let found = find_from(bytes, b"*/", from);
                        self.have_wrap = found.is_none();
                        cursor = match found {
                            Some(position) => {
                                next_state = TextState::Other;
                                Some(position + 2)
                            }
                            None => None,
                        };
                        // The whole comment becomes a single space, the
                        // same as the compiler produces.
                        self.buffer.push(' ');
                    }

                    TextState::Quote => {
                        let from = if self.have_wrap { start } else { start + 1 };
                        let found = next_close_quote(bytes, from);
                        self.have_wrap = found.is_none();
                        if let Some(position) = found {
                            let stop = position + 1;
                            self.buffer.push_str(&line[start..stop]);
                            next_state = TextState::Other;
                            cursor = Some(stop);
                        } else {
                            self.buffer.push_str(&line[start..]);
                            /* Without an escaped return at the end, either
                            the close quote or the escape was left out.
                            GCC assumes the latter, so this does too. */
                            if !has_esc_newline(self.buffer.as_bytes(), true) {
                                self.sink.report(Diagnostic::message(
                                    format!(
                                        "Unterminated string literal found at {}",
                                        self.buffer_position
                                    ),
                                    self.buffer_position.clone(),
                                ));
                                self.buffer.push('\\');
                            }
                            cursor = None;
                        }
                    }

                    TextState::Preproc => {
                        self.handle_preproc(&line);
                        if !self.have_wrap {
                            next_state = TextState::Other;
                        }
                        // The entire line is handled at once.
                        cursor = None;
                    }

                    TextState::Other => {
                        // The section ends at the earlier of the next
                        // comment and the next string literal.
                        self.have_wrap = false;
                        let next_quote = next_open_quote(bytes, start);
                        let next_comment = find_from(bytes, b"/*", start);
                        if next_quote.is_none() && next_comment.is_none() {
                            self.have_wrap = true;
                            self.buffer.push_str(&line[start..]);
                            cursor = None;
                        } else {
                            let comment_first = match (next_quote, next_comment) {
                                (None, Some(_)) => true,
                                (Some(quote), Some(comment)) => comment < quote,
                                _ => false,
                            };
                            let end = if comment_first {
                                next_state = TextState::Comment;
                                next_comment.unwrap_or(0)
                            } else {
                                next_state = TextState::Quote;
                                next_quote.unwrap_or(0)
                            };
                            if start < end {
                                self.buffer.push_str(&line[start..end]);
                            }
                            cursor = Some(end);
                        }
                    }
                }

                if !self.have_wrap {
                    self.state = next_state;
                }
                if let Some(position) = cursor {
                    if position >= line.len() {
                        cursor = None;
                    }
                }
            }

            /* If the result is nothing but whitespace, drop it. If it is
            not part of a quoted string and holds only spaces and an
            escaped newline, drop it too. A quoted string of whitespace
            always keeps at least one char, either a quote or the escape
            in front of the line end. */
            let first = burn_spaces(self.buffer.as_bytes(), 0);
            let clear = match first {
                None => true,
                Some(position) => {
                    Some(position) == esc_newline_pos(self.buffer.as_bytes(), false)
                        && (!self.have_wrap || self.state != TextState::Quote)
                }
            };
            if clear {
                self.buffer.clear();
            }
        }
    }

    /// Consumes a preprocessor command line.
    ///
    /// The preprocessor pins tokens to their original coordinates by
    /// emitting `# <line> "<file>"` markers; those rebase the source
    /// position. Anything else starting with a hash is a real directive
    /// that should have been expanded already, which earns a warning.
    fn handle_preproc(&mut self, line: &str) {
        let bytes = line.as_bytes();
        let was_wrapped = self.have_wrap;
        self.have_wrap = has_esc_newline(bytes, false);

        let mut have_location = false;
        // Location markers never wrap.
        if !was_wrapped && !self.have_wrap {
            if let Some(hash) = bytes.iter().position(|&b| b == b'#') {
                if let Some(digits) = burn_spaces(bytes, hash + 1) {
                    if bytes[digits].is_ascii_digit() {
                        if let Some(after_digits) =
                            (digits..bytes.len()).find(|&i| !bytes[i].is_ascii_digit())
                        {
                            /* The marker names the location of the next
                            line; reading that line will increment the
                            counter, so compensate here. */
                            let line_no = line[digits..after_digits]
                                .parse::<u32>()
                                .unwrap_or(0)
                                .saturating_sub(1);
                            if let Some(quote) = burn_spaces(bytes, after_digits) {
                                if bytes[quote] == b'"' {
                                    let name_start = quote + 1;
                                    if let Some(name_end) =
                                        (name_start..bytes.len()).find(|&i| bytes[i] == b'"')
                                    {
                                        // A filename with no chars is illegal.
                                        if name_end > name_start {
                                            let after = name_end + 1;
                                            have_location = after == bytes.len()
                                                || burn_spaces(bytes, after).is_none();
                                            if have_location {
                                                self.buffer_position = FilePosition::new(
                                                    &line[name_start..name_end],
                                                    line_no,
                                                );
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }

        if !have_location && !was_wrapped {
            self.sink.report(Diagnostic::message(
                format!(
                    "Preprocessor directive {line} ignored on {}. Input must be preprocessed (cc -E) first",
                    self.input_position
                ),
                self.input_position.clone(),
            ));
        }
    }
}

/// Returns the first position at or after `start` that is not a space or
/// tab, or `None` if only whitespace remains.
pub(crate) fn burn_spaces(bytes: &[u8], start: usize) -> Option<usize> {
    (start..bytes.len()).find(|&i| bytes[i] != b' ' && bytes[i] != b'\t')
}

/// Finds `pattern` at or after `start`.
pub(crate) fn find_from(bytes: &[u8], pattern: &[u8], start: usize) -> Option<usize> {
    if start >= bytes.len() || pattern.is_empty() || pattern.len() > bytes.len() - start {
        return None;
    }
    bytes[start..]
        .windows(pattern.len())
        .position(|window| window == pattern)
        .map(|offset| start + offset)
}

/// Returns the start of the next quoted string.
///
/// A quote adjacent to a single-quote on either side is the `'"'`
/// character literal, not a string delimiter.
fn next_open_quote(bytes: &[u8], start: usize) -> Option<usize> {
    let mut position = start;
    while let Some(found) = (position..bytes.len()).find(|&i| bytes[i] == b'"') {
        let before_ok = found == 0 || bytes[found - 1] != b'\'';
        let after_ok = found + 1 >= bytes.len() || bytes[found + 1] != b'\'';
        if before_ok && after_ok {
            return Some(found);
        }
        position = found + 1;
    }
    None
}

/// Returns the end of the current quoted string: the next quote that is
/// not preceded by a backslash escape.
pub(crate) fn next_close_quote(bytes: &[u8], start: usize) -> Option<usize> {
    let mut position = start;
    while let Some(found) = (position..bytes.len()).find(|&i| bytes[i] == b'"') {
        if found == 0 || bytes[found - 1] != b'\\' {
            return Some(found);
        }
        position = found + 1;
    }
    None
}

/// If the line ends with an escaped newline, returns the position of the
/// escape character.
///
/// An escaped newline is a backslash as the last character on the line.
/// A common mistake is trailing spaces after the backslash, so trailing
/// whitespace is burned first; an escaped space is not a legal symbol.
/// Inside a multi-line string literal a backslash may itself be escaped,
/// so the count of consecutive backslashes decides: only an odd run
/// escapes the newline.
pub(crate) fn esc_newline_pos(bytes: &[u8], multi_line_quote: bool) -> Option<usize> {
    let index = (0..bytes.len()).rfind(|&i| bytes[i] != b' ' && bytes[i] != b'\t')?;
    if bytes[index] != b'\\' {
        return None;
    }
    let escaped = if multi_line_quote {
        let run = match (0..index).rfind(|&i| bytes[i] != b'\\') {
            None => index + 1,
            Some(other) => index - other,
        };
        run % 2 == 1
    } else {
        true
    };
    escaped.then_some(index)
}

/// Returns `true` if the final character is an escaped newline.
pub(crate) fn has_esc_newline(bytes: &[u8], multi_line_quote: bool) -> bool {
    esc_newline_pos(bytes, multi_line_quote).is_some()
}
