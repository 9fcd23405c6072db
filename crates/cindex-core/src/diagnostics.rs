// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Warning diagnostics.
//!
//! Every defect the indexer detects — missing prototypes, collisions,
//! shadows, incomplete statements — is a [`Diagnostic`], never an error:
//! processing continues past all of them. The stages of the pipeline
//! share one [`DiagnosticSink`] and report into it at the point a defect
//! first becomes detectable; the driver drains the sink and decides how
//! to present the entries (the command line tool prefixes each with
//! `WARNING: `).
//!
//! Fatal conditions are not diagnostics; those are
//! [`IndexError`](crate::error::IndexError).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ecow::EcoString;

use crate::source_analysis::{FilePosition, Token};

/// A single warning, fully rendered, with the position it refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    message: EcoString,
    position: FilePosition,
}

impl Diagnostic {
    /// Creates a diagnostic about a token.
    ///
    /// Renders as `<lead><lexeme> found line <n> of file <name><trail>`,
    /// the house format for every name-related warning.
    #[must_use]
    pub fn token(lead: &str, token: &Token, trail: &str) -> Self {
        let mut message = EcoString::from(lead);
        message.push_str(token.lexeme());
        message.push_str(" found ");
        message.push_str(&token.location().to_string());
        message.push_str(trail);
        Self {
            message,
            position: token.location().clone(),
        }
    }

    /// Creates a free-form diagnostic for defects that have no token,
    /// such as an unterminated string literal.
    #[must_use]
    pub fn message(message: impl Into<EcoString>, position: FilePosition) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }

    /// Returns the position the diagnostic refers to.
    #[must_use]
    pub fn position(&self) -> &FilePosition {
        &self.position
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// A clonable handle to a shared diagnostic buffer.
///
/// Every pipeline stage holds a clone; all clones feed the same buffer.
/// The pipeline is single threaded, so plain `Rc<RefCell<_>>` sharing is
/// all that is needed.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticSink {
    buffer: Rc<RefCell<Vec<Diagnostic>>>,
}

impl DiagnosticSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic.
    pub fn report(&self, diagnostic: Diagnostic) {
        self.buffer.borrow_mut().push(diagnostic);
    }

    /// Removes and returns everything reported so far, in report order.
    #[must_use]
    pub fn drain(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.buffer.borrow_mut())
    }

    /// Returns `true` if nothing has been reported since the last drain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::TokenType;

    #[test]
    fn token_diagnostic_renders_house_format() {
        let token = Token::new(
            "foo",
            FilePosition::new("main.c", 12),
            TokenType::FuncCall,
        );
        let diagnostic = Diagnostic::token("Function call ", &token, " has no prototype");
        assert_eq!(
            diagnostic.to_string(),
            "Function call foo found line 12 of file main.c has no prototype"
        );
        assert_eq!(diagnostic.position().line(), 12);
    }

    #[test]
    fn sink_is_shared_between_clones() {
        let sink = DiagnosticSink::new();
        let other = sink.clone();

        other.report(Diagnostic::message("one", FilePosition::new("a.c", 1)));
        sink.report(Diagnostic::message("two", FilePosition::new("a.c", 2)));

        let drained = sink.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].to_string(), "one");
        assert_eq!(drained[1].to_string(), "two");
        assert!(other.is_empty());
    }

    #[test]
    fn drain_empties_the_sink() {
        let sink = DiagnosticSink::new();
        sink.report(Diagnostic::message("x", FilePosition::default()));
        assert!(!sink.is_empty());
        let _ = sink.drain();
        assert!(sink.is_empty());
        assert!(sink.drain().is_empty());
    }
}
