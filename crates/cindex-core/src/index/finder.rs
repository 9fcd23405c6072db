// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The top of the pipeline: a pull source of [`FunctionRecord`]s.
//!
//! A [`FunctionFinder`] alternates parser output with hold releases.
//! Function declarations release any calls held for them and become the
//! current enclosing function; calls with undetermined scope go into
//! the hold; everything else is emitted immediately. At end of input
//! the hold flushes its remainder with global scope.

use std::io::BufRead;

use ecow::EcoString;

use crate::diagnostics::DiagnosticSink;
use crate::error::IndexError;
use crate::index::{FunctionHold, FunctionRecord};
use crate::parse::Parser;
use crate::source_analysis::TokenType;

/// The caller name used outside any function body.
const NO_FUNCTION: &str = "NONE";

/// Produces the function records of one input file.
#[derive(Debug)]
pub struct FunctionFinder {
    parser: Parser,
    /// The function declaration currently being processed.
    curr_function: EcoString,
    /// Calls whose scope is not known yet.
    hold: FunctionHold,
}

impl FunctionFinder {
    /// Opens a finder over the named file.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::NoSuchFile`] if the file cannot be opened.
    pub fn open(file_name: &str, sink: DiagnosticSink) -> Result<Self, IndexError> {
        Ok(Self::wrap(Parser::open(file_name, sink)?))
    }

    /// Builds a finder over an arbitrary reader.
    pub fn from_reader(
        file_name: &str,
        reader: impl BufRead + 'static,
        sink: DiagnosticSink,
    ) -> Self {
        Self::wrap(Parser::from_reader(file_name, reader, sink))
    }

    fn wrap(parser: Parser) -> Self {
        Self {
            parser,
            curr_function: NO_FUNCTION.into(),
            hold: FunctionHold::new(),
        }
    }

    /// Returns `true` once every record has been produced.
    #[must_use]
    pub fn eof(&self) -> bool {
        self.parser.eof() && self.hold.is_empty()
    }

    /// Returns the next function record, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::DoubleRelease`] if the parser/hold
    /// handshake is violated; this aborts the file.
    pub fn next_function(&mut self) -> Result<Option<FunctionRecord>, IndexError> {
        if self.hold.doing_release() {
            return Ok(Some(self.hold.next_release()));
        }

        while !self.parser.eof() {
            let funct_token = self.parser.next_function();
            if funct_token.token_type() == TokenType::FuncDecl {
                // A declaration: a new function is being processed.
                self.hold.release_hold(&funct_token);
                self.curr_function = funct_token.lexeme().clone();
                return Ok(Some(FunctionRecord::from_token(
                    &funct_token,
                    &self.curr_function,
                )));
            }
            if !self.hold.hold_if_needed(&funct_token, &self.curr_function)? {
                return Ok(Some(FunctionRecord::from_token(
                    &funct_token,
                    &self.curr_function,
                )));
            }
        }

        Ok(self.hold.process_eof())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn finder_for(text: &str) -> FunctionFinder {
        FunctionFinder::from_reader("test.c", Cursor::new(text.to_string()), DiagnosticSink::new())
    }

    fn records_of(text: &str) -> Vec<FunctionRecord> {
        let mut finder = finder_for(text);
        let mut records = Vec::new();
        while let Some(record) = finder.next_function().expect("pipeline error") {
            records.push(record);
        }
        assert!(finder.eof());
        records
    }

    #[test]
    fn declaration_then_resolved_call() {
        let records = records_of("int f(void) { return 0; }\nint g(void) { return f(); }\n");
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].name(), "f");
        assert!(records[0].is_declaration());
        assert_eq!(records[0].caller(), "f");

        assert_eq!(records[1].name(), "g");
        assert!(records[1].is_declaration());

        assert_eq!(records[2].name(), "f");
        assert!(!records[2].is_declaration());
        assert_eq!(records[2].caller(), "g");
        assert!(!records[2].is_file_scope());
    }

    #[test]
    fn forward_call_released_by_later_declaration() {
        let records = records_of(
            "void f(void) { helper(); }\nstatic void helper(void) { }\n",
        );
        // f declared, helper held, helper declared (releasing the call).
        assert_eq!(records[0].name(), "f");
        assert_eq!(records[1].name(), "helper");
        assert!(records[1].is_declaration());
        assert!(records[1].is_file_scope());

        // The released call carries the declaration's file scope.
        assert_eq!(records[2].name(), "helper");
        assert!(!records[2].is_declaration());
        assert_eq!(records[2].caller(), "f");
        assert!(records[2].is_file_scope());
    }

    #[test]
    fn undeclared_call_flushes_global_at_eof() {
        let records = records_of("int main(void) { return external(); }\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name(), "external");
        assert!(!records[1].is_declaration());
        assert_eq!(records[1].caller(), "main");
        assert!(!records[1].is_file_scope());
    }

    #[test]
    fn call_outside_any_function_has_none_caller() {
        let records = records_of("int x = setup();\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name(), "setup");
        assert_eq!(records[0].caller(), "NONE");
    }

    #[test]
    fn empty_input_produces_no_records() {
        let records = records_of("/* nothing here */\n");
        assert!(records.is_empty());
    }
}
