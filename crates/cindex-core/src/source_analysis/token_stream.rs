// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Unbounded lookahead over the token stream.
//!
//! The statement parser needs to peek several tokens ahead — and to
//! abandon a peek and re-examine the same tokens later — so the
//! [`Tokenizer`] is wrapped in a hold-list: tokens already drawn from
//! the tokenizer but not yet consumed, with a cursor walking forward
//! through them.
//!
//! - [`TokenStream::next_token`] consumes: it pops the hold-list front
//!   (or the tokenizer) and invalidates any active lookahead.
//! - [`TokenStream::lookahead_next`] advances the cursor, pulling one
//!   more token from the tokenizer when it walks off the end.
//! - [`TokenStream::lookahead_last`] re-reads the cursor position.
//! - [`TokenStream::lookahead_reset`] rewinds the cursor so held tokens
//!   can be examined again.

use std::collections::VecDeque;
use std::io::BufRead;

use crate::diagnostics::DiagnosticSink;
use crate::error::IndexError;
use crate::source_analysis::{Token, TokenType, Tokenizer};

/// A pull source of tokens with arbitrary lookahead.
#[derive(Debug)]
pub struct TokenStream {
    tokenizer: Tokenizer,
    /// Tokens drawn from the tokenizer but not yet consumed.
    hold: VecDeque<Token>,
    /// Index into `hold` of the last lookahead, if one is active.
    cursor: Option<usize>,
}

impl TokenStream {
    /// Opens a stream over the named file.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::NoSuchFile`] if the file cannot be opened.
    pub fn open(file_name: &str, sink: DiagnosticSink) -> Result<Self, IndexError> {
        Ok(Self::wrap(Tokenizer::open(file_name, sink)?))
    }

    /// Builds a stream over an arbitrary reader.
    pub fn from_reader(
        file_name: &str,
        reader: impl BufRead + 'static,
        sink: DiagnosticSink,
    ) -> Self {
        Self::wrap(Tokenizer::from_reader(file_name, reader, sink))
    }

    fn wrap(tokenizer: Tokenizer) -> Self {
        Self {
            tokenizer,
            hold: VecDeque::new(),
            cursor: None,
        }
    }

    /// Consumes and returns the next token.
    pub fn next_token(&mut self) -> Token {
        let token = match self.hold.pop_front() {
            Some(held) => held,
            None => self.tokenizer.next_token(),
        };
        // A token was consumed, so any old lookahead is invalid.
        self.lookahead_reset();
        token
    }

    /// Advances the lookahead one token and returns it.
    pub fn lookahead_next(&mut self) -> Token {
        let index = match self.cursor {
            None => {
                if self.hold.is_empty() {
                    let token = self.tokenizer.next_token();
                    self.hold.push_back(token);
                }
                0
            }
            Some(current) => {
                let next = current + 1;
                if next == self.hold.len() {
                    let token = self.tokenizer.next_token();
                    self.hold.push_back(token);
                }
                next
            }
        };
        self.cursor = Some(index);
        self.hold[index].clone()
    }

    /// Returns the most recently found lookahead token, or the
    /// none-token if no lookahead is active.
    #[must_use]
    pub fn lookahead_last(&self) -> Token {
        match self.cursor {
            Some(index) => self.hold[index].clone(),
            None => Token::default(),
        }
    }

    /// Rewinds the lookahead so held tokens can be re-examined.
    pub fn lookahead_reset(&mut self) {
        self.cursor = None;
    }

    /// Returns `true` when every token from the source has been
    /// consumed: the tokenizer is exhausted and the hold-list is empty
    /// or holds only the end-of-file marker at its front.
    #[must_use]
    pub fn eof(&self) -> bool {
        self.tokenizer.eof()
            && match self.hold.front() {
                None => true,
                Some(token) => token.token_type() == TokenType::Eof,
            }
    }
}
