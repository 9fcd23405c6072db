// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Deferred-scope storage for function calls.
//!
//! A call whose target has not been declared yet has no scope: the
//! declaration later in the file decides it. Such calls are held, keyed
//! by lexeme, until the matching declaration arrives — at which point
//! every held call takes the declaration's scope and moves to a release
//! buffer, drained one record at a time. Calls still held at end of
//! file must be declared in some other translation unit, so they flush
//! with global scope.

use std::collections::BTreeMap;

use ecow::EcoString;

use crate::error::IndexError;
use crate::index::FunctionRecord;
use crate::source_analysis::{Scope, Token, TokenType};

/// Holds function calls until their scope is known.
#[derive(Debug, Default)]
pub struct FunctionHold {
    /// Held calls and their callers, keyed by lexeme.
    held: BTreeMap<EcoString, Vec<(Token, EcoString)>>,
    /// Records ready to hand out, drained from the back.
    releases: Vec<FunctionRecord>,
}

impl FunctionHold {
    /// Creates an empty hold.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while released records are waiting to be drained.
    #[must_use]
    pub fn doing_release(&self) -> bool {
        !self.releases.is_empty()
    }

    /// Returns `true` once nothing is held and nothing is releasable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.held.is_empty() && !self.doing_release()
    }

    /// Returns the next released record.
    ///
    /// # Panics
    ///
    /// Panics if no release is pending; guard with
    /// [`FunctionHold::doing_release`].
    #[must_use]
    pub fn next_release(&mut self) -> FunctionRecord {
        self.releases.pop().expect("release buffer is not empty")
    }

    /// Holds the token if it is a call with undetermined scope.
    ///
    /// Returns `true` if the token was held.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::DoubleRelease`] when a hold is attempted
    /// while releases are pending — the caller must drain those first.
    pub fn hold_if_needed(&mut self, token: &Token, caller: &str) -> Result<bool, IndexError> {
        if token.token_type() != TokenType::FuncCall || token.scope() != Scope::None {
            return Ok(false);
        }
        if self.doing_release() {
            return Err(IndexError::DoubleRelease);
        }
        self.held
            .entry(token.lexeme().clone())
            .or_default()
            .push((token.clone(), caller.into()));
        Ok(true)
    }

    /// Releases every held call matching a function declaration, giving
    /// each the declaration's scope.
    pub fn release_hold(&mut self, decl_token: &Token) {
        if decl_token.token_type() != TokenType::FuncDecl {
            return;
        }
        if let Some(entries) = self.held.remove(decl_token.lexeme()) {
            for (mut token, caller) in entries {
                token.set_scope(decl_token.scope());
                self.releases.push(FunctionRecord::from_token(&token, &caller));
            }
        }
    }

    /// End-of-file processing: flushes everything still held.
    ///
    /// A call held this long has no declaration in the file, so it must
    /// be declared elsewhere: it flushes with global scope. Returns the
    /// next record, or `None` once nothing remains.
    pub fn process_eof(&mut self) -> Option<FunctionRecord> {
        if !self.held.is_empty() {
            let held = std::mem::take(&mut self.held);
            for (_, entries) in held {
                for (mut token, caller) in entries {
                    token.set_scope(Scope::Global);
                    self.releases.push(FunctionRecord::from_token(&token, &caller));
                }
            }
        }
        if self.is_empty() {
            None
        } else {
            Some(self.next_release())
        }
    }
}
