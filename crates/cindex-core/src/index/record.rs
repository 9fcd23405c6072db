// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The records the pipeline produces.

use std::cmp::Ordering;

use ecow::EcoString;

use crate::source_analysis::{FilePosition, Modifier, Scope, Token, TokenType};

/// One indexed function: a declaration of it, or a call to it.
///
/// Records order the way the final report lists them: by name, then
/// file scope before global, then (for file scope) the owning file,
/// then declarations before calls, then location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionRecord {
    name: EcoString,
    location: FilePosition,
    /// The statement was a function declaration.
    is_declaration: bool,
    /// The function this call occurred in.
    caller: EcoString,
    /// A reference to the function was taken instead of calling it.
    is_reference: bool,
    /// Scope is restricted to the defining file.
    is_file_scope: bool,
}

impl FunctionRecord {
    /// Builds a record from a parsed function token and the name of the
    /// function it occurred in.
    #[must_use]
    pub fn from_token(token: &Token, caller: &str) -> Self {
        let is_declaration = token.token_type() == TokenType::FuncDecl;
        Self {
            name: token.lexeme().clone(),
            location: token.location().clone(),
            is_declaration,
            caller: if is_declaration {
                token.lexeme().clone()
            } else {
                caller.into()
            },
            is_reference: !is_declaration && token.modifier() == Modifier::FuncRef,
            is_file_scope: token.scope() == Scope::File,
        }
    }

    /// Returns the function's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns where the declaration or call was found.
    #[must_use]
    pub fn location(&self) -> &FilePosition {
        &self.location
    }

    /// Returns `true` for a declaration, `false` for a call.
    #[must_use]
    pub fn is_declaration(&self) -> bool {
        self.is_declaration
    }

    /// Returns the enclosing function of a call, or the function's own
    /// name for a declaration.
    #[must_use]
    pub fn caller(&self) -> &str {
        &self.caller
    }

    /// Returns `true` if the function was referenced rather than called.
    #[must_use]
    pub fn is_reference(&self) -> bool {
        self.is_reference
    }

    /// Returns `true` for file scope, `false` for global scope.
    #[must_use]
    pub fn is_file_scope(&self) -> bool {
        self.is_file_scope
    }
}

impl PartialOrd for FunctionRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FunctionRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        // Name first.
        self.name
            .cmp(&other.name)
            // File scope sorts before global scope.
            .then_with(|| other.is_file_scope.cmp(&self.is_file_scope))
            // File scope functions group by the file they belong to.
            .then_with(|| {
                if self.is_file_scope {
                    self.location.file().cmp(other.location.file())
                } else {
                    Ordering::Equal
                }
            })
            // Declarations sort before calls.
            .then_with(|| other.is_declaration.cmp(&self.is_declaration))
            .then_with(|| self.location.cmp(&other.location))
            .then_with(|| self.caller.cmp(&other.caller))
            .then_with(|| self.is_reference.cmp(&other.is_reference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(lexeme: &str, file: &str, line: u32, token_type: TokenType, scope: Scope) -> Token {
        let mut token = Token::new(lexeme, FilePosition::new(file, line), token_type);
        token.set_scope(scope);
        token
    }

    #[test]
    fn declaration_is_its_own_caller() {
        let declaration = token("f", "a.c", 3, TokenType::FuncDecl, Scope::Global);
        let record = FunctionRecord::from_token(&declaration, "other");
        assert!(record.is_declaration());
        assert_eq!(record.caller(), "f");
        assert!(!record.is_reference());
        assert!(!record.is_file_scope());
    }

    #[test]
    fn call_keeps_its_caller_and_modifier() {
        let mut call = token("f", "a.c", 9, TokenType::FuncCall, Scope::File);
        call.set_modifier(Modifier::FuncRef);
        let record = FunctionRecord::from_token(&call, "main");
        assert!(!record.is_declaration());
        assert_eq!(record.caller(), "main");
        assert!(record.is_reference());
        assert!(record.is_file_scope());
    }

    #[test]
    fn sorted_by_name_first() {
        let a = FunctionRecord::from_token(
            &token("alpha", "z.c", 50, TokenType::FuncDecl, Scope::Global),
            "alpha",
        );
        let b = FunctionRecord::from_token(
            &token("beta", "a.c", 1, TokenType::FuncDecl, Scope::Global),
            "beta",
        );
        assert!(a < b);
    }

    #[test]
    fn file_scope_sorts_before_global() {
        let file = FunctionRecord::from_token(
            &token("f", "a.c", 9, TokenType::FuncDecl, Scope::File),
            "f",
        );
        let global = FunctionRecord::from_token(
            &token("f", "a.c", 1, TokenType::FuncDecl, Scope::Global),
            "f",
        );
        assert!(file < global);
    }

    #[test]
    fn declarations_sort_before_calls() {
        let call = FunctionRecord::from_token(
            &token("f", "a.c", 1, TokenType::FuncCall, Scope::Global),
            "main",
        );
        let declaration = FunctionRecord::from_token(
            &token("f", "a.c", 9, TokenType::FuncDecl, Scope::Global),
            "f",
        );
        assert!(declaration < call);
    }

    #[test]
    fn calls_sort_by_location() {
        let early = FunctionRecord::from_token(
            &token("f", "a.c", 2, TokenType::FuncCall, Scope::Global),
            "g",
        );
        let late = FunctionRecord::from_token(
            &token("f", "a.c", 8, TokenType::FuncCall, Scope::Global),
            "h",
        );
        assert!(early < late);
    }

    #[test]
    fn file_scope_groups_by_owning_file() {
        let in_a = FunctionRecord::from_token(
            &token("f", "a.c", 9, TokenType::FuncDecl, Scope::File),
            "f",
        );
        let in_b = FunctionRecord::from_token(
            &token("f", "b.c", 1, TokenType::FuncDecl, Scope::File),
            "f",
        );
        assert!(in_a < in_b);
    }
}
