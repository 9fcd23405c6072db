// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Token types for C lexical analysis.
//!
//! A [`Token`] pairs an immutable lexeme and source position with a
//! mutable role triple: what the token means ([`TokenType`]), which scope
//! it belongs to ([`Scope`]), and auxiliary processing data
//! ([`Modifier`]). The tokenizer assigns an initial type from character
//! classes alone; the name tables and the parser refine the triple as the
//! token moves through the pipeline.
//!
//! # Equality
//!
//! Tokens compare by lexeme only. Under the C standard, non-identifiers
//! with equal lexemes always tokenize the same, and identifiers must be
//! unique within their namespace — so two entries with the same lexeme
//! but different roles are exactly the collisions and shadows this tool
//! exists to flag. Ignoring the role triple in comparisons makes those
//! clashes surface in lexeme-keyed tables.

use std::cmp::Ordering;
use std::fmt;

use ecow::EcoString;

use super::FilePosition;

/// What a token means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    /// Not a token; used as a sentinel when no real token is available.
    None,
    /// A name that has not been classified yet.
    Identifier,
    /// A numeric, string or character literal.
    Literal,
    /// A variable name.
    VarName,
    /// A function definition (declaration with a body).
    FuncDecl,
    /// A function prototype.
    FuncProto,
    /// A function call.
    FuncCall,
    /// A typedef naming a function type.
    FuncTypedef,
    /// A type name, built in or user defined.
    Type,
    /// The `typedef` keyword.
    Typedef,
    /// The `static` keyword.
    Static,
    /// A compound type introducer: `struct`, `union`, `enum`.
    Compound,
    /// A control keyword that takes parenthesised arguments.
    Control,
    /// Any other reserved word.
    Reserved,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `{`
    OpenBrace,
    /// `}`
    CloseBrace,
    /// A single `&`, which may be address-of or bitwise AND.
    Ampersand,
    /// `->` or `.`
    FieldAccess,
    /// `;`
    Semicolon,
    /// A run of symbols allowed in declarations: `*`, `[`, `]`, `,`.
    DeclSymbol,
    /// A run of any other symbol characters.
    OtherSymbol,
    /// End of input.
    Eof,
}

/// Which scope a name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Not determined yet.
    None,
    /// A language keyword.
    Keyword,
    /// Visible across translation units.
    Global,
    /// Restricted to the defining file (`static`).
    File,
    /// Local to the current function body.
    Local,
}

/// Auxiliary data needed to process some tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    /// No extra data.
    None,
    /// A reference to the function was taken instead of calling it.
    FuncRef,
    /// Control keyword taking one statement argument.
    OneArg,
    /// Control keyword taking two statement arguments.
    TwoArg,
    /// Control keyword taking three statement arguments (`for`).
    ThreeArg,
}

/// A lexed C language element.
#[derive(Debug, Clone)]
pub struct Token {
    lexeme: EcoString,
    location: FilePosition,
    token_type: TokenType,
    scope: Scope,
    modifier: Modifier,
}

impl Default for Token {
    /// The none-token: empty lexeme, no position, no role.
    fn default() -> Self {
        Self {
            lexeme: EcoString::new(),
            location: FilePosition::default(),
            token_type: TokenType::None,
            scope: Scope::None,
            modifier: Modifier::None,
        }
    }
}

impl Token {
    /// Creates a token lexed from file data.
    #[must_use]
    pub fn new(
        lexeme: impl Into<EcoString>,
        location: FilePosition,
        token_type: TokenType,
    ) -> Self {
        Self {
            lexeme: lexeme.into(),
            location,
            token_type,
            scope: Scope::None,
            modifier: Modifier::None,
        }
    }

    /// Creates a keyword table entry. Keywords carry no file position.
    #[must_use]
    pub fn keyword(lexeme: impl Into<EcoString>, token_type: TokenType, modifier: Modifier) -> Self {
        Self {
            lexeme: lexeme.into(),
            location: FilePosition::default(),
            token_type,
            scope: Scope::Keyword,
            modifier,
        }
    }

    /// Returns the text this token was lexed from.
    #[must_use]
    pub fn lexeme(&self) -> &EcoString {
        &self.lexeme
    }

    /// Returns where the token was found.
    #[must_use]
    pub fn location(&self) -> &FilePosition {
        &self.location
    }

    /// Returns what the token means.
    #[must_use]
    pub fn token_type(&self) -> TokenType {
        self.token_type
    }

    /// Returns the scope the token falls in.
    #[must_use]
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Returns the token's processing modifier.
    #[must_use]
    pub fn modifier(&self) -> Modifier {
        self.modifier
    }

    pub fn set_type(&mut self, token_type: TokenType) {
        self.token_type = token_type;
    }

    pub fn set_scope(&mut self, scope: Scope) {
        self.scope = scope;
    }

    pub fn set_modifier(&mut self, modifier: Modifier) {
        self.modifier = modifier;
    }

    /// Copies the role triple of `model` onto this token. The lexeme and
    /// position stay as lexed.
    pub fn adopt_meaning(&mut self, model: &Token) {
        self.token_type = model.token_type;
        self.scope = model.scope;
        self.modifier = model.modifier;
    }

    /// Returns `true` if this is the none-token sentinel.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.token_type == TokenType::None
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.lexeme == other.lexeme
    }
}

impl Eq for Token {}

impl PartialOrd for Token {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Token {
    fn cmp(&self, other: &Self) -> Ordering {
        self.lexeme.cmp(&other.lexeme)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lexeme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_none_token() {
        let token = Token::default();
        assert!(token.is_none());
        assert_eq!(token.lexeme(), "");
        assert_eq!(token.scope(), Scope::None);
        assert_eq!(token.modifier(), Modifier::None);
    }

    #[test]
    fn equality_ignores_role() {
        let mut a = Token::new("foo", FilePosition::new("a.c", 1), TokenType::Identifier);
        let b = Token::new("foo", FilePosition::new("b.c", 9), TokenType::FuncCall);
        a.set_scope(Scope::Local);

        // Same lexeme, different role and position: still equal, so the
        // clash surfaces in lexeme-keyed tables.
        assert_eq!(a, b);

        let c = Token::new("bar", FilePosition::new("a.c", 1), TokenType::Identifier);
        assert_ne!(a, c);
    }

    #[test]
    fn ordering_is_by_lexeme() {
        let a = Token::new("alpha", FilePosition::default(), TokenType::Identifier);
        let b = Token::new("beta", FilePosition::default(), TokenType::Literal);
        assert!(a < b);
    }

    #[test]
    fn adopt_meaning_copies_role_only() {
        let mut token = Token::new("for", FilePosition::new("a.c", 3), TokenType::Identifier);
        let model = Token::keyword("for", TokenType::Control, Modifier::ThreeArg);

        token.adopt_meaning(&model);

        assert_eq!(token.token_type(), TokenType::Control);
        assert_eq!(token.scope(), Scope::Keyword);
        assert_eq!(token.modifier(), Modifier::ThreeArg);
        // Position stays where it was lexed.
        assert_eq!(token.location().line(), 3);
    }

    #[test]
    fn keyword_constructor_sets_keyword_scope() {
        let token = Token::keyword("static", TokenType::Static, Modifier::None);
        assert_eq!(token.scope(), Scope::Keyword);
        assert_eq!(token.location().file(), "");
    }
}
