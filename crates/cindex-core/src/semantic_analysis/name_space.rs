// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The named symbol tables.
//!
//! Three tables keyed by lexeme: the fixed C keyword list, the
//! file/global scope names, and the names local to the current function
//! body. [`NameSpace::classify`] refines a freshly lexed identifier
//! against the tables; [`NameSpace::update`] enters each parsed name and
//! is where every collision and shadow defect is detected and reported.
//!
//! The tables deliberately key on the lexeme alone: two entries with the
//! same lexeme but different roles are indistinguishable to the table,
//! which is exactly how clashes between functions, variables and types
//! surface.

use std::collections::BTreeMap;

use ecow::EcoString;
use tracing::trace;

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::source_analysis::{Modifier, Scope, Token, TokenType};

/// Returns `true` if the token names a variable or a plain type.
fn var_bearing(token: &Token) -> bool {
    matches!(token.token_type(), TokenType::VarName | TokenType::Type)
}

/// Returns `true` if the token declares a user-defined type.
fn type_bearing(token: &Token) -> bool {
    matches!(token.token_type(), TokenType::Type | TokenType::FuncTypedef)
}

/// The keyword, global and local symbol tables for one file.
#[derive(Debug)]
pub struct NameSpace {
    keywords: BTreeMap<EcoString, Token>,
    globals: BTreeMap<EcoString, Token>,
    locals: BTreeMap<EcoString, Token>,
    sink: DiagnosticSink,
}

impl NameSpace {
    /// Builds the tables with the default C keyword list loaded.
    #[must_use]
    pub fn new(sink: DiagnosticSink) -> Self {
        let mut space = Self {
            keywords: BTreeMap::new(),
            globals: BTreeMap::new(),
            locals: BTreeMap::new(),
            sink,
        };
        space.keyword("auto", TokenType::Type, Modifier::None);
        space.keyword("break", TokenType::Reserved, Modifier::None);
        space.keyword("case", TokenType::Reserved, Modifier::None);
        space.keyword("char", TokenType::Type, Modifier::None);
        space.keyword("const", TokenType::Type, Modifier::None);
        space.keyword("continue", TokenType::Reserved, Modifier::None);
        space.keyword("default", TokenType::Reserved, Modifier::None);
        space.keyword("do", TokenType::Reserved, Modifier::None);
        space.keyword("double", TokenType::Type, Modifier::None);
        space.keyword("else", TokenType::Reserved, Modifier::None);
        space.keyword("enum", TokenType::Compound, Modifier::None);
        space.keyword("extern", TokenType::Type, Modifier::None);
        space.keyword("float", TokenType::Type, Modifier::None);
        space.keyword("for", TokenType::Control, Modifier::ThreeArg);
        space.keyword("goto", TokenType::Reserved, Modifier::None);
        space.keyword("if", TokenType::Control, Modifier::OneArg);
        space.keyword("int", TokenType::Type, Modifier::None);
        space.keyword("long", TokenType::Type, Modifier::None);
        space.keyword("register", TokenType::Type, Modifier::None);
        space.keyword("return", TokenType::Reserved, Modifier::None);
        space.keyword("short", TokenType::Type, Modifier::None);
        space.keyword("signed", TokenType::Type, Modifier::None);
        // Close enough: sizeof evaluates to a value.
        space.keyword("sizeof", TokenType::Literal, Modifier::None);
        space.keyword("static", TokenType::Static, Modifier::None);
        space.keyword("struct", TokenType::Compound, Modifier::None);
        space.keyword("switch", TokenType::Control, Modifier::OneArg);
        space.keyword("typedef", TokenType::Typedef, Modifier::None);
        space.keyword("union", TokenType::Compound, Modifier::None);
        space.keyword("unsigned", TokenType::Type, Modifier::None);
        space.keyword("void", TokenType::Type, Modifier::None);
        space.keyword("volatile", TokenType::Type, Modifier::None);
        space.keyword("while", TokenType::Control, Modifier::OneArg);
        space
    }

    fn keyword(&mut self, lexeme: &str, token_type: TokenType, modifier: Modifier) {
        self.keywords
            .insert(lexeme.into(), Token::keyword(lexeme, token_type, modifier));
    }

    fn report(&self, lead: &str, token: &Token, trail: &str) {
        self.sink.report(Diagnostic::token(lead, token, trail));
    }

    /// Clears the local names. Called when a function body ends.
    pub fn clear_local_names(&mut self) {
        trace!(count = self.locals.len(), "clearing local names");
        self.locals.clear();
    }

    /// Clears all user-defined names, diagnosing leftover defects.
    ///
    /// A static prototype without a matching function declaration in the
    /// same file is an error; any still in the table were never matched.
    pub fn clear_global_names(&mut self) {
        self.clear_local_names();
        for entry in self.globals.values() {
            if entry.token_type() == TokenType::FuncProto && entry.scope() == Scope::File {
                self.report("Static prototype of ", entry, " has no matching declaration");
            }
        }
        trace!(count = self.globals.len(), "clearing global names");
        self.globals.clear();
    }

    /// Refines a freshly lexed identifier against the tables.
    ///
    /// Keywords take their keyword meaning. Locally defined typedefs
    /// take the typedef meaning. Otherwise the global table decides what
    /// a potential function call would resolve to — local variables can
    /// shadow function names, but a shadowed name used as a call is
    /// still assumed to be a call, so scope data is fetched either way.
    pub fn classify(&self, token: &mut Token) {
        if let Some(keyword) = self.keywords.get(token.lexeme()) {
            token.adopt_meaning(keyword);
            return;
        }

        let mut local_var = false;
        if let Some(local) = self.locals.get(token.lexeme()) {
            if local.token_type() == TokenType::Type {
                token.adopt_meaning(local);
                return;
            }
            local_var = true;
        }

        match self.globals.get(token.lexeme()) {
            // Scope cannot be determined yet.
            None => token.set_scope(Scope::None),
            Some(global) if type_bearing(global) => {
                if !local_var {
                    token.adopt_meaning(global);
                }
                // Else the type is shadowed; leave the token alone.
            }
            Some(global) if var_bearing(global) => {
                // A variable; the parser sets scope from context.
            }
            Some(global) => {
                /* A potential function call. Static prototypes are
                overridden by the scope of the actual declaration, so
                calls cannot resolve against those yet. */
                if global.token_type() == TokenType::FuncProto && global.scope() == Scope::File {
                    token.set_scope(Scope::None);
                } else {
                    token.set_scope(global.scope());
                }
            }
        }
    }

    /// Returns `true` if the token is a keyword or a user-defined name
    /// with a non-variable role.
    #[must_use]
    pub fn is_keyword(&self, token: &Token) -> bool {
        // Names start as identifiers; anything else answers by type.
        if token.token_type() != TokenType::Identifier {
            return !matches!(
                token.token_type(),
                TokenType::None
                    | TokenType::VarName
                    | TokenType::OpenParen
                    | TokenType::CloseParen
                    | TokenType::OpenBrace
                    | TokenType::CloseBrace
                    | TokenType::Ampersand
                    | TokenType::FieldAccess
                    | TokenType::Semicolon
                    | TokenType::DeclSymbol
                    | TokenType::OtherSymbol
                    | TokenType::Eof
            );
        }
        for table in [&self.keywords, &self.globals, &self.locals] {
            if let Some(entry) = table.get(token.lexeme()) {
                if entry.token_type() != TokenType::VarName {
                    return true;
                }
            }
        }
        false
    }

    /// Returns `true` if the lexeme currently resolves to a function
    /// declaration. Used to tell a declaration that survived
    /// [`NameSpace::update`] from one the tables rejected.
    #[must_use]
    pub fn declared_function(&self, lexeme: &str) -> bool {
        self.globals
            .get(lexeme)
            .map_or(false, |entry| entry.token_type() == TokenType::FuncDecl)
    }

    /// Enters a parsed name into the tables, reporting any collision
    /// that can affect the results.
    pub fn update(&mut self, token: &Token) {
        let global = self.globals.get(token.lexeme()).cloned();
        let local = self.locals.get(token.lexeme()).cloned();

        if token.scope() == Scope::Local {
            self.update_local(token, global.as_ref(), local.as_ref());
        } else if var_bearing(token) {
            self.update_global_value(token, global.as_ref());
        } else {
            self.update_global_function(token, global.as_ref(), local.as_ref());
        }
    }

    /// A local-scope name: insert if new, or replace a prior local
    /// variable with a local typedef. Either way a collision with a
    /// non-variable global is a fresh shadow.
    fn update_local(&mut self, token: &Token, global: Option<&Token>, local: Option<&Token>) {
        let update = match local {
            None => true,
            Some(existing) => {
                existing.token_type() == TokenType::VarName
                    && token.token_type() == TokenType::Type
            }
        };
        if !update {
            return;
        }

        /* Shadowing a function by a type is worse than by a variable:
        it is much harder to check whether the type symbol was meant to
        be used as a function. The wording distinguishes the cases. */
        if let Some(outer) = global {
            if !var_bearing(outer) {
                if token.token_type() == TokenType::Type {
                    if outer.token_type() == TokenType::FuncTypedef {
                        self.report(
                            "Declaration of type ",
                            token,
                            " shadows function typedef with same name in outer scope",
                        );
                    } else {
                        self.report(
                            "Declaration of type ",
                            token,
                            " shadows function with same name in outer scope",
                        );
                    }
                } else if outer.token_type() == TokenType::FuncTypedef {
                    self.report(
                        "Local variable ",
                        token,
                        " shadows function typedef with same name in outer scope",
                    );
                } else {
                    self.report(
                        "Local variable ",
                        token,
                        " shadows function with same name in outer scope",
                    );
                }
            }
        }
        self.locals.insert(token.lexeme().clone(), token.clone());
    }

    /// A file/global scope variable or type declaration.
    fn update_global_value(&mut self, token: &Token, global: Option<&Token>) {
        match global {
            None => {
                self.globals.insert(token.lexeme().clone(), token.clone());
            }
            Some(existing) if !var_bearing(existing) => {
                // Collision of a value name with a function name.
                if existing.token_type() == TokenType::FuncTypedef {
                    if token.token_type() == TokenType::VarName {
                        self.report(
                            "Variable ",
                            token,
                            " uses name previously used as typedef for function",
                        );
                    } else {
                        self.report(
                            "Type declaration ",
                            token,
                            " uses name previously used as typedef for function",
                        );
                    }
                } else if token.token_type() == TokenType::VarName {
                    self.report("Variable ", token, " uses name previously used as a function");
                } else {
                    self.report(
                        "Type declaration ",
                        token,
                        " uses name previously used as a function",
                    );
                }
            }
            Some(existing) => {
                // When a variable collides with a typedef, the typedef wins.
                if existing.token_type() == TokenType::VarName
                    && token.token_type() == TokenType::Type
                {
                    self.globals.insert(token.lexeme().clone(), token.clone());
                }
            }
        }
    }

    /// A function call, prototype, declaration or function typedef.
    fn update_global_function(
        &mut self,
        token: &Token,
        global: Option<&Token>,
        local: Option<&Token>,
    ) {
        if let Some(shadowing) = local {
            /* With either an undeclared call or a type ignored due to a
            shadow, assume the conflict is a misuse of the local symbol.
            Otherwise the collision is a new shadow. */
            let global_is_type = global.is_some_and(type_bearing);
            let undeclared_call = token.token_type() == TokenType::FuncCall
                && global.map_or(true, var_bearing);
            if global_is_type || undeclared_call {
                if token.token_type() == TokenType::FuncTypedef {
                    self.report(
                        "Typedef for function ",
                        token,
                        " uses name previously used as a local variable",
                    );
                } else {
                    self.report(
                        "Function ",
                        token,
                        " uses name previously used as a local variable",
                    );
                }
            } else if global.map_or(true, var_bearing) {
                if shadowing.token_type() == TokenType::Type {
                    if token.token_type() == TokenType::FuncTypedef {
                        self.report(
                            "Declaration of type ",
                            token,
                            " shadows function typedef with same name in outer scope",
                        );
                    } else {
                        self.report(
                            "Declaration of type ",
                            token,
                            " shadows function with same name in outer scope",
                        );
                    }
                } else if token.token_type() == TokenType::FuncTypedef {
                    self.report(
                        "Local variable ",
                        shadowing,
                        " shadows function typedef with same name in outer scope",
                    );
                } else {
                    self.report(
                        "Local variable ",
                        shadowing,
                        " shadows function with same name in outer scope",
                    );
                }
            }
        }

        if token.token_type() == TokenType::FuncCall {
            self.update_function_call(token, global, local);
            return;
        }

        // A prototype, declaration or function typedef.
        let Some(existing) = global else {
            self.globals.insert(token.lexeme().clone(), token.clone());
            return;
        };

        if type_bearing(existing) {
            /* Colliding with a typedef means a local variable that
            shadowed the typedef was redefined as a function, which puts
            the declaration in local scope — almost certainly an error.
            Lose the declaration. */
            if local.is_none() {
                // With a local, the shadow was reported above.
                if token.token_type() == TokenType::FuncTypedef {
                    if existing.token_type() == TokenType::FuncTypedef {
                        self.report("Duplicate declaration of function typedef ", token, "");
                    } else {
                        self.report(
                            "Type declaration ",
                            existing,
                            " uses name previously used as typedef for function",
                        );
                    }
                } else {
                    self.report(
                        "Type declaration ",
                        existing,
                        " uses name previously used as a function",
                    );
                }
            }
        } else if var_bearing(existing) {
            // A function colliding with a variable: the function wins.
            if token.token_type() == TokenType::FuncTypedef {
                self.report(
                    "Variable ",
                    existing,
                    " uses name previously used as typedef for function",
                );
            } else {
                self.report(
                    "Variable ",
                    existing,
                    " uses name previously used as a function",
                );
            }
            self.globals.insert(token.lexeme().clone(), token.clone());
        } else if token.token_type() == TokenType::FuncTypedef {
            // A function typedef loses to an existing declaration.
            self.report(
                "Type declaration ",
                token,
                " uses name previously used as a function",
            );
        } else if existing.token_type() == TokenType::FuncCall {
            // The declaration for a previously undeclared call.
            self.globals.insert(token.lexeme().clone(), token.clone());
        } else if token.token_type() == TokenType::FuncProto {
            if existing.token_type() == TokenType::FuncProto {
                /* When scope narrows, calls already resolved may carry
                the wrong scope; warn about it. */
                if token.scope() == Scope::File && existing.scope() == Scope::Global {
                    self.report(
                        "Static function ",
                        token,
                        " occurs after global prototype in same file",
                    );
                    self.globals.insert(token.lexeme().clone(), token.clone());
                } else {
                    self.report("Duplicate prototype of ", token, "");
                }
            } else {
                self.report("Prototype for ", token, " occurs after declaration");
            }
        } else if existing.token_type() == TokenType::FuncProto {
            // A declaration arriving after its prototype.
            if token.scope() == Scope::File && existing.scope() == Scope::Global {
                self.report(
                    "Static function ",
                    token,
                    " occurs after global prototype in same file",
                );
            }
            self.globals.insert(token.lexeme().clone(), token.clone());
        } else if token.scope() == existing.scope() {
            self.report("Duplicate declaration of ", token, "");
        } else {
            self.report(
                "Duplicate declaration of ",
                token,
                ", with different scope. File scope assumed",
            );
            // Assume file scope is the one calls in this file want.
            if existing.scope() == Scope::Global {
                self.globals.insert(token.lexeme().clone(), token.clone());
            }
        }
    }

    /// A function call entering the tables.
    fn update_function_call(&mut self, token: &Token, global: Option<&Token>, local: Option<&Token>) {
        if let Some(existing) = global {
            if type_bearing(existing) {
                /* The call collides with a type: ignore the call, and
                complain about the type unless a local shadow already
                explains the conflict. */
                if local.is_none() {
                    self.report(
                        "Type declaration ",
                        existing,
                        " uses name previously used as a function",
                    );
                }
                return;
            }
            if matches!(
                existing.token_type(),
                TokenType::FuncProto | TokenType::FuncDecl
            ) {
                return;
            }
        }

        // No prototype or declaration in sight: an undeclared call.
        self.report("Function call ", token, " has no prototype");
        match global {
            None => {
                self.globals.insert(token.lexeme().clone(), token.clone());
            }
            Some(existing) if existing.token_type() != TokenType::FuncCall => {
                // Complain only if the symbol was not shadowed.
                if local.is_none() {
                    self.report(
                        "Variable ",
                        existing,
                        " uses name previously used as a function",
                    );
                }
                self.globals.insert(token.lexeme().clone(), token.clone());
            }
            Some(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::FilePosition;

    fn space() -> (NameSpace, DiagnosticSink) {
        let sink = DiagnosticSink::new();
        (NameSpace::new(sink.clone()), sink)
    }

    fn token(lexeme: &str, token_type: TokenType, scope: Scope) -> Token {
        let mut token = Token::new(lexeme, FilePosition::new("t.c", 1), token_type);
        token.set_scope(scope);
        token
    }

    fn messages(sink: &DiagnosticSink) -> Vec<String> {
        sink.drain().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn classify_adopts_keyword_meaning() {
        let (space, _sink) = space();
        let mut candidate = Token::new("for", FilePosition::new("t.c", 1), TokenType::Identifier);
        space.classify(&mut candidate);
        assert_eq!(candidate.token_type(), TokenType::Control);
        assert_eq!(candidate.scope(), Scope::Keyword);
        assert_eq!(candidate.modifier(), Modifier::ThreeArg);
    }

    #[test]
    fn classify_unknown_name_defers_scope() {
        let (space, _sink) = space();
        let mut candidate = Token::new("mystery", FilePosition::new("t.c", 1), TokenType::Identifier);
        candidate.set_scope(Scope::Global);
        space.classify(&mut candidate);
        assert_eq!(candidate.token_type(), TokenType::Identifier);
        assert_eq!(candidate.scope(), Scope::None);
    }

    #[test]
    fn classify_resolves_against_declaration() {
        let (mut space, _sink) = space();
        space.update(&token("f", TokenType::FuncDecl, Scope::Global));

        let mut candidate = Token::new("f", FilePosition::new("t.c", 5), TokenType::Identifier);
        space.classify(&mut candidate);
        assert_eq!(candidate.scope(), Scope::Global);
        // Type stays identifier; the parser decides call vs variable.
        assert_eq!(candidate.token_type(), TokenType::Identifier);
    }

    #[test]
    fn classify_does_not_resolve_against_static_prototype() {
        let (mut space, _sink) = space();
        space.update(&token("h", TokenType::FuncProto, Scope::File));

        let mut candidate = Token::new("h", FilePosition::new("t.c", 5), TokenType::Identifier);
        candidate.set_scope(Scope::Global);
        space.classify(&mut candidate);
        // The declaration may override the prototype's scope later.
        assert_eq!(candidate.scope(), Scope::None);
    }

    #[test]
    fn classify_skips_shadowed_typedef() {
        let (mut space, _sink) = space();
        space.update(&token("t", TokenType::Type, Scope::Global));
        space.update(&token("t", TokenType::VarName, Scope::Local));

        let mut candidate = Token::new("t", FilePosition::new("t.c", 9), TokenType::Identifier);
        space.classify(&mut candidate);
        // Shadowed: the typedef meaning is not adopted.
        assert_eq!(candidate.token_type(), TokenType::Identifier);
    }

    #[test]
    fn is_keyword_spots_reserved_and_defined_names() {
        let (mut space, _sink) = space();
        assert!(space.is_keyword(&Token::new(
            "while",
            FilePosition::default(),
            TokenType::Identifier
        )));

        space.update(&token("f", TokenType::FuncDecl, Scope::Global));
        assert!(space.is_keyword(&Token::new(
            "f",
            FilePosition::default(),
            TokenType::Identifier
        )));

        space.update(&token("v", TokenType::VarName, Scope::Global));
        assert!(!space.is_keyword(&Token::new(
            "v",
            FilePosition::default(),
            TokenType::Identifier
        )));
    }

    #[test]
    fn undeclared_call_reports_missing_prototype() {
        let (mut space, sink) = space();
        let mut call = token("f", TokenType::FuncCall, Scope::None);
        call.set_scope(Scope::None);
        space.update(&call);
        let reported = messages(&sink);
        assert_eq!(reported.len(), 1);
        assert!(reported[0].contains("Function call f found line 1 of file t.c has no prototype"));
    }

    #[test]
    fn call_with_prototype_is_quiet() {
        let (mut space, sink) = space();
        space.update(&token("f", TokenType::FuncProto, Scope::Global));
        space.update(&token("f", TokenType::FuncCall, Scope::Global));
        assert!(messages(&sink).is_empty());
    }

    #[test]
    fn variable_then_function_reports_and_function_wins() {
        let (mut space, sink) = space();
        space.update(&token("x", TokenType::VarName, Scope::File));
        space.update(&token("x", TokenType::FuncProto, Scope::Global));

        let reported = messages(&sink);
        assert_eq!(reported.len(), 1);
        assert!(reported[0].contains("Variable x"));
        assert!(reported[0].contains("previously used as a function"));

        // The function replaced the variable: a later call resolves.
        space.update(&token("x", TokenType::FuncCall, Scope::Global));
        assert!(messages(&sink).is_empty());
    }

    #[test]
    fn local_shadow_of_function_reports() {
        let (mut space, sink) = space();
        space.update(&token("f", TokenType::FuncDecl, Scope::Global));
        space.update(&token("f", TokenType::VarName, Scope::Local));

        let reported = messages(&sink);
        assert_eq!(reported.len(), 1);
        assert!(reported[0].contains("Local variable f"));
        assert!(reported[0].contains("shadows function with same name in outer scope"));
    }

    #[test]
    fn duplicate_prototype_reports() {
        let (mut space, sink) = space();
        space.update(&token("f", TokenType::FuncProto, Scope::Global));
        space.update(&token("f", TokenType::FuncProto, Scope::Global));
        let reported = messages(&sink);
        assert_eq!(reported.len(), 1);
        assert!(reported[0].contains("Duplicate prototype of f"));
    }

    #[test]
    fn static_prototype_narrows_global_prototype() {
        let (mut space, sink) = space();
        space.update(&token("f", TokenType::FuncProto, Scope::Global));
        space.update(&token("f", TokenType::FuncProto, Scope::File));
        let reported = messages(&sink);
        assert_eq!(reported.len(), 1);
        assert!(reported[0].contains("Static function f"));
        assert!(reported[0].contains("occurs after global prototype in same file"));

        // The table kept the narrowed entry: EOF now flags it unmatched.
        space.clear_global_names();
        let leftover = messages(&sink);
        assert_eq!(leftover.len(), 1);
        assert!(leftover[0].contains("Static prototype of f"));
    }

    #[test]
    fn prototype_after_declaration_reports() {
        let (mut space, sink) = space();
        space.update(&token("f", TokenType::FuncDecl, Scope::Global));
        space.update(&token("f", TokenType::FuncProto, Scope::Global));
        let reported = messages(&sink);
        assert_eq!(reported.len(), 1);
        assert!(reported[0].contains("Prototype for f"));
        assert!(reported[0].contains("occurs after declaration"));
    }

    #[test]
    fn duplicate_declaration_reports() {
        let (mut space, sink) = space();
        space.update(&token("f", TokenType::FuncDecl, Scope::Global));
        space.update(&token("f", TokenType::FuncDecl, Scope::Global));
        let reported = messages(&sink);
        assert_eq!(reported.len(), 1);
        assert!(reported[0].contains("Duplicate declaration of f"));
    }

    #[test]
    fn declaration_resolves_pending_call() {
        let (mut space, sink) = space();
        let call = token("f", TokenType::FuncCall, Scope::None);
        space.update(&call); // reports missing prototype
        space.update(&token("f", TokenType::FuncDecl, Scope::Global));
        let reported = messages(&sink);
        // Only the original missing-prototype report; the declaration
        // silently replaces the pending call.
        assert_eq!(reported.len(), 1);
        assert!(reported[0].contains("has no prototype"));
    }

    #[test]
    fn static_prototype_without_declaration_reports_at_clear() {
        let (mut space, sink) = space();
        space.update(&token("h", TokenType::FuncProto, Scope::File));
        assert!(messages(&sink).is_empty());
        space.clear_global_names();
        let reported = messages(&sink);
        assert_eq!(reported.len(), 1);
        assert!(reported[0]
            .contains("Static prototype of h found line 1 of file t.c has no matching declaration"));
    }

    #[test]
    fn matched_static_prototype_is_quiet_at_clear() {
        let (mut space, sink) = space();
        space.update(&token("h", TokenType::FuncProto, Scope::File));
        space.update(&token("h", TokenType::FuncDecl, Scope::File));
        space.clear_global_names();
        assert!(messages(&sink).is_empty());
    }

    #[test]
    fn clear_local_names_empties_local_table_only() {
        let (mut space, _sink) = space();
        space.update(&token("g", TokenType::FuncDecl, Scope::Global));
        space.update(&token("v", TokenType::VarName, Scope::Local));
        space.clear_local_names();

        let mut candidate = Token::new("g", FilePosition::new("t.c", 9), TokenType::Identifier);
        space.classify(&mut candidate);
        assert_eq!(candidate.scope(), Scope::Global);

        let mut gone = Token::new("v", FilePosition::new("t.c", 9), TokenType::Identifier);
        gone.set_scope(Scope::Local);
        space.classify(&mut gone);
        assert_eq!(gone.scope(), Scope::None);
    }
}
