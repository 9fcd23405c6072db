// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Statement-level parsing: turning tokens into function tokens.
//!
//! This is a deliberately simplified C parser built to find function
//! declarations and calls, nothing more. It reads the program as a
//! series of statements of four kinds: declarations, control
//! statements, expressions, and typedefs (a flavour of declaration).
//! Control statements announce themselves with control keywords;
//! declarations start with a type-declaring token; everything else is
//! an expression.
//!
//! Within a statement, an unknown identifier followed by an open
//! parenthesis is a function. If it is the first identifier of a
//! declaration it declares the function; otherwise it calls it.
//!
//! Error handling in a bottom-up parser is guesswork, so the guesses
//! are biased toward reporting a function call — reporting an extra
//! call beats suppressing a genuine one — and a warning is produced
//! whenever a guess can affect the results. The working assumptions:
//!
//! 1. Open braces, semicolons (outside control statements and compound
//!    type declarations) and control tokens start a new statement.
//! 2. In a declaration, a second identifier or a literal starts the
//!    initial value; the remainder is an expression.
//! 3. In expressions, type symbols are casts.
//! 4. Compound type declarations run to their matching close brace; a
//!    token that cannot appear in one aborts the declaration at the
//!    preceding separator.
//! 5. Function argument lists are tracked by counting parentheses.
//! 6. Control statements are expressions that finish after the right
//!    number of semicolons.
//!
//! Every new name goes into the symbol tables; the tables handle
//! collisions.

use std::io::BufRead;

use tracing::debug;

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::IndexError;
use crate::semantic_analysis::NameSpace;
use crate::source_analysis::{Modifier, Scope, Token, TokenStream, TokenType};

/// The kind of statement being processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatementKind {
    Undetermined,
    Declaration,
    Expression,
    Control,
}

/// Pops the stack down to the first token of the wanted type and
/// returns it, or the none-token if no such token exists.
fn pop_till_type(stack: &mut Vec<Token>, want: TokenType) -> Token {
    while stack.last().map_or(false, |token| token.token_type() != want) {
        stack.pop();
    }
    stack.pop().unwrap_or_default()
}

/// Returns `true` if a token of the wanted type is on the stack.
fn has_type(stack: &[Token], want: TokenType) -> bool {
    stack.iter().any(|token| token.token_type() == want)
}

/// Finds function declarations, prototypes and calls in one file.
///
/// A pull source with one token of read-ahead: [`Parser::next_function`]
/// returns the previously found function token and searches for the
/// next, so [`Parser::eof`] is exact.
#[derive(Debug)]
pub struct Parser {
    buffer: TokenStream,
    symbols: NameSpace,
    parse_stack: Vec<Token>,
    /// Reload the input before parsing; cleared to reprocess a token.
    read_next: bool,
    curr_token: Token,
    /// The most recently found function token.
    funct_token: Token,
    statement: StatementKind,
    /// Count of unmatched open braces; zero means file scope.
    brace_count: i32,
    /// End-of-file table teardown has run.
    finalized: bool,
    sink: DiagnosticSink,
}

impl Parser {
    /// Opens a parser over the named file and primes the read-ahead.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::NoSuchFile`] if the file cannot be opened.
    pub fn open(file_name: &str, sink: DiagnosticSink) -> Result<Self, IndexError> {
        Ok(Self::build(TokenStream::open(file_name, sink.clone())?, sink))
    }

    /// Builds a parser over an arbitrary reader.
    pub fn from_reader(
        file_name: &str,
        reader: impl BufRead + 'static,
        sink: DiagnosticSink,
    ) -> Self {
        Self::build(TokenStream::from_reader(file_name, reader, sink.clone()), sink)
    }

    fn build(buffer: TokenStream, sink: DiagnosticSink) -> Self {
        let mut parser = Self {
            buffer,
            symbols: NameSpace::new(sink.clone()),
            parse_stack: Vec::new(),
            read_next: true,
            curr_token: Token::default(),
            funct_token: Token::default(),
            statement: StatementKind::Undetermined,
            brace_count: 0,
            finalized: false,
            sink,
        };
        parser.find_next_function();
        parser
    }

    /// Returns the next function token in the file.
    ///
    /// Implemented as a look-ahead: the cached token is returned and the
    /// following one is searched for, so the end of input is known
    /// exactly.
    pub fn next_function(&mut self) -> Token {
        let result = self.funct_token.clone();
        self.find_next_function();
        result
    }

    /// Returns `true` once no more function tokens exist to return.
    #[must_use]
    pub fn eof(&self) -> bool {
        self.buffer.eof() && self.funct_token.is_none()
    }

    fn report(&self, lead: &str, token: &Token, trail: &str) {
        self.sink.report(Diagnostic::token(lead, token, trail));
    }

    /// Completes processing of a statement.
    ///
    /// Function calls still on the stack never found the end of their
    /// argument list.
    fn new_statement(&mut self) {
        while !self.parse_stack.is_empty() {
            let token = pop_till_type(&mut self.parse_stack, TokenType::FuncCall);
            if !token.is_none() {
                self.report("Call of function ", &token, " is incomplete");
            }
        }
        self.statement = StatementKind::Undetermined;
    }

    /// Scans forward until a function declaration or call is found,
    /// caching it in `funct_token`.
    fn find_next_function(&mut self) {
        // Count of consecutive open parentheses just seen.
        let mut con_paren_count: i32 = 0;

        self.funct_token = Token::default();
        while self.funct_token.is_none() && !self.buffer.eof() {
            if self.read_next {
                self.curr_token = self.buffer.next_token();
            } else {
                self.read_next = true;
                self.buffer.lookahead_reset();
            }

            if self.curr_token.token_type() == TokenType::Identifier {
                self.symbols.classify(&mut self.curr_token);
            }
            if self.curr_token.token_type() == TokenType::Compound {
                self.proc_comb_type();
            }

            match self.curr_token.token_type() {
                TokenType::Ampersand => {
                    // Address-of only at the start of a value; anything
                    // else is bitwise AND or an error, and is ignored.
                    let reference_position = self
                        .parse_stack
                        .last()
                        .map_or(true, |top| top.token_type() == TokenType::OpenParen);
                    if reference_position {
                        self.parse_stack.push(self.curr_token.clone());
                    }
                }

                TokenType::FieldAccess => {
                    if self.statement == StatementKind::Expression {
                        // A leading ampersand means the struct name was
                        // left out; drop it.
                        if self
                            .parse_stack
                            .last()
                            .map_or(false, |top| top.token_type() == TokenType::Ampersand)
                        {
                            self.parse_stack.pop();
                        }
                        self.parse_stack.push(self.curr_token.clone());
                    }
                    // Else the symbol is in error; ignore it.
                }

                TokenType::Semicolon => {
                    /* Either a new statement, or one part of a control
                    statement with multiple parts is done. The stack is
                    cleared before a control token is pushed, so it sits
                    at the bottom. */
                    let control = if self.statement == StatementKind::Control {
                        self.parse_stack.first().cloned().unwrap_or_default()
                    } else {
                        Token::default()
                    };
                    self.new_statement();
                    if control.token_type() == TokenType::Control
                        && control.modifier() != Modifier::OneArg
                    {
                        self.statement = StatementKind::Control;
                        let mut control = control;
                        if control.modifier() == Modifier::TwoArg {
                            control.set_modifier(Modifier::OneArg);
                        } else {
                            control.set_modifier(Modifier::TwoArg);
                        }
                        let position = control.location().clone();
                        self.parse_stack.push(control);
                        // Replace the paren the reset just popped.
                        self.parse_stack
                            .push(Token::new("(", position, TokenType::OpenParen));
                    }
                }

                TokenType::OpenBrace => {
                    self.brace_count += 1;
                    self.new_statement();
                }

                TokenType::CloseBrace => {
                    if self.brace_count == 1 {
                        // Passing from local back to file scope.
                        self.symbols.clear_local_names();
                    }
                    if self.brace_count > 0 {
                        self.brace_count -= 1;
                    }
                    self.new_statement();
                }

                TokenType::OpenParen => {
                    // Only expressions start with a parenthesis.
                    if self.statement == StatementKind::Undetermined
                        && self.parse_stack.is_empty()
                    {
                        self.statement = StatementKind::Expression;
                    }
                    // Declarations only count parens, they never match them.
                    if self.statement != StatementKind::Declaration {
                        self.parse_stack.push(self.curr_token.clone());
                    }
                    con_paren_count += 1;
                }

                TokenType::CloseParen => {
                    if self.statement != StatementKind::Declaration {
                        pop_till_type(&mut self.parse_stack, TokenType::OpenParen);
                        // An argument list just finished completes its call.
                        if self
                            .parse_stack
                            .last()
                            .map_or(false, |top| top.token_type() == TokenType::FuncCall)
                        {
                            self.parse_stack.pop();
                        }
                        // A control token on top means its statement is done.
                        if self
                            .parse_stack
                            .last()
                            .map_or(false, |top| top.token_type() == TokenType::Control)
                        {
                            self.statement = StatementKind::Undetermined;
                            self.parse_stack.pop();
                        }
                        if self.parse_stack.last().map_or(false, |top| {
                            matches!(
                                top.token_type(),
                                TokenType::Ampersand | TokenType::FuncCall
                            )
                        }) {
                            self.parse_stack.pop();
                        }
                    }
                }

                TokenType::DeclSymbol | TokenType::OtherSymbol => {
                    // In a declaration, assume a stray symbol was
                    // inserted accidentally.
                }

                TokenType::Literal => {
                    if self.statement == StatementKind::Undetermined {
                        self.statement = StatementKind::Expression;
                    }
                }

                TokenType::Identifier => self.proc_identifier(&mut con_paren_count),

                TokenType::Typedef | TokenType::Static => {
                    if self.statement == StatementKind::Undetermined {
                        self.statement = StatementKind::Declaration;
                    }
                    if self.statement == StatementKind::Declaration {
                        self.parse_stack.push(self.curr_token.clone());
                    }
                }

                TokenType::Type => {
                    if self.statement == StatementKind::Undetermined {
                        self.statement = StatementKind::Declaration;
                    }
                    /* A user-defined type name in function-declaration
                    shape is a name clash in the making: run it through
                    the declaration path so the tables can judge it. */
                    if self.statement == StatementKind::Declaration
                        && self.curr_token.scope() != Scope::Keyword
                    {
                        self.buffer.lookahead_reset();
                        if self.buffer.lookahead_next().token_type() == TokenType::OpenParen {
                            self.proc_declaration();
                        } else {
                            self.buffer.lookahead_reset();
                        }
                    }
                }

                TokenType::FuncTypedef => self.proc_funct_typedef_use(&mut con_paren_count),

                TokenType::Control => {
                    self.new_statement();
                    self.statement = StatementKind::Control;
                    let position = self.curr_token.location().clone();
                    self.parse_stack.push(self.curr_token.clone());
                    // A missing parenthesis after the keyword is assumed
                    // to have been left out.
                    if self.buffer.lookahead_next().token_type() != TokenType::OpenParen {
                        self.parse_stack
                            .push(Token::new("(", position, TokenType::OpenParen));
                    }
                }

                TokenType::Reserved => self.new_statement(),

                _ => {
                    // Ignore anything else.
                }
            }

            // The last token may have been read finding this function.
            if self.buffer.eof() {
                self.new_statement();
            }
            if self.curr_token.token_type() != TokenType::OpenParen {
                con_paren_count = 0;
            }
        }

        if self.buffer.eof() && !self.finalized {
            self.finalized = true;
            debug!("input exhausted, checking leftover names");
            self.symbols.clear_global_names();
        }
    }

    /// Handles an identifier outside the declaration path: a variable
    /// use or a function call.
    fn proc_identifier(&mut self, con_paren_count: &mut i32) {
        // Burn matching parentheses wrapped around the identifier.
        while self.buffer.lookahead_next().token_type() == TokenType::CloseParen
            && *con_paren_count > 0
        {
            let _ = self.buffer.next_token();
            *con_paren_count -= 1;
            if self.statement != StatementKind::Declaration {
                self.parse_stack.pop();
            }
        }

        if self.statement == StatementKind::Declaration {
            self.proc_declaration();
            return;
        }

        if self.buffer.lookahead_last().token_type() == TokenType::OpenParen {
            // A function call. Scope was set by the table lookup.
            self.curr_token.set_type(TokenType::FuncCall);

            // A leading ampersand takes a reference instead of calling.
            if self
                .parse_stack
                .last()
                .map_or(false, |top| top.token_type() == TokenType::Ampersand)
            {
                self.curr_token.set_modifier(Modifier::FuncRef);
            }
            if self
                .parse_stack
                .last()
                .map_or(false, |top| top.token_type() == TokenType::FieldAccess)
            {
                self.report(
                    "Function call ",
                    &self.curr_token,
                    " is an element of a structured type",
                );
            }
        } else {
            self.curr_token.set_type(TokenType::VarName);
            self.curr_token.set_scope(if self.brace_count > 0 {
                Scope::Local
            } else {
                Scope::File
            });
        }

        self.symbols.update(&self.curr_token);

        if self.parse_stack.last().map_or(false, |top| {
            matches!(
                top.token_type(),
                TokenType::FieldAccess | TokenType::Ampersand
            )
        }) {
            self.parse_stack.pop();
        }
        if self.statement == StatementKind::Undetermined {
            self.statement = StatementKind::Expression;
        }

        if self.curr_token.token_type() == TokenType::FuncCall {
            // The call goes on the stack so its arguments are parsed;
            // its parenthesis goes with it, outside the consecutive
            // parenthesis count.
            self.parse_stack.push(self.curr_token.clone());
            let paren = self.buffer.next_token();
            self.parse_stack.push(paren);
            self.funct_token = self.curr_token.clone();
        }
    }

    /// Handles a use of a typedef naming a function type.
    ///
    /// The next token, ignoring wrapping parentheses, must be an
    /// identifier. Followed by a body it defines that function;
    /// otherwise it declares a variable of the function type.
    fn proc_funct_typedef_use(&mut self, con_paren_count: &mut i32) {
        *con_paren_count = 0;
        while self.buffer.lookahead_next().token_type() == TokenType::OpenParen {
            *con_paren_count += 1;
        }
        let mut name = self.buffer.lookahead_last();
        if name.token_type() == TokenType::Identifier {
            self.symbols.classify(&mut name);
        }
        if name.token_type() != TokenType::Identifier {
            return;
        }
        // Each opening paren needs its closing partner.
        while self.buffer.lookahead_next().token_type() == TokenType::CloseParen
            && *con_paren_count > 0
        {
            *con_paren_count -= 1;
        }
        if *con_paren_count > 0 {
            return;
        }

        // Consume for real: parens, the name, and the closing parens.
        *con_paren_count = 0;
        self.curr_token = self.buffer.next_token();
        while self.curr_token.token_type() == TokenType::OpenParen {
            *con_paren_count += 1;
            self.curr_token = self.buffer.next_token();
        }
        while *con_paren_count > 0 {
            let _ = self.buffer.next_token();
            *con_paren_count -= 1;
        }

        let next = self.buffer.lookahead_next();
        if next.token_type() == TokenType::OpenBrace {
            // A function defined through the typedef.
            let mut decl_token = self.curr_token.clone();
            self.proc_funct_declaration(&mut decl_token, &next, false);
            self.curr_token = decl_token;
        } else {
            // A variable of the function type.
            let mut decl_token = self.curr_token.clone();
            decl_token.set_type(TokenType::VarName);
            decl_token.set_scope(if self.brace_count > 0 {
                Scope::Local
            } else {
                Scope::File
            });
            self.symbols.update(&decl_token);
        }
    }

    /// Handles a compound type keyword: `struct`, `union`, `enum`.
    ///
    /// The lookahead decides whether this declares a compound (tag plus
    /// open brace, or a bare open brace) or merely uses one as a type.
    /// A declaration is burned through its matching close brace,
    /// counting nested compounds; a token that cannot appear inside one
    /// aborts the declaration at the preceding separator, converting a
    /// terminating close brace to a semicolon so scope accounting holds.
    fn proc_comb_type(&mut self) {
        let mut next = self.buffer.lookahead_next();
        let next2 = self.buffer.lookahead_next();

        let used_as_type = (next.token_type() != TokenType::Identifier
            && next.token_type() != TokenType::OpenBrace)
            || (next.token_type() == TokenType::Identifier
                && next2.token_type() != TokenType::OpenBrace)
            || self.statement == StatementKind::Expression
            || self.statement == StatementKind::Control;

        if used_as_type {
            // Used as a type. A missing tag is assumed forgotten.
            if next.token_type() == TokenType::Identifier {
                let _ = self.buffer.next_token(); // burn the tag
            }
            self.curr_token.set_type(TokenType::Type);
            return;
        }

        /* A declaration. Burn it while its tokens stay legal; if an
        illegal token shows up, assume the statement really started at
        the most recent separator (that matters most for functions,
        which need the preceding type tokens). Compounds nest, so the
        brace pairs are counted. */
        let mut read_next;
        if next.token_type() == TokenType::Identifier {
            // The tag names a new type.
            let mut tag = next.clone();
            tag.set_type(TokenType::Type);
            tag.set_scope(if self.brace_count > 0 {
                Scope::Local
            } else {
                Scope::File
            });
            self.symbols.update(&tag);
            next = next2;
            read_next = true;
        } else {
            read_next = false;
        }

        let mut brace_count = 1;
        let mut paren_count = 0;
        while self.curr_token.token_type() == TokenType::Compound {
            while !matches!(
                next.token_type(),
                TokenType::CloseBrace
                    | TokenType::Semicolon
                    | TokenType::FuncCall
                    | TokenType::Control
                    | TokenType::Reserved
                    | TokenType::Eof
            ) {
                if read_next {
                    next = self.buffer.lookahead_next();
                } else {
                    next = self.buffer.lookahead_last();
                }
                read_next = true;

                if next.token_type() == TokenType::Identifier {
                    self.symbols.classify(&mut next);
                }

                if next.token_type() == TokenType::Compound {
                    let mut inner = self.buffer.lookahead_next();
                    if inner.token_type() == TokenType::Identifier {
                        inner = self.buffer.lookahead_next();
                    }
                    if inner.token_type() == TokenType::OpenBrace {
                        // An inner compound declaration.
                        next = inner;
                        brace_count += 1;
                    } else {
                        next.set_type(TokenType::Type);
                        // Not part of the declaration; reprocess it.
                        read_next = false;
                    }
                } else if next.token_type() == TokenType::Identifier {
                    /* An identifier followed by an open paren, once any
                    wrapping parens are matched up, is a function call —
                    which cannot appear here. */
                    while self.buffer.lookahead_next().token_type() == TokenType::CloseParen
                        && paren_count > 0
                    {
                        paren_count -= 1;
                    }
                    if self.buffer.lookahead_last().token_type() == TokenType::OpenParen {
                        next.set_type(TokenType::FuncCall);
                    }
                    read_next = false;
                }

                /* Consecutive parenthesis runs are counted after
                identifier handling, which consumes the count. */
                if next.token_type() == TokenType::OpenParen {
                    paren_count += 1;
                } else {
                    paren_count = 0;
                }
            }

            if matches!(
                next.token_type(),
                TokenType::CloseBrace | TokenType::Semicolon
            ) {
                // Legal so far: burn the looked-at tokens for real.
                let _ = self.buffer.next_token();
                loop {
                    let peek = self.buffer.lookahead_next();
                    if matches!(
                        peek.token_type(),
                        TokenType::Semicolon | TokenType::CloseBrace | TokenType::Eof
                    ) {
                        break;
                    }
                    let _ = self.buffer.next_token();
                }
                if next.token_type() == TokenType::CloseBrace {
                    brace_count -= 1;
                    if brace_count <= 0 {
                        // The declaration is complete.
                        let _ = self.buffer.next_token();
                        self.curr_token.set_type(TokenType::Type);
                    }
                }
                // The burn invalidated the lookahead.
                next = Token::default();
            } else {
                // Early termination: the statement is dropped.
                self.report(
                    "Declaration of compound type ",
                    &self.curr_token,
                    " is incomplete",
                );
                self.curr_token = self.buffer.next_token();
                /* A close brace here really ends a complete inner
                declaration; count it as a semicolon so brace-based
                scope tracking is not thrown off. */
                if self.curr_token.token_type() == TokenType::CloseBrace {
                    self.curr_token.set_type(TokenType::Semicolon);
                }
            }
        }
    }

    /// Parses the body of a declaration statement.
    ///
    /// Entered with `curr_token` on the declared name and the lookahead
    /// on the following token: an open paren means the function form,
    /// anything else the variable form.
    fn proc_declaration(&mut self) {
        let mut decl_token = self.curr_token.clone();
        let mut var_names: Vec<Token> = Vec::new();
        let have_function;
        let mut inside_params;
        let mut paren_count: i32;

        if self.buffer.lookahead_last().token_type() == TokenType::OpenParen {
            have_function = true;
            inside_params = true;
            paren_count = 1;
            // Burn the paren so it is not confused with the arguments.
            let _ = self.buffer.next_token();
        } else {
            have_function = false;
            inside_params = false;
            paren_count = 0;
        }

        let mut cons_paren_count: i32 = 0;
        while self.statement == StatementKind::Declaration {
            self.curr_token = self.buffer.next_token();
            if self.curr_token.token_type() == TokenType::Identifier {
                self.symbols.classify(&mut self.curr_token);
            }
            if self.curr_token.token_type() == TokenType::Compound {
                self.proc_comb_type();
            }
            match self.curr_token.token_type() {
                TokenType::Identifier => {
                    // Burn parentheses wrapped around the identifier.
                    while self.buffer.lookahead_next().token_type() == TokenType::CloseParen
                        && cons_paren_count > 0
                    {
                        let _ = self.buffer.next_token();
                        cons_paren_count -= 1;
                    }
                    if self.buffer.lookahead_last().token_type() == TokenType::OpenParen {
                        /* A call: it terminates a function declaration
                        and starts the initial value of a variable
                        declaration. */
                        self.statement = StatementKind::Expression;
                    } else {
                        /* A name. For functions this is a parameter; for
                        variables, several can share one declaration.
                        K&R parameter declarations sit outside the
                        parentheses and carry their own semicolon. */
                        self.curr_token.set_type(TokenType::VarName);
                        if have_function || self.brace_count > 0 {
                            self.curr_token.set_scope(Scope::Local);
                        } else {
                            self.curr_token.set_scope(Scope::File);
                        }
                        var_names.push(self.curr_token.clone());
                        if have_function
                            && !inside_params
                            && self.buffer.lookahead_last().token_type() == TokenType::Semicolon
                        {
                            let _ = self.buffer.next_token();
                        }
                    }
                }

                TokenType::OpenParen => {
                    paren_count += 1;
                }

                TokenType::CloseParen => {
                    paren_count -= 1;
                    if inside_params && paren_count <= 0 {
                        inside_params = false;
                    }
                }

                TokenType::Typedef | TokenType::Static => {
                    if !inside_params {
                        // A modifier on the entire declaration.
                        self.parse_stack.push(self.curr_token.clone());
                    }
                }

                TokenType::Ampersand | TokenType::OtherSymbol => {
                    /* The initializer of a variable declaration; in a
                    function declaration it is an error. */
                    if have_function {
                        self.statement = StatementKind::Undetermined;
                    } else {
                        self.statement = StatementKind::Expression;
                    }
                }

                TokenType::Type | TokenType::DeclSymbol => {
                    // Ignore it.
                }

                TokenType::FieldAccess => {
                    // A dot inside the parameters is the varargs ellipsis.
                    if !inside_params || self.curr_token.lexeme().as_str() != "." {
                        self.statement = StatementKind::Undetermined;
                    }
                }

                _ => {
                    // The token is not allowed in declarations.
                    self.statement = StatementKind::Undetermined;
                }
            }
            if self.curr_token.token_type() == TokenType::OpenParen {
                cons_paren_count += 1;
            } else {
                cons_paren_count = 0;
            }
        }

        if have_function {
            let next_token = self.curr_token.clone();
            self.proc_funct_declaration(&mut decl_token, &next_token, inside_params);
        } else {
            // A variable, or a typedef making it a type.
            if has_type(&self.parse_stack, TokenType::Typedef) {
                decl_token.set_type(TokenType::Type);
            } else {
                decl_token.set_type(TokenType::VarName);
            }
            if self.brace_count > 0 {
                decl_token.set_scope(Scope::Local);
            } else {
                decl_token.set_scope(Scope::File);
            }
            self.symbols.update(&decl_token);
        }

        /* Parameter names enter the tables only for an actual function
        declaration; a prototype's parameters bind nothing. */
        if matches!(
            decl_token.token_type(),
            TokenType::VarName | TokenType::FuncDecl
        ) {
            while let Some(name) = var_names.pop() {
                self.symbols.update(&name);
            }
        }
        // The token that ended the declaration still needs processing.
        self.read_next = false;
    }

    /// Finishes a function declaration: decides typedef vs declaration
    /// vs prototype, checks completeness, assigns scope, and enters the
    /// name into the tables.
    fn proc_funct_declaration(
        &mut self,
        decl_token: &mut Token,
        next_token: &Token,
        inside_params: bool,
    ) {
        /* Typedefs of function types are legal but almost never used;
        honor one only when doing so is completely legal. */
        if has_type(&self.parse_stack, TokenType::Typedef)
            && !self.symbols.is_keyword(decl_token)
            && self.brace_count == 0
        {
            decl_token.set_type(TokenType::FuncTypedef);
        } else if next_token.token_type() == TokenType::OpenBrace {
            decl_token.set_type(TokenType::FuncDecl);
        } else {
            decl_token.set_type(TokenType::FuncProto);
        }

        if inside_params
            || (decl_token.token_type() != TokenType::FuncDecl
                && next_token.token_type() != TokenType::Semicolon)
        {
            match decl_token.token_type() {
                TokenType::FuncTypedef => {
                    self.report("Function type definition ", decl_token, " is incomplete");
                }
                TokenType::FuncDecl => {
                    self.report("Declaration of function ", decl_token, " is incomplete");
                }
                _ => self.report("Prototype of function ", decl_token, " is incomplete"),
            }
        }

        if has_type(&self.parse_stack, TokenType::Static) {
            decl_token.set_scope(Scope::File);
        } else {
            decl_token.set_scope(Scope::Global);
        }

        if self.brace_count > 0 {
            if decl_token.token_type() == TokenType::FuncDecl {
                self.report(
                    "Declaration of function ",
                    decl_token,
                    " occurs within another function",
                );
            } else {
                self.report(
                    "Prototype of function ",
                    decl_token,
                    " occurs within another function",
                );
            }
        }

        self.symbols.update(decl_token);

        // Only a declaration the tables accepted is worth returning.
        if decl_token.token_type() == TokenType::FuncDecl
            && self.symbols.declared_function(decl_token.lexeme())
        {
            self.funct_token = decl_token.clone();
        }
        self.parse_stack.clear();
    }
}
