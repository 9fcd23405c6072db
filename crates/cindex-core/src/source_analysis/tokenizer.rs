// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis over processed lines.
//!
//! The [`Tokenizer`] turns the [`FileBuffer`]'s processed lines into a
//! stream of [`Token`]s by first-character dispatch:
//!
//! | Input | Token |
//! |-------|-------|
//! | `&` | ampersand (`&&` lexes as other-symbol) |
//! | `->`, `.` | field access |
//! | `;` `{` `}` `(` `)` | the matching grouping token |
//! | quoted string, digits, character literal | literal |
//! | alpha then alphanumerics | identifier |
//! | `*` `[` `]` `,` | declaration symbol run |
//! | anything else | other-symbol run |
//!
//! A token may wrap across physical lines through an escaped newline;
//! the scan reloads the buffer mid-token and the token keeps the
//! position of the line it *started* on. The lexer never fails: input it
//! cannot make sense of comes out as symbol runs, and the parser ignores
//! those.

use std::io::BufRead;

use ecow::EcoString;

use crate::diagnostics::DiagnosticSink;
use crate::error::IndexError;
use crate::source_analysis::file_buffer::{burn_spaces, esc_newline_pos, next_close_quote};
use crate::source_analysis::{FileBuffer, FilePosition, Token, TokenType};

/// Symbols allowed in declaration statements.
const DECL_CHARS: &[u8] = b"*[], \t";
/// Symbols that lex to an other-symbol run.
const OTHER_CHARS: &[u8] = b"`!@#$%^+=|\\<>?/";

fn is_decl_char(byte: u8) -> bool {
    DECL_CHARS.contains(&byte)
}

fn is_symbol_char(byte: u8) -> bool {
    DECL_CHARS.contains(&byte) || OTHER_CHARS.contains(&byte)
}

fn is_ident_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

fn is_numeric_char(byte: u8) -> bool {
    byte.is_ascii_digit() || byte == b'.'
}

/// Extracts a lexeme from a byte range without ever panicking on odd
/// input; invalid sequences are replaced rather than trusted.
fn lexeme_of(bytes: &[u8]) -> EcoString {
    EcoString::from(String::from_utf8_lossy(bytes).as_ref())
}

/// Lexes one file into tokens.
#[derive(Debug)]
pub struct Tokenizer {
    file: FileBuffer,
    /// Line data currently being scanned.
    buffer: Vec<u8>,
    /// Position of the next byte to tokenize.
    char_ptr: usize,
    /* A token's text may wrap between lines, forcing a file read before
    the token finishes. Its location must reflect where it started, so
    the location is cached here and only refreshed between tokens. */
    location: FilePosition,
    /// Location needs refreshing once the scan passes `new_line_pos`.
    load_line_data: bool,
    /// Start, within the buffer, of the most recently loaded line.
    new_line_pos: usize,
}

impl Tokenizer {
    /// Opens the named file and primes the scan.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::NoSuchFile`] if the file cannot be opened.
    pub fn open(file_name: &str, sink: DiagnosticSink) -> Result<Self, IndexError> {
        Ok(Self::new(FileBuffer::open(file_name, sink)?))
    }

    /// Builds a tokenizer over an arbitrary reader.
    pub fn from_reader(
        file_name: &str,
        reader: impl BufRead + 'static,
        sink: DiagnosticSink,
    ) -> Self {
        Self::new(FileBuffer::from_reader(file_name, reader, sink))
    }

    fn new(file: FileBuffer) -> Self {
        let mut tokenizer = Self {
            file,
            buffer: Vec::new(),
            char_ptr: 0,
            location: FilePosition::default(),
            load_line_data: false,
            new_line_pos: 0,
        };
        tokenizer.reload_buffer(false);
        tokenizer.location = tokenizer.file.position().clone();
        tokenizer
    }

    /// Returns `true` once the entire file has been tokenized.
    #[must_use]
    pub fn eof(&self) -> bool {
        self.file.eof() && self.char_ptr >= self.buffer.len()
    }

    /// Returns `true` if the byte at `position` is an escaped newline.
    fn is_line_wrap(&self, position: usize, multi_line_quote: bool) -> bool {
        if self.file.eof() {
            // On the last line of input, by definition nothing wraps.
            false
        } else if position >= self.buffer.len() || self.buffer[position] != b'\\' {
            false
        } else {
            esc_newline_pos(&self.buffer, multi_line_quote) == Some(position)
        }
    }

    /// Drops consumed text and appends the next processed line.
    fn reload_buffer(&mut self, multi_line_quote: bool) {
        let keep = if self.char_ptr >= self.buffer.len() {
            0
        } else {
            // An escaped newline at the end is not carried over.
            let first_ignore =
                esc_newline_pos(&self.buffer, multi_line_quote).unwrap_or(self.buffer.len());
            first_ignore.saturating_sub(self.char_ptr)
        };
        if keep > 0 {
            self.buffer = self.buffer[self.char_ptr..self.char_ptr + keep].to_vec();
        } else {
            self.buffer.clear();
        }
        self.new_line_pos = keep;
        if !self.file.eof() {
            let line = self.file.next_line();
            self.buffer.extend_from_slice(line.as_bytes());
            self.load_line_data = true;
        }
        self.char_ptr = 0;
    }

    /// Finds the first byte at or after `start` failing `predicate`.
    fn scan_while(&self, start: usize, predicate: impl Fn(u8) -> bool) -> Option<usize> {
        (start..self.buffer.len()).find(|&i| !predicate(self.buffer[i]))
    }

    /// Lexes and returns the next token.
    pub fn next_token(&mut self) -> Token {
        if self.eof() {
            // Place end of file one line past the last line seen.
            let mut position = self.location.clone();
            position.incr_line();
            return Token::new("", position, TokenType::Eof);
        }

        let byte = self.buffer[self.char_ptr];
        let token = if byte.is_ascii_alphabetic() || byte == b'_' || byte == b'~' {
            self.lex_identifier()
        } else if byte.is_ascii_digit() {
            self.lex_numeric()
        } else {
            match byte {
                b'"' => self.lex_quoted_string(),
                b'-' => self.lex_minus(),
                b'\'' => self.lex_char_literal(),
                b'&' => self.lex_ampersand(),
                b'.' => {
                    // A dot may be the leading decimal point of a number.
                    if self.char_ptr + 1 >= self.buffer.len()
                        || !self.buffer[self.char_ptr + 1].is_ascii_digit()
                    {
                        self.lex_single(TokenType::FieldAccess)
                    } else {
                        self.lex_numeric()
                    }
                }
                b';' => self.lex_single(TokenType::Semicolon),
                b'{' => self.lex_single(TokenType::OpenBrace),
                b'}' => self.lex_single(TokenType::CloseBrace),
                b'(' => self.lex_single(TokenType::OpenParen),
                b')' => self.lex_single(TokenType::CloseParen),
                _ => self.lex_symbol_run(),
            }
        };

        // Move up to the next byte to process, burning whitespace and
        // escaped newlines, reloading as often as needed.
        let mut have_char = false;
        while !have_char && (!self.file.eof() || self.char_ptr < self.buffer.len()) {
            if self.char_ptr < self.buffer.len() {
                self.char_ptr =
                    burn_spaces(&self.buffer, self.char_ptr).unwrap_or(self.buffer.len());
            }
            if self.is_line_wrap(self.char_ptr, false) {
                self.char_ptr = self.buffer.len();
            }
            if self.char_ptr >= self.buffer.len() {
                self.reload_buffer(false);
            } else {
                have_char = true;
            }
        }

        // Past the start of freshly loaded text the cached location is
        // stale; refresh it for the next token.
        if self.load_line_data && self.char_ptr >= self.new_line_pos {
            self.location = self.file.position().clone();
            self.load_line_data = false;
        }
        token
    }

    /// Produces a one-byte token of the given type.
    fn lex_single(&mut self, token_type: TokenType) -> Token {
        let lexeme = lexeme_of(&self.buffer[self.char_ptr..=self.char_ptr]);
        self.char_ptr += 1;
        Token::new(lexeme, self.location.clone(), token_type)
    }

    /// Lexes a symbol run.
    ///
    /// The parser ignores consecutive symbol characters, so they merge
    /// into one token. Declaration characters merge into an other-symbol
    /// run when the latter kind is found first.
    fn lex_symbol_run(&mut self) -> Token {
        let (token_type, stop) = if is_decl_char(self.buffer[self.char_ptr]) {
            (
                TokenType::DeclSymbol,
                self.scan_while(self.char_ptr + 1, is_decl_char),
            )
        } else {
            (
                TokenType::OtherSymbol,
                self.scan_while(self.char_ptr + 1, is_symbol_char),
            )
        };
        let end = stop.unwrap_or(self.buffer.len());
        let lexeme = lexeme_of(&self.buffer[self.char_ptr..end]);
        self.char_ptr = end;
        Token::new(lexeme, self.location.clone(), token_type)
    }

    /// Lexes a numeric literal: digits and dots, plus one `E` exponent.
    fn lex_numeric(&mut self) -> Token {
        let start_location = self.location.clone();
        let mut from = self.char_ptr;
        let mut seen_e = false;
        let end = loop {
            match self.scan_while(from, is_numeric_char) {
                None => break self.buffer.len(),
                Some(position) if self.is_line_wrap(position, false) => {
                    self.reload_buffer(false);
                    // Resume from the start of the chars just added.
                    from = self.new_line_pos;
                }
                Some(position) if self.buffer[position] == b'E' && !seen_e => {
                    // Exponential notation; skip the E and keep going.
                    seen_e = true;
                    from = position + 1;
                }
                Some(position) => break position,
            }
        };
        let lexeme = lexeme_of(&self.buffer[self.char_ptr..end]);
        self.char_ptr = end;
        Token::new(lexeme, start_location, TokenType::Literal)
    }

    /// Lexes a quoted string literal, reloading across wrapped lines.
    fn lex_quoted_string(&mut self) -> Token {
        let start_location = self.location.clone();
        let mut from = self.char_ptr + 1;
        let close = loop {
            match next_close_quote(&self.buffer, from) {
                None if !self.file.eof() => {
                    // Literal wraps to the next line.
                    self.reload_buffer(true);
                    from = self.new_line_pos;
                }
                other => break other,
            }
        };
        let (lexeme, next) = match close {
            Some(position) => (
                lexeme_of(&self.buffer[self.char_ptr..=position]),
                position + 1,
            ),
            None => (
                lexeme_of(&self.buffer[self.char_ptr..]),
                self.buffer.len(),
            ),
        };
        self.char_ptr = next;
        Token::new(lexeme, start_location, TokenType::Literal)
    }

    /// Lexes an identifier. The first character follows different rules
    /// from the rest.
    fn lex_identifier(&mut self) -> Token {
        let start_location = self.location.clone();
        let mut lexeme = EcoString::new();
        lexeme.push(self.buffer[self.char_ptr] as char);
        self.char_ptr += 1;

        let mut from = self.char_ptr;
        let end = loop {
            match self.scan_while(from, is_ident_char) {
                None => break self.buffer.len(),
                Some(position) if self.is_line_wrap(position, false) => {
                    self.reload_buffer(false);
                    from = self.new_line_pos;
                }
                Some(position) => break position,
            }
        };
        if end > self.char_ptr {
            lexeme.push_str(&lexeme_of(&self.buffer[self.char_ptr..end]));
        }
        self.char_ptr = end;
        Token::new(lexeme, start_location, TokenType::Identifier)
    }

    /// Lexes a minus sign, which may open the `->` field operator.
    fn lex_minus(&mut self) -> Token {
        if self.char_ptr + 1 >= self.buffer.len() {
            return self.lex_single(TokenType::OtherSymbol);
        }
        if self.is_line_wrap(self.char_ptr + 1, false) {
            self.reload_buffer(false);
        }
        if self.buffer.get(self.char_ptr + 1) == Some(&b'>') {
            let lexeme = lexeme_of(&self.buffer[self.char_ptr..self.char_ptr + 2]);
            self.char_ptr += 2;
            Token::new(lexeme, self.location.clone(), TokenType::FieldAccess)
        } else {
            self.lex_symbol_run()
        }
    }

    /// Lexes an ampersand.
    ///
    /// `&&` is the boolean AND operator; a single `&` may still be
    /// either address-of or bitwise AND, which the parser tells apart.
    fn lex_ampersand(&mut self) -> Token {
        if self.char_ptr + 1 >= self.buffer.len() {
            return self.lex_single(TokenType::Ampersand);
        }
        if self.is_line_wrap(self.char_ptr + 1, false) {
            self.reload_buffer(false);
        }
        if self.buffer.get(self.char_ptr + 1) == Some(&b'&') {
            let lexeme = lexeme_of(&self.buffer[self.char_ptr..self.char_ptr + 2]);
            self.char_ptr += 2;
            Token::new(lexeme, self.location.clone(), TokenType::OtherSymbol)
        } else {
            self.lex_single(TokenType::Ampersand)
        }
    }

    /// Lexes a character literal.
    ///
    /// Accepts `'c'`, `'\e'` for the standard escapes, `'\ooo'` and
    /// `'\xhh'`, as a state machine over the lexeme length. On anything
    /// else the quote falls through to a symbol run.
    fn lex_char_literal(&mut self) -> Token {
        let mut have_error = false;
        let mut have_value = false;
        let mut have_escape = false;
        let mut have_hex = false;
        let mut have_oct = false;
        let mut have_zero = false;
        let mut length: usize = 1;

        while !have_value && !have_error {
            length += 1;
            let index = self.char_ptr + length - 1;
            if index >= self.buffer.len() {
                have_error = true;
            } else if self.is_line_wrap(index, true) {
                self.reload_buffer(true);
                // The escape newline was burned; shrink to compensate.
                length -= 1;
            } else {
                let byte = self.buffer[index];
                match length {
                    2 => {
                        if byte == b'\'' {
                            have_error = true;
                        } else if byte == b'\\' {
                            have_escape = true;
                        }
                    }
                    3 => {
                        if !have_escape {
                            if byte == b'\'' {
                                have_value = true;
                            } else {
                                have_error = true;
                            }
                        } else if byte == b'0' {
                            /* A zero can start an octal number or be the
                            NUL escape; the next char decides which. */
                            have_zero = true;
                        } else if byte.is_ascii_digit() {
                            have_oct = true;
                        } else if byte == b'x' {
                            have_hex = true;
                        } else if !matches!(
                            byte,
                            b'a' | b'b' | b'f' | b'n' | b'r' | b't' | b'v' | b'\\' | b'?' | b'"'
                                | b'\''
                        ) {
                            have_error = true;
                        }
                    }
                    4 => {
                        if have_zero && byte.is_ascii_digit() {
                            have_oct = true;
                        }
                        if have_oct {
                            have_error = !byte.is_ascii_digit();
                        } else if have_hex {
                            have_error = !byte.is_ascii_hexdigit();
                        } else if have_escape && byte == b'\'' {
                            have_value = true;
                        } else {
                            have_error = true;
                        }
                    }
                    5 => {
                        if have_oct {
                            have_error = !byte.is_ascii_digit();
                        } else if have_hex {
                            have_error = !byte.is_ascii_hexdigit();
                        } else {
                            have_error = true;
                        }
                    }
                    6 => {
                        if (have_hex || have_oct) && byte == b'\'' {
                            have_value = true;
                        } else {
                            have_error = true;
                        }
                    }
                    _ => have_error = true,
                }
            }
        }

        if have_value {
            let lexeme = lexeme_of(&self.buffer[self.char_ptr..self.char_ptr + length]);
            self.char_ptr += length;
            Token::new(lexeme, self.location.clone(), TokenType::Literal)
        } else {
            self.lex_symbol_run()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn tokenizer_for(text: &str) -> Tokenizer {
        Tokenizer::from_reader("test.c", Cursor::new(text.to_string()), DiagnosticSink::new())
    }

    fn tokens_of(text: &str) -> Vec<Token> {
        let mut tokenizer = tokenizer_for(text);
        let mut tokens = Vec::new();
        while !tokenizer.eof() {
            tokens.push(tokenizer.next_token());
        }
        tokens
    }

    fn lexemes(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.lexeme().as_str()).collect()
    }

    #[test]
    fn simple_prototype() {
        let tokens = tokens_of("int foo(void);\n");
        assert_eq!(lexemes(&tokens), vec!["int", "foo", "(", "void", ")", ";"]);
        assert_eq!(tokens[0].token_type(), TokenType::Identifier);
        assert_eq!(tokens[2].token_type(), TokenType::OpenParen);
        assert_eq!(tokens[4].token_type(), TokenType::CloseParen);
        assert_eq!(tokens[5].token_type(), TokenType::Semicolon);
    }

    #[test]
    fn eof_token_is_one_line_past_the_end() {
        let mut tokenizer = tokenizer_for("x\n");
        let x = tokenizer.next_token();
        assert_eq!(x.lexeme(), "x");
        assert_eq!(x.location().line(), 1);
        assert!(tokenizer.eof());
        let eof = tokenizer.next_token();
        assert_eq!(eof.token_type(), TokenType::Eof);
        assert_eq!(eof.location().line(), 2);
    }

    #[test]
    fn field_access_forms() {
        let tokens = tokens_of("a->b . c\n");
        assert_eq!(lexemes(&tokens), vec!["a", "->", "b", ".", "c"]);
        assert_eq!(tokens[1].token_type(), TokenType::FieldAccess);
        assert_eq!(tokens[3].token_type(), TokenType::FieldAccess);
    }

    #[test]
    fn ampersand_forms() {
        let tokens = tokens_of("x && y & z\n");
        assert_eq!(tokens[1].token_type(), TokenType::OtherSymbol);
        assert_eq!(tokens[1].lexeme(), "&&");
        assert_eq!(tokens[3].token_type(), TokenType::Ampersand);
    }

    #[test]
    fn numeric_literals() {
        let tokens = tokens_of("3.14 2E10 .5 42\n");
        assert_eq!(lexemes(&tokens), vec!["3.14", "2E10", ".5", "42"]);
        assert!(tokens
            .iter()
            .all(|t| t.token_type() == TokenType::Literal));
    }

    #[test]
    fn string_literal_is_one_token() {
        let tokens = tokens_of("s = \"a b ; { } c\";\n");
        assert_eq!(tokens[2].token_type(), TokenType::Literal);
        assert_eq!(tokens[2].lexeme(), "\"a b ; { } c\"");
    }

    #[test]
    fn character_literal_forms() {
        for literal in ["'a'", "'\\''", "'\\x41'", "'\\101'", "'\\0'", "'\\n'"] {
            let tokens = tokens_of(&format!("{literal};\n"));
            assert_eq!(tokens[0].token_type(), TokenType::Literal, "for {literal}");
            assert_eq!(tokens[0].lexeme(), literal, "for {literal}");
            assert_eq!(tokens[1].token_type(), TokenType::Semicolon);
        }
    }

    #[test]
    fn malformed_character_literal_degrades_to_symbols() {
        let tokens = tokens_of("'ab' x\n");
        assert_eq!(tokens[0].token_type(), TokenType::OtherSymbol);
        assert_eq!(tokens[0].lexeme(), "'");
        assert_eq!(tokens[1].lexeme(), "ab");
        assert_eq!(tokens[1].token_type(), TokenType::Identifier);
    }

    #[test]
    fn declaration_symbols_group() {
        let tokens = tokens_of("int *p, q;\n");
        let types: Vec<_> = tokens.iter().map(Token::token_type).collect();
        assert_eq!(
            types,
            vec![
                TokenType::Identifier,
                TokenType::DeclSymbol,
                TokenType::Identifier,
                TokenType::DeclSymbol,
                TokenType::Identifier,
                TokenType::Semicolon,
            ]
        );
    }

    #[test]
    fn other_symbols_subsume_following_decl_chars() {
        // A run started by a non-declaration symbol swallows declaration
        // characters that follow it.
        let tokens = tokens_of("a =* b\n");
        assert_eq!(lexemes(&tokens), vec!["a", "=* ", "b"]);
        assert_eq!(tokens[1].token_type(), TokenType::OtherSymbol);
    }

    #[test]
    fn escaped_newline_splits_identifier() {
        let tokens = tokens_of("foo\\\nbar\n");
        assert_eq!(lexemes(&tokens), vec!["foobar"]);
        assert_eq!(tokens[0].token_type(), TokenType::Identifier);
    }

    #[test]
    fn split_line_matches_unsplit_form() {
        let split = tokens_of("int ab\\\ncd(void);\n");
        let joined = tokens_of("int abcd(void);\n");
        assert_eq!(lexemes(&split), lexemes(&joined));
    }

    #[test]
    fn token_keeps_position_of_starting_line() {
        let mut tokenizer = tokenizer_for("aa\\\nbb cc\n");
        let first = tokenizer.next_token();
        assert_eq!(first.lexeme(), "aabb");
        assert_eq!(first.location().line(), 1);
        let second = tokenizer.next_token();
        assert_eq!(second.lexeme(), "cc");
        assert_eq!(second.location().line(), 2);
    }

    #[test]
    fn tilde_starts_an_identifier() {
        let tokens = tokens_of("~x\n");
        assert_eq!(tokens[0].lexeme(), "~x");
        assert_eq!(tokens[0].token_type(), TokenType::Identifier);
    }

    #[test]
    fn minus_alone_is_other_symbol() {
        let tokens = tokens_of("a - b\n");
        assert_eq!(tokens[1].token_type(), TokenType::OtherSymbol);
    }

    #[test]
    fn empty_input_is_immediately_eof() {
        let mut tokenizer = tokenizer_for("");
        assert!(tokenizer.eof());
        assert_eq!(tokenizer.next_token().token_type(), TokenType::Eof);
    }

    #[test]
    fn comment_only_input_produces_no_tokens() {
        assert!(tokens_of("/* just a comment */\n").is_empty());
    }
}
