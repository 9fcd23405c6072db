// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Source analysis: from bytes to tokens.
//!
//! This module covers the first half of the pipeline. The
//! [`FileBuffer`] turns raw file bytes into processed lines (comments
//! collapsed, preprocessor line directives consumed), and the
//! [`Tokenizer`] turns processed lines into [`Token`]s. The
//! [`TokenStream`] wraps the tokenizer with the unbounded lookahead the
//! statement parser needs.

pub mod file_buffer;
mod position;
mod token;
mod token_stream;
mod tokenizer;


pub use file_buffer::FileBuffer;
pub use position::FilePosition;
pub use token::{Modifier, Scope, Token, TokenType};
pub use token_stream::TokenStream;
pub use tokenizer::Tokenizer;
