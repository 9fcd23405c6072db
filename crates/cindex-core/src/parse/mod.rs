// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Statement-level parsing.

mod parser;

pub use parser::Parser;
