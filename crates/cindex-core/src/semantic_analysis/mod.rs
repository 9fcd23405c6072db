// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Semantic analysis: classifying names and detecting collisions.

mod name_space;

pub use name_space::NameSpace;
