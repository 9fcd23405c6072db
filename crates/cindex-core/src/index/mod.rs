// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Function indexing: records, deferred-scope holds, and the finder.

mod finder;
mod hold;
mod record;

pub use finder::FunctionFinder;
pub use hold::FunctionHold;
pub use record::FunctionRecord;
