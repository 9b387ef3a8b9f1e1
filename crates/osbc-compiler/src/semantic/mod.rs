// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Semantic analysis.
//!
//! Analysis runs in two steps over the parsed [`Module`]:
//!
//! 1. The [`Declarer`] registers the built-in symbols, creates a scope for
//!    every function and compound statement, and adds a symbol for every
//!    declaration. Duplicate names are rejected here.
//! 2. The [`Resolver`] binds every name to its symbol and assigns types in
//!    three passes over the module: global signatures, then parameter
//!    types, then function bodies.
//!
//! Both steps stop at the first error.

mod builtins;
mod declarer;
mod resolver;

pub use builtins::{INTRINSICS, PRIMITIVES};
pub use declarer::Declarer;
pub use resolver::Resolver;

use crate::Error;
use crate::ast::Module;
use crate::symbols::Symbols;

/// Declares and resolves `module`, returning the populated symbol arena.
pub fn analyze(module: &mut Module) -> Result<Symbols, Error> {
    let mut symbols = Symbols::new();

    Declarer::new(&mut symbols).declare(module)?;
    Resolver::new(&mut symbols).resolve(module)?;

    Ok(symbols)
}
