// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Compiler-provided symbols.

use crate::symbols::{Scoping, Symbols, TableId, UseType};

/// The primitive types.
pub const PRIMITIVES: &[&str] = &["void", "bool", "char", "int", "string"];

/// The intrinsic functions and their return types.
///
/// Intrinsics declare no parameters.
pub const INTRINSICS: &[(&str, &str)] = &[
    ("_open", "int"),
    ("_flush", "void"),
    ("_close", "void"),
    ("_read", "int"),
    ("_write", "bool"),
];

/// Adds the primitives and intrinsics to `table`.
pub(super) fn register(symbols: &mut Symbols, table: TableId) {
    for name in PRIMITIVES {
        let id = symbols.add(table, name, None);
        let symbol = symbols.symbol_mut(id);
        symbol.use_type = UseType::Primitive;
        symbol.is_const = true;
        symbol.is_special = true;
    }

    for (name, return_type) in INTRINSICS {
        let base_type = symbols.find(table, return_type, Scoping::LocalOnly);
        let id = symbols.add(table, name, None);
        let symbol = symbols.symbol_mut(id);
        symbol.use_type = UseType::Function;
        symbol.is_const = true;
        symbol.is_special = true;
        symbol.base_type = base_type;
    }
}
