// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Symbols and lexical scopes.
//!
//! Every symbol and every table is owned by a single [`Symbols`] arena and
//! addressed through the [`SymbolId`] and [`TableId`] handles. A symbol's
//! type, its parameters and the table it belongs to are all handles into
//! the same arena, so the AST never holds references into it.

mod table;

use std::fmt;

pub use table::{SymbolTable, Symbols};

/// Handle to a [`Symbol`] in a [`Symbols`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(u32);

impl SymbolId {
    /// Creates a handle from a raw index.
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// The raw index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle to a [`SymbolTable`] in a [`Symbols`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(u32);

impl TableId {
    /// Creates a handle from a raw index.
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// The raw index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a symbol names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UseType {
    /// A built-in type
    Primitive,
    /// A function; its type is the return type
    Function,
    /// A variable or constant
    Variable,
    /// A function parameter
    Parameter,
    /// A code label
    Label,
    /// A structure type
    Struct,
    /// An enumeration type
    Enum,
    /// A set type
    Set,
}

impl UseType {
    /// Returns true for symbols that name a type.
    pub fn is_type(self) -> bool {
        matches!(
            self,
            UseType::Primitive | UseType::Struct | UseType::Enum | UseType::Set
        )
    }
}

impl fmt::Display for UseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UseType::Primitive => "Primitive",
            UseType::Function => "Function",
            UseType::Variable => "Variable",
            UseType::Parameter => "Parameter",
            UseType::Label => "Label",
            UseType::Struct => "Struct",
            UseType::Enum => "Enum",
            UseType::Set => "Set",
        };
        f.write_str(name)
    }
}

/// How an argument is passed to a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PassBy {
    /// No keyword; read-only inside the function
    #[default]
    Default,
    /// `in`; read-only inside the function
    In,
    /// `out`; written by the function
    Out,
    /// `ref`; read and written by the function
    Ref,
}

impl fmt::Display for PassBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            PassBy::Default => "",
            PassBy::In => "in",
            PassBy::Out => "out",
            PassBy::Ref => "ref",
        };
        f.write_str(keyword)
    }
}

/// How far a lookup walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scoping {
    /// The table and all of its ancestors
    Normal,
    /// Only the table itself
    LocalOnly,
}

/// A named entity: a type, function, variable or parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    /// The name
    pub name: String,
    /// Defining line; `None` for built-ins
    pub line: Option<u32>,
    /// What the symbol names
    pub use_type: UseType,
    /// True for constants, functions and built-in types
    pub is_const: bool,
    /// True for compiler-provided symbols
    pub is_special: bool,
    /// Marked for export; never set by the current language
    pub exporting: bool,
    /// The symbol's type (the return type, for functions)
    pub base_type: Option<SymbolId>,
    /// Parameter symbols in declaration order, for functions
    pub parameters: Vec<SymbolId>,
    /// Passing mode, for parameters
    pub pass_by: PassBy,
    /// The table the symbol was added to
    pub table: TableId,
}

impl Symbol {
    pub(crate) fn new(name: &str, line: Option<u32>, table: TableId) -> Self {
        Self {
            name: name.to_string(),
            line,
            use_type: UseType::Variable,
            is_const: false,
            is_special: false,
            exporting: false,
            base_type: None,
            parameters: Vec::new(),
            pass_by: PassBy::Default,
            table,
        }
    }

    /// The word used for this symbol in diagnostics.
    pub fn description(&self) -> &'static str {
        match self.use_type {
            UseType::Variable if self.is_const => "constant",
            UseType::Variable => "variable",
            UseType::Function => "function",
            UseType::Parameter => "parameter",
            UseType::Primitive => "primitive",
            UseType::Label => "label",
            UseType::Struct => "struct",
            UseType::Enum => "enum",
            UseType::Set => "set",
        }
    }
}
