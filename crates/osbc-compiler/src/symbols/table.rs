// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! The symbol arena and its scope tables.

use std::fmt;

use rustc_hash::FxHashMap;

use super::{PassBy, Scoping, Symbol, SymbolId, TableId};

/// One lexical scope: a name map plus a link to the enclosing scope.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    parent: Option<TableId>,
    names: FxHashMap<String, SymbolId>,
}

impl SymbolTable {
    /// The enclosing scope, or `None` for the module scope.
    pub fn parent(&self) -> Option<TableId> {
        self.parent
    }

    /// Looks a name up in this scope only.
    pub fn get(&self, name: &str) -> Option<SymbolId> {
        self.names.get(name).copied()
    }

    /// Number of names defined directly in this scope.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if the scope defines no names.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The symbols of this scope, sorted by name.
    pub fn sorted(&self) -> Vec<(&str, SymbolId)> {
        let mut entries: Vec<_> = self
            .names
            .iter()
            .map(|(name, &id)| (name.as_str(), id))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

/// Arena owning every symbol and scope of one compilation.
///
/// Table 0 is the module scope; every other table has a parent.
#[derive(Debug, Clone)]
pub struct Symbols {
    symbols: Vec<Symbol>,
    tables: Vec<SymbolTable>,
}

impl Default for Symbols {
    fn default() -> Self {
        Self::new()
    }
}

impl Symbols {
    /// Creates an arena holding only an empty module scope.
    pub fn new() -> Self {
        Self {
            symbols: Vec::new(),
            tables: vec![SymbolTable::default()],
        }
    }

    /// The module scope.
    pub fn root(&self) -> TableId {
        TableId::new(0)
    }

    /// Creates an empty scope nested in `parent`.
    pub fn new_table(&mut self, parent: TableId) -> TableId {
        let id = TableId::new(self.tables.len() as u32);
        self.tables.push(SymbolTable {
            parent: Some(parent),
            names: FxHashMap::default(),
        });
        id
    }

    /// Returns a scope.
    pub fn table(&self, id: TableId) -> &SymbolTable {
        &self.tables[id.index()]
    }

    /// Number of scopes, the module scope included.
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Adds a new symbol to `table`.
    ///
    /// Duplicates are not checked; a later symbol replaces an earlier one of
    /// the same name in the table's map.
    pub fn add(&mut self, table: TableId, name: &str, line: Option<u32>) -> SymbolId {
        let id = SymbolId::new(self.symbols.len() as u32);

        self.tables[table.index()]
            .names
            .insert(name.to_string(), id);
        self.symbols.push(Symbol::new(name, line, table));

        id
    }

    /// The scope enclosing `table`.
    pub fn parent(&self, table: TableId) -> Option<TableId> {
        self.table(table).parent
    }

    /// Looks `name` up starting at `table`.
    pub fn find(&self, table: TableId, name: &str, scoping: Scoping) -> Option<SymbolId> {
        let mut current = Some(table);

        while let Some(id) = current {
            let table = self.table(id);
            if let Some(symbol) = table.get(name) {
                return Some(symbol);
            }
            if scoping == Scoping::LocalOnly {
                break;
            }
            current = table.parent;
        }

        None
    }

    /// Returns a symbol.
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    /// Returns a symbol for modification.
    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.index()]
    }

    /// Returns a symbol's name.
    pub fn name(&self, id: SymbolId) -> &str {
        &self.symbol(id).name
    }

    /// Returns the name of a type for diagnostics; a missing type is the
    /// type of `null`.
    pub fn type_name(&self, ty: Option<SymbolId>) -> &str {
        ty.map_or("null", |id| self.name(id))
    }

    /// Returns true if the symbol lives in the module scope.
    pub fn is_global(&self, id: SymbolId) -> bool {
        self.parent(self.symbol(id).table).is_none()
    }

    /// Number of symbols in the arena.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if no symbol has been added.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterates over every symbol with its handle.
    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, symbol)| (SymbolId::new(i as u32), symbol))
    }
}

impl fmt::Display for Symbols {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, table) in self.tables.iter().enumerate() {
            match table.parent {
                Some(parent) => writeln!(f, "scope {} (in {})", index, parent.index())?,
                None => writeln!(f, "scope {}", index)?,
            }

            for (name, id) in table.sorted() {
                let symbol = self.symbol(id);

                write!(
                    f,
                    "  {} : {}  {}",
                    name,
                    self.type_name(symbol.base_type),
                    symbol.use_type
                )?;

                if symbol.pass_by != PassBy::Default {
                    write!(f, " {}", symbol.pass_by)?;
                }
                if symbol.is_const {
                    f.write_str(" const")?;
                }
                if symbol.is_special {
                    f.write_str(" special")?;
                }
                if let Some(line) = symbol.line {
                    write!(f, " (line {})", line)?;
                }

                writeln!(f)?;
            }
        }

        Ok(())
    }
}
