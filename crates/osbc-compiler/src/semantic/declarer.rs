// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! The declaration pass: builds the scope tree and adds every symbol.

use tracing::debug;

use super::builtins;
use crate::Error;
use crate::ast::*;
use crate::lexer::Token;
use crate::symbols::{Scoping, SymbolId, Symbols, TableId, UseType};

/// Walks a module and adds a symbol for each declaration.
///
/// Functions and variables must not redefine any visible name. Parameters
/// are only checked against their own function, so they may shadow
/// globals.
pub struct Declarer<'s> {
    symbols: &'s mut Symbols,
}

impl<'s> Declarer<'s> {
    /// Creates a declarer that adds to `symbols`.
    pub fn new(symbols: &'s mut Symbols) -> Self {
        Self { symbols }
    }

    /// Declares the built-ins and every name in `module`.
    pub fn declare(&mut self, module: &mut Module) -> Result<(), Error> {
        let root = self.symbols.root();
        builtins::register(self.symbols, root);

        for import in &module.imports {
            debug!(name = import.reference.name(), "import ignored");
        }

        for statement in &mut module.statements {
            match statement {
                TopLevel::GlobalVariable(variable) => self.declare_variable(variable, root)?,
                TopLevel::Function(function) => self.declare_function(function, root)?,
            }
        }

        debug!(
            symbols = self.symbols.len(),
            tables = self.symbols.table_count(),
            "declared module"
        );

        Ok(())
    }

    fn declare_function(&mut self, function: &mut Function, table: TableId) -> Result<(), Error> {
        let symbol = self.add(&function.decl.ident, table, Scoping::Normal)?;
        {
            let symbol = self.symbols.symbol_mut(symbol);
            symbol.use_type = UseType::Function;
            symbol.is_const = true;
        }
        function.decl.set_symbol(symbol);

        let scope = self.symbols.new_table(table);
        function.table = Some(scope);

        for parameter in &mut function.parameters {
            let id = self.add(&parameter.decl.ident, scope, Scoping::LocalOnly)?;
            {
                let param = self.symbols.symbol_mut(id);
                param.use_type = UseType::Parameter;
                param.pass_by = parameter.pass_by;
            }
            parameter.decl.set_symbol(id);
            self.symbols.symbol_mut(symbol).parameters.push(id);
        }

        self.declare_compound(&mut function.body, scope)
    }

    fn declare_variable(&mut self, variable: &mut VariableDecl, table: TableId) -> Result<(), Error> {
        let id = self.add(&variable.decl.ident, table, Scoping::Normal)?;
        {
            let symbol = self.symbols.symbol_mut(id);
            symbol.use_type = UseType::Variable;
            symbol.is_const = variable.is_const;
        }
        variable.decl.set_symbol(id);
        Ok(())
    }

    fn declare_compound(
        &mut self,
        compound: &mut CompoundStatement,
        parent: TableId,
    ) -> Result<(), Error> {
        let table = self.symbols.new_table(parent);
        if compound.table.replace(table).is_some() {
            panic!("BUG: compound statement on line {} declared twice", compound.line);
        }

        for statement in &mut compound.statements {
            self.declare_statement(statement, table)?;
        }

        Ok(())
    }

    fn declare_statement(&mut self, statement: &mut Statement, table: TableId) -> Result<(), Error> {
        match statement {
            Statement::VariableDecl(variable) => self.declare_variable(variable, table),
            Statement::Compound(compound) => self.declare_compound(compound, table),
            Statement::While(stmt) => self.declare_compound(&mut stmt.body, table),
            Statement::If(stmt) => {
                self.declare_compound(&mut stmt.true_part, table)?;
                if let Some(false_part) = &mut stmt.false_part {
                    self.declare_compound(false_part, table)?;
                }
                Ok(())
            }
            Statement::Assignment(_) | Statement::Call(_) | Statement::Return(_) => Ok(()),
        }
    }

    /// Adds `ident` to `table` after checking it is not already visible.
    fn add(&mut self, ident: &Token, table: TableId, scoping: Scoping) -> Result<SymbolId, Error> {
        if let Some(existing) = self.symbols.find(table, &ident.literal, scoping) {
            let message = match self.symbols.symbol(existing).line {
                Some(line) => format!(
                    "Symbol '{}' already defined. (See previous definition on line {})",
                    ident.literal, line
                ),
                None => format!(
                    "Symbol '{}' already defined. (See built in definition)",
                    ident.literal
                ),
            };
            return Err(Error::semantic(ident.line, message));
        }

        debug!(name = %ident.literal, line = ident.line, table = table.index(), "declare");
        Ok(self.symbols.add(table, &ident.literal, Some(ident.line)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::symbols::PassBy;

    fn declare(src: &str) -> Result<(Module, Symbols), Error> {
        let mut module = Parser::new(src).execute().unwrap();
        let mut symbols = Symbols::new();
        Declarer::new(&mut symbols).declare(&mut module)?;
        Ok((module, symbols))
    }

    fn declare_err(src: &str) -> Error {
        declare(src).map(|_| ()).unwrap_err()
    }

    #[test]
    fn test_declares_functions_and_parameters() {
        let (module, symbols) = declare("function f(in a : int, ref b : char) : int { return a; }").unwrap();
        let f = module.functions().next().unwrap();

        let id = f.decl.symbol().unwrap();
        let symbol = symbols.symbol(id);
        assert_eq!(symbol.use_type, UseType::Function);
        assert!(symbol.is_const);
        assert_eq!(symbol.line, Some(1));
        assert_eq!(symbol.parameters.len(), 2);
        assert!(symbols.is_global(id));

        let b = symbols.symbol(symbol.parameters[1]);
        assert_eq!(b.name, "b");
        assert_eq!(b.use_type, UseType::Parameter);
        assert_eq!(b.pass_by, PassBy::Ref);
        assert_eq!(Some(b.table), f.table);
        assert!(!symbols.is_global(symbol.parameters[1]));
    }

    #[test]
    fn test_every_compound_gets_a_table() {
        let (module, symbols) = declare(
            "function f() {
                var x : int;
                while (x) { var y : int; }
                if (x) { } else { { } }
            }",
        )
        .unwrap();
        let f = module.functions().next().unwrap();

        let body = f.body.table.unwrap();
        assert_eq!(symbols.table(body).parent(), f.table);
        assert!(symbols.table(body).get("x").is_some());

        let Statement::While(stmt) = &f.body.statements[1] else {
            panic!("Expected while statement");
        };
        let loop_table = stmt.body.table.unwrap();
        assert_eq!(symbols.table(loop_table).parent(), Some(body));
        assert!(symbols.table(loop_table).get("y").is_some());

        // module, function, body, while, if, else, nested block
        assert_eq!(symbols.table_count(), 7);
    }

    #[test]
    fn test_constants_are_const() {
        let (module, symbols) = declare("const k : int = 1;\nvar v : int;").unwrap();
        let ids: Vec<_> = module
            .statements
            .iter()
            .map(|s| match s {
                TopLevel::GlobalVariable(v) => v.decl.symbol().unwrap(),
                TopLevel::Function(_) => unreachable!(),
            })
            .collect();

        assert!(symbols.symbol(ids[0]).is_const);
        assert!(!symbols.symbol(ids[1]).is_const);
        assert_eq!(symbols.symbol(ids[1]).line, Some(2));
    }

    #[test]
    fn test_duplicate_global() {
        let err = declare_err("var x : int;\nfunction x() { }");
        assert_eq!(err.line(), Some(2));
        assert_eq!(
            err.message(),
            "Symbol 'x' already defined. (See previous definition on line 1)"
        );
    }

    #[test]
    fn test_redefining_builtin() {
        let err = declare_err("var int : int;");
        assert_eq!(
            err.message(),
            "Symbol 'int' already defined. (See built in definition)"
        );

        let err = declare_err("function _write() { }");
        assert_eq!(
            err.message(),
            "Symbol '_write' already defined. (See built in definition)"
        );
    }

    #[test]
    fn test_duplicate_parameter() {
        let err = declare_err("function f(a : int,\n b : int,\n a : char) { }");
        assert_eq!(err.line(), Some(3));
        assert_eq!(
            err.message(),
            "Symbol 'a' already defined. (See previous definition on line 1)"
        );
    }

    #[test]
    fn test_parameters_may_shadow_globals_but_locals_may_not() {
        assert!(declare("var g : int;\nfunction f(g : int) { }").is_ok());

        let err = declare_err("var g : int;\nfunction f() {\n  var g : int;\n}");
        assert_eq!(err.line(), Some(3));

        let err = declare_err("function f(p : int) {\n  var p : int;\n}");
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn test_sibling_blocks_may_reuse_names() {
        assert!(declare("function f() { { var t : int; } { var t : int; } }").is_ok());
    }
}
