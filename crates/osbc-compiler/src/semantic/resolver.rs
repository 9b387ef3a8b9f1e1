// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! The resolution passes: name binding and type checking.
//!
//! Types must match exactly; there are no implicit conversions. Comparison
//! and equality operators produce `bool`, every other operator produces the
//! type of its operands.

use tracing::debug;

use crate::Error;
use crate::ast::*;
use crate::lexer::{Token, TokenKind};
use crate::symbols::{Scoping, SymbolId, Symbols, TableId, UseType};

/// Which part of the module a resolution pass handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    /// Global variable types and initializers, function return types
    Signatures,
    /// Parameter types
    Parameters,
    /// Function bodies
    Bodies,
}

/// Binds names to symbols and assigns types over a declared module.
pub struct Resolver<'s> {
    symbols: &'s mut Symbols,
    pass: Pass,
    current_function: Option<SymbolId>,
}

impl<'s> Resolver<'s> {
    /// Creates a resolver over a populated symbol arena.
    pub fn new(symbols: &'s mut Symbols) -> Self {
        Self {
            symbols,
            pass: Pass::Signatures,
            current_function: None,
        }
    }

    /// Runs the three passes over `module`.
    pub fn resolve(&mut self, module: &mut Module) -> Result<(), Error> {
        let root = self.symbols.root();

        for pass in [Pass::Signatures, Pass::Parameters, Pass::Bodies] {
            debug!(?pass, "resolving");
            self.pass = pass;

            for statement in &mut module.statements {
                match statement {
                    TopLevel::GlobalVariable(variable) => {
                        if self.pass == Pass::Signatures {
                            self.resolve_variable(variable, root)?;
                        }
                    }
                    TopLevel::Function(function) => self.resolve_function(function, root)?,
                }
            }
        }

        Ok(())
    }

    fn resolve_function(&mut self, function: &mut Function, table: TableId) -> Result<(), Error> {
        match self.pass {
            Pass::Signatures => {
                self.resolve_type(&function.decl, table)?;
            }
            Pass::Parameters => {
                let scope = Self::table_of(function.table, function.decl.line());
                for parameter in &function.parameters {
                    self.resolve_type(&parameter.decl, scope)?;
                }
            }
            Pass::Bodies => {
                self.current_function = function.decl.symbol();
                let result = self.resolve_compound(&mut function.body);
                self.current_function = None;
                result?;
            }
        }

        Ok(())
    }

    /// Looks up the declared type of `decl` and records it on its symbol.
    fn resolve_type(&mut self, decl: &Decl, table: TableId) -> Result<SymbolId, Error> {
        let ty = self.lookup_type(decl, table)?;
        self.symbols.symbol_mut(Self::symbol_of(decl)).base_type = Some(ty);
        Ok(ty)
    }

    /// Looks up the declared type of `decl` without recording it.
    fn lookup_type(&self, decl: &Decl, table: TableId) -> Result<SymbolId, Error> {
        let ty = self
            .symbols
            .find(table, decl.type_ref.name(), Scoping::Normal)
            .ok_or_else(|| {
                Error::semantic(
                    decl.line(),
                    format!(
                        "Undeclared type '{}' for '{}'",
                        decl.type_ref.name(),
                        decl.name()
                    ),
                )
            })?;

        if !self.symbols.symbol(ty).use_type.is_type() {
            return Err(Error::semantic(
                decl.line(),
                format!(
                    "'{}' is not a type (declared for '{}')",
                    decl.type_ref.name(),
                    decl.name()
                ),
            ));
        }

        Ok(ty)
    }

    /// Resolves a declaration and its initializer. The variable only gets its
    /// type afterwards, so the initializer cannot read it.
    fn resolve_variable(&mut self, variable: &mut VariableDecl, table: TableId) -> Result<(), Error> {
        let ty = self.lookup_type(&variable.decl, table)?;

        let Some(initializer) = &mut variable.initializer else {
            self.symbols.symbol_mut(Self::symbol_of(&variable.decl)).base_type = Some(ty);
            if variable.is_const {
                return Err(Error::semantic(
                    variable.decl.line(),
                    format!(
                        "Initializer required for constant '{}'.",
                        variable.decl.name()
                    ),
                ));
            }
            return Ok(());
        };

        self.resolve_expression(initializer, table)?;

        if variable.is_const && !initializer.is_constant {
            return Err(Error::semantic(
                variable.decl.line(),
                format!(
                    "Initializer for constant '{}' must evaluate to a constant.",
                    variable.decl.name()
                ),
            ));
        }

        if initializer.result_type != Some(ty) {
            return Err(Error::semantic(
                variable.decl.line(),
                format!(
                    "Cannot initialize '{}' of type '{}' with a value of type '{}'",
                    variable.decl.name(),
                    self.symbols.name(ty),
                    self.symbols.type_name(initializer.result_type)
                ),
            ));
        }

        self.symbols.symbol_mut(Self::symbol_of(&variable.decl)).base_type = Some(ty);
        Ok(())
    }

    fn resolve_compound(&mut self, compound: &mut CompoundStatement) -> Result<(), Error> {
        let table = Self::table_of(compound.table, compound.line);

        for statement in &mut compound.statements {
            self.resolve_statement(statement, table)?;
        }

        Ok(())
    }

    fn resolve_statement(&mut self, statement: &mut Statement, table: TableId) -> Result<(), Error> {
        match statement {
            Statement::VariableDecl(variable) => self.resolve_variable(variable, table),
            Statement::Compound(compound) => self.resolve_compound(compound),
            Statement::Assignment(assignment) => self.resolve_assignment(assignment, table),
            Statement::Call(call) => self.resolve_call(call, table).map(|_| ()),
            Statement::Return(ret) => self.resolve_return(ret, table),
            Statement::While(stmt) => {
                self.resolve_expression(&mut stmt.condition, table)?;
                self.resolve_compound(&mut stmt.body)
            }
            Statement::If(stmt) => {
                self.resolve_expression(&mut stmt.condition, table)?;
                self.resolve_compound(&mut stmt.true_part)?;
                if let Some(false_part) = &mut stmt.false_part {
                    self.resolve_compound(false_part)?;
                }
                Ok(())
            }
        }
    }

    fn resolve_assignment(
        &mut self,
        assignment: &mut AssignmentStatement,
        table: TableId,
    ) -> Result<(), Error> {
        let line = assignment.reference.line();
        let id = self.find(
            table,
            &assignment.reference,
            "Assignment to undeclared variable",
        )?;

        let symbol = self.symbols.symbol(id);
        if symbol.use_type != UseType::Variable || symbol.is_const {
            return Err(Error::semantic(
                line,
                format!(
                    "Cannot assign a value to {} '{}'",
                    symbol.description(),
                    symbol.name
                ),
            ));
        }

        let ty = self.value_type(line, id)?;
        assignment.symbol = Some(id);

        self.resolve_expression(&mut assignment.expression, table)?;

        if assignment.expression.result_type != Some(ty) {
            return Err(Error::semantic(
                line,
                format!(
                    "Cannot assign value of '{}' to variable '{}' of type '{}'",
                    self.symbols.type_name(assignment.expression.result_type),
                    assignment.reference.name(),
                    self.symbols.name(ty)
                ),
            ));
        }

        Ok(())
    }

    /// Resolves a call and returns the callee's return type.
    fn resolve_call(
        &mut self,
        call: &mut CallStatement,
        table: TableId,
    ) -> Result<Option<SymbolId>, Error> {
        let line = call.reference.line();
        let id = self.find(table, &call.reference, "Call to undeclared function")?;

        let function = self.symbols.symbol(id);
        if function.use_type != UseType::Function {
            return Err(Error::semantic(
                line,
                format!("'{}' is not a function", call.reference.name()),
            ));
        }

        if self.current_function.is_none() {
            return Err(Error::semantic(
                line,
                format!(
                    "Function '{}' cannot be called from a global initializer.",
                    call.reference.name()
                ),
            ));
        }

        if function.parameters.len() != call.arguments.len() {
            return Err(Error::semantic(
                line,
                format!(
                    "Parameter count mismatch for call to function '{}'",
                    call.reference.name()
                ),
            ));
        }

        let return_type = function.base_type;
        let parameters = function.parameters.clone();

        for (argument, parameter) in call.arguments.iter_mut().zip(parameters) {
            self.resolve_expression(argument, table)?;

            let param = self.symbols.symbol(parameter);
            if argument.result_type != param.base_type {
                return Err(Error::semantic(
                    argument.line,
                    format!(
                        "Cannot pass value of type '{}' to parameter '{}' of type '{}'",
                        self.symbols.type_name(argument.result_type),
                        param.name,
                        self.symbols.type_name(param.base_type)
                    ),
                ));
            }
        }

        call.symbol = Some(id);
        Ok(return_type)
    }

    fn resolve_return(&mut self, ret: &mut ReturnStatement, table: TableId) -> Result<(), Error> {
        let Some(function) = self.current_function else {
            panic!("BUG: return on line {} outside a function", ret.line);
        };

        let expected = self.symbols.symbol(function).base_type;
        let returns_void = expected == Some(self.primitive("void"));
        let name = self.symbols.name(function).to_string();

        match &mut ret.value {
            Some(value) => {
                self.resolve_expression(value, table)?;

                if returns_void {
                    return Err(Error::semantic(
                        ret.line,
                        format!("Function '{}' returns void and cannot return a value.", name),
                    ));
                }
                if value.result_type != expected {
                    return Err(Error::semantic(
                        ret.line,
                        format!(
                            "Cannot return value of type '{}' from function '{}' of type '{}'",
                            self.symbols.type_name(value.result_type),
                            name,
                            self.symbols.type_name(expected)
                        ),
                    ));
                }
            }
            None if !returns_void => {
                return Err(Error::semantic(
                    ret.line,
                    format!(
                        "Function '{}' must return a value of type '{}'.",
                        name,
                        self.symbols.type_name(expected)
                    ),
                ));
            }
            None => {}
        }

        Ok(())
    }

    /// Resolves an expression tree, setting the result type and constness
    /// of every node.
    fn resolve_expression(&mut self, expression: &mut Expression, table: TableId) -> Result<(), Error> {
        let line = expression.line;

        let (result_type, is_constant) = match &mut expression.kind {
            ExpressionKind::Constant(token) => (self.constant_type(token), true),
            ExpressionKind::Reference(reference) => {
                let id = self.find(table, &reference.reference, "Use of undeclared variable")?;

                let symbol = self.symbols.symbol(id);
                if !matches!(symbol.use_type, UseType::Variable | UseType::Parameter) {
                    return Err(Error::semantic(
                        line,
                        format!(
                            "Cannot use {} '{}' as a value",
                            symbol.description(),
                            symbol.name
                        ),
                    ));
                }
                let is_const = symbol.is_const;

                reference.symbol = Some(id);
                (Some(self.value_type(line, id)?), is_const)
            }
            ExpressionKind::Call(call) => (self.resolve_call(call, table)?, false),
            ExpressionKind::Binary(binary) => {
                self.resolve_expression(&mut binary.left, table)?;
                self.resolve_expression(&mut binary.right, table)?;

                if binary.left.result_type != binary.right.result_type {
                    return Err(Error::semantic(
                        line,
                        format!(
                            "Unable to perform {} on two different types.",
                            binary.operator
                        ),
                    ));
                }

                let result_type = if binary.operator.is_comparison() {
                    Some(self.primitive("bool"))
                } else {
                    binary.left.result_type
                };

                (
                    result_type,
                    binary.left.is_constant && binary.right.is_constant,
                )
            }
            ExpressionKind::Unary(unary) => {
                self.resolve_expression(&mut unary.operand, table)?;
                (unary.operand.result_type, unary.operand.is_constant)
            }
        };

        expression.result_type = result_type;
        expression.is_constant = is_constant;
        Ok(())
    }

    /// The type of a variable or parameter that is being read or written.
    fn value_type(&self, line: u32, id: SymbolId) -> Result<SymbolId, Error> {
        self.symbols.symbol(id).base_type.ok_or_else(|| {
            Error::semantic(
                line,
                format!(
                    "Use of variable '{}' before its declaration",
                    self.symbols.name(id)
                ),
            )
        })
    }

    fn constant_type(&self, token: &Token) -> Option<SymbolId> {
        let name = match token.kind {
            TokenKind::NullConst => return None,
            TokenKind::BoolConst => "bool",
            TokenKind::CharConst => "char",
            TokenKind::IntConst => "int",
            TokenKind::StrConst => "string",
            other => panic!("BUG: {:?} is not a constant token", other),
        };

        Some(self.primitive(name))
    }

    /// Looks up a built-in type in the module scope.
    fn primitive(&self, name: &str) -> SymbolId {
        self.symbols
            .find(self.symbols.root(), name, Scoping::LocalOnly)
            .unwrap_or_else(|| panic!("BUG: primitive '{}' is not registered", name))
    }

    fn find(&self, table: TableId, reference: &Reference, prefix: &str) -> Result<SymbolId, Error> {
        self.symbols
            .find(table, reference.name(), Scoping::Normal)
            .ok_or_else(|| {
                Error::semantic(
                    reference.line(),
                    format!("{} '{}'", prefix, reference.name()),
                )
            })
    }

    fn symbol_of(decl: &Decl) -> SymbolId {
        decl.symbol()
            .unwrap_or_else(|| panic!("BUG: '{}' was never declared", decl.name()))
    }

    fn table_of(table: Option<TableId>, line: u32) -> TableId {
        table.unwrap_or_else(|| panic!("BUG: scope on line {} was never declared", line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::semantic::Declarer;

    fn analyze(src: &str) -> Result<(Module, Symbols), Error> {
        let mut module = Parser::new(src).execute().unwrap();
        let mut symbols = Symbols::new();
        Declarer::new(&mut symbols).declare(&mut module)?;
        Resolver::new(&mut symbols).resolve(&mut module)?;
        Ok((module, symbols))
    }

    fn analyze_ok(src: &str) -> (Module, Symbols) {
        analyze(src).unwrap()
    }

    fn analyze_err(src: &str) -> Error {
        analyze(src).map(|_| ()).unwrap_err()
    }

    fn first_return(module: &Module) -> &Expression {
        let f = module.functions().next().unwrap();
        f.body
            .statements
            .iter()
            .find_map(|s| match s {
                Statement::Return(ret) => ret.value.as_ref(),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_resolves_types() {
        let (module, symbols) = analyze_ok(
            "var g : int = 3;
            function f(in a : int, ref b : char) : bool {
                var local : string = \"s\";
                var copy : char = b;
                return a < g;
            }",
        );

        let TopLevel::GlobalVariable(g) = &module.statements[0] else {
            panic!("Expected global variable");
        };
        let g = symbols.symbol(g.decl.symbol().unwrap());
        assert_eq!(symbols.type_name(g.base_type), "int");

        let f = module.functions().next().unwrap();
        let f_symbol = symbols.symbol(f.decl.symbol().unwrap());
        assert_eq!(symbols.type_name(f_symbol.base_type), "bool");

        let b = symbols.symbol(f_symbol.parameters[1]);
        assert_eq!(symbols.type_name(b.base_type), "char");

        let ret = first_return(&module);
        assert_eq!(symbols.type_name(ret.result_type), "bool");
        assert!(!ret.is_constant);
    }

    #[test]
    fn test_literal_types() {
        let cases = [
            ("5", "int"),
            ("'x'", "char"),
            ("\"s\"", "string"),
            ("true", "bool"),
        ];

        for (literal, ty) in cases {
            let src = format!("function f() : {} {{ return {}; }}", ty, literal);
            let (module, symbols) = analyze_ok(&src);
            let ret = first_return(&module);
            assert_eq!(symbols.type_name(ret.result_type), ty);
            assert!(ret.is_constant);
        }
    }

    #[test]
    fn test_constness_propagates() {
        let (module, symbols) = analyze_ok(
            "const k : int = 2;
            function f(a : int) : int {
                var v : int = 1;
                return -(k * 3) + v;
            }",
        );
        let ret = first_return(&module);
        assert!(!ret.is_constant);
        assert_eq!(symbols.type_name(ret.result_type), "int");

        let ExpressionKind::Binary(add) = &ret.kind else {
            panic!("Expected binary expression");
        };
        assert!(add.left.is_constant);
        assert!(!add.right.is_constant);
    }

    #[test]
    fn test_constant_initializer_from_other_constant() {
        analyze_ok("const a : int = 2;\nconst b : int = a * 4 + 1;");

        let err = analyze_err("var a : int = 2;\nconst b : int = a;");
        assert_eq!(err.line(), Some(2));
        assert_eq!(
            err.message(),
            "Initializer for constant 'b' must evaluate to a constant."
        );
    }

    #[test]
    fn test_constant_without_initializer() {
        // The parser rejects this, so build the tree by hand.
        let mut module = Parser::new("const k : int = 1;").execute().unwrap();
        let TopLevel::GlobalVariable(k) = &mut module.statements[0] else {
            panic!("Expected global variable");
        };
        k.initializer = None;

        let err = crate::semantic::analyze(&mut module).unwrap_err();
        assert_eq!(err.message(), "Initializer required for constant 'k'.");
    }

    #[test]
    fn test_undeclared_names() {
        let err = analyze_err("function f() : int {\n  return y;\n}");
        assert_eq!(err.line(), Some(2));
        assert_eq!(err.message(), "Use of undeclared variable 'y'");

        let err = analyze_err("function f() { g(); }");
        assert_eq!(err.message(), "Call to undeclared function 'g'");

        let err = analyze_err("function f() { y = 1; }");
        assert_eq!(err.message(), "Assignment to undeclared variable 'y'");

        let err = analyze_err("var x : float;");
        assert_eq!(err.message(), "Undeclared type 'float' for 'x'");

        let err = analyze_err("function f(p : float) { }");
        assert_eq!(err.message(), "Undeclared type 'float' for 'p'");

        let err = analyze_err("function f() : float { }");
        assert_eq!(err.message(), "Undeclared type 'float' for 'f'");
    }

    #[test]
    fn test_type_must_name_a_type() {
        let err = analyze_err("var a : int;\nvar b : a;");
        assert_eq!(err.line(), Some(2));
        assert_eq!(err.message(), "'a' is not a type (declared for 'b')");
    }

    #[test]
    fn test_binary_operands_must_match() {
        let err = analyze_err("function f() : int {\n  return 1 +\n 'c';\n}");
        assert_eq!(err.line(), Some(2));
        assert_eq!(err.message(), "Unable to perform + on two different types.");

        let err = analyze_err("function f() : bool { return 1 == true; }");
        assert_eq!(err.message(), "Unable to perform == on two different types.");
    }

    #[test]
    fn test_assignment_targets() {
        let cases = [
            ("const k : int = 1;\nfunction f() { k = 2; }", "Cannot assign a value to constant 'k'"),
            ("function g() { }\nfunction f() { g = 2; }", "Cannot assign a value to function 'g'"),
            ("function f(p : int) { p = 2; }", "Cannot assign a value to parameter 'p'"),
            ("function f(in p : int) { p = 2; }", "Cannot assign a value to parameter 'p'"),
            ("function f(out p : int) { p = 2; }", "Cannot assign a value to parameter 'p'"),
            ("function f(ref p : int) { p = 2; }", "Cannot assign a value to parameter 'p'"),
            ("function f() { int = 2; }", "Cannot assign a value to primitive 'int'"),
        ];

        for (src, message) in cases {
            assert_eq!(analyze_err(src).message(), message, "{}", src);
        }

        analyze_ok("function f(ref q : int) { var p : int; p = q; }");
    }

    #[test]
    fn test_assignment_type_mismatch() {
        let err = analyze_err("function f() {\n  var x : int;\n  x = 'c';\n}");
        assert_eq!(err.line(), Some(3));
        assert_eq!(
            err.message(),
            "Cannot assign value of 'char' to variable 'x' of type 'int'"
        );

        let err = analyze_err("function f() { var s : string; s = null; }");
        assert_eq!(
            err.message(),
            "Cannot assign value of 'null' to variable 's' of type 'string'"
        );
    }

    #[test]
    fn test_initializer_type_mismatch() {
        let err = analyze_err("var b : bool = 1;");
        assert_eq!(
            err.message(),
            "Cannot initialize 'b' of type 'bool' with a value of type 'int'"
        );
    }

    #[test]
    fn test_call_checks() {
        let err = analyze_err("function g(a : int) { }\nfunction f() { g(); }");
        assert_eq!(err.line(), Some(2));
        assert_eq!(err.message(), "Parameter count mismatch for call to function 'g'");

        let err = analyze_err("function f(a : int) { }\nfunction main() {\n  f(1, 2);\n}");
        assert_eq!(err.line(), Some(3));
        assert_eq!(err.message(), "Parameter count mismatch for call to function 'f'");

        let err = analyze_err("function g(a : int, c : char) { }\nfunction f() {\n  g(1,\n 2);\n}");
        assert_eq!(err.line(), Some(4));
        assert_eq!(
            err.message(),
            "Cannot pass value of type 'int' to parameter 'c' of type 'char'"
        );

        let err = analyze_err("var v : int;\nfunction f() { v(); }");
        assert_eq!(err.message(), "'v' is not a function");

        let err = analyze_err("function f() { _write(1); }");
        assert_eq!(err.message(), "Parameter count mismatch for call to function '_write'");

        analyze_ok("function f() { var ok : bool = _write(); _flush(); }");
    }

    #[test]
    fn test_call_in_global_initializer() {
        let err = analyze_err("function g() : int { return 1; }\nvar v : int = g();");
        assert_eq!(err.line(), Some(2));
        assert_eq!(
            err.message(),
            "Function 'g' cannot be called from a global initializer."
        );
    }

    #[test]
    fn test_call_result_type() {
        let (module, symbols) = analyze_ok(
            "function sq(x : int) : int { return x * x; }
            function f() : int { return sq(3) + 1; }",
        );
        let f = module.functions().nth(1).unwrap();
        let Statement::Return(ret) = &f.body.statements[0] else {
            panic!("Expected return");
        };
        let value = ret.value.as_ref().unwrap();
        assert_eq!(symbols.type_name(value.result_type), "int");
        assert!(!value.is_constant);
    }

    #[test]
    fn test_functions_may_be_called_before_definition() {
        analyze_ok(
            "function f() : int { return g(2); }
            function g(n : int) : int { return n; }",
        );
    }

    #[test]
    fn test_return_checks() {
        let err = analyze_err("function f() {\n  return 1;\n}");
        assert_eq!(err.line(), Some(2));
        assert_eq!(err.message(), "Function 'f' returns void and cannot return a value.");

        let err = analyze_err("function f() : int { return; }");
        assert_eq!(err.message(), "Function 'f' must return a value of type 'int'.");

        let err = analyze_err("function f() : int { return 'c'; }");
        assert_eq!(
            err.message(),
            "Cannot return value of type 'char' from function 'f' of type 'int'"
        );
    }

    #[test]
    fn test_names_are_not_values() {
        let err = analyze_err("function g() : int { return 1; }\nfunction f() : int { return g; }");
        assert_eq!(err.message(), "Cannot use function 'g' as a value");

        let err = analyze_err("function f() : int { return int; }");
        assert_eq!(err.message(), "Cannot use primitive 'int' as a value");
    }

    #[test]
    fn test_use_before_declaration() {
        let err = analyze_err("function f() {\n  var a : int = b;\n  var b : int;\n}");
        assert_eq!(err.line(), Some(2));
        assert_eq!(err.message(), "Use of variable 'b' before its declaration");
    }

    #[test]
    fn test_initializer_cannot_read_its_own_variable() {
        let err = analyze_err("function f() {\n  var x : int = x;\n}");
        assert_eq!(err.line(), Some(2));
        assert_eq!(err.message(), "Use of variable 'x' before its declaration");

        let err = analyze_err("var g : int = g + 1;");
        assert_eq!(err.message(), "Use of variable 'g' before its declaration");
    }

    #[test]
    fn test_globals_are_visible_in_bodies() {
        analyze_ok(
            "function f() : int { return late; }
            var late : int = 4;",
        );
    }

    #[test]
    fn test_conditions_are_not_type_checked() {
        analyze_ok("function f() { var i : int = 3; while (i) { i = i - 1; } if (i) { } }");
    }

    #[test]
    fn test_inner_scope_resolves_to_nearest() {
        let (module, symbols) = analyze_ok(
            "var g : int;
            function f(g : char) : char { return g; }",
        );
        let ret = first_return(&module);
        assert_eq!(symbols.type_name(ret.result_type), "char");
    }
}
