// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Code generation from the resolved AST to stack-machine bytecode.
//!
//! This module contains [`CodeGen`], which walks a module that has
//! been through semantic analysis and emits one labelled block per
//! function. Global variables and constants produce no code.

mod scope;


pub use scope::CodeScope;

use tracing::debug;

use crate::ast::*;
use crate::compiler::bytecode::{Bytecode, OpCode, Operand};
use crate::symbols::{Scoping, SymbolId, Symbols};

/// Compiles a resolved AST to bytecode.
pub struct CodeGen<'s> {
    symbols: &'s Symbols,
    void: Option<SymbolId>,
    next_label: u32,
}

impl<'s> CodeGen<'s> {
    /// Creates a compiler reading types from `symbols`.
    pub fn new(symbols: &'s Symbols) -> Self {
        Self {
            symbols,
            void: symbols.find(symbols.root(), "void", Scoping::LocalOnly),
            next_label: 0,
        }
    }

    /// Compiles every function of `module`.
    ///
    /// # Panics
    ///
    /// Panics if the module has not been resolved against the compiler's
    /// symbols.
    pub fn compile(&mut self, module: &Module) -> Bytecode {
        let mut root = CodeScope::new();

        for function in module.functions() {
            self.compile_function(function, &mut root);
        }

        let bytecode = root.finish();
        debug!(
            instructions = bytecode.instructions().count(),
            labels = self.next_label,
            "generated bytecode"
        );
        bytecode
    }

    fn compile_function(&mut self, function: &Function, parent: &mut CodeScope) {
        debug!(function = function.decl.name(), "emitting");

        let mut scope = CodeScope::new();

        scope.label(function.decl.name());
        self.compile_compound(&function.body, &mut scope);

        if !function.body.ends_with_return() {
            scope.emit(OpCode::Rts);
        }

        scope.separator();
        scope.write(parent);
    }

    fn compile_compound(&mut self, compound: &CompoundStatement, parent: &mut CodeScope) {
        let mut scope = CodeScope::new();

        for statement in &compound.statements {
            self.compile_statement(statement, &mut scope);
        }

        scope.write(parent);
    }

    fn compile_statement(&mut self, statement: &Statement, scope: &mut CodeScope) {
        match statement {
            Statement::VariableDecl(variable) => {
                if variable.is_const {
                    return;
                }
                if let Some(initializer) = &variable.initializer {
                    self.compile_expression(initializer, scope);
                    scope.emit_with(OpCode::Stv, Operand::Name(variable.decl.name().to_string()));
                }
            }
            Statement::Compound(compound) => self.compile_compound(compound, scope),
            Statement::Assignment(assignment) => {
                self.compile_expression(&assignment.expression, scope);
                scope.emit_with(
                    OpCode::Stv,
                    Operand::Name(assignment.reference.name().to_string()),
                );
            }
            Statement::Call(call) => {
                self.compile_call(call, scope);

                // Discard the unused result.
                if self.return_type(call) != self.void {
                    scope.emit(OpCode::Pop);
                }
            }
            Statement::Return(ret) => {
                if let Some(value) = &ret.value {
                    self.compile_expression(value, scope);
                }
                scope.emit(OpCode::Rts);
            }
            Statement::While(stmt) => {
                let top = self.new_label();
                let exit = self.new_label();

                scope.label(top.clone());
                self.compile_expression(&stmt.condition, scope);
                scope.emit(OpCode::Not);
                scope.emit_with(OpCode::Cbr, Operand::Label(exit.clone()));

                self.compile_compound(&stmt.body, scope);

                scope.emit_with(OpCode::Bra, Operand::Label(top));
                scope.label(exit);
            }
            Statement::If(stmt) => {
                let false_top = self.new_label();

                self.compile_expression(&stmt.condition, scope);
                scope.emit(OpCode::Not);
                scope.emit_with(OpCode::Cbr, Operand::Label(false_top.clone()));

                self.compile_compound(&stmt.true_part, scope);

                match &stmt.false_part {
                    Some(false_part) => {
                        let end = self.new_label();
                        scope.emit_with(OpCode::Bra, Operand::Label(end.clone()));
                        scope.label(false_top);
                        self.compile_compound(false_part, scope);
                        scope.label(end);
                    }
                    None => scope.label(false_top),
                }
            }
        }
    }

    fn compile_expression(&mut self, expression: &Expression, scope: &mut CodeScope) {
        match &expression.kind {
            ExpressionKind::Constant(token) => {
                scope.emit_with(OpCode::Ldc, Operand::Literal(token.literal.clone()));
            }
            ExpressionKind::Reference(reference) => {
                let opcode = if expression.is_constant {
                    OpCode::Ldc
                } else {
                    OpCode::Ldv
                };
                scope.emit_with(opcode, Operand::Name(reference.reference.name().to_string()));
            }
            ExpressionKind::Call(call) => self.compile_call(call, scope),
            ExpressionKind::Binary(binary) => {
                self.compile_expression(&binary.left, scope);
                self.compile_expression(&binary.right, scope);
                scope.emit(binary_opcode(binary.operator));
            }
            ExpressionKind::Unary(unary) => {
                self.compile_expression(&unary.operand, scope);
                scope.emit(unary_opcode(unary.operator));
            }
        }
    }

    fn compile_call(&mut self, call: &CallStatement, scope: &mut CodeScope) {
        for argument in &call.arguments {
            self.compile_expression(argument, scope);
        }
        scope.emit_with(OpCode::Jsr, Operand::Label(call.reference.name().to_string()));
    }

    fn return_type(&self, call: &CallStatement) -> Option<SymbolId> {
        let function = call.symbol.unwrap_or_else(|| {
            panic!("BUG: call to '{}' was never resolved", call.reference.name())
        });
        self.symbols.symbol(function).base_type
    }

    fn new_label(&mut self) -> String {
        let label = format!("__auto_lab_{}", self.next_label);
        self.next_label += 1;
        label
    }
}

fn binary_opcode(operator: BinaryOperator) -> OpCode {
    match operator {
        BinaryOperator::Multiply => OpCode::Mul,
        BinaryOperator::Divide => OpCode::Div,
        BinaryOperator::Modulo => OpCode::Mod,
        BinaryOperator::Add => OpCode::Add,
        BinaryOperator::Subtract => OpCode::Sub,
        BinaryOperator::LeftShift => OpCode::Shl,
        BinaryOperator::RightShift => OpCode::Shr,
        BinaryOperator::Less => OpCode::Lt,
        BinaryOperator::Greater => OpCode::Gt,
        BinaryOperator::LessEqual => OpCode::Lte,
        BinaryOperator::GreaterEqual => OpCode::Gte,
        BinaryOperator::Equal => OpCode::Equ,
        BinaryOperator::NotEqual => OpCode::Neq,
    }
}

fn unary_opcode(operator: UnaryOperator) -> OpCode {
    match operator {
        UnaryOperator::Negate => OpCode::Neg,
        UnaryOperator::Not | UnaryOperator::BitNot => OpCode::Not,
    }
}
