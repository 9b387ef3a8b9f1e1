// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Source-like printing of the AST.
//!
//! The output parses back into an equivalent tree. Binary expressions are
//! only parenthesized where precedence requires it.

use std::fmt::{self, Write};

use super::*;

const INDENT: &str = "    ";

/// Binds tighter than any binary operator.
const UNARY_PRECEDENCE: u8 = 6;

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for import in &self.imports {
            writeln!(f, "import {};", import.reference.name())?;
        }

        let mut first = self.imports.is_empty();

        for statement in &self.statements {
            match statement {
                TopLevel::GlobalVariable(variable) => {
                    write_variable(f, variable)?;
                    f.write_char('\n')?;
                }
                TopLevel::Function(function) => {
                    if !first {
                        f.write_char('\n')?;
                    }
                    write_function(f, function)?;
                    f.write_char('\n')?;
                }
            }
            first = false;
        }

        Ok(())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_statement(f, self, 0)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expression(f, self, 0)
    }
}

fn write_function(f: &mut fmt::Formatter<'_>, function: &Function) -> fmt::Result {
    write!(f, "function {}(", function.decl.name())?;

    for (i, parameter) in function.parameters.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        if parameter.pass_by != PassBy::Default {
            write!(f, "{} ", parameter.pass_by)?;
        }
        write!(f, "{} : {}", parameter.decl.name(), parameter.decl.type_ref.name())?;
    }

    f.write_char(')')?;

    if !function.decl.type_ref.is_implicit() {
        write!(f, " : {}", function.decl.type_ref.name())?;
    }

    f.write_char(' ')?;
    write_compound(f, &function.body, 0)
}

fn write_variable(f: &mut fmt::Formatter<'_>, variable: &VariableDecl) -> fmt::Result {
    let keyword = if variable.is_const { "const" } else { "var" };
    write!(
        f,
        "{} {} : {}",
        keyword,
        variable.decl.name(),
        variable.decl.type_ref.name()
    )?;

    if let Some(initializer) = &variable.initializer {
        write!(f, " = {}", initializer)?;
    }

    f.write_char(';')
}

fn write_compound(
    f: &mut fmt::Formatter<'_>,
    compound: &CompoundStatement,
    depth: usize,
) -> fmt::Result {
    f.write_str("{\n")?;

    for statement in &compound.statements {
        indent(f, depth + 1)?;
        write_statement(f, statement, depth + 1)?;
        f.write_char('\n')?;
    }

    indent(f, depth)?;
    f.write_char('}')
}

fn write_statement(f: &mut fmt::Formatter<'_>, statement: &Statement, depth: usize) -> fmt::Result {
    match statement {
        Statement::VariableDecl(variable) => write_variable(f, variable),
        Statement::Compound(compound) => write_compound(f, compound, depth),
        Statement::Assignment(assignment) => {
            write!(
                f,
                "{} = {};",
                assignment.reference.name(),
                assignment.expression
            )
        }
        Statement::Call(call) => {
            write_call(f, call)?;
            f.write_char(';')
        }
        Statement::Return(ret) => match &ret.value {
            Some(value) => write!(f, "return {};", value),
            None => f.write_str("return;"),
        },
        Statement::While(stmt) => {
            write!(f, "while ({}) ", stmt.condition)?;
            write_compound(f, &stmt.body, depth)
        }
        Statement::If(stmt) => {
            write!(f, "if ({}) ", stmt.condition)?;
            write_compound(f, &stmt.true_part, depth)?;

            if let Some(false_part) = &stmt.false_part {
                f.write_str(" else ")?;
                write_compound(f, false_part, depth)?;
            }

            Ok(())
        }
    }
}

fn write_call(f: &mut fmt::Formatter<'_>, call: &CallStatement) -> fmt::Result {
    write!(f, "{}(", call.reference.name())?;

    for (i, argument) in call.arguments.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", argument)?;
    }

    f.write_char(')')
}

/// Writes `expression`, wrapping it in parentheses if it binds looser than
/// `min_precedence`.
fn write_expression(
    f: &mut fmt::Formatter<'_>,
    expression: &Expression,
    min_precedence: u8,
) -> fmt::Result {
    match &expression.kind {
        ExpressionKind::Constant(token) => f.write_str(&token.literal),
        ExpressionKind::Reference(reference) => f.write_str(reference.reference.name()),
        ExpressionKind::Call(call) => write_call(f, call),
        ExpressionKind::Binary(binary) => {
            let precedence = binary.operator.precedence();
            let parenthesize = precedence < min_precedence;

            if parenthesize {
                f.write_char('(')?;
            }

            // Left associative: an equal-precedence right operand needs parens.
            write_expression(f, &binary.left, precedence)?;
            write!(f, " {} ", binary.operator)?;
            write_expression(f, &binary.right, precedence + 1)?;

            if parenthesize {
                f.write_char(')')?;
            }

            Ok(())
        }
        ExpressionKind::Unary(unary) => {
            f.write_str(unary.operator.as_str())?;
            write_expression(f, &unary.operand, UNARY_PRECEDENCE)
        }
    }
}

fn indent(f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        f.write_str(INDENT)?;
    }
    Ok(())
}
