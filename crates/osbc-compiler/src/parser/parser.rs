// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! The main parser implementation: modules, declarations and statements.

use tracing::debug;

use crate::Error;
use crate::ast::*;
use crate::lexer::{Lexer, Token, TokenKind};
use crate::symbols::PassBy;

/// A recursive descent parser for Orange Soda.
pub struct Parser<'a> {
    pub(super) lexer: Lexer<'a>,
    pub(super) current: Token,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given source code.
    pub fn new(source: &'a str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.get().clone();
        Self { lexer, current }
    }

    /// Parses the whole source into a [`Module`].
    ///
    /// Parsing stops at the first error.
    pub fn execute(&mut self) -> Result<Module, Error> {
        let imports = self.parse_imports()?;
        let mut statements = Vec::new();

        while !self.is_at_end() {
            self.parse_top_level(&mut statements)?;
        }

        debug!(
            imports = imports.len(),
            statements = statements.len(),
            "parsed module"
        );

        Ok(Module {
            imports,
            statements,
        })
    }

    fn parse_imports(&mut self) -> Result<Vec<Import>, Error> {
        let mut imports = Vec::new();

        while self.check(TokenKind::Import) {
            self.advance();
            let reference = self.parse_reference()?;
            self.expect(TokenKind::Char(';'))?;
            imports.push(Import { reference });
        }

        Ok(imports)
    }

    fn parse_top_level(&mut self, statements: &mut Vec<TopLevel>) -> Result<(), Error> {
        match self.current.kind {
            TokenKind::Function => {
                let function = self.parse_function()?;
                statements.push(TopLevel::Function(function));
            }
            TokenKind::Var | TokenKind::Const => {
                let variables = self.parse_variable_declaration()?;
                self.expect(TokenKind::Char(';'))?;
                statements.extend(variables.into_iter().map(TopLevel::GlobalVariable));
            }
            _ => {
                return Err(self.error_or_lexical(format!(
                    "Unexpected {} token",
                    self.current.kind
                )));
            }
        }

        Ok(())
    }

    /// Parses `var a, b : T [= e]` or `const k : T = e`, without the
    /// trailing semicolon. Each name becomes its own declaration sharing
    /// the type. The first name takes the initializer and every later name
    /// is initialized from the first.
    fn parse_variable_declaration(&mut self) -> Result<Vec<VariableDecl>, Error> {
        let keyword = self.advance();
        let is_const = keyword.kind == TokenKind::Const;

        let mut names = vec![self.expect_identifier()?];

        if !is_const {
            while self.check(TokenKind::Char(',')) {
                self.advance();
                names.push(self.expect_identifier()?);
            }
        }

        if !self.check(TokenKind::Char(':')) {
            if matches!(self.current.kind, TokenKind::Char(';' | '=')) {
                return Err(Error::syntax(
                    names[0].line,
                    format!(
                        "{} '{}' requires type in this compiler.",
                        keyword.literal, names[0].literal
                    ),
                ));
            }
            return Err(self.unexpected(TokenKind::Char(':')));
        }

        self.advance();
        let type_ref = self.parse_reference()?;

        let initializer = if self.check(TokenKind::Char('=')) {
            self.advance();
            Some(self.parse_expression()?)
        } else {
            None
        };

        if is_const && initializer.is_none() {
            return Err(Error::syntax(
                names[0].line,
                format!("Initializer required for constant '{}'.", names[0].literal),
            ));
        }

        // The initializer runs once; later names copy the first.
        let copy = initializer
            .as_ref()
            .map(|_| Expression::reference(Reference::new(names[0].clone())));
        let mut initializer = initializer;

        Ok(names
            .into_iter()
            .map(|ident| VariableDecl {
                is_const,
                decl: Decl::new(ident, type_ref.clone()),
                initializer: initializer.take().or_else(|| copy.clone()),
            })
            .collect())
    }

    fn parse_function(&mut self) -> Result<Function, Error> {
        self.expect(TokenKind::Function)?;
        let ident = self.expect_identifier()?;

        self.expect(TokenKind::Char('('))?;
        let parameters = self.parse_parameters()?;
        self.expect(TokenKind::Char(')'))?;

        let type_ref = if self.check(TokenKind::Char(':')) {
            self.advance();
            self.parse_reference()?
        } else {
            Reference::implicit("void")
        };

        let body = self.parse_compound_statement()?;

        Ok(Function {
            decl: Decl::new(ident, type_ref),
            parameters,
            body,
            table: None,
        })
    }

    fn parse_parameters(&mut self) -> Result<Vec<ParameterDecl>, Error> {
        let mut parameters = Vec::new();

        if self.check(TokenKind::Char(')')) {
            return Ok(parameters);
        }

        loop {
            parameters.push(self.parse_parameter()?);

            if !self.check(TokenKind::Char(',')) {
                break;
            }
            self.advance();
        }

        Ok(parameters)
    }

    fn parse_parameter(&mut self) -> Result<ParameterDecl, Error> {
        let pass_by = match self.current.kind {
            TokenKind::In => PassBy::In,
            TokenKind::Out => PassBy::Out,
            TokenKind::Ref => PassBy::Ref,
            _ => PassBy::Default,
        };
        if pass_by != PassBy::Default {
            self.advance();
        }

        let ident = self.expect_identifier()?;
        self.expect(TokenKind::Char(':'))?;
        let type_ref = self.parse_reference()?;

        Ok(ParameterDecl {
            pass_by,
            decl: Decl::new(ident, type_ref),
        })
    }

    pub(super) fn parse_compound_statement(&mut self) -> Result<CompoundStatement, Error> {
        let line = self.current.line;
        self.expect(TokenKind::Char('{'))?;

        let mut statements = Vec::new();
        while !self.is_at_end() && self.parse_statement(&mut statements)? {}

        self.expect(TokenKind::Char('}'))?;

        Ok(CompoundStatement::new(line, statements))
    }

    /// Parses one statement into `body`.
    ///
    /// Returns `false` when the current token cannot start a statement,
    /// which ends the enclosing statement list.
    fn parse_statement(&mut self, body: &mut Vec<Statement>) -> Result<bool, Error> {
        match self.current.kind {
            TokenKind::Var | TokenKind::Const => {
                let variables = self.parse_variable_declaration()?;
                self.expect(TokenKind::Char(';'))?;
                body.extend(variables.into_iter().map(Statement::VariableDecl));
            }
            TokenKind::If => body.push(self.parse_if_statement()?),
            TokenKind::While => body.push(self.parse_while_statement()?),
            TokenKind::Return => {
                body.push(self.parse_return_statement()?);
                self.expect(TokenKind::Char(';'))?;
            }
            TokenKind::Char('{') => {
                body.push(Statement::Compound(self.parse_compound_statement()?));
            }
            TokenKind::Ident => {
                body.push(self.parse_simple_statement()?);
                self.expect(TokenKind::Char(';'))?;
            }
            TokenKind::Char(';') => {
                self.advance();
            }
            _ => return Ok(false),
        }

        Ok(true)
    }

    fn parse_if_statement(&mut self) -> Result<Statement, Error> {
        let line = self.advance().line;

        self.expect(TokenKind::Char('('))?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::Char(')'))?;

        let true_part = self.parse_compound_statement()?;

        let false_part = if self.check(TokenKind::Else) {
            self.advance();
            Some(self.parse_compound_statement()?)
        } else {
            None
        };

        Ok(Statement::If(IfStatement {
            line,
            condition,
            true_part,
            false_part,
        }))
    }

    fn parse_while_statement(&mut self) -> Result<Statement, Error> {
        let line = self.advance().line;

        self.expect(TokenKind::Char('('))?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::Char(')'))?;

        let body = self.parse_compound_statement()?;

        Ok(Statement::While(WhileStatement {
            line,
            condition,
            body,
        }))
    }

    fn parse_return_statement(&mut self) -> Result<Statement, Error> {
        let line = self.advance().line;

        let value = if self.check(TokenKind::Char(';')) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        Ok(Statement::Return(ReturnStatement { line, value }))
    }

    /// An assignment or a call, both starting with a name.
    fn parse_simple_statement(&mut self) -> Result<Statement, Error> {
        let reference = self.parse_reference()?;

        match self.current.kind {
            TokenKind::Char('=') => {
                self.advance();
                let expression = self.parse_expression()?;
                Ok(Statement::Assignment(AssignmentStatement {
                    reference,
                    expression,
                    symbol: None,
                }))
            }
            TokenKind::Char('(') => Ok(Statement::Call(self.parse_call(reference)?)),
            _ => Err(self.error_or_lexical("Expected assignment or function call".to_string())),
        }
    }

    /// Parses the argument list of a call to `reference`.
    pub(super) fn parse_call(&mut self, reference: Reference) -> Result<CallStatement, Error> {
        self.expect(TokenKind::Char('('))?;

        let mut arguments = Vec::new();

        if !self.check(TokenKind::Char(')')) {
            loop {
                arguments.push(self.parse_expression()?);

                if !self.check(TokenKind::Char(',')) {
                    break;
                }
                self.advance();
            }
        }

        self.expect(TokenKind::Char(')'))?;

        Ok(CallStatement {
            reference,
            arguments,
            symbol: None,
        })
    }

    pub(super) fn parse_reference(&mut self) -> Result<Reference, Error> {
        Ok(Reference::new(self.expect_identifier()?))
    }

    // Helper methods

    /// Moves to the next token, returning the one just consumed.
    pub(super) fn advance(&mut self) -> Token {
        let next = self.lexer.get().clone();
        std::mem::replace(&mut self.current, next)
    }

    pub(super) fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    pub(super) fn expect(&mut self, kind: TokenKind) -> Result<Token, Error> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(kind))
        }
    }

    fn expect_identifier(&mut self) -> Result<Token, Error> {
        self.expect(TokenKind::Ident)
    }

    fn is_at_end(&self) -> bool {
        self.current.is_end()
    }

    /// The error for finding the current token where `expected` belongs.
    fn unexpected(&self, expected: TokenKind) -> Error {
        self.error_or_lexical(format!(
            "Unexpected {} token, expecting {}",
            self.current.kind, expected
        ))
    }

    /// A syntax error on the current line, unless the current token is a
    /// lexical error, which is reported instead.
    pub(super) fn error_or_lexical(&self, message: String) -> Error {
        match self.current.kind {
            TokenKind::Error(err) => Error::syntax(
                self.current.line,
                format!("Invalid token {}: {}", self.current.literal, err),
            ),
            _ => Error::syntax(self.current.line, message),
        }
    }
}
