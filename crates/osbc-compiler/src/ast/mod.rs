// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Abstract Syntax Tree (AST) definitions for Orange Soda.
//!
//! The tree is produced by the parser and then annotated in place by the
//! semantic passes: declarations receive their [`SymbolId`], compound
//! statements and functions receive their [`TableId`], and expressions
//! receive a result type and a constness flag. Symbols themselves live in
//! the [`Symbols`](crate::symbols::Symbols) arena and are only referenced
//! from here by handle.

mod display;

use std::fmt;

use crate::lexer::Token;
use crate::symbols::{PassBy, SymbolId, TableId};

/// A complete source module.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Module {
    /// Leading `import` statements
    pub imports: Vec<Import>,
    /// Global variables and functions in source order
    pub statements: Vec<TopLevel>,
}

impl Module {
    /// Iterates over the functions defined in the module.
    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.statements.iter().filter_map(|statement| match statement {
            TopLevel::Function(function) => Some(function),
            TopLevel::GlobalVariable(_) => None,
        })
    }
}

/// An `import name;` statement. Parsed and kept, but otherwise unused.
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    /// The imported module name
    pub reference: Reference,
}

/// A statement allowed at module level.
#[derive(Debug, Clone, PartialEq)]
pub enum TopLevel {
    /// `var` or `const` outside any function
    GlobalVariable(VariableDecl),
    /// Function definition
    Function(Function),
}

/// A name used to refer to a symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    /// The identifier token
    pub ident: Token,
}

impl Reference {
    /// Creates a reference from an identifier token.
    pub fn new(ident: Token) -> Self {
        Self { ident }
    }

    /// Creates a reference that does not appear in the source, such as the
    /// `void` return type of a function that omits one. Implicit references
    /// are on line 0.
    pub fn implicit(name: &str) -> Self {
        Self {
            ident: Token::new(0, name, crate::lexer::TokenKind::Ident),
        }
    }

    /// The referenced name.
    pub fn name(&self) -> &str {
        &self.ident.literal
    }

    /// The line the reference appears on.
    pub fn line(&self) -> u32 {
        self.ident.line
    }

    /// Returns true if the reference was synthesized by the parser.
    pub fn is_implicit(&self) -> bool {
        self.ident.line == 0
    }
}

/// The part shared by every declaration: a name, a type and, once declared,
/// the symbol it introduced.
#[derive(Debug, Clone, PartialEq)]
pub struct Decl {
    /// The declared name
    pub ident: Token,
    /// The declared type (the return type, for functions)
    pub type_ref: Reference,
    symbol: Option<SymbolId>,
}

impl Decl {
    /// Creates an undeclared declaration.
    pub fn new(ident: Token, type_ref: Reference) -> Self {
        Self {
            ident,
            type_ref,
            symbol: None,
        }
    }

    /// The declared name.
    pub fn name(&self) -> &str {
        &self.ident.literal
    }

    /// The line of the declared name.
    pub fn line(&self) -> u32 {
        self.ident.line
    }

    /// The symbol created for this declaration, if declared yet.
    pub fn symbol(&self) -> Option<SymbolId> {
        self.symbol
    }

    /// Binds the declaration to its symbol.
    ///
    /// # Panics
    ///
    /// Panics if the declaration already has a symbol.
    pub fn set_symbol(&mut self, symbol: SymbolId) {
        if self.symbol.is_some() {
            panic!("BUG: symbol for '{}' assigned twice", self.name());
        }
        self.symbol = Some(symbol);
    }
}

/// A function definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Name and return type
    pub decl: Decl,
    /// Parameters in declaration order
    pub parameters: Vec<ParameterDecl>,
    /// The function body
    pub body: CompoundStatement,
    /// Scope holding the parameters, assigned by the declarer
    pub table: Option<TableId>,
}

/// A function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDecl {
    /// How the argument is passed
    pub pass_by: PassBy,
    /// Name and type
    pub decl: Decl,
}

/// A `var` or `const` declaration of a single name.
///
/// `var a, b : int;` is parsed into one declaration per name.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    /// True for `const`
    pub is_const: bool,
    /// Name and type
    pub decl: Decl,
    /// Optional initial value (always present for constants)
    pub initializer: Option<Expression>,
}

/// A statement inside a function body.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Local `var` or `const`
    VariableDecl(VariableDecl),
    /// `{ ... }`
    Compound(CompoundStatement),
    /// `name = expression;`
    Assignment(AssignmentStatement),
    /// `name(arguments);`
    Call(CallStatement),
    /// `return [expression];`
    Return(ReturnStatement),
    /// `while (condition) { ... }`
    While(WhileStatement),
    /// `if (condition) { ... } [else { ... }]`
    If(IfStatement),
}

/// A braced list of statements, which opens a new scope.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundStatement {
    /// Line of the opening brace
    pub line: u32,
    /// The statements in order
    pub statements: Vec<Statement>,
    /// Scope of the block, assigned by the declarer
    pub table: Option<TableId>,
}

impl CompoundStatement {
    /// Creates a block with no scope assigned.
    pub fn new(line: u32, statements: Vec<Statement>) -> Self {
        Self {
            line,
            statements,
            table: None,
        }
    }

    /// Returns true if any direct child declares a variable.
    pub fn has_var_decl(&self) -> bool {
        self.statements
            .iter()
            .any(|statement| matches!(statement, Statement::VariableDecl(_)))
    }

    /// Returns true if any direct child is a `return`.
    pub fn has_return(&self) -> bool {
        self.statements
            .iter()
            .any(|statement| matches!(statement, Statement::Return(_)))
    }

    /// Returns true if the last statement is a `return`.
    pub fn ends_with_return(&self) -> bool {
        matches!(self.statements.last(), Some(Statement::Return(_)))
    }
}

/// `name = expression;`
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentStatement {
    /// The assigned name
    pub reference: Reference,
    /// The value
    pub expression: Expression,
    /// The assigned symbol, set by the resolver
    pub symbol: Option<SymbolId>,
}

/// A function call, either as a statement or inside an expression.
#[derive(Debug, Clone, PartialEq)]
pub struct CallStatement {
    /// The called function
    pub reference: Reference,
    /// Arguments in order
    pub arguments: Vec<Expression>,
    /// The called function's symbol, set by the resolver
    pub symbol: Option<SymbolId>,
}

/// `return [expression];`
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    /// Line of the `return` keyword
    pub line: u32,
    /// The returned value
    pub value: Option<Expression>,
}

/// `while (condition) body`
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    /// Line of the `while` keyword
    pub line: u32,
    /// Loop condition
    pub condition: Expression,
    /// Loop body
    pub body: CompoundStatement,
}

/// `if (condition) true_part [else false_part]`
#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    /// Line of the `if` keyword
    pub line: u32,
    /// Branch condition
    pub condition: Expression,
    /// Taken when the condition holds
    pub true_part: CompoundStatement,
    /// Taken otherwise
    pub false_part: Option<CompoundStatement>,
}

/// An expression together with its semantic annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    /// Line of the expression's first token (the operator, for binaries)
    pub line: u32,
    /// What kind of expression this is
    pub kind: ExpressionKind,
    /// The type the expression evaluates to; `None` before resolution and
    /// for `null`
    pub result_type: Option<SymbolId>,
    /// True if the value is known at compile time
    pub is_constant: bool,
}

/// The different kinds of expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    /// A literal
    Constant(Token),
    /// A variable, parameter or constant
    Reference(ReferenceExpression),
    /// A function call used for its value
    Call(CallStatement),
    /// `left op right`
    Binary(BinaryExpression),
    /// `op operand`
    Unary(UnaryExpression),
}

/// A name used as a value.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceExpression {
    /// The name
    pub reference: Reference,
    /// The referenced symbol, set by the resolver
    pub symbol: Option<SymbolId>,
}

/// A binary operation.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    /// The operator
    pub operator: BinaryOperator,
    /// Left operand
    pub left: Box<Expression>,
    /// Right operand
    pub right: Box<Expression>,
}

/// A unary operation.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpression {
    /// The operator
    pub operator: UnaryOperator,
    /// The operand
    pub operand: Box<Expression>,
}

impl Expression {
    fn new(line: u32, kind: ExpressionKind) -> Self {
        Self {
            line,
            kind,
            result_type: None,
            is_constant: false,
        }
    }

    /// A literal. Literals are always constant.
    pub fn constant(token: Token) -> Self {
        let mut expression = Self::new(token.line, ExpressionKind::Constant(token));
        expression.is_constant = true;
        expression
    }

    /// A reference to a named value.
    pub fn reference(reference: Reference) -> Self {
        Self::new(
            reference.line(),
            ExpressionKind::Reference(ReferenceExpression {
                reference,
                symbol: None,
            }),
        )
    }

    /// A call used as a value.
    pub fn call(call: CallStatement) -> Self {
        Self::new(call.reference.line(), ExpressionKind::Call(call))
    }

    /// A binary operation.
    pub fn binary(line: u32, operator: BinaryOperator, left: Expression, right: Expression) -> Self {
        Self::new(
            line,
            ExpressionKind::Binary(BinaryExpression {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            }),
        )
    }

    /// A unary operation.
    pub fn unary(line: u32, operator: UnaryOperator, operand: Expression) -> Self {
        Self::new(
            line,
            ExpressionKind::Unary(UnaryExpression {
                operator,
                operand: Box::new(operand),
            }),
        )
    }
}

/// Binary operators, loosest binding last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `%`
    Modulo,
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `<<`
    LeftShift,
    /// `>>`
    RightShift,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `<=`
    LessEqual,
    /// `>=`
    GreaterEqual,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
}

impl BinaryOperator {
    /// The operator as written in source.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::LeftShift => "<<",
            BinaryOperator::RightShift => ">>",
            BinaryOperator::Less => "<",
            BinaryOperator::Greater => ">",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
        }
    }

    /// Binding strength; higher binds tighter.
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOperator::Multiply | BinaryOperator::Divide | BinaryOperator::Modulo => 5,
            BinaryOperator::Add | BinaryOperator::Subtract => 4,
            BinaryOperator::LeftShift | BinaryOperator::RightShift => 3,
            BinaryOperator::Less
            | BinaryOperator::Greater
            | BinaryOperator::LessEqual
            | BinaryOperator::GreaterEqual => 2,
            BinaryOperator::Equal | BinaryOperator::NotEqual => 1,
        }
    }

    /// Returns true for operators that produce a `bool`.
    pub fn is_comparison(&self) -> bool {
        self.precedence() <= 2
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    /// `-`
    Negate,
    /// `!`
    Not,
    /// `~`
    BitNot,
}

impl UnaryOperator {
    /// The operator as written in source.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOperator::Negate => "-",
            UnaryOperator::Not => "!",
            UnaryOperator::BitNot => "~",
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
