// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Parser for Orange Soda source code.
//!
//! Transforms the token stream into an Abstract Syntax Tree (AST).
//!
//! ## Structure
//!
//! - `parser` - Modules, declarations and statements
//! - `expressions` - Expression precedence climbing
//!
//! ## Grammar
//!
//! ```text
//! module      := import* (function | var_decl ';')*
//! import      := 'import' IDENT ';'
//! var_decl    := 'var' IDENT (',' IDENT)* ':' IDENT ('=' expr)?
//!              | 'const' IDENT ':' IDENT '=' expr
//! function    := 'function' IDENT '(' params? ')' (':' IDENT)? compound
//! param       := ('in' | 'out' | 'ref')? IDENT ':' IDENT
//! compound    := '{' statement* '}'
//! statement   := var_decl ';' | compound | ';'
//!              | 'if' '(' expr ')' compound ('else' compound)?
//!              | 'while' '(' expr ')' compound
//!              | 'return' expr? ';'
//!              | IDENT '=' expr ';'
//!              | IDENT '(' args? ')' ';'
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use osbc_compiler::parser::Parser;
//!
//! let mut parser = Parser::new("function main() { }");
//! let module = parser.execute().expect("Should parse");
//! assert_eq!(module.statements.len(), 1);
//! ```

mod expressions;
#[allow(clippy::module_inception)]
mod parser;

pub use parser::Parser;
