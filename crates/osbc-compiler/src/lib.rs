// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # osbc-compiler
//!
//! The bootstrap compiler for the Orange Soda language.
//!
//! ## Overview
//!
//! Source text goes through four stages:
//! - [`lexer`]: line-oriented tokenizer with one token of lookahead
//! - [`parser`]: recursive descent parser producing the [`ast`]
//! - [`semantic`]: declaration and three-pass resolution over the
//!   [`symbols`] arena
//! - [`compiler`]: stack-machine code generation
//!
//! Every stage stops at the first error, reported as an [`Error`] carrying
//! the source line.
//!
//! ## Quick Start
//!
//! ```rust
//! let bytecode = osbc_compiler::compile("function main() { }").unwrap();
//! assert_eq!(bytecode.to_string(), "main:\n  RTS\n\n");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod compiler;
pub mod lexer;
pub mod parser;
pub mod semantic;
pub mod symbols;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

pub use ast::Module;
pub use compiler::Bytecode;
pub use symbols::Symbols;

/// Errors reported by the compiler.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed source text
    #[error("line {line}: {message}")]
    Syntax {
        /// Line of the offending token
        line: u32,
        /// Description of the problem
        message: String,
    },

    /// Well-formed source that breaks a naming or typing rule
    #[error("line {line}: {message}")]
    Semantic {
        /// Line of the offending construct
        line: u32,
        /// Description of the problem
        message: String,
    },

    /// The source file could not be read
    #[error("Unable to open file '{}' for reading", .path.display())]
    Open {
        /// The file that was requested
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Creates a syntax error.
    pub fn syntax(line: u32, message: impl Into<String>) -> Self {
        Error::Syntax {
            line,
            message: message.into(),
        }
    }

    /// Creates a semantic error.
    pub fn semantic(line: u32, message: impl Into<String>) -> Self {
        Error::Semantic {
            line,
            message: message.into(),
        }
    }

    /// The source line the error refers to, if any.
    pub fn line(&self) -> Option<u32> {
        match self {
            Error::Syntax { line, .. } | Error::Semantic { line, .. } => Some(*line),
            Error::Open { .. } => None,
        }
    }

    /// The error description without the line prefix.
    pub fn message(&self) -> String {
        match self {
            Error::Syntax { message, .. } | Error::Semantic { message, .. } => message.clone(),
            Error::Open { .. } => self.to_string(),
        }
    }
}

/// A module that has been parsed and resolved.
#[derive(Debug)]
pub struct Analysis {
    /// The annotated tree
    pub module: Module,
    /// Every symbol the tree refers to
    pub symbols: Symbols,
}

impl Analysis {
    /// Generates bytecode for the analyzed module.
    pub fn generate(&self) -> Bytecode {
        compiler::CodeGen::new(&self.symbols).compile(&self.module)
    }
}

/// Parses `source` into an unresolved module.
pub fn parse(source: &str) -> Result<Module, Error> {
    parser::Parser::new(source).execute()
}

/// Parses and resolves `source`.
pub fn analyze(source: &str) -> Result<Analysis, Error> {
    let mut module = parse(source)?;
    let symbols = semantic::analyze(&mut module)?;
    Ok(Analysis { module, symbols })
}

/// Runs the whole pipeline over `source`.
pub fn compile(source: &str) -> Result<Bytecode, Error> {
    Ok(analyze(source)?.generate())
}

/// Reads a source file.
pub fn read_source(path: &Path) -> Result<String, Error> {
    debug!(path = %path.display(), "reading source");
    std::fs::read_to_string(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads and compiles a source file.
pub fn compile_file(path: &Path) -> Result<Bytecode, Error> {
    compile(&read_source(path)?)
}
