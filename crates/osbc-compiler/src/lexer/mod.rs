// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Lexical analysis (tokenization) for Orange Soda source code.
//!
//! The lexer transforms source text into a stream of tokens that can be
//! consumed by the parser. Input is processed one line at a time; tokens
//! never span lines.
//!
//! ## Structure
//!
//! - `lexer.rs` - Main `Lexer` struct with lookahead and pushback
//! - `token.rs` - `Token` and `TokenKind` definitions
//! - `literals.rs` - Escape sequence decoding for char and string literals
//!
//! ## Usage
//!
//! ```rust
//! use osbc_compiler::lexer::{Lexer, TokenKind};
//!
//! let mut lexer = Lexer::new("var x : int;");
//!
//! loop {
//!     let token = lexer.get();
//!     if matches!(token.kind, TokenKind::EndOfFile) {
//!         break;
//!     }
//!     println!("{:?}", token.kind);
//! }
//! ```
//!
//! Malformed literals do not abort lexing; they come back as
//! [`TokenKind::Error`] tokens and the parser reports them.

#[allow(clippy::module_inception)]
mod lexer;
mod literals;
mod token;

pub use lexer::Lexer;
pub use token::{LexError, Token, TokenKind};
