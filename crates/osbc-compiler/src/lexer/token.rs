// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Token definitions for the Orange Soda lexer.

use std::fmt;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Line the token starts on (1-based)
    pub line: u32,
    /// Raw source text of the token, quotes included for literals
    pub literal: String,
    /// The kind of token
    pub kind: TokenKind,
}

impl Token {
    /// Creates a new token.
    pub fn new(line: u32, literal: impl Into<String>, kind: TokenKind) -> Self {
        Self {
            line,
            literal: literal.into(),
            kind,
        }
    }

    /// The placeholder token the lexer starts with.
    pub fn null() -> Self {
        Self::new(0, "", TokenKind::Null)
    }

    /// Returns true for tokens that terminate the token stream.
    ///
    /// Lexical errors do not; the parser reports them when it tries to
    /// accept them.
    pub fn is_end(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Null | TokenKind::EndOfFile | TokenKind::Unknown
        )
    }
}

/// Errors detected while scanning a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexError {
    /// Unknown escape sequence or malformed numeric escape
    InvalidSequence,
    /// The line ended inside a literal
    UnexpectedEol,
    /// A character literal was not closed
    UnexpectedCharacter,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::InvalidSequence => write!(f, "invalid escape sequence"),
            LexError::UnexpectedEol => write!(f, "unexpected end of line"),
            LexError::UnexpectedCharacter => write!(f, "unexpected character"),
        }
    }
}

/// The different kinds of tokens in Orange Soda.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Sentinels
    /// No token yet (not the `null` keyword)
    Null,
    /// End of input
    EndOfFile,
    /// Lexical error
    Error(LexError),
    /// Token the lexer could not classify
    Unknown,

    // Literals
    /// `null`
    NullConst,
    /// `true` or `false`
    BoolConst,
    /// Character literal
    CharConst,
    /// Integer literal
    IntConst,
    /// String literal
    StrConst,

    // References
    /// `base`
    BaseRef,
    /// `this`
    ThisRef,
    /// Identifier
    Ident,

    // Keywords
    /// `if`
    If,
    /// `in`
    In,
    /// `for`
    For,
    /// `out`
    Out,
    /// `ref`
    Ref,
    /// `set`
    Set,
    /// `var`
    Var,
    /// `else`
    Else,
    /// `enum`
    Enum,
    /// `break`
    Break,
    /// `class`
    Class,
    /// `const`
    Const,
    /// `while`
    While,
    /// `export`
    Export,
    /// `import`
    Import,
    /// `return`
    Return,
    /// `switch`
    Switch,
    /// `continue`
    Continue,
    /// `function`
    Function,
    /// `interface`
    Interface,

    // Multi-character operators
    /// `==`
    Equality,
    /// `!=`
    NotEqual,
    /// `>=`
    GreatEqual,
    /// `<=`
    LessEqual,
    /// `<<`
    LeftShift,
    /// `>>`
    RightShift,
    /// `//`
    EolComment,
    /// `/*`
    CommentStart,
    /// `*/`
    CommentEnd,

    /// Any other single character (punctuation and operators)
    Char(char),
}

impl TokenKind {
    /// Looks up a reserved word, returning `None` for plain identifiers.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "if" => TokenKind::If,
            "in" => TokenKind::In,
            "for" => TokenKind::For,
            "out" => TokenKind::Out,
            "ref" => TokenKind::Ref,
            "set" => TokenKind::Set,
            "var" => TokenKind::Var,
            "base" => TokenKind::BaseRef,
            "else" => TokenKind::Else,
            "enum" => TokenKind::Enum,
            "null" => TokenKind::NullConst,
            "this" => TokenKind::ThisRef,
            "true" | "false" => TokenKind::BoolConst,
            "break" => TokenKind::Break,
            "class" => TokenKind::Class,
            "const" => TokenKind::Const,
            "while" => TokenKind::While,
            "export" => TokenKind::Export,
            "import" => TokenKind::Import,
            "return" => TokenKind::Return,
            "switch" => TokenKind::Switch,
            "continue" => TokenKind::Continue,
            "function" => TokenKind::Function,
            "interface" => TokenKind::Interface,
            _ => return None,
        };

        Some(kind)
    }

    /// Returns true for the literal constant kinds.
    pub fn is_constant(&self) -> bool {
        matches!(
            self,
            TokenKind::NullConst
                | TokenKind::BoolConst
                | TokenKind::CharConst
                | TokenKind::IntConst
                | TokenKind::StrConst
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Null => "nothing",
            TokenKind::EndOfFile => "end of file",
            TokenKind::Error(err) => return write!(f, "invalid ({})", err),
            TokenKind::Unknown => "unknown",

            TokenKind::NullConst => "null",
            TokenKind::BoolConst => "boolean constant",
            TokenKind::CharConst => "character constant",
            TokenKind::IntConst => "integer constant",
            TokenKind::StrConst => "string constant",

            TokenKind::BaseRef => "base",
            TokenKind::ThisRef => "this",
            TokenKind::Ident => "identifier",

            TokenKind::If => "if",
            TokenKind::In => "in",
            TokenKind::For => "for",
            TokenKind::Out => "out",
            TokenKind::Ref => "ref",
            TokenKind::Set => "set",
            TokenKind::Var => "var",
            TokenKind::Else => "else",
            TokenKind::Enum => "enum",
            TokenKind::Break => "break",
            TokenKind::Class => "class",
            TokenKind::Const => "const",
            TokenKind::While => "while",
            TokenKind::Export => "export",
            TokenKind::Import => "import",
            TokenKind::Return => "return",
            TokenKind::Switch => "switch",
            TokenKind::Continue => "continue",
            TokenKind::Function => "function",
            TokenKind::Interface => "interface",

            TokenKind::Equality => "\"==\"",
            TokenKind::NotEqual => "\"!=\"",
            TokenKind::GreatEqual => "\">=\"",
            TokenKind::LessEqual => "\"<=\"",
            TokenKind::LeftShift => "\"<<\"",
            TokenKind::RightShift => "\">>\"",
            TokenKind::EolComment => "\"//\"",
            TokenKind::CommentStart => "\"/*\"",
            TokenKind::CommentEnd => "\"*/\"",

            TokenKind::Char(c) if c.is_ascii_graphic() || *c == ' ' => {
                return write!(f, "\"{}\"", c);
            }
            TokenKind::Char(c) => return write!(f, "character {:?}", c),
        };

        f.write_str(name)
    }
}
