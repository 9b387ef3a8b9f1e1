// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! The line-oriented lexer that produces tokens from source text.

use tracing::trace;

use super::literals::read_escape;
use super::{LexError, Token, TokenKind};

/// A lexer that tokenizes Orange Soda source code one line at a time.
///
/// The lexer keeps one token of lookahead: after [`Lexer::get`] the parser
/// can inspect both [`Lexer::current`] and [`Lexer::look_ahead`].
pub struct Lexer<'a> {
    lines: std::str::Lines<'a>,
    line: &'a str,
    position: usize,
    line_number: u32,
    eof: bool,
    backlog: Vec<Token>,
    current: Token,
    look_ahead: Token,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        let mut lexer = Self {
            lines: source.lines(),
            line: "",
            position: 0,
            line_number: 0,
            eof: false,
            backlog: Vec::new(),
            current: Token::null(),
            look_ahead: Token::null(),
        };

        lexer.read_line();
        lexer
    }

    /// The most recently returned token.
    pub fn current(&self) -> &Token {
        &self.current
    }

    /// The token that the next call to [`Lexer::get`] will return.
    pub fn look_ahead(&self) -> &Token {
        &self.look_ahead
    }

    /// The line the lexer is currently reading.
    pub fn line_number(&self) -> u32 {
        self.line_number
    }

    /// Advances to the next token and returns it.
    ///
    /// Once the end of file has been reached it is returned forever.
    pub fn get(&mut self) -> &Token {
        if self.current.kind == TokenKind::EndOfFile {
            return &self.current;
        }

        if matches!(self.look_ahead.kind, TokenKind::Null | TokenKind::Unknown) {
            self.look_ahead = self.get_token();
        }

        let next = self.get_token();
        self.current = std::mem::replace(&mut self.look_ahead, next);

        trace!(line = self.current.line, kind = ?self.current.kind, literal = %self.current.literal, "token");

        &self.current
    }

    /// Un-consumes a token so that it becomes the current token again.
    ///
    /// The current token moves into the lookahead slot and the previous
    /// lookahead is saved on the backlog.
    pub fn push_back(&mut self, token: Token) {
        let previous = std::mem::replace(&mut self.look_ahead, Token::null());

        if previous.kind != TokenKind::Null {
            self.backlog.push(previous);
        }

        self.look_ahead = std::mem::replace(&mut self.current, token);
    }

    /// Drains the lexer, returning every token up to and including the
    /// end of file.
    pub fn tokens(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            let token = self.get().clone();
            let done = token.is_end();
            tokens.push(token);

            if done {
                break;
            }
        }

        tokens
    }

    /// Reads a token from the backlog or the input, skipping comments.
    fn get_token(&mut self) -> Token {
        if let Some(token) = self.backlog.pop() {
            return token;
        }

        let mut in_comment = false;

        loop {
            if self.eof {
                return self.end_of_file();
            }

            if in_comment {
                match self.line[self.position..].find("*/") {
                    Some(index) => {
                        self.position += index + 2;
                        in_comment = false;
                    }
                    None => self.read_line(),
                }
                continue;
            }

            let token = self.get_token_raw();

            match token.kind {
                TokenKind::CommentStart => in_comment = true,
                TokenKind::EolComment => self.read_line(),
                _ => return token,
            }
        }
    }

    /// Reads a token from the current line, regardless of backlog or comments.
    fn get_token_raw(&mut self) -> Token {
        self.skip_whitespace();

        let Some(ch) = self.peek() else {
            return self.end_of_file();
        };

        match ch {
            '0'..='9' => self.scan_number(),
            c if c.is_ascii_alphabetic() || c == '_' => self.scan_word(),
            '"' => self.scan_string(),
            '\'' => self.scan_char(),
            _ => self.scan_special(ch),
        }
    }

    fn read_line(&mut self) {
        if self.eof {
            return;
        }

        match self.lines.next() {
            Some(line) => {
                self.line = line;
                self.line_number += 1;
            }
            None => {
                self.line = "";
                self.eof = true;
            }
        }

        self.position = 0;
    }

    fn skip_whitespace(&mut self) {
        while !self.eof {
            self.read_while(char::is_whitespace);

            if self.position < self.line.len() {
                break;
            }

            self.read_line();
        }
    }

    fn read_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek() {
            if !predicate(ch) {
                break;
            }
            self.position += ch.len_utf8();
        }
    }

    fn peek(&self) -> Option<char> {
        self.line[self.position..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    fn result(&self, start: usize, kind: TokenKind) -> Token {
        Token::new(self.line_number, &self.line[start..self.position], kind)
    }

    fn error(&self, start: usize, error: LexError) -> Token {
        self.result(start, TokenKind::Error(error))
    }

    fn end_of_file(&self) -> Token {
        Token::new(self.line_number, "", TokenKind::EndOfFile)
    }

    fn scan_number(&mut self) -> Token {
        let start = self.position;
        self.read_while(|c| c.is_ascii_digit());
        self.result(start, TokenKind::IntConst)
    }

    fn scan_word(&mut self) -> Token {
        let start = self.position;
        self.read_while(|c| c.is_ascii_alphanumeric() || c == '_');

        let word = &self.line[start..self.position];
        let kind = TokenKind::keyword(word).unwrap_or(TokenKind::Ident);

        self.result(start, kind)
    }

    fn scan_char(&mut self) -> Token {
        let start = self.position;
        let mut escape_error = None;

        self.advance(); // opening quote

        match self.peek() {
            None => return self.error(start, LexError::UnexpectedEol),
            Some('\\') => {
                if let Err(err) = read_escape(self.line, &mut self.position) {
                    if err == LexError::UnexpectedEol {
                        return self.error(start, err);
                    }
                    escape_error = Some(err);
                }
            }
            // Empty literal is the NUL character.
            Some('\'') => {}
            Some(_) => {
                self.advance();
            }
        }

        if self.peek() != Some('\'') {
            return self.error(start, LexError::UnexpectedCharacter);
        }

        self.advance();

        match escape_error {
            Some(err) => self.error(start, err),
            None => self.result(start, TokenKind::CharConst),
        }
    }

    fn scan_string(&mut self) -> Token {
        let start = self.position;

        self.advance(); // opening quote

        loop {
            match self.peek() {
                None => return self.error(start, LexError::UnexpectedEol),
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    if let Err(err) = read_escape(self.line, &mut self.position) {
                        return self.error(start, err);
                    }
                }
                Some(_) => {
                    self.advance();
                }
            }
        }

        self.result(start, TokenKind::StrConst)
    }

    fn scan_special(&mut self, first: char) -> Token {
        let start = self.position;

        self.advance();

        let kind = match first {
            '=' => self.scan_pair('=', TokenKind::Equality, first),
            '!' => self.scan_pair('=', TokenKind::NotEqual, first),
            '*' => self.scan_pair('/', TokenKind::CommentEnd, first),
            '>' => match self.peek() {
                Some('=') => self.consume(TokenKind::GreatEqual),
                Some('>') => self.consume(TokenKind::RightShift),
                _ => TokenKind::Char(first),
            },
            '<' => match self.peek() {
                Some('=') => self.consume(TokenKind::LessEqual),
                Some('<') => self.consume(TokenKind::LeftShift),
                _ => TokenKind::Char(first),
            },
            '/' => match self.peek() {
                Some('/') => self.consume(TokenKind::EolComment),
                Some('*') => self.consume(TokenKind::CommentStart),
                _ => TokenKind::Char(first),
            },
            _ => TokenKind::Char(first),
        };

        self.result(start, kind)
    }

    fn scan_pair(&mut self, second: char, kind: TokenKind, first: char) -> TokenKind {
        if self.peek() == Some(second) {
            self.consume(kind)
        } else {
            TokenKind::Char(first)
        }
    }

    fn consume(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }
}
