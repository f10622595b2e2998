mod expr;
mod stmt;

use crate::ast::{Program, Stmt};
use crate::lexer::Token;
use deviant_source::{CompileError, Source};
use logos::{Lexer, Logos};
use std::mem;

pub struct Parser<'a> {
    /// Cached token for peeking.
    current_token: Token,
    lexer: Lexer<'a, Token>,
    /// Source code
    source: &'a Source<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a Source<'a>) -> Self {
        let mut parser = Self {
            current_token: Token::Eof,
            lexer: Token::lexer(source.content),
            source,
        };
        parser.next();
        parser
    }

    /// Parses a whole translation unit: a sequence of top level `fn`
    /// declarations. A malformed top level token is reported and skipped
    /// through to the next `fn` keyword so subsequent declarations still parse.
    pub fn parse_program(&mut self) -> Program {
        let mut body = Vec::new();
        while self.current_token != Token::Eof {
            match self.current_token {
                Token::Fn => body.push(self.parse_fn_declaration()),
                _ => {
                    self.error_at_current("expected a function declaration");
                    self.recover_to_fn();
                }
            }
        }
        Program { body }
    }

    /// Skips forward to the next top level `fn` keyword (or end of input).
    fn recover_to_fn(&mut self) {
        while self.current_token != Token::Fn && self.current_token != Token::Eof {
            self.next();
        }
    }
}

/// Parse utilities
impl<'a> Parser<'a> {
    fn next(&mut self) -> Token {
        loop {
            match self.lexer.next() {
                Some(Token::Error) => {
                    // lexical error; report it and skip the bad token so the
                    // rest of the input still parses
                    self.source.errors.add_error(CompileError::new(
                        "unrecognized token",
                        self.lexer.span(),
                    ));
                }
                Some(token) => {
                    self.current_token = token;
                    return self.current_token.clone();
                }
                None => {
                    self.current_token = Token::Eof;
                    return Token::Eof;
                }
            }
        }
    }

    /// Predicate that tests whether the next token has the same discriminant and eats the next token if yes as a side effect.
    fn eat(&mut self, tok: Token) -> bool {
        if mem::discriminant(&self.current_token) == mem::discriminant(&tok) {
            self.next(); // eat token
            true
        } else {
            false
        }
    }

    fn expect(&mut self, tok: Token) {
        if !self.eat(tok.clone()) {
            self.error_at_current(format!(
                "expected {expected}, found {found}",
                expected = tok.describe(),
                found = self.current_token.describe()
            ));
        }
    }

    /// Eats the current token if it is an identifier and returns its text.
    fn eat_identifier(&mut self) -> Option<String> {
        if let Token::Identifier(ref ident) = self.current_token {
            let ident = ident.clone();
            self.next();
            Some(ident)
        } else {
            None
        }
    }

    /// Raises an unexpected token error.
    fn unexpected(&mut self) {
        self.error_at_current(format!("unexpected {}", self.current_token.describe()));
    }

    fn error_at_current(&mut self, message: impl ToString) {
        self.source
            .errors
            .add_error(CompileError::new(message, self.lexer.span()));
    }
}
