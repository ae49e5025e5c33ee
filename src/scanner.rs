use std::str::Chars;

use peekmore::{PeekMore, PeekMoreIterator};

use crate::error::{Host, Reportable, ScanError};
use crate::literal::Literal;
use crate::token::{Token, TokenKind};

const NUL: char = '\0';

/// Maximal-munch scanner: turns source text into a token sequence, reporting
/// lexical errors through the host as it goes and continuing afterward so
/// the whole source is still consumed.
pub struct Scanner<'a> {
    source: PeekMoreIterator<Chars<'a>>,
    tokens: Vec<Token>,
    line: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            source: source.chars().peekmore(),
            tokens: vec![],
            line: 1,
        }
    }

    /// Scans the whole source and returns its tokens, terminated by `Eof`.
    pub fn scan_tokens(mut self, host: &mut Host) -> Vec<Token> {
        while !self.is_at_end() {
            self.scan_token(host);
        }

        self.tokens.push(Token::new(TokenKind::Eof, String::new(), None, self.line));
        self.tokens
    }

    fn advance(&mut self) -> char {
        self.source.next().unwrap_or(NUL)
    }

    /// Returns the next unconsumed character, or `'\0'` at end of input.
    fn peek(&mut self) -> char {
        self.source.reset_cursor();
        *self.source.peek().unwrap_or(&NUL)
    }

    /// Returns the character after the next one, or `'\0'` at end of input.
    /// Never panics: this is the fix for the original off-by-one lookahead.
    fn peek_next(&mut self) -> char {
        self.source.reset_cursor();
        *self.source.peek_next().unwrap_or(&NUL)
    }

    fn match_next(&mut self, expected: char) -> bool {
        if self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    fn add_token(&mut self, kind: TokenKind, lexeme: String, literal: Option<Literal>) {
        self.tokens.push(Token::new(kind, lexeme, literal, self.line));
    }

    fn is_at_end(&mut self) -> bool {
        self.peek() == NUL
    }

    fn string(&mut self, host: &mut Host) {
        // The opening quote was already consumed by `scan_token`'s dispatch.
        let start_line = self.line;

        let mut value = String::new();
        while self.peek() != '"' && !self.is_at_end() {
            if self.peek() == '\n' {
                self.line += 1;
            }
            value.push(self.advance());
        }

        if self.is_at_end() {
            ScanError { line: start_line, message: String::from("Unterminated string.") }
                .report(host);
            return;
        }

        self.advance(); // closing quote
        self.add_token(TokenKind::String, value.clone(), Some(Literal::String(value)));
    }

    fn number(&mut self, first: char) {
        let mut value = String::from(first);

        while self.peek().is_ascii_digit() {
            value.push(self.advance());
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            value.push(self.advance()); // consume the dot
            while self.peek().is_ascii_digit() {
                value.push(self.advance());
            }
        }

        let value_num: f64 = value.parse().expect("scanned digits must parse as a number");
        self.add_token(TokenKind::Number, value, Some(Literal::Number(value_num)));
    }

    fn identifier(&mut self, first: char) {
        let mut value = String::from(first);

        while self.peek().is_alphanumeric() || self.peek() == '_' {
            value.push(self.advance());
        }

        let kind = match value.as_str() {
            "and" => TokenKind::And,
            "class" => TokenKind::Class,
            "else" => TokenKind::Else,
            "false" => TokenKind::False,
            "for" => TokenKind::For,
            "fun" => TokenKind::Fun,
            "if" => TokenKind::If,
            "nil" => TokenKind::Nil,
            "or" => TokenKind::Or,
            "print" => TokenKind::Print,
            "return" => TokenKind::Return,
            "super" => TokenKind::Super,
            "this" => TokenKind::This,
            "true" => TokenKind::True,
            "var" => TokenKind::Var,
            "while" => TokenKind::While,
            _ => TokenKind::Identifier,
        };

        self.add_token(kind, value, None);
    }

    fn scan_token(&mut self, host: &mut Host) {
        let c = self.advance();
        match c {
            '(' => self.add_token(TokenKind::LeftParen, c.to_string(), None),
            ')' => self.add_token(TokenKind::RightParen, c.to_string(), None),
            '{' => self.add_token(TokenKind::LeftBrace, c.to_string(), None),
            '}' => self.add_token(TokenKind::RightBrace, c.to_string(), None),
            ',' => self.add_token(TokenKind::Comma, c.to_string(), None),
            '.' => self.add_token(TokenKind::Dot, c.to_string(), None),
            '-' => self.add_token(TokenKind::Minus, c.to_string(), None),
            '+' => self.add_token(TokenKind::Plus, c.to_string(), None),
            ';' => self.add_token(TokenKind::Semicolon, c.to_string(), None),
            '*' => self.add_token(TokenKind::Star, c.to_string(), None),

            '!' => {
                let kind = if self.match_next('=') { TokenKind::BangEqual } else { TokenKind::Bang };
                self.add_token(kind, lexeme_for(kind, c), None);
            }
            '=' => {
                let kind = if self.match_next('=') { TokenKind::EqualEqual } else { TokenKind::Equal };
                self.add_token(kind, lexeme_for(kind, c), None);
            }
            '<' => {
                let kind = if self.match_next('=') { TokenKind::LessEqual } else { TokenKind::Less };
                self.add_token(kind, lexeme_for(kind, c), None);
            }
            '>' => {
                let kind = if self.match_next('=') { TokenKind::GreaterEqual } else { TokenKind::Greater };
                self.add_token(kind, lexeme_for(kind, c), None);
            }
            '/' => {
                if self.match_next('/') {
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else {
                    self.add_token(TokenKind::Slash, c.to_string(), None);
                }
            }

            ' ' | '\r' | '\t' => {}

            '\n' => {
                self.line += 1;
            }

            '"' => self.string(host),

            c if c.is_ascii_digit() => self.number(c),

            c if c.is_alphabetic() || c == '_' => self.identifier(c),

            _ => {
                ScanError { line: self.line, message: format!("Unexpected character '{c}'.") }
                    .report(host);
            }
        }
    }
}

fn lexeme_for(kind: TokenKind, first: char) -> String {
    use TokenKind::*;
    match kind {
        BangEqual | EqualEqual | LessEqual | GreaterEqual => format!("{first}="),
        _ => first.to_string(),
    }
}
