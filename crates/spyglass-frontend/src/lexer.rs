// lexer.rs
//
// Byte-scanning lexer for the C++ expression subset. Numeric constants are
// produced as raw pp-number spellings; validation and typing happen later in
// `literal`, mirroring how a preprocessor hands whole spellings to the
// literal parser.

use crate::{Span, Token, TokenKind};

pub struct Lexer<'src> {
    source: &'src str,
    bytes: &'src [u8],
    current: usize,
    start: usize,
    line: u32,
    column: u32,
    start_line: u32,
    start_column: u32,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            current: 0,
            start: 0,
            line: 1,
            column: 1,
            start_line: 1,
            start_column: 1,
        }
    }

    /// Get the next token from the source
    pub fn next_token(&mut self) -> Token<'src> {
        self.skip_whitespace();

        self.start = self.current;
        self.start_column = self.column;
        self.start_line = self.line;

        let Some(c) = self.advance() else {
            return self.make_token(TokenKind::Eof);
        };

        match c {
            '(' => self.make_token(TokenKind::LParen),
            ')' => self.make_token(TokenKind::RParen),
            '[' => self.make_token(TokenKind::LBracket),
            ']' => self.make_token(TokenKind::RBracket),
            ',' => self.make_token(TokenKind::Comma),
            '?' => self.make_token(TokenKind::Question),
            '~' => self.make_token(TokenKind::Tilde),
            '^' => self.make_token(TokenKind::Caret),
            '*' => self.make_token(TokenKind::Star),
            '%' => self.make_token(TokenKind::Percent),
            ':' => {
                if self.match_byte(b':') {
                    self.make_token(TokenKind::ColonColon)
                } else {
                    self.make_token(TokenKind::Colon)
                }
            }
            '+' => {
                if self.match_byte(b'+') {
                    self.make_token(TokenKind::PlusPlus)
                } else {
                    self.make_token(TokenKind::Plus)
                }
            }
            '-' => {
                if self.match_byte(b'>') {
                    self.make_token(TokenKind::Arrow)
                } else if self.match_byte(b'-') {
                    self.make_token(TokenKind::MinusMinus)
                } else {
                    self.make_token(TokenKind::Minus)
                }
            }
            '=' => {
                if self.match_byte(b'=') {
                    self.make_token(TokenKind::EqEq)
                } else {
                    self.make_token(TokenKind::Eq)
                }
            }
            '!' => {
                if self.match_byte(b'=') {
                    self.make_token(TokenKind::BangEq)
                } else {
                    self.make_token(TokenKind::Bang)
                }
            }
            '&' => {
                if self.match_byte(b'&') {
                    self.make_token(TokenKind::AmpAmp)
                } else {
                    self.make_token(TokenKind::Ampersand)
                }
            }
            '|' => {
                if self.match_byte(b'|') {
                    self.make_token(TokenKind::PipePipe)
                } else {
                    self.make_token(TokenKind::Pipe)
                }
            }
            '<' => {
                if self.match_byte(b'<') {
                    self.make_token(TokenKind::LessLess)
                } else if self.match_byte(b'=') {
                    self.make_token(TokenKind::LtEq)
                } else {
                    self.make_token(TokenKind::Lt)
                }
            }
            '>' => {
                if self.match_byte(b'>') {
                    self.make_token(TokenKind::GreaterGreater)
                } else if self.match_byte(b'=') {
                    self.make_token(TokenKind::GtEq)
                } else {
                    self.make_token(TokenKind::Gt)
                }
            }

            // Slash or comment
            '/' => {
                if self.match_byte(b'/') {
                    self.skip_line_comment();
                    self.next_token()
                } else if self.match_byte(b'*') {
                    self.skip_block_comment();
                    self.next_token()
                } else {
                    self.make_token(TokenKind::Slash)
                }
            }

            // Dot or a fraction-first float like `.5`
            '.' => {
                if self.peek_byte().is_some_and(|b| b.is_ascii_digit()) {
                    self.number()
                } else {
                    self.make_token(TokenKind::Dot)
                }
            }

            c if c.is_ascii_digit() => self.number(),

            c if c == '_' || unicode_ident::is_xid_start(c) => self.identifier(),

            _ => self.make_token(TokenKind::Unknown),
        }
    }

    /// Scan a pp-number: digits, identifier characters, digit separators,
    /// dots, and exponent signs. The spelling is validated later.
    fn number(&mut self) -> Token<'src> {
        loop {
            let Some(b) = self.peek_byte() else { break };
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'\'' || b == b'.' {
                self.bump_byte();
            } else if (b == b'+' || b == b'-') && self.prev_byte_is_exponent() {
                self.bump_byte();
            } else {
                break;
            }
        }
        self.make_token(TokenKind::NumericConstant)
    }

    fn identifier(&mut self) -> Token<'src> {
        loop {
            let rest = &self.source[self.current..];
            let Some(c) = rest.chars().next() else { break };
            if c == '_' || unicode_ident::is_xid_continue(c) {
                self.current += c.len_utf8();
                self.column += 1;
            } else {
                break;
            }
        }
        let text = &self.source[self.start..self.current];
        match TokenKind::keyword_kind(text) {
            Some(kind) => self.make_token(kind),
            None => self.make_token(TokenKind::Identifier),
        }
    }

    fn make_token(&self, kind: TokenKind) -> Token<'src> {
        let span = Span::new(self.start, self.current, self.start_line, self.start_column);
        Token::new(kind, &self.source[self.start..self.current], span)
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek_byte() {
            match b {
                b' ' | b'\t' | b'\r' => {
                    self.bump_byte();
                }
                b'\n' => {
                    self.bump_byte();
                    self.line += 1;
                    self.column = 1;
                }
                _ => break,
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(b) = self.peek_byte() {
            if b == b'\n' {
                break;
            }
            self.bump_byte();
        }
    }

    fn skip_block_comment(&mut self) {
        while let Some(b) = self.peek_byte() {
            if b == b'*' && self.bytes.get(self.current + 1) == Some(&b'/') {
                self.bump_byte();
                self.bump_byte();
                return;
            }
            if b == b'\n' {
                self.line += 1;
                self.column = 0;
            }
            self.bump_byte();
        }
        // Unterminated block comment: the rest of the input is swallowed and
        // the next token is Eof.
    }

    /// Advance over one character, returning it.
    fn advance(&mut self) -> Option<char> {
        let c = self.source[self.current..].chars().next()?;
        self.current += c.len_utf8();
        self.column += 1;
        Some(c)
    }

    /// Advance over one ASCII byte.
    fn bump_byte(&mut self) {
        self.current += 1;
        self.column += 1;
    }

    fn peek_byte(&self) -> Option<u8> {
        self.bytes.get(self.current).copied()
    }

    /// Consume the next byte if it matches.
    fn match_byte(&mut self, expected: u8) -> bool {
        if self.peek_byte() == Some(expected) {
            self.bump_byte();
            true
        } else {
            false
        }
    }

    fn prev_byte_is_exponent(&self) -> bool {
        if self.current == 0 {
            return false;
        }
        matches!(self.bytes[self.current - 1], b'e' | b'E' | b'p' | b'P')
    }
}
