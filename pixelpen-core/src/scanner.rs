//! Lexical scanner for `pixelpen` source text.
//!
//! Tokenizing is total: it never fails, and characters outside the language
//! become [`TokenKind::Unknown`] tokens so the parser can diagnose them with
//! a line number instead of the scanner aborting.
//!
//! # Token production rules
//!
//! | Input                        | Token produced                         |
//! |------------------------------|----------------------------------------|
//! | `123`                        | `Number` (unsigned integer lexeme)     |
//! | `"hello"`                    | `Str` (quotes excluded, read verbatim) |
//! | `Spawn`, `GetActualX`        | the keyword's kind                     |
//! | `loop` mid-line              | `Ident`                                |
//! | `loop-1` alone on its line   | `LabelDef`                             |
//! | `**`, `==`, `<-`, `<=`, ...  | the two-character operator, greedily   |
//! | `+ - * / % < > ( ) [ ] ,`    | the one-character operator             |
//! | `\n`                         | `Newline` (line counter advances)      |
//! | anything else                | `Unknown`                              |
//! | end of input                 | a single `Eof`                         |
//!
//! Label definitions are distinguished by *position*, not punctuation: a
//! run of letters/digits/hyphen at the start of a line (leading blanks
//! allowed) that is immediately followed by a line break or end of input.
//! Anything else re-scans through the normal rules.

use crate::token::{keyword_kind, Token, TokenKind};

/// Convert source text into its token sequence. Total; the stream always
/// terminates with exactly one `Eof`.
#[must_use]
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut scanner = Scanner::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = scanner.next_token();
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            break;
        }
    }
    tokens
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

struct Scanner<'a> {
    src: &'a [u8],
    pos: usize,
    /// 1-based line of the character at `pos`.
    line: u32,
    /// True at start of input and right after a `Newline` token; blanks do
    /// not clear it, any other token does.
    at_line_start: bool,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            src: source.as_bytes(),
            pos: 0,
            line: 1,
            at_line_start: true,
        }
    }

    fn next_token(&mut self) -> Token {
        self.skip_blanks();

        if self.pos >= self.src.len() {
            return Token::new(TokenKind::Eof, "", self.line);
        }

        let c = self.src[self.pos];

        if c == b'\n' {
            self.pos += 1;
            let token = Token::new(TokenKind::Newline, "\n", self.line);
            self.line += 1;
            self.at_line_start = true;
            return token;
        }

        if self.at_line_start && c.is_ascii_alphanumeric() {
            if let Some(token) = self.scan_label(self.pos) {
                self.at_line_start = false;
                return token;
            }
        }
        self.at_line_start = false;

        match c {
            b'a'..=b'z' | b'A'..=b'Z' => self.scan_word(self.pos),
            b'0'..=b'9' => self.scan_number(self.pos),
            b'"' => self.scan_string(self.pos),
            _ => self.scan_operator(self.pos),
        }
    }

    /// Skip spaces, tabs, and carriage returns. Newlines are tokens.
    fn skip_blanks(&mut self) {
        while self.pos < self.src.len() && matches!(self.src[self.pos], b' ' | b'\t' | b'\r') {
            self.pos += 1;
        }
    }

    /// Try to scan a label definition at line start: a run of
    /// letters/digits/hyphen whose next character is a line break or end of
    /// input. Returns `None` (without consuming) when the lookahead fails.
    fn scan_label(&mut self, start: usize) -> Option<Token> {
        let mut end = start;
        while end < self.src.len()
            && (self.src[end].is_ascii_alphanumeric() || self.src[end] == b'-')
        {
            end += 1;
        }
        let mut after = end;
        if after < self.src.len() && self.src[after] == b'\r' {
            after += 1;
        }
        if after < self.src.len() && self.src[after] != b'\n' {
            return None;
        }
        self.pos = end;
        Some(Token::new(
            TokenKind::LabelDef,
            self.text(start, end),
            self.line,
        ))
    }

    /// Scan a letter-starting run and classify it via the keyword table.
    fn scan_word(&mut self, start: usize) -> Token {
        self.pos += 1;
        while self.pos < self.src.len()
            && (self.src[self.pos].is_ascii_alphanumeric() || self.src[self.pos] == b'_')
        {
            self.pos += 1;
        }
        let text = self.text(start, self.pos);
        let kind = keyword_kind(&text).unwrap_or(TokenKind::Ident);
        Token::new(kind, text, self.line)
    }

    fn scan_number(&mut self, start: usize) -> Token {
        while self.pos < self.src.len() && self.src[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        Token::new(TokenKind::Number, self.text(start, self.pos), self.line)
    }

    /// Scan a string literal. Read verbatim (embedded newlines advance the
    /// line counter) until the closing quote or end of input; the stored
    /// lexeme excludes the quotes.
    fn scan_string(&mut self, start: usize) -> Token {
        let start_line = self.line;
        self.pos += 1;
        let content_start = self.pos;
        while self.pos < self.src.len() && self.src[self.pos] != b'"' {
            if self.src[self.pos] == b'\n' {
                self.line += 1;
            }
            self.pos += 1;
        }
        let content = self.text(content_start, self.pos);
        if self.pos < self.src.len() {
            self.pos += 1; // closing quote
        }
        Token::new(TokenKind::Str, content, start_line)
    }

    /// Scan an operator, matching the two-character forms greedily before
    /// the one-character set. Everything else is `Unknown`.
    fn scan_operator(&mut self, start: usize) -> Token {
        const TWO_CHAR: [(&[u8; 2], TokenKind); 7] = [
            (b"**", TokenKind::Pow),
            (b"==", TokenKind::EqEq),
            (b"<-", TokenKind::Assign),
            (b"<=", TokenKind::LessEq),
            (b">=", TokenKind::GreaterEq),
            (b"&&", TokenKind::AndAnd),
            (b"||", TokenKind::OrOr),
        ];

        if start + 1 < self.src.len() {
            let pair = [self.src[start], self.src[start + 1]];
            for (text, kind) in TWO_CHAR {
                if pair == *text {
                    self.pos += 2;
                    return Token::new(kind, self.text(start, self.pos), self.line);
                }
            }
        }

        let kind = match self.src[start] {
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'%' => TokenKind::Percent,
            b'<' => TokenKind::Less,
            b'>' => TokenKind::Greater,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b',' => TokenKind::Comma,
            other => {
                // Consume one whole UTF-8 character, not one byte.
                self.pos = (start + utf8_len(other)).min(self.src.len());
                return Token::new(TokenKind::Unknown, self.text(start, self.pos), self.line);
            }
        };
        self.pos += 1;
        Token::new(kind, self.text(start, self.pos), self.line)
    }

    fn text(&self, start: usize, end: usize) -> String {
        String::from_utf8_lossy(&self.src[start..end]).into_owned()
    }
}

const fn utf8_len(first: u8) -> usize {
    match first {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
