//! Recursive-descent parser: token sequence to instruction sequence.
//!
//! Parsing is error-tolerant. A recognized-but-malformed construct is
//! reported to the diagnostics sink and only that attempted instruction is
//! discarded (the parser skips to the end of the line); a wholly
//! unrecognized leading token is reported and the parser advances exactly
//! one token. Either way the loop continues, so parsing terminates in
//! O(token count) and statements after an error still parse.
//!
//! The grammar is two-tier by design:
//!
//! - drawing commands take fixed-arity lists of *numeric literals* (a
//!   string literal for `Color`), not general expressions;
//! - assignments and function-call arguments use the full expression
//!   grammar — additive over multiplicative over primary, with no general
//!   parenthesized grouping;
//! - a `Goto` condition is not parsed at all: its raw lexemes are captured
//!   up to the matching close parenthesis and handed to the interpreter's
//!   lenient condition evaluator as text.

use crate::ast::{Expr, Instruction};
use crate::error::{Diagnostics, ErrorKind, ScriptError, ScriptResult};
use crate::token::{Token, TokenKind};

/// Parse a token sequence into an instruction sequence, reporting syntax
/// errors to `diagnostics`. Never fails as a whole.
#[must_use]
pub fn parse(tokens: &[Token], diagnostics: &mut Diagnostics) -> Vec<Instruction> {
    if tokens.is_empty() {
        return Vec::new();
    }
    Parser::new(tokens, diagnostics).parse_program()
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], diagnostics: &'a mut Diagnostics) -> Self {
        Self {
            tokens,
            pos: 0,
            diagnostics,
        }
    }

    fn parse_program(&mut self) -> Vec<Instruction> {
        let mut instructions = Vec::new();
        loop {
            self.skip_newlines();
            if self.current().kind == TokenKind::Eof {
                break;
            }
            if let Some(instruction) = self.parse_statement() {
                instructions.push(instruction);
            }
        }
        instructions
    }

    /// Parse one statement, dispatching on the leading token. Returns
    /// `None` when the statement was reported and discarded.
    fn parse_statement(&mut self) -> Option<Instruction> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::LabelDef => {
                self.advance();
                Some(Instruction::Label {
                    name: token.lexeme,
                    line: token.line,
                })
            }
            TokenKind::Spawn => self.parse_spawn(),
            TokenKind::Color => self.parse_color(),
            TokenKind::Size => self.parse_size(),
            TokenKind::DrawLine => self.parse_draw_line(),
            TokenKind::DrawCircle => self.parse_draw_circle(),
            TokenKind::DrawRect => self.parse_draw_rect(),
            TokenKind::Fill => self.parse_fill(),
            TokenKind::Goto => self.parse_goto(),
            TokenKind::Ident if self.peek(1).kind == TokenKind::Assign => self.parse_assignment(),
            _ => {
                // Unrecognized leading token: report and advance exactly one.
                self.diagnostics.error(ScriptError::new(
                    ErrorKind::UnknownCommand {
                        lexeme: token.lexeme,
                    },
                    token.line,
                ));
                self.advance();
                None
            }
        }
    }

    // -----------------------------------------------------------------------
    // Drawing commands
    // -----------------------------------------------------------------------

    fn parse_spawn(&mut self) -> Option<Instruction> {
        let line = self.current().line;
        self.advance();
        let mut args = self.numeric_args("Spawn", 2)?;
        let y = args.pop()?;
        let x = args.pop()?;
        Some(Instruction::Spawn { x, y, line })
    }

    fn parse_color(&mut self) -> Option<Instruction> {
        let line = self.current().line;
        self.advance();
        if !self.expect(TokenKind::LParen, "(", "Color") {
            return None;
        }
        if self.current().kind != TokenKind::Str {
            self.malformed(
                "Color",
                format!("expected a string literal, found {}", describe(self.current())),
            );
            return None;
        }
        let name = self.current().lexeme.clone();
        self.advance();
        if !self.expect(TokenKind::RParen, ")", "Color") {
            return None;
        }
        Some(Instruction::Color { name, line })
    }

    fn parse_size(&mut self) -> Option<Instruction> {
        let line = self.current().line;
        self.advance();
        let mut args = self.numeric_args("Size", 1)?;
        Some(Instruction::Size {
            value: args.pop()?,
            line,
        })
    }

    fn parse_draw_line(&mut self) -> Option<Instruction> {
        let line = self.current().line;
        self.advance();
        let mut args = self.numeric_args("DrawLine", 3)?;
        let distance = args.pop()?;
        let dy = args.pop()?;
        let dx = args.pop()?;
        Some(Instruction::DrawLine {
            dx,
            dy,
            distance,
            line,
        })
    }

    fn parse_draw_circle(&mut self) -> Option<Instruction> {
        let line = self.current().line;
        self.advance();
        let mut args = self.numeric_args("DrawCircle", 1)?;
        Some(Instruction::DrawCircle {
            radius: args.pop()?,
            line,
        })
    }

    fn parse_draw_rect(&mut self) -> Option<Instruction> {
        let line = self.current().line;
        self.advance();
        let mut args = self.numeric_args("DrawRectangle", 2)?;
        let height = args.pop()?;
        let width = args.pop()?;
        Some(Instruction::DrawRect {
            width,
            height,
            line,
        })
    }

    fn parse_fill(&mut self) -> Option<Instruction> {
        let line = self.current().line;
        self.advance();
        if !self.expect(TokenKind::LParen, "(", "Fill") {
            return None;
        }
        if !self.expect(TokenKind::RParen, ")", "Fill") {
            return None;
        }
        Some(Instruction::Fill { line })
    }

    /// Parse a parenthesized, comma-separated, fixed-arity list of numeric
    /// literals (optionally signed). Drawing commands do not take general
    /// expressions.
    fn numeric_args(&mut self, command: &'static str, arity: usize) -> Option<Vec<Expr>> {
        if !self.expect(TokenKind::LParen, "(", command) {
            return None;
        }
        let mut args = Vec::with_capacity(arity);
        for i in 0..arity {
            if i > 0 && !self.expect(TokenKind::Comma, ",", command) {
                return None;
            }
            args.push(self.numeric_literal(command)?);
        }
        if !self.expect(TokenKind::RParen, ")", command) {
            return None;
        }
        Some(args)
    }

    /// A numeric literal operand: an optional `-` followed by a number
    /// token. Stored unevaluated as a literal expression node.
    fn numeric_literal(&mut self, command: &'static str) -> Option<Expr> {
        let line = self.current().line;
        let negative = if self.current().kind == TokenKind::Minus {
            self.advance();
            true
        } else {
            false
        };
        if self.current().kind != TokenKind::Number {
            self.malformed(
                command,
                format!("expected a numeric literal, found {}", describe(self.current())),
            );
            return None;
        }
        let digits = self.current().lexeme.clone();
        self.advance();
        let text = if negative {
            format!("-{digits}")
        } else {
            digits
        };
        Some(Expr::Literal { text, line })
    }

    // -----------------------------------------------------------------------
    // Goto
    // -----------------------------------------------------------------------

    /// `Goto [ label ] ( raw-condition )`. The label slot accepts an
    /// identifier or a label-definition token; the condition is collected
    /// as concatenated raw lexemes up to the matching close parenthesis.
    fn parse_goto(&mut self) -> Option<Instruction> {
        let line = self.current().line;
        self.advance();
        if !self.expect(TokenKind::LBracket, "[", "Goto") {
            return None;
        }
        let target = match self.current().kind {
            TokenKind::Ident | TokenKind::LabelDef => {
                let name = self.current().lexeme.clone();
                self.advance();
                name
            }
            _ => {
                self.malformed(
                    "Goto",
                    format!("expected a label name, found {}", describe(self.current())),
                );
                return None;
            }
        };
        if !self.expect(TokenKind::RBracket, "]", "Goto") {
            return None;
        }
        if !self.expect(TokenKind::LParen, "(", "Goto") {
            return None;
        }

        let mut depth = 1u32;
        let mut condition = String::new();
        loop {
            match self.current().kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        break;
                    }
                }
                TokenKind::Newline | TokenKind::Eof => {
                    self.malformed("Goto", "unterminated condition".into());
                    return None;
                }
                _ => {}
            }
            condition.push_str(&self.current().lexeme);
            self.advance();
        }

        Some(Instruction::Goto {
            target,
            condition,
            line,
        })
    }

    // -----------------------------------------------------------------------
    // Assignment and expressions
    // -----------------------------------------------------------------------

    fn parse_assignment(&mut self) -> Option<Instruction> {
        let line = self.current().line;
        let name = self.current().lexeme.clone();
        self.advance(); // identifier
        self.advance(); // `<-`
        match self.parse_expression() {
            Ok(value) => Some(Instruction::Assign { name, value, line }),
            Err(err) => {
                self.diagnostics.error(err);
                self.recover();
                None
            }
        }
    }

    /// Additive level: `+ -`.
    fn parse_expression(&mut self) -> ScriptResult<Expr> {
        let mut left = self.parse_term()?;
        while matches!(self.current().kind, TokenKind::Plus | TokenKind::Minus) {
            let op = self.current().lexeme.clone();
            let line = self.current().line;
            self.advance();
            let right = self.parse_term()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                line,
            };
        }
        Ok(left)
    }

    /// Multiplicative level: `* / % **`.
    fn parse_term(&mut self) -> ScriptResult<Expr> {
        let mut left = self.parse_primary()?;
        while matches!(
            self.current().kind,
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent | TokenKind::Pow
        ) {
            let op = self.current().lexeme.clone();
            let line = self.current().line;
            self.advance();
            let right = self.parse_primary()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                line,
            };
        }
        Ok(left)
    }

    /// Primary level: number, string, identifier, or query-function name.
    /// A name followed by `(` becomes a call; without it, a bare variable
    /// reference. There is no general parenthesized grouping.
    fn parse_primary(&mut self) -> ScriptResult<Expr> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Number => {
                self.advance();
                Ok(Expr::Literal {
                    text: token.lexeme,
                    line: token.line,
                })
            }
            TokenKind::Str => {
                // Re-wrap in quotes so the evaluator can tell a string
                // literal from a bare identifier.
                self.advance();
                Ok(Expr::Literal {
                    text: format!("\"{}\"", token.lexeme),
                    line: token.line,
                })
            }
            TokenKind::Ident | TokenKind::Function => {
                self.advance();
                if self.current().kind == TokenKind::LParen {
                    let args = self.call_args()?;
                    Ok(Expr::Call {
                        name: token.lexeme,
                        args,
                        line: token.line,
                    })
                } else {
                    Ok(Expr::Variable {
                        name: token.lexeme,
                        line: token.line,
                    })
                }
            }
            _ => Err(ScriptError::new(
                ErrorKind::MissingToken {
                    expected: "an expression".into(),
                    found: describe(&token),
                },
                token.line,
            )),
        }
    }

    /// A parenthesized, comma-separated list of zero or more expressions.
    fn call_args(&mut self) -> ScriptResult<Vec<Expr>> {
        self.advance(); // `(`
        let mut args = Vec::new();
        if self.current().kind == TokenKind::RParen {
            self.advance();
            return Ok(args);
        }
        loop {
            args.push(self.parse_expression()?);
            match self.current().kind {
                TokenKind::Comma => self.advance(),
                TokenKind::RParen => {
                    self.advance();
                    return Ok(args);
                }
                _ => {
                    return Err(ScriptError::new(
                        ErrorKind::MissingToken {
                            expected: "`,` or `)`".into(),
                            found: describe(self.current()),
                        },
                        self.current().line,
                    ))
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Token access and recovery
    // -----------------------------------------------------------------------

    fn current(&self) -> &Token {
        // The stream always ends with `Eof`, so the clamp is safe.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self, n: usize) -> &Token {
        &self.tokens[(self.pos + n).min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn skip_newlines(&mut self) {
        while self.current().kind == TokenKind::Newline {
            self.advance();
        }
    }

    /// Discard the rest of the attempted instruction: skip to the end of
    /// the line without consuming the newline.
    fn recover(&mut self) {
        while !matches!(self.current().kind, TokenKind::Newline | TokenKind::Eof) {
            self.advance();
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str, command: &'static str) -> bool {
        if self.current().kind == kind {
            self.advance();
            true
        } else {
            self.malformed(
                command,
                format!("expected `{what}`, found {}", describe(self.current())),
            );
            false
        }
    }

    /// Report a malformed construct and discard the rest of its line.
    fn malformed(&mut self, command: &'static str, detail: String) {
        let line = self.current().line;
        self.diagnostics.error(ScriptError::new(
            ErrorKind::MalformedArguments { command, detail },
            line,
        ));
        self.recover();
    }
}

/// Human-readable description of a token for error messages.
fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Eof => "end of input".into(),
        TokenKind::Newline => "end of line".into(),
        _ => format!("`{}`", token.lexeme),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
