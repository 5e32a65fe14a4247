//! Token types for the `pixelpen` scanner.
//!
//! The scanner produces a flat stream of typed lexical units. Keywords are
//! recognized against a fixed table at scan time: the eight command names
//! each get their own kind (the parser dispatches on them directly) while
//! the seven query-function names share [`TokenKind::Function`], with the
//! lexeme telling them apart. Line structure is significant in this
//! language, so newlines are tokens rather than skipped whitespace.

// ---------------------------------------------------------------------------
// TokenKind
// ---------------------------------------------------------------------------

/// The kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // -- command keywords --
    Spawn,
    Color,
    Size,
    DrawLine,
    DrawCircle,
    DrawRect,
    Fill,
    Goto,

    /// One of the seven query-function names; the lexeme carries which.
    Function,

    // -- literals and names --
    /// Unsigned integer literal.
    Number,
    /// String literal; the lexeme excludes the quotes.
    Str,
    Ident,
    /// A bare name alone on its line: a jump-target definition.
    LabelDef,

    // -- operators --
    /// `<-`
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    /// `**`
    Pow,
    /// `==`
    EqEq,
    Less,
    Greater,
    /// `<=`
    LessEq,
    /// `>=`
    GreaterEq,
    /// `&&`
    AndAnd,
    /// `||`
    OrOr,

    // -- punctuation --
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,

    Newline,
    Eof,
    /// A character outside the language; diagnosis is deferred to the
    /// parser, never raised at scan time.
    Unknown,
}

/// Look up a letter-run in the fixed keyword table.
#[must_use]
pub fn keyword_kind(word: &str) -> Option<TokenKind> {
    match word {
        "Spawn" => Some(TokenKind::Spawn),
        "Color" => Some(TokenKind::Color),
        "Size" => Some(TokenKind::Size),
        "DrawLine" => Some(TokenKind::DrawLine),
        "DrawCircle" => Some(TokenKind::DrawCircle),
        "DrawRectangle" => Some(TokenKind::DrawRect),
        "Fill" => Some(TokenKind::Fill),
        "Goto" => Some(TokenKind::Goto),
        "GetActualX" | "GetActualY" | "GetCanvasSize" | "GetColorCount" | "IsBrushColor"
        | "IsBrushSize" | "IsCanvasColor" => Some(TokenKind::Function),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// A lexical token: kind, raw text, and the 1-based source line it starts
/// on. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: u32,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: u32) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_table_commands() {
        assert_eq!(keyword_kind("Spawn"), Some(TokenKind::Spawn));
        assert_eq!(keyword_kind("DrawRectangle"), Some(TokenKind::DrawRect));
        assert_eq!(keyword_kind("Goto"), Some(TokenKind::Goto));
    }

    #[test]
    fn keyword_table_functions() {
        assert_eq!(keyword_kind("GetActualX"), Some(TokenKind::Function));
        assert_eq!(keyword_kind("IsCanvasColor"), Some(TokenKind::Function));
    }

    #[test]
    fn keyword_table_is_case_sensitive() {
        assert_eq!(keyword_kind("spawn"), None);
        assert_eq!(keyword_kind("SPAWN"), None);
        assert_eq!(keyword_kind("x"), None);
    }
}
