//! Error taxonomy and the diagnostics sink.
//!
//! The language is built around "log and continue": syntax errors never
//! escape the parser (the offending instruction is dropped, parsing
//! resumes) and runtime errors never escape the interpreter's instruction
//! loop (the instruction is abandoned, the next one runs). Nothing here is
//! fatal to the process; everything lands in a [`Diagnostics`] sink owned
//! by the caller.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error kinds
// ---------------------------------------------------------------------------

/// The closed set of error kinds raised by the parser and interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    // -- syntax --
    /// The leading token of a line doesn't start any known construct.
    #[error("unrecognized command: {lexeme}")]
    UnknownCommand { lexeme: String },

    /// A recognized command with a broken argument list or missing
    /// punctuation.
    #[error("malformed {command}: {detail}")]
    MalformedArguments {
        command: &'static str,
        detail: String,
    },

    /// The expression grammar expected something that isn't there.
    #[error("expected {expected}, found {found}")]
    MissingToken { expected: String, found: String },

    // -- runtime --
    /// A coordinate fell outside the canvas grid.
    #[error("position ({x}, {y}) is outside the {width}x{height} canvas")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },

    #[error("division by zero")]
    DivisionByZero,

    /// An argument with the wrong shape or an out-of-range value.
    #[error("invalid argument to {what}: {detail}")]
    InvalidArgument { what: String, detail: String },

    /// A command whose evaluated operands make it unexecutable.
    #[error("invalid {command} command: {detail}")]
    InvalidCommand {
        command: &'static str,
        detail: String,
    },

    #[error("{name} expects {expected} argument(s), got {got}")]
    InvalidFunctionArity {
        name: String,
        expected: usize,
        got: usize,
    },

    /// A literal that doesn't parse as an integer.
    #[error("invalid literal: {text}")]
    InvalidLiteral { text: String },

    #[error("label not found: {name}")]
    LabelNotFound { name: String },

    #[error("undefined variable: {name}")]
    UndefinedVariable { name: String },

    #[error("unknown operator: {op}")]
    UnknownOperator { op: String },

    #[error("function not implemented: {name}")]
    FunctionNotImplemented { name: String },

    /// Nothing evaluable where an expression or condition was required.
    #[error("empty expression")]
    EmptyExpression,
}

// ---------------------------------------------------------------------------
// ScriptError
// ---------------------------------------------------------------------------

/// An error kind tagged with the source line that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[line {line}] {kind}")]
pub struct ScriptError {
    pub kind: ErrorKind,
    pub line: u32,
}

impl ScriptError {
    #[must_use]
    pub const fn new(kind: ErrorKind, line: u32) -> Self {
        Self { kind, line }
    }
}

/// Result alias used throughout the parser and interpreter.
pub type ScriptResult<T> = Result<T, ScriptError>;

// ---------------------------------------------------------------------------
// Diagnostics sink
// ---------------------------------------------------------------------------

/// Severity of a collected diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Informational message.
    Info,
    /// Something suspicious; execution continues.
    Warning,
    /// An instruction failed; execution continues with the next one.
    Error,
}

/// One collected diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub error: ScriptError,
}

/// An append-only list of diagnostics, owned by the caller and passed into
/// `parse` and `execute`. Never global state.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a diagnostic with the given severity.
    pub fn report(&mut self, severity: Severity, error: ScriptError) {
        self.entries.push(Diagnostic { severity, error });
    }

    /// Append an error-severity diagnostic.
    pub fn error(&mut self, error: ScriptError) {
        self.report(Severity::Error, error);
    }

    #[must_use]
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether any entry has `Severity::Error`.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.entries
            .iter()
            .any(|d| d.severity == Severity::Error)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
