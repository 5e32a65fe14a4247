//! Strict expression evaluation.
//!
//! This is the evaluator used by assignments and command arguments. Unlike
//! the condition path it refuses to guess: an undefined variable, a
//! non-integer literal, or a bad built-in call all raise, and the raising
//! instruction is abandoned.

use pixelpen_canvas::PixelColor;

use crate::ast::Expr;
use crate::error::{ErrorKind, ScriptError, ScriptResult};

use super::{lookup_color, Interpreter};

impl Interpreter<'_> {
    /// Evaluate an expression to an integer.
    pub(crate) fn eval(&mut self, expr: &Expr) -> ScriptResult<i64> {
        match expr {
            Expr::Literal { text, line } => text.parse::<i64>().map_err(|_| {
                ScriptError::new(ErrorKind::InvalidLiteral { text: text.clone() }, *line)
            }),

            Expr::Variable { name, line } => {
                self.variables.get(name).copied().ok_or_else(|| {
                    ScriptError::new(ErrorKind::UndefinedVariable { name: name.clone() }, *line)
                })
            }

            Expr::Binary {
                op,
                left,
                right,
                line,
            } => {
                let l = self.eval(left)?;
                let r = self.eval(right)?;
                apply_operator(op, l, r, *line)
            }

            Expr::Call { name, args, line } => self.call_function(name, args, *line),
        }
    }

    // -----------------------------------------------------------------------
    // Built-in query functions
    // -----------------------------------------------------------------------

    fn call_function(&mut self, name: &str, args: &[Expr], line: u32) -> ScriptResult<i64> {
        match name {
            "GetActualX" => {
                self.check_arity(name, args, 0, line)?;
                Ok(self.canvas.cursor().0)
            }
            "GetActualY" => {
                self.check_arity(name, args, 0, line)?;
                Ok(self.canvas.cursor().1)
            }
            "GetCanvasSize" => {
                self.check_arity(name, args, 0, line)?;
                Ok(i64::from(self.canvas.width()))
            }
            "GetColorCount" => {
                self.check_arity(name, args, 5, line)?;
                let color = self.color_argument(name, &args[0], line)?;
                let x1 = self.eval(&args[1])?;
                let y1 = self.eval(&args[2])?;
                let x2 = self.eval(&args[3])?;
                let y2 = self.eval(&args[4])?;
                Ok(self.canvas.count_color_pixels(color, x1, y1, x2, y2))
            }
            "IsBrushColor" => {
                self.check_arity(name, args, 1, line)?;
                let color = self.color_argument(name, &args[0], line)?;
                Ok(i64::from(self.canvas.brush_color() == color))
            }
            "IsBrushSize" => {
                self.check_arity(name, args, 1, line)?;
                let size = integer_argument(name, &args[0], line)?;
                Ok(i64::from(i64::from(self.canvas.brush_size()) == size))
            }
            "IsCanvasColor" => {
                self.check_arity(name, args, 1, line)?;
                let color = self.color_argument(name, &args[0], line)?;
                let origin = self
                    .canvas
                    .pixel_color(0, 0)
                    .map_err(|e| super::canvas_error(e, line))?;
                Ok(i64::from(origin == color))
            }
            _ => Err(ScriptError::new(
                ErrorKind::FunctionNotImplemented { name: name.into() },
                line,
            )),
        }
    }

    fn check_arity(&self, name: &str, args: &[Expr], expected: usize, line: u32) -> ScriptResult<()> {
        if args.len() == expected {
            Ok(())
        } else {
            Err(ScriptError::new(
                ErrorKind::InvalidFunctionArity {
                    name: name.into(),
                    expected,
                    got: args.len(),
                },
                line,
            ))
        }
    }

    /// A quoted-string argument resolved through the palette.
    fn color_argument(&self, name: &str, arg: &Expr, line: u32) -> ScriptResult<PixelColor> {
        let text = string_argument(name, arg, line)?;
        lookup_color(&text, name, line)
    }
}

/// Unwrap a string-literal argument (the parser re-wrapped it in quotes).
fn string_argument(name: &str, arg: &Expr, line: u32) -> ScriptResult<String> {
    if let Expr::Literal { text, .. } = arg {
        if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
            return Ok(text[1..text.len() - 1].to_owned());
        }
    }
    Err(ScriptError::new(
        ErrorKind::InvalidArgument {
            what: name.into(),
            detail: "expected a quoted color name".into(),
        },
        line,
    ))
}

/// An integer-literal argument; shape is validated, not evaluated.
fn integer_argument(name: &str, arg: &Expr, line: u32) -> ScriptResult<i64> {
    if let Expr::Literal { text, .. } = arg {
        if let Ok(value) = text.parse::<i64>() {
            return Ok(value);
        }
    }
    Err(ScriptError::new(
        ErrorKind::InvalidArgument {
            what: name.into(),
            detail: "expected an integer literal".into(),
        },
        line,
    ))
}

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

/// Apply a binary operator held as raw text. Anything outside the
/// supported set raises `UnknownOperator`.
fn apply_operator(op: &str, l: i64, r: i64, line: u32) -> ScriptResult<i64> {
    match op {
        "+" => Ok(l.wrapping_add(r)),
        "-" => Ok(l.wrapping_sub(r)),
        "*" => Ok(l.wrapping_mul(r)),
        "/" => {
            if r == 0 {
                Err(ScriptError::new(ErrorKind::DivisionByZero, line))
            } else {
                Ok(l.wrapping_div(r))
            }
        }
        "%" => {
            if r == 0 {
                Err(ScriptError::new(ErrorKind::DivisionByZero, line))
            } else {
                Ok(l.wrapping_rem(r))
            }
        }
        "**" => {
            if r < 0 {
                Ok(0)
            } else {
                Ok(l.wrapping_pow(u32::try_from(r).unwrap_or(u32::MAX)))
            }
        }
        _ => Err(ScriptError::new(
            ErrorKind::UnknownOperator { op: op.into() },
            line,
        )),
    }
}
