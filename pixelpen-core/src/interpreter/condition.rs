//! Lenient condition-text evaluation, used only by `Goto`.
//!
//! A condition is never parsed as an expression tree. Its raw text is
//! scanned for one of six comparison operators in a fixed priority order,
//! split on the first match, and each side is evaluated by a sub-evaluator
//! that parses an integer, else looks up a variable, else silently
//! defaults to zero. No comparator means the whole text is evaluated that
//! way and its truthiness used directly.
//!
//! The zero default is deliberately more permissive than the strict
//! evaluator's `UndefinedVariable`; both behaviors hold at the same time
//! and both are contractual.

use crate::error::{ErrorKind, ScriptError, ScriptResult};

use super::Interpreter;

/// Comparators in match-priority order. The two-character forms come
/// first so `<=` never splits at its `<`.
const COMPARATORS: [&str; 6] = ["==", "!=", ">=", "<=", "<", ">"];

impl Interpreter<'_> {
    /// Evaluate a `Goto` condition to 1 or 0 (or the truthiness value of a
    /// comparator-free condition).
    pub(crate) fn eval_condition(&mut self, text: &str, line: u32) -> ScriptResult<i64> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ScriptError::new(ErrorKind::EmptyExpression, line));
        }

        for op in COMPARATORS {
            if let Some(index) = text.find(op) {
                let lhs = self.eval_lenient(&text[..index]);
                let rhs = self.eval_lenient(&text[index + op.len()..]);
                let holds = match op {
                    "==" => lhs == rhs,
                    "!=" => lhs != rhs,
                    ">=" => lhs >= rhs,
                    "<=" => lhs <= rhs,
                    "<" => lhs < rhs,
                    ">" => lhs > rhs,
                    _ => unreachable!(),
                };
                return Ok(i64::from(holds));
            }
        }

        Ok(i64::from(self.eval_lenient(text) != 0))
    }

    /// Integer literal, else variable lookup, else zero. Never fails.
    fn eval_lenient(&self, text: &str) -> i64 {
        let text = text.trim();
        text.parse::<i64>()
            .unwrap_or_else(|_| self.variables.get(text).copied().unwrap_or(0))
    }
}
