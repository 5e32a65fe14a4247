//! The tree-walking interpreter.
//!
//! [`execute`] walks an instruction sequence by position, keeping a
//! variable environment and a label index, and dispatches drawing
//! instructions to the canvas. Control flow is an index rewrite: a `Goto`
//! whose condition holds sets the next position to its target label's
//! index.
//!
//! Errors are contained per instruction: anything raised while executing a
//! single instruction is appended to the diagnostics sink and execution
//! continues with the next instruction. A runtime error never aborts the
//! run; an unresolved `Goto` target is reported and falls through the same
//! way.
//!
//! Expression evaluation has two deliberately different code paths: the
//! strict evaluator in [`expr`] (undefined variables are errors) and the
//! lenient condition-text evaluator in [`condition`] (undefined names
//! silently default to zero). Both behaviors are contractual.

mod condition;
mod expr;

use std::collections::HashMap;

use pixelpen_canvas::{Canvas, CanvasError, PixelColor};

use crate::ast::Instruction;
use crate::error::{Diagnostics, ErrorKind, ScriptError, ScriptResult};

/// Execute an instruction sequence against a canvas, reporting runtime
/// errors to `diagnostics`. The variable environment and label index live
/// only for this call; the canvas persists.
pub fn execute(instructions: &[Instruction], canvas: &mut Canvas, diagnostics: &mut Diagnostics) {
    Interpreter::new(canvas, diagnostics).run(instructions);
}

// ---------------------------------------------------------------------------
// Interpreter
// ---------------------------------------------------------------------------

pub(crate) struct Interpreter<'a> {
    /// Variable environment. Created empty, mutated only by assignment.
    variables: HashMap<String, i64>,
    /// Label name to instruction position. A repeated name keeps the last
    /// occurrence.
    labels: HashMap<String, usize>,
    canvas: &'a mut Canvas,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> Interpreter<'a> {
    pub(crate) fn new(canvas: &'a mut Canvas, diagnostics: &'a mut Diagnostics) -> Self {
        Self {
            variables: HashMap::new(),
            labels: HashMap::new(),
            canvas,
            diagnostics,
        }
    }

    pub(crate) fn run(&mut self, instructions: &[Instruction]) {
        for (index, instruction) in instructions.iter().enumerate() {
            if let Instruction::Label { name, .. } = instruction {
                self.labels.insert(name.clone(), index);
            }
        }

        let mut pc = 0;
        while pc < instructions.len() {
            let mut next = pc + 1;
            match &instructions[pc] {
                Instruction::Goto {
                    target,
                    condition,
                    line,
                } => match self.eval_condition(condition, *line) {
                    Ok(value) if value != 0 => {
                        if let Some(&index) = self.labels.get(target) {
                            next = index;
                        } else {
                            self.diagnostics.error(ScriptError::new(
                                ErrorKind::LabelNotFound {
                                    name: target.clone(),
                                },
                                *line,
                            ));
                        }
                    }
                    Ok(_) => {}
                    Err(err) => self.diagnostics.error(err),
                },
                instruction => {
                    if let Err(err) = self.exec_instruction(instruction) {
                        self.diagnostics.error(err);
                    }
                }
            }
            pc = next;
        }
    }

    /// Execute one non-jump instruction.
    fn exec_instruction(&mut self, instruction: &Instruction) -> ScriptResult<()> {
        match instruction {
            Instruction::Label { .. } | Instruction::Goto { .. } => Ok(()),

            Instruction::Assign { name, value, .. } => {
                let value = self.eval(value)?;
                self.variables.insert(name.clone(), value);
                Ok(())
            }

            Instruction::Spawn { x, y, line } => {
                let (x, y) = (self.eval(x)?, self.eval(y)?);
                self.canvas
                    .set_cursor(x, y)
                    .map_err(|e| canvas_error(e, *line))
            }

            Instruction::Color { name, line } => {
                let color = lookup_color(name, "Color", *line)?;
                self.canvas.set_brush_color(color);
                Ok(())
            }

            Instruction::Size { value, line } => {
                let size = self.eval(value)?;
                self.canvas
                    .set_brush_size(size)
                    .map_err(|e| canvas_error(e, *line))
            }

            Instruction::DrawLine {
                dx,
                dy,
                distance,
                line,
            } => {
                let (dx, dy) = (self.eval(dx)?, self.eval(dy)?);
                let distance = self.eval(distance)?;
                if dx.abs() > 1 || dy.abs() > 1 {
                    return Err(ScriptError::new(
                        ErrorKind::InvalidCommand {
                            command: "DrawLine",
                            detail: format!("direction ({dx}, {dy}) must use unit steps"),
                        },
                        *line,
                    ));
                }
                self.canvas
                    .draw_line(dx, dy, distance)
                    .map_err(|e| canvas_error(e, *line))
            }

            Instruction::DrawCircle { radius, line } => {
                let radius = self.eval(radius)?;
                self.canvas
                    .draw_circle(0, 0, radius)
                    .map_err(|e| canvas_error(e, *line))
            }

            Instruction::DrawRect {
                width,
                height,
                line,
            } => {
                let (width, height) = (self.eval(width)?, self.eval(height)?);
                self.canvas
                    .draw_rect(0, 0, width, height)
                    .map_err(|e| canvas_error(e, *line))
            }

            Instruction::Fill { .. } => {
                self.canvas.fill();
                Ok(())
            }
        }
    }
}

/// Resolve a palette color name or raise `InvalidArgument`.
fn lookup_color(name: &str, what: &str, line: u32) -> ScriptResult<PixelColor> {
    PixelColor::from_name(name).ok_or_else(|| {
        ScriptError::new(
            ErrorKind::InvalidArgument {
                what: what.into(),
                detail: format!("unknown color \"{name}\""),
            },
            line,
        )
    })
}

/// Tag a canvas error with the source line of the instruction.
fn canvas_error(error: CanvasError, line: u32) -> ScriptError {
    let kind = match error {
        CanvasError::OutOfBounds {
            x,
            y,
            width,
            height,
        } => ErrorKind::OutOfBounds {
            x,
            y,
            width,
            height,
        },
        CanvasError::InvalidBrushSize(size) => ErrorKind::InvalidArgument {
            what: "Size".into(),
            detail: format!("brush size {size} must be at least 1"),
        },
    };
    ScriptError::new(kind, line)
}

#[cfg(test)]
mod tests;
