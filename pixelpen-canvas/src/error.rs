use thiserror::Error;

/// Errors returned by canvas operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CanvasError {
    /// A coordinate fell outside the grid.
    #[error("position ({x}, {y}) is outside the {width}x{height} canvas")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },

    /// Brush size below the minimum of 1.
    #[error("brush size {0} is invalid, sizes start at 1")]
    InvalidBrushSize(i64),
}
