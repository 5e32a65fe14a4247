//! SVG renderer for `pixelpen` canvases.
//!
//! Converts a [`Canvas`] into an SVG [`Document`] using the `svg` crate.
//!
//! Key design points:
//! - The grid is emitted in pixel space and scaled through the `viewBox`,
//!   so coordinates in the output stay small integers.
//! - Horizontal runs of same-colored pixels collapse into single `<rect>`
//!   elements; a 512-wide row of one color is one element, not 512.
//! - Background-colored pixels are skipped entirely; one full-size rect
//!   underneath carries the background.

use pixelpen_canvas::{Canvas, PixelColor};
use svg::node::element::Rectangle;
use svg::Document;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Options controlling SVG output.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Output size multiplier per grid pixel. Default: 1.
    pub scale: u32,
    /// Color treated as background and skipped per-pixel. Default: white.
    pub background: PixelColor,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: 1,
            background: PixelColor::WHITE,
        }
    }
}

/// Render a [`Canvas`] to an SVG [`Document`] with default options.
#[must_use]
pub fn render(canvas: &Canvas) -> Document {
    render_with_options(canvas, &RenderOptions::default())
}

/// Render a [`Canvas`] to an SVG string.
#[must_use]
pub fn render_to_string(canvas: &Canvas) -> String {
    render(canvas).to_string()
}

/// Render a [`Canvas`] to an SVG [`Document`] with custom options.
#[must_use]
pub fn render_with_options(canvas: &Canvas, opts: &RenderOptions) -> Document {
    let scale = opts.scale.max(1);
    let (width, height) = (canvas.width(), canvas.height());

    let mut document = Document::new()
        .set("width", width * scale)
        .set("height", height * scale)
        .set("viewBox", format!("0 0 {width} {height}"))
        .set("shape-rendering", "crispEdges");

    document = document.add(
        Rectangle::new()
            .set("x", 0u32)
            .set("y", 0u32)
            .set("width", width)
            .set("height", height)
            .set("fill", css_color(opts.background)),
    );

    for y in 0..height {
        for (x, run, color) in row_runs(canvas, y, opts.background) {
            document = document.add(
                Rectangle::new()
                    .set("x", x)
                    .set("y", y)
                    .set("width", run)
                    .set("height", 1u32)
                    .set("fill", css_color(color)),
            );
        }
    }

    document
}

// ---------------------------------------------------------------------------
// Run-length row scan
// ---------------------------------------------------------------------------

/// Collapse one row into `(start_x, length, color)` runs, skipping the
/// background color.
fn row_runs(canvas: &Canvas, y: u32, background: PixelColor) -> Vec<(u32, u32, PixelColor)> {
    let mut runs = Vec::new();
    let mut x = 0;
    while x < canvas.width() {
        let color = canvas.pixel(x, y);
        if color == background {
            x += 1;
            continue;
        }
        let start = x;
        while x < canvas.width() && canvas.pixel(x, y) == color {
            x += 1;
        }
        runs.push((start, x - start, color));
    }
    runs
}

fn css_color(color: PixelColor) -> String {
    let (r, g, b) = color.rgb();
    format!("#{r:02x}{g:02x}{b:02x}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
