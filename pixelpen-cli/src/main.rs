//! `pixelpen` CLI — run pen scripts and output the canvas as SVG.

use std::fs;
use std::path::Path;
use std::process;

use clap::Parser;

use pixelpen_canvas::Canvas;
use pixelpen_core::{Diagnostics, Severity};
use pixelpen_svg::RenderOptions;

#[derive(Parser)]
#[command(version, about = "Pixelpen \u{2014} a pen-drawing script interpreter")]
struct Cli {
    /// Script file to run
    file: Option<String>,

    /// Evaluate source text instead of reading a file
    #[arg(short = 'e', long = "eval")]
    eval: Option<String>,

    /// Output directory for the rendered SVG
    #[arg(short, long, default_value = ".")]
    output: String,

    /// Canvas width in pixels
    #[arg(long, default_value_t = 128)]
    width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 128)]
    height: u32,

    /// Output size multiplier per canvas pixel
    #[arg(long, default_value_t = 4)]
    scale: u32,
}

fn main() {
    let cli = Cli::parse();
    let source = read_source(&cli);
    let job_name = job_name(&cli);

    let mut canvas = Canvas::new(cli.width, cli.height);
    let mut diagnostics = Diagnostics::new();
    pixelpen_core::run(&source, &mut canvas, &mut diagnostics);

    // Script errors are diagnostics, not process failures; the worst
    // outcome is an incomplete drawing plus the report below.
    print_diagnostics(&diagnostics);

    let opts = RenderOptions {
        scale: cli.scale,
        ..RenderOptions::default()
    };
    let svg_str = pixelpen_svg::render_with_options(&canvas, &opts).to_string();
    write_svg(&cli.output, &format!("{job_name}.svg"), &svg_str);
}

fn read_source(cli: &Cli) -> String {
    if let Some(ref source) = cli.eval {
        return source.clone();
    }
    if let Some(ref file) = cli.file {
        match fs::read_to_string(file) {
            Ok(s) => return s,
            Err(e) => {
                eprintln!("Error reading {file}: {e}");
                process::exit(1);
            }
        }
    }
    eprintln!("No input file or source specified");
    process::exit(1);
}

fn job_name(cli: &Cli) -> String {
    cli.file
        .as_deref()
        .and_then(|f| Path::new(f).file_stem())
        .and_then(|s| s.to_str())
        .unwrap_or("canvas")
        .to_owned()
}

fn print_diagnostics(diagnostics: &Diagnostics) {
    for entry in diagnostics.entries() {
        match entry.severity {
            Severity::Info => println!("{}", entry.error),
            Severity::Warning => eprintln!("Warning: {}", entry.error),
            Severity::Error => eprintln!("Error: {}", entry.error),
        }
    }
}

fn write_svg(output_dir: &str, filename: &str, content: &str) {
    let path = Path::new(output_dir).join(filename);
    match fs::write(&path, content) {
        Ok(()) => eprintln!("Wrote {}", path.display()),
        Err(e) => {
            eprintln!("Error writing {}: {e}", path.display());
            process::exit(1);
        }
    }
}
