use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(name = "inkflow", about = "Render flowchart text as an SVG or PNG diagram")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    file: Option<PathBuf>,

    /// Output file (SVG defaults to stdout)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Svg)]
    format: Format,

    /// Supersampling scale for PNG output
    #[arg(long, default_value_t = inkflow::raster::DEFAULT_RASTER_SCALE)]
    scale: f32,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Svg,
    Png,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let input = match cli.file {
        Some(path) => std::fs::read_to_string(&path).unwrap_or_else(|e| {
            eprintln!("ERROR: failed to read {}: {e}", path.display());
            std::process::exit(1);
        }),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).unwrap_or_else(|e| {
                eprintln!("ERROR: failed to read stdin: {e}");
                std::process::exit(1);
            });
            buf
        }
    };

    match cli.format {
        Format::Svg => match inkflow::render_svg(&input) {
            Ok(svg) => match cli.output {
                Some(path) => write_file(&path, svg.as_bytes()),
                None => print!("{svg}"),
            },
            Err(e) => fail(e),
        },
        Format::Png => {
            let Some(path) = cli.output else {
                eprintln!("ERROR: PNG output needs a path, pass --output");
                std::process::exit(1);
            };
            match inkflow::render_png(&input, cli.scale) {
                Ok(bytes) => write_file(&path, &bytes),
                Err(e) => fail(e),
            }
        }
    }
}

fn write_file(path: &std::path::Path, bytes: &[u8]) {
    if let Err(e) = std::fs::write(path, bytes) {
        eprintln!("ERROR: failed to write {}: {e}", path.display());
        std::process::exit(1);
    }
}

fn fail(e: inkflow::export::ExportError) -> ! {
    eprintln!("ERROR: {e}");
    std::process::exit(1);
}
