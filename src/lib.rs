//! Notesketch: turn handwritten `.note` archives into vector drawings.
//!
//! A `.note` file is a zip archive holding a binary property list. Notesketch
//! decodes that plist, finds the curve record inside it, assembles the raw
//! sample arrays into strokes and hands them to a drawing backend.
//!
//! # Modules
//!
//! - [`plist`]: Binary property list decoding into an arena of values
//! - [`note`]: Archive access, curve record lookup and stroke assembly
//! - [`ir`]: Decoded note types (NoteDocument, Curve, CurvePoint, Rgba, etc.)
//! - [`geometry`]: Canvas sizing and crop-to-content planning
//! - [`path`]: Smoothed stroke path construction
//! - [`render`]: The [`render::Canvas`] seam and the SVG backend
//! - [`inspect`]: Note statistics and reporting
//! - [`error`]: Error types for notesketch operations

pub mod error;
pub mod geometry;
pub mod inspect;
pub mod ir;
pub mod note;
pub mod path;
pub mod plist;
pub mod render;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

pub use error::{ErrorKind, FormatError, NoteError};

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "NOTESKETCH_LOG";

/// The notesketch CLI application.
#[derive(Parser)]
#[command(name = "notesketch")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v for info, -vv for debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Convert a .note file, or a directory of them, to SVG or JSON.
    Convert(ConvertArgs),
    /// Print statistics about a .note file.
    Inspect(InspectArgs),
}

/// Arguments for the convert subcommand.
#[derive(clap::Args)]
struct ConvertArgs {
    /// Input .note file or directory.
    input: PathBuf,

    /// Output file, or output directory when the input is a directory.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Svg)]
    format: OutputFormat,

    /// Crop the drawing to its content.
    #[arg(long, env = "NOTESKETCH_CROP")]
    crop: bool,
}

/// Arguments for the inspect subcommand.
#[derive(clap::Args)]
struct InspectArgs {
    /// Input .note file.
    input: PathBuf,

    /// Report the canvas as it would be with crop-to-content.
    #[arg(long, env = "NOTESKETCH_CROP")]
    crop: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Output format for converted notes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Standalone SVG drawing.
    Svg,
    /// The decoded note as pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// File extension used for outputs in this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Json => "json",
        }
    }
}

/// Options that control how a note is converted.
#[derive(Clone, Debug, Default)]
pub struct ConvertOptions {
    /// Crop the output to the stroke content plus a margin.
    pub crop: bool,
}

/// Converts one `.note` file and writes the result to `output`.
///
/// # Errors
/// Any read, parse or write error for this file.
pub fn convert_file(
    input: &Path,
    output: &Path,
    format: OutputFormat,
    opts: &ConvertOptions,
) -> Result<(), NoteError> {
    let document = note::read_note_file(input)?;
    debug!(
        input = %input.display(),
        curves = document.curves.len(),
        "parsed note"
    );

    match format {
        OutputFormat::Svg => {
            let svg = render::render_svg(&document, opts.crop);
            fs::write(output, svg).map_err(|source| NoteError::Output {
                path: output.to_path_buf(),
                message: source.to_string(),
            })
        }
        OutputFormat::Json => ir::io_json::write_document_json(output, &document),
    }
}

/// Run the notesketch CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), NoteError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Convert(args)) => run_convert(args),
        Some(Commands::Inspect(args)) => run_inspect(args),
        None => {
            println!("notesketch {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Convert handwritten .note archives into vector drawings.");
            println!();
            println!("Run 'notesketch --help' for usage information.");
            Ok(())
        }
    }
}

/// Installs the stderr log subscriber.
///
/// `NOTESKETCH_LOG` wins over `-v` when set.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Execute the convert subcommand.
fn run_convert(args: ConvertArgs) -> Result<(), NoteError> {
    let opts = ConvertOptions { crop: args.crop };

    if !args.input.is_dir() {
        let output = args
            .output
            .unwrap_or_else(|| args.input.with_extension(args.format.extension()));
        convert_file(&args.input, &output, args.format, &opts)?;
        println!("Converted {} -> {}", args.input.display(), output.display());
        return Ok(());
    }

    let out_dir = args.output.ok_or_else(|| {
        NoteError::Usage(
            "a directory input requires --output <DIR> for the converted files".to_string(),
        )
    })?;

    let inputs = collect_note_files(&args.input)?;
    info!(count = inputs.len(), dir = %args.input.display(), "converting directory");

    let mut failed = 0usize;
    for input in &inputs {
        let relative = input.strip_prefix(&args.input).unwrap_or(input);
        let output = out_dir
            .join(relative)
            .with_extension(args.format.extension());

        let result = output
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .map_err(NoteError::Io)
            .and_then(|()| convert_file(input, &output, args.format, &opts));

        match result {
            Ok(()) => println!("Converted {} -> {}", input.display(), output.display()),
            Err(err) => {
                failed += 1;
                warn!(input = %input.display(), kind = %err.kind(), "conversion failed");
                eprintln!(
                    "could not read note {} ({}): {}",
                    input.display(),
                    err.kind(),
                    err
                );
            }
        }
    }

    println!(
        "{} of {} note(s) converted",
        inputs.len() - failed,
        inputs.len()
    );

    if failed > 0 {
        Err(NoteError::BatchFailed {
            failed,
            total: inputs.len(),
        })
    } else {
        Ok(())
    }
}

/// Finds every `.note` file under `dir`, sorted for stable output.
fn collect_note_files(dir: &Path) -> Result<Vec<PathBuf>, NoteError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(|source| NoteError::Io(source.into()))?;
        if entry.file_type().is_file() && is_note_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

fn is_note_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("note"))
}

/// Execute the inspect subcommand.
fn run_inspect(args: InspectArgs) -> Result<(), NoteError> {
    let document = note::read_note_file(&args.input)?;

    let opts = inspect::InspectOptions {
        crop: args.crop,
        ..Default::default()
    };
    let report = inspect::inspect_document(&document, &opts);

    match args.output.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "text" => print!("{}", report),
        other => {
            return Err(NoteError::UnsupportedFormat(format!(
                "'{}' (supported: text, json)",
                other
            )));
        }
    }

    Ok(())
}
