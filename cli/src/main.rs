//! pdfdocx CLI - rebuild DOCX documents from PDF text

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use pdfdocx::convert::{ConvertOptions, Converter};
use pdfdocx::render::to_json;
use pdfdocx::{pdf_version, AttemptFailure, JsonFormat};

#[derive(Parser)]
#[command(name = "pdfdocx")]
#[command(version)]
#[command(about = "Convert PDF to DOCX, keeping paragraphs and bullet lists", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(flatten)]
    convert: ConvertArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Clone)]
struct ConvertArgs {
    /// Output directory
    #[arg(short, long, value_name = "DIR", global = true)]
    output: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, value_name = "FILE", env = "PDFDOCX_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Emulate list items with a hanging indent instead of the List Bullet style
    #[arg(long, global = true)]
    no_list_style: bool,

    /// Do not fall back to the external converter command
    #[arg(long, global = true)]
    no_command: bool,

    /// Print the conversion summary as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert PDF to DOCX
    Convert {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Print the reconstructed document as JSON
    Json {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short = 'f', long, value_name = "FILE")]
        file: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show document information and the strategy that would be used
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let args = cli.convert;

    let result = match cli.command {
        Some(Commands::Convert { input }) => cmd_convert(&input, &args),
        Some(Commands::Json {
            input,
            file,
            compact,
        }) => cmd_json(&input, file.as_deref(), compact, &args),
        Some(Commands::Info { input }) => cmd_info(&input, &args),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&input, &args)
            } else {
                println!("{}", "Usage: pdfdocx <FILE> [-o DIR]".yellow());
                println!("       pdfdocx --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_options(args: &ConvertArgs) -> pdfdocx::Result<ConvertOptions> {
    let mut options = match &args.config {
        Some(path) => {
            log::debug!("Loading configuration from {}", path.display());
            ConvertOptions::from_file(path)?
        }
        None => ConvertOptions::default(),
    };

    if args.no_list_style {
        options = options.with_native_list_style(false);
    }
    if args.no_command {
        options = options.without_opaque_command();
    }
    Ok(options)
}

fn input_name(input: &Path) -> String {
    input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn cmd_convert(input: &Path, args: &ConvertArgs) -> Result<(), Box<dyn std::error::Error>> {
    let converter = Converter::with_defaults(load_options(args)?)?;
    let data = fs::read(input)?;

    let output_dir = args
        .output
        .clone()
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));
    let output_dir = if output_dir.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        output_dir
    };
    fs::create_dir_all(&output_dir)?;

    let result = converter.convert_to_dir(&data, &input_name(input), &output_dir)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    for attempt in &result.attempts {
        let label = match attempt.failure {
            AttemptFailure::Unavailable(_) => "skipped".yellow(),
            AttemptFailure::Failed(_) => "failed".red(),
        };
        println!("  {} {}", label, attempt);
    }
    println!(
        "{} {} ({} paragraphs via {})",
        "Saved to".green(),
        result.output_path.display(),
        result.paragraph_count,
        result.strategy.cyan()
    );

    Ok(())
}

fn cmd_json(
    input: &Path,
    file: Option<&Path>,
    compact: bool,
    args: &ConvertArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let converter = Converter::with_defaults(load_options(args)?)?;
    let data = fs::read(input)?;
    let extraction = converter.extract(&data)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = to_json(&extraction.document, format)?;

    if let Some(path) = file {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_info(input: &Path, args: &ConvertArgs) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    let converter = Converter::with_defaults(load_options(args)?)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    match pdf_version(&data) {
        Ok(version) => println!("{}: PDF {}", "Format".bold(), version),
        Err(_) => println!("{}: {}", "Format".bold(), "not a PDF".red()),
    }
    println!(
        "{}: {}",
        "Strategies".bold(),
        converter.strategy_names().join(" → ")
    );

    let extraction = converter.extract(&data)?;
    let doc = &extraction.document;

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Strategy".bold(), extraction.strategy);
    println!("{}: {}", "Pages".bold(), doc.metadata().page_count);
    println!("{}: {}", "Paragraphs".bold(), doc.len());
    println!("{}: {}", "List items".bold(), doc.list_item_count());
    println!(
        "{}: {}",
        "Words".bold(),
        doc.plain_text().split_whitespace().count()
    );

    for attempt in &extraction.attempts {
        println!("{}: {}", "Skipped".bold(), attempt);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfdocx".cyan().bold(), env!("CARGO_PKG_VERSION"));
}
