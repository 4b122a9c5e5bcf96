use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use heic_convert::config::{self, OutputFormat, OutputLayout};
use heic_convert::decode;
use heic_convert::encode::ImageFileEncoder;
use heic_convert::logging;
use heic_convert::pipeline::{self, BatchConfig};

#[derive(Parser, Debug)]
#[command(
    name = "heic-convert",
    version,
    about = "Convert HEIC files in a directory tree to PNG or JPEG"
)]
struct Cli {
    /// Directory for HEIC files to convert
    #[arg(value_name = "INPUT", required_unless_present = "init")]
    input: Option<PathBuf>,

    /// Directory for converted files
    #[arg(value_name = "OUTPUT", required_unless_present = "init")]
    output: Option<PathBuf>,

    /// Output format
    #[arg(value_enum, value_name = "FORMAT", required_unless_present = "init")]
    format: Option<OutputFormat>,

    /// Path to config file (default: heic-convert.json next to binary)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Initialize a default config file and exit
    #[arg(long)]
    init: bool,

    /// JPEG quality (1-100)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: Option<u8>,

    /// Keep the input's subdirectories under the output directory
    #[arg(long)]
    mirror: bool,

    /// Copy the source Exif block into each converted file
    #[arg(long = "keep-exif")]
    keep_exif: bool,

    /// Print a JSON summary after the run
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Set up logging: stdout, "[LEVEL] message", skip records as "[SKIP]"
    logging::init(cli.verbose);

    // Handle --init
    if cli.init {
        let config = config::Config::default();
        let path = cli.config.as_deref();
        config.save(path)?;
        let save_path = match path {
            Some(p) => p.to_path_buf(),
            None => config::Config::config_path()?,
        };
        println!("Default config written to {}", save_path.display());
        return Ok(ExitCode::SUCCESS);
    }

    let (Some(input), Some(output), Some(format)) = (cli.input, cli.output, cli.format) else {
        anyhow::bail!("INPUT, OUTPUT and FORMAT are required. Use --help for usage.");
    };

    // Load config, then let flags override it
    let mut config = config::Config::load(cli.config.as_deref())?;
    if let Some(quality) = cli.quality {
        config.jpeg_quality = quality;
    }
    if cli.mirror {
        config.layout = OutputLayout::Mirror;
    }
    if cli.keep_exif {
        config.keep_exif = true;
    }

    let batch = BatchConfig::new(input, output, format, &config);
    let decoder = decode::default_decoder()
        .context("Built without HEIC support. Rebuild with `--features heif`.")?;
    let encoder = ImageFileEncoder::new(config.jpeg_quality);

    let summary = pipeline::run_batch(&batch, &*decoder, &encoder)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    if summary.all_failed() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
