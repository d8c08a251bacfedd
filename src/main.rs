use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use corroscan::{AnalysisError, AnalyzerConfig, CorrosionAnalyzer};

#[derive(Parser)]
#[command(name = "corroscan")]
#[command(about = "Measure surface corrosion on a photographed fastener")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE", required_unless_present = "print_default_config")]
    image_path: Option<PathBuf>,

    /// JSON file overriding the default thresholds
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Save debug outputs to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Print the built-in configuration as JSON and exit
    #[arg(long)]
    print_default_config: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if args.print_default_config {
        println!("{}", AnalyzerConfig::default().to_json_pretty()?);
        return Ok(ExitCode::SUCCESS);
    }

    let config = match &args.config {
        Some(path) => AnalyzerConfig::load(path)?,
        None => AnalyzerConfig::default(),
    };

    let mut analyzer = CorrosionAnalyzer::new(config)?;
    if let Some(debug_dir) = args.debug_out {
        analyzer = analyzer.with_debug(debug_dir);
    }

    let image_path = args
        .image_path
        .ok_or_else(|| anyhow::anyhow!("no input image given"))?;

    let result = match analyzer.analyze_path(&image_path) {
        Ok(result) => result,
        Err(e) if e.is_client_error() => {
            eprintln!("{}: {}", image_path.display(), e);
            return Ok(ExitCode::from(2));
        }
        Err(AnalysisError::Io(e)) => {
            return Err(anyhow::anyhow!("Failed to read {}: {}", image_path.display(), e));
        }
        Err(e) => return Err(e.into()),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("=== Corrosion Analysis: {} ===", image_path.display());
        println!("Object pixels:  {}", result.object_pixels);
        println!("Total affected: {:6.2}%", result.total_affected);
        println!("  Red:          {:6.2}%", result.red);
        println!("  Black:        {:6.2}%", result.black);
        println!("  White:        {:6.2}%", result.white);
    }

    Ok(ExitCode::SUCCESS)
}
