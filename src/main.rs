//! Watch Resampler CLI
//!
//! Minute-level resampler for wearable sensor recordings.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use watch_resampler::{
    process, Config, JsonFileSink, JsonRecordingSource, PipelineOptions, StepMode, VERSION,
};

#[derive(Parser)]
#[command(name = "watch-resample")]
#[command(version = VERSION)]
#[command(about = "Minute-level resampler for wearable sensor recordings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resample one recording into a minute-level JSON record
    Process {
        /// Input file: a .json recording
        #[arg(long)]
        input_filename: PathBuf,

        /// Output file name; the written file gets an identity and hour
        /// prefix. Defaults to the input name inside the configured
        /// output directory.
        #[arg(long)]
        output_filename: Option<PathBuf>,

        /// Bucket width in seconds (overrides the configured value)
        #[arg(long)]
        interval: Option<u64>,

        /// Step aggregation mode: cumulative or events
        #[arg(long)]
        step_mode: Option<String>,

        /// Write compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },

    /// Show configuration
    Config,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input_filename,
            output_filename,
            interval,
            step_mode,
            compact,
        } => {
            cmd_process(&input_filename, output_filename, interval, step_mode, compact);
        }
        Commands::Config => {
            cmd_config();
        }
    }
}

fn cmd_process(
    input: &Path,
    output: Option<PathBuf>,
    interval: Option<u64>,
    step_mode: Option<String>,
    compact: bool,
) {
    if !is_recording_file(input) {
        eprintln!("Error: {} is not a .json recording", input.display());
        std::process::exit(1);
    }

    let config = Config::load().unwrap_or_default();

    let interval = interval.map(Duration::from_secs).unwrap_or(config.interval);
    if interval.is_zero() {
        eprintln!("Error: interval must be at least one second");
        std::process::exit(1);
    }

    let step_mode = match step_mode {
        Some(name) => match StepMode::from_name(&name) {
            Some(mode) => mode,
            None => {
                eprintln!("Error: unknown step mode '{name}' (expected cumulative or events)");
                std::process::exit(1);
            }
        },
        None => config.step_mode,
    };

    let output_path = match output {
        Some(path) => path,
        None => {
            if let Err(e) = config.ensure_directories() {
                eprintln!("Error: could not create output directory: {e}");
                std::process::exit(1);
            }
            let name = input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "record.json".to_string());
            config.output_dir.join(name)
        }
    };

    let source = match JsonRecordingSource::open(input) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: could not read {}: {e}", input.display());
            std::process::exit(1);
        }
    };

    let mut sink = JsonFileSink::new(output_path, !compact && config.pretty_output);
    let options = PipelineOptions {
        interval,
        step_mode,
    };

    match process(&source, &mut sink, &options) {
        Ok(outcome) => {
            let result = serde_json::json!({
                "result": "success",
                "pwid": outcome.identity,
                "timestamp": outcome.timestamp,
                "path": outcome.output,
            });
            println!("{result}");
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_config() {
    let config = Config::load().unwrap_or_default();

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).unwrap_or_else(|_| "Error".to_string())
    );
}

fn is_recording_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}
