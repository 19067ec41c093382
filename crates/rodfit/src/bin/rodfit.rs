//! rodfit CLI: inspect numbered frame sequences and fit a rod to one frame.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rodfit::io::{ImageSequence, ReadMode};
use rodfit::{fit_source_frame, FilterKind, FitParams, FrameSource, PipelineParams};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "rodfit")]
#[command(about = "Fit a capsule-shaped rod to edges in a numbered image sequence")]
#[command(version)]
struct Cli {
    /// Log progress to stderr (repeat for more detail).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print how many consecutive frames the pattern matches.
    Info(SequenceArgs),

    /// Filter one frame and fit a rod starting from a drag.
    Fit(FitArgs),
}

#[derive(Debug, Clone, Args)]
struct SequenceArgs {
    /// printf-style pattern with one integer placeholder, e.g. `frames/img%04d.png`.
    pattern: String,

    /// Index substituted for the first frame.
    #[arg(default_value_t = 1)]
    start: usize,
}

#[derive(Debug, Clone, Args)]
struct FitArgs {
    #[command(flatten)]
    sequence: SequenceArgs,

    /// Frame to fit, counted from the first discovered file.
    #[arg(long, default_value_t = 0)]
    frame: usize,

    /// Filter pipeline producing the edge surface.
    #[arg(long, default_value = "blur-sobel", value_parser = parse_kind)]
    filter: FilterKind,

    /// Kernel size for edge and blur stages (odd).
    #[arg(long)]
    ksize: Option<usize>,

    /// Drag endpoints in pixels.
    #[arg(long, num_args = 4, value_names = ["X1", "Y1", "X2", "Y2"], allow_negative_numbers = true, required = true)]
    drag: Vec<f64>,

    /// Outline points per objective evaluation (overrides the config file).
    #[arg(long)]
    points: Option<usize>,

    /// Channel layout frames are decoded into.
    #[arg(long, value_enum, default_value_t = ReadMode::Gray)]
    mode: ReadMode,

    /// JSON file with `FitParams`; missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON file with `PipelineParams`; missing fields keep their defaults.
    #[arg(long)]
    pipeline: Option<PathBuf>,

    /// Write the fit report here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn parse_kind(s: &str) -> Result<FilterKind, String> {
    s.parse::<FilterKind>().map_err(|e| {
        let names: Vec<&str> = FilterKind::ALL.iter().map(|k| k.name()).collect();
        format!("{e} (expected one of: {})", names.join(", "))
    })
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    // With `tracing`, RUST_LOG drives the subscriber instead of `-v`.
    #[cfg(feature = "tracing")]
    rodfit::core::init_tracing(false);
    #[cfg(not(feature = "tracing"))]
    rodfit::core::init_with_verbosity(cli.verbose)?;

    match cli.command {
        Commands::Info(args) => run_info(&args),
        Commands::Fit(args) => run_fit(&args),
    }
}

fn run_info(args: &SequenceArgs) -> CliResult<()> {
    let frames = ImageSequence::open(&args.pattern, args.start, ReadMode::Gray)?;
    let name: String = args.pattern.chars().take(20).collect();
    println!("{name} : {} frames", frames.len());
    Ok(())
}

fn run_fit(args: &FitArgs) -> CliResult<()> {
    let mut params: FitParams = match &args.config {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => FitParams::default(),
    };
    if let Some(points) = args.points {
        params.points = points;
    }
    let mut pipeline: PipelineParams = match &args.pipeline {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => PipelineParams::default(),
    };
    if let Some(ksize) = args.ksize {
        pipeline.ksize = ksize;
    }
    let drag: [f64; 4] = match args.drag.as_slice() {
        &[x1, y1, x2, y2] => [x1, y1, x2, y2],
        _ => return Err("--drag takes exactly four numbers".into()),
    };

    let frames = ImageSequence::open(&args.sequence.pattern, args.sequence.start, args.mode)?;
    log::info!("{} frames, fitting frame {}", frames.len(), args.frame);
    let report = fit_source_frame(&frames, args.frame, args.filter, &pipeline, drag, &params)?;

    let json = serde_json::to_string_pretty(&report)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, &json)?;
            log::info!("report written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
