use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use colored::Colorize;
use serde_json::json;
use untelecine::{Clip, ClipOptions, D2vIndex, DecimationOptions, StreamSummary};

const CLI_AFTER_HELP: &str = "Examples:\n  untelecine analyze VTS_01_1.d2v --json\n  untelecine convert VTS_01_1.d2v --mode floor --out frames.txt\n  untelecine convert VTS_01_1.d2v --mode floor --cycle 5 --offsets 1,2,3,4\n  untelecine validate VTS_01_1.d2v\n  untelecine completions zsh > _untelecine";

#[derive(Debug, Parser)]
#[command(
    name = "untelecine",
    version,
    about = "Analyze and convert soft-telecined MPEG-2 streams from DGIndex projects",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show additional logging output.
    #[arg(long)]
    verbose: bool,

    /// Allow overwriting existing output files.
    #[arg(long)]
    overwrite: bool,

    /// Log level (error, warn, info, debug, trace). RUST_LOG takes precedence.
    #[arg(long)]
    log_level: Option<String>,

    /// Keep fully progressive pulldown streams at their indexed rate.
    #[arg(long)]
    no_retime: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Duplicate pulled-down frames (higher rate, no loss).
    Ceil,
    /// Decimate interlaced sections (film rate).
    Floor,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print scan and cadence information for an index (alias: info).
    #[command(
        about = "Print scan and cadence information",
        visible_alias = "info",
        after_help = "Examples:\n  untelecine analyze VTS_01_1.d2v\n  untelecine analyze VTS_01_1.d2v --json"
    )]
    Analyze {
        /// Input D2V project file.
        input: PathBuf,

        /// Output the summary as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Convert to a constant frame rate and emit the resulting frame map.
    #[command(
        about = "Convert to a constant frame rate",
        after_help = "Examples:\n  untelecine convert VTS_01_1.d2v --mode ceil --json\n  untelecine convert VTS_01_1.d2v --mode floor --cycle 5 --out frames.txt"
    )]
    Convert {
        /// Input D2V project file.
        input: PathBuf,
        /// Conversion strategy.
        #[arg(long, value_enum, default_value_t = Mode::Floor)]
        mode: Mode,
        /// Decimation cycle (floor only; 0 or absent uses the detected one).
        #[arg(long)]
        cycle: Option<usize>,
        /// Comma-separated offsets to keep in each cycle (floor only).
        #[arg(long)]
        offsets: Option<String>,
        /// Write the source frame number of every output frame, one per line.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Output the result as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Check an index for cadence irregularities.
    #[command(about = "Check cadence regularity before converting")]
    Validate {
        /// Input D2V project file.
        input: PathBuf,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completion scripts")]
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_offsets(value: &str) -> Result<Vec<usize>, Box<dyn std::error::Error>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<usize>()
                .map_err(|_| Box::<dyn std::error::Error>::from(format!("invalid offset: {part}")))
        })
        .collect()
}

fn parse_log_level(value: &str) -> Option<log::LevelFilter> {
    match value.trim().to_ascii_lowercase().as_str() {
        "off" | "quiet" => Some(log::LevelFilter::Off),
        "error" => Some(log::LevelFilter::Error),
        "warn" | "warning" => Some(log::LevelFilter::Warn),
        "info" => Some(log::LevelFilter::Info),
        "debug" => Some(log::LevelFilter::Debug),
        "trace" => Some(log::LevelFilter::Trace),
        _ => None,
    }
}

fn init_logging(global: &GlobalOptions) -> Result<(), Box<dyn std::error::Error>> {
    let level = match &global.log_level {
        Some(level) => parse_log_level(level).ok_or(format!("unsupported --log-level: {level}"))?,
        None if global.verbose => log::LevelFilter::Debug,
        None => log::LevelFilter::Warn,
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
        .format_timestamp_millis()
        .init();
    Ok(())
}

fn ensure_writable_path(path: &Path, overwrite: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        if overwrite {
            eprintln!(
                "{} {}",
                "warning:".yellow().bold(),
                format!("overwriting {}", path.display()).yellow()
            );
        } else {
            return Err(format!(
                "output already exists: {} (use --overwrite to replace)",
                path.display()
            )
            .into());
        }
    }
    Ok(())
}

fn open_clip(input: &Path, global: &GlobalOptions) -> Result<Clip<usize>, Box<dyn std::error::Error>> {
    let index = D2vIndex::open(input)?;
    let frames: Vec<usize> = (0..index.frame_count()).collect();
    let options = ClipOptions::new().with_retime_progressive_pulldown(!global.no_retime);
    let mut clip = Clip::with_options(frames, index.flags(), index.frame_rate()?, &options)?;
    if let (Some(dar), Some((width, height))) = (index.aspect_ratio(), index.picture_size()) {
        clip = clip.with_display_aspect_ratio(dar, width, height);
    }
    Ok(clip)
}

fn summary_json(summary: &StreamSummary) -> serde_json::Value {
    json!({
        "total_frames": summary.total_frames,
        "progressive_frames": summary.progressive_frames,
        "interlaced_frames": summary.interlaced_frames,
        "progressive_percent": summary.progressive_percent(),
        "vfr": summary.vfr,
        "pulldown": summary.pulldown.as_ref().map(|pattern| json!({
            "pattern": pattern.to_string(),
            "cycle": pattern.cycle(),
        })),
        "frame_rate": summary.frame_rate.to_string(),
        "standard": summary.standard,
        "dar": summary.dar,
        "sar": summary.sar,
        "par": summary.par,
        "vob_ranges": summary.vob_ranges.iter().map(|range| json!({
            "vob": range.vob,
            "start": range.frames.start,
            "end": range.frames.end,
        })).collect::<Vec<_>>(),
    })
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.global)?;

    match cli.command {
        Commands::Analyze { input, json } => {
            let clip = open_clip(&input, &cli.global)?;
            let summary = clip.summary();
            if json {
                println!("{}", serde_json::to_string_pretty(&summary_json(&summary))?);
            } else {
                println!("{summary}");
            }
        }
        Commands::Convert {
            input,
            mode,
            cycle,
            offsets,
            out,
            json,
        } => {
            if let Some(path) = &out {
                ensure_writable_path(path, cli.global.overwrite)?;
            }
            let mut clip = open_clip(&input, &cli.global)?;
            let before = clip.len();
            match mode {
                Mode::Ceil => {
                    if cycle.is_some() || offsets.is_some() {
                        eprintln!(
                            "{} {}",
                            "warning:".yellow().bold(),
                            "--cycle and --offsets only apply to --mode floor".yellow()
                        );
                    }
                    clip.ceil()?;
                }
                Mode::Floor => {
                    let mut options = DecimationOptions::new().with_cycle(cycle.unwrap_or(0));
                    if let Some(offsets) = &offsets {
                        options = options.with_offsets(parse_offsets(offsets)?);
                    }
                    clip.floor(&options)?;
                }
            }

            let (frames, flags, frame_rate) = clip.into_parts();
            if let Some(path) = &out {
                let mut text = frames
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n");
                text.push('\n');
                fs::write(path, text)?;
            }

            if json {
                let payload = json!({
                    "input_frames": before,
                    "output_frames": frames.len(),
                    "frame_rate": frame_rate.to_string(),
                    "frames": frames.iter().zip(&flags).map(|(source, flag)| json!({
                        "source": source,
                        "progressive": flag.progressive,
                        "rff": flag.rff,
                        "tff": flag.tff,
                        "vob": flag.vob,
                        "cell": flag.cell,
                    })).collect::<Vec<_>>(),
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!(
                    "{} {} -> {} frames @ {}",
                    "converted".green().bold(),
                    before,
                    frames.len(),
                    frame_rate
                );
                if let Some(path) = &out {
                    println!("{} {}", "saved".green().bold(), path.display());
                }
            }
        }
        Commands::Validate { input } => {
            let clip = open_clip(&input, &cli.global)?;
            let report = clip.validate();
            print!("{report}");
            if !report.is_valid() {
                return Err(format!("{} error(s) found", report.errors.len()).into());
            }
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "untelecine", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}
