//! bowsync CLI: bow-direction and note-event annotation for performance videos.
//!
//! Usage:
//!   bowsync direction <KEYPOINTS> -o <OUT>        Classify bow strokes
//!   bowsync events <PITCH> --audio <WAV> -o <OUT>  Classify note events
//!   bowsync sync <DIRECTIONS> <EVENTS> -o <OUT>    Fuse both streams
//!   bowsync cues <ANNOTATIONS> -o <OUT>            Plan overlay cues
//!   bowsync batch <DIR>                            Process every unit in a folder
//!   bowsync config                                 Show effective configuration

use std::path::PathBuf;

use anyhow::Context;
use bowsync_common::config::{AppConfig, DirectionPolarity, Instrument, SilenceStrategy};
use clap::{Parser, Subcommand, ValueEnum};

mod commands;
mod pipeline;

#[derive(Parser)]
#[command(
    name = "bowsync",
    about = "Bowing direction and note event synchronization for performance videos",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to $XDG_CONFIG_HOME/bowsync/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a keypoint trajectory into bow direction segments
    Direction {
        /// Keypoint table (Frame, Keypoint Index, X, Y)
        keypoints: PathBuf,

        /// Output direction table
        #[arg(short, long)]
        output: PathBuf,

        /// Keypoint index to track
        #[arg(long)]
        keypoint_index: Option<u32>,

        /// Majority-vote smoothing window
        #[arg(long)]
        window: Option<usize>,

        /// Up/Down sign convention
        #[arg(long, value_enum)]
        polarity: Option<PolarityArg>,
    },

    /// Classify pitch samples into silence / change / sustain events
    Events {
        /// Pitch table (Time (s), Frequency (Hz), Confidence, Frame)
        pitch: PathBuf,

        /// Performance audio (WAV) for energy-based silence detection
        #[arg(long)]
        audio: Option<PathBuf>,

        /// Output event table
        #[arg(short, long)]
        output: PathBuf,

        /// Silence detection strategy
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,

        /// Session metadata (StartFrame, EndFrame, Duration) for frame calibration
        #[arg(long)]
        metadata: Option<PathBuf>,

        /// Instrument range preset
        #[arg(long, value_enum)]
        instrument: Option<InstrumentArg>,
    },

    /// Fuse direction segments and note events into annotations
    Sync {
        /// Direction table
        directions: PathBuf,

        /// Event table
        events: PathBuf,

        /// Output annotation table
        #[arg(short, long)]
        output: PathBuf,

        /// Frame offset between the direction and event numberings
        #[arg(long, allow_negative_numbers = true)]
        offset: Option<i64>,

        /// Minimum consecutive silences promoted to a silence annotation
        #[arg(long)]
        min_silence_run: Option<usize>,
    },

    /// Plan per-frame overlay cues from an annotation table
    Cues {
        /// Annotation table
        annotations: PathBuf,

        /// Video frame width
        #[arg(long, default_value = "1920")]
        width: u32,

        /// Video frame height
        #[arg(long, default_value = "1080")]
        height: u32,

        /// Output cue plan (JSON)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Process every unit subdirectory of a folder
    Batch {
        /// Folder of unit directories
        dir: PathBuf,

        /// Maximum units processed at once (defaults to available cores)
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// Print the effective configuration
    Config {
        /// Save it to the standard location
        #[arg(long)]
        write: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PolarityArg {
    Fixed,
    AxisAware,
}

impl From<PolarityArg> for DirectionPolarity {
    fn from(arg: PolarityArg) -> Self {
        match arg {
            PolarityArg::Fixed => DirectionPolarity::Fixed,
            PolarityArg::AxisAware => DirectionPolarity::AxisAware,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Energy,
    Confidence,
}

impl From<StrategyArg> for SilenceStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Energy => SilenceStrategy::EnergyBased,
            StrategyArg::Confidence => SilenceStrategy::ConfidenceBased,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum InstrumentArg {
    Cello,
    Violin,
}

impl From<InstrumentArg> for Instrument {
    fn from(arg: InstrumentArg) -> Self {
        match arg {
            InstrumentArg::Cello => Instrument::Cello,
            InstrumentArg::Violin => Instrument::Violin,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AppConfig::load(),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    bowsync_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Direction {
            keypoints,
            output,
            keypoint_index,
            window,
            polarity,
        } => {
            if let Some(index) = keypoint_index {
                config.direction.keypoint_index = index;
            }
            if let Some(window) = window {
                config.direction.window_size = window;
            }
            if let Some(polarity) = polarity {
                config.direction.polarity = polarity.into();
            }
            commands::direction::run(keypoints, output, &config.direction)
        }
        Commands::Events {
            pitch,
            audio,
            output,
            strategy,
            metadata,
            instrument,
        } => {
            if let Some(strategy) = strategy {
                config.silence.strategy = strategy.into();
            }
            if let Some(instrument) = instrument {
                config.silence.instrument = instrument.into();
            }
            commands::events::run(pitch, audio, output, metadata, &config.silence)
        }
        Commands::Sync {
            directions,
            events,
            output,
            offset,
            min_silence_run,
        } => {
            if let Some(offset) = offset {
                config.sync.frame_offset = offset;
            }
            if let Some(run) = min_silence_run {
                config.sync.min_silence_run = run;
            }
            config.validate()?;
            commands::sync::run(directions, events, output, &config.sync)
        }
        Commands::Cues {
            annotations,
            width,
            height,
            output,
        } => commands::cues::run(annotations, width, height, output, &config.overlay),
        Commands::Batch { dir, jobs } => commands::batch::run(dir, jobs, config).await,
        Commands::Config { write } => commands::config::run(&config, write),
    }
}
