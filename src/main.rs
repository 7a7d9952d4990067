use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lrcplay::fetch::{self, LoadOutcome, LyricFetcher, LyricSource};
use lrcplay::loader::LyricLoader;
use lrcplay::lyrics;
use lrcplay::player::{ControlState, LoopMode, PlayOrder, PlayerStore, SimulatedMedia};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "lrcplay=debug,reqwest=warn";

#[derive(Parser, Debug)]
#[command(name = "lrcplay", version, about = "Play synchronized LRC lyrics in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a JSON playlist with synchronized lyrics
    Play {
        playlist: PathBuf,

        /// Initial volume between 0 and 1
        #[arg(long, default_value_t = 0.7)]
        volume: f64,

        #[arg(long = "loop", value_enum, default_value_t = LoopMode::All)]
        loop_mode: LoopMode,

        #[arg(long, value_enum, default_value_t = PlayOrder::List)]
        order: PlayOrder,

        /// Length of each simulated song in seconds
        #[arg(long, default_value_t = 240.0)]
        song_length: f64,
    },
    /// Print lyrics, marking the line active at a position
    Show {
        /// URL, file path or inline LRC text
        source: String,

        /// Playback position in seconds
        #[arg(long)]
        at: Option<f64>,
    },
    /// Print normalized LRC
    Dump {
        /// URL, file path or inline LRC text
        source: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            playlist,
            volume,
            loop_mode,
            order,
            song_length,
        } => {
            // Keep the guard alive so buffered log lines are flushed on exit
            let _guard = init_file_logging()?;
            let control = ControlState {
                loop_mode,
                order,
                volume,
                ..ControlState::default()
            };
            run_player(&playlist, control, song_length).await
        }
        Commands::Show { source, at } => {
            init_stderr_logging();
            let track = load_track(&source).await?;
            let active = at.and_then(|position| track.active_index(position));
            for (idx, line) in track.iter().enumerate() {
                let marker = if Some(idx) == active { ">" } else { " " };
                println!(
                    "{} [{}] {}",
                    marker,
                    lyrics::parse::format_timestamp(line.time_seconds),
                    line.text
                );
            }
            Ok(())
        }
        Commands::Dump { source } => {
            init_stderr_logging();
            let track = load_track(&source).await?;
            print!("{}", lyrics::to_lrc(&track));
            Ok(())
        }
    }
}

fn init_file_logging() -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = lrcplay::paths::get_log_dir()?;
    let file_appender = tracing_appender::rolling::never(&log_dir, "lrcplay.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .init();

    Ok(guard)
}

fn init_stderr_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lrcplay=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run_player(playlist: &Path, control: ControlState, song_length: f64) -> Result<()> {
    tracing::info!("Starting lrcplay with playlist: {}", playlist.display());

    let songs = lrcplay::playlist::load(playlist)?;
    let store = PlayerStore::new(songs, control);
    let media = Box::new(SimulatedMedia::new(song_length));

    let mut app = lrcplay::tui::App::new(store, media, LyricLoader::default());
    app.run().await?;

    tracing::info!("lrcplay exited");
    Ok(())
}

/// Resolve a command-line source: URL, then file, then inline text
async fn load_track(source: &str) -> Result<lyrics::LyricTrack> {
    let source = if fetch::is_remote(source) {
        LyricSource::Remote(source.to_string())
    } else if Path::new(source).is_file() {
        let text = std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read lyric file: {}", source))?;
        LyricSource::Inline(text)
    } else {
        LyricSource::Inline(source.to_string())
    };

    let LoadOutcome { track, failure } = LyricFetcher::new().load(&source).await;
    if let Some(failure) = failure {
        anyhow::bail!("Could not load lyrics: {}", failure);
    }
    Ok(track)
}
