/// Soundboard - headless soundboard host
use anyhow::Context;
use clap::{Parser, Subcommand};
use soundboard_cli::{AppConfig, ConsoleView, HostSimulator};
use soundboard_core::{MediaBackend, MemoryDocumentStore};
use soundboard_metadata::{probe_duration, FileScanner, ProbedMedia};
use soundboard_playback::{timeline, SoundPanel, SyncLoop, TransportController};
use soundboard_storage::{JsonDirectoryBackend, PreferenceStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "soundboard")]
#[command(about = "Headless soundboard host", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the audio files of a folder with their durations
    Scan {
        /// Folder to scan
        path: PathBuf,
    },
    /// Play every audio file of a folder as one playlist
    Play {
        /// Folder to import
        folder: PathBuf,
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Loop the first sound instead of advancing through the playlist
        #[arg(long)]
        repeat: bool,
        /// Local volume multiplier for the playlist, in [0, 1]
        #[arg(long)]
        volume: Option<f32>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soundboard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan { path } => scan(&path)?,
        Commands::Play {
            folder,
            config,
            repeat,
            volume,
        } => play(&folder, config.as_deref(), repeat, volume).await?,
    }

    Ok(())
}

fn scan(path: &Path) -> anyhow::Result<()> {
    let files = FileScanner::new()
        .scan_directory(path)
        .with_context(|| format!("Failed to scan {}", path.display()))?;

    println!("Found {} audio files:", files.len());
    for file in &files {
        match probe_duration(file) {
            Ok(seconds) => println!("  {} ({})", file.display(), timeline::format_time(seconds)),
            Err(e) => println!("  {} (unknown duration: {})", file.display(), e),
        }
    }

    Ok(())
}

async fn play(
    folder: &Path,
    config_path: Option<&Path>,
    repeat: bool,
    volume: Option<f32>,
) -> anyhow::Result<()> {
    let config = AppConfig::load(config_path)?;
    let poll = Duration::from_millis(config.transport.poll_interval_ms);

    let documents = Arc::new(MemoryDocumentStore::new());
    let media: Arc<dyn MediaBackend> = Arc::new(ProbedMedia::new());
    let preferences = Arc::new(
        PreferenceStore::open(JsonDirectoryBackend::new(&config.storage.preferences_dir))
            .context("Failed to open local preferences")?,
    );

    let controller = Arc::new(TransportController::new(
        documents.clone(),
        media.clone(),
        preferences,
        config.transport.clone(),
    ));
    let panel = SoundPanel::new(controller.clone());

    let name = folder
        .file_name()
        .map_or_else(|| "Soundboard".to_string(), |n| n.to_string_lossy().into_owned());
    let playlist = panel.create_playlist(&name).await?;
    let sounds = panel.import_folder(folder).await?;
    info!("Imported {} sounds into '{}'", sounds.len(), playlist.name);

    if let Some(volume) = volume {
        panel.set_playlist_volume(&playlist.id, volume)?;
    }

    let host = HostSimulator::new(documents.clone(), media).spawn();
    let view = ConsoleView::new();
    let sync = SyncLoop::spawn(controller.clone(), view.clone());

    controller.play_pause().await?;
    if repeat {
        controller.toggle_loop().await?;
    }

    let mut ticker = tokio::time::interval(poll);
    let mut idle_ticks = 0;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping playback");
                if let Err(e) = controller.stop().await {
                    warn!("Failed to stop playback: {}", e);
                }
                break;
            }
            _ = ticker.tick() => {
                // Auto-advance leaves nothing playing for a moment
                if controller.is_playlist_playing(&playlist.id) {
                    idle_ticks = 0;
                } else {
                    idle_ticks += 1;
                    if idle_ticks >= 2 {
                        info!("Playlist '{}' finished", playlist.name);
                        break;
                    }
                }
            }
        }
    }

    view.close();
    sync.stop().await;
    host.abort();

    Ok(())
}
