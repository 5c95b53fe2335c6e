/// Melody - command-line music player front end
use anyhow::Context;
use clap::{Parser, Subcommand};
use melody_cli::{
    config::AppConfig,
    error::CliError,
    format::{format_time, progress_bar},
};
use melody_client::{LrcLibClient, MusicClient};
use melody_core::{JsonFileStore, KeyValueStore, MusicApi, TrackDescriptor, TrackId, UserId};
use melody_playback::{
    enrich_descriptor, parse_start_param, Acquisition, CoordinatorMessage, LyricsService,
    NullTransport, PlaybackCoordinator, Selection, SessionStore,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "melody")]
#[command(about = "Melody Player command-line client", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// User identity (overrides the saved session)
    #[arg(short, long, global = true, env = "MELODY_USER_ID")]
    user: Option<i64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save a user identity for later commands
    Login {
        /// Telegram chat id
        user_id: i64,
    },
    /// Forget the saved identity
    Logout,
    /// List the user's library
    Library,
    /// Search the catalogue
    Search {
        /// Search query
        query: String,
    },
    /// Request a track and follow its download
    Play {
        /// Track id or deep-link start parameter (`track_<id>`)
        track: String,
        /// Return immediately instead of waiting for a background download
        #[arg(long)]
        no_wait: bool,
    },
    /// Show the acquisition status of a track
    Status {
        /// Track id
        id: i64,
    },
    /// Show the estimated download queue wait
    QueueStats,
    /// Print lyrics for a track
    Lyrics {
        /// Track id
        id: i64,
    },
    /// Add a track to the library
    Like {
        /// Track id
        id: i64,
    },
    /// Remove a track from the library
    Unlike {
        /// Track id
        id: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "melody_cli=info,melody_playback=info,melody_client=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    config.validate()?;

    let store: Arc<dyn KeyValueStore> = Arc::new(
        JsonFileStore::open(&config.storage.state_file).with_context(|| {
            format!(
                "Failed to open state file {}",
                config.storage.state_file.display()
            )
        })?,
    );
    let sessions = SessionStore::new(Arc::clone(&store));

    let client = MusicClient::new(config.api_config())?;
    tracing::debug!("Backend: {}", client.url());
    let api: Arc<dyn MusicApi> = Arc::new(client);

    let user = match cli.user {
        Some(id) => Some(UserId::new(id)),
        None => sessions.restore()?,
    };

    match cli.command {
        Commands::Login { user_id } => {
            sessions.login(UserId::new(user_id))?;
            println!("Logged in as {}", user_id);
        }
        Commands::Logout => {
            sessions.logout()?;
            println!("Logged out");
        }
        Commands::Library => {
            let user = user.ok_or(CliError::NoUser)?;
            list_library(api.as_ref(), user).await?;
        }
        Commands::Search { query } => {
            search(api.as_ref(), &query).await?;
        }
        Commands::Play { track, no_wait } => {
            play(&config, api, user, &track, !no_wait).await?;
        }
        Commands::Status { id } => {
            let status = api.track_status(TrackId::new(id)).await?;
            println!("{} - {}: {}", status.artist, status.title, status.status);
            if let Some(link) = status.play_link {
                println!("Play link: {}", link);
            }
        }
        Commands::QueueStats => {
            let seconds = api.queue_wait_estimate().await?;
            println!("Estimated queue wait: {}", format_time(seconds));
        }
        Commands::Lyrics { id } => {
            let provider = Arc::new(LrcLibClient::new(config.lyrics_config())?);
            let track = enrich_descriptor(api.as_ref(), TrackId::new(id)).await;
            print_lyrics(LyricsService::new(provider, store), &track).await;
        }
        Commands::Like { id } => {
            let user = user.ok_or(CliError::NoUser)?;
            set_liked(&config, api, user, TrackId::new(id), true).await?;
        }
        Commands::Unlike { id } => {
            let user = user.ok_or(CliError::NoUser)?;
            set_liked(&config, api, user, TrackId::new(id), false).await?;
        }
    }

    Ok(())
}

async fn list_library(api: &dyn MusicApi, user: UserId) -> anyhow::Result<()> {
    let tracks = api.fetch_library(user).await?;
    if tracks.is_empty() {
        println!("Library is empty");
        return Ok(());
    }

    println!("{} tracks:", tracks.len());
    for track in &tracks {
        print_track(track);
    }
    Ok(())
}

async fn search(api: &dyn MusicApi, query: &str) -> anyhow::Result<()> {
    let results = api.search(query).await?;
    if results.is_empty() {
        println!("No results");
    }
    for track in &results {
        print_track(track);
    }
    Ok(())
}

fn print_track(track: &TrackDescriptor) {
    let duration = track
        .duration
        .map(|secs| format!(" ({})", format_time(f64::from(secs))))
        .unwrap_or_default();
    println!("  [{}] {}{}", track.id, track.display_name(), duration);
}

async fn play(
    config: &AppConfig,
    api: Arc<dyn MusicApi>,
    user: Option<UserId>,
    param: &str,
    wait: bool,
) -> anyhow::Result<()> {
    let id = parse_start_param(param).map_err(anyhow::Error::msg)?;

    let mut coordinator = PlaybackCoordinator::new(
        Arc::clone(&api),
        Box::new(NullTransport::new()),
        config.playback_config(),
    );

    let mut track = None;
    if let Some(user) = user {
        coordinator.set_user(user);
        if let Err(e) = coordinator.refresh_library().await {
            tracing::warn!("Could not load library: {}", e);
        }
        track = coordinator.library().get(id).cloned();
    }
    let track = match track {
        Some(track) => track,
        None => enrich_descriptor(api.as_ref(), id).await,
    };

    println!("Requesting {}", track.display_name());
    match coordinator.select_track(track).await? {
        Selection::Playing => {
            if let Some(current) = coordinator.current_track() {
                println!("Ready: {}", current.media_locator);
            }
            return Ok(());
        }
        Selection::Failed => {
            report_acquisition(coordinator.acquisition(id));
            return Ok(());
        }
        Selection::Downloading => {
            println!("Track is downloading");
        }
        Selection::Toggled | Selection::Ignored => return Ok(()),
    }

    if !wait {
        return Ok(());
    }

    enum Wake {
        Message(Option<CoordinatorMessage>),
        Tick,
    }

    let mut ticker = coordinator.progress_ticker();
    let mut last_drawn = None;
    while !coordinator.pending().is_empty() {
        let wake = tokio::select! {
            message = coordinator.next_message() => Wake::Message(message),
            _ = ticker.tick() => Wake::Tick,
        };

        match wake {
            Wake::Message(Some(message)) => coordinator.handle_message(message).await,
            Wake::Message(None) => break,
            Wake::Tick => {
                if let Some(progress) = coordinator.progress(id) {
                    let percent = (progress * 100.0).round() as u32;
                    if last_drawn != Some(percent) {
                        eprint!("\r{} {:>3}%", progress_bar(progress, 30), percent);
                        last_drawn = Some(percent);
                    }
                }
            }
        }
    }
    eprintln!();

    for event in coordinator.drain_events() {
        tracing::debug!(?event, "Playback event");
    }
    report_acquisition(coordinator.acquisition(id));
    Ok(())
}

fn report_acquisition(acquisition: Acquisition) {
    match acquisition {
        Acquisition::Ready { locator } => println!("Ready: {}", locator),
        Acquisition::Failed { reason } => println!("Failed: {}", reason),
        Acquisition::Resolving { .. } => println!("Still downloading"),
        Acquisition::NotRequested => println!("Not requested"),
    }
}

async fn print_lyrics(service: LyricsService, track: &TrackDescriptor) {
    let lyrics = service.lyrics_for(track).await;
    println!("{}", track.display_name());
    for line in &lyrics.lines {
        match line.time {
            Some(time) => println!("[{}] {}", format_time(time), line.text),
            None => println!("{}", line.text),
        }
    }
}

async fn set_liked(
    config: &AppConfig,
    api: Arc<dyn MusicApi>,
    user: UserId,
    id: TrackId,
    liked: bool,
) -> anyhow::Result<()> {
    let mut coordinator = PlaybackCoordinator::new(
        Arc::clone(&api),
        Box::new(NullTransport::new()),
        config.playback_config(),
    );
    coordinator.set_user(user);
    coordinator.refresh_library().await?;

    if coordinator.is_favorite(id) == liked {
        println!("Nothing to do");
        return Ok(());
    }

    let track = match coordinator.library().get(id).cloned() {
        Some(track) => track,
        None => enrich_descriptor(api.as_ref(), id).await,
    };
    let now_liked = coordinator.toggle_like(&track).await?;
    println!(
        "{} {}",
        if now_liked { "Liked" } else { "Unliked" },
        track.display_name()
    );
    Ok(())
}
