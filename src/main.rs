use clap::{Parser, Subcommand};

use spotgate::api::{DEFAULT_FOLLOWED_ARTISTS_LIMIT, DEFAULT_TOP_TRACKS_LIMIT};
use spotgate::cli::{auth, output, player, CommandContext};
use spotgate::TimeRange;

#[derive(Parser)]
#[command(name = "spotgate", version, about = "Control Spotify playback from a logged-in session")]
struct Cli {
    /// Path to a spotgate.json config file
    #[arg(long, global = true, env = "SPOTGATE_CONFIG")]
    config: Option<String>,

    /// Session profile to use
    #[arg(long, global = true, default_value = "default", env = "SPOTGATE_PROFILE")]
    profile: String,

    /// Print errors as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in through the browser and store tokens for this profile
    Login {
        /// How long to wait for the browser redirect, in milliseconds
        #[arg(long, env = "SPOTGATE_LOGIN_TIMEOUT_MS")]
        timeout_ms: Option<u64>,
    },

    /// Forget the tokens stored for this profile
    Logout,

    /// Show whether this profile is logged in
    Status,

    /// Show the currently playing track
    #[command(name = "now-playing")]
    NowPlaying,

    /// Pause playback
    Pause,

    /// Resume playback, or play a track by id or URI
    Play {
        /// Track id or spotify:track: URI
        track: Option<String>,
    },

    /// List your top tracks
    Top {
        #[arg(long, default_value_t = DEFAULT_TOP_TRACKS_LIMIT)]
        limit: u32,

        #[arg(long, value_enum, default_value_t = TimeRange::ShortTerm)]
        time_range: TimeRange,
    },

    /// List artists you follow
    Following {
        #[arg(long, default_value_t = DEFAULT_FOLLOWED_ARTISTS_LIMIT)]
        limit: u32,
    },

    /// Now playing, top tracks and followed artists at once
    Overview {
        #[arg(long, default_value_t = DEFAULT_TOP_TRACKS_LIMIT)]
        limit: u32,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("SPOTGATE_LOG_LEVEL")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json = cli.json;

    if let Err(e) = run(cli).await {
        output::print_error(&e, json);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), spotgate::SpotgateError> {
    let ctx = CommandContext::open(cli.config.as_deref(), &cli.profile)?;
    let json = cli.json;

    match cli.command {
        Commands::Login { timeout_ms } => {
            let timeout = std::time::Duration::from_millis(
                timeout_ms.unwrap_or(auth::DEFAULT_LOGIN_TIMEOUT_MS),
            );
            auth::run_login(&ctx, timeout).await
        }
        Commands::Logout => auth::run_logout(&ctx).await,
        Commands::Status => auth::run_status(&ctx).await,
        Commands::NowPlaying => player::run_now_playing(&ctx, json).await,
        Commands::Pause => player::run_pause(&ctx).await,
        Commands::Play { track } => player::run_play(&ctx, track.as_deref()).await,
        Commands::Top { limit, time_range } => {
            player::run_top(&ctx, limit, time_range, json).await
        }
        Commands::Following { limit } => player::run_following(&ctx, limit, json).await,
        Commands::Overview { limit } => player::run_overview(&ctx, limit, json).await,
    }
}
