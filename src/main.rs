// src/main.rs
//! Geocoin - collect coins from caches scattered around you

use anyhow::Context;
use clap::{Parser, Subcommand};
use geocoin::{
    config::GameConfig,
    display::TerminalDisplay,
    game::{ledger, view::summarize_coins},
    location::{LocationSource, LocationTracker},
    storage::{self, FileStore},
    trail::{TrailExporter, TrailFormat},
    GameSession,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "geocoin", version, about = "Collect coins from caches scattered around you")]
struct Cli {
    /// Config file (defaults to ~/.config/geocoin/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for the saved game and log file
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Location source: none, gpsd or serial
    #[arg(long, global = true)]
    source: Option<String>,

    /// gpsd address as host:port
    #[arg(long, global = true)]
    gpsd: Option<String>,

    /// Serial device for an NMEA receiver
    #[arg(long, global = true)]
    serial_port: Option<String>,

    #[arg(long, global = true, default_value_t = 9600)]
    baudrate: u32,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play in the terminal (default)
    Play,
    /// Print a summary of the saved game
    Status,
    /// Erase the saved game
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Write the effective configuration to the config file
    Init,
    /// Write the movement trail to a file
    ExportTrail {
        #[arg(long, value_enum, default_value_t = TrailFormat::Gpx)]
        format: TrailFormat,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = build_config(&cli)?;

    let data_dir = config.resolve_data_dir()?;
    let _log_guard = init_logging(&data_dir)?;
    let store = FileStore::new(data_dir.join("store"))?;

    match cli.command.unwrap_or(Commands::Play) {
        Commands::Play => play(config, store).await,
        Commands::Status => status(&config, &store),
        Commands::Reset { yes } => reset(store, yes),
        Commands::Init => {
            match cli.config {
                Some(ref path) => config.save_to(path)?,
                None => config.save()?,
            }
            println!("Configuration saved.");
            Ok(())
        }
        Commands::ExportTrail { format, output } => export_trail(&config, &store, format, output),
    }
}

fn build_config(cli: &Cli) -> anyhow::Result<GameConfig> {
    let mut config = match cli.config {
        Some(ref path) => GameConfig::load_from(path)?,
        None => GameConfig::load()?,
    };

    if let Some(ref dir) = cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    if let Some(ref source) = cli.source {
        config.update_source(source);
    }
    if let Some(ref address) = cli.gpsd {
        let (host, port) = address
            .rsplit_once(':')
            .context("--gpsd expects host:port")?;
        let port = port.parse().context("invalid gpsd port")?;
        config.update_gpsd(host.to_string(), port);
    }
    if let Some(ref port) = cli.serial_port {
        config.update_serial(port.clone(), cli.baudrate);
    }

    config.validate()?;
    Ok(config)
}

/// Log to a file in the data directory so the terminal UI stays clean
fn init_logging(data_dir: &Path) -> anyhow::Result<tracing_appender::non_blocking::WorkerGuard> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("creating {}", data_dir.display()))?;

    let appender = tracing_appender::rolling::never(data_dir, "geocoin.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}

async fn play(config: GameConfig, store: FileStore) -> anyhow::Result<()> {
    let source = LocationSource::from_config(&config)?;
    let timeout = Duration::from_secs(config.location_timeout_secs.max(1));

    let (tx, rx) = mpsc::unbounded_channel();
    let mut session = GameSession::new(config, Box::new(store));
    if let Some(source) = source {
        session = session.with_location(LocationTracker::new(tx, timeout), source);
    }

    tracing::info!("Starting game at {}", session.state().player.position);
    let mut display = TerminalDisplay::new();
    display.run(&mut session, rx).await?;
    Ok(())
}

fn status(config: &GameConfig, store: &FileStore) -> anyhow::Result<()> {
    let Some(state) = storage::load_game(store, config) else {
        println!("No saved game.");
        return Ok(());
    };

    let stocked = state.caches.values().filter(|c| !c.is_empty()).count();
    println!("Position:  {} (cell {})", state.player.position, state.current_cell());
    println!("Inventory: {}", summarize_coins(&state.player.coins));
    println!("Caches:    {} known, {} with coins", state.caches.len(), stocked);
    println!("Coins:     {} in the world", ledger::total_coins(&state));
    println!("Trail:     {} positions", state.player.history.len());
    Ok(())
}

fn reset(mut store: FileStore, yes: bool) -> anyhow::Result<()> {
    if !yes {
        print!("Erase all progress? [y/N] ");
        std::io::Write::flush(&mut std::io::stdout())?;
        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer)?;
        if !answer.trim().eq_ignore_ascii_case("y") {
            println!("Reset cancelled.");
            return Ok(());
        }
    }

    storage::clear_game(&mut store)?;
    tracing::info!("Saved game erased from the command line");
    println!("Saved game erased.");
    Ok(())
}

fn export_trail(
    config: &GameConfig,
    store: &FileStore,
    format: TrailFormat,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let state = storage::load_game(store, config).context("no saved game to export")?;
    let path = output.unwrap_or_else(|| PathBuf::from(format!("trail.{}", format.extension())));

    TrailExporter::new("Geocoin trail", &state.player.history).export_to_file(&path, format)?;
    println!(
        "Wrote {} positions as {} to {}",
        state.player.history.len(),
        format.display_name(),
        path.display()
    );
    Ok(())
}
