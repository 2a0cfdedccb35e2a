use anyhow::{Context, Result};
use clap::Parser;
use snake_grid::game::{GameConfig, PartialConfig, WorldState};
use snake_grid::ranking::{
    JsonFileStore, MemoryStore, RankingLedger, RankingStore, current_player, default_ranking_path,
};
use snake_grid::session::Session;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snake_grid")]
#[command(version, about = "Snake on a wrap-around grid")]
struct Cli {
    /// Cells per side of the board
    #[arg(long)]
    grid_size: Option<usize>,

    /// Milliseconds between ticks
    #[arg(long)]
    tick_ms: Option<u64>,

    /// JSON game configuration; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ranking file (defaults to ~/.snake_grid-ranking.json)
    #[arg(long)]
    ranking_file: Option<PathBuf>,

    /// Name recorded in the ranking (defaults to the OS user)
    #[arg(long)]
    player: Option<String>,

    /// Seed for food and obstacle placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Start playing without the title screen
    #[arg(long)]
    skip_title: bool,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut partial = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config from {:?}", path))?;
                serde_json::from_str::<PartialConfig>(&json)
                    .with_context(|| format!("Failed to parse config {:?}", path))?
            }
            None => PartialConfig::default(),
        };

        if let Some(grid_size) = self.grid_size {
            partial.grid_size = Some(grid_size);
        }
        if let Some(tick_ms) = self.tick_ms {
            partial.tick_interval = Some(Duration::from_millis(tick_ms));
        }

        let config = partial.resolve();
        config.validate()?;
        Ok(config)
    }

    fn ranking_store(&self) -> Box<dyn RankingStore> {
        match self.ranking_file.clone().or_else(default_ranking_path) {
            Some(path) => {
                info!(?path, "using ranking file");
                Box::new(JsonFileStore::new(path))
            }
            None => {
                warn!("no home directory, ranking will not be saved");
                Box::new(MemoryStore::new())
            }
        }
    }
}

/// The terminal belongs to the game, so logs only go to a file
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = File::create(path).with_context(|| format!("Failed to create log file {:?}", path))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    let config = cli.game_config()?;
    let world = match cli.seed {
        Some(seed) => WorldState::with_seed(config, seed)?,
        None => WorldState::new(config)?,
    };

    let ranking = RankingLedger::load(cli.ranking_store());
    let player = cli.player.clone().unwrap_or_else(current_player);

    let mut session = Session::new(world, ranking, player.clone()).skip_title(cli.skip_title);
    let summary = session.run().await?;

    println!("{}: {} points", player, summary.score);
    if let Some(err) = &summary.ranking.save_error {
        eprintln!("Could not save ranking: {}", err);
    }

    Ok(())
}
