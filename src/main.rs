use anyhow::Result;
use clap::{Parser, ValueEnum};
use flappy_rl::game::GameConfig;
use flappy_rl::modes::{EvaluateMode, HumanMode, TrainConfig, TrainMode};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flappy_rl")]
#[command(version, about = "Flappy Bird with a Q-learning agent")]
struct Cli {
    /// Game mode
    #[arg(long, value_enum, default_value = "human")]
    mode: Mode,

    /// Number of training episodes
    #[arg(long, default_value = "10000")]
    episodes: usize,

    /// Value table to load and save
    #[arg(long, default_value = "qlearning.json")]
    table: PathBuf,

    /// Seed for pipe gaps and exploration
    #[arg(long)]
    seed: Option<u64>,

    /// Ticks per second in the rendered modes
    #[arg(long, default_value = "60")]
    fps: u32,

    /// Save the table every N training episodes
    #[arg(long, default_value = "1000")]
    checkpoint_every: usize,

    /// Log training progress every N episodes
    #[arg(long, default_value = "100")]
    log_every: usize,

    /// Cap on steps per training episode
    #[arg(long)]
    max_steps: Option<usize>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play with keyboard controls
    Human,
    /// Train the agent headless
    Train,
    /// Watch the trained agent play
    Evaluate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Log to stderr; the TUI modes stay silent once the alternate screen is up
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let game_config = GameConfig::default();

    match cli.mode {
        Mode::Human => {
            let mut human_mode = HumanMode::new(game_config, cli.seed, cli.fps)?;
            human_mode.run().await?;
        }
        Mode::Train => {
            let mut config = TrainConfig::new(cli.episodes, cli.table);
            config.checkpoint_frequency = cli.checkpoint_every;
            config.log_frequency = cli.log_every;
            config.max_episode_steps = cli.max_steps;
            config.seed = cli.seed;
            config.game_config = game_config;

            let mut train_mode = TrainMode::new(config)?;
            train_mode.run()?;
        }
        Mode::Evaluate => {
            let mut evaluate_mode = EvaluateMode::new(&cli.table, game_config, cli.seed, cli.fps)?;
            evaluate_mode.run().await?;
        }
    }

    Ok(())
}
