//! Training mode for the Q-learning agent
//!
//! Runs headless episodes in the Flappy Bird environment, updates the value
//! table after every step, logs progress and periodically checkpoints the
//! table to disk.
//!
//! # Example
//!
//! ```rust,no_run
//! use flappy_rl::modes::{TrainConfig, TrainMode};
//! use std::path::PathBuf;
//!
//! let mut config = TrainConfig::new(10_000, PathBuf::from("qlearning.json"));
//! config.seed = Some(42);
//!
//! let mut train_mode = TrainMode::new(config)?;
//! train_mode.run()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

use crate::game::GameConfig;
use crate::metrics::TrainingStats;
use crate::rl::{
    load_table, save_table, FlappyEnvironment, QAgent, QLearningConfig, AGENT_SEED_SALT,
};

/// Configuration for training mode
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Number of episodes to train
    pub num_episodes: usize,

    /// Path the value table is loaded from and saved to
    pub table_path: PathBuf,

    /// Save the table every N episodes
    pub checkpoint_frequency: usize,

    /// Log training progress every N episodes
    pub log_frequency: usize,

    /// Number of trailing episodes averaged in progress logs
    pub stats_window: usize,

    /// End an episode after this many steps even if the bird is alive
    pub max_episode_steps: Option<usize>,

    /// Seed for pipe gaps and exploration, entropy if absent
    pub seed: Option<u64>,

    /// Game configuration (world size, physics, rewards)
    pub game_config: GameConfig,

    /// Q-learning hyperparameters
    pub q_config: QLearningConfig,
}

impl TrainConfig {
    /// Create a new training configuration with defaults
    pub fn new(num_episodes: usize, table_path: PathBuf) -> Self {
        Self {
            num_episodes,
            table_path,
            checkpoint_frequency: 1000,
            log_frequency: 100,
            stats_window: 100,
            max_episode_steps: None,
            seed: None,
            game_config: GameConfig::default(),
            q_config: QLearningConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.checkpoint_frequency == 0 {
            return Err("checkpoint_frequency must be at least 1".to_string());
        }
        if self.log_frequency == 0 {
            return Err("log_frequency must be at least 1".to_string());
        }
        if self.stats_window == 0 {
            return Err("stats_window must be at least 1".to_string());
        }
        if self.max_episode_steps == Some(0) {
            return Err("max_episode_steps must be at least 1".to_string());
        }
        self.game_config.validate()?;
        self.q_config.validate()
    }
}

/// Outcome of a single training episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeSummary {
    pub reward: f64,
    pub steps: usize,
    pub score: u32,
}

/// Training mode for the Q-learning agent
pub struct TrainMode {
    agent: QAgent,
    env: FlappyEnvironment,
    stats: TrainingStats,
    config: TrainConfig,
}

impl TrainMode {
    /// Create a new training mode
    ///
    /// Does not touch the filesystem; the table is loaded by [`TrainMode::run`].
    pub fn new(config: TrainConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow!("Invalid training configuration: {}", e))?;

        let (env, agent) = match config.seed {
            Some(seed) => (
                FlappyEnvironment::with_seed(config.game_config.clone(), seed),
                QAgent::with_seed(config.q_config.clone(), seed ^ AGENT_SEED_SALT),
            ),
            None => (
                FlappyEnvironment::new(config.game_config.clone()),
                QAgent::new(config.q_config.clone()),
            ),
        };

        Ok(Self {
            agent,
            env,
            stats: TrainingStats::new(config.stats_window),
            config,
        })
    }

    /// Run the training loop
    ///
    /// Loads any persisted table first, so training resumes where the last
    /// run stopped. A corrupt table aborts before the first episode.
    pub fn run(&mut self) -> Result<()> {
        self.print_header();
        self.load_table()?;

        for episode in 0..self.config.num_episodes {
            let summary = self.run_episode();
            self.stats
                .record_episode(summary.reward, summary.steps, summary.score);

            if (episode + 1) % self.config.log_frequency == 0 {
                self.log_progress(episode + 1);
            }

            if (episode + 1) % self.config.checkpoint_frequency == 0 {
                self.save_table()?;
                tracing::info!("  Checkpoint saved: {:?}", self.config.table_path);
            }
        }

        self.save_table()?;

        println!("\nTraining complete!");
        println!("Value table saved to: {:?}", self.config.table_path);
        println!("\nFinal Statistics:");
        println!("{}", self.stats.format_summary());

        Ok(())
    }

    /// Run a single training episode, updating the table after every step
    pub fn run_episode(&mut self) -> EpisodeSummary {
        let mut state = self.env.reset();
        let mut episode_reward = 0.0;
        let mut episode_steps = 0;

        loop {
            let action = self.agent.select_action(state);
            let (next_state, reward, done) = self.env.step_action(action);
            self.agent.update(state, action, reward, next_state);

            episode_reward += reward;
            episode_steps += 1;
            state = next_state;

            let truncated = self
                .config
                .max_episode_steps
                .is_some_and(|max| episode_steps >= max);
            if done || truncated {
                break;
            }
        }

        EpisodeSummary {
            reward: episode_reward,
            steps: episode_steps,
            score: self.env.score(),
        }
    }

    fn load_table(&mut self) -> Result<()> {
        let path = &self.config.table_path;
        match load_table(path).context("Failed to load value table")? {
            Some(table) => {
                tracing::info!("Loaded {} states from {:?}", table.len(), path);
                self.agent.load_table(table);
            }
            None => {
                tracing::info!("No value table at {:?}, starting from scratch", path);
            }
        }
        Ok(())
    }

    fn save_table(&self) -> Result<()> {
        save_table(self.agent.table(), &self.config.table_path).with_context(|| {
            format!(
                "Failed to save value table to {:?}",
                self.config.table_path
            )
        })
    }

    pub fn agent(&self) -> &QAgent {
        &self.agent
    }

    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    /// Print training header information
    fn print_header(&self) {
        let q = &self.config.q_config;
        println!("{}", "=".repeat(70));
        println!("Q-Learning Training - Flappy Bird");
        println!("{}", "=".repeat(70));
        println!("Episodes: {}", self.config.num_episodes);
        println!(
            "World: {}x{}, {} pipes",
            self.config.game_config.world_width,
            self.config.game_config.world_height,
            self.config.game_config.pipe_count
        );
        println!("Q-Learning Config:");
        println!("  Learning rate: {}", q.learning_rate);
        println!("  Discount: {}", q.discount);
        println!(
            "  Epsilon: {} (-{} per action, floor {})",
            q.epsilon, q.epsilon_decay, q.min_epsilon
        );
        println!("Checkpoints: Every {} episodes", self.config.checkpoint_frequency);
        println!("Logging: Every {} episodes", self.config.log_frequency);
        println!("Table path: {:?}", self.config.table_path);
        if let Some(seed) = self.config.seed {
            println!("Seed: {}", seed);
        }
        println!("{}", "=".repeat(70));
        println!();
    }

    fn log_progress(&self, episode: usize) {
        tracing::info!(
            "[Episode {}/{}] Mean score (last {}): {:.2} | Best: {} | Epsilon: {:.4} | States: {}",
            episode,
            self.config.num_episodes,
            self.stats.window_size().min(self.stats.total_episodes()),
            self.stats.mean_episode_score(),
            self.stats.best_score(),
            self.agent.epsilon(),
            self.agent.table().len(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir, episodes: usize) -> TrainConfig {
        let mut config = TrainConfig::new(episodes, temp_dir.path().join("table.json"));
        config.seed = Some(1234);
        config.checkpoint_frequency = 5;
        config.log_frequency = 5;
        config
    }

    #[test]
    fn test_train_config_creation() {
        let config = TrainConfig::new(1000, PathBuf::from("test.json"));
        assert_eq!(config.num_episodes, 1000);
        assert_eq!(config.table_path, PathBuf::from("test.json"));
        assert_eq!(config.checkpoint_frequency, 1000);
        assert_eq!(config.log_frequency, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = TrainConfig::new(10, PathBuf::from("test.json"));
        config.log_frequency = 0;
        assert!(TrainMode::new(config).is_err());
    }

    #[test]
    fn test_run_single_episode() {
        let temp_dir = TempDir::new().unwrap();
        let mut train_mode = TrainMode::new(test_config(&temp_dir, 1)).unwrap();

        let summary = train_mode.run_episode();

        assert!(summary.steps > 0);
        assert!(!train_mode.agent().table().is_empty());
        // Episodes only end on a crash when there is no step limit
        assert!(summary.reward < 0.0);
    }

    #[test]
    fn test_max_episode_steps_truncates() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = test_config(&temp_dir, 1);
        config.max_episode_steps = Some(3);
        let mut train_mode = TrainMode::new(config).unwrap();

        let summary = train_mode.run_episode();
        assert_eq!(summary.steps, 3);
    }

    #[test]
    fn test_run_saves_table() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir, 12);
        let path = config.table_path.clone();
        let mut train_mode = TrainMode::new(config).unwrap();

        train_mode.run().unwrap();

        assert_eq!(train_mode.stats().total_episodes(), 12);
        let saved = load_table(&path).unwrap().unwrap();
        assert_eq!(&saved, train_mode.agent().table());
    }

    #[test]
    fn test_resume_merges_saved_table() {
        let temp_dir = TempDir::new().unwrap();

        let mut first = TrainMode::new(test_config(&temp_dir, 5)).unwrap();
        first.run().unwrap();
        let first_states = first.agent().table().len();

        let mut second = TrainMode::new(test_config(&temp_dir, 0)).unwrap();
        second.run().unwrap();

        assert_eq!(second.agent().table().len(), first_states);
    }

    #[test]
    fn test_corrupt_table_aborts() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir, 5);
        std::fs::write(&config.table_path, "not a table").unwrap();
        let mut train_mode = TrainMode::new(config).unwrap();

        assert!(train_mode.run().is_err());
        assert_eq!(train_mode.stats().total_episodes(), 0);
    }

    #[test]
    fn test_seeded_training_is_reproducible() {
        let temp_a = TempDir::new().unwrap();
        let temp_b = TempDir::new().unwrap();

        let mut a = TrainMode::new(test_config(&temp_a, 0)).unwrap();
        let mut b = TrainMode::new(test_config(&temp_b, 0)).unwrap();

        for _ in 0..20 {
            assert_eq!(a.run_episode(), b.run_episode());
        }
        assert_eq!(a.agent().table(), b.agent().table());
    }
}
