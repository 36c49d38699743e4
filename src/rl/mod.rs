//! Tabular reinforcement learning for Flappy Bird
//!
//! Provides:
//! - Discretized state keys (bucketed gap offset, velocity, pipe position)
//! - A value table with default-on-miss reads
//! - An epsilon-greedy Q-learning agent
//! - The RL environment facade over the game engine
//! - JSON persistence for the value table

pub mod agent;
pub mod config;
pub mod environment;
pub mod observation;
pub mod persistence;
pub mod q_table;

pub use agent::QAgent;
pub use config::QLearningConfig;
pub use environment::FlappyEnvironment;
pub use observation::{discretize, StateKey};
pub use persistence::{load_table, save_table};
pub use q_table::{ActionValues, QTable};

/// Salt mixed into the run seed for the agent's exploration stream
pub const AGENT_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;
