//! Flappy RL - A Flappy Bird clone with a tabular Q-learning agent
//!
//! This library provides:
//! - Core game logic and physics (game module)
//! - Discretized states, value table, agent and persistence (rl module)
//! - TUI rendering (render module)
//! - Keyboard input mapping (input module)
//! - Session and training statistics (metrics module)
//! - Execution modes: human, train, evaluate (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod rl;
