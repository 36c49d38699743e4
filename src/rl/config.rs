//! Q-learning hyperparameter configuration

use serde::{Deserialize, Serialize};

/// Configuration for the tabular Q-learning agent
///
/// # Example
///
/// ```rust
/// use flappy_rl::rl::QLearningConfig;
///
/// // Use default hyperparameters
/// let config = QLearningConfig::default();
///
/// // Or customize specific parameters
/// let config = QLearningConfig {
///     learning_rate: 0.5,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QLearningConfig {
    /// Step size of the temporal-difference update (alpha)
    ///
    /// Default: 0.9
    pub learning_rate: f64,

    /// Discount factor for future rewards (gamma)
    ///
    /// Default: 0.95
    pub discount: f64,

    /// Initial exploration rate
    ///
    /// Default: 0.8
    pub epsilon: f64,

    /// Amount subtracted from epsilon on every action selection
    ///
    /// Default: 0.0001
    pub epsilon_decay: f64,

    /// Epsilon never decays below this value
    ///
    /// Default: 0.0
    pub min_epsilon: f64,
}

impl QLearningConfig {
    /// Configuration for greedy playback: no exploration at all
    pub fn greedy() -> Self {
        Self {
            epsilon: 0.0,
            epsilon_decay: 0.0,
            ..Default::default()
        }
    }

    /// Validate configuration parameters
    ///
    /// # Returns
    ///
    /// `Ok(())` if all parameters are valid, `Err(String)` with an error message otherwise.
    pub fn validate(&self) -> Result<(), String> {
        if self.learning_rate <= 0.0 || self.learning_rate > 1.0 {
            return Err(format!(
                "learning_rate must be in (0, 1], got {}",
                self.learning_rate
            ));
        }

        if !(0.0..=1.0).contains(&self.discount) {
            return Err(format!("discount must be in [0, 1], got {}", self.discount));
        }

        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(format!("epsilon must be in [0, 1], got {}", self.epsilon));
        }

        if self.epsilon_decay < 0.0 {
            return Err(format!(
                "epsilon_decay must be non-negative, got {}",
                self.epsilon_decay
            ));
        }

        if !(0.0..=1.0).contains(&self.min_epsilon) {
            return Err(format!(
                "min_epsilon must be in [0, 1], got {}",
                self.min_epsilon
            ));
        }

        if self.min_epsilon > self.epsilon {
            return Err(format!(
                "min_epsilon ({}) cannot exceed epsilon ({})",
                self.min_epsilon, self.epsilon
            ));
        }

        Ok(())
    }
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.9,
            discount: 0.95,
            epsilon: 0.8,
            epsilon_decay: 0.0001,
            min_epsilon: 0.0,
        }
    }
}
