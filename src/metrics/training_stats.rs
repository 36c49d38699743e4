//! Training statistics tracking for Q-learning
//!
//! Tracks episode rewards, lengths and scores over a rolling window, plus
//! run totals.

use std::collections::VecDeque;

/// Training statistics tracker with rolling averages
///
/// # Example
///
/// ```rust
/// use flappy_rl::metrics::TrainingStats;
///
/// let mut stats = TrainingStats::new(100);
///
/// // Record an episode
/// stats.record_episode(150.0, 150, 2);
///
/// println!("Mean score: {}", stats.mean_episode_score());
/// println!("{}", stats.format_summary());
/// ```
#[derive(Debug, Clone)]
pub struct TrainingStats {
    /// Episode rewards (rolling window)
    episode_rewards: VecDeque<f64>,

    /// Episode lengths in steps (rolling window)
    episode_lengths: VecDeque<usize>,

    /// Episode scores, pipes passed (rolling window)
    episode_scores: VecDeque<u32>,

    /// Total number of episodes completed
    total_episodes: usize,

    /// Total number of environment steps taken
    total_steps: usize,

    /// Highest score seen in any episode
    best_score: u32,

    /// Window size for rolling averages
    window_size: usize,
}

impl TrainingStats {
    /// Create a new training statistics tracker
    ///
    /// # Arguments
    ///
    /// * `window_size` - Number of recent values to keep for rolling averages
    pub fn new(window_size: usize) -> Self {
        Self {
            episode_rewards: VecDeque::with_capacity(window_size),
            episode_lengths: VecDeque::with_capacity(window_size),
            episode_scores: VecDeque::with_capacity(window_size),
            total_episodes: 0,
            total_steps: 0,
            best_score: 0,
            window_size,
        }
    }

    /// Record the completion of an episode
    ///
    /// # Arguments
    ///
    /// * `reward` - Total reward accumulated during the episode
    /// * `length` - Number of steps taken in the episode
    /// * `score` - Final score (pipes passed)
    pub fn record_episode(&mut self, reward: f64, length: usize, score: u32) {
        Self::push_deque(&mut self.episode_rewards, reward, self.window_size);
        Self::push_deque(&mut self.episode_lengths, length, self.window_size);
        Self::push_deque(&mut self.episode_scores, score, self.window_size);
        self.total_episodes += 1;
        self.total_steps += length;
        self.best_score = self.best_score.max(score);
    }

    /// Get the mean episode reward over the rolling window
    pub fn mean_episode_reward(&self) -> f64 {
        if self.episode_rewards.is_empty() {
            0.0
        } else {
            self.episode_rewards.iter().sum::<f64>() / self.episode_rewards.len() as f64
        }
    }

    /// Get the mean episode length over the rolling window
    pub fn mean_episode_length(&self) -> f64 {
        let sum: usize = self.episode_lengths.iter().sum();
        if self.episode_lengths.is_empty() {
            0.0
        } else {
            sum as f64 / self.episode_lengths.len() as f64
        }
    }

    /// Get the mean episode score over the rolling window
    pub fn mean_episode_score(&self) -> f64 {
        let sum: u32 = self.episode_scores.iter().sum();
        if self.episode_scores.is_empty() {
            0.0
        } else {
            sum as f64 / self.episode_scores.len() as f64
        }
    }

    /// Get the total number of episodes completed
    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    /// Get the total number of environment steps taken
    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    /// Get the window size for rolling averages
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Format a summary of the current statistics
    pub fn format_summary(&self) -> String {
        format!(
            "Episodes: {} | Steps: {} | Score: {:.2} | Best: {} | Reward: {:.2} | Len: {:.1}",
            self.total_episodes,
            self.total_steps,
            self.mean_episode_score(),
            self.best_score,
            self.mean_episode_reward(),
            self.mean_episode_length(),
        )
    }

    /// Helper function to push to a deque with size limit
    fn push_deque<T>(deque: &mut VecDeque<T>, value: T, window_size: usize) {
        if deque.len() >= window_size {
            deque.pop_front();
        }
        deque.push_back(value);
    }
}
