//! Tabular Q-learning agent
//!
//! Keeps the value table and the exploration rate, chooses actions with an
//! epsilon-greedy policy, and applies one-step temporal-difference updates.

use rand::{rngs::StdRng, Rng, SeedableRng};

use super::config::QLearningConfig;
use super::observation::StateKey;
use super::q_table::QTable;
use crate::game::Action;

/// Q-learning agent for Flappy Bird
///
/// # Example
///
/// ```rust
/// use flappy_rl::game::Action;
/// use flappy_rl::rl::{QAgent, QLearningConfig, StateKey};
///
/// let mut agent = QAgent::with_seed(QLearningConfig::default(), 7);
/// let state = StateKey::new(0, 0, 400);
/// let next = StateKey::new(0, 2, 395);
///
/// let action = agent.select_action(state);
/// agent.update(state, action, 1.0, next);
/// assert!(agent.table().value(&state, action) > 0.0);
/// ```
pub struct QAgent {
    table: QTable,
    config: QLearningConfig,
    epsilon: f64,
    rng: StdRng,
}

impl QAgent {
    /// Create a new agent seeded from system entropy
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid.
    pub fn new(config: QLearningConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an agent whose exploration is reproducible
    pub fn with_seed(config: QLearningConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: QLearningConfig, rng: StdRng) -> Self {
        config.validate().expect("Invalid Q-learning configuration");

        Self {
            table: QTable::new(),
            epsilon: config.epsilon,
            config,
            rng,
        }
    }

    /// Choose an action with the epsilon-greedy policy
    ///
    /// Epsilon decays before the draw, and never below `min_epsilon`.
    pub fn select_action(&mut self, state: StateKey) -> Action {
        self.decay_epsilon();

        if self.rng.gen_bool(self.epsilon) {
            Action::from_index(self.rng.gen_range(0..Action::COUNT))
        } else {
            self.greedy_action(&state)
        }
    }

    /// Action with the highest stored value, ties resolved to `Idle`
    pub fn greedy_action(&self, state: &StateKey) -> Action {
        self.table.best_action(state)
    }

    /// Apply one temporal-difference update
    ///
    /// Returns the new value of `(state, action)`.
    pub fn update(
        &mut self,
        state: StateKey,
        action: Action,
        reward: f64,
        next_state: StateKey,
    ) -> f64 {
        // Read before writing: state and next_state may be the same key
        let next_max = self.table.max_value(&next_state);
        let alpha = self.config.learning_rate;
        let gamma = self.config.discount;

        let value = &mut self.table.get_mut(state)[action.index()];
        *value += alpha * (reward + gamma * next_max - *value);
        *value
    }

    fn decay_epsilon(&mut self) {
        self.epsilon = (self.epsilon - self.config.epsilon_decay).max(self.config.min_epsilon);
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Override the exploration rate, clamped into `[min_epsilon, 1]`
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon.clamp(self.config.min_epsilon, 1.0);
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    /// Merge previously persisted values into the table
    pub fn load_table(&mut self, table: QTable) {
        self.table.merge(table);
    }

    pub fn config(&self) -> &QLearningConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(dy: i32) -> StateKey {
        StateKey::new(dy, 0, 400)
    }

    #[test]
    fn test_td_update() {
        let config = QLearningConfig {
            learning_rate: 0.5,
            discount: 0.9,
            ..Default::default()
        };
        let mut agent = QAgent::with_seed(config, 0);

        agent.table.merge([(key(2), [4.0, 10.0])].into_iter().collect());

        // 0 + 0.5 * (1 + 0.9 * 10 - 0) = 5
        let value = agent.update(key(1), Action::Jump, 1.0, key(2));
        assert!((value - 5.0).abs() < 1e-9);
        assert_eq!(agent.table().get(&key(1)), [0.0, 5.0]);

        // 5 + 0.5 * (-3 + 0.9 * 10 - 5) = 5.5
        let value = agent.update(key(1), Action::Jump, -3.0, key(2));
        assert!((value - 5.5).abs() < 1e-9);
    }

    #[test]
    fn test_update_self_transition_reads_old_value() {
        let config = QLearningConfig {
            learning_rate: 1.0,
            discount: 0.5,
            ..Default::default()
        };
        let mut agent = QAgent::with_seed(config, 0);
        agent.table.merge([(key(1), [2.0, 0.0])].into_iter().collect());

        // max(Q[s]) = 2 is read before Q[s][idle] is overwritten
        let value = agent.update(key(1), Action::Idle, 1.0, key(1));
        assert!((value - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_collision_penalty_dominates() {
        let mut agent = QAgent::with_seed(QLearningConfig::default(), 0);

        agent.update(key(1), Action::Idle, 1.0, key(2));
        agent.update(key(1), Action::Jump, -10_000.0, key(2));

        assert_eq!(agent.greedy_action(&key(1)), Action::Idle);
    }

    #[test]
    fn test_zero_epsilon_is_greedy() {
        let mut agent = QAgent::with_seed(QLearningConfig::greedy(), 3);
        agent.table.merge(
            [(key(1), [0.0, 1.0]), (key(2), [1.0, 0.0])]
                .into_iter()
                .collect(),
        );

        for _ in 0..1_000 {
            assert_eq!(agent.select_action(key(1)), Action::Jump);
            assert_eq!(agent.select_action(key(2)), Action::Idle);
            assert_eq!(agent.select_action(key(3)), Action::Idle);
        }
        assert_eq!(agent.epsilon(), 0.0);
    }

    #[test]
    fn test_full_exploration_picks_both_actions() {
        let config = QLearningConfig {
            epsilon: 1.0,
            epsilon_decay: 0.0,
            ..Default::default()
        };
        let mut agent = QAgent::with_seed(config, 9);

        let jumps = (0..1_000)
            .filter(|_| agent.select_action(key(1)) == Action::Jump)
            .count();
        assert!(jumps > 300 && jumps < 700);
    }

    #[test]
    fn test_epsilon_decay_floors() {
        let config = QLearningConfig {
            epsilon: 0.001,
            epsilon_decay: 0.0004,
            min_epsilon: 0.0,
            ..Default::default()
        };
        let mut agent = QAgent::with_seed(config, 0);

        agent.select_action(key(1));
        assert!((agent.epsilon() - 0.0006).abs() < 1e-12);

        for _ in 0..10 {
            agent.select_action(key(1));
        }
        assert_eq!(agent.epsilon(), 0.0);
    }

    #[test]
    fn test_set_epsilon_clamped() {
        let config = QLearningConfig {
            min_epsilon: 0.05,
            ..Default::default()
        };
        let mut agent = QAgent::with_seed(config, 0);

        agent.set_epsilon(0.0);
        assert_eq!(agent.epsilon(), 0.05);
        agent.set_epsilon(2.0);
        assert_eq!(agent.epsilon(), 1.0);
    }

    #[test]
    fn test_seeded_agents_agree() {
        let mut a = QAgent::with_seed(QLearningConfig::default(), 21);
        let mut b = QAgent::with_seed(QLearningConfig::default(), 21);

        for i in 0..500 {
            assert_eq!(a.select_action(key(i % 7)), b.select_action(key(i % 7)));
        }
    }

    #[test]
    fn test_load_table_merges() {
        let mut agent = QAgent::with_seed(QLearningConfig::default(), 0);
        agent.update(key(1), Action::Jump, 1.0, key(2));

        agent.load_table([(key(5), [3.0, 4.0])].into_iter().collect());

        assert_eq!(agent.table().len(), 2);
        assert_eq!(agent.greedy_action(&key(5)), Action::Jump);
    }
}
