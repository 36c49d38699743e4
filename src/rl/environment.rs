use super::observation::{discretize, StateKey};
use crate::game::{Action, GameConfig, GameEngine, GameState};

/// Flappy Bird environment for reinforcement learning
///
/// Wraps the game engine and provides the RL interface:
/// - Discretized [`StateKey`] observations
/// - Discrete action space (0: Idle, 1: Jump)
/// - Standard RL interface (reset, step)
pub struct FlappyEnvironment {
    engine: GameEngine,
    state: GameState,
}

impl FlappyEnvironment {
    /// Create a new environment seeded from system entropy
    pub fn new(config: GameConfig) -> Self {
        Self::from_engine(GameEngine::new(config))
    }

    /// Create an environment whose pipe layout is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::from_engine(GameEngine::with_seed(config, seed))
    }

    fn from_engine(mut engine: GameEngine) -> Self {
        let state = engine.reset();
        Self { engine, state }
    }

    /// Reset the environment and return the initial observation
    pub fn reset(&mut self) -> StateKey {
        self.state = self.engine.reset();
        discretize(&self.state)
    }

    /// Step the environment with a discrete action
    ///
    /// Actions:
    /// - 1: Jump
    /// - anything else: Idle
    ///
    /// Returns: (observation, reward, done)
    pub fn step(&mut self, action_idx: usize) -> (StateKey, f64, bool) {
        self.step_action(Action::from_index(action_idx))
    }

    /// Step the environment with a typed action
    pub fn step_action(&mut self, action: Action) -> (StateKey, f64, bool) {
        let result = self.engine.step(&mut self.state, action);
        (discretize(&self.state), result.reward, result.terminated)
    }

    /// Get current observation without stepping
    pub fn observation(&self) -> StateKey {
        discretize(&self.state)
    }

    /// Get reference to current game state
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Bird, Pipe};

    #[test]
    fn test_environment_creation() {
        let env = FlappyEnvironment::with_seed(GameConfig::default(), 0);

        assert!(env.state().is_alive);
        assert_eq!(env.score(), 0);
        assert_eq!(env.state().steps, 0);
    }

    #[test]
    fn test_reset_observation() {
        let mut env = FlappyEnvironment::with_seed(GameConfig::default(), 0);
        let obs = env.reset();

        assert_eq!(obs.velocity, 0);
        assert_eq!(obs.pipe_x, 400);
        assert_eq!(obs, env.observation());
    }

    #[test]
    fn test_step_idle() {
        let mut env = FlappyEnvironment::with_seed(GameConfig::default(), 0);
        env.reset();

        let (obs, reward, done) = env.step(0);

        assert_eq!(reward, 1.0);
        assert!(!done);
        assert_eq!(obs.velocity, 2);
        assert_eq!(obs.pipe_x, 395);
    }

    #[test]
    fn test_step_jump() {
        let mut env = FlappyEnvironment::with_seed(GameConfig::default(), 0);
        env.reset();

        let (obs, _, _) = env.step(1);
        assert_eq!(obs.velocity, -80);
    }

    #[test]
    fn test_invalid_action_is_idle() {
        let mut a = FlappyEnvironment::with_seed(GameConfig::default(), 8);
        let mut b = FlappyEnvironment::with_seed(GameConfig::default(), 8);
        a.reset();
        b.reset();

        assert_eq!(a.step(7), b.step(0));
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn test_gravity_only_episode_crashes() {
        let config = GameConfig::default();
        let mut env = FlappyEnvironment::with_seed(config.clone(), 0);
        env.state = GameState::new(
            Bird::new(120.0, 320.0, 0.0),
            vec![
                Pipe::with_gap(400.0, 300.0, &config),
                Pipe::with_gap(700.0, 300.0, &config),
                Pipe::with_gap(1000.0, 300.0, &config),
            ],
        );

        let mut outcome = None;
        for _ in 0..140 {
            let (_, reward, done) = env.step(0);
            if done {
                outcome = Some(reward);
                break;
            }
        }

        assert_eq!(outcome, Some(config.collision_reward));
        assert!(!env.state().is_alive);
    }

    #[test]
    fn test_seeded_trajectories_match() {
        let mut a = FlappyEnvironment::with_seed(GameConfig::default(), 99);
        let mut b = FlappyEnvironment::with_seed(GameConfig::default(), 99);

        for episode in 0..3 {
            assert_eq!(a.reset(), b.reset());
            let mut done = false;
            let mut t = 0usize;
            while !done {
                let action = (t + episode) % 13 == 0;
                let step_a = a.step(action as usize);
                let step_b = b.step(action as usize);
                assert_eq!(step_a, step_b);
                done = step_a.2;
                t += 1;
            }
            assert_eq!(a.state(), b.state());
        }
    }
}
