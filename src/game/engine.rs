use super::{
    action::Action,
    config::GameConfig,
    state::{Bird, GameState, Pipe},
};
use rand::{rngs::StdRng, SeedableRng};

/// Information about a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepInfo {
    /// Whether the bird passed a pipe this step
    pub passed_pipe: bool,
    /// Whether the bird crashed this step
    pub collided: bool,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Reward for this step (for RL training)
    pub reward: f64,
    /// Whether the game has terminated
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine seeded from system entropy
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a game engine whose gap positions are reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Reset the game to initial state
    pub fn reset(&mut self) -> GameState {
        let bird = Bird::spawn(&self.config);
        let pipes = (0..self.config.pipe_count)
            .map(|i| {
                let x = self.config.pipe_start_x + i as f64 * self.config.pipe_spacing;
                Pipe::new(x, &self.config, &mut self.rng)
            })
            .collect();

        GameState::new(bird, pipes)
    }

    /// Execute one step of the game
    pub fn step(&mut self, state: &mut GameState, action: Action) -> StepResult {
        if !state.is_alive {
            return StepResult {
                reward: 0.0,
                terminated: true,
                info: StepInfo::default(),
            };
        }

        for pipe in state.pipes.iter_mut() {
            pipe.advance(&self.config, &mut self.rng);
        }
        state.bird.advance(action.is_jump(), &self.config);
        state.steps += 1;

        let mut reward = self.config.tick_reward;
        let mut info = StepInfo::default();

        // A different nearest pipe means the tracked one is now behind the bird
        if let Some(next) = state.find_next_pipe() {
            if next != state.next_pipe {
                state.next_pipe = next;
                state.score += 1;
                reward = self.config.pass_reward;
                info.passed_pipe = true;
            }
        }

        if state.next_pipe().collides_with(&state.bird) {
            state.is_alive = false;
            info.collided = true;

            return StepResult {
                reward: self.config.collision_reward,
                terminated: true,
                info,
            };
        }

        StepResult {
            reward,
            terminated: false,
            info,
        }
    }
}
