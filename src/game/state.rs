use super::config::GameConfig;
use rand::Rng;

/// The bird controlled by the player or the agent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bird {
    /// Horizontal position, never changes
    pub x: f64,
    /// Vertical position, y grows downwards
    pub y: f64,
    /// Vertical velocity
    pub velocity: f64,
}

impl Bird {
    pub fn new(x: f64, y: f64, velocity: f64) -> Self {
        Self { x, y, velocity }
    }

    /// Create a bird at the configured spawn point
    pub fn spawn(config: &GameConfig) -> Self {
        Self::new(config.spawn_x(), config.spawn_y(), config.spawn_velocity)
    }

    /// Advance the bird by one tick
    ///
    /// Gravity is applied first, a jump then overrides the velocity, and the
    /// integrated position is clamped into the world.
    pub fn advance(&mut self, jump: bool, config: &GameConfig) {
        self.velocity += config.gravity;
        if jump {
            self.velocity = config.jump_velocity;
        }
        self.y = (self.y + self.velocity).clamp(0.0, config.world_height);
    }
}

/// A pipe pair with a vertical gap the bird has to fly through
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    /// Left edge of the pipe
    pub x: f64,
    /// Top of the gap
    pub gap_y: f64,
    pub gap_height: f64,
    pub width: f64,
    /// Bumped every time the pipe is recycled to the right edge
    pub generation: u64,
}

impl Pipe {
    /// Create a pipe at `x` with a random gap
    pub fn new<R: Rng + ?Sized>(x: f64, config: &GameConfig, rng: &mut R) -> Self {
        Self::with_gap(x, random_gap(config, rng), config)
    }

    /// Create a pipe with a fixed gap position
    pub fn with_gap(x: f64, gap_y: f64, config: &GameConfig) -> Self {
        Self {
            x,
            gap_y,
            gap_height: config.gap_height,
            width: config.pipe_width,
            generation: 0,
        }
    }

    /// Right edge of the pipe
    pub fn trailing_edge(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom of the gap
    pub fn gap_bottom(&self) -> f64 {
        self.gap_y + self.gap_height
    }

    /// Move the pipe left, recycling it once it is fully off screen
    pub fn advance<R: Rng + ?Sized>(&mut self, config: &GameConfig, rng: &mut R) {
        self.x -= config.pipe_speed;
        if self.x <= -self.width {
            self.x = config.pipe_reset_x;
            self.gap_y = random_gap(config, rng);
            self.generation += 1;
        }
    }

    /// Check if the bird is inside the pipe body
    ///
    /// Both intervals are open: a bird exactly on a pipe edge is not inside
    /// the pipe, and a bird exactly on a gap edge is not inside the gap.
    pub fn collides_with(&self, bird: &Bird) -> bool {
        let within_pipe = self.x < bird.x && bird.x < self.trailing_edge();
        let within_gap = self.gap_y < bird.y && bird.y < self.gap_bottom();
        within_pipe && !within_gap
    }
}

fn random_gap<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> f64 {
    rng.gen_range(config.gap_min_y..=config.gap_max_y())
}

/// Identity of the pipe the bird has to pass next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedPipe {
    pub index: usize,
    pub generation: u64,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub bird: Bird,
    /// Fixed-size set of pipes, recycled in place
    pub pipes: Vec<Pipe>,
    pub next_pipe: TrackedPipe,
    pub score: u32,
    pub steps: u32,
    pub is_alive: bool,
}

impl GameState {
    /// Create a new game state tracking the first pipe
    ///
    /// # Panics
    ///
    /// Panics if `pipes` is empty.
    pub fn new(bird: Bird, pipes: Vec<Pipe>) -> Self {
        assert!(!pipes.is_empty(), "game state needs at least one pipe");
        let next_pipe = TrackedPipe {
            index: 0,
            generation: pipes[0].generation,
        };

        Self {
            bird,
            pipes,
            next_pipe,
            score: 0,
            steps: 0,
            is_alive: true,
        }
    }

    /// The pipe currently tracked as the next one to pass
    pub fn next_pipe(&self) -> &Pipe {
        &self.pipes[self.next_pipe.index]
    }

    /// Find the nearest pipe whose trailing edge is at or ahead of the bird
    pub fn find_next_pipe(&self) -> Option<TrackedPipe> {
        self.pipes
            .iter()
            .enumerate()
            .filter(|(_, pipe)| pipe.trailing_edge() >= self.bird.x)
            .min_by(|(_, a), (_, b)| a.x.total_cmp(&b.x))
            .map(|(index, pipe)| TrackedPipe {
                index,
                generation: pipe.generation,
            })
    }
}
