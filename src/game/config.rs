use serde::{Deserialize, Serialize};

/// Configuration for the game world
///
/// Coordinates use screen orientation: `y` grows downwards, so gravity is
/// positive and a jump sets a negative velocity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the visible world
    pub world_width: f64,
    /// Height of the visible world
    pub world_height: f64,

    /// Velocity given to the bird on spawn
    pub spawn_velocity: f64,
    /// Added to the bird's velocity every tick
    pub gravity: f64,
    /// Velocity the bird is set to when it jumps
    pub jump_velocity: f64,
    /// Radius used when drawing the bird
    pub bird_radius: f64,

    /// Number of pipes kept in rotation
    pub pipe_count: usize,
    /// Horizontal position of the first pipe after a reset
    pub pipe_start_x: f64,
    /// Horizontal distance between consecutive pipes after a reset
    pub pipe_spacing: f64,
    /// Horizontal position a pipe jumps to once it leaves the screen
    pub pipe_reset_x: f64,
    /// Distance every pipe moves left per tick
    pub pipe_speed: f64,
    /// Width of a pipe
    pub pipe_width: f64,
    /// Height of the passable gap
    pub gap_height: f64,
    /// Margin kept between the gap and the top/bottom of the world
    pub gap_min_y: f64,

    // Rewards (for RL)
    /// Reward for surviving a tick
    pub tick_reward: f64,
    /// Reward for the tick in which a pipe is passed
    pub pass_reward: f64,
    /// Reward for crashing into a pipe
    pub collision_reward: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world_width: 600.0,
            world_height: 800.0,
            spawn_velocity: 0.0,
            gravity: 0.2,
            jump_velocity: -8.0,
            bird_radius: 20.0,
            pipe_count: 3,
            pipe_start_x: 400.0,
            pipe_spacing: 300.0,
            pipe_reset_x: 850.0,
            pipe_speed: 3.0,
            pipe_width: 50.0,
            gap_height: 200.0,
            gap_min_y: 10.0,
            tick_reward: 1.0,
            pass_reward: 50.0,
            collision_reward: -10_000.0,
        }
    }
}

impl GameConfig {
    /// Horizontal spawn position of the bird (20% from the left)
    pub fn spawn_x(&self) -> f64 {
        self.world_width * 0.2
    }

    /// Vertical spawn position of the bird (40% from the top)
    pub fn spawn_y(&self) -> f64 {
        self.world_height * 0.4
    }

    /// Largest gap position that keeps the whole gap on screen with margin
    pub fn gap_max_y(&self) -> f64 {
        self.world_height - self.gap_height - self.gap_min_y
    }

    /// Validate configuration parameters
    ///
    /// # Returns
    ///
    /// `Ok(())` if the world is playable, `Err(String)` with an error message otherwise.
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("world_width", self.world_width),
            ("world_height", self.world_height),
            ("spawn_velocity", self.spawn_velocity),
            ("gravity", self.gravity),
            ("jump_velocity", self.jump_velocity),
            ("bird_radius", self.bird_radius),
            ("pipe_start_x", self.pipe_start_x),
            ("pipe_spacing", self.pipe_spacing),
            ("pipe_reset_x", self.pipe_reset_x),
            ("pipe_speed", self.pipe_speed),
            ("pipe_width", self.pipe_width),
            ("gap_height", self.gap_height),
            ("gap_min_y", self.gap_min_y),
            ("tick_reward", self.tick_reward),
            ("pass_reward", self.pass_reward),
            ("collision_reward", self.collision_reward),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(format!("{} must be finite, got {}", name, value));
        }

        // Observations store velocity in tenths, so every velocity change must be one
        for (name, value) in [
            ("spawn_velocity", self.spawn_velocity),
            ("gravity", self.gravity),
            ("jump_velocity", self.jump_velocity),
        ] {
            if !is_tenth_multiple(value) {
                return Err(format!("{} must be a multiple of 0.1, got {}", name, value));
            }
        }

        if self.world_width <= 0.0 || self.world_height <= 0.0 {
            return Err(format!(
                "world size must be positive, got {}x{}",
                self.world_width, self.world_height
            ));
        }

        if self.pipe_count == 0 {
            return Err("pipe_count must be at least 1".to_string());
        }

        if self.pipe_width <= 0.0 {
            return Err(format!(
                "pipe_width must be positive, got {}",
                self.pipe_width
            ));
        }

        if self.gap_height <= 0.0 {
            return Err(format!(
                "gap_height must be positive, got {}",
                self.gap_height
            ));
        }

        if self.pipe_speed <= 0.0 {
            return Err(format!(
                "pipe_speed must be positive, got {}",
                self.pipe_speed
            ));
        }

        if self.gap_min_y < 0.0 || self.gap_min_y > self.gap_max_y() {
            return Err(format!(
                "gap of height {} with margin {} does not fit a world of height {}",
                self.gap_height, self.gap_min_y, self.world_height
            ));
        }

        if self.collision_reward >= self.tick_reward {
            return Err(format!(
                "collision_reward ({}) must be below tick_reward ({})",
                self.collision_reward, self.tick_reward
            ));
        }

        Ok(())
    }
}

fn is_tenth_multiple(value: f64) -> bool {
    let tenths = value * 10.0;
    (tenths - tenths.round()).abs() < 1e-6
}
