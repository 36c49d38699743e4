//! Discretized observations used as value-table keys
//!
//! The continuous game state is reduced to three integers:
//! - vertical offset between the bird and the top of the next gap, rounded to a multiple of 5
//! - bird velocity in tenths (every physics constant is a multiple of 0.1)
//! - horizontal position of the next pipe, rounded to a multiple of 5

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::game::GameState;

/// Bucket size for the positional components
pub const POSITION_BUCKET: f64 = 5.0;

/// Velocity resolution (values per unit of velocity)
///
/// Exact only while every velocity change is a multiple of 0.1, which
/// `GameConfig::validate` enforces.
pub const VELOCITY_SCALE: f64 = 10.0;

/// Discretized state used to index the value table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct StateKey {
    /// Bird y minus gap top, rounded to a multiple of 5
    pub dy: i32,
    /// Bird velocity in tenths
    pub velocity: i32,
    /// Next pipe x, rounded to a multiple of 5
    pub pipe_x: i32,
}

impl StateKey {
    pub fn new(dy: i32, velocity: i32, pipe_x: i32) -> Self {
        Self {
            dy,
            velocity,
            pipe_x,
        }
    }

    /// Build a key from raw continuous values
    pub fn from_raw(dy: f64, velocity: f64, pipe_x: f64) -> Self {
        Self {
            dy: bucket(dy),
            velocity: (velocity * VELOCITY_SCALE).round() as i32,
            pipe_x: bucket(pipe_x),
        }
    }
}

/// Create the discretized observation for the current game state
pub fn discretize(state: &GameState) -> StateKey {
    let pipe = state.next_pipe();
    StateKey::from_raw(state.bird.y - pipe.gap_y, state.bird.velocity, pipe.x)
}

fn bucket(value: f64) -> i32 {
    ((value / POSITION_BUCKET).round() * POSITION_BUCKET) as i32
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.dy, self.velocity, self.pipe_x)
    }
}

/// Error returned when a persisted state key cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStateKeyError(String);

impl fmt::Display for ParseStateKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid state key {:?}, expected \"dy:velocity:pipe_x\"", self.0)
    }
}

impl std::error::Error for ParseStateKeyError {}

impl FromStr for StateKey {
    type Err = ParseStateKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseStateKeyError(s.to_string());

        let mut parts = s.split(':').map(|part| part.trim().parse::<i32>());
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(Ok(dy)), Some(Ok(velocity)), Some(Ok(pipe_x)), None) => {
                Ok(Self::new(dy, velocity, pipe_x))
            }
            _ => Err(err()),
        }
    }
}

impl From<StateKey> for String {
    fn from(key: StateKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for StateKey {
    type Error = ParseStateKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
