//! Draw commands for a game frame
//!
//! The scene is expressed in world coordinates (origin top-left, y down) so
//! any drawing surface can consume it.

use crate::game::{GameConfig, GameState};

/// A single draw command
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// The bird
    Circle { x: f64, y: f64, radius: f64 },
    /// One half of a pipe; `y` is the top edge
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// The score
    Text { x: f64, y: f64, text: String },
}

/// Build the draw commands for the current state
///
/// Pipes come first, then the bird, then the score text.
pub fn build_scene(state: &GameState, config: &GameConfig) -> Vec<Shape> {
    let mut shapes = Vec::with_capacity(state.pipes.len() * 2 + 2);

    for pipe in &state.pipes {
        shapes.push(Shape::Rect {
            x: pipe.x,
            y: 0.0,
            width: pipe.width,
            height: pipe.gap_y,
        });
        shapes.push(Shape::Rect {
            x: pipe.x,
            y: pipe.gap_bottom(),
            width: pipe.width,
            height: (config.world_height - pipe.gap_bottom()).max(0.0),
        });
    }

    shapes.push(Shape::Circle {
        x: state.bird.x,
        y: state.bird.y,
        radius: config.bird_radius,
    });

    shapes.push(Shape::Text {
        x: config.world_width / 2.0,
        y: config.world_height * 0.2,
        text: state.score.to_string(),
    });

    shapes
}
