//! Canvas bounds and placement rules.
//!
//! # Invariants
//! - Dragged block origins stay within `[0, width - BLOCK_WIDTH]` and
//!   `[0, height - BLOCK_HEIGHT]`; the lower bound wins on tiny canvases.

use crate::model::block::{Position, BLOCK_HEIGHT, BLOCK_WIDTH};
use rand::Rng;
use serde::{Deserialize, Serialize};

const RANDOM_MARGIN: f64 = 50.0;
const RANDOM_WIDTH_RESERVE: f64 = 250.0;
const RANDOM_HEIGHT_RESERVE: f64 = 100.0;

/// Visible canvas size in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Clamps a block origin so the block footprint stays on the canvas.
    pub fn clamp_block_origin(&self, position: Position) -> Position {
        Position::new(
            position.x.min(self.width - BLOCK_WIDTH).max(0.0),
            position.y.min(self.height - BLOCK_HEIGHT).max(0.0),
        )
    }

    /// Picks a placement for a block created without explicit coordinates.
    pub fn random_position(&self, rng: &mut impl Rng) -> Position {
        let x = rng.gen::<f64>() * (self.width - RANDOM_WIDTH_RESERVE) + RANDOM_MARGIN;
        let y = rng.gen::<f64>() * (self.height - RANDOM_HEIGHT_RESERVE) + RANDOM_MARGIN;
        Position::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn clamp_keeps_footprint_inside_canvas() {
        let canvas = Canvas::new(800.0, 600.0);
        assert_eq!(
            canvas.clamp_block_origin(Position::new(-20.0, 900.0)),
            Position::new(0.0, 500.0)
        );
        assert_eq!(
            canvas.clamp_block_origin(Position::new(650.0, 10.0)),
            Position::new(500.0, 10.0)
        );
    }

    #[test]
    fn clamp_on_tiny_canvas_pins_to_origin() {
        let canvas = Canvas::new(200.0, 50.0);
        assert_eq!(
            canvas.clamp_block_origin(Position::new(40.0, 40.0)),
            Position::new(0.0, 0.0)
        );
    }

    #[test]
    fn random_position_stays_in_placement_band() {
        let canvas = Canvas::new(1000.0, 500.0);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let position = canvas.random_position(&mut rng);
            assert!(position.x >= 50.0 && position.x < 800.0);
            assert!(position.y >= 50.0 && position.y < 450.0);
        }
    }
}
