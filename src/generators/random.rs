use rand::{Rng, rngs::StdRng};

use super::{GenerateOptions, WallSet};
use crate::grid::Grid;

/// Independently wall each non-endpoint cell with probability `weight`.
/// A weight that is not finite falls back to the default.
pub fn random_walls(grid: &Grid, weight: f64, rng: &mut StdRng) -> WallSet {
    let weight = if weight.is_finite() {
        weight.clamp(0.0, 1.0)
    } else {
        tracing::warn!("Obstacle weight {} is not finite, using the default", weight);
        GenerateOptions::default().obstacle_weight
    };
    let mut walls = WallSet::new(grid);
    for index in 0..grid.len() {
        if walls.is_endpoint(index) {
            continue;
        }
        if rng.random_bool(weight) {
            walls.insert(index);
        }
    }
    walls
}
