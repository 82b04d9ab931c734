use std::str::FromStr;

use tracing::Level;

use crate::generators::GenerateOptions;
use crate::replay::Speed;
use crate::solvers::SolveOptions;

/// Environment variable names read by [`Config::from_env`].
pub const ENV_SPEED: &str = "GRIDTRACE_SPEED";
pub const ENV_OBSTACLE_WEIGHT: &str = "GRIDTRACE_OBSTACLE_WEIGHT";
pub const ENV_HEURISTIC_WEIGHT: &str = "GRIDTRACE_HEURISTIC_WEIGHT";
pub const ENV_SEED: &str = "GRIDTRACE_SEED";
pub const ENV_LOG: &str = "GRIDTRACE_LOG";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub speed: Speed,
    /// Probability that the random generator walls a cell, in `[0, 1]`.
    pub obstacle_weight: f64,
    /// A* heuristic scale, at least 1.
    pub heuristic_weight: f64,
    pub gol_generations: usize,
    /// Generator seed; `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub log_level: Level,
}

impl Default for Config {
    fn default() -> Self {
        let solve = SolveOptions::default();
        let generate = GenerateOptions::default();
        Self {
            speed: Speed::default(),
            obstacle_weight: generate.obstacle_weight,
            heuristic_weight: solve.heuristic_weight,
            gol_generations: solve.gol_generations,
            seed: generate.seed,
            log_level: Level::INFO,
        }
    }
}

impl Config {
    /// Defaults overlaid with the `GRIDTRACE_*` environment variables.
    pub fn from_env() -> Self {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    /// Log level from `GRIDTRACE_LOG`, readable before logging is set up.
    pub fn log_level_from_env() -> Level {
        std::env::var(ENV_LOG)
            .ok()
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(Level::INFO)
    }

    /// Overlay values found by `lookup` on the defaults. Values that do not
    /// parse, and weights that are not finite, are ignored with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();
        if let Some(speed) = parse_var(&lookup, ENV_SPEED) {
            config.speed = speed;
        }
        if let Some(weight) = parse_weight(&lookup, ENV_OBSTACLE_WEIGHT) {
            config.obstacle_weight = weight.clamp(0.0, 1.0);
        }
        if let Some(weight) = parse_weight(&lookup, ENV_HEURISTIC_WEIGHT) {
            config.heuristic_weight = weight.max(1.0);
        }
        if let Some(seed) = parse_var(&lookup, ENV_SEED) {
            config.seed = Some(seed);
        }
        if let Some(level) = parse_var(&lookup, ENV_LOG) {
            config.log_level = level;
        }
        config
    }

    pub fn solve_options(&self) -> SolveOptions {
        SolveOptions {
            heuristic_weight: self.heuristic_weight,
            gol_generations: self.gol_generations,
        }
    }

    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            obstacle_weight: self.obstacle_weight,
            seed: self.seed,
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let value = lookup(key)?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!("Ignoring {}={:?}: not a valid value", key, value);
            None
        }
    }
}

fn parse_weight(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<f64> {
    let weight = parse_var::<f64>(lookup, key)?;
    if !weight.is_finite() {
        tracing::warn!("Ignoring {}={}: not a finite number", key, weight);
        return None;
    }
    Some(weight)
}
