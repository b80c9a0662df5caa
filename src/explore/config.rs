//! Exploration configuration.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::planner::{RadiusSchedule, WalkParams, DEFAULT_UNEXPLORED_THRESHOLD};

/// Metres in a statute mile, as used for route reporting.
pub const METERS_PER_MILE: f64 = 1609.0;

/// Band half-width around the chunk distance: routes fall within ±10 %.
const BAND_TOLERANCE: f64 = 0.1;

/// Invalid configuration values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// A distance or radius was negative, NaN or infinite.
    #[error("{field} must be a finite non-negative number, got {value}")]
    InvalidNumber {
        /// Name of the offending field.
        field: &'static str,
        /// Offending value.
        value: f64,
    },

    /// `min_distance` exceeded `max_distance`.
    #[error("min_distance {min} exceeds max_distance {max}")]
    InvertedDistanceBand {
        /// Configured minimum.
        min: f64,
        /// Configured maximum.
        max: f64,
    },

    /// `initial_radius` exceeded `max_radius`.
    #[error("initial_radius {initial} exceeds max_radius {max}")]
    InvertedRadiusRange {
        /// Configured initial radius.
        initial: f64,
        /// Configured maximum radius.
        max: f64,
    },

    /// A count or step that must be positive was zero.
    #[error("{0} must be positive")]
    NotPositive(&'static str),

    /// The unexplored threshold was outside `[0, 1]`.
    #[error("unexplored_threshold must lie in [0, 1], got {0}")]
    ThresholdOutOfRange(f64),
}

/// Tuning for an exploration run.
///
/// Distances and radii are in metres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Shortest acceptable route.
    pub min_distance: f64,
    /// Longest acceptable route.
    pub max_distance: f64,
    /// First neighborhood radius searched around the current node.
    pub initial_radius: f64,
    /// Upper bound of the radius schedule.
    pub max_radius: f64,
    /// Radius increment after a failed neighborhood.
    pub radius_step: f64,
    /// Walk attempts per neighborhood.
    pub max_attempts: usize,
    /// Edges per walk attempt at most.
    pub max_steps: usize,
    /// Random samples when relocating.
    pub selector_tries: usize,
    /// Unused-edge fraction a relocation target must exceed.
    pub unexplored_threshold: f64,
    /// Seed for reproducible runs; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        let (min_distance, max_distance) = distance_band(20.0 * METERS_PER_MILE);
        Self {
            min_distance,
            max_distance,
            initial_radius: 2500.0,
            max_radius: 15_000.0,
            radius_step: 1000.0,
            max_attempts: 300,
            max_steps: 1500,
            selector_tries: 200,
            unexplored_threshold: DEFAULT_UNEXPLORED_THRESHOLD,
            seed: None,
        }
    }
}

fn distance_band(chunk: f64) -> (f64, f64) {
    (chunk * (1.0 - BAND_TOLERANCE), chunk * (1.0 + BAND_TOLERANCE))
}

impl ExplorerConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Default configuration with a ±10 % band around `miles`.
    pub fn from_chunk_miles(miles: f64) -> Self {
        Self::default().with_chunk_meters(miles * METERS_PER_MILE)
    }

    /// Builder: ±10 % band around `meters`.
    pub fn with_chunk_meters(mut self, meters: f64) -> Self {
        let (min, max) = distance_band(meters);
        self.min_distance = min;
        self.max_distance = max;
        self
    }

    /// Builder: explicit distance band.
    pub fn with_distance_band(mut self, min: f64, max: f64) -> Self {
        self.min_distance = min;
        self.max_distance = max;
        self
    }

    /// Builder: radius schedule.
    pub fn with_radii(mut self, initial: f64, max: f64, step: f64) -> Self {
        self.initial_radius = initial;
        self.max_radius = max;
        self.radius_step = step;
        self
    }

    /// Builder: walk attempt and step ceilings.
    pub fn with_walk_limits(mut self, max_attempts: usize, max_steps: usize) -> Self {
        self.max_attempts = max_attempts;
        self.max_steps = max_steps;
        self
    }

    /// Builder: relocation sampling.
    pub fn with_selector(mut self, tries: usize, threshold: f64) -> Self {
        self.selector_tries = tries;
        self.unexplored_threshold = threshold;
        self
    }

    /// Builder: fixed RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parses a configuration from JSON. Missing fields take default values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("failed to parse explorer config")?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read explorer config {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("invalid explorer config {}", path.display()))
    }

    /// Checks every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("min_distance", self.min_distance),
            ("max_distance", self.max_distance),
            ("initial_radius", self.initial_radius),
            ("max_radius", self.max_radius),
            ("radius_step", self.radius_step),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidNumber { field, value });
            }
        }
        if self.min_distance > self.max_distance {
            return Err(ConfigError::InvertedDistanceBand {
                min: self.min_distance,
                max: self.max_distance,
            });
        }
        if self.initial_radius > self.max_radius {
            return Err(ConfigError::InvertedRadiusRange {
                initial: self.initial_radius,
                max: self.max_radius,
            });
        }
        if self.radius_step == 0.0 {
            return Err(ConfigError::NotPositive("radius_step"));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::NotPositive("max_attempts"));
        }
        if self.max_steps == 0 {
            return Err(ConfigError::NotPositive("max_steps"));
        }
        if !(0.0..=1.0).contains(&self.unexplored_threshold) {
            return Err(ConfigError::ThresholdOutOfRange(self.unexplored_threshold));
        }
        Ok(())
    }

    /// Walk bounds derived from this configuration.
    pub fn walk_params(&self) -> WalkParams {
        WalkParams {
            min_distance: self.min_distance,
            max_distance: self.max_distance,
            max_attempts: self.max_attempts,
            max_steps: self.max_steps,
        }
    }

    /// Radius schedule derived from this configuration.
    pub fn radius_schedule(&self) -> RadiusSchedule {
        RadiusSchedule::new(self.initial_radius, self.max_radius, self.radius_step)
    }
}
