use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::GameError;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PartialConfig")]
pub struct GameConfig {
    /// Cells per side of the square board
    pub grid_size: usize,
    /// Terminal columns used to draw one cell
    pub pixel_scale: u16,
    /// Time between two timer-driven ticks
    pub tick_interval: Duration,
    /// Hunger above which the snake starves
    pub starvation_after: Duration,
    /// Hunger above which the body switches to the hungry color
    pub hunger_warning_after: Duration,
    /// How long each title or caption stays on screen
    pub title_duration: Duration,
    /// Number of frames in the death flash
    pub death_flash_count: u32,
    /// Time between two death flash frames
    pub death_flash_interval: Duration,
    /// Body segments the snake starts with
    pub initial_segments: usize,
    /// Points awarded per segment grown
    pub points_per_segment: i64,
    /// Random samples tried before placement gives up
    pub max_placement_attempts: usize,
}

/// Game configuration with every field optional, as read from a config file.
///
/// Fields left out are filled by [`PartialConfig::resolve`], with the hunger
/// thresholds and placement cap derived from the final grid size and tick.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PartialConfig {
    pub grid_size: Option<usize>,
    pub pixel_scale: Option<u16>,
    pub tick_interval: Option<Duration>,
    pub starvation_after: Option<Duration>,
    pub hunger_warning_after: Option<Duration>,
    pub title_duration: Option<Duration>,
    pub death_flash_count: Option<u32>,
    pub death_flash_interval: Option<Duration>,
    pub initial_segments: Option<usize>,
    pub points_per_segment: Option<i64>,
    pub max_placement_attempts: Option<usize>,
}

impl PartialConfig {
    pub fn resolve(&self) -> GameConfig {
        let mut config = GameConfig::with_tick(
            self.grid_size.unwrap_or(GameConfig::DEFAULT_GRID),
            self.tick_interval.unwrap_or(GameConfig::DEFAULT_TICK),
        );

        if let Some(starvation_after) = self.starvation_after {
            config.starvation_after = starvation_after;
            config.hunger_warning_after = starvation_after / 2;
        }
        if let Some(hunger_warning_after) = self.hunger_warning_after {
            config.hunger_warning_after = hunger_warning_after;
        }
        if let Some(pixel_scale) = self.pixel_scale {
            config.pixel_scale = pixel_scale;
        }
        if let Some(title_duration) = self.title_duration {
            config.title_duration = title_duration;
        }
        if let Some(death_flash_count) = self.death_flash_count {
            config.death_flash_count = death_flash_count;
        }
        if let Some(death_flash_interval) = self.death_flash_interval {
            config.death_flash_interval = death_flash_interval;
        }
        if let Some(initial_segments) = self.initial_segments {
            config.initial_segments = initial_segments;
        }
        if let Some(points_per_segment) = self.points_per_segment {
            config.points_per_segment = points_per_segment;
        }
        if let Some(max_placement_attempts) = self.max_placement_attempts {
            config.max_placement_attempts = max_placement_attempts;
        }

        config
    }
}

impl From<PartialConfig> for GameConfig {
    fn from(partial: PartialConfig) -> Self {
        partial.resolve()
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_GRID)
    }
}

impl GameConfig {
    pub const DEFAULT_GRID: usize = 20;
    pub const DEFAULT_TICK: Duration = Duration::from_millis(150);

    /// Create a new configuration with custom grid size.
    ///
    /// The snake starves after the time it takes to cross the board
    /// twice, and turns hungry halfway there.
    pub fn new(grid_size: usize) -> Self {
        Self::with_tick(grid_size, Self::DEFAULT_TICK)
    }

    /// Same as [`GameConfig::new`] with a custom tick interval. The hunger
    /// thresholds scale with the tick.
    pub fn with_tick(grid_size: usize, tick_interval: Duration) -> Self {
        let starvation_after = tick_interval * ((grid_size as u32 + 2) * 2);

        Self {
            grid_size,
            pixel_scale: 2,
            tick_interval,
            starvation_after,
            hunger_warning_after: starvation_after / 2,
            title_duration: Duration::from_secs(2),
            death_flash_count: 5,
            death_flash_interval: Duration::from_millis(200),
            initial_segments: 2,
            points_per_segment: 10,
            max_placement_attempts: grid_size * grid_size * 64,
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10)
    }

    /// Check that the values describe a playable game
    pub fn validate(&self) -> Result<(), GameError> {
        if self.grid_size < 3 {
            return Err(GameError::InvalidConfig(format!(
                "grid_size must be at least 3, got {}",
                self.grid_size
            )));
        }

        if self.pixel_scale == 0 {
            return Err(GameError::InvalidConfig(
                "pixel_scale must be at least 1".to_string(),
            ));
        }

        if self.tick_interval.is_zero() {
            return Err(GameError::InvalidConfig(
                "tick_interval must be positive".to_string(),
            ));
        }

        if self.hunger_warning_after >= self.starvation_after {
            return Err(GameError::InvalidConfig(format!(
                "hunger_warning_after ({:?}) must be below starvation_after ({:?})",
                self.hunger_warning_after, self.starvation_after
            )));
        }

        if self.initial_segments + 1 >= self.grid_size {
            return Err(GameError::InvalidConfig(format!(
                "initial_segments ({}) does not fit on a {}-cell row",
                self.initial_segments, self.grid_size
            )));
        }

        if self.points_per_segment <= 0 {
            return Err(GameError::InvalidConfig(format!(
                "points_per_segment must be positive, got {}",
                self.points_per_segment
            )));
        }

        if self.max_placement_attempts == 0 {
            return Err(GameError::InvalidConfig(
                "max_placement_attempts must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
