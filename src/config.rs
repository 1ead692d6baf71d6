//! Engine options. Every field has a default, so the host can pass `{}` or
//! only the fields it wants to change.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::fixed::TILE;
use crate::player::PlayerState;

/// Screen rectangle the 3D view is drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 1,
            y: 25,
            w: 142,
            h: 140,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub view: Viewport,
    /// Field of view in native angle units (a full turn is 0x10000).
    pub fov: i32,
    /// Tiles per side of the square map.
    pub map_size: usize,
    /// Ray length limit in scaled units.
    pub range: i32,
    /// Walk through walls.
    pub pass_through: bool,
    pub view_border: bool,
    pub draw_textbox: bool,
    /// Facing change per unit of angular impulse.
    pub steer_gain: i32,
    pub start: PlayerState,
    /// Fixed seed for map generation and shading noise. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            view: Viewport::default(),
            fov: 13064,
            map_size: 20,
            range: 10_000,
            pass_through: false,
            view_border: true,
            draw_textbox: true,
            steer_gain: 10,
            start: PlayerState {
                x: 5000,
                y: -2000,
                facing: 10_000,
            },
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyViewport { w: i32, h: i32 },
    FovNotPositive(i32),
    RangeNotPositive(i32),
    EmptyMap,
    MapTooLarge(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyViewport { w, h } => {
                write!(f, "viewport must be at least 1x1, got {w}x{h}")
            }
            ConfigError::FovNotPositive(fov) => write!(f, "fov must be positive, got {fov}"),
            ConfigError::RangeNotPositive(range) => {
                write!(f, "range must be positive, got {range}")
            }
            ConfigError::EmptyMap => write!(f, "map size must be at least 1"),
            ConfigError::MapTooLarge(size) => write!(
                f,
                "map size {size} does not fit in scaled coordinates (max {})",
                max_map_size()
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Largest map whose scaled extent still fits in an `i32`.
pub const fn max_map_size() -> usize {
    (i32::MAX / TILE) as usize
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.view.w <= 0 || self.view.h <= 0 {
            return Err(ConfigError::EmptyViewport {
                w: self.view.w,
                h: self.view.h,
            });
        }
        if self.fov <= 0 {
            return Err(ConfigError::FovNotPositive(self.fov));
        }
        if self.range <= 0 {
            return Err(ConfigError::RangeNotPositive(self.range));
        }
        if self.map_size == 0 {
            return Err(ConfigError::EmptyMap);
        }
        if self.map_size > max_map_size() {
            return Err(ConfigError::MapTooLarge(self.map_size));
        }
        Ok(())
    }
}
