use serde::{Deserialize, Serialize};

use crate::fixed::{cos_lookup, floor_to_tile, sin_lookup, TRIG_MAX_RATIO};
use crate::map::Map;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerState {
    pub x: i32,      // scaled, 1000 per tile
    pub y: i32,      // scaled, 1000 per tile
    pub facing: i32, // native angle, 0x10000 per turn
}

/// Per-tick steering and throttle from the input provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Impulse {
    pub angular: i32,
    pub forward: i32,
}

/// Scales `value` by a trig ratio without overflowing on large impulses.
#[inline]
fn scale_by_ratio(ratio: i32, value: i32) -> i32 {
    ((ratio as i64 * value as i64) / TRIG_MAX_RATIO as i64) as i32
}

impl PlayerState {
    pub fn steer(&mut self, gain: i32, angular: i32) {
        self.facing = self.facing.wrapping_add(gain.wrapping_mul(angular));
    }

    /// Moves along `facing`, one axis at a time so the player slides along
    /// walls instead of stopping dead.
    pub fn advance(&mut self, map: &Map, forward: i32, pass_through: bool) {
        let dx = scale_by_ratio(cos_lookup(self.facing), forward);
        let dy = scale_by_ratio(sin_lookup(self.facing), forward);

        let next_x = self.x.saturating_add(dx);
        if pass_through || map.is_walkable(floor_to_tile(next_x), floor_to_tile(self.y)) {
            self.x = next_x;
        }
        let next_y = self.y.saturating_add(dy);
        if pass_through || map.is_walkable(floor_to_tile(self.x), floor_to_tile(next_y)) {
            self.y = next_y;
        }
    }

    /// One simulation tick: turn, then walk.
    pub fn tick(&mut self, map: &Map, impulse: Impulse, gain: i32, pass_through: bool) {
        self.steer(gain, impulse.angular);
        self.advance(map, impulse.forward, pass_through);
    }
}
